use serde::{Deserialize, Serialize};

/// Body of the `DELETE` requests: `{ "id": 4 }`.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IdRequest {
    pub id: Option<i32>,
}

/// Body of the `PUT` requests: the record id next to the changed fields.
#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateRequest<T> {
    #[serde(default)]
    pub id: Option<i32>,
    #[serde(flatten)]
    pub changes: T,
}
