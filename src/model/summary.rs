use serde::{Deserialize, Serialize};

/// Record counts shown on the dashboard landing page.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub students: i64,
    pub classes: i64,
    pub teachers: i64,
    pub parents: i64,
    pub employees: i64,
}
