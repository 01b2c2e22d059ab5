use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: i32,
    pub order: i32,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderRequest {
    pub items: Vec<OrderItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderFailure {
    pub id: i32,
    pub message: String,
}

/// Outcome of a bulk order update. Every item lands in exactly one of the two lists.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderReport {
    pub message: String,
    pub updated: Vec<i32>,
    pub failed: Vec<OrderFailure>,
}

impl OrderReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}
