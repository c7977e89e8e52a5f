use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    /// Surrogate key of the current dimension row. Joins use `customer_id`.
    pub customer_sk: i64,
    pub customer_id: String,
    pub customer_name: String,
    pub status: String, // active, churned, trial
    pub country: String,
    pub plan_id: String,
    pub is_current: bool,
}
