use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Daily usage of one product, already summed upstream per (date, product).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageRecord {
    /// Calendar day, `YYYY-MM-DD`.
    pub date_id: String,
    pub product_id: String,
    pub unit: String,
    pub total_quantity: Decimal,
    pub cost_amount: Decimal,
    pub currency: String,
}
