use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One effective window of a (product, plan) rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingRecord {
    pub product_id: String,
    pub plan_id: String,
    pub unit: String,
    pub unit_price: Decimal,
    pub currency: String,
    pub effective_from: String,
    #[serde(default)]
    pub effective_to: Option<String>,
}
