//! Rate card grouped by plan.

use super::Panel;
use crate::aggregation::distinct_keys;
use crate::format::{format_category_label, format_currency, format_long_date};
use crate::models::PricingRecord;
use crate::styles::{plan_tone, Tone};
use serde::Serialize;

pub const NO_PRICING: &str = "No pricing data available";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanTab {
    pub plan_id: String,
    pub label: String,
    pub tone: Tone,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceRow {
    pub plan_id: String,
    pub product_id: String,
    pub product_label: String,
    pub unit: String,
    pub price_display: String,
    pub effective_from: String,
    /// `None` while the rate is still in effect.
    pub effective_to: Option<String>,
}

/// Plans in first-seen order; rows ordered by plan, then as served.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricingView {
    pub plans: Vec<PlanTab>,
    pub rows: Vec<PriceRow>,
}

impl Panel for PricingView {
    fn has_content(&self) -> bool {
        !self.rows.is_empty()
    }
}

fn price_row(record: &PricingRecord) -> PriceRow {
    PriceRow {
        plan_id: record.plan_id.clone(),
        product_id: record.product_id.clone(),
        product_label: format_category_label(&record.product_id),
        unit: record.unit.clone(),
        price_display: format_currency(record.unit_price, &record.currency),
        effective_from: format_long_date(&record.effective_from),
        effective_to: record.effective_to.as_deref().map(format_long_date),
    }
}

pub fn pricing_view(records: &[PricingRecord]) -> PricingView {
    let plan_ids = distinct_keys(records, |r| r.plan_id.as_str());

    let rows = plan_ids
        .iter()
        .flat_map(|plan_id| records.iter().filter(move |r| &r.plan_id == plan_id))
        .map(price_row)
        .collect();

    let plans = plan_ids
        .into_iter()
        .map(|plan_id| PlanTab {
            label: format_category_label(&plan_id),
            tone: plan_tone(&plan_id),
            plan_id,
        })
        .collect();

    PricingView { plans, rows }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn price(plan: &str, product: &str, unit_price: Decimal, to: Option<&str>) -> PricingRecord {
        PricingRecord {
            product_id: product.to_string(),
            plan_id: plan.to_string(),
            unit: "GB".to_string(),
            unit_price,
            currency: "USD".to_string(),
            effective_from: "2024-01-01".to_string(),
            effective_to: to.map(str::to_string),
        }
    }

    #[test]
    fn plans_keep_first_seen_order() {
        let records = vec![
            price("plan_pro", "prod_cloud_storage", dec!(0.02), None),
            price("plan_free", "prod_cloud_storage", dec!(0.05), None),
            price("plan_pro", "prod_api_calls", dec!(0.001), Some("2024-06-30")),
        ];

        let view = pricing_view(&records);

        let plans: Vec<&str> = view.plans.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(plans, vec!["Pro", "Free"]);
        assert_eq!(view.plans[0].tone, Tone::Accent);

        let products: Vec<(&str, &str)> = view
            .rows
            .iter()
            .map(|r| (r.plan_id.as_str(), r.product_id.as_str()))
            .collect();
        assert_eq!(
            products,
            vec![
                ("plan_pro", "prod_cloud_storage"),
                ("plan_pro", "prod_api_calls"),
                ("plan_free", "prod_cloud_storage"),
            ]
        );
    }

    #[test]
    fn rows_are_formatted() {
        let view = pricing_view(&[price(
            "plan_pro",
            "prod_api_calls",
            dec!(1234.5),
            Some("2024-06-30"),
        )]);
        let row = &view.rows[0];

        assert_eq!(row.product_label, "Api Calls");
        assert_eq!(row.price_display, "$1,234.50");
        assert_eq!(row.effective_from, "Jan 1, 2024");
        assert_eq!(row.effective_to.as_deref(), Some("Jun 30, 2024"));
    }

    #[test]
    fn no_records_is_empty() {
        assert!(!pricing_view(&[]).has_content());
    }
}
