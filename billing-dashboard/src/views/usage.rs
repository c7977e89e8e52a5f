//! Usage explorer: product filter, daily trends and per-product summary.

use super::{usage_currency, Panel, SeriesPoint, SeriesUnit};
use crate::aggregation::{
    assign_categorical_color, distinct_keys, filter_by_equality, group_multi_sum_by_key,
    group_sum_by_key, FieldFilter, KeyOrder, Selection, CHART_PALETTE,
};
use crate::format::{format_category_label, format_currency, format_number};
use crate::models::UsageRecord;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;

pub const NO_USAGE: &str = "No usage data for the selected filters";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductOption {
    pub product_id: String,
    pub label: String,
}

/// Per-product totals row, coloured in first-seen order of the rows shown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductSummaryRow {
    pub product_id: String,
    pub label: String,
    /// Unit of the first record seen for the product.
    pub unit: String,
    pub quantity: Decimal,
    pub quantity_display: String,
    pub cost: Decimal,
    pub cost_display: String,
    pub fill: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsageExplorerView {
    pub product: Selection,
    /// Built from the unfiltered records so the dropdown never shrinks to
    /// the current selection.
    pub products: Vec<ProductOption>,
    pub daily_quantity: Vec<SeriesPoint>,
    pub daily_cost: Vec<SeriesPoint>,
    pub product_summary: Vec<ProductSummaryRow>,
}

impl Panel for UsageExplorerView {
    fn has_content(&self) -> bool {
        !self.product_summary.is_empty()
    }
}

fn by_product(record: &UsageRecord) -> &str {
    &record.product_id
}

pub fn product_options(records: &[UsageRecord]) -> Vec<ProductOption> {
    distinct_keys(records, |r| r.product_id.as_str())
        .into_iter()
        .map(|product_id| ProductOption {
            label: format_category_label(&product_id),
            product_id,
        })
        .collect()
}

pub fn daily_quantity(records: &[&UsageRecord]) -> Vec<SeriesPoint> {
    group_sum_by_key(
        records,
        |r| r.date_id.as_str(),
        |r| r.total_quantity,
        KeyOrder::Ascending,
    )
    .into_iter()
    .map(|row| SeriesPoint::new(row.key, row.total, SeriesUnit::Quantity))
    .collect()
}

pub fn daily_cost(records: &[&UsageRecord], currency: &str) -> Vec<SeriesPoint> {
    group_sum_by_key(
        records,
        |r| r.date_id.as_str(),
        |r| r.cost_amount,
        KeyOrder::Ascending,
    )
    .into_iter()
    .map(|row| SeriesPoint::new(row.key, row.total, SeriesUnit::Currency(currency)))
    .collect()
}

pub fn product_summary(records: &[&UsageRecord], currency: &str) -> Vec<ProductSummaryRow> {
    let mut units: HashMap<&str, &str> = HashMap::new();
    for record in records {
        units
            .entry(record.product_id.as_str())
            .or_insert(record.unit.as_str());
    }

    let quantity = |r: &&UsageRecord| r.total_quantity;
    let cost = |r: &&UsageRecord| r.cost_amount;

    group_multi_sum_by_key(
        records,
        |r| r.product_id.as_str(),
        [&quantity as &dyn Fn(&&UsageRecord) -> Decimal, &cost],
        KeyOrder::FirstSeen,
    )
    .into_iter()
    .enumerate()
    .map(|(i, row)| {
        let [quantity, cost] = row.totals;
        ProductSummaryRow {
            label: format_category_label(&row.key),
            unit: units.get(row.key.as_str()).copied().unwrap_or("").to_string(),
            product_id: row.key,
            quantity,
            quantity_display: format_number(quantity),
            cost,
            cost_display: format_currency(cost, currency),
            fill: assign_categorical_color(i, &CHART_PALETTE),
        }
    })
    .collect()
}

pub fn usage_explorer(records: &[UsageRecord], product: &Selection) -> UsageExplorerView {
    let filters: [FieldFilter<'_, UsageRecord>; 1] = [(by_product, product)];
    let shown = filter_by_equality(records, &filters);
    let currency = usage_currency(records);

    UsageExplorerView {
        product: product.clone(),
        products: product_options(records),
        daily_quantity: daily_quantity(&shown),
        daily_cost: daily_cost(&shown, currency),
        product_summary: product_summary(&shown, currency),
    }
}
