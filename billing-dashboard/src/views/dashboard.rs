//! Overview page: KPI cards, revenue trend, usage by product and the latest
//! invoices.

use super::invoices::{invoice_rows, InvoiceRow};
use super::{usage_currency, SeriesPoint, SeriesUnit, ViewState};
use crate::aggregation::{
    assign_categorical_color, group_multi_sum_by_key, group_sum_by_key, KeyOrder, CHART_PALETTE,
};
use crate::format::{format_category_label, format_count, format_currency, format_number};
use crate::models::{DashboardSummary, Invoice, UsageRecord};
use rust_decimal::Decimal;
use serde::Serialize;

pub const RECENT_INVOICE_COUNT: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiCard {
    pub key: &'static str,
    pub title: &'static str,
    pub value: Decimal,
    pub display: String,
}

/// Bar in the usage-by-product chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductBar {
    pub product_id: String,
    pub label: String,
    pub quantity: Decimal,
    pub cost: Decimal,
    pub display: String,
    pub fill: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub kpis: ViewState<Vec<KpiCard>>,
    pub revenue: ViewState<Vec<SeriesPoint>>,
    pub usage_by_product: ViewState<Vec<ProductBar>>,
    pub recent_invoices: ViewState<Vec<InvoiceRow>>,
}

pub fn kpi_cards(summary: &DashboardSummary) -> Vec<KpiCard> {
    vec![
        KpiCard {
            key: "total_revenue_mtd",
            title: "Revenue (MTD)",
            value: summary.total_revenue_mtd,
            display: format_currency(summary.total_revenue_mtd, "USD"),
        },
        KpiCard {
            key: "total_customers",
            title: "Active Customers",
            value: summary.total_customers,
            display: format_count(summary.total_customers),
        },
        KpiCard {
            key: "active_invoices",
            title: "Active Invoices",
            value: summary.active_invoices,
            display: format_count(summary.active_invoices),
        },
        KpiCard {
            key: "total_events_today",
            title: "Events Today",
            value: summary.total_events_today,
            display: format_count(summary.total_events_today),
        },
        KpiCard {
            key: "avg_daily_revenue",
            title: "Avg Daily Revenue",
            value: summary.avg_daily_revenue,
            display: format_currency(summary.avg_daily_revenue, "USD"),
        },
    ]
}

/// Daily cost, oldest day first.
pub fn revenue_series(usage: &[UsageRecord]) -> Vec<SeriesPoint> {
    let currency = usage_currency(usage);
    group_sum_by_key(usage, |r| r.date_id.as_str(), |r| r.cost_amount, KeyOrder::Ascending)
        .into_iter()
        .map(|row| SeriesPoint::new(row.key, row.total, SeriesUnit::Currency(currency)))
        .collect()
}

/// Quantity per product in first-seen order, one palette colour each.
pub fn usage_by_product(usage: &[UsageRecord]) -> Vec<ProductBar> {
    let quantity = |r: &UsageRecord| r.total_quantity;
    let cost = |r: &UsageRecord| r.cost_amount;

    group_multi_sum_by_key(
        usage,
        |r| r.product_id.as_str(),
        [&quantity as &dyn Fn(&UsageRecord) -> Decimal, &cost],
        KeyOrder::FirstSeen,
    )
    .into_iter()
    .enumerate()
    .map(|(i, row)| {
        let [quantity, cost] = row.totals;
        ProductBar {
            label: format_category_label(&row.key),
            product_id: row.key,
            quantity,
            cost,
            display: format_number(quantity),
            fill: assign_categorical_color(i, &CHART_PALETTE),
        }
    })
    .collect()
}

/// The first few invoices as returned by the API, newest first.
pub fn recent_invoices(invoices: &[Invoice]) -> Vec<InvoiceRow> {
    let latest = &invoices[..invoices.len().min(RECENT_INVOICE_COUNT)];
    invoice_rows(latest)
}
