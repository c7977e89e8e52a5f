use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Pre-aggregated KPIs for the dashboard overview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total_revenue_mtd: Decimal,
    pub total_customers: Decimal,
    pub active_invoices: Decimal,
    pub total_events_today: Decimal,
    pub avg_daily_revenue: Decimal,
}
