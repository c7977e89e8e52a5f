use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Invoice header.
///
/// `total` is expected to equal `subtotal + tax`; nothing here re-derives it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub invoice_id: String,
    pub customer_sk: i64,
    /// `None` when the customer row is no longer current upstream.
    #[serde(default)]
    pub customer_name: Option<String>,
    pub billing_period_start: String,
    pub billing_period_end: String,
    pub issued_ts: String,
    pub status: String, // draft, issued, paid
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    pub currency: String,
}

impl Invoice {
    /// `total - (subtotal + tax)`; zero when the invoice is consistent.
    pub fn total_discrepancy(&self) -> Decimal {
        self.total - (self.subtotal + self.tax)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub line_item_id: String,
    pub line_type: String,
    pub product_id: String,
    pub unit: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub amount: Decimal,
}

impl LineItem {
    /// `amount - quantity * unit_price`.
    pub fn amount_discrepancy(&self) -> Decimal {
        self.amount - self.quantity * self.unit_price
    }
}

/// Invoice with its line items, as served by `/invoices/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceDetail {
    #[serde(flatten)]
    pub invoice: Invoice,
    #[serde(default)]
    pub line_items: Vec<LineItem>,
}
