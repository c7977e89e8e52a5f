//! Invoice list and invoice detail.

use super::{Panel, ViewState};
use crate::aggregation::Selection;
use crate::format::{
    format_category_label, format_currency, format_long_date, format_number, format_period,
    short_id,
};
use crate::models::{Customer, Invoice, InvoiceDetail, LineItem};
use crate::styles::{invoice_status_tone, Tone};
use rust_decimal::Decimal;
use serde::Serialize;

pub const INVOICE_STATUSES: [&str; 3] = ["draft", "issued", "paid"];
pub const NO_INVOICES: &str = "No invoices found";
pub const NO_LINE_ITEMS: &str = "No line items";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceRow {
    pub invoice_id: String,
    pub short_id: String,
    pub customer_name: String,
    pub period: String,
    pub issued: String,
    pub status: String,
    pub tone: Tone,
    pub total: Decimal,
    pub total_display: String,
    pub currency: String,
}

impl InvoiceRow {
    pub fn from_invoice(invoice: &Invoice) -> Self {
        Self {
            invoice_id: invoice.invoice_id.clone(),
            short_id: short_id(&invoice.invoice_id),
            customer_name: invoice
                .customer_name
                .clone()
                .unwrap_or_else(|| "Unknown".to_string()),
            period: format_period(&invoice.billing_period_start, &invoice.billing_period_end),
            issued: format_long_date(&invoice.issued_ts),
            status: invoice.status.clone(),
            tone: invoice_status_tone(&invoice.status),
            total: invoice.total,
            total_display: format_currency(invoice.total, &invoice.currency),
            currency: invoice.currency.clone(),
        }
    }
}

pub fn invoice_rows(invoices: &[Invoice]) -> Vec<InvoiceRow> {
    invoices.iter().map(InvoiceRow::from_invoice).collect()
}

/// Entry of the customer filter dropdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerOption {
    pub customer_id: String,
    pub name: String,
}

pub fn customer_options(customers: &[Customer]) -> Vec<CustomerOption> {
    customers
        .iter()
        .map(|c| CustomerOption {
            customer_id: c.customer_id.clone(),
            name: c.customer_name.clone(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceListView {
    pub status: Selection,
    pub customer: Selection,
    pub statuses: [&'static str; 3],
    /// Empty when the customer list could not be loaded; the invoice table
    /// does not depend on it.
    pub customers: Vec<CustomerOption>,
    pub invoices: ViewState<Vec<InvoiceRow>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineItemRow {
    pub line_item_id: String,
    pub line_type: String,
    pub product_id: String,
    pub product_label: String,
    pub unit: String,
    pub quantity: Decimal,
    pub quantity_display: String,
    pub unit_price_display: String,
    pub amount: Decimal,
    pub amount_display: String,
    /// `amount` differs from `quantity * unit_price`.
    pub mismatch: bool,
}

/// Arithmetic inconsistencies in the served invoice. Reported as-is; the
/// served amounts are always the ones displayed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Reconciliation {
    /// `total - (subtotal + tax)` when non-zero.
    pub total_discrepancy: Option<Decimal>,
    pub mismatched_line_items: Vec<String>,
}

impl Reconciliation {
    pub fn is_consistent(&self) -> bool {
        self.total_discrepancy.is_none() && self.mismatched_line_items.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceDetailView {
    pub invoice: InvoiceRow,
    pub subtotal_display: String,
    pub tax_display: String,
    pub pdf_url: Option<String>,
    pub line_items: ViewState<Vec<LineItemRow>>,
    pub reconciliation: Reconciliation,
}

impl Panel for InvoiceDetailView {
    fn has_content(&self) -> bool {
        true
    }
}

fn line_item_row(item: &LineItem, currency: &str) -> LineItemRow {
    LineItemRow {
        line_item_id: item.line_item_id.clone(),
        line_type: item.line_type.clone(),
        product_id: item.product_id.clone(),
        product_label: format_category_label(&item.product_id),
        unit: item.unit.clone(),
        quantity: item.quantity,
        quantity_display: format_number(item.quantity),
        unit_price_display: format_currency(item.unit_price, currency),
        amount: item.amount,
        amount_display: format_currency(item.amount, currency),
        mismatch: !item.amount_discrepancy().is_zero(),
    }
}

pub fn reconcile(detail: &InvoiceDetail) -> Reconciliation {
    let discrepancy = detail.invoice.total_discrepancy();
    Reconciliation {
        total_discrepancy: (!discrepancy.is_zero()).then_some(discrepancy),
        mismatched_line_items: detail
            .line_items
            .iter()
            .filter(|item| !item.amount_discrepancy().is_zero())
            .map(|item| item.line_item_id.clone())
            .collect(),
    }
}

pub fn invoice_detail(detail: &InvoiceDetail, pdf_url: Option<String>) -> InvoiceDetailView {
    let invoice = &detail.invoice;
    let currency = invoice.currency.as_str();

    let rows: Vec<LineItemRow> = detail
        .line_items
        .iter()
        .map(|item| line_item_row(item, currency))
        .collect();
    let line_items = if rows.is_empty() {
        ViewState::empty(NO_LINE_ITEMS)
    } else {
        ViewState::ready(rows)
    };

    let reconciliation = reconcile(detail);
    if !reconciliation.is_consistent() {
        tracing::warn!(
            invoice_id = %invoice.invoice_id,
            total_discrepancy = ?reconciliation.total_discrepancy,
            mismatched_line_items = reconciliation.mismatched_line_items.len(),
            "Invoice amounts do not reconcile"
        );
    }

    InvoiceDetailView {
        invoice: InvoiceRow::from_invoice(invoice),
        subtotal_display: format_currency(invoice.subtotal, currency),
        tax_display: format_currency(invoice.tax, currency),
        pdf_url,
        line_items,
        reconciliation,
    }
}
