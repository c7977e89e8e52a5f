//! Records as returned by the billing API.
//!
//! Dates and timestamps stay as the strings the API sent: they are grouping
//! keys, compared by exact string equality, never re-parsed for identity.

pub mod customer;
pub mod invoice;
pub mod pipeline;
pub mod pricing;
pub mod summary;
pub mod usage;

pub use customer::Customer;
pub use invoice::{Invoice, InvoiceDetail, LineItem};
pub use pipeline::{PipelineRun, PipelineStatus};
pub use pricing::PricingRecord;
pub use summary::DashboardSummary;
pub use usage::UsageRecord;
