//! Chart- and table-ready view models built from fetched records.
//!
//! Builders here are pure: they take records and return flat rows with
//! every display string already formatted. Fetching and caching happen in
//! the handlers.

pub mod customers;
pub mod dashboard;
pub mod invoices;
pub mod pipeline;
pub mod pricing;
pub mod usage;

use crate::format::{format_currency, format_number, format_short_date};
use crate::models::UsageRecord;
use crate::services::cache::Snapshot;
use crate::services::metrics::VIEW_FAILURES_TOTAL;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use rust_decimal::Decimal;
use serde::Serialize;

/// What one panel shows. Each panel of a page resolves independently.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ViewState<T> {
    Ready {
        data: T,
        /// Set when a refetch failed and `data` is the last good load.
        #[serde(skip_serializing_if = "Option::is_none")]
        stale_error: Option<String>,
    },
    Empty {
        message: String,
    },
    Error {
        message: String,
        retryable: bool,
    },
}

impl<T> ViewState<T> {
    pub fn ready(data: T) -> Self {
        ViewState::Ready {
            data,
            stale_error: None,
        }
    }

    pub fn empty(message: impl Into<String>) -> Self {
        ViewState::Empty {
            message: message.into(),
        }
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            ViewState::Ready { data, .. } => Some(data),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ViewState::Error { .. })
    }
}

impl<T: Serialize> IntoResponse for ViewState<T> {
    fn into_response(self) -> Response {
        let status = if self.is_error() {
            StatusCode::BAD_GATEWAY
        } else {
            StatusCode::OK
        };
        (status, Json(self)).into_response()
    }
}

/// Whether a built view has nothing to show.
pub trait Panel {
    fn has_content(&self) -> bool;
}

impl<T> Panel for Vec<T> {
    fn has_content(&self) -> bool {
        !self.is_empty()
    }
}

/// Resolve a cache snapshot into a panel.
///
/// Records win over errors: a failed refetch still renders the previous
/// load. Zero rows after `build` is the empty state, never an error.
pub fn panel<S, T, F>(
    view: &str,
    snapshot: &Snapshot<S>,
    empty_message: &str,
    build: F,
) -> ViewState<T>
where
    T: Panel,
    F: FnOnce(&S) -> T,
{
    match (&snapshot.data, &snapshot.error) {
        (Some(records), error) => {
            let data = build(&**records);
            if !data.has_content() {
                return ViewState::empty(empty_message);
            }
            ViewState::Ready {
                data,
                stale_error: error.as_ref().map(ToString::to_string),
            }
        }
        (None, Some(error)) => {
            VIEW_FAILURES_TOTAL.with_label_values(&[view]).inc();
            ViewState::Error {
                message: error.to_string(),
                retryable: error.is_retryable(),
            }
        }
        // A completed load always carries records or an error.
        (None, None) => ViewState::Error {
            message: "No data loaded".to_string(),
            retryable: true,
        },
    }
}

/// One point of a daily time series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub date: String,
    pub label: String,
    pub value: Decimal,
    pub display: String,
}

/// How a series value is rendered.
#[derive(Debug, Clone, Copy)]
pub enum SeriesUnit<'a> {
    Currency(&'a str),
    Quantity,
}

impl SeriesPoint {
    pub fn new(date: String, value: Decimal, unit: SeriesUnit<'_>) -> Self {
        let display = match unit {
            SeriesUnit::Currency(code) => format_currency(value, code),
            SeriesUnit::Quantity => format_number(value),
        };
        Self {
            label: format_short_date(&date),
            date,
            value,
            display,
        }
    }
}

/// Currency of the first record, USD when there are none.
pub(crate) fn usage_currency(records: &[UsageRecord]) -> &str {
    records.first().map_or("USD", |r| r.currency.as_str())
}
