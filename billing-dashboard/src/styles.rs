//! Read-only lookup tables from record values to presentation tokens.
//!
//! Built once on first use and never mutated.

use crate::models::PipelineStatus;
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;

/// Colour intent of a badge; the renderer owns the actual palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Success,
    Danger,
    Warning,
    Info,
    Accent,
    Muted,
}

/// Icon and tone for a pipeline run status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusIcon {
    pub icon: &'static str,
    pub tone: Tone,
}

static INVOICE_STATUS_TONES: Lazy<HashMap<&'static str, Tone>> = Lazy::new(|| {
    HashMap::from([
        ("issued", Tone::Info),
        ("paid", Tone::Success),
        ("draft", Tone::Muted),
    ])
});

static CUSTOMER_STATUS_TONES: Lazy<HashMap<&'static str, Tone>> = Lazy::new(|| {
    HashMap::from([
        ("active", Tone::Success),
        ("churned", Tone::Danger),
        ("trial", Tone::Warning),
    ])
});

static PLAN_TONES: Lazy<HashMap<&'static str, Tone>> = Lazy::new(|| {
    HashMap::from([
        ("plan_free", Tone::Muted),
        ("plan_starter", Tone::Info),
        ("plan_pro", Tone::Accent),
        ("plan_enterprise", Tone::Warning),
    ])
});

const PENDING_ICON: StatusIcon = StatusIcon {
    icon: "clock",
    tone: Tone::Muted,
};

static PIPELINE_ICONS: Lazy<HashMap<PipelineStatus, StatusIcon>> = Lazy::new(|| {
    HashMap::from([
        (
            PipelineStatus::Success,
            StatusIcon {
                icon: "check-circle",
                tone: Tone::Success,
            },
        ),
        (
            PipelineStatus::Failed,
            StatusIcon {
                icon: "x-circle",
                tone: Tone::Danger,
            },
        ),
        (
            PipelineStatus::Running,
            StatusIcon {
                icon: "loader",
                tone: Tone::Info,
            },
        ),
        (PipelineStatus::Pending, PENDING_ICON),
    ])
});

static COUNTRY_FLAGS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("US", "\u{1F1FA}\u{1F1F8}"),
        ("GB", "\u{1F1EC}\u{1F1E7}"),
        ("DE", "\u{1F1E9}\u{1F1EA}"),
        ("FR", "\u{1F1EB}\u{1F1F7}"),
        ("JP", "\u{1F1EF}\u{1F1F5}"),
        ("CA", "\u{1F1E8}\u{1F1E6}"),
        ("AU", "\u{1F1E6}\u{1F1FA}"),
        ("BR", "\u{1F1E7}\u{1F1F7}"),
        ("IN", "\u{1F1EE}\u{1F1F3}"),
    ])
});

pub fn invoice_status_tone(status: &str) -> Tone {
    INVOICE_STATUS_TONES
        .get(status)
        .copied()
        .unwrap_or(Tone::Muted)
}

pub fn customer_status_tone(status: &str) -> Tone {
    CUSTOMER_STATUS_TONES
        .get(status)
        .copied()
        .unwrap_or(Tone::Muted)
}

/// Unknown plans render like the free plan.
pub fn plan_tone(plan_id: &str) -> Tone {
    PLAN_TONES.get(plan_id).copied().unwrap_or(Tone::Muted)
}

pub fn pipeline_icon(status: PipelineStatus) -> StatusIcon {
    PIPELINE_ICONS
        .get(&status)
        .copied()
        .unwrap_or(PENDING_ICON)
}

/// Empty string for countries without a flag entry.
pub fn country_flag(country: &str) -> &'static str {
    COUNTRY_FLAGS.get(country).copied().unwrap_or("")
}
