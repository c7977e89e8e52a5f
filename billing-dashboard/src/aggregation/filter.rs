//! Dropdown filters and free-text search.

use serde::{Deserialize, Serialize};

/// Dropdown selection for one categorical field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Selection {
    /// Wildcard, always passes.
    #[default]
    All,
    /// Exact string match.
    Only(String),
}

impl Selection {
    /// `None`, `""` and `"all"` are the wildcard.
    pub fn from_param(param: Option<&str>) -> Self {
        match param.map(str::trim) {
            None | Some("") | Some("all") => Selection::All,
            Some(value) => Selection::Only(value.to_string()),
        }
    }

    pub fn matches(&self, value: &str) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(expected) => expected == value,
        }
    }

    /// The value to forward as a query parameter, if any.
    pub fn as_param(&self) -> Option<&str> {
        match self {
            Selection::All => None,
            Selection::Only(value) => Some(value),
        }
    }
}

/// Field accessor paired with the selection it must satisfy.
pub type FieldFilter<'s, R> = (fn(&R) -> &str, &'s Selection);

/// Keep the records that satisfy every filter.
pub fn filter_by_equality<'r, R>(records: &'r [R], filters: &[FieldFilter<'_, R>]) -> Vec<&'r R> {
    records
        .iter()
        .filter(|record| {
            filters
                .iter()
                .all(|(field, selection)| selection.matches(field(record)))
        })
        .collect()
}

/// Case-insensitive substring match. An empty needle matches everything.
pub fn matches_search(haystack: &str, needle: &str) -> bool {
    let needle = needle.trim();
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Keep the records whose `field` contains `needle`, ignoring case.
pub fn filter_by_search<'r, R>(
    records: &'r [R],
    field: fn(&R) -> &str,
    needle: &str,
) -> Vec<&'r R> {
    records
        .iter()
        .filter(|record| matches_search(field(record), needle))
        .collect()
}
