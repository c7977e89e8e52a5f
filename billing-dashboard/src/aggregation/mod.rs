//! Pure transforms from flat API records to chart-ready rows.
//!
//! Nothing in here performs I/O or keeps state between calls; identical
//! input always yields identical output.

pub mod filter;
pub mod group;
pub mod palette;

pub use filter::{filter_by_equality, filter_by_search, matches_search, FieldFilter, Selection};
pub use group::{
    distinct_keys, group_multi_sum_by_key, group_sum_by_key, KeyOrder, KeyedTotal, KeyedTotals,
};
pub use palette::{assign_categorical_color, with_palette, CHART_PALETTE};
