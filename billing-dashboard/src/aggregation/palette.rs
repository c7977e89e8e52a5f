//! Categorical colour assignment for breakdown charts.

/// Chart palette used for product and plan breakdowns.
pub const CHART_PALETTE: [&str; 5] = ["#8b5cf6", "#3b82f6", "#22c55e", "#f59e0b", "#ef4444"];

/// `palette[index mod palette.len()]`.
///
/// Assign at the moment the distinct-category list is built; re-sorting or
/// filtering afterwards must not reassign colours.
///
/// # Panics
///
/// Panics if `palette` is empty.
pub fn assign_categorical_color<'a>(index: usize, palette: &[&'a str]) -> &'a str {
    palette[index % palette.len()]
}

/// Pair each key with its palette colour, in the order given.
pub fn with_palette<'a, I>(keys: I, palette: &[&'a str]) -> Vec<(String, &'a str)>
where
    I: IntoIterator<Item = String>,
{
    keys.into_iter()
        .enumerate()
        .map(|(i, key)| (key, assign_categorical_color(i, palette)))
        .collect()
}
