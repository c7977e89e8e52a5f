//! Group-by-key summation.
//!
//! Keys are opaque strings: two date strings naming the same day in
//! different formats land in different groups. Keys with no records never
//! appear (no zero-fill).

use serde::Serialize;
use std::collections::HashMap;
use std::ops::AddAssign;

/// Output order of grouped rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOrder {
    /// Lexicographic ascending. Use for ISO-formatted date keys.
    Ascending,
    /// Order in which each key was first seen in the input. Use for
    /// categories (product, plan).
    FirstSeen,
}

/// One grouped row with a single running total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyedTotal<V> {
    pub key: String,
    pub total: V,
}

/// One grouped row with `N` running totals, all accumulated from the same
/// subset of records.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyedTotals<V, const N: usize> {
    pub key: String,
    pub totals: [V; N],
}

/// Sum `value_fn` over the records sharing each `key_fn` key.
///
/// Negative contributions are summed as-is. Empty input yields an empty
/// vector.
pub fn group_sum_by_key<R, V, KF, VF>(
    records: &[R],
    key_fn: KF,
    value_fn: VF,
    order: KeyOrder,
) -> Vec<KeyedTotal<V>>
where
    V: Copy + Default + AddAssign,
    KF: Fn(&R) -> &str,
    VF: Fn(&R) -> V,
{
    group_multi_sum_by_key(records, key_fn, [&value_fn as &dyn Fn(&R) -> V], order)
        .into_iter()
        .map(|row| KeyedTotal {
            key: row.key,
            total: row.totals[0],
        })
        .collect()
}

/// Like [`group_sum_by_key`] but with several extractors accumulated in one
/// pass, e.g. quantity and cost per product.
pub fn group_multi_sum_by_key<R, V, KF, const N: usize>(
    records: &[R],
    key_fn: KF,
    extractors: [&dyn Fn(&R) -> V; N],
    order: KeyOrder,
) -> Vec<KeyedTotals<V, N>>
where
    V: Copy + Default + AddAssign,
    KF: Fn(&R) -> &str,
{
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut rows: Vec<KeyedTotals<V, N>> = Vec::new();

    for record in records {
        let key = key_fn(record);
        let index = match positions.get(key) {
            Some(&index) => index,
            None => {
                positions.insert(key.to_string(), rows.len());
                rows.push(KeyedTotals {
                    key: key.to_string(),
                    totals: [V::default(); N],
                });
                rows.len() - 1
            }
        };

        let totals = &mut rows[index].totals;
        for (total, extract) in totals.iter_mut().zip(extractors.iter()) {
            *total += extract(record);
        }
    }

    if order == KeyOrder::Ascending {
        rows.sort_by(|a, b| a.key.cmp(&b.key));
    }

    rows
}

/// Distinct keys in first-seen order.
pub fn distinct_keys<R, KF>(records: &[R], key_fn: KF) -> Vec<String>
where
    KF: Fn(&R) -> &str,
{
    let mut seen = std::collections::HashSet::new();
    records
        .iter()
        .map(|r| key_fn(r))
        .filter(|key| seen.insert(*key))
        .map(str::to_string)
        .collect()
}
