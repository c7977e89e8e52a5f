//! Display formatting for amounts, counts, identifiers and dates.
//!
//! Everything is rendered for the `en-US` locale only.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::{Decimal, RoundingStrategy};

/// Identifier prefixes dropped when turning ids into labels.
const LABEL_PREFIXES: [&str; 2] = ["prod_", "plan_"];

/// Currency symbols as `en-US` renders them. Codes not listed are written
/// as `CODE` followed by a no-break space.
fn currency_symbol(code: &str) -> Option<&'static str> {
    match code {
        "USD" => Some("$"),
        "EUR" => Some("€"),
        "GBP" => Some("£"),
        "JPY" => Some("¥"),
        "CAD" => Some("CA$"),
        "AUD" => Some("A$"),
        "INR" => Some("₹"),
        "BRL" => Some("R$"),
        "CNY" => Some("CN¥"),
        "MXN" => Some("MX$"),
        _ => None,
    }
}

/// `$1,234.50`. Always two fraction digits, whatever the currency's own
/// minor unit; midpoints round away from zero.
pub fn format_currency(amount: Decimal, currency: &str) -> String {
    let (negative, digits) = fixed_digits(amount, 2);
    let sign = if negative { "-" } else { "" };
    let code = currency.trim().to_ascii_uppercase();

    match currency_symbol(&code) {
        Some(symbol) => format!("{}{}{}", sign, symbol, digits),
        None => format!("{}{}\u{a0}{}", sign, code, digits),
    }
}

/// `1,234,567`. Up to three fraction digits, trailing zeros dropped.
pub fn format_number(value: Decimal) -> String {
    let rounded = value
        .round_dp_with_strategy(3, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let text = rounded.abs().to_string();

    let grouped = match text.split_once('.') {
        Some((int_part, frac_part)) => format!("{}.{}", group_thousands(int_part), frac_part),
        None => group_thousands(&text),
    };

    if negative {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Whole-number rendering used for counters (customers, invoices, events).
pub fn format_count(value: Decimal) -> String {
    format_number(value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
}

/// `prod_cloud_storage` -> `Cloud Storage`, `plan_pro` -> `Pro`.
pub fn format_category_label(raw: &str) -> String {
    let stripped = LABEL_PREFIXES
        .iter()
        .find_map(|prefix| raw.strip_prefix(prefix))
        .unwrap_or(raw);

    stripped
        .split('_')
        .filter(|segment| !segment.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

/// First eight characters of an id followed by `...`.
pub fn short_id(id: &str) -> String {
    let prefix: String = id.chars().take(8).collect();
    format!("{}...", prefix)
}

/// `2024-01-02` -> `Jan 2`. Unparseable input is returned unchanged.
pub fn format_short_date(date: &str) -> String {
    parse_date(date)
        .map(|d| d.format("%b %-d").to_string())
        .unwrap_or_else(|| date.to_string())
}

/// `2024-01-02` -> `Jan 2, 2024`.
pub fn format_long_date(date: &str) -> String {
    parse_date(date)
        .map(|d| d.format("%b %-d, %Y").to_string())
        .unwrap_or_else(|| date.to_string())
}

/// `Jan 1 - Jan 31, 2024`.
pub fn format_period(start: &str, end: &str) -> String {
    format!("{} - {}", format_short_date(start), format_long_date(end))
}

/// `2024-01-02T15:04:00` -> `Tue, Jan 2, 2024, 03:04 PM`.
pub fn format_timestamp(ts: &str) -> String {
    parse_timestamp(ts)
        .map(|t| t.format("%a, %b %-d, %Y, %I:%M %p").to_string())
        .unwrap_or_else(|| ts.to_string())
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    let day = value.get(..10).unwrap_or(value);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    if let Ok(t) = DateTime::parse_from_rfc3339(value) {
        return Some(t.naive_local());
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| parse_date(value).and_then(|d| d.and_hms_opt(0, 0, 0)))
}

fn fixed_digits(value: Decimal, dp: u32) -> (bool, String) {
    let rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let text = format!("{:.*}", dp as usize, rounded.abs());

    let digits = match text.split_once('.') {
        Some((int_part, frac_part)) => format!("{}.{}", group_thousands(int_part), frac_part),
        None => group_thousands(&text),
    };

    (negative, digits)
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    out
}

fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
