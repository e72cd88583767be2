use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Returns the first value whose trimmed form is non-empty, trimmed.
pub fn coalesce<'a, I>(values: I) -> String
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    values
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|value| !value.is_empty())
        .map(str::to_string)
        .unwrap_or_default()
}

/// Trims a raw cell and collapses spreadsheet null markers (`nan`, `none`) to empty.
pub fn clean_cell(value: &str) -> String {
    let trimmed = value.trim();
    if is_null_marker(trimmed) {
        String::new()
    } else {
        trimmed.to_string()
    }
}

fn is_null_marker(value: &str) -> bool {
    value.eq_ignore_ascii_case("nan") || value.eq_ignore_ascii_case("none")
}

/// Repairs street numbers that went through a float column (`123.0` -> `123`).
///
/// Alphanumeric values such as `12A` and fractional values such as `45.50` are kept verbatim.
pub fn clean_street_number(value: &str) -> String {
    let mut cleaned = clean_cell(value);
    while let Some(rest) = cleaned.strip_suffix(".0") {
        cleaned = rest.trim().to_string();
    }
    if cleaned.is_empty() || is_null_marker(&cleaned) {
        return String::new();
    }

    match cleaned.parse::<f64>() {
        // `+ 0.0` folds negative zero so "-0" renders as "0".
        Ok(number) if number.is_finite() && number.fract() == 0.0 => format!("{:.0}", number + 0.0),
        _ => cleaned,
    }
}

fn strip_currency(value: &str) -> String {
    value.replace(['$', ','], "").trim().to_string()
}

fn parse_decimal(value: &str) -> Option<Decimal> {
    let cleaned = strip_currency(value);
    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .ok()
}

/// Parses a ledger balance; empty or malformed values count as zero.
pub fn parse_balance(value: &str) -> Decimal {
    parse_decimal(value).unwrap_or(Decimal::ZERO)
}

/// Formats `1234.5` as `$1,234.50`. Non-numeric input yields an empty string.
pub fn format_money(value: &str) -> String {
    parse_decimal(value).map(format_amount).unwrap_or_default()
}

pub fn format_amount(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let rendered = format!("{:.2}", rounded);
    let (sign, unsigned) = match rendered.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", rendered.as_str()),
    };
    let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, "00"));
    format!("${sign}{}.{fraction}", group_thousands(whole))
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

/// Association matching key: lower-cased with whitespace runs collapsed.
pub fn normalize_key(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    cleaned
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
