use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

/// Parse a display amount such as `"750,000.00"` or `"₦ 1,200.5"` into an exact decimal.
/// Thousands separators, whitespace and currency symbols are ignored.
pub fn parse_currency(text: &str) -> Option<Decimal> {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    if cleaned.is_empty() || !cleaned.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }
    Decimal::from_str(&cleaned).ok()
}

/// Format with two decimals and comma thousands separators, prefixed by `symbol`.
pub fn format_currency(amount: Decimal, symbol: &str) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let plain = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if negative { "-" } else { "" };
    format!("{sign}{symbol}{grouped}.{frac_part}")
}

/// Sum display amounts; entries that do not parse contribute zero.
pub fn sum_currency<'a>(amounts: impl IntoIterator<Item = &'a str>) -> Decimal {
    amounts
        .into_iter()
        .map(|text| {
            parse_currency(text).unwrap_or_else(|| {
                log::warn!("Unparseable amount {text:?} counted as zero");
                Decimal::ZERO
            })
        })
        .sum()
}
