//! Utility functions and helpers

use rust_decimal::Decimal;
use std::cmp::Ordering;

/// Group the digits of an unsigned integer string with a thousands separator
pub fn format_number<T: ToString>(n: T, separator: &str) -> String {
    let s = n.to_string();
    let mut result = String::new();
    let mut count = 0;
    for c in s.chars().rev() {
        if count == 3 {
            result.push_str(&separator.chars().rev().collect::<String>());
            count = 0;
        }
        result.push(c);
        count += 1;
    }
    result.chars().rev().collect()
}

/// Format an amount with a fixed number of decimal places and digit grouping
///
/// `format_amount(dec!(-1234567.891), 2, ",", ".")` gives `"-1,234,567.89"`.
pub fn format_amount(
    amount: Decimal,
    decimal_places: u32,
    thousands_separator: &str,
    decimal_separator: &str,
) -> String {
    let rounded = amount.round_dp(decimal_places);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let plain = format!("{:.*}", decimal_places as usize, rounded.abs());

    let (integer, fraction) = match plain.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (plain.as_str(), None),
    };

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&format_number(integer, thousands_separator));
    if let Some(fraction) = fraction {
        out.push_str(decimal_separator);
        out.push_str(fraction);
    }
    out
}

/// Split a code into alternating digit and non-digit runs
fn code_segments(code: &str) -> Vec<(bool, &str)> {
    let mut segments = Vec::new();
    let mut start = 0;
    let mut current: Option<bool> = None;

    for (idx, c) in code.char_indices() {
        let is_digit = c.is_ascii_digit();
        match current {
            Some(kind) if kind != is_digit => {
                segments.push((kind, &code[start..idx]));
                start = idx;
                current = Some(is_digit);
            }
            None => current = Some(is_digit),
            _ => {}
        }
    }
    if let Some(kind) = current {
        segments.push((kind, &code[start..]));
    }
    segments
}

fn compare_digit_runs(a: &str, b: &str) -> Ordering {
    let a_trimmed = a.trim_start_matches('0');
    let b_trimmed = b.trim_start_matches('0');
    a_trimmed
        .len()
        .cmp(&b_trimmed.len())
        .then_with(|| a_trimmed.cmp(b_trimmed))
}

/// Numeric-aware ordering for account codes.
///
/// Digit runs compare by value, so "9" < "10" and "1-2" < "1-10"; other runs
/// compare case-insensitively. Codes that are equal under those rules fall
/// back to plain byte order so the ordering stays total.
pub fn compare_codes(a: &str, b: &str) -> Ordering {
    let left = code_segments(a);
    let right = code_segments(b);

    for ((a_digit, a_seg), (b_digit, b_seg)) in left.iter().zip(right.iter()) {
        let ord = match (a_digit, b_digit) {
            (true, true) => compare_digit_runs(a_seg, b_seg),
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => a_seg.to_lowercase().cmp(&b_seg.to_lowercase()),
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }

    left.len().cmp(&right.len()).then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(1234567, ","), "1,234,567");
        assert_eq!(format_number(123, ","), "123");
        assert_eq!(format_number(1000, "."), "1.000");
    }

    #[test]
    fn test_format_amount() {
        let amount = Decimal::from_str("-1234567.891").unwrap();
        assert_eq!(format_amount(amount, 2, ",", "."), "-1,234,567.89");

        let amount = Decimal::from_str("1000").unwrap();
        assert_eq!(format_amount(amount, 2, ".", ","), "1.000,00");
        assert_eq!(format_amount(amount, 0, ",", "."), "1,000");
        assert_eq!(format_amount(Decimal::ZERO, 2, ",", "."), "0.00");
    }

    #[test]
    fn test_compare_codes_numeric() {
        assert_eq!(compare_codes("9", "10"), Ordering::Less);
        assert_eq!(compare_codes("1100", "1100"), Ordering::Equal);
        assert_eq!(compare_codes("1-10", "1-2"), Ordering::Greater);
        assert_eq!(compare_codes("5100", "51"), Ordering::Greater);
    }

    #[test]
    fn test_compare_codes_mixed() {
        assert_eq!(compare_codes("A2", "a10"), Ordering::Less);
        assert_eq!(compare_codes("100", "A"), Ordering::Less);
        assert_eq!(compare_codes("007", "7"), Ordering::Less);

        let mut codes = vec!["10", "2", "1.10", "1.9", "1"];
        codes.sort_by(|a, b| compare_codes(a, b));
        assert_eq!(codes, vec!["1", "1.9", "1.10", "2", "10"]);
    }
}
