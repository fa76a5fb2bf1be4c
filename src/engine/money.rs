// src/engine/money.rs

use crate::models::MoneyInput;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Round to 2 decimal places, half-up. Every figure leaving the engine goes
/// through this, so downstream comparisons are exact.
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Normalize a form-level money value. Numbers pass through; strings go
/// through the locale heuristic. Unparseable input is `0`, never an error —
/// a transient invalid keystroke must not crash a live-editing form.
pub fn parse_money(input: &MoneyInput) -> Decimal {
    match input {
        MoneyInput::Number(n) => round2(Decimal::from_f64_retain(*n).unwrap_or_default()),
        MoneyInput::Text(s) => parse_money_str(s),
    }
}

/// Parse a locale-formatted amount, tolerant of currency text, spaces and
/// thousands separators. A comma directly followed by 1–2 trailing digits is
/// treated as the decimal separator; every other comma is a thousands mark.
pub fn parse_money_str(input: &str) -> Decimal {
    let cleaned: String = input
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, ',' | '.' | '-'))
        .collect();

    let normalized = match cleaned.rfind(',') {
        Some(pos) => {
            let tail = &cleaned[pos + 1..];
            if (1..=2).contains(&tail.len()) && tail.chars().all(|c| c.is_ascii_digit()) {
                // decimal comma: drop grouping marks from the integer part
                let mut normalized: String = cleaned[..pos]
                    .chars()
                    .filter(|c| c.is_ascii_digit() || *c == '-')
                    .collect();
                normalized.push('.');
                normalized.push_str(tail);
                normalized
            } else {
                cleaned.chars().filter(|c| *c != ',').collect()
            }
        }
        None => cleaned,
    };

    Decimal::from_str(&normalized).map(round2).unwrap_or_default()
}

/// Render with the fixed locale: space-grouped thousands, decimal comma,
/// trailing currency code. `parse_money_str(format_money(x)) == round2(x)`.
pub fn format_money(value: Decimal) -> String {
    let rounded = round2(value);
    let text = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(ch);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}{grouped},{frac_part} MAD")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn parses_plain_numbers() {
        assert_eq!(parse_money_str("6000"), dec!(6000));
        assert_eq!(parse_money_str("123.45"), dec!(123.45));
        assert_eq!(parse_money_str("-42.5"), dec!(-42.5));
    }

    #[test]
    fn comma_followed_by_two_digits_is_the_decimal_separator() {
        assert_eq!(parse_money_str("1 234,56"), dec!(1234.56));
        assert_eq!(parse_money_str("1.234,56"), dec!(1234.56));
        assert_eq!(parse_money_str("0,5"), dec!(0.5));
    }

    #[test]
    fn other_commas_are_thousands_separators() {
        assert_eq!(parse_money_str("1,234.56"), dec!(1234.56));
        assert_eq!(parse_money_str("12,345,678"), dec!(12345678));
    }

    #[test]
    fn currency_text_and_spaces_are_ignored() {
        assert_eq!(parse_money_str("1 234,50 MAD"), dec!(1234.50));
        assert_eq!(parse_money_str("MAD 6 000"), dec!(6000));
    }

    #[test]
    fn unparseable_input_defaults_to_zero() {
        assert_eq!(parse_money_str(""), dec!(0));
        assert_eq!(parse_money_str("abc"), dec!(0));
        assert_eq!(parse_money_str("--"), dec!(0));
    }

    #[test]
    fn rounds_half_up() {
        assert_eq!(round2(dec!(1.005)), dec!(1.01));
        assert_eq!(round2(dec!(2.344)), dec!(2.34));
        assert_eq!(round2(dec!(-1.005)), dec!(-1.01));
    }

    #[test]
    fn formats_with_grouped_thousands_and_decimal_comma() {
        assert_eq!(format_money(dec!(1234567.891)), "1 234 567,89 MAD");
        assert_eq!(format_money(dec!(0)), "0,00 MAD");
        assert_eq!(format_money(dec!(-42.5)), "-42,50 MAD");
    }

    #[test]
    fn format_round_trips_through_parse() {
        for value in [
            dec!(0),
            dec!(0.5),
            dec!(999.999),
            dec!(1234.56),
            dec!(6000),
            dec!(1234567.891),
            dec!(-1234.5),
        ] {
            assert_eq!(parse_money_str(&format_money(value)), round2(value));
        }
    }

    #[test]
    fn numeric_input_passes_through() {
        assert_eq!(parse_money(&MoneyInput::Number(6000.0)), dec!(6000));
        assert_eq!(parse_money(&MoneyInput::Number(123.456)), dec!(123.46));
        assert_eq!(
            parse_money(&MoneyInput::Text("1 234,56".to_string())),
            dec!(1234.56)
        );
    }
}
