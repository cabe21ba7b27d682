//! USD amount handling
//!
//! Amounts cross three boundaries with different shapes:
//! - client input: a plain decimal string, at most 2 fractional digits
//! - Dwolla transfer bodies: `value` as a string with exactly 2 decimals
//! - dashboard display: `$1,234.50`
//!
//! Internally everything is `rust_decimal::Decimal`.

use rust_decimal::Decimal;
use thiserror::Error;

/// Cents
pub const USD_DECIMALS: u32 = 2;

#[derive(Debug, Error, PartialEq)]
pub enum MoneyError {
    #[error("Precision overflow: provided {provided} decimals, max allowed {max}")]
    PrecisionOverflow { provided: u32, max: u32 },

    #[error("Amount must be positive")]
    InvalidAmount,

    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Parse a client-supplied USD amount such as `"25"` or `"25.50"`.
///
/// No silent rounding: more than two fractional digits is an error.
pub fn parse_amount(amount_str: &str) -> Result<Decimal, MoneyError> {
    let amount_str = amount_str.trim();
    if amount_str.is_empty() {
        return Err(MoneyError::InvalidFormat("empty string".into()));
    }
    if amount_str.starts_with('-') || amount_str.starts_with('+') {
        return Err(MoneyError::InvalidAmount);
    }
    if !amount_str.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return Err(MoneyError::InvalidFormat(format!(
            "invalid character in {:?}",
            amount_str
        )));
    }
    if amount_str.starts_with('.') || amount_str.ends_with('.') {
        return Err(MoneyError::InvalidFormat(
            "use 0.5 instead of .5 and 5.0 instead of 5.".into(),
        ));
    }

    let amount: Decimal = amount_str
        .parse()
        .map_err(|_| MoneyError::InvalidFormat(amount_str.to_string()))?;

    validate_amount(amount)
}

/// Check an amount that already arrived as a `Decimal`
pub fn validate_amount(amount: Decimal) -> Result<Decimal, MoneyError> {
    if amount.is_sign_negative() || amount.is_zero() {
        return Err(MoneyError::InvalidAmount);
    }
    if amount.scale() > USD_DECIMALS && amount.normalize().scale() > USD_DECIMALS {
        return Err(MoneyError::PrecisionOverflow {
            provided: amount.normalize().scale(),
            max: USD_DECIMALS,
        });
    }
    Ok(amount)
}

/// Wire form for transfer bodies: always two decimals, no symbol
pub fn transfer_value(amount: Decimal) -> String {
    format!("{:.2}", amount.round_dp(USD_DECIMALS))
}

/// Display form: `$1,234.50`, `-$3.00`
pub fn format_amount(amount: Decimal) -> String {
    let rounded = amount.round_dp(USD_DECIMALS);
    let plain = format!("{:.2}", rounded.abs());
    let (whole, frac) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{}${}.{}", sign, grouped, frac)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_amount_accepts_cents() {
        assert_eq!(parse_amount("25").unwrap(), dec("25"));
        assert_eq!(parse_amount(" 25.5 ").unwrap(), dec("25.5"));
        assert_eq!(parse_amount("0.01").unwrap(), dec("0.01"));
    }

    #[test]
    fn test_parse_amount_rejects() {
        assert_eq!(parse_amount("0"), Err(MoneyError::InvalidAmount));
        assert_eq!(parse_amount("-1"), Err(MoneyError::InvalidAmount));
        assert!(matches!(
            parse_amount("1.234"),
            Err(MoneyError::PrecisionOverflow {
                provided: 3,
                max: 2
            })
        ));
        assert!(matches!(parse_amount(""), Err(MoneyError::InvalidFormat(_))));
        assert!(matches!(parse_amount(".5"), Err(MoneyError::InvalidFormat(_))));
        assert!(matches!(parse_amount("5."), Err(MoneyError::InvalidFormat(_))));
        assert!(matches!(parse_amount("1e3"), Err(MoneyError::InvalidFormat(_))));
        assert!(matches!(parse_amount("1.2.3"), Err(MoneyError::InvalidFormat(_))));
    }

    #[test]
    fn test_trailing_zeros_are_not_precision() {
        assert_eq!(validate_amount(dec("10.500")).unwrap(), dec("10.500"));
    }

    #[test]
    fn test_transfer_value_two_decimals() {
        assert_eq!(transfer_value(dec("25")), "25.00");
        assert_eq!(transfer_value(dec("25.5")), "25.50");
    }

    #[test]
    fn test_format_amount_display() {
        assert_eq!(format_amount(dec("0")), "$0.00");
        assert_eq!(format_amount(dec("999.9")), "$999.90");
        assert_eq!(format_amount(dec("1234.5")), "$1,234.50");
        assert_eq!(format_amount(dec("1234567.891")), "$1,234,567.89");
        assert_eq!(format_amount(dec("-3")), "-$3.00");
    }
}
