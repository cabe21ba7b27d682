//! Public helpers used by clients of the gateway: shareable account ids,
//! processor URLs and USD amounts.

use std::str::FromStr;

use rust_decimal::Decimal;

use banklink::ids::{decrypt_id, encrypt_id, extract_customer_id_from_url};
use banklink::money::{MoneyError, format_amount, parse_amount, transfer_value};

#[test]
fn test_shareable_id_is_standard_base64() {
    assert_eq!(encrypt_id("acc_123"), "YWNjXzEyMw==");
    assert_eq!(decrypt_id("YWNjXzEyMw==").as_deref(), Some("acc_123"));
}

#[test]
fn test_shareable_id_tolerates_surrounding_whitespace() {
    assert_eq!(decrypt_id("  YWNjXzEyMw==\n").as_deref(), Some("acc_123"));
}

#[test]
fn test_customer_id_is_last_url_segment() {
    assert_eq!(
        extract_customer_id_from_url("https://api-sandbox.dwolla.com/customers/FC451A7A-AE30"),
        Some("FC451A7A-AE30")
    );
    assert_eq!(
        extract_customer_id_from_url("https://api.dwolla.com/customers/abc/"),
        Some("abc")
    );
}

#[test]
fn test_amount_parsing_keeps_cents() {
    assert_eq!(parse_amount("25").unwrap(), Decimal::from(25));
    assert_eq!(parse_amount("25.50").unwrap(), Decimal::from_str("25.50").unwrap());
    assert_eq!(parse_amount("0"), Err(MoneyError::InvalidAmount));
    assert!(matches!(
        parse_amount("1.001"),
        Err(MoneyError::PrecisionOverflow { max: 2, .. })
    ));
}

#[test]
fn test_transfer_and_display_forms() {
    let amount = Decimal::from_str("1234.5").unwrap();
    assert_eq!(transfer_value(amount), "1234.50");
    assert_eq!(format_amount(amount), "$1,234.50");
    assert_eq!(format_amount(Decimal::from_str("-3").unwrap()), "-$3.00");
}
