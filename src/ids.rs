//! Identifier helpers
//!
//! - `encrypt_id` / `decrypt_id`: shareable form of an aggregator account id.
//!   This is an encoding (standard base64), not encryption. It only keeps raw
//!   account ids out of URLs and copy/paste flows.
//! - `extract_customer_id_from_url`: Dwolla returns created customers as a
//!   `Location` URL whose last path segment is the customer id.
//! - `unique_id`: document id for Appwrite creates.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Encode an account id into its shareable form.
pub fn encrypt_id(id: &str) -> String {
    STANDARD.encode(id.as_bytes())
}

/// Decode a shareable id. Returns `None` when the input is not valid base64
/// or does not decode to UTF-8.
pub fn decrypt_id(shareable_id: &str) -> Option<String> {
    let bytes = STANDARD.decode(shareable_id.trim()).ok()?;
    String::from_utf8(bytes).ok()
}

/// Last non-empty path segment of a resource URL.
///
/// `https://api-sandbox.dwolla.com/customers/abc-123` -> `abc-123`
pub fn extract_customer_id_from_url(url: &str) -> Option<&str> {
    url.trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty() && !segment.contains(':'))
}

/// Appwrite document ids: at most 36 chars of `[a-zA-Z0-9._-]`.
pub fn unique_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shareable_id_decodes_to_account_id() {
        let shared = encrypt_id("vzeNDwK7KQIm4yEog683uElbp9GRLEFXGK98D");
        assert_ne!(shared, "vzeNDwK7KQIm4yEog683uElbp9GRLEFXGK98D");
        assert_eq!(
            decrypt_id(&shared).as_deref(),
            Some("vzeNDwK7KQIm4yEog683uElbp9GRLEFXGK98D")
        );
    }

    #[test]
    fn test_decrypt_rejects_garbage() {
        assert_eq!(decrypt_id("***not base64***"), None);
        // Valid base64, invalid UTF-8
        assert_eq!(decrypt_id("//79"), None);
    }

    #[test]
    fn test_extract_customer_id() {
        assert_eq!(
            extract_customer_id_from_url(
                "https://api-sandbox.dwolla.com/customers/fc451a7a-ae30-4404-aB95-e3553fcd733f"
            ),
            Some("fc451a7a-ae30-4404-aB95-e3553fcd733f")
        );
        assert_eq!(
            extract_customer_id_from_url("https://api.dwolla.com/customers/abc/"),
            Some("abc")
        );
        assert_eq!(extract_customer_id_from_url(""), None);
        assert_eq!(extract_customer_id_from_url("https://"), None);
    }

    #[test]
    fn test_unique_id_shape() {
        let id = unique_id();
        assert_eq!(id.len(), 32);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(id, unique_id());
    }
}
