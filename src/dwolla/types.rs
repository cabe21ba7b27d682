//! Dwolla HAL+JSON bodies

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
}

impl Link {
    pub fn new(href: impl Into<String>) -> Self {
        Self { href: href.into() }
    }
}

/// `_links` relation map
pub type Links = HashMap<String, Link>;

/// Personal (unverified-with-SSN) customer
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCustomer {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(rename = "type")]
    pub customer_type: String,
    pub address1: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub date_of_birth: String,
    pub ssn: String,
}

/// Response of `POST /on-demand-authorizations`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnDemandAuthorization {
    #[serde(rename = "_links")]
    pub links: Links,
    #[serde(default)]
    pub body_text: String,
    #[serde(default)]
    pub button_text: String,
}

impl OnDemandAuthorization {
    /// The authorization resource itself (`_links.self.href`)
    pub fn self_link(&self) -> Option<&Link> {
        self.links.get("self")
    }
}

/// Funding source backed by a Plaid processor token
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFundingSource {
    pub name: String,
    pub plaid_token: String,
    #[serde(rename = "_links", skip_serializing_if = "Links::is_empty")]
    pub links: Links,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Amount {
    pub currency: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewTransfer {
    #[serde(rename = "_links")]
    pub links: Links,
    pub amount: Amount,
}

impl NewTransfer {
    /// Transfer between two funding-source URLs, always in USD
    pub fn usd(source_url: &str, destination_url: &str, value: String) -> Self {
        let mut links = Links::new();
        links.insert("source".to_string(), Link::new(source_url));
        links.insert("destination".to_string(), Link::new(destination_url));
        Self {
            links,
            amount: Amount {
                currency: "USD".to_string(),
                value,
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    /// Seconds
    pub expires_in: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transfer_body_shape() {
        let t = NewTransfer::usd(
            "https://api-sandbox.dwolla.com/funding-sources/src",
            "https://api-sandbox.dwolla.com/funding-sources/dst",
            "10.00".to_string(),
        );
        let v = serde_json::to_value(&t).unwrap();
        assert_eq!(
            v["_links"]["source"]["href"],
            "https://api-sandbox.dwolla.com/funding-sources/src"
        );
        assert_eq!(v["amount"]["currency"], "USD");
        assert_eq!(v["amount"]["value"], "10.00");
    }

    #[test]
    fn test_on_demand_authorization_parses_links() {
        let body = r#"{
            "_links": {"self": {"href": "https://api-sandbox.dwolla.com/on-demand-authorizations/30e7"}},
            "bodyText": "I agree that future payments...",
            "buttonText": "Agree & Continue"
        }"#;
        let auth: OnDemandAuthorization = serde_json::from_str(body).unwrap();
        assert!(auth.self_link().unwrap().href.ends_with("/30e7"));
        assert_eq!(auth.button_text, "Agree & Continue");
    }

    #[test]
    fn test_funding_source_omits_empty_links() {
        let fs = NewFundingSource {
            name: "Checking".to_string(),
            plaid_token: "processor-sandbox-1".to_string(),
            links: Links::new(),
        };
        let v = serde_json::to_value(&fs).unwrap();
        assert_eq!(v["plaidToken"], "processor-sandbox-1");
        assert!(v.get("_links").is_none());
    }
}
