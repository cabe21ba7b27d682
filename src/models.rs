//! Domain models
//!
//! Persisted documents (`User`, `Bank`, `Transaction`) mirror the Appwrite
//! collections field-for-field, so serde names follow the stored camelCase
//! attributes. Read models (`Account`, `AccountTransaction`, ...) are built
//! from aggregator responses and never persisted.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ============================================================================
// Users
// ============================================================================

/// Sign-up form data. The password travels separately.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignUpParams {
    #[schema(example = "Ada")]
    pub first_name: String,
    #[schema(example = "Lovelace")]
    pub last_name: String,
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[serde(default)]
    pub address1: String,
    #[serde(default)]
    pub city: String,
    /// Two-letter state code
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub postal_code: String,
    /// `YYYY-MM-DD`
    #[serde(default)]
    pub date_of_birth: String,
    /// Last four digits are enough for the processor's personal customers
    #[serde(default)]
    pub ssn: String,
}

/// User profile document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "$id")]
    pub id: String,
    /// Identity-service account id
    pub user_id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub address1: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub date_of_birth: String,
    #[serde(default)]
    pub ssn: String,
    pub dwolla_customer_id: String,
    pub dwolla_customer_url: String,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Fields written when a user document is created
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub user_id: String,
    #[serde(flatten)]
    pub profile: SignUpParams,
    pub dwolla_customer_id: String,
    pub dwolla_customer_url: String,
}

// ============================================================================
// Banks
// ============================================================================

/// Linked bank account document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bank {
    #[serde(rename = "$id")]
    pub id: String,
    pub user_id: String,
    /// Aggregator item id
    pub bank_id: String,
    pub account_id: String,
    pub access_token: String,
    pub funding_source_url: String,
    pub shareable_id: String,
}

/// Fields written when a bank document is created
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBank {
    pub user_id: String,
    pub bank_id: String,
    pub account_id: String,
    pub access_token: String,
    pub funding_source_url: String,
    pub shareable_id: String,
}

// ============================================================================
// Transactions (transfer records)
// ============================================================================

/// Transfer record document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(rename = "$id")]
    pub id: String,
    pub name: String,
    #[schema(value_type = String, example = "25.00")]
    pub amount: Decimal,
    pub sender_id: String,
    pub sender_bank_id: String,
    pub receiver_id: String,
    pub receiver_bank_id: String,
    pub email: String,
    pub channel: String,
    pub category: String,
    #[serde(rename = "$createdAt", default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

/// Caller-supplied transfer record fields. Channel and category are fixed
/// by `TransactionActions::create_transaction`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    pub name: String,
    pub amount: Decimal,
    pub sender_id: String,
    pub sender_bank_id: String,
    pub receiver_id: String,
    pub receiver_bank_id: String,
    pub email: String,
}

// ============================================================================
// Read models
// ============================================================================

/// One linked account as shown on the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    #[schema(value_type = Option<String>)]
    pub available_balance: Option<Decimal>,
    #[schema(value_type = String)]
    pub current_balance: Decimal,
    pub institution_id: Option<String>,
    pub name: String,
    pub official_name: Option<String>,
    pub mask: Option<String>,
    #[serde(rename = "type")]
    pub account_type: String,
    pub subtype: Option<String>,
    /// Bank document id
    pub appwrite_item_id: String,
    pub shareable_id: String,
}

/// Direction of a transfer relative to the viewed bank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Debit,
    Credit,
}

/// Row of an account's merged history (transfers + aggregator transactions)
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountTransaction {
    pub id: String,
    pub name: String,
    pub payment_channel: String,
    #[serde(rename = "type")]
    pub direction: Direction,
    pub account_id: String,
    #[schema(value_type = String)]
    pub amount: Decimal,
    pub pending: bool,
    pub category: String,
    pub date: DateTime<Utc>,
    pub image: Option<String>,
}

/// All accounts of a user with totals
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountsSummary {
    pub data: Vec<Account>,
    pub total_banks: usize,
    #[schema(value_type = String)]
    pub total_current_balance: Decimal,
}

/// One account with its history, newest first
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AccountDetail {
    pub data: Account,
    pub transactions: Vec<AccountTransaction>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_document_round_trip_uses_stored_names() {
        let doc = json!({
            "$id": "doc1",
            "$createdAt": "2024-01-01T00:00:00.000+00:00",
            "userId": "u1",
            "email": "a@b.com",
            "firstName": "A",
            "lastName": "B",
            "dwollaCustomerId": "c1",
            "dwollaCustomerUrl": "https://api-sandbox.dwolla.com/customers/c1"
        });

        let user: User = serde_json::from_value(doc).unwrap();
        assert_eq!(user.id, "doc1");
        assert_eq!(user.user_id, "u1");
        assert_eq!(user.full_name(), "A B");
        assert_eq!(user.city, "");

        let back = serde_json::to_value(&user).unwrap();
        assert_eq!(back["dwollaCustomerId"], "c1");
        assert_eq!(back["$id"], "doc1");
    }

    #[test]
    fn test_new_user_flattens_profile() {
        let new_user = NewUser {
            user_id: "u1".to_string(),
            profile: SignUpParams {
                first_name: "A".to_string(),
                last_name: "B".to_string(),
                email: "a@b.com".to_string(),
                address1: String::new(),
                city: String::new(),
                state: "NY".to_string(),
                postal_code: String::new(),
                date_of_birth: String::new(),
                ssn: String::new(),
            },
            dwolla_customer_id: "c1".to_string(),
            dwolla_customer_url: "url".to_string(),
        };

        let value = serde_json::to_value(&new_user).unwrap();
        assert_eq!(value["firstName"], "A");
        assert_eq!(value["state"], "NY");
        assert_eq!(value["userId"], "u1");
        assert!(value.get("profile").is_none());
    }

    #[test]
    fn test_transaction_amount_accepts_string_and_number() {
        let base = json!({
            "$id": "t1",
            "name": "rent",
            "senderId": "s",
            "senderBankId": "sb",
            "receiverId": "r",
            "receiverBankId": "rb",
            "email": "r@b.com",
            "channel": "Online",
            "category": "Transfer",
            "$createdAt": "2024-05-01T10:00:00.000+00:00"
        });

        let mut as_string = base.clone();
        as_string["amount"] = json!("12.50");
        let mut as_number = base;
        as_number["amount"] = json!(12.5);

        let a: Transaction = serde_json::from_value(as_string).unwrap();
        let b: Transaction = serde_json::from_value(as_number).unwrap();
        assert_eq!(a.amount, b.amount);
        assert_eq!(a.amount, Decimal::new(1250, 2));
    }

    #[test]
    fn test_account_serializes_type_field() {
        let account = Account {
            id: "a1".to_string(),
            available_balance: None,
            current_balance: Decimal::new(100, 0),
            institution_id: None,
            name: "Checking".to_string(),
            official_name: None,
            mask: Some("0000".to_string()),
            account_type: "depository".to_string(),
            subtype: Some("checking".to_string()),
            appwrite_item_id: "b1".to_string(),
            shareable_id: "c2hhcmU=".to_string(),
        };
        let value = serde_json::to_value(&account).unwrap();
        assert_eq!(value["type"], "depository");
        assert_eq!(value["appwriteItemId"], "b1");
    }
}
