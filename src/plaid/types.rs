//! Plaid request/response bodies (only the fields this service reads)

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Product {
    Auth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CountryCode {
    #[serde(rename = "US")]
    Us,
}

/// Downstream integration a processor token is minted for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Processor {
    Dwolla,
}

// ============================================================================
// /link/token/create
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkTokenUser {
    pub client_user_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkTokenRequest {
    pub user: LinkTokenUser,
    pub client_name: String,
    pub products: Vec<Product>,
    pub language: String,
    pub country_codes: Vec<CountryCode>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LinkTokenResponse {
    pub link_token: String,
    #[serde(default)]
    pub expiration: Option<String>,
}

// ============================================================================
// /item/public_token/exchange
// ============================================================================

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PublicTokenExchange {
    pub access_token: String,
    pub item_id: String,
}

// ============================================================================
// /accounts/get
// ============================================================================

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Balances {
    #[serde(default)]
    pub available: Option<Decimal>,
    #[serde(default)]
    pub current: Option<Decimal>,
    #[serde(default)]
    pub iso_currency_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlaidAccount {
    pub account_id: String,
    pub balances: Balances,
    #[serde(default)]
    pub mask: Option<String>,
    pub name: String,
    #[serde(default)]
    pub official_name: Option<String>,
    #[serde(rename = "type")]
    pub account_type: String,
    #[serde(default)]
    pub subtype: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Item {
    pub item_id: String,
    #[serde(default)]
    pub institution_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AccountsResponse {
    pub accounts: Vec<PlaidAccount>,
    pub item: Item,
}

// ============================================================================
// /processor/token/create
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ProcessorTokenResponse {
    pub processor_token: String,
}

// ============================================================================
// /institutions/get_by_id
// ============================================================================

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Institution {
    pub institution_id: String,
    pub name: String,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct InstitutionResponse {
    pub institution: Institution,
}

// ============================================================================
// /transactions/sync
// ============================================================================

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PersonalFinanceCategory {
    pub primary: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlaidTransaction {
    pub transaction_id: String,
    pub account_id: String,
    pub name: String,
    /// Positive values are money leaving the account
    pub amount: Decimal,
    #[serde(default)]
    pub payment_channel: String,
    #[serde(default)]
    pub pending: bool,
    #[serde(default)]
    pub category: Option<Vec<String>>,
    #[serde(default)]
    pub personal_finance_category: Option<PersonalFinanceCategory>,
    pub date: NaiveDate,
    #[serde(default)]
    pub logo_url: Option<String>,
}

impl PlaidTransaction {
    /// Prefer the personal-finance category, fall back to the legacy list head
    pub fn primary_category(&self) -> String {
        self.personal_finance_category
            .as_ref()
            .map(|c| c.primary.clone())
            .or_else(|| self.category.as_ref().and_then(|c| c.first().cloned()))
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransactionsSyncPage {
    pub added: Vec<PlaidTransaction>,
    pub next_cursor: String,
    pub has_more: bool,
}
