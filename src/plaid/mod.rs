//! Plaid: bank-data aggregator
//!
//! Account linking is a token handshake:
//!
//! ```text
//! link_token ──(Link UI)──▶ public_token ──exchange──▶ access_token + item_id
//!                                                         │
//!                                   processor_token ◀─────┘ (per account, per processor)
//! ```

pub mod client;
pub mod error;
#[cfg(any(test, feature = "mock-api"))]
pub mod mock;
pub mod types;

pub use client::PlaidClient;
pub use error::PlaidError;
pub use types::{
    AccountsResponse, CountryCode, Institution, LinkTokenRequest, LinkTokenResponse,
    LinkTokenUser, PlaidAccount, PlaidTransaction, Processor, Product, PublicTokenExchange,
    TransactionsSyncPage,
};

use async_trait::async_trait;

#[async_trait]
pub trait Aggregator: Send + Sync {
    async fn create_link_token(
        &self,
        request: &LinkTokenRequest,
    ) -> Result<LinkTokenResponse, PlaidError>;

    async fn exchange_public_token(
        &self,
        public_token: &str,
    ) -> Result<PublicTokenExchange, PlaidError>;

    async fn get_accounts(&self, access_token: &str) -> Result<AccountsResponse, PlaidError>;

    async fn create_processor_token(
        &self,
        access_token: &str,
        account_id: &str,
        processor: Processor,
    ) -> Result<String, PlaidError>;

    async fn get_institution(
        &self,
        institution_id: &str,
        country_codes: &[CountryCode],
    ) -> Result<Institution, PlaidError>;

    /// One page of `/transactions/sync`. `cursor = None` starts from the beginning.
    async fn sync_transactions(
        &self,
        access_token: &str,
        cursor: Option<&str>,
    ) -> Result<TransactionsSyncPage, PlaidError>;
}
