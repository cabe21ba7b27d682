//! Dwolla: ACH payment processor
//!
//! Every create call answers `201 Created` with the new resource's URL in the
//! `Location` header and no body. The trait surfaces that header as
//! `Option<String>`; callers decide whether a missing location is fatal.

pub mod client;
pub mod error;
#[cfg(any(test, feature = "mock-api"))]
pub mod mock;
pub mod types;

pub use client::DwollaClient;
pub use error::DwollaError;
pub use types::{Link, Links, NewCustomer, NewFundingSource, NewTransfer, OnDemandAuthorization};

use async_trait::async_trait;

#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    async fn create_customer(&self, customer: &NewCustomer)
    -> Result<Option<String>, DwollaError>;

    async fn create_on_demand_authorization(&self) -> Result<OnDemandAuthorization, DwollaError>;

    async fn create_funding_source(
        &self,
        customer_id: &str,
        funding_source: &NewFundingSource,
    ) -> Result<Option<String>, DwollaError>;

    async fn create_transfer(&self, transfer: &NewTransfer) -> Result<Option<String>, DwollaError>;
}
