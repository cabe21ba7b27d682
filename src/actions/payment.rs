//! Processor adapter: internal parameters in, Dwolla calls out.
//! One request per call, no retry.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{debug, error, info};

use super::ActionError;
use crate::dwolla::{Links, NewCustomer, NewFundingSource, NewTransfer, PaymentProcessor};
use crate::money;

#[derive(Clone)]
pub struct PaymentActions {
    processor: Arc<dyn PaymentProcessor>,
}

impl PaymentActions {
    pub fn new(processor: Arc<dyn PaymentProcessor>) -> Self {
        Self { processor }
    }

    /// Create a customer and return its location URL
    pub async fn create_dwolla_customer(
        &self,
        customer: &NewCustomer,
    ) -> Result<String, ActionError> {
        let location = self
            .processor
            .create_customer(customer)
            .await
            .inspect_err(|e| error!(email = %customer.email, "Creating a Dwolla customer failed: {}", e))?;

        location.ok_or_else(|| {
            error!(email = %customer.email, "Dwolla customer created without a location");
            ActionError::external("dwolla", "customer location missing")
        })
    }

    pub async fn create_on_demand_authorization(&self) -> Result<Links, ActionError> {
        let authorization = self
            .processor
            .create_on_demand_authorization()
            .await
            .inspect_err(|e| error!("Creating an on-demand authorization failed: {}", e))?;
        debug!(
            authorization = authorization.self_link().map_or("", |l| l.href.as_str()),
            "On-demand authorization created"
        );
        Ok(authorization.links)
    }

    /// Register a funding source. A response without a location counts as
    /// not created.
    pub async fn create_funding_source(
        &self,
        customer_id: &str,
        funding_source_name: &str,
        plaid_token: &str,
        links: Links,
    ) -> Result<String, ActionError> {
        let request = NewFundingSource {
            name: funding_source_name.to_string(),
            plaid_token: plaid_token.to_string(),
            links,
        };

        let location = self
            .processor
            .create_funding_source(customer_id, &request)
            .await
            .inspect_err(|e| error!(customer_id, "Creating a funding source failed: {}", e))?;

        match location {
            Some(url) if !url.is_empty() => Ok(url),
            _ => {
                error!(customer_id, "Funding source response had no location");
                Err(ActionError::FundingSourceNotCreated)
            }
        }
    }

    /// On-demand authorization, then funding-source registration
    pub async fn add_funding_source(
        &self,
        dwolla_customer_id: &str,
        processor_token: &str,
        bank_name: &str,
    ) -> Result<String, ActionError> {
        let links = self.create_on_demand_authorization().await?;
        let url = self
            .create_funding_source(dwolla_customer_id, bank_name, processor_token, links)
            .await?;
        info!(customer_id = dwolla_customer_id, funding_source = %url, "Funding source added");
        Ok(url)
    }

    /// Move `amount` USD between two funding sources; returns the transfer URL
    pub async fn create_transfer(
        &self,
        source_funding_source_url: &str,
        destination_funding_source_url: &str,
        amount: Decimal,
    ) -> Result<String, ActionError> {
        let request = NewTransfer::usd(
            source_funding_source_url,
            destination_funding_source_url,
            money::transfer_value(amount),
        );

        let location = self
            .processor
            .create_transfer(&request)
            .await
            .inspect_err(|e| error!(%amount, "Transfer creation failed: {}", e))?;

        location.ok_or_else(|| {
            error!(%amount, "Transfer created without a location");
            ActionError::external("dwolla", "transfer location missing")
        })
    }
}
