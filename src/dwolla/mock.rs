//! Recording Dwolla for tests and the `--mock` gateway mode

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;

use super::{
    DwollaError, Link, Links, NewCustomer, NewFundingSource, NewTransfer, OnDemandAuthorization,
    PaymentProcessor,
};
use crate::ids::unique_id;

pub const MOCK_BASE_URL: &str = "https://api-sandbox.dwolla.com";

#[derive(Default)]
pub struct MockProcessor {
    customers: Mutex<Vec<NewCustomer>>,
    /// (customer_id, request)
    funding_sources: Mutex<Vec<(String, NewFundingSource)>>,
    transfers: Mutex<Vec<NewTransfer>>,
    authorization_count: AtomicUsize,
    fail_customer: AtomicBool,
    fail_transfer: AtomicBool,
    /// Answer funding-source creation without a `Location` header
    omit_funding_source_location: AtomicBool,
}

impl MockProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_customer(&self, fail: bool) {
        self.fail_customer.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_transfer(&self, fail: bool) {
        self.fail_transfer.store(fail, Ordering::SeqCst);
    }

    pub fn set_omit_funding_source_location(&self, omit: bool) {
        self.omit_funding_source_location
            .store(omit, Ordering::SeqCst);
    }

    pub fn customers(&self) -> Vec<NewCustomer> {
        self.customers.lock().unwrap().clone()
    }

    pub fn funding_sources(&self) -> Vec<(String, NewFundingSource)> {
        self.funding_sources.lock().unwrap().clone()
    }

    pub fn transfers(&self) -> Vec<NewTransfer> {
        self.transfers.lock().unwrap().clone()
    }

    pub fn authorization_count(&self) -> usize {
        self.authorization_count.load(Ordering::SeqCst)
    }

    fn api_error(message: &str) -> DwollaError {
        DwollaError::Api {
            status: 400,
            code: "ValidationError".to_string(),
            message: message.to_string(),
        }
    }
}

#[async_trait]
impl PaymentProcessor for MockProcessor {
    async fn create_customer(
        &self,
        customer: &NewCustomer,
    ) -> Result<Option<String>, DwollaError> {
        if self.fail_customer.load(Ordering::SeqCst) {
            return Err(Self::api_error("Mock customer failure"));
        }
        self.customers.lock().unwrap().push(customer.clone());
        Ok(Some(format!("{}/customers/{}", MOCK_BASE_URL, unique_id())))
    }

    async fn create_on_demand_authorization(&self) -> Result<OnDemandAuthorization, DwollaError> {
        self.authorization_count.fetch_add(1, Ordering::SeqCst);
        let mut links = Links::new();
        links.insert(
            "self".to_string(),
            Link::new(format!(
                "{}/on-demand-authorizations/{}",
                MOCK_BASE_URL,
                unique_id()
            )),
        );
        Ok(OnDemandAuthorization {
            links,
            body_text: "I agree that future payments will be processed".to_string(),
            button_text: "Agree & Continue".to_string(),
        })
    }

    async fn create_funding_source(
        &self,
        customer_id: &str,
        funding_source: &NewFundingSource,
    ) -> Result<Option<String>, DwollaError> {
        self.funding_sources
            .lock()
            .unwrap()
            .push((customer_id.to_string(), funding_source.clone()));

        if self.omit_funding_source_location.load(Ordering::SeqCst) {
            return Ok(None);
        }
        Ok(Some(format!(
            "{}/funding-sources/{}",
            MOCK_BASE_URL,
            unique_id()
        )))
    }

    async fn create_transfer(&self, transfer: &NewTransfer) -> Result<Option<String>, DwollaError> {
        if self.fail_transfer.load(Ordering::SeqCst) {
            return Err(Self::api_error("Mock transfer failure"));
        }
        self.transfers.lock().unwrap().push(transfer.clone());
        Ok(Some(format!("{}/transfers/{}", MOCK_BASE_URL, unique_id())))
    }
}
