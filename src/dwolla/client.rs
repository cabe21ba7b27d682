//! Dwolla REST client
//!
//! Authenticates with the OAuth client-credentials grant. The application
//! token is cached and refreshed a minute before it expires.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE, LOCATION};
use serde::Deserialize;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::types::TokenResponse;
use super::{
    DwollaError, NewCustomer, NewFundingSource, NewTransfer, OnDemandAuthorization,
    PaymentProcessor,
};
use crate::config::DwollaEnvironment;

const HAL_JSON: &str = "application/vnd.dwolla.v1.hal+json";
const TOKEN_REFRESH_MARGIN: Duration = Duration::from_secs(60);

struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

pub struct DwollaClient {
    http: reqwest::Client,
    base_url: String,
    key: String,
    secret: String,
    token: Mutex<Option<CachedToken>>,
}

impl DwollaClient {
    pub fn new(
        environment: DwollaEnvironment,
        key: String,
        secret: String,
    ) -> Result<Self, DwollaError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        info!(environment = ?environment, "Dwolla client configured");
        Ok(Self {
            http,
            base_url: environment.base_url().to_string(),
            key,
            secret,
            token: Mutex::new(None),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn access_token(&self) -> Result<String, DwollaError> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref()
            && token.expires_at > Instant::now()
        {
            return Ok(token.access_token.clone());
        }

        debug!("Requesting Dwolla application token");
        let response = self
            .http
            .post(self.url("/token"))
            .basic_auth(&self.key, Some(&self.secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(DwollaError::Auth(format!(
                "status {}",
                response.status().as_u16()
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| DwollaError::Auth(e.to_string()))?;
        let lifetime = Duration::from_secs(token.expires_in).saturating_sub(TOKEN_REFRESH_MARGIN);
        *cached = Some(CachedToken {
            access_token: token.access_token.clone(),
            expires_at: Instant::now() + lifetime,
        });
        Ok(token.access_token)
    }

    /// POST a HAL+JSON body and return the raw response once it is known to be 2xx
    async fn post_hal<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<reqwest::Response, DwollaError> {
        let token = self.access_token().await?;
        let response = self
            .http
            .post(self.url(path))
            .bearer_auth(token)
            .header(ACCEPT, HAL_JSON)
            .header(CONTENT_TYPE, HAL_JSON)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let err: ErrorBody = response.json().await.unwrap_or(ErrorBody {
            code: String::new(),
            message: status.canonical_reason().unwrap_or_default().to_string(),
        });
        warn!(path, status = status.as_u16(), code = %err.code, "Dwolla request failed");
        Err(DwollaError::Api {
            status: status.as_u16(),
            code: err.code,
            message: err.message,
        })
    }

    /// POST and return the `Location` of the created resource
    async fn create<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Option<String>, DwollaError> {
        let response = self.post_hal(path, body).await?;
        Ok(response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string))
    }
}

#[async_trait]
impl PaymentProcessor for DwollaClient {
    async fn create_customer(
        &self,
        customer: &NewCustomer,
    ) -> Result<Option<String>, DwollaError> {
        self.create("/customers", customer).await
    }

    async fn create_on_demand_authorization(&self) -> Result<OnDemandAuthorization, DwollaError> {
        let response = self
            .post_hal("/on-demand-authorizations", &serde_json::json!({}))
            .await?;
        response
            .json()
            .await
            .map_err(|e| DwollaError::Decode(e.to_string()))
    }

    async fn create_funding_source(
        &self,
        customer_id: &str,
        funding_source: &NewFundingSource,
    ) -> Result<Option<String>, DwollaError> {
        let path = format!("/customers/{}/funding-sources", customer_id);
        self.create(&path, funding_source).await
    }

    async fn create_transfer(&self, transfer: &NewTransfer) -> Result<Option<String>, DwollaError> {
        self.create("/transfers", transfer).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_base_urls() {
        let sandbox =
            DwollaClient::new(DwollaEnvironment::Sandbox, "k".to_string(), "s".to_string())
                .unwrap();
        assert_eq!(
            sandbox.url("/customers"),
            "https://api-sandbox.dwolla.com/customers"
        );

        let prod =
            DwollaClient::new(DwollaEnvironment::Production, "k".to_string(), "s".to_string())
                .unwrap();
        assert_eq!(prod.url("/transfers"), "https://api.dwolla.com/transfers");
    }
}
