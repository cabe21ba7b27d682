//! Plaid REST client
//!
//! Every endpoint is a JSON `POST` with `client_id` and `secret` merged into
//! the body.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, warn};

use super::types::{InstitutionResponse, ProcessorTokenResponse};
use super::{
    AccountsResponse, Aggregator, CountryCode, Institution, LinkTokenRequest, LinkTokenResponse,
    PlaidError, Processor, PublicTokenExchange, TransactionsSyncPage,
};
use crate::config::PlaidEnvironment;

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error_type: String,
    #[serde(default)]
    error_code: String,
    #[serde(default)]
    error_message: String,
}

pub struct PlaidClient {
    http: reqwest::Client,
    base_url: String,
    client_id: String,
    secret: String,
}

impl PlaidClient {
    pub fn new(
        environment: PlaidEnvironment,
        client_id: String,
        secret: String,
    ) -> Result<Self, PlaidError> {
        Self::with_base_url(environment.base_url().to_string(), client_id, secret)
    }

    pub fn with_base_url(
        base_url: String,
        client_id: String,
        secret: String,
    ) -> Result<Self, PlaidError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            client_id,
            secret,
        })
    }

    /// Body with credentials merged in
    fn authenticated_body<B: Serialize>(&self, body: &B) -> Result<Value, PlaidError> {
        let mut value =
            serde_json::to_value(body).map_err(|e| PlaidError::Decode(e.to_string()))?;
        let obj = value
            .as_object_mut()
            .ok_or_else(|| PlaidError::Decode("request body must be an object".to_string()))?;
        obj.insert("client_id".to_string(), Value::String(self.client_id.clone()));
        obj.insert("secret".to_string(), Value::String(self.secret.clone()));
        Ok(value)
    }

    async fn post<B, R>(&self, path: &'static str, body: &B) -> Result<R, PlaidError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let payload = self.authenticated_body(body)?;
        let response = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return response
                .json()
                .await
                .map_err(|e| PlaidError::Decode(format!("{}: {}", path, e)));
        }

        let body = response.bytes().await?;
        let err = api_error(status, &body);
        warn!(path, status = status.as_u16(), "Plaid request failed: {}", err);
        Err(err)
    }
}

/// Build `PlaidError::Api` from an error response. Bodies that are not a
/// Plaid error object (proxies, load balancers) keep the HTTP status with
/// its canonical reason.
fn api_error(status: StatusCode, body: &[u8]) -> PlaidError {
    let err: ErrorBody = serde_json::from_slice(body).unwrap_or_else(|_| ErrorBody {
        error_type: "API_ERROR".to_string(),
        error_code: String::new(),
        error_message: status.canonical_reason().unwrap_or_default().to_string(),
    });
    PlaidError::Api {
        status: status.as_u16(),
        error_type: err.error_type,
        error_code: err.error_code,
        error_message: err.error_message,
    }
}

#[async_trait]
impl Aggregator for PlaidClient {
    async fn create_link_token(
        &self,
        request: &LinkTokenRequest,
    ) -> Result<LinkTokenResponse, PlaidError> {
        debug!(client_user_id = %request.user.client_user_id, "Creating link token");
        self.post("/link/token/create", request).await
    }

    async fn exchange_public_token(
        &self,
        public_token: &str,
    ) -> Result<PublicTokenExchange, PlaidError> {
        self.post(
            "/item/public_token/exchange",
            &json!({ "public_token": public_token }),
        )
        .await
    }

    async fn get_accounts(&self, access_token: &str) -> Result<AccountsResponse, PlaidError> {
        self.post("/accounts/get", &json!({ "access_token": access_token }))
            .await
    }

    async fn create_processor_token(
        &self,
        access_token: &str,
        account_id: &str,
        processor: Processor,
    ) -> Result<String, PlaidError> {
        let body = json!({
            "access_token": access_token,
            "account_id": account_id,
            "processor": processor,
        });
        let resp: ProcessorTokenResponse = self.post("/processor/token/create", &body).await?;
        Ok(resp.processor_token)
    }

    async fn get_institution(
        &self,
        institution_id: &str,
        country_codes: &[CountryCode],
    ) -> Result<Institution, PlaidError> {
        let body = json!({
            "institution_id": institution_id,
            "country_codes": country_codes,
        });
        let resp: InstitutionResponse = self.post("/institutions/get_by_id", &body).await?;
        Ok(resp.institution)
    }

    async fn sync_transactions(
        &self,
        access_token: &str,
        cursor: Option<&str>,
    ) -> Result<TransactionsSyncPage, PlaidError> {
        let mut body = json!({ "access_token": access_token });
        if let Some(cursor) = cursor {
            body["cursor"] = Value::String(cursor.to_string());
        }
        self.post("/transactions/sync", &body).await
    }
}
