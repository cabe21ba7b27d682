//! Appwrite REST client
//!
//! Server-side calls authenticate with the project API key
//! (`X-Appwrite-Key`). Calls made on behalf of a signed-in user carry the
//! session secret in `X-Appwrite-Session` instead.

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::debug;

use super::{
    AppwriteError, DocumentList, DocumentStore, IdentityAccount, IdentityService, Query, Session,
};
use crate::config::AppwriteConfig;

/// Appwrite's error body
#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default, rename = "type")]
    kind: String,
}

pub struct AppwriteClient {
    http: reqwest::Client,
    endpoint: String,
    project_id: String,
    database_id: String,
    api_key: String,
}

impl AppwriteClient {
    pub fn new(config: &AppwriteConfig, api_key: String) -> Result<Self, AppwriteError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            project_id: config.project_id.clone(),
            database_id: config.database_id.clone(),
            api_key,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.endpoint, path)
    }

    fn documents_path(&self, collection_id: &str) -> String {
        format!(
            "/databases/{}/collections/{}/documents",
            self.database_id, collection_id
        )
    }

    /// Request authenticated with the server API key
    fn admin(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, self.url(path))
            .header("X-Appwrite-Project", &self.project_id)
            .header("X-Appwrite-Key", &self.api_key)
    }

    /// Request made on behalf of the session owner
    fn as_session(&self, method: Method, path: &str, secret: &str) -> RequestBuilder {
        self.http
            .request(method, self.url(path))
            .header("X-Appwrite-Project", &self.project_id)
            .header("X-Appwrite-Session", secret)
    }

    async fn send<R: DeserializeOwned>(&self, request: RequestBuilder) -> Result<R, AppwriteError> {
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response.json().await?);
        }

        let body: ErrorBody = response.json().await.unwrap_or(ErrorBody {
            message: status.canonical_reason().unwrap_or_default().to_string(),
            kind: String::new(),
        });
        debug!(status = status.as_u16(), kind = %body.kind, "Appwrite error response");

        Err(match status {
            StatusCode::UNAUTHORIZED => AppwriteError::Unauthorized,
            _ => AppwriteError::Api {
                status: status.as_u16(),
                kind: body.kind,
                message: body.message,
            },
        })
    }
}

#[async_trait]
impl IdentityService for AppwriteClient {
    async fn create_account(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<IdentityAccount, AppwriteError> {
        let body = json!({
            "userId": "unique()",
            "email": email,
            "password": password,
            "name": name,
        });
        self.send(self.admin(Method::POST, "/account").json(&body))
            .await
    }

    async fn create_email_session(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, AppwriteError> {
        let body = json!({ "email": email, "password": password });
        self.send(self.admin(Method::POST, "/account/sessions/email").json(&body))
            .await
    }

    async fn get_account(&self, session_secret: &str) -> Result<IdentityAccount, AppwriteError> {
        self.send(self.as_session(Method::GET, "/account", session_secret))
            .await
    }

    async fn delete_session(&self, session_secret: &str) -> Result<(), AppwriteError> {
        let request = self.as_session(
            Method::DELETE,
            "/account/sessions/current",
            session_secret,
        );
        let response = request.send().await?;
        match response.status() {
            s if s.is_success() => Ok(()),
            StatusCode::UNAUTHORIZED => Err(AppwriteError::Unauthorized),
            s => Err(AppwriteError::Api {
                status: s.as_u16(),
                kind: String::new(),
                message: response.text().await.unwrap_or_default(),
            }),
        }
    }
}

#[async_trait]
impl DocumentStore for AppwriteClient {
    async fn create_document(
        &self,
        collection_id: &str,
        document_id: &str,
        data: Value,
    ) -> Result<Value, AppwriteError> {
        let body = json!({ "documentId": document_id, "data": data });
        let path = self.documents_path(collection_id);
        self.send(self.admin(Method::POST, &path).json(&body)).await
    }

    async fn get_document(
        &self,
        collection_id: &str,
        document_id: &str,
    ) -> Result<Value, AppwriteError> {
        let path = format!("{}/{}", self.documents_path(collection_id), document_id);
        match self.send(self.admin(Method::GET, &path)).await {
            Err(AppwriteError::Api { status: 404, .. }) => {
                Err(AppwriteError::DocumentNotFound(document_id.to_string()))
            }
            other => other,
        }
    }

    async fn list_documents(
        &self,
        collection_id: &str,
        queries: &[Query],
    ) -> Result<DocumentList<Value>, AppwriteError> {
        let params: Vec<(&str, String)> = queries
            .iter()
            .map(|q| ("queries[]", q.to_param()))
            .collect();
        let path = self.documents_path(collection_id);
        self.send(self.admin(Method::GET, &path).query(&params))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AppwriteConfig {
        AppwriteConfig {
            endpoint: "https://cloud.appwrite.io/v1/".to_string(),
            project_id: "proj".to_string(),
            database_id: "db".to_string(),
            user_collection_id: "users".to_string(),
            bank_collection_id: "banks".to_string(),
            transaction_collection_id: "transactions".to_string(),
        }
    }

    #[test]
    fn test_documents_path() {
        let client = AppwriteClient::new(&config(), "key".to_string()).unwrap();
        assert_eq!(
            client.url(&client.documents_path("banks")),
            "https://cloud.appwrite.io/v1/databases/db/collections/banks/documents"
        );
    }
}
