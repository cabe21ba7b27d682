//! Appwrite: identity and document store
//!
//! Two seams over the same REST API:
//! - [`IdentityService`]: accounts and email/password sessions
//! - [`DocumentStore`]: untyped document create/get/list with equality filters
//!
//! [`Collection`] layers a typed view over one collection of a
//! [`DocumentStore`]. [`AppwriteClient`] implements both traits over HTTP;
//! the in-memory [`mock`] store backs tests and the `--mock` gateway mode.

pub mod client;
pub mod collection;
pub mod error;
#[cfg(any(test, feature = "mock-api"))]
pub mod mock;
pub mod query;

pub use client::AppwriteClient;
pub use collection::Collection;
pub use error::AppwriteError;
pub use query::Query;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identity-service account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityAccount {
    #[serde(rename = "$id")]
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: String,
}

/// Email/password session. `secret` is only populated for server-key calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(rename = "$id")]
    pub id: String,
    pub user_id: String,
    #[serde(default)]
    pub secret: String,
}

/// List envelope returned by document queries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct DocumentList<T> {
    pub total: u64,
    pub documents: Vec<T>,
}

impl<T> DocumentList<T> {
    /// Concatenate two result sets; totals add.
    pub fn chain(mut self, other: DocumentList<T>) -> Self {
        self.total += other.total;
        self.documents.extend(other.documents);
        self
    }
}

#[async_trait]
pub trait IdentityService: Send + Sync {
    async fn create_account(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<IdentityAccount, AppwriteError>;

    async fn create_email_session(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, AppwriteError>;

    /// Resolve the account owning `session_secret`.
    /// Fails with [`AppwriteError::Unauthorized`] for unknown/expired secrets.
    async fn get_account(&self, session_secret: &str) -> Result<IdentityAccount, AppwriteError>;

    /// Revoke the session identified by `session_secret`
    async fn delete_session(&self, session_secret: &str) -> Result<(), AppwriteError>;
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn create_document(
        &self,
        collection_id: &str,
        document_id: &str,
        data: Value,
    ) -> Result<Value, AppwriteError>;

    async fn get_document(
        &self,
        collection_id: &str,
        document_id: &str,
    ) -> Result<Value, AppwriteError>;

    async fn list_documents(
        &self,
        collection_id: &str,
        queries: &[Query],
    ) -> Result<DocumentList<Value>, AppwriteError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_list_chain_adds_totals() {
        let a = DocumentList {
            total: 2,
            documents: vec![1, 2],
        };
        let b = DocumentList {
            total: 1,
            documents: vec![3],
        };
        let merged = a.chain(b);
        assert_eq!(merged.total, 3);
        assert_eq!(merged.documents, vec![1, 2, 3]);
    }

    #[test]
    fn test_session_secret_defaults_empty() {
        let s: Session =
            serde_json::from_str(r#"{"$id":"s1","userId":"u1"}"#).expect("session json");
        assert_eq!(s.secret, "");
        assert_eq!(s.user_id, "u1");
    }
}
