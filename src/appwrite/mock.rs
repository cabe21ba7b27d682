//! In-memory Appwrite for tests and the `--mock` gateway mode

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;

use super::{
    AppwriteError, DocumentList, DocumentStore, IdentityAccount, IdentityService, Query, Session,
};
use crate::ids::unique_id;

// ============================================================================
// Identity
// ============================================================================

struct StoredAccount {
    account: IdentityAccount,
    password: String,
}

#[derive(Default)]
pub struct MockIdentity {
    accounts: Mutex<Vec<StoredAccount>>,
    /// secret -> account id
    sessions: Mutex<HashMap<String, String>>,
    create_account_count: AtomicUsize,
    delete_session_count: AtomicUsize,
    fail_create_account: AtomicBool,
    fail_delete_session: AtomicBool,
}

impl MockIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_create_account(&self, fail: bool) {
        self.fail_create_account.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_delete_session(&self, fail: bool) {
        self.fail_delete_session.store(fail, Ordering::SeqCst);
    }

    pub fn create_account_count(&self) -> usize {
        self.create_account_count.load(Ordering::SeqCst)
    }

    pub fn delete_session_count(&self) -> usize {
        self.delete_session_count.load(Ordering::SeqCst)
    }

    pub fn account_count(&self) -> usize {
        self.accounts.lock().unwrap().len()
    }

    pub fn active_sessions(&self) -> usize {
        self.sessions.lock().unwrap().len()
    }
}

#[async_trait]
impl IdentityService for MockIdentity {
    async fn create_account(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<IdentityAccount, AppwriteError> {
        self.create_account_count.fetch_add(1, Ordering::SeqCst);

        if self.fail_create_account.load(Ordering::SeqCst) {
            return Err(AppwriteError::Api {
                status: 500,
                kind: "general_mock".to_string(),
                message: "Mock account creation failure".to_string(),
            });
        }

        let mut accounts = self.accounts.lock().unwrap();
        if accounts.iter().any(|a| a.account.email == email) {
            return Err(AppwriteError::Api {
                status: 409,
                kind: "user_already_exists".to_string(),
                message: "A user with the same email already exists".to_string(),
            });
        }

        let account = IdentityAccount {
            id: unique_id(),
            email: email.to_string(),
            name: name.to_string(),
        };
        accounts.push(StoredAccount {
            account: account.clone(),
            password: password.to_string(),
        });
        Ok(account)
    }

    async fn create_email_session(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, AppwriteError> {
        let accounts = self.accounts.lock().unwrap();
        let stored = accounts
            .iter()
            .find(|a| a.account.email == email && a.password == password)
            .ok_or(AppwriteError::Unauthorized)?;

        let session = Session {
            id: unique_id(),
            user_id: stored.account.id.clone(),
            secret: unique_id(),
        };
        self.sessions
            .lock()
            .unwrap()
            .insert(session.secret.clone(), session.user_id.clone());
        Ok(session)
    }

    async fn get_account(&self, session_secret: &str) -> Result<IdentityAccount, AppwriteError> {
        let account_id = self
            .sessions
            .lock()
            .unwrap()
            .get(session_secret)
            .cloned()
            .ok_or(AppwriteError::Unauthorized)?;

        self.accounts
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.account.id == account_id)
            .map(|a| a.account.clone())
            .ok_or(AppwriteError::Unauthorized)
    }

    async fn delete_session(&self, session_secret: &str) -> Result<(), AppwriteError> {
        self.delete_session_count.fetch_add(1, Ordering::SeqCst);

        if self.fail_delete_session.load(Ordering::SeqCst) {
            return Err(AppwriteError::Api {
                status: 503,
                kind: "general_mock".to_string(),
                message: "Mock session revocation failure".to_string(),
            });
        }

        self.sessions
            .lock()
            .unwrap()
            .remove(session_secret)
            .map(|_| ())
            .ok_or(AppwriteError::Unauthorized)
    }
}

// ============================================================================
// Documents
// ============================================================================

/// Appwrite's page size when a list carries no `limit`
pub const DEFAULT_PAGE_SIZE: usize = 25;

pub struct MockDocumentStore {
    collections: Mutex<HashMap<String, Vec<Value>>>,
    create_counts: Mutex<HashMap<String, usize>>,
    list_counts: Mutex<HashMap<String, usize>>,
    /// Collections whose creates fail
    failing: Mutex<Vec<String>>,
    /// Server-side cap applied on top of any requested `limit`
    max_page_size: AtomicUsize,
}

impl Default for MockDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDocumentStore {
    pub fn new() -> Self {
        Self {
            collections: Mutex::new(HashMap::new()),
            create_counts: Mutex::new(HashMap::new()),
            list_counts: Mutex::new(HashMap::new()),
            failing: Mutex::new(Vec::new()),
            max_page_size: AtomicUsize::new(5000),
        }
    }

    pub fn set_max_page_size(&self, size: usize) {
        self.max_page_size.store(size, Ordering::SeqCst);
    }

    pub fn list_calls(&self, collection_id: &str) -> usize {
        self.list_counts
            .lock()
            .unwrap()
            .get(collection_id)
            .copied()
            .unwrap_or(0)
    }

    pub fn set_fail_create(&self, collection_id: &str, fail: bool) {
        let mut failing = self.failing.lock().unwrap();
        failing.retain(|c| c != collection_id);
        if fail {
            failing.push(collection_id.to_string());
        }
    }

    /// Number of create calls against a collection, failed ones included
    pub fn create_count(&self, collection_id: &str) -> usize {
        self.create_counts
            .lock()
            .unwrap()
            .get(collection_id)
            .copied()
            .unwrap_or(0)
    }

    pub fn documents(&self, collection_id: &str) -> Vec<Value> {
        self.collections
            .lock()
            .unwrap()
            .get(collection_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Insert a document directly, bypassing create accounting
    pub fn seed(&self, collection_id: &str, mut document: Value) -> Value {
        stamp(&mut document, &unique_id());
        self.collections
            .lock()
            .unwrap()
            .entry(collection_id.to_string())
            .or_default()
            .push(document.clone());
        document
    }
}

/// Add Appwrite system attributes unless already present
fn stamp(document: &mut Value, document_id: &str) {
    if let Some(obj) = document.as_object_mut() {
        obj.entry("$id")
            .or_insert_with(|| Value::String(document_id.to_string()));
        obj.entry("$createdAt")
            .or_insert_with(|| Value::String(Utc::now().to_rfc3339()));
    }
}

#[async_trait]
impl DocumentStore for MockDocumentStore {
    async fn create_document(
        &self,
        collection_id: &str,
        document_id: &str,
        mut data: Value,
    ) -> Result<Value, AppwriteError> {
        *self
            .create_counts
            .lock()
            .unwrap()
            .entry(collection_id.to_string())
            .or_default() += 1;

        if self
            .failing
            .lock()
            .unwrap()
            .iter()
            .any(|c| c == collection_id)
        {
            return Err(AppwriteError::Api {
                status: 500,
                kind: "general_mock".to_string(),
                message: format!("Mock create failure in {}", collection_id),
            });
        }

        if !data.is_object() {
            return Err(AppwriteError::Api {
                status: 400,
                kind: "document_invalid_structure".to_string(),
                message: "Document data must be an object".to_string(),
            });
        }

        stamp(&mut data, document_id);
        self.collections
            .lock()
            .unwrap()
            .entry(collection_id.to_string())
            .or_default()
            .push(data.clone());
        Ok(data)
    }

    async fn get_document(
        &self,
        collection_id: &str,
        document_id: &str,
    ) -> Result<Value, AppwriteError> {
        self.collections
            .lock()
            .unwrap()
            .get(collection_id)
            .and_then(|docs| docs.iter().find(|d| d["$id"] == document_id).cloned())
            .ok_or_else(|| AppwriteError::DocumentNotFound(document_id.to_string()))
    }

    async fn list_documents(
        &self,
        collection_id: &str,
        queries: &[Query],
    ) -> Result<DocumentList<Value>, AppwriteError> {
        *self
            .list_counts
            .lock()
            .unwrap()
            .entry(collection_id.to_string())
            .or_default() += 1;

        let matching: Vec<Value> = self
            .collections
            .lock()
            .unwrap()
            .get(collection_id)
            .map(|docs| {
                docs.iter()
                    .filter(|d| queries.iter().all(|q| q.matches(d)))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        let start = match queries.iter().find_map(Query::as_cursor_after) {
            Some(cursor) => matching
                .iter()
                .position(|d| d["$id"] == cursor)
                .map(|i| i + 1)
                .ok_or_else(|| AppwriteError::Api {
                    status: 400,
                    kind: "document_not_found".to_string(),
                    message: format!("Cursor document {} not found", cursor),
                })?,
            None => 0,
        };
        let limit = queries
            .iter()
            .find_map(Query::as_limit)
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .min(self.max_page_size.load(Ordering::SeqCst));

        Ok(DocumentList {
            total: matching.len() as u64,
            documents: matching.into_iter().skip(start).take(limit).collect(),
        })
    }
}
