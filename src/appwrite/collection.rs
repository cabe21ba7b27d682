//! Typed view over one Appwrite collection

use std::marker::PhantomData;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::{AppwriteError, DocumentList, DocumentStore, Query};
use crate::ids::unique_id;

/// Documents requested per list call
const LIST_PAGE_SIZE: usize = 100;

pub struct Collection<T> {
    store: Arc<dyn DocumentStore>,
    collection_id: String,
    _doc: PhantomData<fn() -> T>,
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            collection_id: self.collection_id.clone(),
            _doc: PhantomData,
        }
    }
}

impl<T: DeserializeOwned> Collection<T> {
    pub fn new(store: Arc<dyn DocumentStore>, collection_id: impl Into<String>) -> Self {
        Self {
            store,
            collection_id: collection_id.into(),
            _doc: PhantomData,
        }
    }

    /// Create a document with a fresh id and return it as stored
    pub async fn create<F: Serialize + Sync>(&self, fields: &F) -> Result<T, AppwriteError> {
        let data = serde_json::to_value(fields)?;
        let created = self
            .store
            .create_document(&self.collection_id, &unique_id(), data)
            .await?;
        Ok(serde_json::from_value(created)?)
    }

    pub async fn get(&self, document_id: &str) -> Result<T, AppwriteError> {
        let doc = self
            .store
            .get_document(&self.collection_id, document_id)
            .await?;
        Ok(serde_json::from_value(doc)?)
    }

    /// `get`, with not-found mapped to `None`
    pub async fn find(&self, document_id: &str) -> Result<Option<T>, AppwriteError> {
        match self.get(document_id).await {
            Ok(doc) => Ok(Some(doc)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Every document matching `queries`. Appwrite caps each response
    /// (25 by default), so pages are fetched with a cursor until `total`
    /// documents have arrived or a short page ends the listing.
    pub async fn list(&self, queries: &[Query]) -> Result<DocumentList<T>, AppwriteError> {
        let mut total;
        let mut raw = Vec::new();
        loop {
            let mut page_queries = queries.to_vec();
            page_queries.push(Query::limit(LIST_PAGE_SIZE));
            if let Some(last_id) = raw.last().and_then(|d: &Value| d["$id"].as_str()) {
                page_queries.push(Query::cursor_after(last_id));
            }

            let page = self
                .store
                .list_documents(&self.collection_id, &page_queries)
                .await?;
            total = page.total;
            let fetched = page.documents.len();
            raw.extend(page.documents);

            if fetched == 0 || raw.len() as u64 >= total {
                break;
            }
        }

        let documents = raw
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<T>, _>>()?;
        Ok(DocumentList { total, documents })
    }
}
