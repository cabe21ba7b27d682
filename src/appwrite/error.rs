use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppwriteError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-2xx response. `kind` is Appwrite's `type` field, e.g. `user_already_exists`.
    #[error("Appwrite returned {status} ({kind}): {message}")]
    Api {
        status: u16,
        kind: String,
        message: String,
    },

    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    #[error("Session is missing or expired")]
    Unauthorized,

    #[error("Malformed document: {0}")]
    Decode(#[from] serde_json::Error),
}

impl AppwriteError {
    /// True for conditions callers treat as "no such thing" rather than failure
    pub fn is_not_found(&self) -> bool {
        matches!(self, AppwriteError::DocumentNotFound(_))
            || matches!(self, AppwriteError::Api { status: 404, .. })
    }
}
