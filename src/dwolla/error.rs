use thiserror::Error;

#[derive(Debug, Error)]
pub enum DwollaError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Dwolla returned {status} ({code}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    #[error("OAuth token request failed: {0}")]
    Auth(String),

    #[error("Unexpected response: {0}")]
    Decode(String),
}
