use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlaidError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Plaid error object: `error_type` / `error_code` / `error_message`
    #[error("Plaid {error_type}/{error_code}: {error_message}")]
    Api {
        status: u16,
        error_type: String,
        error_code: String,
        error_message: String,
    },

    #[error("Unexpected response: {0}")]
    Decode(String),
}
