//! Action error types
//!
//! Three families: external-service failures, precondition failures and
//! not-found conditions. Reads that legitimately find nothing return
//! `Ok(None)` instead of `NotFound`.

use thiserror::Error;

use crate::appwrite::AppwriteError;
use crate::dwolla::DwollaError;
use crate::money::MoneyError;
use crate::plaid::PlaidError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ActionError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("Linked item has no accounts")]
    NoAccounts,

    #[error("Funding source was not created")]
    FundingSourceNotCreated,

    #[error("Not signed in")]
    Unauthenticated,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{service} error: {message}")]
    External {
        service: &'static str,
        message: String,
    },
}

impl ActionError {
    pub fn not_found(what: impl Into<String>) -> Self {
        ActionError::NotFound(what.into())
    }

    pub fn external(service: &'static str, message: impl Into<String>) -> Self {
        ActionError::External {
            service,
            message: message.into(),
        }
    }

    /// Get the error code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            ActionError::NotFound(_) => "NOT_FOUND",
            ActionError::NoAccounts => "NO_ACCOUNTS",
            ActionError::FundingSourceNotCreated => "FUNDING_SOURCE_NOT_CREATED",
            ActionError::Unauthenticated => "UNAUTHENTICATED",
            ActionError::InvalidInput(_) => "INVALID_INPUT",
            ActionError::External { .. } => "EXTERNAL_SERVICE_ERROR",
        }
    }

    /// Get HTTP status code suggestion
    pub fn http_status(&self) -> u16 {
        match self {
            ActionError::InvalidInput(_) => 400,
            ActionError::Unauthenticated => 401,
            ActionError::NotFound(_) => 404,
            ActionError::NoAccounts => 422,
            ActionError::FundingSourceNotCreated | ActionError::External { .. } => 502,
        }
    }
}

/// A 401 here comes from an API-key call (bad or under-scoped key).
/// Session-scoped calls map it to `Unauthenticated` themselves.
impl From<AppwriteError> for ActionError {
    fn from(e: AppwriteError) -> Self {
        match e {
            AppwriteError::DocumentNotFound(id) => ActionError::NotFound(format!("Document {}", id)),
            AppwriteError::Api {
                status: 409,
                message,
                ..
            } => ActionError::InvalidInput(message),
            other => ActionError::external("appwrite", other.to_string()),
        }
    }
}

impl From<PlaidError> for ActionError {
    fn from(e: PlaidError) -> Self {
        ActionError::external("plaid", e.to_string())
    }
}

impl From<DwollaError> for ActionError {
    fn from(e: DwollaError) -> Self {
        ActionError::external("dwolla", e.to_string())
    }
}

impl From<MoneyError> for ActionError {
    fn from(e: MoneyError) -> Self {
        ActionError::InvalidInput(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(ActionError::NoAccounts.code(), "NO_ACCOUNTS");
        assert_eq!(
            ActionError::FundingSourceNotCreated.code(),
            "FUNDING_SOURCE_NOT_CREATED"
        );
        assert_eq!(ActionError::Unauthenticated.code(), "UNAUTHENTICATED");
    }

    #[test]
    fn test_http_status() {
        assert_eq!(ActionError::Unauthenticated.http_status(), 401);
        assert_eq!(ActionError::not_found("Bank").http_status(), 404);
        assert_eq!(ActionError::InvalidInput("x".into()).http_status(), 400);
        assert_eq!(ActionError::NoAccounts.http_status(), 422);
        assert_eq!(ActionError::external("plaid", "boom").http_status(), 502);
    }

    #[test]
    fn test_from_appwrite() {
        assert!(matches!(
            ActionError::from(AppwriteError::Unauthorized),
            ActionError::External {
                service: "appwrite",
                ..
            }
        ));
        let dup = AppwriteError::Api {
            status: 409,
            kind: "user_already_exists".into(),
            message: "A user with the same email already exists".into(),
        };
        assert!(matches!(ActionError::from(dup), ActionError::InvalidInput(_)));

        let down = AppwriteError::Api {
            status: 503,
            kind: "general_unknown".into(),
            message: "down".into(),
        };
        assert!(matches!(
            ActionError::from(down),
            ActionError::External {
                service: "appwrite",
                ..
            }
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(ActionError::not_found("Bank").to_string(), "Bank not found");
        assert_eq!(
            ActionError::external("dwolla", "timeout").to_string(),
            "dwolla error: timeout"
        );
    }
}
