//! API Response types and error codes
//!
//! - `ApiResponse<T>`: Unified response wrapper
//! - `error_codes`: Standard error code constants
//! - Request/response DTOs that differ from the domain models

use axum::Json;
use axum::http::{HeaderMap, StatusCode};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::actions::ActionError;
use crate::models::{Bank, SignUpParams, User};

// ============================================================================
// Unified API Response Format
// ============================================================================

/// Unified API response wrapper
///
/// - code: 0 = success, non-zero = error code
/// - msg: short message description
/// - data: actual data (success) or absent (error)
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response code: 0 for success, non-zero for errors
    #[schema(example = 0)]
    pub code: i32,
    /// Response message
    #[schema(example = "ok")]
    pub msg: String,
    /// Response data (only present when code == 0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            code: error_codes::SUCCESS,
            msg: "ok".to_string(),
            data: Some(data),
        }
    }

    pub fn error(code: i32, msg: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            code,
            msg: msg.into(),
            data: None,
        }
    }
}

pub type ApiError = (StatusCode, Json<ApiResponse<()>>);
pub type ApiResult<T> = Result<(StatusCode, Json<ApiResponse<T>>), ApiError>;
/// Responses that may carry `Set-Cookie` headers
pub type CookieResult<T> = Result<(StatusCode, HeaderMap, Json<ApiResponse<T>>), ApiError>;

pub fn ok<T>(data: T) -> ApiResult<T> {
    Ok((StatusCode::OK, Json(ApiResponse::success(data))))
}

pub fn created<T>(data: T) -> ApiResult<T> {
    Ok((StatusCode::CREATED, Json(ApiResponse::success(data))))
}

pub fn api_error(status: StatusCode, code: i32, msg: impl Into<String>) -> ApiError {
    (status, Json(ApiResponse::<()>::error(code, msg)))
}

/// Map an action failure to status + numeric code. The message leads with
/// the stable string code. External messages are not echoed to clients.
pub fn action_error(e: ActionError) -> ApiError {
    let status =
        StatusCode::from_u16(e.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let code = match &e {
        ActionError::InvalidInput(_) => error_codes::INVALID_PARAMETER,
        ActionError::NoAccounts => error_codes::NO_ACCOUNTS,
        ActionError::Unauthenticated => error_codes::AUTH_FAILED,
        ActionError::NotFound(_) => error_codes::NOT_FOUND,
        ActionError::FundingSourceNotCreated => error_codes::FUNDING_SOURCE_NOT_CREATED,
        ActionError::External { .. } => error_codes::EXTERNAL_SERVICE,
    };
    let detail = match &e {
        ActionError::External { service, .. } => format!("{} request failed", service),
        other => other.to_string(),
    };
    let msg = format!("{}: {}", e.code(), detail);
    api_error(status, code, msg)
}

// ============================================================================
// Request DTOs
// ============================================================================

#[derive(Debug, Deserialize, ToSchema)]
pub struct SignUpRequest {
    #[schema(example = "correct horse battery staple")]
    pub password: String,
    #[serde(flatten)]
    pub profile: SignUpParams,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SignInRequest {
    #[schema(example = "ada@example.com")]
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRequest {
    /// Token returned by the Link flow
    #[schema(example = "public-sandbox-b0e2c4ee")]
    pub public_token: String,
}

// ============================================================================
// Response DTOs
// ============================================================================

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LinkTokenData {
    pub link_token: String,
}

/// Profile fields safe to return to the signed-in user. Address, date of
/// birth and SSN stay server-side.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: String,
    pub user_id: String,
    #[schema(example = "ada@example.com")]
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            user_id: user.user_id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
        }
    }
}

/// Bank document without its aggregator access token
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BankView {
    pub id: String,
    pub user_id: String,
    pub bank_id: String,
    pub account_id: String,
    pub funding_source_url: String,
    pub shareable_id: String,
}

impl From<Bank> for BankView {
    fn from(bank: Bank) -> Self {
        Self {
            id: bank.id,
            user_id: bank.user_id,
            bank_id: bank.bank_id,
            account_id: bank.account_id,
            funding_source_url: bank.funding_source_url,
            shareable_id: bank.shareable_id,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LinkedBankData {
    pub bank: BankView,
    /// Client view to refresh
    #[schema(example = "/")]
    pub revalidate: String,
}

// ============================================================================
// Error Codes
// ============================================================================

/// Standard API error codes
pub mod error_codes {
    // Success
    pub const SUCCESS: i32 = 0;

    // Client errors (1xxx)
    pub const INVALID_PARAMETER: i32 = 1001;
    pub const NO_ACCOUNTS: i32 = 1002;

    // Auth errors (2xxx)
    pub const MISSING_AUTH: i32 = 2001;
    pub const AUTH_FAILED: i32 = 2002;

    // Resource errors (4xxx)
    pub const NOT_FOUND: i32 = 4001;

    // Server errors (5xxx)
    pub const EXTERNAL_SERVICE: i32 = 5002;
    pub const FUNDING_SOURCE_NOT_CREATED: i32 = 5003;
}
