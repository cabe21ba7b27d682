//! Handler helper functions
//!
//! Session resolution and response shaping shared by the handlers.

use axum::Json;
use axum::http::{HeaderMap, StatusCode};

use super::super::state::AppState;
use super::super::types::{ApiError, ApiResponse, CookieResult, action_error, api_error, error_codes};
use crate::models::{Bank, User};
use crate::session::CookieJar;

/// Resolve the signed-in user or fail with 401
pub async fn require_user(state: &AppState, jar: &CookieJar) -> Result<User, ApiError> {
    state
        .actions
        .users
        .get_logged_in_user(jar)
        .await
        .map_err(action_error)?
        .ok_or_else(|| api_error(StatusCode::UNAUTHORIZED, error_codes::MISSING_AUTH, "Not signed in"))
}

/// Load a bank document owned by `user`. Other users' banks read as missing.
pub async fn require_owned_bank(
    state: &AppState,
    user: &User,
    bank_id: &str,
) -> Result<Bank, ApiError> {
    state
        .actions
        .users
        .get_bank(bank_id)
        .await
        .map_err(action_error)?
        .filter(|bank| bank.user_id == user.id)
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, error_codes::NOT_FOUND, "Bank not found"))
}

/// Success response carrying the jar's pending `Set-Cookie` headers
pub fn with_cookies<T>(jar: &CookieJar, status: StatusCode, data: T) -> CookieResult<T> {
    let mut headers = HeaderMap::new();
    jar.write_headers(&mut headers);
    Ok((status, headers, Json(ApiResponse::success(data))))
}

/// Current time in milliseconds
pub fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
