//! Sign-up, sign-in, logout and current-user handlers.
//! The session secret travels in the `appwrite-session` cookie.

use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
};

use super::super::state::AppState;
use super::super::types::{
    ApiResponse, ApiResult, CookieResult, SignInRequest, SignUpRequest, UserView, action_error,
    api_error, error_codes, ok,
};
use super::helpers::with_cookies;
use crate::session::CookieJar;

/// Register a new user
///
/// POST /api/v1/auth/sign-up
#[utoipa::path(
    post,
    path = "/api/v1/auth/sign-up",
    request_body = SignUpRequest,
    responses(
        (status = 201, description = "User created and signed in", body = ApiResponse<UserView>),
        (status = 400, description = "Invalid input or email already registered"),
        (status = 502, description = "External service failure")
    ),
    tag = "Auth"
)]
pub async fn sign_up(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<SignUpRequest>,
) -> CookieResult<UserView> {
    if req.profile.email.is_empty() || req.password.is_empty() {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            error_codes::INVALID_PARAMETER,
            "Email and password are required",
        ));
    }

    let jar = CookieJar::from_headers(&headers);
    let user = state
        .actions
        .users
        .sign_up(&req.password, req.profile, &jar)
        .await
        .map_err(action_error)?;
    with_cookies(&jar, StatusCode::CREATED, user.into())
}

/// Sign in with email and password
///
/// POST /api/v1/auth/sign-in
#[utoipa::path(
    post,
    path = "/api/v1/auth/sign-in",
    request_body = SignInRequest,
    responses(
        (status = 200, description = "Signed in", body = ApiResponse<UserView>),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "Auth"
)]
pub async fn sign_in(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<SignInRequest>,
) -> CookieResult<UserView> {
    let jar = CookieJar::from_headers(&headers);
    let user = state
        .actions
        .users
        .sign_in(&req.email, &req.password, &jar)
        .await
        .map_err(|e| {
            tracing::warn!("Sign-in rejected: {}", e);
            action_error(e)
        })?;
    with_cookies(&jar, StatusCode::OK, user.into())
}

/// Clear the session cookie and revoke the session
///
/// POST /api/v1/auth/logout
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    responses(
        (status = 200, description = "Signed out (always succeeds)")
    ),
    tag = "Auth"
)]
pub async fn logout(State(state): State<Arc<AppState>>, headers: HeaderMap) -> CookieResult<()> {
    let jar = CookieJar::from_headers(&headers);
    state.actions.users.logout_account(&jar).await;
    with_cookies(&jar, StatusCode::OK, ())
}

/// Current user, or `null` without a valid session
///
/// GET /api/v1/auth/me
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    responses(
        (status = 200, description = "Signed-in user or null", body = ApiResponse<UserView>)
    ),
    tag = "Auth"
)]
pub async fn me(State(state): State<Arc<AppState>>, headers: HeaderMap) -> ApiResult<Option<UserView>> {
    let jar = CookieJar::from_headers(&headers);
    let user = state
        .actions
        .users
        .get_logged_in_user(&jar)
        .await
        .map_err(action_error)?;
    ok(user.map(UserView::from))
}
