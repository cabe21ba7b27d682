//! Bank linking, linked banks and account views

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::HeaderMap,
};

use super::super::state::AppState;
use super::super::types::{
    ApiResponse, ApiResult, BankView, ExchangeRequest, LinkTokenData, LinkedBankData,
    action_error, created, ok,
};
use super::helpers::{require_owned_bank, require_user};
use crate::models::{AccountDetail, AccountsSummary};
use crate::session::CookieJar;

/// Create a Link token for the signed-in user
///
/// POST /api/v1/banks/link-token
#[utoipa::path(
    post,
    path = "/api/v1/banks/link-token",
    responses(
        (status = 200, description = "Link token", body = ApiResponse<LinkTokenData>),
        (status = 401, description = "Not signed in")
    ),
    tag = "Banks"
)]
pub async fn create_link_token(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<LinkTokenData> {
    let jar = CookieJar::from_headers(&headers);
    let user = require_user(&state, &jar).await?;
    let link_token = state
        .actions
        .users
        .create_link_token(&user)
        .await
        .map_err(action_error)?;
    ok(LinkTokenData { link_token })
}

/// Exchange a public token and link the item's first account
///
/// POST /api/v1/banks/exchange
#[utoipa::path(
    post,
    path = "/api/v1/banks/exchange",
    request_body = ExchangeRequest,
    responses(
        (status = 201, description = "Bank linked", body = ApiResponse<LinkedBankData>),
        (status = 401, description = "Not signed in"),
        (status = 422, description = "Linked item has no accounts"),
        (status = 502, description = "External service failure or funding source not created")
    ),
    tag = "Banks"
)]
pub async fn exchange_public_token(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<ExchangeRequest>,
) -> ApiResult<LinkedBankData> {
    let jar = CookieJar::from_headers(&headers);
    let user = require_user(&state, &jar).await?;
    let bank = state
        .actions
        .users
        .exchange_public_token(&req.public_token, &user)
        .await
        .map_err(action_error)?;
    created(LinkedBankData {
        bank: bank.into(),
        revalidate: "/".to_string(),
    })
}

/// Banks linked by the signed-in user
///
/// GET /api/v1/banks
#[utoipa::path(
    get,
    path = "/api/v1/banks",
    responses(
        (status = 200, description = "Linked banks", body = ApiResponse<Vec<BankView>>),
        (status = 401, description = "Not signed in")
    ),
    tag = "Banks"
)]
pub async fn list_banks(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<Vec<BankView>> {
    let jar = CookieJar::from_headers(&headers);
    let user = require_user(&state, &jar).await?;
    let banks = state
        .actions
        .users
        .get_banks(&user.id)
        .await
        .map_err(action_error)?;
    ok(banks.into_iter().map(BankView::from).collect())
}

/// One linked bank
///
/// GET /api/v1/banks/{id}
#[utoipa::path(
    get,
    path = "/api/v1/banks/{id}",
    params(("id" = String, Path, description = "Bank document id")),
    responses(
        (status = 200, description = "Bank", body = ApiResponse<BankView>),
        (status = 404, description = "Bank not found")
    ),
    tag = "Banks"
)]
pub async fn get_bank(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<BankView> {
    let jar = CookieJar::from_headers(&headers);
    let user = require_user(&state, &jar).await?;
    let bank = require_owned_bank(&state, &user, &id).await?;
    ok(bank.into())
}

/// All accounts of the signed-in user with totals
///
/// GET /api/v1/accounts
#[utoipa::path(
    get,
    path = "/api/v1/accounts",
    responses(
        (status = 200, description = "Accounts summary", body = ApiResponse<AccountsSummary>),
        (status = 401, description = "Not signed in")
    ),
    tag = "Accounts"
)]
pub async fn get_accounts(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<AccountsSummary> {
    let jar = CookieJar::from_headers(&headers);
    let user = require_user(&state, &jar).await?;
    let summary = state
        .actions
        .banks
        .get_accounts(&user.id)
        .await
        .map_err(action_error)?;
    ok(summary)
}

/// One account with merged history, newest first
///
/// GET /api/v1/accounts/{id}
#[utoipa::path(
    get,
    path = "/api/v1/accounts/{id}",
    params(("id" = String, Path, description = "Bank document id (appwriteItemId)")),
    responses(
        (status = 200, description = "Account detail", body = ApiResponse<AccountDetail>),
        (status = 404, description = "Bank not found")
    ),
    tag = "Accounts"
)]
pub async fn get_account(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<AccountDetail> {
    let jar = CookieJar::from_headers(&headers);
    let user = require_user(&state, &jar).await?;
    let bank = require_owned_bank(&state, &user, &id).await?;
    let detail = state
        .actions
        .banks
        .get_account(&bank.id)
        .await
        .map_err(action_error)?;
    ok(detail)
}
