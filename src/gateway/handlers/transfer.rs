//! Payment transfers and transfer history

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::HeaderMap,
};

use super::super::state::AppState;
use super::super::types::{ApiResponse, ApiResult, action_error, created, ok};
use super::helpers::{require_owned_bank, require_user};
use crate::actions::PaymentRequest;
use crate::appwrite::DocumentList;
use crate::models::Transaction;
use crate::session::CookieJar;

/// Send money from one of the user's banks to a shareable account id
///
/// POST /api/v1/transfers
#[utoipa::path(
    post,
    path = "/api/v1/transfers",
    request_body = PaymentRequest,
    responses(
        (status = 201, description = "Transfer sent and recorded", body = ApiResponse<Transaction>),
        (status = 400, description = "Invalid amount"),
        (status = 401, description = "Not signed in"),
        (status = 404, description = "Sender or receiver bank not found"),
        (status = 502, description = "Processor failure")
    ),
    tag = "Transfers"
)]
pub async fn send_payment(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<PaymentRequest>,
) -> ApiResult<Transaction> {
    let jar = CookieJar::from_headers(&headers);
    let user = require_user(&state, &jar).await?;
    tracing::info!(user = %user.id, sender_bank = %req.sender_bank_id, "Payment requested");

    let transaction = state
        .actions
        .transactions
        .send_payment(&user, &req)
        .await
        .map_err(action_error)?;
    created(transaction)
}

/// Transfers where the bank is sender or receiver
///
/// GET /api/v1/transactions/{bankId}
#[utoipa::path(
    get,
    path = "/api/v1/transactions/{bankId}",
    params(("bankId" = String, Path, description = "Bank document id")),
    responses(
        (status = 200, description = "Transfer records", body = ApiResponse<DocumentList<Transaction>>),
        (status = 404, description = "Bank not found")
    ),
    tag = "Transfers"
)]
pub async fn get_transactions_by_bank_id(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(bank_id): Path<String>,
) -> ApiResult<DocumentList<Transaction>> {
    let jar = CookieJar::from_headers(&headers);
    let user = require_user(&state, &jar).await?;
    let bank = require_owned_bank(&state, &user, &bank_id).await?;
    let transactions = state
        .actions
        .transactions
        .get_transactions_by_bank_id(&bank.id)
        .await
        .map_err(action_error)?;
    ok(transactions)
}
