//! Health check handler

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};
use utoipa::ToSchema;

use super::super::state::AppState;
use super::super::types::ApiResponse;
use super::helpers::now_ms;

/// Health check response data
#[derive(serde::Serialize, ToSchema)]
pub struct HealthResponse {
    /// Server timestamp in milliseconds
    #[schema(example = 1703494800000_u64)]
    pub timestamp_ms: u64,
    #[schema(example = 3600)]
    pub uptime_secs: u64,
    /// Build commit
    #[schema(example = "a1b2c3d")]
    pub git_hash: String,
}

/// Health check endpoint
///
/// Liveness only. External services are not called, so an outage there
/// shows up on the affected endpoints instead.
#[utoipa::path(
    get,
    path = "/api/v1/health",
    responses(
        (status = 200, description = "Service healthy", body = HealthResponse, content_type = "application/json")
    ),
    tag = "System"
)]
pub async fn health_check(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<ApiResponse<HealthResponse>>) {
    (
        StatusCode::OK,
        Json(ApiResponse::success(HealthResponse {
            timestamp_ms: now_ms(),
            uptime_secs: state.started_at.elapsed().as_secs(),
            git_hash: env!("GIT_HASH").to_string(),
        })),
    )
}
