//! Health check endpoint

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use utoipa::ToSchema;

use super::SearchApiState;
use crate::api::types::ApiError;

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

pub fn routes(state: SearchApiState) -> Router<()> {
    Router::new().route("/", get(health)).with_state(state)
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/api/v1/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Database unreachable", body = crate::api::types::ErrorBody)
    )
)]
pub async fn health(
    State(state): State<SearchApiState>,
) -> Result<Json<HealthResponse>, ApiError> {
    state.repository.ping().await.map_err(|e| {
        tracing::warn!(error = %e, "Health check failed");
        ApiError::service_unavailable("Database unreachable")
    })?;

    Ok(Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    }))
}
