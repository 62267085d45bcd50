//! HTTP routes.

use crate::error::ApiError;
use crate::state::AppState;
use atelier_agents::OrchestratorOutput;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Body of `POST /orchestrate`.
#[derive(Debug, Deserialize)]
pub struct OrchestrateRequest {
    /// The user's free-text request.
    pub query: String,
}

/// Body of `GET /health`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthResponse {
    pub status: String,
    pub configured: bool,
}

/// Builds the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/orchestrate", post(orchestrate))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Runs the full pipeline for one query.
pub async fn orchestrate(
    State(state): State<Arc<AppState>>,
    Json(request): Json<OrchestrateRequest>,
) -> Result<Json<OrchestratorOutput>, ApiError> {
    let orchestrator = state.orchestrator.as_ref().ok_or(ApiError::NotConfigured)?;
    let output = orchestrator.run(&request.query).await?;
    Ok(Json(output))
}

/// Reports liveness and whether an API key is configured.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        configured: state.is_configured(),
    })
}
