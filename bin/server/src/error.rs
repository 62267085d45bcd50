//! Error types for the HTTP layer and startup.

use atelier_agents::AgentError;
use atelier_ai::LlmError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use rootcause::Report;
use serde_json::json;
use std::fmt;

/// Message returned while no API key is configured.
pub const MISSING_API_KEY: &str = "OPENAI_API_KEY environment variable is not set";

/// Message returned when the pipeline fails.
pub const PIPELINE_FAILED: &str = "Orchestration failed";

/// Errors returned by request handlers.
///
/// Every variant becomes a 500 with a `{"detail": ...}` body. Pipeline
/// details are logged, not returned.
#[derive(Debug)]
pub enum ApiError {
    /// The server has no API key.
    NotConfigured,
    /// A pipeline stage failed.
    Pipeline(Report<AgentError>),
}

impl From<Report<AgentError>> for ApiError {
    fn from(report: Report<AgentError>) -> Self {
        Self::Pipeline(report)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let detail = match self {
            Self::NotConfigured => {
                tracing::warn!("Orchestration requested without an API key");
                MISSING_API_KEY
            }
            Self::Pipeline(report) => {
                tracing::error!("Orchestration failed: {}", report);
                PIPELINE_FAILED
            }
        };

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "detail": detail })),
        )
            .into_response()
    }
}

/// Errors that stop the server from starting.
#[derive(Debug)]
pub enum StartupError {
    /// The configuration could not be loaded.
    Config { details: String },
    /// The generative backend could not be created.
    Backend { source: LlmError },
    /// The agent pipeline could not be assembled.
    Pipeline { details: String },
    /// The listener could not be bound or served.
    Io { details: String },
}

impl fmt::Display for StartupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config { details } => write!(f, "invalid configuration: {details}"),
            Self::Backend { source } => write!(f, "failed to create backend: {source}"),
            Self::Pipeline { details } => write!(f, "failed to assemble pipeline: {details}"),
            Self::Io { details } => write!(f, "server I/O error: {details}"),
        }
    }
}

impl std::error::Error for StartupError {}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::Value;

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[tokio::test]
    async fn not_configured_is_500_with_detail() {
        let response = ApiError::NotConfigured.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await, json!({ "detail": MISSING_API_KEY }));
    }

    #[tokio::test]
    async fn pipeline_error_hides_details() {
        let report: Report<AgentError> = AgentError::Precondition {
            reason: "secret internals".to_string(),
        }
        .into();
        let response = ApiError::from(report).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await, json!({ "detail": PIPELINE_FAILED }));
    }

    #[test]
    fn startup_error_display() {
        let err = StartupError::Backend {
            source: LlmError::InvalidConfig {
                reason: "API key is empty".to_string(),
            },
        };
        assert_eq!(
            err.to_string(),
            "failed to create backend: invalid LLM configuration: API key is empty"
        );
    }
}
