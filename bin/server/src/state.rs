//! Shared application state.

use crate::config::ServerConfig;
use crate::error::StartupError;
use atelier_agents::OrchestratorAgent;
use atelier_ai::{GenerativeBackend, OpenAiBackend};
use rootcause::Report;
use std::sync::Arc;

/// State handed to every request handler.
///
/// Built once at startup and never mutated afterwards.
pub struct AppState {
    /// The pipeline, or `None` while no API key is configured.
    pub orchestrator: Option<OrchestratorAgent>,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(orchestrator: Option<OrchestratorAgent>) -> Self {
        Self { orchestrator }
    }

    /// Builds the state from configuration.
    ///
    /// A missing API key is not an error: the server starts and reports the
    /// problem on each orchestration request.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend or the pipeline cannot be created.
    pub fn from_config(config: &ServerConfig) -> Result<Self, Report<StartupError>> {
        let Some(api_key) = config.api_key() else {
            tracing::warn!("OPENAI_API_KEY is not set; orchestration requests will fail");
            return Ok(Self::new(None));
        };

        let backend = OpenAiBackend::new(api_key, &config.openai)
            .map_err(|source| StartupError::Backend { source })?;
        tracing::info!(model = %backend.model(), "OpenAI backend configured");

        let orchestrator =
            OrchestratorAgent::from_backend(Arc::new(backend), &config.openai.image_options())
                .map_err(|report| StartupError::Pipeline {
                    details: report.to_string(),
                })?;

        Ok(Self::new(Some(orchestrator)))
    }

    /// Whether orchestration requests can be served.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.orchestrator.is_some()
    }
}
