//! Query analysis: turn a free-text request into a [`StructuredQuery`].

use crate::error::{AgentError, AgentResult};
use crate::model::StructuredQuery;
use atelier_ai::{CompletionRequest, GenerativeBackend, strip_code_fence};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

const SYSTEM_PROMPT: &str = r#"You are a query analyst. Given a user request, you extract intent and structure it for design/code agents.

Output valid JSON only, with this exact shape (no extra fields):
{
  "intent": "short_snake_case_label",
  "task_type": "design" | "code" | "image" | "copy" | "mixed",
  "requirements": ["requirement 1", "requirement 2"],
  "constraints": ["constraint 1"],
  "raw_query": "the original user query exactly as given"
}

- intent: one short label (e.g. design_landing_page, build_react_form, create_hero_image).
- task_type: design (UI/UX), code (components/APIs), image (visuals), copy (text), or mixed.
- requirements: list of must-haves from the user (can be empty []).
- constraints: limits or rules (e.g. "mobile-first", "no external APIs") (can be empty []).
- raw_query: copy the user's message exactly.

Output only the JSON object, no markdown or explanation."#;

/// Extracts intent and structure from user requests.
#[derive(Clone)]
pub struct QueryAnalyzer {
    backend: Arc<dyn GenerativeBackend>,
}

impl QueryAnalyzer {
    /// Creates an analyzer that calls `backend`.
    #[must_use]
    pub fn new(backend: Arc<dyn GenerativeBackend>) -> Self {
        Self { backend }
    }

    /// Parses `raw_query` into a structured query with one completion call.
    ///
    /// An absent or empty reply yields [`StructuredQuery::fallback`]; a
    /// whitespace-only reply is parsed like any other and fails.
    ///
    /// # Errors
    ///
    /// Returns `Remote` if the call fails and `Validation` if the reply is
    /// not a structured query.
    #[instrument(skip_all, fields(model = %self.backend.model()))]
    pub async fn analyze(&self, raw_query: &str) -> AgentResult<StructuredQuery> {
        let request = CompletionRequest::new(raw_query).with_system(SYSTEM_PROMPT);
        let response = self
            .backend
            .complete(&request)
            .await
            .map_err(|e| AgentError::remote("query analysis", e))?;

        let content = match response.content.as_deref() {
            None | Some("") => {
                warn!("Query analyzer got an empty reply, using fallback query");
                return Ok(StructuredQuery::fallback(raw_query));
            }
            Some(content) => content,
        };

        let text = strip_code_fence(content);
        let query: StructuredQuery = serde_json::from_str(&text)
            .map_err(|e| AgentError::validation("structured query", e))?;

        debug!(
            intent = %query.intent,
            task_type = %query.task_type,
            requirements = query.requirements.len(),
            constraints = query.constraints.len(),
            "Query analyzed"
        );
        Ok(query)
    }
}
