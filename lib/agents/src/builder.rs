//! Builder agents: one deliverable per persona.

use crate::error::{AgentError, AgentResult};
use crate::image::PLACEHOLDER_IMAGE;
use crate::model::{AgentOutput, StructuredQuery, TaskType};
use crate::persona::{self, Persona};
use async_trait::async_trait;
use atelier_ai::{CompletionRequest, GenerativeBackend, ImageOptions, ImageRequest};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Anything that can turn a structured query into a deliverable.
///
/// The orchestrator accepts any implementation; [`PersonaBuilder`] is the
/// one used in production.
#[async_trait]
pub trait BuilderAgent: Send + Sync {
    /// Agent name reported on outputs.
    fn name(&self) -> &str;

    /// Persona label reported on outputs.
    fn persona(&self) -> &str;

    /// Produces one deliverable for `query`.
    ///
    /// # Errors
    ///
    /// Returns an error if a remote call fails or returns nothing usable.
    async fn run(&self, query: &StructuredQuery) -> AgentResult<AgentOutput>;
}

/// Builder driven by a fixed [`Persona`].
///
/// Code queries get one completion; everything else gets a completion that
/// writes an image prompt followed by one image generation.
#[derive(Clone)]
pub struct PersonaBuilder {
    persona: Persona,
    backend: Arc<dyn GenerativeBackend>,
    image_options: ImageOptions,
}

impl PersonaBuilder {
    /// Creates a builder for `persona`.
    #[must_use]
    pub fn new(
        persona: Persona,
        backend: Arc<dyn GenerativeBackend>,
        image_options: ImageOptions,
    ) -> Self {
        Self {
            persona,
            backend,
            image_options,
        }
    }

    async fn complete_trimmed(&self, system: &str, prompt: &str, stage: &str) -> AgentResult<String> {
        let request = CompletionRequest::new(prompt).with_system(system);
        let response = self
            .backend
            .complete(&request)
            .await
            .map_err(|e| AgentError::remote(format!("{} {stage}", self.persona.agent_name), e))?;

        match response.non_empty_content() {
            Some(content) => Ok(content.trim().to_string()),
            None => Err(AgentError::validation(
                format!("{} reply", stage),
                format!("{} returned no content", self.persona.agent_name),
            )
            .into()),
        }
    }

    async fn build_code(&self, query: &StructuredQuery, prompt: &str) -> AgentResult<AgentOutput> {
        let code = self
            .complete_trimmed(self.persona.code_prompt, prompt, "code generation")
            .await?;
        debug!(code_chars = code.len(), "Code deliverable generated");

        Ok(self
            .output(PLACEHOLDER_IMAGE, query)
            .with_style_notes("Code output")
            .with_extra("code", code))
    }

    async fn build_visual(&self, query: &StructuredQuery, prompt: &str) -> AgentResult<AgentOutput> {
        let image_prompt = self
            .complete_trimmed(self.persona.image_prompt, prompt, "image prompt")
            .await?;

        let image = self
            .backend
            .generate_image(&ImageRequest::new(&image_prompt, &self.image_options))
            .await
            .map_err(|e| {
                AgentError::remote(format!("{} image generation", self.persona.agent_name), e)
            })?;
        debug!(image_bytes = image.bytes.len(), "Visual deliverable generated");

        Ok(self
            .output(image.to_data_uri(), query)
            .with_style_notes(image_prompt))
    }

    fn output(&self, image: impl Into<String>, query: &StructuredQuery) -> AgentOutput {
        AgentOutput::new(image, self.persona.agent_name, self.persona.label)
            .with_prompt_or_job(query.raw_query.clone())
    }
}

#[async_trait]
impl BuilderAgent for PersonaBuilder {
    fn name(&self) -> &str {
        self.persona.agent_name
    }

    fn persona(&self) -> &str {
        self.persona.label
    }

    #[instrument(skip_all, fields(agent = %self.persona.agent_name, task_type = %query.task_type))]
    async fn run(&self, query: &StructuredQuery) -> AgentResult<AgentOutput> {
        let prompt = query.to_agent_prompt();
        match query.task_type {
            TaskType::Code => self.build_code(query, &prompt).await,
            TaskType::Design
            | TaskType::Image
            | TaskType::Copy
            | TaskType::Mixed
            | TaskType::Other(_) => {
                self.build_visual(query, &prompt).await
            }
        }
    }
}

/// Returns the three persona builders in builder order.
#[must_use]
pub fn default_builders(
    backend: Arc<dyn GenerativeBackend>,
    image_options: &ImageOptions,
) -> Vec<Arc<dyn BuilderAgent>> {
    persona::ALL
        .into_iter()
        .map(|p| {
            Arc::new(PersonaBuilder::new(p, backend.clone(), image_options.clone()))
                as Arc<dyn BuilderAgent>
        })
        .collect()
}
