//! Agents for the atelier pipeline.
//!
//! A request flows through four stages:
//!
//! 1. [`QueryAnalyzer`] turns free text into a [`StructuredQuery`]
//! 2. three [`BuilderAgent`]s each produce one [`AgentOutput`] in their persona
//! 3. [`JudgeAgent`] rates every output on the five [`Criterion`] values
//! 4. [`OrchestratorAgent`] merges outputs and judgments into an
//!    [`OrchestratorOutput`]
//!
//! Every remote call goes through [`atelier_ai::GenerativeBackend`].

pub mod analyzer;
pub mod builder;
pub mod error;
pub mod image;
pub mod judge;
pub mod judgment;
pub mod model;
pub mod orchestrator;
pub mod persona;

pub use analyzer::QueryAnalyzer;
pub use builder::{BuilderAgent, PersonaBuilder, default_builders};
pub use error::{AgentError, AgentResult};
pub use image::{PLACEHOLDER_IMAGE, ensure_data_uri};
pub use judge::JudgeAgent;
pub use judgment::{AgentJudgment, Criterion, CriterionRating, JudgeOutput};
pub use model::{AgentOutput, BUILDER_COUNT, OrchestratorOutput, StructuredQuery, TaskType};
pub use orchestrator::OrchestratorAgent;
pub use persona::Persona;
