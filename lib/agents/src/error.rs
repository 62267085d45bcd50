//! Error types for the agents crate.
//!
//! Errors are reported as `Report<AgentError>` so callers see which stage
//! failed without the agents having to recover anything:
//! - `Validation`: a reply did not have the expected shape
//! - `Precondition`: wrong number of builders or outputs
//! - `Remote`: the generative backend call itself failed

use atelier_ai::LlmError;
use std::fmt;

/// Result alias used by every agent operation.
pub type AgentResult<T> = atelier_core::Result<T, AgentError>;

/// Errors from agent operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentError {
    /// A reply could not be turned into the expected record.
    Validation { what: String, reason: String },
    /// An operation was called with the wrong number of agents or outputs.
    Precondition { reason: String },
    /// A remote call failed.
    Remote { stage: String, source: LlmError },
}

impl AgentError {
    /// Creates a validation error.
    pub fn validation(what: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self::Validation {
            what: what.into(),
            reason: reason.to_string(),
        }
    }

    /// Creates a remote-call error for the given stage.
    pub fn remote(stage: impl Into<String>, source: LlmError) -> Self {
        Self::Remote {
            stage: stage.into(),
            source,
        }
    }
}

impl fmt::Display for AgentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation { what, reason } => {
                write!(f, "invalid {what}: {reason}")
            }
            Self::Precondition { reason } => {
                write!(f, "precondition failed: {reason}")
            }
            Self::Remote { stage, source } => {
                write!(f, "{stage} failed: {source}")
            }
        }
    }
}

impl std::error::Error for AgentError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_display() {
        let err = AgentError::validation("structured query", "missing field `intent`");
        assert_eq!(
            err.to_string(),
            "invalid structured query: missing field `intent`"
        );
    }

    #[test]
    fn remote_display_names_stage() {
        let err = AgentError::remote("judge BuilderAgent2", LlmError::Timeout);
        assert_eq!(
            err.to_string(),
            "judge BuilderAgent2 failed: LLM request timed out"
        );
    }
}
