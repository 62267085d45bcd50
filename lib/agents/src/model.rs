//! Records exchanged between the pipeline stages.

use crate::judgment::AgentJudgment;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::fmt;

/// Number of builder agents in every run.
pub const BUILDER_COUNT: usize = 3;

/// Category of deliverable a query asks for.
///
/// Labels outside the five known ones are kept verbatim in `Other` so the
/// builder prompt shows what the analyzer actually said.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskType {
    /// UI/UX design.
    Design,
    /// Components, APIs, scripts.
    Code,
    /// Visuals.
    Image,
    /// Text.
    Copy,
    /// More than one of the above.
    Mixed,
    /// Any other label.
    Other(String),
}

impl TaskType {
    /// Returns the wire name of this task type.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Design => "design",
            Self::Code => "code",
            Self::Image => "image",
            Self::Copy => "copy",
            Self::Mixed => "mixed",
            Self::Other(label) => label,
        }
    }
}

impl From<String> for TaskType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "design" => Self::Design,
            "code" => Self::Code,
            "image" => Self::Image,
            "copy" => Self::Copy,
            "mixed" => Self::Mixed,
            _ => Self::Other(value),
        }
    }
}

impl From<TaskType> for String {
    fn from(value: TaskType) -> Self {
        match value {
            TaskType::Other(label) => label,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parsed, typed form of a free-text request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredQuery {
    /// Short label for what the user wants, e.g. `design_landing_page`.
    pub intent: String,
    /// Deliverable category.
    pub task_type: TaskType,
    /// Must-haves, in the order the user gave them.
    #[serde(default)]
    pub requirements: Vec<String>,
    /// Limits or rules, e.g. `mobile-first`.
    #[serde(default)]
    pub constraints: Vec<String>,
    /// The original request text.
    pub raw_query: String,
}

impl StructuredQuery {
    /// The record used when the analyzer gets an empty reply.
    #[must_use]
    pub fn fallback(raw_query: impl Into<String>) -> Self {
        Self {
            intent: "unknown".to_string(),
            task_type: TaskType::Mixed,
            requirements: Vec::new(),
            constraints: Vec::new(),
            raw_query: raw_query.into(),
        }
    }

    /// Formats the query as the user turn sent to builder agents.
    ///
    /// Requirement and constraint lines are omitted when the lists are empty.
    #[must_use]
    pub fn to_agent_prompt(&self) -> String {
        let mut parts = vec![
            format!("Intent: {}", self.intent),
            format!("Task type: {}", self.task_type),
        ];
        if !self.requirements.is_empty() {
            parts.push(format!("Requirements: {}", self.requirements.join("; ")));
        }
        if !self.constraints.is_empty() {
            parts.push(format!("Constraints: {}", self.constraints.join("; ")));
        }
        parts.push(format!("Original request: {}", self.raw_query));
        parts.join("\n")
    }
}

/// One builder's deliverable plus metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentOutput {
    /// The deliverable image as a data URI. Code deliverables carry a placeholder.
    pub image: String,
    /// Name of the agent that produced the output.
    pub agent_name: String,
    /// Persona label of that agent.
    pub persona: String,
    /// When the output was produced.
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    /// The user request the output answers.
    #[serde(default)]
    pub prompt_or_job: Option<String>,
    /// Style or design notes.
    #[serde(default)]
    pub style_notes: Option<String>,
    /// Additional key-value metadata; code deliverables live under `code`.
    #[serde(default)]
    pub extra: Map<String, JsonValue>,
    /// Overall judge score, attached after judging.
    #[serde(default)]
    pub score: Option<f64>,
    /// Unrecognised top-level fields, kept so they survive a round trip.
    #[serde(flatten)]
    pub additional: Map<String, JsonValue>,
}

impl AgentOutput {
    /// Creates an output stamped with the current time.
    #[must_use]
    pub fn new(
        image: impl Into<String>,
        agent_name: impl Into<String>,
        persona: impl Into<String>,
    ) -> Self {
        Self {
            image: image.into(),
            agent_name: agent_name.into(),
            persona: persona.into(),
            created_at: Utc::now(),
            prompt_or_job: None,
            style_notes: None,
            extra: Map::new(),
            score: None,
            additional: Map::new(),
        }
    }

    /// Sets the prompt or job description.
    #[must_use]
    pub fn with_prompt_or_job(mut self, prompt_or_job: impl Into<String>) -> Self {
        self.prompt_or_job = Some(prompt_or_job.into());
        self
    }

    /// Sets the style notes.
    #[must_use]
    pub fn with_style_notes(mut self, style_notes: impl Into<String>) -> Self {
        self.style_notes = Some(style_notes.into());
        self
    }

    /// Adds an entry to `extra`.
    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Returns a copy of this output with the judge score attached.
    #[must_use]
    pub fn with_score(self, score: f64) -> Self {
        Self {
            score: Some(score),
            ..self
        }
    }

    /// Returns the generated code, if this is a code deliverable.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        self.extra.get("code").and_then(JsonValue::as_str)
    }
}

/// The response for one orchestrated request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrchestratorOutput {
    /// One output per builder, in builder order.
    pub items: Vec<AgentOutput>,
    /// One judgment per output, same order as `items`.
    pub judgments: Vec<AgentJudgment>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn query(requirements: &[&str], constraints: &[&str]) -> StructuredQuery {
        StructuredQuery {
            intent: "design_landing_page".to_string(),
            task_type: TaskType::Design,
            requirements: requirements.iter().map(|s| s.to_string()).collect(),
            constraints: constraints.iter().map(|s| s.to_string()).collect(),
            raw_query: "a landing page for a bakery".to_string(),
        }
    }

    #[test]
    fn prompt_includes_all_sections() {
        let prompt = query(&["hero image", "menu"], &["mobile-first"]).to_agent_prompt();
        assert_eq!(
            prompt,
            "Intent: design_landing_page\n\
             Task type: design\n\
             Requirements: hero image; menu\n\
             Constraints: mobile-first\n\
             Original request: a landing page for a bakery"
        );
    }

    #[test]
    fn prompt_omits_empty_lists() {
        let prompt = query(&[], &[]).to_agent_prompt();
        assert!(!prompt.contains("Requirements:"));
        assert!(!prompt.contains("Constraints:"));
        assert_eq!(prompt.lines().count(), 3);

        let prompt = query(&["menu"], &[]).to_agent_prompt();
        assert!(prompt.contains("Requirements: menu"));
        assert!(!prompt.contains("Constraints:"));

        let prompt = query(&[], &["no animations"]).to_agent_prompt();
        assert!(!prompt.contains("Requirements:"));
        assert!(prompt.contains("Constraints: no animations"));
    }

    #[test]
    fn structured_query_lists_default_to_empty() {
        let parsed: StructuredQuery = serde_json::from_value(json!({
            "intent": "build_form",
            "task_type": "code",
            "raw_query": "a signup form"
        }))
        .expect("parse");
        assert_eq!(parsed.task_type, TaskType::Code);
        assert!(parsed.requirements.is_empty());
        assert!(parsed.constraints.is_empty());
    }

    #[test]
    fn unknown_task_type_keeps_its_label() {
        let parsed: StructuredQuery = serde_json::from_value(json!({
            "intent": "x",
            "task_type": "other",
            "raw_query": "y"
        }))
        .expect("parse");
        assert_eq!(parsed.task_type, TaskType::Other("other".to_string()));
        assert!(parsed.to_agent_prompt().contains("Task type: other\n"));
        assert_eq!(
            serde_json::to_value(&parsed.task_type).expect("serialize"),
            json!("other")
        );
    }

    #[test]
    fn task_type_serializes_snake_case() {
        assert_eq!(
            serde_json::to_value(&TaskType::Image).expect("serialize"),
            json!("image")
        );
    }

    #[test]
    fn fallback_query_shape() {
        let fallback = StructuredQuery::fallback("make me something");
        assert_eq!(fallback.intent, "unknown");
        assert_eq!(fallback.task_type, TaskType::Mixed);
        assert_eq!(fallback.raw_query, "make me something");
        assert!(fallback.requirements.is_empty());
        assert!(fallback.constraints.is_empty());
    }

    #[test]
    fn agent_output_round_trip_keeps_unknown_fields() {
        let output = AgentOutput::new("data:image/png;base64,AA==", "BuilderAgent1", "The Minimalist")
            .with_prompt_or_job("a logo")
            .with_style_notes("monochrome")
            .with_extra("code", "<div/>")
            .with_score(4.2);

        let mut value = serde_json::to_value(&output).expect("serialize");
        value["job_id"] = json!("job-7");

        let parsed: AgentOutput = serde_json::from_value(value).expect("deserialize");
        assert_eq!(parsed.additional.get("job_id"), Some(&json!("job-7")));

        let expected = AgentOutput {
            additional: parsed.additional.clone(),
            ..output
        };
        assert_eq!(parsed, expected);
    }

    #[test]
    fn with_score_leaves_other_fields() {
        let output = AgentOutput::new("img", "a", "p").with_style_notes("n");
        let scored = output.clone().with_score(3.5);
        assert_eq!(scored.score, Some(3.5));
        assert_eq!(output.score, None);
        assert_eq!(scored.created_at, output.created_at);
        assert_eq!(scored.style_notes, output.style_notes);
    }

    #[test]
    fn code_accessor_reads_extra() {
        let output = AgentOutput::new("img", "a", "p").with_extra("code", "fn main() {}");
        assert_eq!(output.code(), Some("fn main() {}"));
        assert_eq!(AgentOutput::new("img", "a", "p").code(), None);
    }
}
