//! Judgment records produced by the judge agent.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The five criteria every output is rated on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    /// How well the output matches the prompt and requirements.
    Relevance,
    /// Originality and imagination.
    Creativity,
    /// Alignment with the agent's stated style.
    PersonaConsistency,
    /// Visual appeal and composition.
    AestheticQuality,
    /// Clarity, coherence, polish.
    TechnicalExecution,
}

impl Criterion {
    /// All criteria in canonical order.
    pub const ALL: [Criterion; 5] = [
        Criterion::Relevance,
        Criterion::Creativity,
        Criterion::PersonaConsistency,
        Criterion::AestheticQuality,
        Criterion::TechnicalExecution,
    ];

    /// Returns the wire name of this criterion.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Relevance => "relevance",
            Self::Creativity => "creativity",
            Self::PersonaConsistency => "persona_consistency",
            Self::AestheticQuality => "aesthetic_quality",
            Self::TechnicalExecution => "technical_execution",
        }
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lowest allowed criterion score.
pub const MIN_SCORE: u8 = 1;

/// Highest allowed criterion score.
pub const MAX_SCORE: u8 = 5;

/// Score used when the judge did not rate a criterion.
pub const DEFAULT_SCORE: u8 = 3;

/// A single criterion rated 1-5.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriterionRating {
    /// Which criterion.
    pub criterion: Criterion,
    /// Score from 1 to 5.
    pub score: u8,
    /// Brief justification for the score.
    pub rationale: String,
}

impl CriterionRating {
    /// Creates a rating, or returns `None` if `score` is outside 1-5.
    #[must_use]
    pub fn new(criterion: Criterion, score: u8, rationale: impl Into<String>) -> Option<Self> {
        (MIN_SCORE..=MAX_SCORE).contains(&score).then(|| Self {
            criterion,
            score,
            rationale: rationale.into(),
        })
    }

    /// The rating substituted for a criterion the judge left out.
    #[must_use]
    pub fn unspecified(criterion: Criterion) -> Self {
        Self {
            criterion,
            score: DEFAULT_SCORE,
            rationale: "Not specified".to_string(),
        }
    }
}

/// Judgment for one builder agent's output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentJudgment {
    /// Name of the agent judged.
    pub agent_name: String,
    /// Agent persona.
    pub persona: String,
    /// Exactly one rating per criterion, in [`Criterion::ALL`] order.
    pub criteria_ratings: Vec<CriterionRating>,
    /// Overall score between 1.0 and 5.0, one decimal.
    pub overall_score: f64,
    /// Brief overall assessment.
    pub summary: String,
}

/// Judgments for all builder outputs, in builder order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JudgeOutput {
    pub judgments: Vec<AgentJudgment>,
}

/// Rounds to one decimal place.
#[must_use]
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
