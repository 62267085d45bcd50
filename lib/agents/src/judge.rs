//! Judge agent: rates each builder output on the five criteria.

use crate::error::{AgentError, AgentResult};
use crate::image::ensure_data_uri;
use crate::judgment::{
    AgentJudgment, Criterion, CriterionRating, JudgeOutput, MAX_SCORE, MIN_SCORE, round_to_tenth,
};
use crate::model::{AgentOutput, BUILDER_COUNT};
use atelier_ai::{CompletionRequest, GenerativeBackend};
use futures::future::try_join_all;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, instrument};

const SYSTEM_PROMPT: &str = r#"You are an expert design critic. Evaluate each builder agent's output image against these 5 criteria (score 1-5 each):
1. relevance - How well does the image match the prompt/requirements?
2. creativity - Originality and imagination
3. persona_consistency - Does it align with the agent's stated style/persona?
4. aesthetic_quality - Visual appeal, composition, balance
5. technical_execution - Clarity, coherence, polish

Score each criterion 1-5 (1=poor, 5=excellent). Provide a brief rationale for each.
Compute overall_score as the average of the 5 criterion scores (round to 1 decimal).
Write a short summary (1-2 sentences) of your overall assessment.

Output valid JSON only, with this exact shape:
{
  "agent_name": "string",
  "persona": "string",
  "criteria_ratings": [
    {"criterion": "relevance", "score": 1-5, "rationale": "..."},
    {"criterion": "creativity", "score": 1-5, "rationale": "..."},
    {"criterion": "persona_consistency", "score": 1-5, "rationale": "..."},
    {"criterion": "aesthetic_quality", "score": 1-5, "rationale": "..."},
    {"criterion": "technical_execution", "score": 1-5, "rationale": "..."}
  ],
  "overall_score": 1.0-5.0,
  "summary": "string"
}"#;

const DEFAULT_OVERALL_SCORE: f64 = 3.0;

/// Judges the work of the builder agents.
#[derive(Clone)]
pub struct JudgeAgent {
    backend: Arc<dyn GenerativeBackend>,
}

impl JudgeAgent {
    /// Creates a judge that calls `backend`.
    #[must_use]
    pub fn new(backend: Arc<dyn GenerativeBackend>) -> Self {
        Self { backend }
    }

    /// Judges exactly three outputs against the original prompt.
    ///
    /// Outputs are judged independently and concurrently; judgments come
    /// back in the order of `outputs`.
    ///
    /// # Errors
    ///
    /// Returns `Precondition` unless given exactly three outputs, and
    /// `Remote` or `Validation` if any single judgment fails.
    #[instrument(skip_all, fields(outputs = outputs.len()))]
    pub async fn judge(
        &self,
        outputs: &[AgentOutput],
        prompt_or_job: &str,
    ) -> AgentResult<JudgeOutput> {
        if outputs.len() != BUILDER_COUNT {
            return Err(AgentError::Precondition {
                reason: format!(
                    "judge expects exactly {BUILDER_COUNT} builder outputs, got {}",
                    outputs.len()
                ),
            }
            .into());
        }

        let judgments = try_join_all(
            outputs
                .iter()
                .map(|output| self.judge_one(output, prompt_or_job)),
        )
        .await?;

        Ok(JudgeOutput { judgments })
    }

    #[instrument(skip_all, fields(agent = %output.agent_name))]
    async fn judge_one(&self, output: &AgentOutput, prompt_or_job: &str) -> AgentResult<AgentJudgment> {
        let text = format!(
            "Evaluate this image from {} (persona: {}).\n\
             Style notes: {}\n\
             Original prompt/job: {}\n\n\
             Provide your judgment as JSON.",
            output.agent_name,
            output.persona,
            output.style_notes.as_deref().unwrap_or("N/A"),
            prompt_or_job,
        );
        let request = CompletionRequest::new(text)
            .with_system(SYSTEM_PROMPT)
            .with_image(ensure_data_uri(&output.image))
            .with_json_output();

        let response = self
            .backend
            .complete(&request)
            .await
            .map_err(|e| AgentError::remote(format!("judging {}", output.agent_name), e))?;

        let judgment = reconcile(response.content.as_deref().unwrap_or_default(), output)?;
        debug!(overall_score = judgment.overall_score, "Output judged");
        Ok(judgment)
    }
}

#[derive(Debug, Deserialize)]
struct RawJudgment {
    #[serde(default)]
    agent_name: Option<String>,
    #[serde(default)]
    persona: Option<String>,
    #[serde(default)]
    criteria_ratings: Vec<RawRating>,
    #[serde(default)]
    overall_score: Option<f64>,
    #[serde(default)]
    summary: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawRating {
    #[serde(default)]
    criterion: Option<String>,
    #[serde(default)]
    score: Option<RawScore>,
    #[serde(default)]
    rationale: Option<String>,
}

/// Models sometimes quote numbers; `"4"` counts as 4.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawScore {
    Number(f64),
    Text(String),
}

impl RawScore {
    fn value(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(text) => text.trim().parse().ok(),
        }
    }
}

impl RawRating {
    fn validate(&self, criterion: Criterion) -> Result<CriterionRating, AgentError> {
        let what = format!("{criterion} rating");
        let score = self
            .score
            .as_ref()
            .ok_or_else(|| AgentError::validation(&what, "missing score"))?
            .value()
            .ok_or_else(|| AgentError::validation(&what, "score is not a number"))?;
        if score.fract() != 0.0 || score < f64::from(MIN_SCORE) || score > f64::from(MAX_SCORE) {
            return Err(AgentError::validation(
                &what,
                format!("score {score} is not an integer from {MIN_SCORE} to {MAX_SCORE}"),
            ));
        }
        let rationale = self
            .rationale
            .clone()
            .ok_or_else(|| AgentError::validation(&what, "missing rationale"))?;

        CriterionRating::new(criterion, score as u8, rationale)
            .ok_or_else(|| AgentError::validation(&what, "score out of range"))
    }
}

/// Turns a judge reply into a judgment with exactly one rating per criterion.
///
/// Ratings are taken in [`Criterion::ALL`] order; the first reply entry with
/// a matching name wins and missing criteria get
/// [`CriterionRating::unspecified`]. Extra, unknown or unnamed entries are
/// ignored. The overall score is rounded to one decimal and must then lie
/// in 1.0..=5.0.
fn reconcile(reply: &str, output: &AgentOutput) -> Result<AgentJudgment, AgentError> {
    let raw: RawJudgment =
        serde_json::from_str(reply).map_err(|e| AgentError::validation("judge reply", e))?;

    let criteria_ratings = Criterion::ALL
        .into_iter()
        .map(|criterion| {
            match raw
                .criteria_ratings
                .iter()
                .find(|r| r.criterion.as_deref() == Some(criterion.as_str()))
            {
                Some(found) => found.validate(criterion),
                None => Ok(CriterionRating::unspecified(criterion)),
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    let overall_score = round_to_tenth(raw.overall_score.unwrap_or(DEFAULT_OVERALL_SCORE));
    if !(f64::from(MIN_SCORE)..=f64::from(MAX_SCORE)).contains(&overall_score) {
        return Err(AgentError::validation(
            "judge reply",
            format!("overall score {overall_score} is outside {MIN_SCORE}.0 to {MAX_SCORE}.0"),
        ));
    }

    Ok(AgentJudgment {
        agent_name: raw.agent_name.unwrap_or_else(|| output.agent_name.clone()),
        persona: raw.persona.unwrap_or_else(|| output.persona.clone()),
        criteria_ratings,
        overall_score,
        summary: raw
            .summary
            .unwrap_or_else(|| "No summary provided.".to_string()),
    })
}
