//! Orchestrator: analyze, build, judge, merge.

use crate::analyzer::QueryAnalyzer;
use crate::builder::{BuilderAgent, default_builders};
use crate::error::{AgentError, AgentResult};
use crate::judge::JudgeAgent;
use crate::model::{AgentOutput, BUILDER_COUNT, OrchestratorOutput};
use atelier_ai::{GenerativeBackend, ImageOptions};
use atelier_core::RunId;
use futures::future::try_join_all;
use std::sync::Arc;
use tracing::{info, instrument};

/// Runs the whole pipeline for one user query.
///
/// The orchestrator is cheap to share; one instance serves every request.
pub struct OrchestratorAgent {
    analyzer: QueryAnalyzer,
    builders: Vec<Arc<dyn BuilderAgent>>,
    judge: JudgeAgent,
}

impl OrchestratorAgent {
    /// Creates an orchestrator from its parts.
    ///
    /// # Errors
    ///
    /// Returns `Precondition` unless exactly three builders are given.
    pub fn new(
        analyzer: QueryAnalyzer,
        builders: Vec<Arc<dyn BuilderAgent>>,
        judge: JudgeAgent,
    ) -> AgentResult<Self> {
        if builders.len() != BUILDER_COUNT {
            return Err(AgentError::Precondition {
                reason: format!(
                    "orchestrator needs exactly {BUILDER_COUNT} builders, got {}",
                    builders.len()
                ),
            }
            .into());
        }

        Ok(Self {
            analyzer,
            builders,
            judge,
        })
    }

    /// Creates the standard pipeline on a single backend: the three persona
    /// builders plus an analyzer and a judge.
    ///
    /// # Errors
    ///
    /// Never fails in practice; see [`OrchestratorAgent::new`].
    pub fn from_backend(
        backend: Arc<dyn GenerativeBackend>,
        image_options: &ImageOptions,
    ) -> AgentResult<Self> {
        Self::new(
            QueryAnalyzer::new(backend.clone()),
            default_builders(backend.clone(), image_options),
            JudgeAgent::new(backend),
        )
    }

    /// Runs one query through the pipeline.
    ///
    /// Builders run concurrently, as do the per-output judge calls. The
    /// returned items keep builder order and each carries the overall score
    /// of the judgment at the same index.
    ///
    /// # Errors
    ///
    /// Returns the first error from any stage; nothing partial is returned.
    #[instrument(skip_all, fields(run_id = %RunId::new()))]
    pub async fn run(&self, query: &str) -> AgentResult<OrchestratorOutput> {
        let structured = self.analyzer.analyze(query).await?;
        info!(
            intent = %structured.intent,
            task_type = %structured.task_type,
            "Query analyzed, starting builders"
        );

        let outputs: Vec<AgentOutput> =
            try_join_all(self.builders.iter().map(|b| b.run(&structured))).await?;

        let judged = self.judge.judge(&outputs, &structured.raw_query).await?;

        let items = outputs
            .into_iter()
            .zip(&judged.judgments)
            .map(|(output, judgment)| output.with_score(judgment.overall_score))
            .collect();

        info!("Orchestration complete");
        Ok(OrchestratorOutput {
            items,
            judgments: judged.judgments,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::PLACEHOLDER_IMAGE;
    use crate::judgment::Criterion;
    use crate::model::StructuredQuery;
    use async_trait::async_trait;
    use atelier_ai::{CompletionRequest, LlmError, ScriptedBackend};
    use serde_json::json;

    const ANALYSIS: &str = r#"{"intent": "landing_page", "task_type": "code",
        "requirements": ["hero"], "constraints": [], "raw_query": "a landing page"}"#;

    fn judge_reply(request: &CompletionRequest) -> String {
        let (name, score) = if request.user.contains("BuilderAgent1") {
            ("BuilderAgent1", 4.2)
        } else if request.user.contains("BuilderAgent2") {
            ("BuilderAgent2", 3.6)
        } else {
            ("BuilderAgent3", 4.8)
        };
        let ratings: Vec<_> = Criterion::ALL
            .iter()
            .map(|c| json!({"criterion": c.as_str(), "score": 4, "rationale": "ok"}))
            .collect();
        json!({
            "agent_name": name,
            "persona": "p",
            "criteria_ratings": ratings,
            "overall_score": score,
            "summary": "fine"
        })
        .to_string()
    }

    fn pipeline_backend() -> Arc<ScriptedBackend> {
        Arc::new(ScriptedBackend::from_fn(|request| {
            let reply = if request.is_multimodal() {
                judge_reply(request)
            } else if request
                .system
                .as_deref()
                .is_some_and(|s| s.starts_with("You are a query analyst"))
            {
                ANALYSIS.to_string()
            } else {
                "<main>landing</main>".to_string()
            };
            Ok(Some(reply))
        }))
    }

    #[tokio::test]
    async fn run_attaches_scores_in_builder_order() {
        let backend = pipeline_backend();
        let orchestrator =
            OrchestratorAgent::from_backend(backend.clone(), &ImageOptions::default())
                .expect("orchestrator");

        let output = orchestrator.run("a landing page").await.expect("run");

        assert_eq!(output.items.len(), 3);
        assert_eq!(output.judgments.len(), 3);
        let names: Vec<_> = output.items.iter().map(|i| i.agent_name.as_str()).collect();
        assert_eq!(names, ["BuilderAgent1", "BuilderAgent2", "BuilderAgent3"]);
        for (item, judgment) in output.items.iter().zip(&output.judgments) {
            assert_eq!(item.agent_name, judgment.agent_name);
            assert_eq!(item.score, Some(judgment.overall_score));
            assert_eq!(item.image, PLACEHOLDER_IMAGE);
            assert_eq!(item.code(), Some("<main>landing</main>"));
            assert_eq!(item.prompt_or_job.as_deref(), Some("a landing page"));
        }
        assert_eq!(output.items[1].score, Some(3.6));

        // analysis + three builders + three judgments
        assert_eq!(backend.completion_requests().len(), 7);
        assert!(backend.image_requests().is_empty());
    }

    #[tokio::test]
    async fn run_falls_back_when_analysis_is_empty() {
        let backend = Arc::new(ScriptedBackend::from_fn(|request| {
            if request.is_multimodal() {
                Ok(Some(judge_reply(request)))
            } else if request
                .system
                .as_deref()
                .is_some_and(|s| s.starts_with("You are a query analyst"))
            {
                Ok(None)
            } else {
                Ok(Some("a calm poster".to_string()))
            }
        }));
        let orchestrator =
            OrchestratorAgent::from_backend(backend.clone(), &ImageOptions::default())
                .expect("orchestrator");

        let output = orchestrator.run("a poster").await.expect("run");
        assert_eq!(output.items.len(), 3);
        assert!(output.items.iter().all(|i| i.image.starts_with("data:image/png;base64,")));
        assert_eq!(backend.image_requests().len(), 3);
    }

    #[tokio::test]
    async fn builder_failure_aborts_run() {
        let backend = Arc::new(ScriptedBackend::from_fn(|request| {
            if request
                .system
                .as_deref()
                .is_some_and(|s| s.starts_with("You are a query analyst"))
            {
                Ok(Some(ANALYSIS.to_string()))
            } else {
                Err(LlmError::Timeout)
            }
        }));
        let orchestrator =
            OrchestratorAgent::from_backend(backend, &ImageOptions::default()).expect("orchestrator");

        let err = orchestrator.run("a landing page").await.unwrap_err();
        assert!(err.to_string().contains("timed out"));
    }

    struct FixedBuilder(&'static str);

    #[async_trait]
    impl BuilderAgent for FixedBuilder {
        fn name(&self) -> &str {
            self.0
        }

        fn persona(&self) -> &str {
            "Fixed"
        }

        async fn run(&self, query: &StructuredQuery) -> AgentResult<AgentOutput> {
            Ok(AgentOutput::new("AQID", self.0, "Fixed").with_prompt_or_job(query.raw_query.clone()))
        }
    }

    #[tokio::test]
    async fn accepts_custom_builders() {
        let backend = pipeline_backend();
        let builders: Vec<Arc<dyn BuilderAgent>> = vec![
            Arc::new(FixedBuilder("BuilderAgent1")),
            Arc::new(FixedBuilder("BuilderAgent2")),
            Arc::new(FixedBuilder("BuilderAgent3")),
        ];
        let orchestrator = OrchestratorAgent::new(
            QueryAnalyzer::new(backend.clone()),
            builders,
            JudgeAgent::new(backend.clone()),
        )
        .expect("orchestrator");

        let output = orchestrator.run("a landing page").await.expect("run");
        let scores: Vec<_> = output.items.iter().map(|i| i.score).collect();
        assert_eq!(scores, [Some(4.2), Some(3.6), Some(4.8)]);
        // analysis + three judgments
        assert_eq!(backend.completion_requests().len(), 4);
    }

    #[test]
    fn rejects_wrong_builder_count() {
        let backend = pipeline_backend();
        let builders: Vec<Arc<dyn BuilderAgent>> = vec![
            Arc::new(FixedBuilder("a")),
            Arc::new(FixedBuilder("b")),
        ];
        let result = OrchestratorAgent::new(
            QueryAnalyzer::new(backend.clone()),
            builders,
            JudgeAgent::new(backend),
        );
        let Err(err) = result else {
            panic!("two builders must be rejected");
        };
        assert!(err.to_string().contains("exactly 3 builders"));
    }

    #[test]
    fn default_pipeline_has_three_builders() {
        let orchestrator =
            OrchestratorAgent::from_backend(pipeline_backend(), &ImageOptions::default())
                .expect("orchestrator");
        let names: Vec<_> = orchestrator.builders.iter().map(|b| b.name()).collect();
        assert_eq!(names, ["BuilderAgent1", "BuilderAgent2", "BuilderAgent3"]);
    }
}
