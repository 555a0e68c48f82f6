//! Executes an `ExecutionPlan`, one branch per strategy, and produces the
//! final response plus the `ExecutionRecord` the caller should feed back
//! into the `HistoryTracker`.
//!
//! State machine per request: `PLANNING -> EXECUTING(branch) -> RECORDING ->
//! DONE`, with a single soft-failure re-entry from `EXECUTING` back to
//! itself (never more than once) before falling back to the draft text.
//!
//! Grounded in spec.md §4.8 and `original_source/cloud/draft_verifier.py`'s
//! verification contract; collaborator wiring follows the teacher's
//! `ExecutionEngine` (owns a `reqwest::Client`-backed collaborator, takes a
//! trait object so tests can swap in a fake).

use std::sync::Arc;
use std::time::{Duration, Instant};

use common::{AppError, AppResult, ExecutionPlan, ExecutionRecord, ExecutionStrategy, InferenceRequest, InferenceResponse, VerifyRequest};
use tracing::warn;

use crate::draft::DraftEngine;
use crate::verifier::VerifierClient;

const CLOUD_DIRECT_TIMEOUT: Duration = Duration::from_secs(30);

pub struct Orchestrator {
    draft_engine: Arc<dyn DraftEngine>,
    verifier: Arc<dyn VerifierClient>,
}

impl Orchestrator {
    pub fn new(draft_engine: Arc<dyn DraftEngine>, verifier: Arc<dyn VerifierClient>) -> Self {
        Self { draft_engine, verifier }
    }

    pub async fn execute(&self, plan: &ExecutionPlan, request: &InferenceRequest) -> AppResult<(InferenceResponse, ExecutionRecord)> {
        let start = Instant::now();

        let outcome = match plan.strategy {
            ExecutionStrategy::EdgeOnly => self.run_edge_only(request, plan.draft_max_tokens).await,
            ExecutionStrategy::CloudDirect => self.run_cloud_direct(request).await,
            ExecutionStrategy::SpeculativeStandard | ExecutionStrategy::AdaptiveConfidence => {
                self.run_speculative(request, plan).await
            }
        };

        let outcome = match outcome {
            Ok(outcome) => outcome,
            Err(AppError::ProtocolShape(msg)) => return Err(AppError::ProtocolShape(msg)),
            Err(e) => {
                warn!("primary strategy {} failed ({e}), re-entering with edge-only surrogate", plan.strategy);
                self.run_edge_only(request, plan.draft_max_tokens).await?
            }
        };

        let total_latency_ms = start.elapsed().as_secs_f32() * 1000.0;
        let response = InferenceResponse {
            text: outcome.text,
            tokens: outcome.tokens,
            total_latency_ms,
            edge_latency_ms: outcome.edge_latency_ms,
            cloud_latency_ms: outcome.cloud_latency_ms,
            confidence_score: outcome.confidence_score,
            acceptance_rate: outcome.acceptance_rate,
            used_draft_verify: outcome.used_draft_verify,
            strategy: plan.strategy,
        };

        let record = ExecutionRecord {
            timestamp_ms: chrono::Utc::now().timestamp_millis(),
            strategy: plan.strategy,
            acceptance_rate: outcome.acceptance_rate,
            latency_ms: total_latency_ms,
            edge_latency_ms: response.edge_latency_ms,
            cloud_latency_ms: response.cloud_latency_ms,
            confidence_score: response.confidence_score,
            success: true,
            tokens_generated: response.tokens.len() as u32,
        };

        Ok((response, record))
    }

    async fn run_edge_only(&self, request: &InferenceRequest, draft_max_tokens: u32) -> AppResult<Outcome> {
        let (draft, metrics, edge_latency) = self.draft_engine.generate_draft(&request.prompt, draft_max_tokens).await?;
        Ok(Outcome {
            text: draft.text.clone(),
            tokens: vec![draft.text],
            edge_latency_ms: edge_latency.as_secs_f32() * 1000.0,
            cloud_latency_ms: 0.0,
            confidence_score: metrics.score,
            acceptance_rate: 0.0,
            used_draft_verify: false,
        })
    }

    async fn run_cloud_direct(&self, request: &InferenceRequest) -> AppResult<Outcome> {
        let start = Instant::now();
        match self.verifier.infer_direct(&request.prompt, request.max_tokens, CLOUD_DIRECT_TIMEOUT).await {
            Ok(text) => Ok(Outcome {
                tokens: vec![text.clone()],
                text,
                edge_latency_ms: 0.0,
                cloud_latency_ms: start.elapsed().as_secs_f32() * 1000.0,
                confidence_score: 1.0,
                acceptance_rate: 0.0,
                used_draft_verify: false,
            }),
            Err(e) => {
                warn!("cloud direct inference failed ({e}), degrading to edge-only");
                self.run_edge_only(request, 128).await
            }
        }
    }

    async fn run_speculative(&self, request: &InferenceRequest, plan: &ExecutionPlan) -> AppResult<Outcome> {
        let (draft, metrics, edge_latency) = self.draft_engine.generate_draft(&request.prompt, plan.draft_max_tokens).await?;
        let edge_latency_ms = edge_latency.as_secs_f32() * 1000.0;

        if request.allow_confidence_gating && metrics.score < plan.confidence_threshold {
            return Ok(Outcome {
                text: draft.text.clone(),
                tokens: vec![draft.text],
                edge_latency_ms,
                cloud_latency_ms: 0.0,
                confidence_score: metrics.score,
                acceptance_rate: 0.0,
                used_draft_verify: false,
            });
        }

        let verify_request = VerifyRequest {
            prompt: request.prompt.clone(),
            draft_text: draft.text.clone(),
            confidence_threshold: plan.confidence_threshold,
        };

        let cloud_start = Instant::now();
        match self
            .verifier
            .verify(verify_request, Duration::from_millis(plan.verify_timeout_ms))
            .await
        {
            Ok(verified) => Ok(Outcome {
                text: verified.final_text.clone(),
                tokens: verified.verified_tokens,
                edge_latency_ms,
                cloud_latency_ms: cloud_start.elapsed().as_secs_f32() * 1000.0,
                confidence_score: metrics.score,
                acceptance_rate: verified.acceptance_rate,
                used_draft_verify: true,
            }),
            Err(e) => {
                warn!("verify call failed ({e}), returning unverified draft");
                Ok(Outcome {
                    text: draft.text.clone(),
                    tokens: vec![draft.text],
                    edge_latency_ms,
                    cloud_latency_ms: cloud_start.elapsed().as_secs_f32() * 1000.0,
                    confidence_score: metrics.score,
                    acceptance_rate: 0.0,
                    used_draft_verify: false,
                })
            }
        }
    }
}

struct Outcome {
    text: String,
    tokens: Vec<String>,
    edge_latency_ms: f32,
    cloud_latency_ms: f32,
    confidence_score: f32,
    acceptance_rate: f32,
    used_draft_verify: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::confidence::StrategyConfidenceScorer;
    use crate::draft::LocalDraftEngine;
    use async_trait::async_trait;
    use common::{ConfidenceStrategy, PrivacyLevel, TaskRequirements, VerifyResponse};
    use std::sync::Mutex;

    struct FakeVerifier {
        accept: bool,
        fail: bool,
        calls: Mutex<u32>,
    }

    #[async_trait]
    impl VerifierClient for FakeVerifier {
        async fn verify(&self, request: VerifyRequest, _timeout: Duration) -> AppResult<VerifyResponse> {
            *self.calls.lock().unwrap() += 1;
            if self.fail {
                return Err(AppError::Transient("simulated failure".to_string()));
            }
            let acceptance_rate = if self.accept { 1.0 } else { 0.3 };
            Ok(VerifyResponse {
                verified_tokens: vec![request.draft_text.clone()],
                accepted_count: 1,
                total_count: 1,
                acceptance_rate,
                corrected_positions: vec![],
                final_text: format!("{}{}", request.prompt, request.draft_text),
                latency_ms: 1.0,
            })
        }

        async fn infer_direct(&self, prompt: &str, _max_tokens: u32, _timeout: Duration) -> AppResult<String> {
            if self.fail {
                return Err(AppError::Transient("simulated failure".to_string()));
            }
            Ok(format!("{prompt} cloud-answer"))
        }
    }

    fn request() -> InferenceRequest {
        InferenceRequest {
            prompt: "hello".to_string(),
            max_tokens: 16,
            temperature: 0.7,
            top_p: 0.95,
            top_k: None,
            allow_speculative: true,
            allow_confidence_gating: true,
            requirements: TaskRequirements { privacy_level: PrivacyLevel::Public, ..Default::default() },
        }
    }

    fn plan(strategy: ExecutionStrategy, confidence_threshold: f32) -> ExecutionPlan {
        ExecutionPlan {
            strategy,
            score: 0.5,
            reason: String::new(),
            confidence_threshold,
            draft_max_tokens: 8,
            verify_timeout_ms: 1000,
        }
    }

    fn orchestrator(verifier: FakeVerifier) -> Orchestrator {
        let draft_engine = Arc::new(LocalDraftEngine::new(Box::new(StrategyConfidenceScorer::new(ConfidenceStrategy::MaxProb))));
        Orchestrator::new(draft_engine, Arc::new(verifier))
    }

    #[tokio::test]
    async fn edge_only_never_calls_cloud() {
        let orch = orchestrator(FakeVerifier { accept: true, fail: false, calls: Mutex::new(0) });
        let (response, record) = orch.execute(&plan(ExecutionStrategy::EdgeOnly, 0.0), &request()).await.unwrap();
        assert!(!response.used_draft_verify);
        assert_eq!(record.cloud_latency_ms, 0.0);
    }

    #[tokio::test]
    async fn low_confidence_short_circuits_before_verify() {
        let orch = orchestrator(FakeVerifier { accept: true, fail: false, calls: Mutex::new(0) });
        let (response, _) = orch
            .execute(&plan(ExecutionStrategy::SpeculativeStandard, 1.01), &request())
            .await
            .unwrap();
        assert!(!response.used_draft_verify);
        assert_eq!(response.acceptance_rate, 0.0);
    }

    #[tokio::test]
    async fn verify_failure_degrades_to_unverified_draft() {
        let orch = orchestrator(FakeVerifier { accept: true, fail: true, calls: Mutex::new(0) });
        let (response, record) = orch
            .execute(&plan(ExecutionStrategy::SpeculativeStandard, 0.0), &request())
            .await
            .unwrap();
        assert!(!response.used_draft_verify);
        assert!(record.success);
    }

    #[tokio::test]
    async fn cloud_direct_failure_degrades_to_edge_only() {
        let orch = orchestrator(FakeVerifier { accept: true, fail: true, calls: Mutex::new(0) });
        let (response, _) = orch.execute(&plan(ExecutionStrategy::CloudDirect, 0.0), &request()).await.unwrap();
        assert_eq!(response.cloud_latency_ms, 0.0);
    }

    #[tokio::test]
    async fn empty_prompt_surfaces_as_protocol_error() {
        let orch = orchestrator(FakeVerifier { accept: true, fail: false, calls: Mutex::new(0) });
        let mut req = request();
        req.prompt.clear();
        let result = orch.execute(&plan(ExecutionStrategy::EdgeOnly, 0.0), &req).await;
        assert!(matches!(result, Err(AppError::ProtocolShape(_))));
    }
}
