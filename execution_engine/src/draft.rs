//! Local draft generation: an edge-resident collaborator producing a
//! best-effort continuation plus per-token probabilities.
//!
//! Draft-model implementation is an explicit non-goal (spec.md §1); this
//! produces a deterministic pseudo-draft from a small built-in vocabulary,
//! grounded in `original_source/edge/draft_generator.py::MockLlamaModel`'s
//! fallback-mode shape and the teacher's `Deployer`-trait-for-testability
//! pattern.

use async_trait::async_trait;
use common::{AppError, AppResult, ConfidenceMetrics, Draft};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::{Duration, Instant};

use crate::confidence::ConfidenceScorer;

#[async_trait]
pub trait DraftEngine: Send + Sync {
    async fn generate_draft(&self, prompt: &str, max_tokens: u32) -> AppResult<(Draft, ConfidenceMetrics, Duration)>;
}

const VOCAB: &[&str] = &[
    "the", "a", "system", "model", "is", "able", "to", "generate", "a", "response",
    "based", "on", "the", "prompt", "and", "available", "context", "quickly",
    "and", "with", "reasonable", "confidence", "for", "most", "requests",
];

pub struct LocalDraftEngine {
    confidence_scorer: Box<dyn ConfidenceScorer>,
}

impl LocalDraftEngine {
    pub fn new(confidence_scorer: Box<dyn ConfidenceScorer>) -> Self {
        Self { confidence_scorer }
    }
}

#[async_trait]
impl DraftEngine for LocalDraftEngine {
    async fn generate_draft(&self, prompt: &str, max_tokens: u32) -> AppResult<(Draft, ConfidenceMetrics, Duration)> {
        if prompt.is_empty() {
            return Err(AppError::ProtocolShape("prompt must not be empty".to_string()));
        }

        let start = Instant::now();
        let seed = prompt.bytes().fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64));
        let mut rng = StdRng::seed_from_u64(seed);

        let n = (max_tokens as usize).min(VOCAB.len()).max(1);
        let mut words = Vec::with_capacity(n);
        let mut token_ids = Vec::with_capacity(n);
        let mut token_probs = Vec::with_capacity(n);

        for i in 0..n {
            let idx = (seed as usize + i) % VOCAB.len();
            words.push(VOCAB[idx]);
            token_ids.push(idx as u32);
            // Simulated per-token probability: high for common continuations,
            // with a bit of noise so confidence isn't always saturated.
            let base = 0.6 + 0.35 * (1.0 - i as f32 / n as f32);
            let noise: f32 = rng.gen_range(-0.05..0.05);
            token_probs.push((base + noise).clamp(0.01, 0.99));
        }

        let text = format!(" {}", words.join(" "));
        let draft = Draft {
            text,
            token_ids,
            token_probs: token_probs.clone(),
        };
        let metrics = self.confidence_scorer.compute(&token_probs);
        Ok((draft, metrics, start.elapsed()))
    }
}
