//! Confidence scoring over a draft's per-token probabilities.
//!
//! The original implementation left `ConfidenceCalculator` a stub with a
//! single strategy in practice; this generalizes it into the
//! strategy-interface shape spec.md's Open Question (c) calls for, with one
//! method per named strategy.

use common::{ConfidenceMetrics, ConfidenceStrategy};

pub trait ConfidenceScorer: Send + Sync {
    fn compute(&self, token_probs: &[f32]) -> ConfidenceMetrics;
}

pub struct StrategyConfidenceScorer {
    strategy: ConfidenceStrategy,
}

impl StrategyConfidenceScorer {
    pub fn new(strategy: ConfidenceStrategy) -> Self {
        Self { strategy }
    }
}

impl ConfidenceScorer for StrategyConfidenceScorer {
    fn compute(&self, token_probs: &[f32]) -> ConfidenceMetrics {
        if token_probs.is_empty() {
            return ConfidenceMetrics {
                score: 0.0,
                entropy: 0.0,
                max_prob: 0.0,
                min_prob: 0.0,
                avg_prob: 0.0,
                strategy: self.strategy,
            };
        }

        let max_prob = token_probs.iter().cloned().fold(f32::MIN, f32::max);
        let min_prob = token_probs.iter().cloned().fold(f32::MAX, f32::min);
        let avg_prob = token_probs.iter().sum::<f32>() / token_probs.len() as f32;
        let entropy = -token_probs
            .iter()
            .filter(|&&p| p > 0.0)
            .map(|&p| p * p.ln())
            .sum::<f32>();

        let score = match self.strategy {
            ConfidenceStrategy::MaxProb => max_prob,
            ConfidenceStrategy::Entropy => {
                let max_entropy = (token_probs.len() as f32).ln().max(f32::EPSILON);
                (1.0 - entropy / max_entropy).clamp(0.0, 1.0)
            }
            ConfidenceStrategy::Temperature => avg_prob.powf(0.5),
            ConfidenceStrategy::TopKAgg => {
                let mut sorted = token_probs.to_vec();
                sorted.sort_by(|a, b| b.total_cmp(a));
                let k = sorted.len().min(5);
                sorted[..k].iter().sum::<f32>() / k as f32
            }
        };

        ConfidenceMetrics {
            score: score.clamp(0.0, 1.0),
            entropy,
            max_prob,
            min_prob,
            avg_prob,
            strategy: self.strategy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_probs_yield_zero_confidence() {
        let scorer = StrategyConfidenceScorer::new(ConfidenceStrategy::MaxProb);
        let metrics = scorer.compute(&[]);
        assert_eq!(metrics.score, 0.0);
    }

    #[test]
    fn max_prob_strategy_reports_the_highest_probability() {
        let scorer = StrategyConfidenceScorer::new(ConfidenceStrategy::MaxProb);
        let metrics = scorer.compute(&[0.2, 0.9, 0.4]);
        assert_eq!(metrics.score, 0.9);
    }

    #[test]
    fn uniform_distribution_has_low_entropy_confidence() {
        let scorer = StrategyConfidenceScorer::new(ConfidenceStrategy::Entropy);
        let peaked = scorer.compute(&[0.97, 0.01, 0.01, 0.01]);
        let uniform = scorer.compute(&[0.25, 0.25, 0.25, 0.25]);
        assert!(peaked.score > uniform.score);
    }
}
