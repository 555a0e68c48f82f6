//! Weighted multi-objective scoring over latency, cost and quality,
//! grounded in historical observations when enough are available.
//!
//! Grounded in `original_source/edge/decision_engine.py::MultiObjectiveScorer`.

use common::{
    DecisionContext, ExecutionStrategy, LatencyEstimatesConfig, ScoringWeightsConfig,
};

use crate::history::HistoryTracker;

const MIN_HISTORY_FOR_SCORING: usize = 5;
const HISTORY_WINDOW: usize = 20;

#[derive(Debug, Clone, Copy)]
pub struct ScoredStrategy {
    pub strategy: ExecutionStrategy,
    pub score: f32,
}

pub struct MultiObjectiveScorer {
    weights: ScoringWeightsConfig,
    estimates: LatencyEstimatesConfig,
    enable_history_scoring: bool,
}

impl MultiObjectiveScorer {
    pub fn new(weights: ScoringWeightsConfig, estimates: LatencyEstimatesConfig) -> Self {
        Self {
            weights,
            estimates,
            enable_history_scoring: true,
        }
    }

    pub fn score_strategies(&self, context: &DecisionContext, history: &HistoryTracker) -> Vec<ScoredStrategy> {
        ExecutionStrategy::ALL
            .iter()
            .map(|&strategy| ScoredStrategy {
                strategy,
                score: self.calculate_score(strategy, context, history),
            })
            .collect()
    }

    fn calculate_score(&self, strategy: ExecutionStrategy, context: &DecisionContext, history: &HistoryTracker) -> f32 {
        let latency_score = self.score_latency(strategy, context, history);
        let cost_score = Self::score_cost(strategy);
        let quality_score = self.score_quality(strategy, context, history);

        let mut total = self.weights.latency * latency_score
            + self.weights.cost * cost_score
            + self.weights.quality * quality_score;

        if context.requirements.priority >= 2 {
            total += 0.1 * latency_score;
        }
        total
    }

    fn base_latency_estimate(&self, strategy: ExecutionStrategy) -> f32 {
        match strategy {
            ExecutionStrategy::EdgeOnly => self.estimates.edge_only_ms,
            ExecutionStrategy::CloudDirect => self.estimates.cloud_direct_ms,
            ExecutionStrategy::SpeculativeStandard => self.estimates.speculative_standard_ms,
            ExecutionStrategy::AdaptiveConfidence => self.estimates.speculative_standard_ms * 0.9,
        }
    }

    fn score_latency(&self, strategy: ExecutionStrategy, context: &DecisionContext, history: &HistoryTracker) -> f32 {
        let mut latency = if self.enable_history_scoring
            && history.records_by_strategy(strategy, Some(HISTORY_WINDOW)).len() >= MIN_HISTORY_FOR_SCORING
        {
            history.avg_latency(Some(strategy), HISTORY_WINDOW)
        } else {
            self.base_latency_estimate(strategy)
        };

        if let Some(network) = &context.network {
            match strategy {
                ExecutionStrategy::CloudDirect => latency += 2.0 * network.rtt_ms,
                s if s.is_speculative() => latency += network.rtt_ms,
                _ => {}
            }
        }

        let slo = context.requirements.max_latency_ms as f32;
        if latency > slo {
            return 0.0;
        }
        (1.0 - latency / slo).max(0.0)
    }

    fn score_cost(strategy: ExecutionStrategy) -> f32 {
        match strategy {
            ExecutionStrategy::EdgeOnly => 1.0,
            ExecutionStrategy::SpeculativeStandard => 0.6,
            ExecutionStrategy::AdaptiveConfidence => 0.7,
            ExecutionStrategy::CloudDirect => 0.0,
        }
    }

    fn score_quality(&self, strategy: ExecutionStrategy, context: &DecisionContext, history: &HistoryTracker) -> f32 {
        let mut quality = match strategy {
            ExecutionStrategy::EdgeOnly => 0.7,
            ExecutionStrategy::CloudDirect => 1.0,
            ExecutionStrategy::SpeculativeStandard => 0.95,
            ExecutionStrategy::AdaptiveConfidence => 0.92,
        };

        if self.enable_history_scoring
            && history.records_by_strategy(strategy, Some(HISTORY_WINDOW)).len() >= MIN_HISTORY_FOR_SCORING
        {
            let success_rate = history.success_rate(Some(strategy), HISTORY_WINDOW);
            if strategy.is_speculative() {
                let acceptance_rate = history.recent_acceptance_rate(Some(strategy), HISTORY_WINDOW);
                let boost = 0.8 + 0.2 * acceptance_rate;
                quality *= success_rate * boost;
            } else {
                quality *= success_rate;
            }
        }

        if context.requirements.min_quality_score > 0.9
            && matches!(strategy, ExecutionStrategy::CloudDirect | ExecutionStrategy::SpeculativeStandard)
        {
            quality = (quality + 0.1).min(1.0);
        }

        quality
    }
}
