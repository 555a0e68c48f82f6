//! `DecisionModule`: the external entry point, composing hard-constraint
//! gating, multi-objective scoring, execution planning and adaptive tuning
//! behind a single `decide` call that never panics or propagates errors.
//!
//! Grounded in `original_source/edge/f1_decision.py::F1_DecisionModule`
//! and `autonomy_core::decision_maker::AutonomousDecisionMaker::make_decision`'s
//! ordered-fallback-chain shape.

use std::sync::RwLock;

use common::{DecisionContext, ExecutionPlan, ExecutionRecord, ExecutionStrategy, F1Config, SystemStats};
use tracing::{info, warn};

use crate::adaptive::AdaptiveThresholdCalculator;
use crate::hard_constraints::HardConstraintChecker;
use crate::history::HistoryTracker;
use crate::planner::ExecutionPlanner;
use crate::scorer::MultiObjectiveScorer;

pub struct DecisionModule {
    hard_constraints: HardConstraintChecker,
    scorer: MultiObjectiveScorer,
    planner: ExecutionPlanner,
    history: RwLock<HistoryTracker>,
    adaptive: RwLock<AdaptiveThresholdCalculator>,
    enable_adaptive: bool,
}

impl DecisionModule {
    pub fn new(config: F1Config, enable_adaptive: bool) -> Self {
        Self {
            hard_constraints: HardConstraintChecker::new(config.hard_constraints),
            scorer: MultiObjectiveScorer::new(config.scoring_weights, config.latency_estimates),
            planner: ExecutionPlanner::new(config.hardware_adaptive),
            history: RwLock::new(HistoryTracker::new(config.history_tracker.max_history_size)),
            adaptive: RwLock::new(AdaptiveThresholdCalculator::new(config.adaptive_threshold)),
            enable_adaptive,
        }
    }

    /// Core decision entry point: checks hard constraints, scores the
    /// remaining strategies, and falls back safely on any degenerate state.
    pub fn decide(&self, context: DecisionContext) -> ExecutionPlan {
        if self.enable_adaptive {
            let should_retune = self.adaptive.write().unwrap().should_update();
            if should_retune {
                self.adaptive.write().unwrap().retune(&self.history.read().unwrap());
            }
        }

        if let Some(hard_decision) = self.hard_constraints.check(&context) {
            info!(
                "hard constraint triggered: {} - {}",
                hard_decision.strategy, hard_decision.reason
            );
            return self.planner.generate_plan(
                hard_decision.strategy,
                &context,
                0.0,
                hard_decision.reason,
                self.adaptive_draft_max_tokens(),
            );
        }

        let history = self.history.read().unwrap();
        let scored = self.scorer.score_strategies(&context, &history);
        drop(history);

        let best = scored.iter().filter(|s| s.score > 0.0).max_by(|a, b| a.score.total_cmp(&b.score));

        match best {
            Some(best) => {
                let plan = self.planner.generate_plan(
                    best.strategy,
                    &context,
                    best.score,
                    String::new(),
                    self.adaptive_draft_max_tokens(),
                );
                info!("decision: {} (score={:.3})", plan.strategy, plan.score);
                plan
            }
            None => {
                warn!("all strategies scored zero, falling back");
                self.fallback_plan(&context, "all strategies scored zero, degrading")
            }
        }
    }

    /// Current adaptively-tuned draft length, when the adaptive controller
    /// is enabled; `None` leaves the planner on its hardware-based default.
    fn adaptive_draft_max_tokens(&self) -> Option<u32> {
        self.enable_adaptive.then(|| self.adaptive.read().unwrap().current_draft_max_tokens())
    }

    /// Safe default when scoring can't produce a usable answer: balanced
    /// collaborative inference if the system isn't overloaded, otherwise
    /// offload entirely to the cloud.
    fn fallback_plan(&self, context: &DecisionContext, reason: &str) -> ExecutionPlan {
        let strategy = if context.system.cpu_usage < 90.0 {
            ExecutionStrategy::SpeculativeStandard
        } else {
            ExecutionStrategy::CloudDirect
        };
        self.planner.generate_plan(strategy, context, 0.0, reason.to_string(), self.adaptive_draft_max_tokens())
    }

    /// Safe default used when context construction itself fails upstream
    /// (e.g. system sampling panicked) -- edge-only guarantees availability.
    pub fn exception_fallback(&self, context: &DecisionContext, reason: &str) -> ExecutionPlan {
        self.planner.generate_plan(ExecutionStrategy::EdgeOnly, context, 0.0, reason.to_string(), None)
    }

    pub fn record_execution(&self, record: ExecutionRecord) {
        self.history.write().unwrap().add_record(record);
    }

    pub fn statistics_summary(&self) -> StatisticsSummary {
        let history = self.history.read().unwrap();
        StatisticsSummary {
            total_records: history.total_records(),
            recent_acceptance_rate: history.recent_acceptance_rate(None, 20),
            avg_latency_ms: history.avg_latency(None, 20),
            success_rate: history.success_rate(None, 20),
        }
    }

    pub fn current_confidence_threshold(&self) -> f32 {
        self.adaptive.read().unwrap().current_threshold()
    }
}

#[derive(Debug, Clone)]
pub struct StatisticsSummary {
    pub total_records: usize,
    pub recent_acceptance_rate: f32,
    pub avg_latency_ms: f32,
    pub success_rate: f32,
}

pub fn conservative_system_snapshot() -> SystemStats {
    SystemStats {
        cpu_usage: 50.0,
        memory_available_mb: 2000.0,
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{InferenceRequest, SystemStats, TaskRequirements};

    fn context(requirements: TaskRequirements) -> DecisionContext {
        DecisionContext {
            request: InferenceRequest {
                prompt: "hi".to_string(),
                max_tokens: 128,
                temperature: 0.7,
                top_p: 0.95,
                top_k: None,
                allow_speculative: true,
                allow_confidence_gating: true,
                requirements,
            },
            system: SystemStats::default(),
            requirements,
            network: None,
        }
    }

    #[test]
    fn hard_constraint_skips_scoring() {
        let module = DecisionModule::new(F1Config::default(), false);
        let requirements = TaskRequirements { max_latency_ms: 10, ..Default::default() };
        let plan = module.decide(context(requirements));
        assert_eq!(plan.strategy, ExecutionStrategy::EdgeOnly);
    }

    #[test]
    fn normal_request_produces_a_scored_plan() {
        let module = DecisionModule::new(F1Config::default(), false);
        let plan = module.decide(context(TaskRequirements::default()));
        assert!(plan.score > 0.0);
    }

    #[test]
    fn recording_executions_feeds_statistics() {
        let module = DecisionModule::new(F1Config::default(), false);
        module.record_execution(ExecutionRecord {
            timestamp_ms: 0,
            strategy: ExecutionStrategy::SpeculativeStandard,
            acceptance_rate: 0.9,
            latency_ms: 40.0,
            edge_latency_ms: 10.0,
            cloud_latency_ms: 30.0,
            confidence_score: 0.9,
            success: true,
            tokens_generated: 20,
        });
        assert_eq!(module.statistics_summary().total_records, 1);
    }
}
