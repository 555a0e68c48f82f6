//! Turns a chosen strategy into a fully-parameterised `ExecutionPlan`:
//! hardware-aware draft sizing, SLO-driven length compression, and
//! confidence-threshold computation.
//!
//! Grounded in `original_source/edge/execution_planner.py`.

use common::{DecisionContext, DeviceType, ExecutionPlan, ExecutionStrategy, HardwareAdaptiveConfig};

const DEFAULT_VERIFY_TIMEOUT_MS: u64 = 5000;

pub struct ExecutionPlanner {
    hardware_adaptive: HardwareAdaptiveConfig,
}

impl ExecutionPlanner {
    pub fn new(hardware_adaptive: HardwareAdaptiveConfig) -> Self {
        Self { hardware_adaptive }
    }

    pub fn generate_plan(
        &self,
        strategy: ExecutionStrategy,
        context: &DecisionContext,
        score: f32,
        reason: String,
        adaptive_draft_max_tokens: Option<u32>,
    ) -> ExecutionPlan {
        let mut draft_max_tokens = if strategy.is_speculative() {
            adaptive_draft_max_tokens.unwrap_or_else(|| self.hardware_draft_tokens(strategy, context.system.device_type))
        } else {
            self.hardware_draft_tokens(strategy, context.system.device_type)
        };
        let mut verify_timeout_ms = DEFAULT_VERIFY_TIMEOUT_MS;

        if strategy.is_speculative() {
            let slo = context.requirements.max_latency_ms;
            draft_max_tokens = if slo < 500 {
                let min_tokens = draft_max_tokens / 3;
                min_tokens.max(draft_max_tokens.min(32))
            } else if slo < 1000 {
                (draft_max_tokens as f32 * 0.75) as u32
            } else {
                draft_max_tokens
            };

            let loaded = match context.system.device_type {
                DeviceType::Gpu => context.system.gpu_usage > 70.0,
                DeviceType::Cpu => context.system.cpu_usage > 80.0,
            };
            if loaded {
                verify_timeout_ms = (verify_timeout_ms as f32 * 1.2) as u64;
            }
        }

        let confidence_threshold = self.confidence_threshold(strategy, context);

        ExecutionPlan {
            strategy,
            score,
            reason: if reason.is_empty() { format!("score: {:.3}", score) } else { reason },
            confidence_threshold,
            draft_max_tokens,
            verify_timeout_ms,
        }
    }

    fn hardware_draft_tokens(&self, strategy: ExecutionStrategy, device_type: DeviceType) -> u32 {
        let mode = match device_type {
            DeviceType::Gpu => &self.hardware_adaptive.gpu_mode,
            DeviceType::Cpu => &self.hardware_adaptive.cpu_mode,
        };
        match strategy {
            ExecutionStrategy::EdgeOnly => mode.edge_only_max_tokens,
            ExecutionStrategy::SpeculativeStandard | ExecutionStrategy::AdaptiveConfidence => {
                mode.collaborative_draft_tokens
            }
            ExecutionStrategy::CloudDirect => 128,
        }
    }

    fn confidence_threshold(&self, strategy: ExecutionStrategy, context: &DecisionContext) -> f32 {
        match strategy {
            ExecutionStrategy::SpeculativeStandard => 0.8,
            ExecutionStrategy::AdaptiveConfidence => {
                let mut threshold: f32 = 0.75;
                if context.requirements.min_quality_score > 0.9 {
                    threshold += 0.1;
                } else if context.requirements.min_quality_score < 0.7 {
                    threshold -= 0.1;
                }
                if context.requirements.priority >= 3 {
                    threshold -= 0.05;
                }
                threshold.clamp(0.5, 0.95)
            }
            _ => 0.8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{InferenceRequest, SystemStats, TaskRequirements};

    fn context(device_type: DeviceType, max_latency_ms: u32) -> DecisionContext {
        let requirements = TaskRequirements { max_latency_ms, ..Default::default() };
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
            system: SystemStats { device_type, ..Default::default() },
            requirements,
            network: None,
        }
    }

    #[test]
    fn gpu_gets_larger_draft_budget_than_cpu() {
        let planner = ExecutionPlanner::new(HardwareAdaptiveConfig::default());
        let gpu_plan = planner.generate_plan(
            ExecutionStrategy::EdgeOnly,
            &context(DeviceType::Gpu, 2000),
            0.5,
            String::new(),
            None,
        );
        let cpu_plan = planner.generate_plan(
            ExecutionStrategy::EdgeOnly,
            &context(DeviceType::Cpu, 2000),
            0.5,
            String::new(),
            None,
        );
        assert!(gpu_plan.draft_max_tokens > cpu_plan.draft_max_tokens);
    }

    #[test]
    fn tight_slo_compresses_draft_length() {
        let planner = ExecutionPlanner::new(HardwareAdaptiveConfig::default());
        let plan = planner.generate_plan(
            ExecutionStrategy::SpeculativeStandard,
            &context(DeviceType::Cpu, 400),
            0.5,
            String::new(),
            None,
        );
        assert!(plan.draft_max_tokens <= 32);
    }

    #[test]
    fn adaptive_confidence_threshold_is_clamped() {
        let planner = ExecutionPlanner::new(HardwareAdaptiveConfig::default());
        let mut ctx = context(DeviceType::Cpu, 2000);
        ctx.requirements.min_quality_score = 0.95;
        ctx.requirements.priority = 3;
        let plan = planner.generate_plan(ExecutionStrategy::AdaptiveConfidence, &ctx, 0.5, String::new(), None);
        assert!(plan.confidence_threshold >= 0.5 && plan.confidence_threshold <= 0.95);
    }

    #[test]
    fn adaptive_draft_override_replaces_hardware_default_for_speculative_strategies() {
        let planner = ExecutionPlanner::new(HardwareAdaptiveConfig::default());
        let plan = planner.generate_plan(
            ExecutionStrategy::SpeculativeStandard,
            &context(DeviceType::Cpu, 2000),
            0.5,
            String::new(),
            Some(96),
        );
        assert_eq!(plan.draft_max_tokens, 96);
    }
}
