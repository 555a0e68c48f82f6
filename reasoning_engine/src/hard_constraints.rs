//! Fixed-priority-order hard-constraint gating: the first matching rule
//! wins and bypasses scoring entirely.
//!
//! Grounded in `original_source/edge/decision_engine.py::HardConstraintChecker`.

use common::{DecisionContext, DeviceType, ExecutionStrategy, HardConstraintsConfig, PrivacyLevel};

#[derive(Debug, Clone)]
pub struct HardDecision {
    pub strategy: ExecutionStrategy,
    pub reason: String,
}

pub struct HardConstraintChecker {
    config: HardConstraintsConfig,
}

impl HardConstraintChecker {
    pub fn new(config: HardConstraintsConfig) -> Self {
        Self { config }
    }

    /// Checks constraints in priority order. Returns `Some` as soon as one
    /// fires; the caller must not fall through to scoring when it does.
    pub fn check(&self, context: &DecisionContext) -> Option<HardDecision> {
        let system = &context.system;
        let requirements = &context.requirements;

        // 1. Hardware overload protection.
        match system.device_type {
            DeviceType::Gpu => {
                if system.gpu_usage > self.config.gpu_overload {
                    return Some(HardDecision {
                        strategy: ExecutionStrategy::CloudDirect,
                        reason: format!("GPU overloaded ({:.1}%)", system.gpu_usage),
                    });
                }
            }
            DeviceType::Cpu => {
                if system.cpu_usage > self.config.cpu_overload {
                    return Some(HardDecision {
                        strategy: ExecutionStrategy::CloudDirect,
                        reason: format!("CPU overloaded ({:.1}%)", system.cpu_usage),
                    });
                }
            }
        }

        if system.memory_available_mb < self.config.memory_critical {
            return Some(HardDecision {
                strategy: ExecutionStrategy::CloudDirect,
                reason: format!("memory pressure ({:.0}MB available)", system.memory_available_mb),
            });
        }

        // 2. Ultra-low-latency SLO: can't afford a cloud round trip.
        if requirements.max_latency_ms < self.config.ultra_low_latency {
            return Some(HardDecision {
                strategy: ExecutionStrategy::EdgeOnly,
                reason: format!(
                    "ultra-low-latency SLO (<{}ms), cannot wait on cloud",
                    self.config.ultra_low_latency
                ),
            });
        }

        // 3. Privacy/confidentiality.
        if requirements.privacy_level.level() >= PrivacyLevel::Confidential.level() {
            return Some(HardDecision {
                strategy: ExecutionStrategy::EdgeOnly,
                reason: "privacy-sensitive data must not leave the edge".to_string(),
            });
        }

        // 4. Weak network.
        if let Some(network) = &context.network {
            if network.is_weak_network {
                return Some(HardDecision {
                    strategy: ExecutionStrategy::EdgeOnly,
                    reason: format!("weak network (RTT={:.1}ms), avoiding cloud calls", network.rtt_ms),
                });
            }
            if network.rtt_ms > self.config.weak_network_rtt {
                return Some(HardDecision {
                    strategy: ExecutionStrategy::EdgeOnly,
                    reason: format!(
                        "network latency too high (RTT={:.1}ms > {}ms)",
                        network.rtt_ms, self.config.weak_network_rtt
                    ),
                });
            }
        }

        // 5. Urgent task with low quality bar: favor speed over everything.
        if requirements.priority >= 3 && requirements.min_quality_score < 0.7 {
            return Some(HardDecision {
                strategy: ExecutionStrategy::EdgeOnly,
                reason: "urgent task with low quality bar, prioritizing responsiveness".to_string(),
            });
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{InferenceRequest, NetworkStats, SystemStats, TaskRequirements};

    fn context(system: SystemStats, requirements: TaskRequirements, network: Option<NetworkStats>) -> DecisionContext {
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
            system,
            requirements,
            network,
        }
    }

    #[test]
    fn cpu_overload_forces_cloud_direct() {
        let checker = HardConstraintChecker::new(HardConstraintsConfig::default());
        let ctx = context(
            SystemStats { cpu_usage: 98.0, ..Default::default() },
            TaskRequirements::default(),
            None,
        );
        let decision = checker.check(&ctx).expect("should trigger");
        assert_eq!(decision.strategy, ExecutionStrategy::CloudDirect);
    }

    #[test]
    fn confidential_overrides_weak_network() {
        let checker = HardConstraintChecker::new(HardConstraintsConfig::default());
        let requirements = TaskRequirements { privacy_level: PrivacyLevel::Confidential, ..Default::default() };
        let ctx = context(
            SystemStats::default(),
            requirements,
            Some(NetworkStats { is_weak_network: true, ..Default::default() }),
        );
        let decision = checker.check(&ctx).expect("should trigger");
        assert_eq!(decision.strategy, ExecutionStrategy::EdgeOnly);
        assert!(decision.reason.contains("privacy"));
    }

    #[test]
    fn no_constraint_triggered_falls_through() {
        let checker = HardConstraintChecker::new(HardConstraintsConfig::default());
        let ctx = context(SystemStats::default(), TaskRequirements::default(), None);
        assert!(checker.check(&ctx).is_none());
    }
}
