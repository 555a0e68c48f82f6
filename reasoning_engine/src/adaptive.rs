//! Periodic re-tuning of the confidence threshold from observed acceptance
//! rates, smoothed with exponential averaging and bounded by clamps.
//!
//! Grounded in `original_source/edge/adaptive_threshold.py`.

use common::{AdaptiveThresholdConfig, ExecutionStrategy};
use tracing::debug;

use crate::history::HistoryTracker;

const HISTORY_WINDOW: usize = 20;
const MIN_HISTORY_FOR_ADAPTATION: usize = 5;

pub struct AdaptiveThresholdCalculator {
    config: AdaptiveThresholdConfig,
    current_confidence_threshold: f32,
    current_draft_max_tokens: u32,
    execution_count: u64,
}

impl AdaptiveThresholdCalculator {
    pub fn new(config: AdaptiveThresholdConfig) -> Self {
        let current_confidence_threshold = config.initial_confidence_threshold;
        let current_draft_max_tokens = config.initial_draft_max_tokens;
        Self {
            config,
            current_confidence_threshold,
            current_draft_max_tokens,
            execution_count: 0,
        }
    }

    /// Counts one execution and reports whether this is the Nth, at which
    /// point the caller should retune.
    pub fn should_update(&mut self) -> bool {
        self.execution_count += 1;
        self.execution_count.is_multiple_of(self.config.update_interval as u64)
    }

    pub fn current_threshold(&self) -> f32 {
        self.current_confidence_threshold
    }

    pub fn current_draft_max_tokens(&self) -> u32 {
        self.current_draft_max_tokens
    }

    /// Recomputes both the confidence threshold and the draft length from
    /// recent history and stores them as the new current values.
    pub fn retune(&mut self, history: &HistoryTracker) -> f32 {
        let new_threshold = self.calculate_adaptive_confidence_threshold(history, self.current_confidence_threshold);
        if (new_threshold - self.current_confidence_threshold).abs() > 0.01 {
            debug!(
                "confidence threshold adjusted: {:.3} -> {:.3}",
                self.current_confidence_threshold, new_threshold
            );
        }
        self.current_confidence_threshold = new_threshold;

        let new_draft_length =
            self.calculate_adaptive_draft_length(history, self.current_draft_max_tokens, self.config.default_latency_slo_ms);
        if new_draft_length != self.current_draft_max_tokens {
            debug!(
                "draft length adjusted: {} -> {}",
                self.current_draft_max_tokens, new_draft_length
            );
        }
        self.current_draft_max_tokens = new_draft_length;

        new_threshold
    }

    fn calculate_adaptive_confidence_threshold(&self, history: &HistoryTracker, current_threshold: f32) -> f32 {
        if history
            .records_by_strategy(ExecutionStrategy::SpeculativeStandard, Some(HISTORY_WINDOW))
            .len()
            < MIN_HISTORY_FOR_ADAPTATION
        {
            return current_threshold;
        }

        let recent_ar = history.recent_acceptance_rate(Some(ExecutionStrategy::SpeculativeStandard), HISTORY_WINDOW);

        let adjustment = if recent_ar > self.config.target_acceptance_max {
            let overshoot = recent_ar - self.config.target_acceptance_max;
            -self.config.threshold_step * (overshoot / 0.1)
        } else if recent_ar < self.config.target_acceptance_min {
            let undershoot = self.config.target_acceptance_min - recent_ar;
            self.config.threshold_step * (undershoot / 0.1)
        } else {
            0.0
        };

        let smoothed = current_threshold * (1.0 - self.config.smoothing_factor)
            + (current_threshold + adjustment) * self.config.smoothing_factor;

        smoothed.clamp(self.config.threshold_min, self.config.threshold_max)
    }

    /// Shortens or lengthens the draft budget based on how close the
    /// observed latency is to the task's SLO.
    pub fn calculate_adaptive_draft_length(&self, history: &HistoryTracker, current_length: u32, task_latency_slo_ms: u32) -> u32 {
        let recent_latency = history.avg_latency(Some(ExecutionStrategy::SpeculativeStandard), HISTORY_WINDOW);
        let margin = task_latency_slo_ms as f32 - recent_latency;
        let ratio = margin / task_latency_slo_ms as f32;

        if ratio < 0.1 {
            current_length.saturating_sub(8).max(32)
        } else if ratio > 0.5 {
            (current_length + 8).min(128)
        } else {
            current_length
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::ExecutionRecord;

    fn record(acceptance_rate: f32) -> ExecutionRecord {
        ExecutionRecord {
            timestamp_ms: 0,
            strategy: ExecutionStrategy::SpeculativeStandard,
            acceptance_rate,
            latency_ms: 50.0,
            edge_latency_ms: 10.0,
            cloud_latency_ms: 40.0,
            confidence_score: 0.9,
            success: true,
            tokens_generated: 10,
        }
    }

    #[test]
    fn should_update_fires_every_nth_execution() {
        let mut calculator = AdaptiveThresholdCalculator::new(AdaptiveThresholdConfig { update_interval: 3, ..AdaptiveThresholdConfig::default() });
        assert!(!calculator.should_update());
        assert!(!calculator.should_update());
        assert!(calculator.should_update());
    }

    #[test]
    fn high_acceptance_rate_lowers_threshold() {
        let mut calculator = AdaptiveThresholdCalculator::new(AdaptiveThresholdConfig::default());
        let mut history = HistoryTracker::new(50);
        for _ in 0..10 {
            history.add_record(record(0.99));
        }
        let before = calculator.current_threshold();
        let after = calculator.retune(&history);
        assert!(after <= before);
    }

    #[test]
    fn insufficient_history_keeps_threshold_stable() {
        let mut calculator = AdaptiveThresholdCalculator::new(AdaptiveThresholdConfig::default());
        let history = HistoryTracker::new(50);
        let before = calculator.current_threshold();
        let after = calculator.retune(&history);
        assert_eq!(before, after);
    }
}
