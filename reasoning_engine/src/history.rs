//! Sliding-window execution history, used to ground scoring and adaptive
//! tuning in what the system actually observed rather than static estimates.
//!
//! Grounded in `original_source/edge/history_tracker.py`.

use std::collections::{HashMap, VecDeque};

use common::{ExecutionRecord, ExecutionStrategy};

#[derive(Debug, Clone, Default)]
pub struct ConfidenceDistribution {
    pub mean: f32,
    pub min: f32,
    pub max: f32,
    pub stdev: f32,
}

pub struct HistoryTracker {
    max_history_size: usize,
    history: VecDeque<ExecutionRecord>,
    by_strategy: HashMap<ExecutionStrategy, Vec<ExecutionRecord>>,
}

impl HistoryTracker {
    pub fn new(max_history_size: usize) -> Self {
        let mut by_strategy = HashMap::new();
        for strategy in ExecutionStrategy::ALL {
            by_strategy.insert(strategy, Vec::new());
        }
        Self {
            max_history_size,
            history: VecDeque::with_capacity(max_history_size),
            by_strategy,
        }
    }

    pub fn add_record(&mut self, record: ExecutionRecord) {
        if self.history.len() == self.max_history_size {
            self.history.pop_front();
        }
        self.history.push_back(record.clone());

        let bucket = self.by_strategy.entry(record.strategy).or_default();
        bucket.push(record);
        if bucket.len() > self.max_history_size {
            bucket.remove(0);
        }
    }

    pub fn recent_records(&self, n: usize) -> Vec<&ExecutionRecord> {
        let len = self.history.len();
        let start = len.saturating_sub(n);
        self.history.iter().skip(start).collect()
    }

    pub fn records_by_strategy(&self, strategy: ExecutionStrategy, n: Option<usize>) -> Vec<&ExecutionRecord> {
        let records = self.by_strategy.get(&strategy).map(Vec::as_slice).unwrap_or(&[]);
        match n {
            None => records.iter().collect(),
            Some(n) => {
                let start = records.len().saturating_sub(n);
                records[start..].iter().collect()
            }
        }
    }

    /// Average acceptance rate over the last `n` records of speculative
    /// strategies (EDGE_ONLY/CLOUD_DIRECT never populate `acceptance_rate`).
    /// Defaults to 0.8 with insufficient data, matching the original.
    pub fn recent_acceptance_rate(&self, strategy: Option<ExecutionStrategy>, n: usize) -> f32 {
        let records: Vec<&ExecutionRecord> = match strategy {
            Some(s) => self.records_by_strategy(s, Some(n)),
            None => self.recent_records(n),
        };
        if records.is_empty() {
            return 0.8;
        }
        let speculative: Vec<&&ExecutionRecord> =
            records.iter().filter(|r| r.strategy.is_speculative()).collect();
        if speculative.is_empty() {
            return 0.8;
        }
        let sum: f32 = speculative.iter().map(|r| r.acceptance_rate).sum();
        sum / speculative.len() as f32
    }

    pub fn avg_latency(&self, strategy: Option<ExecutionStrategy>, n: usize) -> f32 {
        let records: Vec<&ExecutionRecord> = match strategy {
            Some(s) => self.records_by_strategy(s, Some(n)),
            None => self.recent_records(n),
        };
        if records.is_empty() {
            return 100.0;
        }
        let sum: f32 = records.iter().map(|r| r.latency_ms).sum();
        sum / records.len() as f32
    }

    pub fn success_rate(&self, strategy: Option<ExecutionStrategy>, n: usize) -> f32 {
        let records: Vec<&ExecutionRecord> = match strategy {
            Some(s) => self.records_by_strategy(s, Some(n)),
            None => self.recent_records(n),
        };
        if records.is_empty() {
            return 1.0;
        }
        let successes = records.iter().filter(|r| r.success).count();
        successes as f32 / records.len() as f32
    }

    pub fn confidence_distribution(&self, n: usize) -> ConfidenceDistribution {
        let records = self.recent_records(n);
        if records.is_empty() {
            return ConfidenceDistribution {
                mean: 0.8,
                min: 0.0,
                max: 1.0,
                stdev: 0.0,
            };
        }
        let scores: Vec<f32> = records.iter().map(|r| r.confidence_score).collect();
        let mean = scores.iter().sum::<f32>() / scores.len() as f32;
        let min = scores.iter().cloned().fold(f32::INFINITY, f32::min);
        let max = scores.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        let stdev = if scores.len() > 1 {
            let variance = scores.iter().map(|s| (s - mean).powi(2)).sum::<f32>() / (scores.len() - 1) as f32;
            variance.sqrt()
        } else {
            0.0
        };
        ConfidenceDistribution { mean, min, max, stdev }
    }

    pub fn strategy_distribution(&self, n: usize) -> HashMap<ExecutionStrategy, f32> {
        let records = self.recent_records(n);
        if records.is_empty() {
            return HashMap::new();
        }
        let mut counts: HashMap<ExecutionStrategy, u32> = HashMap::new();
        for r in &records {
            *counts.entry(r.strategy).or_insert(0) += 1;
        }
        let total = records.len() as f32;
        counts.into_iter().map(|(k, v)| (k, v as f32 / total)).collect()
    }

    pub fn total_records(&self) -> usize {
        self.history.len()
    }

    pub fn clear(&mut self) {
        self.history.clear();
        for bucket in self.by_strategy.values_mut() {
            bucket.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(strategy: ExecutionStrategy, acceptance_rate: f32, success: bool) -> ExecutionRecord {
        ExecutionRecord {
            timestamp_ms: 0,
            strategy,
            acceptance_rate,
            latency_ms: 50.0,
            edge_latency_ms: 10.0,
            cloud_latency_ms: 40.0,
            confidence_score: 0.9,
            success,
            tokens_generated: 10,
        }
    }

    #[test]
    fn defaults_with_no_history() {
        let tracker = HistoryTracker::new(10);
        assert_eq!(tracker.recent_acceptance_rate(None, 20), 0.8);
        assert_eq!(tracker.avg_latency(None, 20), 100.0);
        assert_eq!(tracker.success_rate(None, 20), 1.0);
    }

    #[test]
    fn sliding_window_evicts_oldest() {
        let mut tracker = HistoryTracker::new(2);
        tracker.add_record(record(ExecutionStrategy::EdgeOnly, 0.0, true));
        tracker.add_record(record(ExecutionStrategy::EdgeOnly, 0.0, true));
        tracker.add_record(record(ExecutionStrategy::EdgeOnly, 0.0, true));
        assert_eq!(tracker.total_records(), 2);
    }

    #[test]
    fn acceptance_rate_only_considers_speculative_strategies() {
        let mut tracker = HistoryTracker::new(10);
        tracker.add_record(record(ExecutionStrategy::EdgeOnly, 0.1, true));
        tracker.add_record(record(ExecutionStrategy::SpeculativeStandard, 0.9, true));
        assert_eq!(tracker.recent_acceptance_rate(None, 20), 0.9);
    }
}
