//! Shared cloud process state: just enough bookkeeping to answer
//! `/cache/stats` honestly since this collaborator has no real KV cache of
//! its own (no real model is loaded, per the explicit non-goal).

use std::sync::atomic::{AtomicU64, Ordering};

use common::CloudConfig;
use serde::Serialize;

pub struct AppState {
    pub config: CloudConfig,
    requests_served: AtomicU64,
}

impl AppState {
    pub fn new(config: CloudConfig) -> Self {
        Self { config, requests_served: AtomicU64::new(0) }
    }

    pub fn record_request(&self) {
        self.requests_served.fetch_add(1, Ordering::Relaxed);
    }

    pub fn cache_stats(&self) -> RequestStats {
        RequestStats {
            requests_served: self.requests_served.load(Ordering::Relaxed),
            acceptance_threshold: self.config.draft_verifier.acceptance_threshold,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RequestStats {
    pub requests_served: u64,
    pub acceptance_threshold: f32,
}
