//! Shared application state wired once at startup and handed to every
//! handler behind `web::Data`, matching `monitoring_service::http_server`'s
//! `Arc`-held-fields-on-a-plain-struct shape.

use std::path::PathBuf;
use std::sync::Arc;

use common::{ConfidenceStrategy, EdgeConfig};
use execution_engine::{DraftEngine, LocalDraftEngine, Orchestrator, StrategyConfidenceScorer};
use reasoning_engine::DecisionModule;
use resource_monitor::StateMonitor;

use crate::kv_cache::KvCache;

pub struct AppState {
    pub config: EdgeConfig,
    pub monitor: StateMonitor,
    pub decision: DecisionModule,
    pub orchestrator: Orchestrator,
    pub draft_engine: Arc<dyn DraftEngine>,
    pub cache: KvCache,
    pub cache_snapshot_path: Option<PathBuf>,
}

impl AppState {
    pub fn new(config: EdgeConfig, cloud_endpoint: &str, cache_snapshot_path: Option<PathBuf>) -> Self {
        let confidence_strategy = parse_confidence_strategy(&config.confidence.strategy);
        let draft_engine: Arc<dyn DraftEngine> =
            Arc::new(LocalDraftEngine::new(Box::new(StrategyConfidenceScorer::new(confidence_strategy))));
        let verifier = Arc::new(execution_engine::HttpVerifierClient::new(cloud_endpoint));
        let orchestrator = Orchestrator::new(draft_engine.clone(), verifier);

        let cache = match &cache_snapshot_path {
            Some(path) if path.exists() => KvCache::load_from_file(path, config.kv_cache.max_size),
            _ => KvCache::new(config.kv_cache.max_size),
        };

        Self {
            monitor: StateMonitor::new(cloud_endpoint, config.f1.hardware.device_type),
            decision: DecisionModule::new(config.f1.clone(), config.enable_adaptive),
            orchestrator,
            draft_engine,
            cache,
            cache_snapshot_path,
            config,
        }
    }

    pub fn persist_cache(&self) {
        if let Some(path) = &self.cache_snapshot_path {
            if let Err(e) = self.cache.save_to_file(path) {
                tracing::warn!("failed to persist cache snapshot: {e}");
            }
        }
    }
}

fn parse_confidence_strategy(name: &str) -> ConfidenceStrategy {
    match name {
        "entropy" => ConfidenceStrategy::Entropy,
        "temperature" => ConfidenceStrategy::Temperature,
        "top_k_agg" => ConfidenceStrategy::TopKAgg,
        _ => ConfidenceStrategy::MaxProb,
    }
}
