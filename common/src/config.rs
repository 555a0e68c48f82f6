use serde::{Deserialize, Serialize};

use crate::types::DeviceType;

fn cpu_overload_default() -> f32 {
    95.0
}
fn gpu_overload_default() -> f32 {
    85.0
}
fn memory_critical_default() -> f32 {
    500.0
}
fn ultra_low_latency_default() -> u32 {
    50
}
fn weak_network_rtt_default() -> f32 {
    150.0
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HardConstraintsConfig {
    pub cpu_overload: f32,
    pub gpu_overload: f32,
    pub memory_critical: f32,
    pub ultra_low_latency: u32,
    pub weak_network_rtt: f32,
}

impl Default for HardConstraintsConfig {
    fn default() -> Self {
        Self {
            cpu_overload: cpu_overload_default(),
            gpu_overload: gpu_overload_default(),
            memory_critical: memory_critical_default(),
            ultra_low_latency: ultra_low_latency_default(),
            weak_network_rtt: weak_network_rtt_default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScoringWeightsConfig {
    pub latency: f32,
    pub cost: f32,
    pub quality: f32,
}

impl Default for ScoringWeightsConfig {
    fn default() -> Self {
        Self {
            latency: 0.4,
            cost: 0.3,
            quality: 0.3,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LatencyEstimatesConfig {
    pub edge_only_ms: f32,
    pub cloud_direct_ms: f32,
    pub speculative_standard_ms: f32,
}

impl Default for LatencyEstimatesConfig {
    fn default() -> Self {
        Self {
            edge_only_ms: 30.0,
            cloud_direct_ms: 200.0,
            speculative_standard_ms: 80.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HardwareConfig {
    pub device_type: DeviceType,
    pub gpu_overload_threshold: f32,
    pub gpu_memory_critical_mb: f32,
}

impl Default for HardwareConfig {
    fn default() -> Self {
        Self {
            device_type: DeviceType::Cpu,
            gpu_overload_threshold: gpu_overload_default(),
            gpu_memory_critical_mb: 1000.0,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct HardwareModeConfig {
    pub edge_only_max_tokens: u32,
    pub collaborative_draft_tokens: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HardwareAdaptiveConfig {
    pub gpu_mode: HardwareModeConfig,
    pub cpu_mode: HardwareModeConfig,
}

impl Default for HardwareAdaptiveConfig {
    fn default() -> Self {
        Self {
            gpu_mode: HardwareModeConfig {
                edge_only_max_tokens: 256,
                collaborative_draft_tokens: 96,
            },
            cpu_mode: HardwareModeConfig {
                edge_only_max_tokens: 128,
                collaborative_draft_tokens: 48,
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AdaptiveThresholdConfig {
    pub target_acceptance_min: f32,
    pub target_acceptance_max: f32,
    pub threshold_step: f32,
    pub smoothing_factor: f32,
    pub threshold_min: f32,
    pub threshold_max: f32,
    pub initial_confidence_threshold: f32,
    pub update_interval: u32,
    pub initial_draft_max_tokens: u32,
    pub default_latency_slo_ms: u32,
}

impl Default for AdaptiveThresholdConfig {
    fn default() -> Self {
        Self {
            target_acceptance_min: 0.80,
            target_acceptance_max: 0.90,
            threshold_step: 0.05,
            smoothing_factor: 0.1,
            threshold_min: 0.50,
            threshold_max: 0.95,
            initial_confidence_threshold: 0.80,
            update_interval: 10,
            initial_draft_max_tokens: 64,
            default_latency_slo_ms: 150,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HistoryTrackerConfig {
    pub max_history_size: usize,
}

impl Default for HistoryTrackerConfig {
    fn default() -> Self {
        Self {
            max_history_size: 100,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct F1Config {
    pub hard_constraints: HardConstraintsConfig,
    pub scoring_weights: ScoringWeightsConfig,
    pub latency_estimates: LatencyEstimatesConfig,
    pub hardware: HardwareConfig,
    pub hardware_adaptive: HardwareAdaptiveConfig,
    pub adaptive_threshold: AdaptiveThresholdConfig,
    pub history_tracker: HistoryTrackerConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8070,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ModelConfig {
    pub path: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: "models/draft".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ConfidenceConfig {
    pub strategy: String,
}

impl Default for ConfidenceConfig {
    fn default() -> Self {
        Self {
            strategy: "max_prob".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct KvCacheConfig {
    pub max_size: usize,
}

impl Default for KvCacheConfig {
    fn default() -> Self {
        Self { max_size: 256 }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EdgeConfig {
    pub server: ServerConfig,
    pub model: ModelConfig,
    pub confidence: ConfidenceConfig,
    pub kv_cache: KvCacheConfig,
    pub f1: F1Config,
    #[serde(default = "default_true")]
    pub enable_network_probe: bool,
    #[serde(default = "default_true")]
    pub enable_adaptive: bool,
}

fn default_true() -> bool {
    true
}

impl Default for EdgeConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            model: ModelConfig::default(),
            confidence: ConfidenceConfig::default(),
            kv_cache: KvCacheConfig::default(),
            f1: F1Config::default(),
            enable_network_probe: true,
            enable_adaptive: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DraftVerifierConfig {
    pub acceptance_threshold: f32,
}

impl Default for DraftVerifierConfig {
    fn default() -> Self {
        Self {
            acceptance_threshold: 0.8,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CloudConfig {
    pub server: ServerConfig,
    pub model: ModelConfig,
    pub draft_verifier: DraftVerifierConfig,
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8081,
            },
            model: ModelConfig {
                path: "models/verifier".to_string(),
            },
            draft_verifier: DraftVerifierConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CommunicationConfig {
    pub edge_endpoint: String,
    pub cloud_endpoint: String,
}

impl Default for CommunicationConfig {
    fn default() -> Self {
        Self {
            edge_endpoint: "http://localhost:8070".to_string(),
            cloud_endpoint: "http://localhost:8081".to_string(),
        }
    }
}

/// Top-level document loaded from the edge/cloud YAML config file.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub edge: EdgeConfig,
    pub cloud: CloudConfig,
    pub communication: CommunicationConfig,
}

impl AppConfig {
    pub fn from_yaml_str(s: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(s)
    }

    pub fn from_file(path: &std::path::Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config {}: {e}", path.display()))?;
        Self::from_yaml_str(&raw)
            .map_err(|e| anyhow::anyhow!("failed to parse config {}: {e}", path.display()))
    }
}
