use serde::{Deserialize, Serialize};

/// A single inference request as received on `/inference` or `/draft`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InferenceRequest {
    pub prompt: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_top_p")]
    pub top_p: f32,
    #[serde(default)]
    pub top_k: Option<u32>,
    #[serde(default = "default_true")]
    pub allow_speculative: bool,
    #[serde(default = "default_true")]
    pub allow_confidence_gating: bool,
    #[serde(default)]
    pub requirements: TaskRequirements,
}

fn default_max_tokens() -> u32 {
    128
}
fn default_temperature() -> f32 {
    0.7
}
fn default_top_p() -> f32 {
    0.95
}
fn default_true() -> bool {
    true
}

/// Per-request service-level requirements that drive hard constraints and scoring.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct TaskRequirements {
    #[serde(default = "default_max_latency_ms")]
    pub max_latency_ms: u32,
    #[serde(default = "default_min_quality")]
    pub min_quality_score: f32,
    #[serde(default = "default_priority")]
    pub priority: u8,
    #[serde(default)]
    pub privacy_level: PrivacyLevel,
}

fn default_max_latency_ms() -> u32 {
    2000
}
fn default_min_quality() -> f32 {
    0.7
}
fn default_priority() -> u8 {
    1
}

impl Default for TaskRequirements {
    fn default() -> Self {
        Self {
            max_latency_ms: default_max_latency_ms(),
            min_quality_score: default_min_quality(),
            priority: default_priority(),
            privacy_level: PrivacyLevel::Public,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PrivacyLevel {
    #[default]
    Public = 0,
    Sensitive = 1,
    Confidential = 2,
}

impl PrivacyLevel {
    pub fn level(&self) -> u8 {
        *self as u8
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceType {
    #[default]
    Cpu,
    Gpu,
}

/// Snapshot of edge hardware load, sampled through a short-TTL cache.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct SystemStats {
    pub cpu_usage: f32,
    pub memory_available_mb: f32,
    pub gpu_usage: f32,
    pub gpu_memory_free_mb: f32,
    pub device_type: DeviceType,
    pub timestamp_ms: i64,
}

impl Default for SystemStats {
    fn default() -> Self {
        Self {
            cpu_usage: 0.0,
            memory_available_mb: 4096.0,
            gpu_usage: 0.0,
            gpu_memory_free_mb: 0.0,
            device_type: DeviceType::Cpu,
            timestamp_ms: 0,
        }
    }
}

/// Snapshot of edge-to-cloud network health, probed through a longer-TTL cache.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct NetworkStats {
    pub rtt_ms: f32,
    pub bandwidth_mbps: f32,
    pub packet_loss_rate: f32,
    pub is_weak_network: bool,
}

impl Default for NetworkStats {
    fn default() -> Self {
        Self {
            rtt_ms: 20.0,
            bandwidth_mbps: 50.0,
            packet_loss_rate: 0.0,
            is_weak_network: false,
        }
    }
}

/// Everything the decision pipeline needs to evaluate one request.
#[derive(Debug, Clone)]
pub struct DecisionContext {
    pub request: InferenceRequest,
    pub system: SystemStats,
    pub requirements: TaskRequirements,
    pub network: Option<NetworkStats>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStrategy {
    EdgeOnly,
    CloudDirect,
    SpeculativeStandard,
    AdaptiveConfidence,
}

impl ExecutionStrategy {
    pub const ALL: [ExecutionStrategy; 4] = [
        ExecutionStrategy::EdgeOnly,
        ExecutionStrategy::CloudDirect,
        ExecutionStrategy::SpeculativeStandard,
        ExecutionStrategy::AdaptiveConfidence,
    ];

    pub fn is_speculative(&self) -> bool {
        matches!(
            self,
            ExecutionStrategy::SpeculativeStandard | ExecutionStrategy::AdaptiveConfidence
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionStrategy::EdgeOnly => "EDGE_ONLY",
            ExecutionStrategy::CloudDirect => "CLOUD_DIRECT",
            ExecutionStrategy::SpeculativeStandard => "SPECULATIVE_STANDARD",
            ExecutionStrategy::AdaptiveConfidence => "ADAPTIVE_CONFIDENCE",
        }
    }
}

impl std::fmt::Display for ExecutionStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully-parameterised, ready-to-execute decision.
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionPlan {
    pub strategy: ExecutionStrategy,
    pub score: f32,
    pub reason: String,
    pub confidence_threshold: f32,
    pub draft_max_tokens: u32,
    pub verify_timeout_ms: u64,
}

/// An immutable record of one completed request, appended to the `HistoryTracker`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionRecord {
    pub timestamp_ms: i64,
    pub strategy: ExecutionStrategy,
    pub acceptance_rate: f32,
    pub latency_ms: f32,
    pub edge_latency_ms: f32,
    pub cloud_latency_ms: f32,
    pub confidence_score: f32,
    pub success: bool,
    pub tokens_generated: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceStrategy {
    MaxProb,
    Entropy,
    Temperature,
    TopKAgg,
}

/// Derived confidence signal computed from a draft's per-token probabilities.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ConfidenceMetrics {
    pub score: f32,
    pub entropy: f32,
    pub max_prob: f32,
    pub min_prob: f32,
    pub avg_prob: f32,
    pub strategy: ConfidenceStrategy,
}

/// A draft candidate produced locally on the edge.
#[derive(Debug, Clone)]
pub struct Draft {
    pub text: String,
    pub token_ids: Vec<u32>,
    pub token_probs: Vec<f32>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VerifyRequest {
    pub prompt: String,
    pub draft_text: String,
    pub confidence_threshold: f32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VerifyResponse {
    pub verified_tokens: Vec<String>,
    pub accepted_count: u32,
    pub total_count: u32,
    pub acceptance_rate: f32,
    pub corrected_positions: Vec<i32>,
    pub final_text: String,
    pub latency_ms: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct InferenceResponse {
    pub text: String,
    pub tokens: Vec<String>,
    pub total_latency_ms: f32,
    pub edge_latency_ms: f32,
    pub cloud_latency_ms: f32,
    pub confidence_score: f32,
    pub acceptance_rate: f32,
    pub used_draft_verify: bool,
    pub strategy: ExecutionStrategy,
}
