//! StateMonitor: samples edge hardware load and probes cloud reachability.
//!
//! Both `sample_system` and `probe_network` are backed by short-TTL caches
//! (100ms / 2s) so they are cheap enough to call on every request, mirroring
//! `original_source/edge/monitor.py`'s caching behavior. The sysinfo sampling
//! itself descends from this crate's original `run` loop.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use common::{DeviceType, NetworkStats, SystemStats};
use sysinfo::System;
use tracing::warn;

const SYSTEM_TTL: Duration = Duration::from_millis(100);
const NETWORK_TTL: Duration = Duration::from_secs(2);
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);
const WEAK_NETWORK_RTT_DEFAULT_MS: f32 = 150.0;
const RTT_HISTORY_CAPACITY: usize = 10;

struct SystemCache {
    value: SystemStats,
    sampled_at: Instant,
}

struct NetworkCache {
    value: NetworkStats,
    sampled_at: Instant,
}

#[derive(Default)]
struct SimulationOverrides {
    system: Option<SystemStats>,
    network: Option<NetworkStats>,
}

pub struct StateMonitor {
    sys: Mutex<System>,
    system_cache: Mutex<Option<SystemCache>>,
    network_cache: Mutex<Option<NetworkCache>>,
    rtt_history: Mutex<VecDeque<f32>>,
    consecutive_failures: Mutex<u32>,
    simulation: Mutex<SimulationOverrides>,
    client: reqwest::Client,
    cloud_health_url: String,
    device_type: DeviceType,
    weak_network_rtt_threshold: f32,
}

impl StateMonitor {
    pub fn new(cloud_endpoint: &str, device_type: DeviceType) -> Self {
        Self {
            sys: Mutex::new(System::new_all()),
            system_cache: Mutex::new(None),
            network_cache: Mutex::new(None),
            rtt_history: Mutex::new(VecDeque::with_capacity(RTT_HISTORY_CAPACITY)),
            consecutive_failures: Mutex::new(0),
            simulation: Mutex::new(SimulationOverrides::default()),
            client: reqwest::Client::new(),
            cloud_health_url: format!("{}/health", cloud_endpoint.trim_end_matches('/')),
            device_type,
            weak_network_rtt_threshold: WEAK_NETWORK_RTT_DEFAULT_MS,
        }
    }

    pub fn with_weak_network_threshold(mut self, rtt_ms: f32) -> Self {
        self.weak_network_rtt_threshold = rtt_ms;
        self
    }

    /// Injects a fixed system reading, bypassing real sampling. Used by tests
    /// and `/admin/simulate`.
    pub fn set_simulation_system(&self, stats: Option<SystemStats>) {
        self.simulation.lock().unwrap().system = stats;
    }

    /// Injects a fixed network reading, bypassing the real probe.
    pub fn set_simulation_network(&self, stats: Option<NetworkStats>) {
        self.simulation.lock().unwrap().network = stats;
    }

    /// Synchronous, TTL-cached (100ms) system sample. Safe to call per-request.
    pub fn sample_system(&self) -> SystemStats {
        if let Some(sim) = self.simulation.lock().unwrap().system {
            return sim;
        }

        let mut cache = self.system_cache.lock().unwrap();
        if let Some(cached) = cache.as_ref() {
            if cached.sampled_at.elapsed() < SYSTEM_TTL {
                return cached.value;
            }
        }

        let mut sys = self.sys.lock().unwrap();
        sys.refresh_cpu();
        sys.refresh_memory();

        let cpu_usage = sys.global_cpu_info().cpu_usage();
        let memory_available_mb = sys.available_memory() as f32 / 1_048_576.0;

        let value = SystemStats {
            cpu_usage,
            memory_available_mb,
            gpu_usage: 0.0,
            gpu_memory_free_mb: 0.0,
            device_type: self.device_type,
            timestamp_ms: chrono::Utc::now().timestamp_millis(),
        };

        *cache = Some(SystemCache {
            value,
            sampled_at: Instant::now(),
        });
        value
    }

    /// Async, TTL-cached (2s) network probe against the cloud's `/health`
    /// endpoint. `force` bypasses the cache.
    pub async fn probe_network(&self, force: bool) -> NetworkStats {
        if let Some(sim) = self.simulation.lock().unwrap().network {
            return sim;
        }

        if !force {
            let cache = self.network_cache.lock().unwrap();
            if let Some(cached) = cache.as_ref() {
                if cached.sampled_at.elapsed() < NETWORK_TTL {
                    return cached.value;
                }
            }
        }

        let value = self.real_probe().await;
        let mut cache = self.network_cache.lock().unwrap();
        *cache = Some(NetworkCache {
            value,
            sampled_at: Instant::now(),
        });
        value
    }

    async fn real_probe(&self) -> NetworkStats {
        let start = Instant::now();
        let result = tokio::time::timeout(
            PROBE_TIMEOUT,
            self.client.head(&self.cloud_health_url).send(),
        )
        .await;

        match result {
            Ok(Ok(resp)) if resp.status().is_success() || resp.status().as_u16() == 405 => {
                let rtt_ms = start.elapsed().as_secs_f32() * 1000.0;
                *self.consecutive_failures.lock().unwrap() = 0;
                self.push_rtt(rtt_ms);

                let packet_loss_rate = 0.0;
                let is_weak =
                    rtt_ms > self.weak_network_rtt_threshold || packet_loss_rate > 0.1;

                NetworkStats {
                    rtt_ms,
                    bandwidth_mbps: 50.0,
                    packet_loss_rate,
                    is_weak_network: is_weak,
                }
            }
            Ok(Ok(resp)) => {
                warn!("network probe got non-success status {}", resp.status());
                self.probe_failure()
            }
            Ok(Err(e)) => {
                warn!("network probe failed: {e}");
                self.probe_failure()
            }
            Err(_) => {
                warn!("network probe timed out after {:?}", PROBE_TIMEOUT);
                self.probe_failure()
            }
        }
    }

    fn probe_failure(&self) -> NetworkStats {
        let mut failures = self.consecutive_failures.lock().unwrap();
        *failures += 1;
        let packet_loss_rate = (*failures as f32 / 10.0).min(0.5);

        NetworkStats {
            rtt_ms: 9999.0,
            bandwidth_mbps: 0.0,
            packet_loss_rate,
            is_weak_network: true,
        }
    }

    fn push_rtt(&self, rtt_ms: f32) {
        let mut history = self.rtt_history.lock().unwrap();
        if history.len() == RTT_HISTORY_CAPACITY {
            history.pop_front();
        }
        history.push_back(rtt_ms);
    }

    pub fn rtt_history(&self) -> Vec<f32> {
        self.rtt_history.lock().unwrap().iter().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_system_is_ttl_cached() {
        let monitor = StateMonitor::new("http://localhost:9", DeviceType::Cpu);
        let first = monitor.sample_system();
        let second = monitor.sample_system();
        assert_eq!(first.timestamp_ms, second.timestamp_ms);
    }

    #[test]
    fn simulation_override_takes_precedence() {
        let monitor = StateMonitor::new("http://localhost:9", DeviceType::Cpu);
        monitor.set_simulation_system(Some(SystemStats {
            cpu_usage: 99.0,
            ..Default::default()
        }));
        assert_eq!(monitor.sample_system().cpu_usage, 99.0);
    }

    #[tokio::test]
    async fn probe_network_failure_marks_weak() {
        let monitor = StateMonitor::new("http://127.0.0.1:1", DeviceType::Cpu);
        let stats = monitor.probe_network(true).await;
        assert!(stats.is_weak_network);
        assert!(stats.packet_loss_rate > 0.0);
    }

    #[tokio::test]
    async fn probe_network_simulation_override() {
        let monitor = StateMonitor::new("http://localhost:9", DeviceType::Cpu);
        monitor.set_simulation_network(Some(NetworkStats {
            rtt_ms: 10.0,
            bandwidth_mbps: 100.0,
            packet_loss_rate: 0.0,
            is_weak_network: false,
        }));
        let stats = monitor.probe_network(true).await;
        assert_eq!(stats.rtt_ms, 10.0);
    }
}
