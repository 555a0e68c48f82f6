//! In-memory KV-cache bookkeeping with JSON snapshot persistence.
//!
//! Grounded in spec.md §6's persisted-state section; the entry/stats shapes
//! live in `common::cache` so the snapshot file format is shared with any
//! future external tooling.

use std::path::Path;
use std::sync::RwLock;

use common::{AppResult, CacheEntry, CacheSnapshot, CacheStats};
use tracing::warn;

pub struct KvCache {
    max_size: usize,
    inner: RwLock<CacheSnapshot>,
}

impl KvCache {
    pub fn new(max_size: usize) -> Self {
        Self {
            max_size,
            inner: RwLock::new(CacheSnapshot::default()),
        }
    }

    pub fn load_from_file(path: &Path, max_size: usize) -> Self {
        match std::fs::read_to_string(path) {
            Ok(raw) => match serde_json::from_str::<CacheSnapshot>(&raw) {
                Ok(snapshot) => {
                    return Self {
                        max_size,
                        inner: RwLock::new(snapshot),
                    }
                }
                Err(e) => warn!("cache snapshot at {} is malformed, starting empty: {e}", path.display()),
            },
            Err(e) => warn!("no cache snapshot loaded from {}: {e}", path.display()),
        }
        Self::new(max_size)
    }

    pub fn save_to_file(&self, path: &Path) -> AppResult<()> {
        let snapshot = self.inner.read().unwrap();
        let raw = serde_json::to_string_pretty(&*snapshot)
            .map_err(|e| common::AppError::Invariant(format!("failed to serialize cache snapshot: {e}")))?;
        std::fs::write(path, raw).map_err(|e| common::AppError::Resource(format!("failed to write cache snapshot: {e}")))
    }

    pub fn get(&self, prompt: &str) -> Option<CacheEntry> {
        let mut snapshot = self.inner.write().unwrap();
        let now = chrono::Utc::now().timestamp_millis();
        let found = match snapshot.cache.get_mut(prompt) {
            Some(entry) => {
                entry.last_access = now;
                entry.access_count += 1;
                Some(entry.clone())
            }
            None => None,
        };
        match found {
            Some(entry) => {
                snapshot.stats.hits += 1;
                Some(entry)
            }
            None => {
                snapshot.stats.misses += 1;
                None
            }
        }
    }

    pub fn insert(&self, prompt: String, token_ids: Vec<u32>, available_tokens: usize) {
        let mut snapshot = self.inner.write().unwrap();
        let now = chrono::Utc::now().timestamp_millis();

        if snapshot.cache.len() >= self.max_size && !snapshot.cache.contains_key(&prompt) {
            if let Some(oldest_key) = snapshot
                .cache
                .iter()
                .min_by_key(|(_, e)| e.last_access)
                .map(|(k, _)| k.clone())
            {
                snapshot.cache.remove(&oldest_key);
                snapshot.stats.evictions += 1;
            }
        }

        let seq_len = token_ids.len();
        snapshot.cache.insert(
            prompt.clone(),
            CacheEntry {
                prompt,
                token_ids,
                seq_len,
                available_tokens,
                created_at: now,
                last_access: now,
                access_count: 1,
            },
        );
        snapshot.stats.entries = snapshot.cache.len();
    }

    pub fn stats(&self) -> CacheStats {
        let snapshot = self.inner.read().unwrap();
        CacheStats {
            entries: snapshot.cache.len(),
            ..snapshot.stats.clone()
        }
    }
}

impl Default for KvCache {
    fn default() -> Self {
        Self::new(256)
    }
}
