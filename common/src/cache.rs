use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One entry of the persisted KV-cache snapshot described in spec.md §6.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheEntry {
    pub prompt: String,
    pub token_ids: Vec<u32>,
    pub seq_len: usize,
    pub available_tokens: usize,
    pub created_at: i64,
    pub last_access: i64,
    pub access_count: u64,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub entries: usize,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CacheSnapshot {
    pub cache: HashMap<String, CacheEntry>,
    pub stats: CacheStats,
}
