//! Engine configuration
//!
//! Runtime settings for the detection engine: per-detector toggles, rate
//! limiter sizing, domain cache capacity, and the IP blocklist entries.
//! Out-of-range values are clamped by the components that consume them
//! rather than rejected here.

use serde::{Deserialize, Serialize};

use crate::cache::DEFAULT_DOMAIN_CACHE_CAPACITY;
use crate::ratelimit::DEFAULT_RATE_LIMIT_MAX_ENTRIES;

/// Detection engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct EngineConfig {
    /// Enable SQL injection detection
    #[serde(default = "default_true")]
    pub sql_detection_enabled: bool,
    /// Enable shell injection detection
    #[serde(default = "default_true")]
    pub shell_detection_enabled: bool,
    /// Enable NoSQL/server-side JS injection detection
    #[serde(default = "default_true")]
    pub js_detection_enabled: bool,
    /// Enable SSRF detection
    #[serde(default = "default_true")]
    pub ssrf_detection_enabled: bool,
    /// Enable path traversal detection
    #[serde(default = "default_true")]
    pub path_traversal_enabled: bool,
    /// Maximum number of keys tracked by the rate limiter
    #[serde(default = "default_rate_limit_max_entries")]
    pub rate_limit_max_entries: usize,
    /// Rate limit window length (ms)
    #[serde(default = "default_rate_limit_window_ms")]
    pub rate_limit_window_ms: u64,
    /// Requests allowed per key per window
    #[serde(default = "default_rate_limit_max_requests")]
    pub rate_limit_max_requests: u64,
    /// Capacity of the outbound domain cache
    #[serde(default = "default_domain_cache_capacity")]
    pub domain_cache_capacity: usize,
    /// Addresses and CIDR ranges to block outright
    #[serde(default)]
    pub blocked_ips: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sql_detection_enabled: true,
            shell_detection_enabled: true,
            js_detection_enabled: true,
            ssrf_detection_enabled: true,
            path_traversal_enabled: true,
            rate_limit_max_entries: DEFAULT_RATE_LIMIT_MAX_ENTRIES,
            rate_limit_window_ms: 60_000,
            rate_limit_max_requests: 100,
            domain_cache_capacity: DEFAULT_DOMAIN_CACHE_CAPACITY,
            blocked_ips: Vec::new(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_rate_limit_max_entries() -> usize {
    DEFAULT_RATE_LIMIT_MAX_ENTRIES
}

fn default_rate_limit_window_ms() -> u64 {
    60_000
}

fn default_rate_limit_max_requests() -> u64 {
    100
}

fn default_domain_cache_capacity() -> usize {
    DEFAULT_DOMAIN_CACHE_CAPACITY
}
