//! Detection engine
//!
//! Ties the pure detectors to the stateful components (rate limiter,
//! blocklist, domain cache) behind one handle the instrumentation layer
//! owns. Detector calls stay synchronous and lock-free; only the rate
//! limiter and domain cache take a mutex, and only for their own state.

use std::time::Duration;

use anyhow::Result;
use parking_lot::Mutex;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::cache::DomainCache;
use crate::config::EngineConfig;
use crate::detectors::{js, path_traversal, shell, sql, ssrf};
use crate::detectors::{Dialect, TaintSource};
use crate::net::Blocklist;
use crate::ratelimit::RateLimiter;
use crate::stats::{EngineStats, StatsSnapshot};

/// Runtime attack-detection engine.
///
/// One instance per agent; cheap to construct, safe to share behind a
/// reference from any number of request-handling threads.
pub struct DetectionEngine {
    config: EngineConfig,
    blocklist: Blocklist,
    rate_limiter: Mutex<RateLimiter>,
    domains: Mutex<DomainCache>,
    stats: EngineStats,
}

impl DetectionEngine {
    /// Create an engine from configuration. Malformed blocklist entries are
    /// skipped with a warning instead of failing construction; detection
    /// must come up even with a partially bad config.
    pub fn new(config: EngineConfig) -> Result<Self> {
        let mut blocklist = Blocklist::new();
        let mut rejected = 0usize;
        for entry in &config.blocked_ips {
            if !blocklist.add(entry) {
                warn!(entry = entry.as_str(), "Skipping malformed blocklist entry");
                rejected += 1;
            }
        }

        info!(
            sql = config.sql_detection_enabled,
            shell = config.shell_detection_enabled,
            js = config.js_detection_enabled,
            ssrf = config.ssrf_detection_enabled,
            path_traversal = config.path_traversal_enabled,
            blocklist_entries = blocklist.len(),
            blocklist_rejected = rejected,
            rate_limit_max_entries = config.rate_limit_max_entries,
            domain_cache_capacity = config.domain_cache_capacity,
            "Detection engine initialized"
        );

        let rate_limiter = RateLimiter::new(config.rate_limit_max_entries);
        let domains = DomainCache::new(config.domain_cache_capacity);

        Ok(Self {
            config,
            blocklist,
            rate_limiter: Mutex::new(rate_limiter),
            domains: Mutex::new(domains),
            stats: EngineStats::new(),
        })
    }

    /// Check a SQL statement against one piece of user input.
    ///
    /// Lexer failures are counted and treated as "not injection".
    pub fn detect_sql_injection(&self, query: &str, user_input: &str, dialect: Dialect) -> bool {
        if !self.config.sql_detection_enabled {
            return false;
        }
        self.stats.record_check();
        match sql::analyze(query, user_input, dialect) {
            Ok(true) => {
                debug!(dialect = ?dialect, "SQL injection detected");
                self.stats.record_sql_detection();
                true
            }
            Ok(false) => false,
            Err(err) => {
                debug!(error = %err, "SQL tokenization failed, not flagging");
                self.stats.record_sql_tokenize_failure();
                false
            }
        }
    }

    /// Check a shell command against one piece of user input.
    pub fn detect_shell_injection(&self, command: &str, user_input: &str) -> bool {
        if !self.config.shell_detection_enabled {
            return false;
        }
        self.stats.record_check();
        let detected = shell::detect_shell_injection(command, user_input);
        if detected {
            debug!("Shell injection detected");
            self.stats.record_shell_detection();
        }
        detected
    }

    /// Check a MongoDB filter fragment for server-side JS carrying input.
    pub fn detect_nosql_js_injection(&self, user_input: &str, filter_fragment: &Value) -> bool {
        if !self.config.js_detection_enabled {
            return false;
        }
        self.stats.record_check();
        let detected = js::detect_nosql_js_injection(user_input, filter_fragment);
        if detected {
            debug!("NoSQL/JS injection detected");
            self.stats.record_js_detection();
        }
        detected
    }

    /// Check an outbound request's resolved hostname against its taint.
    pub fn detect_ssrf(&self, user_input: &str, resolved_hostname: &str) -> bool {
        if !self.config.ssrf_detection_enabled {
            return false;
        }
        self.stats.record_check();
        let detected = ssrf::detect_ssrf(user_input, resolved_hostname);
        if detected {
            debug!(hostname = resolved_hostname, "SSRF detected");
            self.stats.record_ssrf_detection();
        }
        detected
    }

    /// Whether SSRF analysis should be skipped for this taint source.
    pub fn should_ignore_for_ssrf(&self, source: TaintSource, paths: &[&str]) -> bool {
        ssrf::should_ignore_for_ssrf(source, paths)
    }

    /// Check a filesystem path against one piece of user input.
    pub fn detect_path_traversal(&self, resolved_path: &str, user_input: &str) -> bool {
        if !self.config.path_traversal_enabled {
            return false;
        }
        self.stats.record_check();
        let detected = path_traversal::detect_path_traversal(resolved_path, user_input);
        if detected {
            debug!("Path traversal detected");
            self.stats.record_path_traversal_detection();
        }
        detected
    }

    /// Count a request against the configured per-key rate limit.
    pub fn is_allowed(&self, key: &str) -> bool {
        let window = Duration::from_millis(self.config.rate_limit_window_ms);
        let max = self.config.rate_limit_max_requests;
        let allowed = self.rate_limiter.lock().is_allowed(key, window, max);
        if !allowed {
            self.stats.record_rate_limited();
        }
        allowed
    }

    /// Returns true when the client address matches a blocklist entry.
    pub fn ip_blocked(&self, ip: &str) -> bool {
        let blocked = self.blocklist.check(ip);
        if blocked {
            debug!(ip, "Blocked IP");
            self.stats.record_ip_blocked();
        }
        blocked
    }

    /// Record an outbound domain in the FIFO cache.
    pub fn record_domain(&self, domain: &str) {
        self.domains.lock().add(domain);
    }

    /// Cached outbound domains, oldest first.
    pub fn domains(&self) -> Vec<String> {
        self.domains.lock().list()
    }

    /// Drop all cached outbound domains.
    pub fn clear_domains(&self) {
        self.domains.lock().clear();
    }

    /// Point-in-time statistics.
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
