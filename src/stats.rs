//! Engine statistics
//!
//! Lightweight counters for what the engine saw and flagged. Everything is
//! an atomic so recording never takes a lock on the hot path; consumers
//! take a point-in-time snapshot for reporting.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Counters kept by a [`crate::engine::DetectionEngine`].
#[derive(Debug, Default)]
pub struct EngineStats {
    checks_total: AtomicU64,
    sql_detections: AtomicU64,
    shell_detections: AtomicU64,
    js_detections: AtomicU64,
    ssrf_detections: AtomicU64,
    path_traversal_detections: AtomicU64,
    /// Statements the SQL lexer could not process (fail-open events).
    sql_tokenize_failures: AtomicU64,
    rate_limited: AtomicU64,
    ips_blocked: AtomicU64,
}

/// Point-in-time copy of the counters.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub checks_total: u64,
    pub sql_detections: u64,
    pub shell_detections: u64,
    pub js_detections: u64,
    pub ssrf_detections: u64,
    pub path_traversal_detections: u64,
    pub sql_tokenize_failures: u64,
    pub rate_limited: u64,
    pub ips_blocked: u64,
}

impl EngineStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_check(&self) {
        self.checks_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_sql_detection(&self) {
        self.sql_detections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_shell_detection(&self) {
        self.shell_detections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_js_detection(&self) {
        self.js_detections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_ssrf_detection(&self) {
        self.ssrf_detections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_path_traversal_detection(&self) {
        self.path_traversal_detections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_sql_tokenize_failure(&self) {
        self.sql_tokenize_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rate_limited(&self) {
        self.rate_limited.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_ip_blocked(&self) {
        self.ips_blocked.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            checks_total: self.checks_total.load(Ordering::Relaxed),
            sql_detections: self.sql_detections.load(Ordering::Relaxed),
            shell_detections: self.shell_detections.load(Ordering::Relaxed),
            js_detections: self.js_detections.load(Ordering::Relaxed),
            ssrf_detections: self.ssrf_detections.load(Ordering::Relaxed),
            path_traversal_detections: self.path_traversal_detections.load(Ordering::Relaxed),
            sql_tokenize_failures: self.sql_tokenize_failures.load(Ordering::Relaxed),
            rate_limited: self.rate_limited.load(Ordering::Relaxed),
            ips_blocked: self.ips_blocked.load(Ordering::Relaxed),
        }
    }
}
