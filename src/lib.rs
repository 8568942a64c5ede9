//! Zentinel RASP Engine
//!
//! A runtime attack-detection library: pure, synchronous analyzers that
//! decide whether attacker-controlled input altered the meaning of an
//! intercepted operation. Designed to sit inline on every database query
//! and outbound request of a production service, so every call completes
//! in microseconds and failure is always open.
//!
//! # Features
//!
//! - **SQL injection detection**: dialect-aware lexical analysis without a
//!   full SQL parser
//! - **Shell injection detection**: metacharacter and command-token
//!   heuristics for POSIX `sh`
//! - **NoSQL/JS injection detection**: `$where`/`$function`/`$accumulator`
//!   encapsulation analysis
//! - **SSRF detection**: private/reserved address classification, including
//!   obfuscated IPv4 encodings
//! - **Path traversal detection**
//! - **Rate limiter, CIDR blocklist, and bounded domain cache** for the
//!   request pipeline
//!
//! # Example
//!
//! ```
//! use zentinel_rasp::{DetectionEngine, Dialect, EngineConfig};
//!
//! let engine = DetectionEngine::new(EngineConfig::default())?;
//! let attack = engine.detect_sql_injection(
//!     "SELECT * FROM users WHERE id = 1 OR 1=1",
//!     "1 OR 1=1",
//!     Dialect::MySql,
//! );
//! assert!(attack);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod cache;
pub mod config;
pub mod detectors;
pub mod engine;
pub mod helpers;
pub mod net;
pub mod ratelimit;
pub mod stats;

// Re-exports for convenience
pub use cache::DomainCache;
pub use config::EngineConfig;
pub use detectors::{
    contains_shell_syntax, detect_js_injection, detect_nosql_js_injection, detect_path_traversal,
    detect_shell_injection, detect_sql_injection, detect_ssrf, is_unsupported_shell,
    should_ignore_for_ssrf, Dialect, TaintSource,
};
pub use detectors::sql::TokenizeError;
pub use engine::DetectionEngine;
pub use net::Blocklist;
pub use ratelimit::RateLimiter;
pub use stats::StatsSnapshot;
