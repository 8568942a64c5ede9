//! Fixed-window rate limiter
//!
//! Per-key request counting over a fixed window. Each key owns a window
//! anchored at its first request; once the window elapses the next request
//! starts a fresh one in place. Memory is bounded by evicting the
//! oldest-created entry (insertion order, not recency of use) when the
//! configured entry cap is reached.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use rustc_hash::FxHashMap;

/// Default maximum number of tracked keys per limiter.
pub const DEFAULT_RATE_LIMIT_MAX_ENTRIES: usize = 5000;

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u64,
}

/// Fixed-window, bounded-memory rate limiter.
#[derive(Debug)]
pub struct RateLimiter {
    max_entries: usize,
    windows: FxHashMap<String, Window>,
    // Creation order of the keys in `windows`. Window resets happen in
    // place, so this deque only grows on insert and shrinks on eviction.
    order: VecDeque<String>,
}

impl RateLimiter {
    /// Create a limiter tracking at most `max_entries` keys (clamped to ≥ 1).
    pub fn new(max_entries: usize) -> Self {
        Self {
            max_entries: max_entries.max(1),
            windows: FxHashMap::default(),
            order: VecDeque::new(),
        }
    }

    /// Record a request for `key` and report whether it fits within
    /// `max_requests` per `window`.
    ///
    /// A zero window is clamped to one millisecond and a zero request cap to
    /// one, so the limiter degrades to strict rather than panicking or
    /// letting everything through.
    pub fn is_allowed(&mut self, key: &str, window: Duration, max_requests: u64) -> bool {
        self.is_allowed_at(key, window, max_requests, Instant::now())
    }

    pub(crate) fn is_allowed_at(
        &mut self,
        key: &str,
        window: Duration,
        max_requests: u64,
        now: Instant,
    ) -> bool {
        let window = window.max(Duration::from_millis(1));
        let max_requests = max_requests.max(1);

        if let Some(entry) = self.windows.get_mut(key) {
            if now.duration_since(entry.started) >= window {
                entry.started = now;
                entry.count = 1;
                return true;
            }
            entry.count += 1;
            return entry.count <= max_requests;
        }

        if self.windows.len() == self.max_entries {
            if let Some(oldest) = self.order.pop_front() {
                self.windows.remove(&oldest);
            }
        }
        self.windows.insert(
            key.to_string(),
            Window {
                started: now,
                count: 1,
            },
        );
        self.order.push_back(key.to_string());
        true
    }

    /// Number of currently tracked keys.
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    /// Returns true when no keys are tracked.
    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// Forget all tracked keys.
    pub fn clear(&mut self) {
        self.windows.clear();
        self.order.clear();
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_RATE_LIMIT_MAX_ENTRIES)
    }
}
