//! Bounded FIFO domain cache
//!
//! Fixed-capacity set of recently seen outbound hostnames. Insertion order
//! is the eviction order: when full, the oldest-inserted domain is dropped
//! to admit the new one. Re-adding a present domain is a no-op and does not
//! refresh its position, which makes this FIFO rather than LRU — the cache
//! answers "what did this service talk to recently", not "what is hot".

use std::collections::VecDeque;

use rustc_hash::FxHashSet;

/// Default number of hostnames retained per engine instance.
pub const DEFAULT_DOMAIN_CACHE_CAPACITY: usize = 200;

/// Fixed-capacity FIFO set of hostnames.
#[derive(Debug)]
pub struct DomainCache {
    capacity: usize,
    order: VecDeque<String>,
    seen: FxHashSet<String>,
}

impl DomainCache {
    /// Create a cache holding at most `capacity` domains (clamped to ≥ 1).
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            order: VecDeque::new(),
            seen: FxHashSet::default(),
        }
    }

    /// Record a domain. Present domains are left untouched; at capacity the
    /// oldest insertion is evicted first.
    pub fn add(&mut self, domain: &str) {
        if self.seen.contains(domain) {
            return;
        }
        if self.order.len() == self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.seen.remove(&oldest);
            }
        }
        self.seen.insert(domain.to_string());
        self.order.push_back(domain.to_string());
    }

    /// Domains in insertion order, oldest first.
    pub fn list(&self) -> Vec<String> {
        self.order.iter().cloned().collect()
    }

    /// Returns true if the domain is currently cached.
    pub fn contains(&self, domain: &str) -> bool {
        self.seen.contains(domain)
    }

    /// Drop all cached domains.
    pub fn clear(&mut self) {
        self.order.clear();
        self.seen.clear();
    }

    /// Number of cached domains.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns true when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Configured capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for DomainCache {
    fn default() -> Self {
        Self::new(DEFAULT_DOMAIN_CACHE_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_eviction() {
        let mut cache = DomainCache::new(3);
        cache.add("a.example");
        cache.add("b.example");
        cache.add("c.example");
        cache.add("d.example");
        assert_eq!(cache.list(), vec!["b.example", "c.example", "d.example"]);
    }

    #[test]
    fn test_readd_does_not_refresh() {
        let mut cache = DomainCache::new(3);
        cache.add("a.example");
        cache.add("b.example");
        cache.add("c.example");
        // Re-adding keeps the original position, so "b" is still second
        // and "a" is still the next eviction candidate.
        cache.add("b.example");
        assert_eq!(cache.list(), vec!["a.example", "b.example", "c.example"]);
        cache.add("d.example");
        assert_eq!(cache.list(), vec!["b.example", "c.example", "d.example"]);
    }

    #[test]
    fn test_clear() {
        let mut cache = DomainCache::new(2);
        cache.add("a.example");
        cache.clear();
        assert!(cache.is_empty());
        assert!(!cache.contains("a.example"));
    }

    #[test]
    fn test_zero_capacity_clamped() {
        let mut cache = DomainCache::new(0);
        assert_eq!(cache.capacity(), 1);
        cache.add("a.example");
        cache.add("b.example");
        assert_eq!(cache.list(), vec!["b.example"]);
    }
}
