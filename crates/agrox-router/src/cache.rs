// SPDX-FileCopyrightText: 2026 AgroX Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Content-addressed caches for clarified queries and routing results.
//!
//! Keys are a truncated SHA-256 hex digest of the keying text. Eviction is
//! delegated to an [`EvictionPolicy`]; the default policy never evicts, so
//! entries live until [`RouteCache::clear`].

use std::collections::{HashMap, VecDeque};

use agrox_config::model::{CacheConfig, CachePolicy};
use agrox_core::RoutingResult;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::debug;

/// Prefix mixed into clarification keys so they never collide with routing keys.
const CLARIFY_KEY_PREFIX: &str = "clarify_";

/// Fixed-length hex digest of `text`, truncated to `length` characters.
pub fn cache_key(text: &str, length: usize) -> String {
    let mut key = hex::encode(Sha256::digest(text.as_bytes()));
    key.truncate(length);
    key
}

/// Decides which entries leave a [`CacheStore`].
pub trait EvictionPolicy: Send + 'static {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Records a read of `key`.
    fn touch(&mut self, key: &str);

    /// Records a write of `key` and returns the keys that must be evicted.
    fn admit(&mut self, key: &str) -> Vec<String>;

    /// Forgets all tracked keys.
    fn clear(&mut self);
}

/// Keeps every entry for the process lifetime.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoEviction;

impl EvictionPolicy for NoEviction {
    fn name(&self) -> &'static str {
        "unbounded"
    }

    fn touch(&mut self, _key: &str) {}

    fn admit(&mut self, _key: &str) -> Vec<String> {
        Vec::new()
    }

    fn clear(&mut self) {}
}

/// Bounded least-recently-used eviction.
#[derive(Debug)]
pub struct LruEviction {
    capacity: usize,
    // Front is least recently used.
    order: VecDeque<String>,
}

impl LruEviction {
    /// Create a policy holding at most `capacity` keys (minimum 1).
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            order: VecDeque::new(),
        }
    }

    fn promote(&mut self, key: &str) -> bool {
        match self.order.iter().position(|k| k == key) {
            Some(pos) => {
                if let Some(k) = self.order.remove(pos) {
                    self.order.push_back(k);
                }
                true
            }
            None => false,
        }
    }
}

impl EvictionPolicy for LruEviction {
    fn name(&self) -> &'static str {
        "lru"
    }

    fn touch(&mut self, key: &str) {
        self.promote(key);
    }

    fn admit(&mut self, key: &str) -> Vec<String> {
        if !self.promote(key) {
            self.order.push_back(key.to_string());
        }
        let excess = self.order.len().saturating_sub(self.capacity);
        self.order.drain(..excess).collect()
    }

    fn clear(&mut self) {
        self.order.clear();
    }
}

/// Build the eviction policy named by the cache configuration.
pub fn policy_from_config(config: &CacheConfig) -> Box<dyn EvictionPolicy> {
    match (config.policy, config.capacity) {
        (CachePolicy::Lru, Some(capacity)) => Box::new(LruEviction::new(capacity)),
        // Validation rejects lru without a capacity; treat it as unbounded if it slips through.
        (CachePolicy::Lru, None) | (CachePolicy::Unbounded, _) => Box::new(NoEviction),
    }
}

/// A single keyed store with a pluggable eviction policy.
pub struct CacheStore<V> {
    entries: HashMap<String, V>,
    policy: Box<dyn EvictionPolicy>,
}

impl<V: Clone> CacheStore<V> {
    pub fn new(policy: Box<dyn EvictionPolicy>) -> Self {
        Self {
            entries: HashMap::new(),
            policy,
        }
    }

    /// Returns a clone of the entry for `key`, marking it as recently used.
    pub fn get(&mut self, key: &str) -> Option<V> {
        let value = self.entries.get(key).cloned()?;
        self.policy.touch(key);
        Some(value)
    }

    /// Inserts or overwrites `key`, evicting whatever the policy asks for.
    pub fn insert(&mut self, key: String, value: V) {
        for evicted in self.policy.admit(&key) {
            debug!(policy = self.policy.name(), key = %evicted, "cache entry evicted");
            self.entries.remove(&evicted);
        }
        self.entries.insert(key, value);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.policy.clear();
    }
}

/// Entry counts for both caches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub clarification_cache_size: usize,
    pub routing_cache_size: usize,
}

/// The clarification and routing caches owned by a [`crate::QueryRouter`].
pub struct RouteCache {
    key_length: usize,
    clarifications: CacheStore<String>,
    routes: CacheStore<RoutingResult>,
}

impl RouteCache {
    /// Create a cache pair with explicit eviction policies.
    pub fn new(
        key_length: usize,
        clarification_policy: Box<dyn EvictionPolicy>,
        routing_policy: Box<dyn EvictionPolicy>,
    ) -> Self {
        Self {
            key_length,
            clarifications: CacheStore::new(clarification_policy),
            routes: CacheStore::new(routing_policy),
        }
    }

    /// Create a cache pair that never evicts.
    pub fn unbounded(key_length: usize) -> Self {
        Self::new(key_length, Box::new(NoEviction), Box::new(NoEviction))
    }

    /// Create a cache pair from configuration; each cache gets its own policy instance.
    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(
            config.key_length,
            policy_from_config(config),
            policy_from_config(config),
        )
    }

    fn clarification_key(&self, input: &str) -> String {
        cache_key(&format!("{CLARIFY_KEY_PREFIX}{input}"), self.key_length)
    }

    fn routing_key(&self, input: &str) -> String {
        cache_key(input, self.key_length)
    }

    pub fn clarification(&mut self, input: &str) -> Option<String> {
        let key = self.clarification_key(input);
        self.clarifications.get(&key)
    }

    pub fn store_clarification(&mut self, input: &str, clarified: String) {
        let key = self.clarification_key(input);
        self.clarifications.insert(key, clarified);
    }

    pub fn route(&mut self, input: &str) -> Option<RoutingResult> {
        let key = self.routing_key(input);
        self.routes.get(&key)
    }

    pub fn store_route(&mut self, input: &str, result: RoutingResult) {
        let key = self.routing_key(input);
        self.routes.insert(key, result);
    }

    /// Empties both caches.
    pub fn clear(&mut self) {
        self.clarifications.clear();
        self.routes.clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            clarification_cache_size: self.clarifications.len(),
            routing_cache_size: self.routes.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agrox_core::{ExtractedInfo, RouteType};

    fn result(input: &str) -> RoutingResult {
        RoutingResult {
            original_input: input.to_string(),
            clarified_query: input.to_string(),
            route_type: RouteType::Rag,
            extracted_info: ExtractedInfo::default(),
            reasoning: "test".to_string(),
        }
    }

    #[test]
    fn cache_key_is_fixed_length_and_deterministic() {
        let a = cache_key("how to plant maize", 16);
        let b = cache_key("how to plant maize", 16);
        assert_eq!(a, b);
        assert_eq!(a.len(), 16);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, cache_key("how to plant yam", 16));
    }

    #[test]
    fn clarification_and_routing_keys_differ() {
        let cache = RouteCache::unbounded(16);
        assert_ne!(
            cache.clarification_key("soil pH"),
            cache.routing_key("soil pH")
        );
        assert_eq!(
            cache.clarification_key("soil pH"),
            cache_key("clarify_soil pH", 16)
        );
    }

    #[test]
    fn unbounded_store_keeps_everything() {
        let mut store: CacheStore<u32> = CacheStore::new(Box::new(NoEviction));
        for i in 0..1000 {
            store.insert(format!("k{i}"), i);
        }
        assert_eq!(store.len(), 1000);
        assert_eq!(store.get("k0"), Some(0));
    }

    #[test]
    fn lru_evicts_least_recently_used() {
        let mut store: CacheStore<u32> = CacheStore::new(Box::new(LruEviction::new(2)));
        store.insert("a".into(), 1);
        store.insert("b".into(), 2);
        // Reading "a" makes "b" the eviction candidate.
        assert_eq!(store.get("a"), Some(1));
        store.insert("c".into(), 3);

        assert_eq!(store.len(), 2);
        assert_eq!(store.get("b"), None);
        assert_eq!(store.get("a"), Some(1));
        assert_eq!(store.get("c"), Some(3));
    }

    #[test]
    fn lru_overwrite_does_not_grow() {
        let mut store: CacheStore<u32> = CacheStore::new(Box::new(LruEviction::new(2)));
        store.insert("a".into(), 1);
        store.insert("a".into(), 2);
        store.insert("b".into(), 3);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get("a"), Some(2));
    }

    #[test]
    fn route_cache_round_trip_and_clear() {
        let mut cache = RouteCache::unbounded(16);
        cache.store_clarification("soil pH", "What is the soil pH?".into());
        cache.store_route("soil pH", result("soil pH"));

        assert_eq!(
            cache.stats(),
            CacheStats {
                clarification_cache_size: 1,
                routing_cache_size: 1
            }
        );
        assert_eq!(cache.clarification("soil pH").as_deref(), Some("What is the soil pH?"));
        assert_eq!(cache.route("soil pH"), Some(result("soil pH")));
        assert_eq!(cache.route("other"), None);

        cache.clear();
        assert_eq!(cache.stats().clarification_cache_size, 0);
        assert_eq!(cache.stats().routing_cache_size, 0);
        assert_eq!(cache.route("soil pH"), None);
    }

    #[test]
    fn from_config_selects_policy() {
        let config = CacheConfig {
            policy: CachePolicy::Lru,
            capacity: Some(1),
            key_length: 12,
        };
        let mut cache = RouteCache::from_config(&config);
        cache.store_route("one", result("one"));
        cache.store_route("two", result("two"));
        assert_eq!(cache.stats().routing_cache_size, 1);
        assert_eq!(cache.routing_key("one").len(), 12);
    }
}
