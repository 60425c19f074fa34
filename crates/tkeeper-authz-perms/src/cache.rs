//! Bounded decision cache.
//!
//! Memoizes `permission -> decision` for a permission set. Eviction is
//! strictly FIFO: when the cache grows past capacity, the entry inserted
//! first is dropped, however recently it was read.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};

/// Default number of decisions kept per permission set.
pub const DEFAULT_CACHE_CAPACITY: usize = 256;

/// A bounded, insertion-ordered decision cache.
///
/// Thread-safe via Mutex. The cache never changes a decision, it only
/// remembers one, so losing its contents is always safe.
#[derive(Debug)]
pub struct DecisionCache {
    capacity: usize,
    inner: Mutex<CacheInner>,
}

#[derive(Debug, Default)]
struct CacheInner {
    /// Cached decisions.
    decisions: HashMap<String, bool>,

    /// Keys in insertion order, oldest first.
    order: VecDeque<String>,
}

impl CacheInner {
    fn clear(&mut self) {
        self.decisions.clear();
        self.order.clear();
    }
}

impl DecisionCache {
    /// Create a cache holding at most `capacity` decisions.
    ///
    /// A capacity of zero disables caching.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            inner: Mutex::new(CacheInner::default()),
        }
    }

    /// Maximum number of decisions kept.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Look up a cached decision.
    pub fn get(&self, permission: &str) -> Option<bool> {
        if self.capacity == 0 {
            return None;
        }
        self.lock().decisions.get(permission).copied()
    }

    /// Remember a decision, evicting the oldest entry if over capacity.
    pub fn insert(&self, permission: &str, decision: bool) {
        if self.capacity == 0 {
            return;
        }

        let mut inner = self.lock();

        // A concurrent evaluation may have stored the same key already.
        if let Some(existing) = inner.decisions.get_mut(permission) {
            *existing = decision;
            return;
        }

        inner.decisions.insert(permission.to_owned(), decision);
        inner.order.push_back(permission.to_owned());

        while inner.decisions.len() > self.capacity {
            let Some(oldest) = inner.order.pop_front() else {
                break;
            };
            inner.decisions.remove(&oldest);
            tracing::trace!(permission = %oldest, "evicted cached decision");
        }
    }

    /// Number of cached decisions.
    pub fn len(&self) -> usize {
        self.lock().decisions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop all cached decisions.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, CacheInner> {
        self.inner.lock().unwrap_or_else(|poisoned| {
            // A panic mid-update may have left the map and order out of step.
            let mut inner = poisoned.into_inner();
            inner.clear();
            inner
        })
    }
}

impl Default for DecisionCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_after_insert() {
        let cache = DecisionCache::new(4);
        assert_eq!(cache.get("a"), None);

        cache.insert("a", true);
        cache.insert("b", false);

        assert_eq!(cache.get("a"), Some(true));
        assert_eq!(cache.get("b"), Some(false));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_evicts_oldest_inserted_not_least_recently_used() {
        let cache = DecisionCache::new(2);
        cache.insert("first", true);
        cache.insert("second", true);

        // Reading "first" does not refresh it.
        assert_eq!(cache.get("first"), Some(true));

        cache.insert("third", true);

        assert_eq!(cache.get("first"), None);
        assert_eq!(cache.get("second"), Some(true));
        assert_eq!(cache.get("third"), Some(true));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_duplicate_insert_does_not_grow() {
        let cache = DecisionCache::new(2);
        cache.insert("a", true);
        cache.insert("a", true);
        cache.insert("b", false);

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("a"), Some(true));
    }

    #[test]
    fn test_never_exceeds_capacity() {
        let cache = DecisionCache::new(DEFAULT_CACHE_CAPACITY);
        for i in 0..1000 {
            cache.insert(&format!("tkeeper.key.k{i}.sign"), i % 2 == 0);
            assert!(cache.len() <= DEFAULT_CACHE_CAPACITY);
        }
        assert_eq!(cache.len(), DEFAULT_CACHE_CAPACITY);
        assert_eq!(cache.get("tkeeper.key.k0.sign"), None);
        assert_eq!(cache.get("tkeeper.key.k999.sign"), Some(false));
    }

    #[test]
    fn test_zero_capacity_disables_caching() {
        let cache = DecisionCache::new(0);
        cache.insert("a", true);
        assert!(cache.is_empty());
        assert_eq!(cache.get("a"), None);
    }

    #[test]
    fn test_clear() {
        let cache = DecisionCache::default();
        cache.insert("a", true);
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.capacity(), DEFAULT_CACHE_CAPACITY);
    }

    #[test]
    fn test_concurrent_inserts_stay_bounded() {
        use std::sync::Arc;

        let cache = Arc::new(DecisionCache::new(16));
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || {
                    for i in 0..200 {
                        cache.insert(&format!("p.{}", (i * 7 + t) % 50), true);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert!(cache.len() <= 16);
    }
}
