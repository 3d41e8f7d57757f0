//! Best-effort caches for nodes and triples
//!
//! Nothing here is required for correctness: every cache may be cleared at
//! any time, and a miss always falls through to real construction or to the
//! authoritative index.

use crate::config::GraphConfig;
use crate::graph::{Node, Triple};
use lru::LruCache;
use rustc_hash::FxHasher;
use std::hash::{Hash, Hasher};
use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard, OnceLock};

/// Bounded LRU cache of recently created URI nodes, keyed by URI text
#[derive(Debug)]
pub struct NodeCache {
    inner: Mutex<Option<LruCache<Box<str>, Node>>>,
}

impl NodeCache {
    /// A capacity of zero disables the cache
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(NonZeroUsize::new(capacity).map(LruCache::new)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<LruCache<Box<str>, Node>>> {
        // A panicking holder cannot leave the cache inconsistent in a way that matters
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn get(&self, key: &str) -> Option<Node> {
        self.lock().as_mut()?.get(key).cloned()
    }

    pub fn put(&self, key: &str, node: Node) {
        if let Some(cache) = self.lock().as_mut() {
            cache.put(Box::from(key), node);
        }
    }

    pub fn clear(&self) {
        if let Some(cache) = self.lock().as_mut() {
            cache.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.lock().as_ref().map_or(0, |c| c.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Fixed-size direct-mapped cache: each value lives in the slot picked by its
/// hash, and a newer value simply overwrites the slot.
#[derive(Debug, Clone)]
pub struct SlotCache<T> {
    slots: Vec<Option<T>>,
}

impl<T: Hash + Eq + Clone> SlotCache<T> {
    /// A slot count of zero disables the cache
    pub fn new(slots: usize) -> Self {
        Self {
            slots: vec![None; slots],
        }
    }

    fn slot_of(&self, value: &T) -> Option<usize> {
        if self.slots.is_empty() {
            return None;
        }
        let mut hasher = FxHasher::default();
        value.hash(&mut hasher);
        Some((hasher.finish() % self.slots.len() as u64) as usize)
    }

    /// The cached value equal to `value`, if its slot currently holds one
    pub fn get(&self, value: &T) -> Option<&T> {
        let slot = self.slot_of(value)?;
        self.slots[slot].as_ref().filter(|cached| *cached == value)
    }

    pub fn put(&mut self, value: T) {
        if let Some(slot) = self.slot_of(&value) {
            self.slots[slot] = Some(value);
        }
    }

    /// Drop `value` if it is the current occupant of its slot
    pub fn remove(&mut self, value: &T) {
        if let Some(slot) = self.slot_of(value) {
            if self.slots[slot].as_ref() == Some(value) {
                self.slots[slot] = None;
            }
        }
    }

    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }
}

/// Process-wide cache of recently created triples
#[derive(Debug)]
pub struct TripleCache {
    inner: Mutex<SlotCache<Triple>>,
}

impl TripleCache {
    pub fn new(slots: usize) -> Self {
        Self {
            inner: Mutex::new(SlotCache::new(slots)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SlotCache<Triple>> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Shared instance equal to `triple`, caching `triple` on a miss
    pub fn intern(&self, triple: Triple) -> Triple {
        let mut cache = self.lock();
        if let Some(cached) = cache.get(&triple) {
            return cached.clone();
        }
        cache.put(triple.clone());
        triple
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

struct GlobalCaches {
    nodes: NodeCache,
    triples: TripleCache,
}

static GLOBAL: OnceLock<GlobalCaches> = OnceLock::new();

fn global() -> &'static GlobalCaches {
    GLOBAL.get_or_init(|| build(&GraphConfig::default()))
}

fn build(config: &GraphConfig) -> GlobalCaches {
    GlobalCaches {
        nodes: NodeCache::new(config.node_cache_capacity),
        triples: TripleCache::new(config.triple_cache_slots),
    }
}

/// Size the process-wide caches. Only effective before their first use;
/// returns false when they already exist.
pub fn configure_global(config: &GraphConfig) -> bool {
    let mut configured = false;
    GLOBAL.get_or_init(|| {
        configured = true;
        build(config)
    });
    configured
}

pub fn node_cache() -> &'static NodeCache {
    &global().nodes
}

pub fn triple_cache() -> &'static TripleCache {
    &global().triples
}

/// Empty both process-wide caches
pub fn clear_global() {
    node_cache().clear();
    triple_cache().clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_cache_get_put_clear() {
        let cache = NodeCache::new(2);
        let a = Node::Uri("eh:/a".into());
        cache.put("eh:/a", a.clone());
        assert_eq!(cache.get("eh:/a"), Some(a));
        assert_eq!(cache.get("eh:/b"), None);

        cache.put("eh:/b", Node::Uri("eh:/b".into()));
        cache.put("eh:/c", Node::Uri("eh:/c".into()));
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("eh:/a"), None, "least recently used entry is evicted");

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_disabled_node_cache() {
        let cache = NodeCache::new(0);
        cache.put("eh:/a", Node::Uri("eh:/a".into()));
        assert_eq!(cache.get("eh:/a"), None);
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_slot_cache_last_write_wins() {
        let mut cache = SlotCache::new(1);
        cache.put(1u32);
        assert_eq!(cache.get(&1), Some(&1));
        cache.put(2u32);
        assert_eq!(cache.get(&1), None);
        assert_eq!(cache.get(&2), Some(&2));

        cache.remove(&1);
        assert_eq!(cache.get(&2), Some(&2), "removing a non-occupant leaves the slot alone");
        cache.remove(&2);
        assert_eq!(cache.get(&2), None);
    }

    #[test]
    fn test_zero_slot_cache_is_inert() {
        let mut cache = SlotCache::new(0);
        cache.put("x");
        assert_eq!(cache.get(&"x"), None);
        assert_eq!(cache.capacity(), 0);
    }

    #[test]
    fn test_triple_cache_interns() {
        let cache = TripleCache::new(16);
        let t = Triple::new(
            Node::Uri("eh:/s".into()),
            Node::Uri("eh:/p".into()),
            Node::Uri("eh:/o".into()),
        );
        let first = cache.intern(t.clone());
        let second = cache.intern(t.clone());
        assert_eq!(first, t);
        assert_eq!(second, t);
        cache.clear();
        assert_eq!(cache.intern(t.clone()), t);
    }
}
