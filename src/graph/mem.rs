//! In-memory triple store
//!
//! [`RdfStore`] keeps every triple in a primary set plus one hash index per
//! position (subject, predicate, object). Literal positions are indexed by
//! their interpreted value so that value-equal patterns hit the same bucket.

use super::capabilities::Capabilities;
use super::error::GraphResult;
use super::event::EventManager;
use super::literal::LiteralValue;
use super::node::Node;
use super::pattern::TriplePattern;
use super::store::{Graph, TripleIter};
use super::triple::Triple;
use crate::cache::SlotCache;
use crate::config::GraphConfig;
use rustc_hash::{FxHashMap, FxHashSet};
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

/// Index key for one position of a triple
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum IndexKey {
    Node(Node),
    Value(LiteralValue),
}

impl IndexKey {
    fn of(node: &Node) -> Self {
        match node {
            Node::Literal(label) => IndexKey::Value(label.value()),
            other => IndexKey::Node(other.clone()),
        }
    }
}

type PositionIndex = FxHashMap<IndexKey, FxHashSet<Triple>>;

/// Indexed in-memory graph
///
/// Implements:
/// - S index (subject -> triples)
/// - P index (predicate -> triples)
/// - O index (object -> triples, literals by value)
///
/// Patterns with at least one bound position scan only the smallest matching
/// bucket; fully bound patterns without literals are point lookups that go
/// through a small direct-mapped cache first.
#[derive(Debug)]
pub struct RdfStore {
    /// All triples (primary storage)
    triples: FxHashSet<Triple>,

    subject_index: PositionIndex,
    predicate_index: PositionIndex,
    object_index: PositionIndex,

    /// Recently confirmed point lookups; never authoritative
    lookup_cache: Mutex<SlotCache<Triple>>,

    events: EventManager,
    closed: bool,
}

impl RdfStore {
    /// Create a new empty store with default configuration
    pub fn new() -> Self {
        Self::with_config(&GraphConfig::default())
    }

    pub fn with_config(config: &GraphConfig) -> Self {
        Self {
            triples: FxHashSet::default(),
            subject_index: PositionIndex::default(),
            predicate_index: PositionIndex::default(),
            object_index: PositionIndex::default(),
            lookup_cache: Mutex::new(SlotCache::new(config.lookup_cache_slots)),
            events: EventManager::new(),
            closed: false,
        }
    }

    /// Store seeded with `triples`; duplicates collapse
    pub fn from_triples<I>(triples: I) -> Self
    where
        I: IntoIterator<Item = Triple>,
    {
        let mut store = Self::new();
        for triple in triples {
            store.insert(triple);
        }
        store
    }

    fn cache(&self) -> MutexGuard<'_, SlotCache<Triple>> {
        self.lookup_cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn insert(&mut self, triple: Triple) -> bool {
        if self.triples.contains(&triple) {
            return false;
        }
        index_insert(&mut self.subject_index, triple.subject(), &triple);
        index_insert(&mut self.predicate_index, triple.predicate(), &triple);
        index_insert(&mut self.object_index, triple.object(), &triple);
        self.triples.insert(triple);
        true
    }

    fn remove_triple(&mut self, triple: &Triple) -> bool {
        if !self.triples.remove(triple) {
            return false;
        }
        index_remove(&mut self.subject_index, triple.subject(), triple);
        index_remove(&mut self.predicate_index, triple.predicate(), triple);
        index_remove(&mut self.object_index, triple.object(), triple);
        self.cache().remove(triple);
        true
    }

    /// Exact-triple lookup for a fully bound pattern whose nodes all match
    /// structurally
    fn point_lookup(&self, pattern: &TriplePattern) -> Option<Triple> {
        let key = pattern.to_triple();
        if let Some(hit) = self.cache().get(&key) {
            return Some(hit.clone());
        }
        let found = self.triples.get(&key)?.clone();
        self.cache().put(found.clone());
        Some(found)
    }

    /// Smallest index bucket among the bound positions, or None when every
    /// position is a wildcard
    fn smallest_bucket(&self, pattern: &TriplePattern) -> Option<&FxHashSet<Triple>> {
        let indexes = [&self.subject_index, &self.predicate_index, &self.object_index];
        let mut best: Option<&FxHashSet<Triple>> = None;
        for (index, position) in indexes.iter().zip(pattern.positions()) {
            let Some(node) = position else { continue };
            let Some(bucket) = index.get(&IndexKey::of(node)) else {
                return Some(empty_bucket());
            };
            if best.map_or(true, |b| bucket.len() < b.len()) {
                best = Some(bucket);
            }
        }
        best
    }

    fn clear_indexes(&mut self) {
        self.triples.clear();
        self.subject_index.clear();
        self.predicate_index.clear();
        self.object_index.clear();
        self.cache().clear();
    }

    /// Number of distinct nodes indexed in each position
    pub fn index_sizes(&self) -> (usize, usize, usize) {
        (
            self.subject_index.len(),
            self.predicate_index.len(),
            self.object_index.len(),
        )
    }
}

fn empty_bucket() -> &'static FxHashSet<Triple> {
    static EMPTY: std::sync::OnceLock<FxHashSet<Triple>> = std::sync::OnceLock::new();
    EMPTY.get_or_init(FxHashSet::default)
}

fn index_insert(index: &mut PositionIndex, node: &Node, triple: &Triple) {
    index
        .entry(IndexKey::of(node))
        .or_default()
        .insert(triple.clone());
}

fn index_remove(index: &mut PositionIndex, node: &Node, triple: &Triple) {
    let key = IndexKey::of(node);
    if let Some(bucket) = index.get_mut(&key) {
        bucket.remove(triple);
        if bucket.is_empty() {
            index.remove(&key);
        }
    }
}

fn has_literal(pattern: &TriplePattern) -> bool {
    pattern.positions().iter().flatten().any(|n| n.is_literal())
}

impl Default for RdfStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Graph for RdfStore {
    fn perform_add(&mut self, triple: Triple) -> GraphResult<bool> {
        Ok(self.insert(triple))
    }

    fn perform_delete(&mut self, triple: &Triple) -> GraphResult<bool> {
        Ok(self.remove_triple(triple))
    }

    fn graph_base_find(&self, pattern: &TriplePattern) -> TripleIter {
        if pattern.is_all_wildcard() {
            return TripleIter::new(self.triples.iter().cloned().collect(), None);
        }
        if pattern.is_concrete() && !has_literal(pattern) {
            return TripleIter::new(self.point_lookup(pattern).into_iter().collect(), None);
        }
        match self.smallest_bucket(pattern) {
            Some(bucket) => TripleIter::new(bucket.iter().cloned().collect(), Some(pattern.clone())),
            None => TripleIter::empty(),
        }
    }

    fn graph_base_contains(&self, pattern: &TriplePattern) -> bool {
        if pattern.is_all_wildcard() {
            return !self.triples.is_empty();
        }
        if pattern.is_concrete() && !has_literal(pattern) {
            return self.point_lookup(pattern).is_some();
        }
        self.smallest_bucket(pattern)
            .map_or(false, |bucket| bucket.iter().any(|t| pattern.matches(t)))
    }

    fn graph_base_size(&self) -> GraphResult<usize> {
        Ok(self.triples.len())
    }

    fn perform_clear(&mut self) -> GraphResult<()> {
        self.clear_indexes();
        Ok(())
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::all()
    }

    fn event_manager(&self) -> &EventManager {
        &self.events
    }

    fn event_manager_mut(&mut self) -> &mut EventManager {
        &mut self.events
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }
        debug!("closing graph with {} triples", self.triples.len());
        self.clear_indexes();
        self.closed = true;
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}

impl Clone for RdfStore {
    /// Copy of the triples and indexes; listeners are not carried over
    fn clone(&self) -> Self {
        Self {
            triples: self.triples.clone(),
            subject_index: self.subject_index.clone(),
            predicate_index: self.predicate_index.clone(),
            object_index: self.object_index.clone(),
            lookup_cache: Mutex::new(SlotCache::new(self.cache().capacity())),
            events: EventManager::new(),
            closed: self.closed,
        }
    }
}

impl FromIterator<Triple> for RdfStore {
    fn from_iter<I: IntoIterator<Item = Triple>>(iter: I) -> Self {
        Self::from_triples(iter)
    }
}
