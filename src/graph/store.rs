//! The graph contract
//!
//! [`Graph`] is the triple-store interface every collaborator (ontology
//! layer, query engine, serializers) consumes. Implementations provide the
//! raw `perform_*`/`graph_base_*` primitives; the public operations
//! (capability checks, closed checks, event delivery, bulk variants, derived
//! queries) are provided methods so that every graph variant behaves the same.

use super::capabilities::Capabilities;
use super::error::{GraphError, GraphResult};
use super::event::{EventManager, GraphEvent, GraphListener, ListenerId};
use super::node::Node;
use super::pattern::TriplePattern;
use super::triple::Triple;
use rustc_hash::FxHashSet;
use std::sync::Arc;
use tracing::debug;

/// Lazy, one-shot sequence of triples returned by `find`
///
/// The candidate triples are snapshotted when `find` is called, so mutating
/// the graph while iterating neither corrupts the iteration nor shows up in
/// it. Filtering against the pattern happens as the iterator advances.
pub struct TripleIter {
    candidates: std::vec::IntoIter<Triple>,
    filter: Option<TriplePattern>,
}

impl TripleIter {
    /// Iterator over `candidates`, keeping only those matching `filter`
    pub fn new(candidates: Vec<Triple>, filter: Option<TriplePattern>) -> Self {
        Self {
            candidates: candidates.into_iter(),
            filter,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new(), None)
    }
}

impl Iterator for TripleIter {
    type Item = Triple;

    fn next(&mut self) -> Option<Self::Item> {
        match &self.filter {
            None => self.candidates.next(),
            Some(pattern) => self.candidates.by_ref().find(|t| pattern.matches(t)),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (_, upper) = self.candidates.size_hint();
        match self.filter {
            None => self.candidates.size_hint(),
            Some(_) => (0, upper),
        }
    }
}

fn fire(events: &EventManager, make: impl FnOnce() -> GraphEvent) {
    if events.listening() {
        events.notify(&make());
    }
}

/// A mutable collection of triples with pattern queries
pub trait Graph {
    /// Insert without checks or notification; Ok(true) if the graph changed
    fn perform_add(&mut self, triple: Triple) -> GraphResult<bool>;

    /// Remove without checks or notification; Ok(true) if the graph changed
    fn perform_delete(&mut self, triple: &Triple) -> GraphResult<bool>;

    /// Matching triples, without the closed check
    fn graph_base_find(&self, pattern: &TriplePattern) -> TripleIter;

    fn graph_base_size(&self) -> GraphResult<usize>;

    /// Existence check; override to avoid materializing matches
    fn graph_base_contains(&self, pattern: &TriplePattern) -> bool {
        self.graph_base_find(pattern).next().is_some()
    }

    /// Remove everything; override when the store can do better than
    /// deleting triple by triple
    fn perform_clear(&mut self) -> GraphResult<()> {
        let all: Vec<Triple> = self.graph_base_find(&TriplePattern::any()).collect();
        for triple in &all {
            self.perform_delete(triple)?;
        }
        Ok(())
    }

    fn capabilities(&self) -> Capabilities;

    fn event_manager(&self) -> &EventManager;

    fn event_manager_mut(&mut self) -> &mut EventManager;

    /// Release resources; every later operation fails with [`GraphError::Closed`]
    fn close(&mut self);

    fn is_closed(&self) -> bool;

    fn check_open(&self) -> GraphResult<()> {
        if self.is_closed() {
            Err(GraphError::Closed)
        } else {
            Ok(())
        }
    }

    fn check_add(&self) -> GraphResult<()> {
        self.check_open()?;
        if self.capabilities().add_allowed {
            Ok(())
        } else {
            Err(GraphError::unsupported("add is not allowed on this graph"))
        }
    }

    fn check_delete(&self) -> GraphResult<()> {
        self.check_open()?;
        if self.capabilities().delete_allowed {
            Ok(())
        } else {
            Err(GraphError::unsupported("delete is not allowed on this graph"))
        }
    }

    /// Insert the triple if absent; adding a present triple is a no-op
    fn add(&mut self, triple: Triple) -> GraphResult<()> {
        self.check_add()?;
        let listening = self.event_manager().listening();
        let event_triple = listening.then(|| triple.clone());
        if self.perform_add(triple)? {
            if let Some(t) = event_triple {
                self.event_manager().notify(&GraphEvent::Added(t));
            }
        }
        Ok(())
    }

    /// Remove the triple if present; deleting an absent triple is a no-op
    fn delete(&mut self, triple: &Triple) -> GraphResult<()> {
        self.check_delete()?;
        if self.perform_delete(triple)? {
            fire(self.event_manager(), || GraphEvent::Deleted(triple.clone()));
        }
        Ok(())
    }

    /// Add a slice of triples in order. Not atomic: on failure the applied
    /// prefix stays and is reported in the `AddedMany` event.
    fn add_slice(&mut self, triples: &[Triple]) -> GraphResult<()> {
        self.check_add()?;
        let mut applied = Vec::new();
        let mut outcome = Ok(());
        for triple in triples {
            match self.perform_add(triple.clone()) {
                Ok(true) => applied.push(triple.clone()),
                Ok(false) => {}
                Err(e) => {
                    outcome = Err(e);
                    break;
                }
            }
        }
        debug!("bulk add: {} of {} triples applied", applied.len(), triples.len());
        if !applied.is_empty() {
            fire(self.event_manager(), || GraphEvent::AddedMany(applied));
        }
        outcome
    }

    /// Add every triple produced by the iterator, in order
    fn add_all<I>(&mut self, triples: I) -> GraphResult<()>
    where
        I: IntoIterator<Item = Triple>,
        Self: Sized,
    {
        let triples: Vec<Triple> = triples.into_iter().collect();
        self.add_slice(&triples)
    }

    /// Add every triple of another graph
    fn add_graph(&mut self, other: &dyn Graph) -> GraphResult<()> {
        self.check_add()?;
        let triples: Vec<Triple> = other.find_all()?.collect();
        let mut applied = Vec::new();
        let mut outcome = Ok(());
        for triple in triples {
            match self.perform_add(triple.clone()) {
                Ok(true) => applied.push(triple),
                Ok(false) => {}
                Err(e) => {
                    outcome = Err(e);
                    break;
                }
            }
        }
        if !applied.is_empty() {
            fire(self.event_manager(), || GraphEvent::AddedGraph(applied));
        }
        outcome
    }

    /// Delete a slice of triples in order, with the same partial-failure
    /// semantics as [`Graph::add_slice`]
    fn delete_slice(&mut self, triples: &[Triple]) -> GraphResult<()> {
        self.check_delete()?;
        let mut applied = Vec::new();
        let mut outcome = Ok(());
        for triple in triples {
            match self.perform_delete(triple) {
                Ok(true) => applied.push(triple.clone()),
                Ok(false) => {}
                Err(e) => {
                    outcome = Err(e);
                    break;
                }
            }
        }
        debug!("bulk delete: {} of {} triples applied", applied.len(), triples.len());
        if !applied.is_empty() {
            fire(self.event_manager(), || GraphEvent::DeletedMany(applied));
        }
        outcome
    }

    fn delete_all<I>(&mut self, triples: I) -> GraphResult<()>
    where
        I: IntoIterator<Item = Triple>,
        Self: Sized,
    {
        let triples: Vec<Triple> = triples.into_iter().collect();
        self.delete_slice(&triples)
    }

    /// Delete every triple of another graph
    fn delete_graph(&mut self, other: &dyn Graph) -> GraphResult<()> {
        self.check_delete()?;
        let triples: Vec<Triple> = other.find_all()?.collect();
        let mut applied = Vec::new();
        let mut outcome = Ok(());
        for triple in triples {
            match self.perform_delete(&triple) {
                Ok(true) => applied.push(triple),
                Ok(false) => {}
                Err(e) => {
                    outcome = Err(e);
                    break;
                }
            }
        }
        if !applied.is_empty() {
            fire(self.event_manager(), || GraphEvent::DeletedGraph(applied));
        }
        outcome
    }

    /// All triples matching the pattern at call time
    fn find(&self, pattern: &TriplePattern) -> GraphResult<TripleIter> {
        self.check_open()?;
        Ok(self.graph_base_find(pattern))
    }

    /// `find` with positions given separately; pass [`Node::ANY`] for wildcards
    fn find_spo(&self, s: &Node, p: &Node, o: &Node) -> GraphResult<TripleIter> {
        self.find(&TriplePattern::new(s.clone(), p.clone(), o.clone()))
    }

    /// Full scan
    fn find_all(&self) -> GraphResult<TripleIter> {
        self.find(&TriplePattern::any())
    }

    /// True iff `find` would yield at least one match
    fn contains_pattern(&self, pattern: &TriplePattern) -> GraphResult<bool> {
        self.check_open()?;
        Ok(self.graph_base_contains(pattern))
    }

    fn contains(&self, s: &Node, p: &Node, o: &Node) -> GraphResult<bool> {
        self.contains_pattern(&TriplePattern::new(s.clone(), p.clone(), o.clone()))
    }

    /// `contains` with the triple's nodes as the pattern
    fn contains_triple(&self, triple: &Triple) -> GraphResult<bool> {
        self.contains_pattern(&TriplePattern::from(triple))
    }

    /// Exact number of stored triples
    fn size(&self) -> GraphResult<usize> {
        self.check_open()?;
        self.graph_base_size()
    }

    fn is_empty(&self) -> GraphResult<bool> {
        Ok(!self.contains_pattern(&TriplePattern::any())?)
    }

    /// Remove every triple
    fn clear(&mut self) -> GraphResult<()> {
        self.check_delete()?;
        self.perform_clear()?;
        debug!("graph cleared");
        fire(self.event_manager(), || GraphEvent::Cleared);
        Ok(())
    }

    /// Remove every triple matching `(s, p, o)`
    fn remove(&mut self, s: &Node, p: &Node, o: &Node) -> GraphResult<()> {
        self.check_delete()?;
        let pattern = TriplePattern::new(s.clone(), p.clone(), o.clone());
        let matches: Vec<Triple> = self.graph_base_find(&pattern).collect();
        for triple in &matches {
            self.perform_delete(triple)?;
        }
        debug!("removed {} triples matching {}", matches.len(), pattern);
        fire(self.event_manager(), || GraphEvent::Removed(pattern));
        Ok(())
    }

    /// Distinct subjects of triples matching the pattern, in first-seen order
    fn list_subjects(&self, pattern: &TriplePattern) -> GraphResult<Vec<Node>> {
        Ok(distinct(self.find(pattern)?.map(|t| t.subject().clone())))
    }

    fn list_predicates(&self, pattern: &TriplePattern) -> GraphResult<Vec<Node>> {
        Ok(distinct(self.find(pattern)?.map(|t| t.predicate().clone())))
    }

    fn list_objects(&self, pattern: &TriplePattern) -> GraphResult<Vec<Node>> {
        Ok(distinct(self.find(pattern)?.map(|t| t.object().clone())))
    }

    /// The node occurs in some position of some triple
    fn contains_node(&self, node: &Node) -> GraphResult<bool> {
        Ok(self.contains(node, &Node::ANY, &Node::ANY)?
            || self.contains(&Node::ANY, node, &Node::ANY)?
            || self.contains(&Node::ANY, &Node::ANY, node)?)
    }

    /// Equal up to a bijective renaming of blank nodes
    fn is_isomorphic_with(&self, other: &dyn Graph) -> GraphResult<bool>
    where
        Self: Sized,
    {
        crate::matching::graphs_equal(self, other)
    }

    /// Attach a listener to this graph
    fn register(&mut self, listener: Arc<dyn GraphListener>) -> ListenerId {
        self.event_manager_mut().register(listener)
    }

    fn unregister(&mut self, id: ListenerId) -> bool {
        self.event_manager_mut().unregister(id)
    }
}

fn distinct(nodes: impl Iterator<Item = Node>) -> Vec<Node> {
    let mut seen = FxHashSet::default();
    nodes.filter(|n| seen.insert(n.clone())).collect()
}
