//! Read-only view over another graph

use super::capabilities::Capabilities;
use super::error::{GraphError, GraphResult};
use super::event::EventManager;
use super::pattern::TriplePattern;
use super::store::{Graph, TripleIter};
use super::triple::Triple;

/// Wraps a graph and rejects every mutation with
/// [`GraphError::UnsupportedOperation`]. Queries, size and listener
/// registration go to the inner graph.
#[derive(Debug)]
pub struct ReadOnlyGraph<G> {
    inner: G,
}

impl<G: Graph> ReadOnlyGraph<G> {
    pub fn new(inner: G) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &G {
        &self.inner
    }

    pub fn into_inner(self) -> G {
        self.inner
    }
}

impl<G: Graph> Graph for ReadOnlyGraph<G> {
    fn perform_add(&mut self, _triple: Triple) -> GraphResult<bool> {
        Err(GraphError::unsupported("add on a read-only graph"))
    }

    fn perform_delete(&mut self, _triple: &Triple) -> GraphResult<bool> {
        Err(GraphError::unsupported("delete on a read-only graph"))
    }

    fn graph_base_find(&self, pattern: &TriplePattern) -> TripleIter {
        self.inner.graph_base_find(pattern)
    }

    fn graph_base_contains(&self, pattern: &TriplePattern) -> bool {
        self.inner.graph_base_contains(pattern)
    }

    fn graph_base_size(&self) -> GraphResult<usize> {
        self.inner.graph_base_size()
    }

    fn perform_clear(&mut self) -> GraphResult<()> {
        Err(GraphError::unsupported("clear on a read-only graph"))
    }

    fn capabilities(&self) -> Capabilities {
        self.inner.capabilities().read_only()
    }

    fn event_manager(&self) -> &EventManager {
        self.inner.event_manager()
    }

    fn event_manager_mut(&mut self) -> &mut EventManager {
        self.inner.event_manager_mut()
    }

    fn close(&mut self) {
        self.inner.close()
    }

    fn is_closed(&self) -> bool {
        self.inner.is_closed()
    }
}
