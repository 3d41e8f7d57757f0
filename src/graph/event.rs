//! Graph events for listeners
//!
//! Captures changes to a graph so that observers (indexes, replication,
//! auditing) can follow along. Delivery is synchronous and happens after the
//! mutation succeeded.

use super::pattern::TriplePattern;
use super::triple::Triple;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub enum GraphEvent {
    Added(Triple),
    Deleted(Triple),
    /// Bulk add; lists the triples actually applied, in input order
    AddedMany(Vec<Triple>),
    DeletedMany(Vec<Triple>),
    /// Every triple of another graph was added
    AddedGraph(Vec<Triple>),
    DeletedGraph(Vec<Triple>),
    /// All triples were removed
    Cleared,
    /// Every triple matching the pattern was removed
    Removed(TriplePattern),
}

/// Observer of graph mutations
pub trait GraphListener: Send + Sync {
    fn notify(&self, event: &GraphEvent);
}

impl<F> GraphListener for F
where
    F: Fn(&GraphEvent) + Send + Sync,
{
    fn notify(&self, event: &GraphEvent) {
        self(event)
    }
}

/// Handle returned by [`EventManager::register`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

/// Registry of listeners attached to one graph
#[derive(Default)]
pub struct EventManager {
    listeners: Vec<(ListenerId, Arc<dyn GraphListener>)>,
    next_id: u64,
}

impl EventManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. Registering the same listener twice delivers
    /// every event to it twice.
    pub fn register(&mut self, listener: Arc<dyn GraphListener>) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, listener));
        id
    }

    /// Remove one registration; returns false if it was not registered
    pub fn unregister(&mut self, id: ListenerId) -> bool {
        match self.listeners.iter().position(|(lid, _)| *lid == id) {
            Some(index) => {
                self.listeners.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn listening(&self) -> bool {
        !self.listeners.is_empty()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn notify(&self, event: &GraphEvent) {
        for (_, listener) in &self.listeners {
            listener.notify(event);
        }
    }
}

impl fmt::Debug for EventManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventManager")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<GraphEvent>>);

    impl GraphListener for Recorder {
        fn notify(&self, event: &GraphEvent) {
            self.0.lock().unwrap().push(event.clone());
        }
    }

    #[test]
    fn test_register_and_notify() {
        let mut events = EventManager::new();
        let recorder = Arc::new(Recorder::default());
        events.register(recorder.clone());
        assert!(events.listening());

        events.notify(&GraphEvent::Cleared);
        assert_eq!(*recorder.0.lock().unwrap(), vec![GraphEvent::Cleared]);
    }

    #[test]
    fn test_register_twice_unregister_once() {
        let mut events = EventManager::new();
        let recorder = Arc::new(Recorder::default());
        let first = events.register(recorder.clone());
        events.register(recorder.clone());

        events.notify(&GraphEvent::Cleared);
        assert_eq!(recorder.0.lock().unwrap().len(), 2);

        assert!(events.unregister(first));
        assert!(!events.unregister(first));
        events.notify(&GraphEvent::Cleared);
        assert_eq!(recorder.0.lock().unwrap().len(), 3);
    }

    #[test]
    fn test_closure_listener() {
        let seen = Arc::new(Mutex::new(0usize));
        let counter = Arc::clone(&seen);
        let mut events = EventManager::new();
        events.register(Arc::new(move |_: &GraphEvent| {
            *counter.lock().unwrap() += 1;
        }));
        events.notify(&GraphEvent::Cleared);
        assert_eq!(*seen.lock().unwrap(), 1);
    }
}
