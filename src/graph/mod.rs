//! Core RDF graph implementation
//!
//! This module implements the triple data model with:
//! - Nodes: URIs, literals, blank nodes, variables and the ANY wildcard
//! - Immutable triples and wildcard triple patterns
//! - The `Graph` contract with an indexed in-memory store
//! - Listener notification on mutation

pub mod capabilities;
pub mod error;
pub mod event;
pub mod literal;
pub mod mem;
pub mod node;
pub mod pattern;
pub mod shorthand;
pub mod store;
pub mod triple;
pub mod view;

// Re-export main types
pub use capabilities::Capabilities;
pub use error::{GraphError, GraphResult};
pub use event::{EventManager, GraphEvent, GraphListener, ListenerId};
pub use literal::{xsd, LiteralLabel, LiteralValue};
pub use mem::RdfStore;
pub use node::{BlankNodeId, Node};
pub use pattern::{pattern_matches, TriplePattern};
pub use store::{Graph, TripleIter};
pub use triple::Triple;
pub use view::ReadOnlyGraph;
