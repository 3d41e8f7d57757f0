//! Samyama RDF
//!
//! In-memory RDF graph core: nodes, triples, indexed wildcard pattern
//! matching and graph equality up to blank-node renaming.
//!
//! # Components
//!
//! - `graph`: the node model, triples, patterns, the `Graph` contract, the
//!   indexed `RdfStore`, read-only views and listener events
//! - `matching`: blank-node isomorphism (`graphs_equal`, `match_graphs`,
//!   `graph_hash_code`)
//! - `cache`: best-effort node and triple caches
//! - `config`: cache sizes and matcher depth, loadable from YAML or JSON
//! - `interop`: conversions to and from oxrdf terms
//!
//! ## Example Usage
//!
//! ```rust
//! use samyama_rdf::graph::{Graph, Node, RdfStore, Triple};
//! use samyama_rdf::graph::xsd;
//!
//! let mut store = RdfStore::new();
//! let alice = Node::uri("http://example.org/alice").unwrap();
//! let age = Node::uri("http://example.org/age").unwrap();
//! store
//!     .add(Triple::new(alice.clone(), age.clone(), Node::typed_literal("30", xsd::INTEGER).unwrap()))
//!     .unwrap();
//!
//! // Literal positions match by value
//! let thirty = Node::typed_literal("030", xsd::INT).unwrap();
//! assert!(store.contains(&alice, &Node::ANY, &thirty).unwrap());
//!
//! // Graphs compare up to blank-node renaming
//! let mut a = RdfStore::new();
//! let mut b = RdfStore::new();
//! a.add(Triple::new(Node::blank(), age.clone(), Node::blank())).unwrap();
//! b.add(Triple::new(Node::blank(), age, Node::blank())).unwrap();
//! assert!(samyama_rdf::graphs_equal(&a, &b).unwrap());
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod cache;
pub mod config;
pub mod factory;
pub mod graph;
pub mod interop;
pub mod matching;

// Re-export main types for convenience
pub use graph::{
    Capabilities, Graph, GraphError, GraphEvent, GraphListener, GraphResult, LiteralLabel, Node,
    RdfStore, ReadOnlyGraph, Triple, TripleIter, TriplePattern,
};

pub use matching::{graph_hash_code, graphs_equal, match_graphs, GraphMatcher};

pub use config::{ConfigError, ConfigResult, GraphConfig};

pub use factory::{create_default_graph, create_graph, create_graph_with_config};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
