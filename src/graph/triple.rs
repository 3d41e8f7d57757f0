//! RDF triple (subject-predicate-object)

use super::node::Node;
use crate::cache;
use rustc_hash::FxHasher;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Immutable ordered triple of nodes. Equality is componentwise and
/// structural.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Triple {
    subject: Node,
    predicate: Node,
    object: Node,
}

fn node_hash(node: &Node) -> u64 {
    let mut hasher = FxHasher::default();
    node.hash(&mut hasher);
    hasher.finish()
}

impl Triple {
    /// Create a new triple
    pub fn new(subject: Node, predicate: Node, object: Node) -> Self {
        Self {
            subject,
            predicate,
            object,
        }
    }

    /// Create a triple through the process-wide triple cache, sharing node
    /// allocations with a recently created equal triple
    pub fn create(subject: Node, predicate: Node, object: Node) -> Self {
        cache::triple_cache().intern(Self::new(subject, predicate, object))
    }

    /// The all-wildcard triple
    pub fn any() -> Self {
        Self::new(Node::Any, Node::Any, Node::Any)
    }

    pub fn subject(&self) -> &Node {
        &self.subject
    }

    pub fn predicate(&self) -> &Node {
        &self.predicate
    }

    pub fn object(&self) -> &Node {
        &self.object
    }

    /// Components in subject, predicate, object order
    pub fn nodes(&self) -> [&Node; 3] {
        [&self.subject, &self.predicate, &self.object]
    }

    pub fn into_parts(self) -> (Node, Node, Node) {
        (self.subject, self.predicate, self.object)
    }

    /// All three components are concrete (no ANY, no variables)
    pub fn is_concrete(&self) -> bool {
        self.nodes().iter().all(|n| n.is_concrete())
    }

    /// Positional hash: component hashes are rotated by position so that
    /// permuted components do not collide trivially
    pub fn positional_hash(&self) -> u64 {
        node_hash(&self.subject).rotate_right(1)
            ^ node_hash(&self.predicate)
            ^ node_hash(&self.object).rotate_left(1)
    }
}

impl Hash for Triple {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.positional_hash());
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} .", self.subject, self.predicate, self.object)
    }
}
