//! Triple patterns and the single match predicate every `find` honours

use super::node::Node;
use super::triple::Triple;
use std::fmt;

/// A triple where any position may be the wildcard [`Node::Any`]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TriplePattern {
    subject: Node,
    predicate: Node,
    object: Node,
}

impl TriplePattern {
    /// Create a pattern; pass [`Node::ANY`] for unconstrained positions
    pub fn new(subject: Node, predicate: Node, object: Node) -> Self {
        Self {
            subject,
            predicate,
            object,
        }
    }

    /// Pattern from optional positions; `None` means unconstrained
    pub fn from_options(subject: Option<Node>, predicate: Option<Node>, object: Option<Node>) -> Self {
        Self::new(
            subject.unwrap_or(Node::Any),
            predicate.unwrap_or(Node::Any),
            object.unwrap_or(Node::Any),
        )
    }

    /// The pattern that matches every triple
    pub fn any() -> Self {
        Self::new(Node::Any, Node::Any, Node::Any)
    }

    /// Fixed subject, or None when unconstrained
    pub fn subject(&self) -> Option<&Node> {
        fixed(&self.subject)
    }

    pub fn predicate(&self) -> Option<&Node> {
        fixed(&self.predicate)
    }

    pub fn object(&self) -> Option<&Node> {
        fixed(&self.object)
    }

    /// Positions in subject, predicate, object order
    pub fn positions(&self) -> [Option<&Node>; 3] {
        [self.subject(), self.predicate(), self.object()]
    }

    /// Number of constrained positions
    pub fn bound_count(&self) -> usize {
        self.positions().iter().filter(|p| p.is_some()).count()
    }

    pub fn is_all_wildcard(&self) -> bool {
        self.bound_count() == 0
    }

    /// Every position holds a concrete node
    pub fn is_concrete(&self) -> bool {
        self.subject.is_concrete() && self.predicate.is_concrete() && self.object.is_concrete()
    }

    /// True iff every position is either unconstrained or `matches` the
    /// triple's node at that position
    pub fn matches(&self, triple: &Triple) -> bool {
        self.subject.matches(triple.subject())
            && self.predicate.matches(triple.predicate())
            && self.object.matches(triple.object())
    }

    /// The pattern as a triple, wildcards kept as [`Node::Any`]
    pub fn to_triple(&self) -> Triple {
        Triple::new(self.subject.clone(), self.predicate.clone(), self.object.clone())
    }
}

fn fixed(node: &Node) -> Option<&Node> {
    if node.is_any() {
        None
    } else {
        Some(node)
    }
}

impl From<Triple> for TriplePattern {
    fn from(triple: Triple) -> Self {
        let (s, p, o) = triple.into_parts();
        Self::new(s, p, o)
    }
}

impl From<&Triple> for TriplePattern {
    fn from(triple: &Triple) -> Self {
        Self::new(
            triple.subject().clone(),
            triple.predicate().clone(),
            triple.object().clone(),
        )
    }
}

impl fmt::Display for TriplePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} {} {})", self.subject, self.predicate, self.object)
    }
}

/// Naive three-way match of `(s, p, o)` against a triple
pub fn pattern_matches(s: &Node, p: &Node, o: &Node, triple: &Triple) -> bool {
    s.matches(triple.subject()) && p.matches(triple.predicate()) && o.matches(triple.object())
}
