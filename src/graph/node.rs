//! RDF node model
//!
//! A [`Node`] is one of: URI reference, literal, blank node, variable, or the
//! wildcard [`Node::Any`]. Equality (`==`, `Hash`) is structural and is what
//! the store uses for identity; [`Node::matches`] and [`Node::same_value_as`]
//! are the weaker relations used by pattern matching.

use super::error::{GraphError, GraphResult};
use super::literal::LiteralLabel;
use crate::cache;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Characters never allowed anywhere in a URI label
fn is_disallowed_uri_char(c: char) -> bool {
    c.is_whitespace()
        || c.is_control()
        || matches!(c, '<' | '>' | '"' | '{' | '}' | '|' | '\\' | '^' | '`')
}

/// Minimal URI sanity check: non-empty, no disallowed characters, and either
/// starts like a name/fragment or carries a scheme separator.
pub(crate) fn check_uri(uri: &str) -> GraphResult<()> {
    let first = uri
        .chars()
        .next()
        .ok_or_else(|| GraphError::invalid("empty URI"))?;
    if let Some(bad) = uri.chars().find(|c| is_disallowed_uri_char(*c)) {
        return Err(GraphError::invalid(format!(
            "URI <{}> contains disallowed character {:?}",
            uri, bad
        )));
    }
    if first.is_alphanumeric() || first == '_' || first == '#' || uri.contains(':') {
        Ok(())
    } else {
        Err(GraphError::invalid(format!("malformed URI <{}>", uri)))
    }
}

/// Identity of a blank node, scoped to the graph it occurs in
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub struct BlankNodeId(Arc<str>);

impl BlankNodeId {
    /// Fresh identifier, distinct from every other generated one
    pub fn fresh() -> Self {
        BlankNodeId(Arc::from(uuid::Uuid::new_v4().simple().to_string()))
    }

    /// Identifier with an explicit label
    pub fn new(label: &str) -> GraphResult<Self> {
        if label.is_empty() {
            return Err(GraphError::invalid("empty blank node label"));
        }
        if label.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(GraphError::invalid(format!(
                "blank node label '{}' contains whitespace",
                label
            )));
        }
        Ok(BlankNodeId(Arc::from(label)))
    }

    pub fn label(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for BlankNodeId {
    type Error = GraphError;

    fn try_from(label: String) -> GraphResult<Self> {
        BlankNodeId::new(&label)
    }
}

impl fmt::Display for BlankNodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An RDF node
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "NodeRepr")]
pub enum Node {
    /// URI reference
    Uri(Arc<str>),
    /// Literal value
    Literal(Arc<LiteralLabel>),
    /// Blank (anonymous) node
    Blank(BlankNodeId),
    /// Named placeholder, only meaningful in patterns
    Variable(Arc<str>),
    /// Wildcard; matches every node
    Any,
}

impl Node {
    /// The wildcard node
    pub const ANY: Node = Node::Any;

    /// URI node. Recently created URI nodes are shared through the
    /// process-wide node cache.
    pub fn uri(uri: &str) -> GraphResult<Self> {
        let nodes = cache::node_cache();
        if let Some(node) = nodes.get(uri) {
            return Ok(node);
        }
        check_uri(uri)?;
        let node = Node::Uri(Arc::from(uri));
        nodes.put(uri, node.clone());
        Ok(node)
    }

    /// Literal node from a prepared label
    pub fn literal(label: LiteralLabel) -> Self {
        Node::Literal(Arc::new(label))
    }

    /// Plain literal node
    pub fn plain_literal(lexical: impl Into<String>) -> Self {
        Node::literal(LiteralLabel::plain(lexical))
    }

    /// Language-tagged literal node
    pub fn lang_literal(lexical: impl Into<String>, language: &str) -> GraphResult<Self> {
        Ok(Node::literal(LiteralLabel::with_language(lexical, language)?))
    }

    /// Typed literal node
    pub fn typed_literal(lexical: impl Into<String>, datatype: &str) -> GraphResult<Self> {
        Ok(Node::literal(LiteralLabel::typed(lexical, datatype)?))
    }

    /// Fresh blank node
    pub fn blank() -> Self {
        Node::Blank(BlankNodeId::fresh())
    }

    /// Blank node with an explicit label
    pub fn blank_with_label(label: &str) -> GraphResult<Self> {
        Ok(Node::Blank(BlankNodeId::new(label)?))
    }

    /// Variable node
    pub fn variable(name: &str) -> GraphResult<Self> {
        if name.is_empty() {
            return Err(GraphError::invalid("empty variable name"));
        }
        Ok(Node::Variable(Arc::from(name)))
    }

    pub fn is_uri(&self) -> bool {
        matches!(self, Node::Uri(_))
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Node::Literal(_))
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Node::Blank(_))
    }

    pub fn is_variable(&self) -> bool {
        matches!(self, Node::Variable(_))
    }

    pub fn is_any(&self) -> bool {
        matches!(self, Node::Any)
    }

    /// URIs, literals and blank nodes; variables and ANY are not concrete
    pub fn is_concrete(&self) -> bool {
        matches!(self, Node::Uri(_) | Node::Literal(_) | Node::Blank(_))
    }

    pub fn get_uri(&self) -> GraphResult<&str> {
        match self {
            Node::Uri(uri) => Ok(uri.as_ref()),
            other => Err(wrong_variant("get_uri", other)),
        }
    }

    pub fn get_literal(&self) -> GraphResult<&LiteralLabel> {
        match self {
            Node::Literal(label) => Ok(label.as_ref()),
            other => Err(wrong_variant("get_literal", other)),
        }
    }

    pub fn get_literal_lexical_form(&self) -> GraphResult<&str> {
        self.get_literal().map(LiteralLabel::lexical_form)
    }

    pub fn get_blank_node_id(&self) -> GraphResult<&BlankNodeId> {
        match self {
            Node::Blank(id) => Ok(id),
            other => Err(wrong_variant("get_blank_node_id", other)),
        }
    }

    pub fn get_name(&self) -> GraphResult<&str> {
        match self {
            Node::Variable(name) => Ok(name.as_ref()),
            other => Err(wrong_variant("get_name", other)),
        }
    }

    /// Value equality. Same as `==` except for literals, which compare by
    /// interpreted value.
    pub fn same_value_as(&self, other: &Node) -> bool {
        match (self, other) {
            (Node::Literal(a), Node::Literal(b)) => a.same_value_as(b),
            _ => self == other,
        }
    }

    /// Pattern-position match: ANY matches everything, literals match by
    /// value, everything else by structural equality.
    pub fn matches(&self, other: &Node) -> bool {
        match self {
            Node::Any => true,
            Node::Literal(_) => self.same_value_as(other),
            _ => self == other,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Node::Uri(_) => "URI node",
            Node::Literal(_) => "literal node",
            Node::Blank(_) => "blank node",
            Node::Variable(_) => "variable node",
            Node::Any => "ANY",
        }
    }
}

/// Wire shape of [`Node`]; deserialized nodes go through the checked
/// constructors
#[derive(Deserialize)]
enum NodeRepr {
    Uri(String),
    Literal(LiteralLabel),
    Blank(BlankNodeId),
    Variable(String),
    Any,
}

impl TryFrom<NodeRepr> for Node {
    type Error = GraphError;

    fn try_from(repr: NodeRepr) -> GraphResult<Self> {
        match repr {
            NodeRepr::Uri(uri) => Node::uri(&uri),
            NodeRepr::Literal(label) => Ok(Node::literal(label)),
            NodeRepr::Blank(id) => Ok(Node::Blank(id)),
            NodeRepr::Variable(name) => Node::variable(&name),
            NodeRepr::Any => Ok(Node::Any),
        }
    }
}

fn wrong_variant(accessor: &str, node: &Node) -> GraphError {
    GraphError::unsupported(format!("{} called on {} {}", accessor, node.kind(), node))
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Uri(uri) => write!(f, "<{}>", uri),
            Node::Literal(label) => write!(f, "{}", label),
            Node::Blank(id) => write!(f, "_:{}", id),
            Node::Variable(name) => write!(f, "?{}", name),
            Node::Any => write!(f, "ANY"),
        }
    }
}

impl From<LiteralLabel> for Node {
    fn from(label: LiteralLabel) -> Self {
        Node::literal(label)
    }
}

impl From<BlankNodeId> for Node {
    fn from(id: BlankNodeId) -> Self {
        Node::Blank(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::literal::xsd;

    #[test]
    fn test_uri_node() {
        let node = Node::uri("http://example.org/alice").unwrap();
        assert_eq!(node.get_uri().unwrap(), "http://example.org/alice");
        assert_eq!(node.to_string(), "<http://example.org/alice>");
        assert_eq!(node, Node::uri("http://example.org/alice").unwrap());
        assert!(node.is_concrete());
    }

    #[test]
    fn test_uri_validation() {
        assert!(Node::uri("").is_err());
        assert!(Node::uri("http://example.org/a b").is_err());
        assert!(Node::uri("http://example.org/<a>").is_err());
        assert!(Node::uri("-foo").is_err());
        assert!(Node::uri("-foo:bar").is_ok());
        assert!(Node::uri("#frag").is_ok());
        assert!(Node::uri("_local").is_ok());
        assert!(Node::uri("eh:/S").is_ok());
    }

    #[test]
    fn test_blank_nodes() {
        let a = Node::blank();
        let b = Node::blank();
        assert_ne!(a, b);
        assert!(a.is_blank());

        let x = Node::blank_with_label("x").unwrap();
        assert_eq!(x, Node::blank_with_label("x").unwrap());
        assert_eq!(x.get_blank_node_id().unwrap().label(), "x");
        assert_eq!(x.to_string(), "_:x");
        assert!(Node::blank_with_label("").is_err());
    }

    #[test]
    fn test_variables() {
        let v = Node::variable("xxx").unwrap();
        assert_eq!(v, Node::variable("xxx").unwrap());
        assert_ne!(v, Node::variable("yyy").unwrap());
        assert_eq!(v.get_name().unwrap(), "xxx");
        assert!(!v.is_concrete());
        assert!(Node::variable("").is_err());
    }

    #[test]
    fn test_failing_accessors() {
        let u = Node::uri("eh:/u").unwrap();
        let b = Node::blank();
        let l = Node::plain_literal("l");
        let v = Node::variable("v").unwrap();
        let a = Node::ANY;

        for n in [&a, &b, &l, &v] {
            assert!(matches!(n.get_uri(), Err(GraphError::UnsupportedOperation(_))));
        }
        for n in [&a, &u, &b, &v] {
            assert!(matches!(n.get_literal(), Err(GraphError::UnsupportedOperation(_))));
        }
        for n in [&a, &u, &b, &l] {
            assert!(matches!(n.get_name(), Err(GraphError::UnsupportedOperation(_))));
        }
        for n in [&a, &u, &l, &v] {
            assert!(matches!(n.get_blank_node_id(), Err(GraphError::UnsupportedOperation(_))));
        }
    }

    #[test]
    fn test_simple_matches() {
        let s = Node::uri("eh:/S").unwrap();
        let t = Node::uri("eh:/T").unwrap();
        let x = Node::blank_with_label("X").unwrap();
        let y = Node::blank_with_label("Y").unwrap();
        let ten = Node::typed_literal("10", xsd::INTEGER).unwrap();
        let eleven = Node::typed_literal("11", xsd::INTEGER).unwrap();

        assert!(s.matches(&s));
        assert!(!s.matches(&t));
        assert!(x.matches(&x));
        assert!(!x.matches(&y));
        assert!(ten.matches(&ten));
        assert!(!ten.matches(&eleven));
        assert!(Node::ANY.matches(&s));
        assert!(Node::ANY.matches(&x));
        assert!(Node::ANY.matches(&ten));
        assert!(Node::ANY.matches(&Node::ANY));
        assert!(!s.matches(&Node::ANY));
    }

    #[test]
    fn test_data_matches() {
        let a = Node::typed_literal("10", xsd::INT).unwrap();
        let b = Node::typed_literal("10", xsd::SHORT).unwrap();
        assert_ne!(a, b, "types must make a difference");
        assert!(a.same_value_as(&b));
        assert!(a.matches(&b), "matching literals must respect same_value_as");
    }

    #[test]
    fn test_languaged_literals() {
        let a = Node::lang_literal("chat", "en-UK").unwrap();
        let b = Node::lang_literal("chat", "EN-UK").unwrap();
        assert!(a.same_value_as(&b));
        assert_ne!(a, b);
        assert_eq!(a.get_literal_lexical_form().unwrap(), "chat");
        assert_eq!(a.get_literal().unwrap().language(), Some("en-UK"));
    }

    #[test]
    fn test_display() {
        assert_eq!(Node::ANY.to_string(), "ANY");
        assert_eq!(Node::variable("v").unwrap().to_string(), "?v");
        assert_eq!(Node::plain_literal("rhubarb").to_string(), "\"rhubarb\"");
    }

    #[test]
    fn test_serde_round_trip() {
        let nodes = vec![
            Node::uri("http://example.org/a").unwrap(),
            Node::lang_literal("chat", "fr").unwrap(),
            Node::typed_literal("7", xsd::INT).unwrap(),
            Node::blank_with_label("b0").unwrap(),
            Node::variable("x").unwrap(),
            Node::ANY,
        ];
        let json = serde_json::to_string(&nodes).unwrap();
        let back: Vec<Node> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, nodes);
    }

    #[test]
    fn test_deserialize_rejects_malformed_nodes() {
        for json in [
            r#"{"Uri":"<not a uri>"}"#,
            r#"{"Uri":""}"#,
            r#"{"Blank":""}"#,
            r#"{"Blank":"has space"}"#,
            r#"{"Variable":""}"#,
            r#"{"Literal":{"lexical":"chat","language":"en UK","datatype":null}}"#,
            r#"{"Literal":{"lexical":"x","language":null,"datatype":"http://www.w3.org/1999/02/22-rdf-syntax-ns#langString"}}"#,
            r#"{"Literal":{"lexical":"x","language":"en","datatype":"http://www.w3.org/2001/XMLSchema#string"}}"#,
        ] {
            assert!(serde_json::from_str::<Node>(json).is_err(), "{}", json);
        }
    }
}
