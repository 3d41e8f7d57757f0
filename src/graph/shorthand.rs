//! Compact text notation for nodes, triples and small graphs
//!
//! Used mostly by tests and fixtures:
//!
//! | text | node |
//! |---|---|
//! | `??` | [`Node::Any`] |
//! | `?x` | variable `x` |
//! | `_x` | blank node labelled `x` |
//! | `'lex'`, `"lex"` | plain literal |
//! | `'chat'en` | language-tagged literal |
//! | `'42'xsd:integer` | typed literal, datatype prefix expanded |
//! | `17` | `xsd:integer` literal |
//! | `rdf:type` | URI with the known prefix expanded |
//! | `urn:x` | URI kept as written (unknown prefix) |
//! | `word` | URI `eh:/word` |

use super::error::{GraphError, GraphResult};
use super::literal::{xsd, LiteralLabel};
use super::mem::RdfStore;
use super::node::Node;
use super::triple::Triple;

const PREFIXES: &[(&str, &str)] = &[
    ("rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#"),
    ("rdfs", "http://www.w3.org/2000/01/rdf-schema#"),
    ("owl", "http://www.w3.org/2002/07/owl#"),
    ("xsd", xsd::NAMESPACE),
    ("eh", "eh:/"),
];

fn expand_prefixed(text: &str) -> Option<String> {
    let (prefix, local) = text.split_once(':')?;
    PREFIXES
        .iter()
        .find(|(p, _)| *p == prefix)
        .map(|(_, ns)| format!("{}{}", ns, local))
}

/// Parse one node
pub fn node(text: &str) -> GraphResult<Node> {
    let text = text.trim();
    let Some(first) = text.chars().next() else {
        return Err(GraphError::invalid("empty node text"));
    };
    match first {
        '?' if text == "??" => Ok(Node::ANY),
        '?' => Node::variable(&text[1..]),
        '_' => Node::blank_with_label(&text[1..]),
        '\'' | '"' => literal(text, first),
        c if c.is_ascii_digit() || ((c == '-' || c == '+') && text.len() > 1) => {
            if text[1..].bytes().all(|b| b.is_ascii_digit()) {
                Node::typed_literal(text, xsd::INTEGER)
            } else {
                uri(text)
            }
        }
        _ => uri(text),
    }
}

fn uri(text: &str) -> GraphResult<Node> {
    if let Some(expanded) = expand_prefixed(text) {
        return Node::uri(&expanded);
    }
    if text.contains(':') {
        Node::uri(text)
    } else {
        Node::uri(&format!("eh:/{}", text))
    }
}

fn literal(text: &str, quote: char) -> GraphResult<Node> {
    let body = &text[1..];
    let Some(end) = body.find(quote) else {
        return Err(GraphError::invalid(format!("unterminated literal: {}", text)));
    };
    let lexical = &body[..end];
    let suffix = &body[end + 1..];
    let label = if suffix.is_empty() {
        LiteralLabel::plain(lexical)
    } else if suffix.contains(':') {
        let datatype = expand_prefixed(suffix).unwrap_or_else(|| suffix.to_string());
        LiteralLabel::typed(lexical, &datatype)?
    } else {
        LiteralLabel::with_language(lexical, suffix)?
    };
    Ok(Node::literal(label))
}

/// Parse `"s p o"` into a triple
pub fn triple(text: &str) -> GraphResult<Triple> {
    let parts = split_terms(text)?;
    match parts.as_slice() {
        [s, p, o] => Ok(Triple::new(node(s)?, node(p)?, node(o)?)),
        _ => Err(GraphError::invalid(format!(
            "expected three terms, found {}: {}",
            parts.len(),
            text
        ))),
    }
}

/// Parse `;`-separated triples; empty entries are skipped
pub fn triples(text: &str) -> GraphResult<Vec<Triple>> {
    text.split(';')
        .filter(|part| !part.trim().is_empty())
        .map(triple)
        .collect()
}

/// New in-memory graph holding the given triples
pub fn graph_with(text: &str) -> GraphResult<RdfStore> {
    Ok(RdfStore::from_triples(triples(text)?))
}

/// Whitespace-separated terms; quoted literals may contain spaces
fn split_terms(text: &str) -> GraphResult<Vec<String>> {
    let mut terms = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    for c in text.chars() {
        match quote {
            Some(q) => {
                current.push(c);
                if c == q {
                    quote = None;
                }
            }
            None if c.is_whitespace() => {
                if !current.is_empty() {
                    terms.push(std::mem::take(&mut current));
                }
            }
            None => {
                if (c == '\'' || c == '"') && current.is_empty() {
                    quote = Some(c);
                }
                current.push(c);
            }
        }
    }
    if quote.is_some() {
        return Err(GraphError::invalid(format!("unterminated literal in: {}", text)));
    }
    if !current.is_empty() {
        terms.push(current);
    }
    Ok(terms)
}
