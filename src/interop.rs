//! Conversions to and from oxrdf terms
//!
//! Lets parsers and serializers from the oxrdf ecosystem feed and drain
//! graphs. Variables, ANY, and triples whose predicate is not a URI have no
//! oxrdf counterpart and fail with [`GraphError::InvalidArgument`].

use crate::graph::{xsd, GraphError, GraphResult, LiteralLabel, Node, Triple};
use oxrdf::{
    BlankNode as OxBlankNode, Literal as OxLiteral, NamedNode as OxNamedNode, Subject as OxSubject,
    Term as OxTerm, Triple as OxTriple,
};

fn named(iri: &str) -> GraphResult<OxNamedNode> {
    OxNamedNode::new(iri).map_err(|e| GraphError::invalid(format!("invalid IRI {}: {}", iri, e)))
}

fn blank(label: &str) -> GraphResult<OxBlankNode> {
    OxBlankNode::new(label).map_err(|e| GraphError::invalid(format!("invalid blank node {}: {}", label, e)))
}

impl TryFrom<&OxLiteral> for LiteralLabel {
    type Error = GraphError;

    fn try_from(literal: &OxLiteral) -> GraphResult<Self> {
        if let Some(language) = literal.language() {
            return LiteralLabel::with_language(literal.value(), language);
        }
        let datatype = literal.datatype().as_str();
        if datatype == xsd::STRING {
            Ok(LiteralLabel::plain(literal.value()))
        } else {
            LiteralLabel::typed(literal.value(), datatype)
        }
    }
}

impl TryFrom<&LiteralLabel> for OxLiteral {
    type Error = GraphError;

    fn try_from(label: &LiteralLabel) -> GraphResult<Self> {
        let lexical = label.lexical_form();
        if let Some(language) = label.language() {
            return OxLiteral::new_language_tagged_literal(lexical, language)
                .map_err(|e| GraphError::invalid(format!("invalid language tag {}: {}", language, e)));
        }
        match label.datatype_uri() {
            Some(datatype) => Ok(OxLiteral::new_typed_literal(lexical, named(datatype)?)),
            None => Ok(OxLiteral::new_simple_literal(lexical)),
        }
    }
}

impl TryFrom<&OxTerm> for Node {
    type Error = GraphError;

    fn try_from(term: &OxTerm) -> GraphResult<Self> {
        match term {
            OxTerm::NamedNode(n) => Node::uri(n.as_str()),
            OxTerm::BlankNode(b) => Node::blank_with_label(b.as_str()),
            OxTerm::Literal(l) => Ok(Node::literal(LiteralLabel::try_from(l)?)),
            #[allow(unreachable_patterns)]
            _ => Err(GraphError::invalid("quoted triples are not supported")),
        }
    }
}

impl TryFrom<&OxSubject> for Node {
    type Error = GraphError;

    fn try_from(subject: &OxSubject) -> GraphResult<Self> {
        match subject {
            OxSubject::NamedNode(n) => Node::uri(n.as_str()),
            OxSubject::BlankNode(b) => Node::blank_with_label(b.as_str()),
            #[allow(unreachable_patterns)]
            _ => Err(GraphError::invalid("quoted triples are not supported")),
        }
    }
}

impl TryFrom<&Node> for OxTerm {
    type Error = GraphError;

    fn try_from(node: &Node) -> GraphResult<Self> {
        match node {
            Node::Uri(uri) => Ok(named(uri)?.into()),
            Node::Blank(id) => Ok(blank(id.label())?.into()),
            Node::Literal(label) => Ok(OxLiteral::try_from(label.as_ref())?.into()),
            other => Err(GraphError::invalid(format!("{} has no RDF term form", other))),
        }
    }
}

impl TryFrom<&OxTriple> for Triple {
    type Error = GraphError;

    fn try_from(triple: &OxTriple) -> GraphResult<Self> {
        Ok(Triple::new(
            Node::try_from(&triple.subject)?,
            Node::uri(triple.predicate.as_str())?,
            Node::try_from(&triple.object)?,
        ))
    }
}

impl TryFrom<&Triple> for OxTriple {
    type Error = GraphError;

    fn try_from(triple: &Triple) -> GraphResult<Self> {
        let subject: OxSubject = match triple.subject() {
            Node::Uri(uri) => named(uri)?.into(),
            Node::Blank(id) => blank(id.label())?.into(),
            other => return Err(GraphError::invalid(format!("{} cannot be a subject", other))),
        };
        let predicate = match triple.predicate() {
            Node::Uri(uri) => named(uri)?,
            other => return Err(GraphError::invalid(format!("{} cannot be a predicate", other))),
        };
        let object = OxTerm::try_from(triple.object())?;
        Ok(OxTriple::new(subject, predicate, object))
    }
}

/// Convert a batch of oxrdf triples, stopping at the first failure
pub fn from_oxrdf<'a, I>(triples: I) -> GraphResult<Vec<Triple>>
where
    I: IntoIterator<Item = &'a OxTriple>,
{
    triples.into_iter().map(Triple::try_from).collect()
}

/// Convert a batch of triples to oxrdf, stopping at the first failure
pub fn to_oxrdf<'a, I>(triples: I) -> GraphResult<Vec<OxTriple>>
where
    I: IntoIterator<Item = &'a Triple>,
{
    triples.into_iter().map(OxTriple::try_from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::shorthand::{node, triple};

    #[test]
    fn test_triple_to_oxrdf_and_back() {
        for text in [
            "eh:/a eh:/p eh:/b",
            "_x eh:/p 'chat'fr",
            "eh:/a eh:/p '42'xsd:int",
            "eh:/a eh:/p 'plain'",
        ] {
            let ours = triple(text).unwrap();
            let theirs = OxTriple::try_from(&ours).unwrap();
            assert_eq!(Triple::try_from(&theirs).unwrap(), ours, "{}", text);
        }
    }

    #[test]
    fn test_plain_literal_is_xsd_string() {
        let literal = OxLiteral::try_from(node("'x'").unwrap().get_literal().unwrap()).unwrap();
        assert_eq!(literal.datatype().as_str(), xsd::STRING);
    }

    #[test]
    fn test_unrepresentable_nodes() {
        assert!(OxTerm::try_from(&Node::ANY).is_err());
        assert!(OxTerm::try_from(&node("?v").unwrap()).is_err());
        let literal_predicate = triple("a 'p' b").unwrap();
        assert!(matches!(
            OxTriple::try_from(&literal_predicate),
            Err(GraphError::InvalidArgument(_))
        ));
        let literal_subject = triple("'s' p b").unwrap();
        assert!(OxTriple::try_from(&literal_subject).is_err());
    }
}
