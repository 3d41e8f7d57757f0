use samyama_rdf::graph::shorthand::{graph_with, node, triple, triples};
use samyama_rdf::graph::{xsd, Graph, GraphError, Node, RdfStore, ReadOnlyGraph, Triple, TriplePattern};
use std::collections::HashSet;

fn all(g: &dyn Graph) -> HashSet<Triple> {
    g.find_all().unwrap().collect()
}

#[test]
fn test_add_is_idempotent() {
    let mut g = RdfStore::new();
    let t = triple("a p b").unwrap();
    g.add(t.clone()).unwrap();
    let once = all(&g);
    g.add(t).unwrap();
    assert_eq!(g.size().unwrap(), 1);
    assert_eq!(all(&g), once);
}

#[test]
fn test_delete_restores_prior_state() {
    let mut g = graph_with("a p b; c q d").unwrap();
    let before = all(&g);
    let t = triple("x r y").unwrap();
    g.add(t.clone()).unwrap();
    g.delete(&t).unwrap();
    assert_eq!(all(&g), before);
    // Deleting an absent triple is a no-op
    g.delete(&t).unwrap();
    assert_eq!(g.size().unwrap(), 2);
}

#[test]
fn test_add_three_delete_one() {
    let mut g = RdfStore::new();
    let ts = triples("a p b; a p c; b q c").unwrap();
    g.add_all(ts.clone()).unwrap();
    g.delete(&ts[1]).unwrap();

    assert_eq!(g.size().unwrap(), 2);
    let remaining = all(&g);
    assert_eq!(remaining, HashSet::from([ts[0].clone(), ts[2].clone()]));
}

#[test]
fn test_size_matches_distinct_find_all() {
    let mut g = RdfStore::new();
    for text in ["a p b", "a p b", "b p c", "c p a", "a p b"] {
        g.add(triple(text).unwrap()).unwrap();
    }
    g.delete(&triple("b p c").unwrap()).unwrap();
    g.add(triple("b p c").unwrap()).unwrap();
    g.add(triple("d p e").unwrap()).unwrap();
    g.delete(&triple("c p a").unwrap()).unwrap();

    assert_eq!(g.size().unwrap(), all(&g).len());
    assert_eq!(g.size().unwrap(), g.find_all().unwrap().count());
}

#[test]
fn test_find_contains_consistency() {
    let g = graph_with("a p b; a q 'x'; b p _c; _c r 17; d p 'chat'fr").unwrap();
    let positions = [
        "??", "a", "b", "p", "q", "_c", "'x'", "17", "'017'xsd:int", "'chat'FR", "zzz",
    ];
    for s in positions {
        for p in positions {
            for o in positions {
                let pattern = TriplePattern::new(node(s).unwrap(), node(p).unwrap(), node(o).unwrap());
                let found = g.find(&pattern).unwrap().count();
                assert_eq!(
                    g.contains_pattern(&pattern).unwrap(),
                    found > 0,
                    "pattern {}",
                    pattern
                );
                // Every returned triple really matches
                for t in g.find(&pattern).unwrap() {
                    assert!(pattern.matches(&t));
                }
                // And nothing matching is missed
                let naive = all(&g).iter().filter(|t| pattern.matches(t)).count();
                assert_eq!(found, naive, "pattern {}", pattern);
            }
        }
    }
}

#[test]
fn test_contains_by_literal_value() {
    let g = RdfStore::from_triples(vec![Triple::new(
        Node::uri("urn:a").unwrap(),
        Node::uri("urn:p").unwrap(),
        Node::typed_literal("1", xsd::INTEGER).unwrap(),
    )]);
    let one_int = Node::typed_literal("1", xsd::INT).unwrap();
    assert!(g.contains(&Node::uri("urn:a").unwrap(), &Node::ANY, &one_int).unwrap());

    let two_int = Node::typed_literal("2", xsd::INT).unwrap();
    assert!(!g.contains(&Node::uri("urn:a").unwrap(), &Node::ANY, &two_int).unwrap());

    let one_string = Node::plain_literal("1");
    assert!(!g.contains(&Node::ANY, &Node::ANY, &one_string).unwrap());
}

#[test]
fn test_find_all_wildcard_and_fully_bound() {
    let g = graph_with("a p b; a p c").unwrap();
    assert_eq!(g.find_spo(&Node::ANY, &Node::ANY, &Node::ANY).unwrap().count(), 2);

    let t = triple("a p c").unwrap();
    let found: Vec<Triple> = g.find(&TriplePattern::from(&t)).unwrap().collect();
    assert_eq!(found, vec![t]);
    assert!(!g.contains_triple(&triple("a p d").unwrap()).unwrap());
}

#[test]
fn test_clear_and_remove() {
    let mut g = graph_with("a p b; a p c; a q c; b p c").unwrap();
    g.remove(&node("a").unwrap(), &node("p").unwrap(), &Node::ANY).unwrap();
    assert_eq!(g.size().unwrap(), 2);
    assert!(!g.contains(&node("a").unwrap(), &node("p").unwrap(), &Node::ANY).unwrap());

    g.clear().unwrap();
    assert!(g.is_empty().unwrap());
    assert_eq!(g.find_all().unwrap().count(), 0);
}

#[test]
fn test_list_nodes() {
    let g = graph_with("a p b; a q c; d p b").unwrap();
    let subjects = g.list_subjects(&TriplePattern::any()).unwrap();
    assert_eq!(subjects.len(), 2);

    let objects_of_p = g
        .list_objects(&TriplePattern::new(Node::ANY, node("p").unwrap(), Node::ANY))
        .unwrap();
    assert_eq!(objects_of_p, vec![node("b").unwrap()]);

    let predicates = g.list_predicates(&TriplePattern::any()).unwrap();
    assert_eq!(predicates.len(), 2);

    assert!(g.contains_node(&node("c").unwrap()).unwrap());
    assert!(g.contains_node(&node("q").unwrap()).unwrap());
    assert!(!g.contains_node(&node("z").unwrap()).unwrap());
}

#[test]
fn test_bulk_variants() {
    let mut g = RdfStore::new();
    let ts = triples("a p b; b p c").unwrap();
    g.add_slice(&ts).unwrap();
    assert_eq!(g.size().unwrap(), 2);

    let other = graph_with("c p d; a p b").unwrap();
    g.add_graph(&other).unwrap();
    assert_eq!(g.size().unwrap(), 3);

    g.delete_graph(&other).unwrap();
    assert_eq!(all(&g), HashSet::from([triple("b p c").unwrap()]));

    g.delete_all(triples("b p c").unwrap()).unwrap();
    assert!(g.is_empty().unwrap());
}

#[test]
fn test_bulk_add_on_read_only_graph() {
    let mut inner = RdfStore::new();
    inner.add(triple("a p b").unwrap()).unwrap();
    let mut view = ReadOnlyGraph::new(inner);
    let err = view.add_slice(&triples("x p y").unwrap()).unwrap_err();
    assert!(matches!(err, GraphError::UnsupportedOperation(_)));
    assert_eq!(view.size().unwrap(), 1);
}

#[test]
fn test_variables_in_patterns_match_exactly() {
    let mut g = RdfStore::new();
    g.add(triple("?x p b").unwrap()).unwrap();
    g.add(triple("a p b").unwrap()).unwrap();
    let found: Vec<Triple> = g
        .find(&TriplePattern::new(node("?x").unwrap(), Node::ANY, Node::ANY))
        .unwrap()
        .collect();
    assert_eq!(found, vec![triple("?x p b").unwrap()]);
}

#[test]
fn test_closed_graph_fails_loudly() {
    let mut g = graph_with("a p b").unwrap();
    g.close();
    assert!(g.is_closed());
    assert_eq!(g.size(), Err(GraphError::Closed));
    assert_eq!(g.contains_triple(&triple("a p b").unwrap()), Err(GraphError::Closed));
    assert_eq!(g.delete(&triple("a p b").unwrap()), Err(GraphError::Closed));
    assert!(g.find_all().is_err());
}

#[test]
fn test_capabilities() {
    let g = RdfStore::new();
    let caps = g.capabilities();
    assert!(caps.add_allowed && caps.delete_allowed);
    assert!(caps.size_accurate && caps.can_be_empty);
    assert!(caps.handles_literal_typing);
}
