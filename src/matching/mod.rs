//! Graph isomorphism
//!
//! Two graphs are equal when some bijection between their blank nodes maps
//! one onto the other (RDF graph equality). Non-blank nodes compare
//! structurally. [`graph_hash_code`] is consistent with [`graphs_equal`]:
//! equal graphs always hash alike.

pub mod matcher;
mod statement;

pub use matcher::{GraphMatcher, DEFAULT_MAX_HASH_DEPTH};

use crate::graph::{Graph, GraphResult, Node};
use rustc_hash::FxHashMap;
use statement::{Slot, Statement, UNBOUND_SENTINEL};

/// Witnessing bijection `(blank in a, blank in b)`, or None when the graphs
/// are not isomorphic
pub fn match_graphs(a: &dyn Graph, b: &dyn Graph) -> GraphResult<Option<Vec<(Node, Node)>>> {
    GraphMatcher::new().match_graphs(a, b)
}

/// True iff the graphs are equal up to renaming of blank nodes
pub fn graphs_equal(a: &dyn Graph, b: &dyn Graph) -> GraphResult<bool> {
    if std::ptr::addr_eq(a as *const dyn Graph, b as *const dyn Graph) {
        a.check_open()?;
        return Ok(true);
    }
    GraphMatcher::new().equals(a, b)
}

/// Blank-node-insensitive hash of a graph: the sum of per-triple structural
/// hashes, with every blank node contributing the same sentinel
pub fn graph_hash_code(graph: &dyn Graph) -> GraphResult<u64> {
    let mut var_index = FxHashMap::default();
    let mut blanks = Vec::new();
    let mut hash = 0u64;
    for triple in graph.find_all()? {
        let statement = Statement::from_triple(&triple, &mut var_index, &mut blanks);
        let contribution = statement.hash_for(None, |slot| match slot {
            Slot::Fixed(_, h) => *h,
            Slot::Var(_) => UNBOUND_SENTINEL,
        });
        hash = hash.wrapping_add(contribution);
    }
    Ok(hash)
}
