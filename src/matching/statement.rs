//! Triples seen by the isomorphism engine
//!
//! Every blank node of a graph becomes a variable (an index into the graph's
//! variable arena); every other node is fixed. A [`Statement`] is a triple
//! whose positions are either fixed nodes or variables, and it can hash
//! itself relative to one of its variables.

use crate::graph::{Node, Triple};
use rustc_hash::{FxHashMap, FxHasher};
use std::hash::{Hash, Hasher};

/// Hash of an unbound variable before any refinement
pub(crate) const UNBOUND_SENTINEL: u64 = 0xcafe_babe;

/// Per-position multipliers for subject, predicate, object
const MULTIPLIERS: [u64; 3] = [0x101, 0x3f, 0x41];

/// Mask bits covering each position in a variable-position mask.
///
/// A variable at position `i` sets bit `2i` when it occurs only there and
/// bit `2i + 1` when it also occurs elsewhere in the same triple.
pub(crate) const POSITION_BITS: [u32; 3] = [0b11, 0b1100, 0b11_0000];

/// Structural hash of a node, stable across runs
pub(crate) fn node_hash(node: &Node) -> u64 {
    let mut hasher = FxHasher::default();
    node.hash(&mut hasher);
    hasher.finish()
}

#[derive(Debug, Clone)]
pub(crate) enum Slot {
    /// Non-blank node with its precomputed hash
    Fixed(Node, u64),
    /// Index of a blank-node variable
    Var(usize),
}

#[derive(Debug, Clone)]
pub(crate) struct Statement {
    pub(crate) slots: [Slot; 3],
    /// Distinct variables, in order of first occurrence
    pub(crate) vars: Vec<usize>,
}

impl Statement {
    /// Build a statement, allocating variable indexes for unseen blank nodes
    pub(crate) fn from_triple(
        triple: &Triple,
        var_index: &mut FxHashMap<Node, usize>,
        blanks: &mut Vec<Node>,
    ) -> Self {
        let mut vars = Vec::new();
        let slots = triple.nodes().map(|node| {
            if node.is_blank() {
                let var = *var_index.entry(node.clone()).or_insert_with(|| {
                    blanks.push(node.clone());
                    blanks.len() - 1
                });
                if !vars.contains(&var) {
                    vars.push(var);
                }
                Slot::Var(var)
            } else {
                Slot::Fixed(node.clone(), node_hash(node))
            }
        });
        Self { slots, vars }
    }

    pub(crate) fn is_fixed(&self) -> bool {
        self.vars.is_empty()
    }

    /// Positions of `var` encoded as a mask; 0 when `var` is None
    pub(crate) fn var_pos(&self, var: Option<usize>) -> u32 {
        let Some(var) = var else { return 0 };
        let held = |i: &usize| matches!(self.slots[*i], Slot::Var(v) if v == var);
        let bit = if (0..3).filter(held).count() == 1 { 1 } else { 2 };
        (0..3).filter(held).fold(0, |mask, i| mask | (bit << (2 * i)))
    }

    /// Hash of this statement as seen from `var`: positions held by `var`
    /// are encoded only through the mask, every other position contributes
    /// `slot_hash` scaled by its positional multiplier.
    pub(crate) fn hash_for(&self, var: Option<usize>, slot_hash: impl Fn(&Slot) -> u64) -> u64 {
        let mask = self.var_pos(var);
        let mut hash = mask as u64;
        for (i, slot) in self.slots.iter().enumerate() {
            if mask & POSITION_BITS[i] == 0 {
                hash ^= slot_hash(slot).wrapping_mul(MULTIPLIERS[i]);
            }
        }
        hash
    }
}

/// splitmix64 finalizer; spreads small sequence numbers over the whole range
pub(crate) fn mix(seed: u64) -> u64 {
    let mut z = seed.wrapping_add(0x9e37_79b9_7f4a_7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(s: &str, p: &str, o: &str) -> (Statement, Vec<Node>) {
        let node = |t: &str| match t.strip_prefix('_') {
            Some(label) => Node::blank_with_label(label).unwrap(),
            None => Node::uri(&format!("eh:/{}", t)).unwrap(),
        };
        let mut index = FxHashMap::default();
        let mut blanks = Vec::new();
        let st = Statement::from_triple(&Triple::new(node(s), node(p), node(o)), &mut index, &mut blanks);
        (st, blanks)
    }

    #[test]
    fn test_fixed_statement() {
        let (st, blanks) = build("a", "p", "b");
        assert!(st.is_fixed());
        assert!(blanks.is_empty());
        assert_eq!(st.var_pos(None), 0);
    }

    #[test]
    fn test_var_pos_masks() {
        let (st, _) = build("_x", "p", "_y");
        assert_eq!(st.vars, vec![0, 1]);
        assert_eq!(st.var_pos(Some(0)), 0b1);
        assert_eq!(st.var_pos(Some(1)), 0b1_0000);

        let (st, _) = build("_x", "p", "_x");
        assert_eq!(st.vars, vec![0]);
        assert_eq!(st.var_pos(Some(0)), 0b10_0010);
    }

    #[test]
    fn test_hash_ignores_blank_labels() {
        let sentinel = |slot: &Slot| match slot {
            Slot::Fixed(_, h) => *h,
            Slot::Var(_) => UNBOUND_SENTINEL,
        };
        let (a, _) = build("_x", "p", "_y");
        let (b, _) = build("_q", "p", "_r");
        assert_eq!(a.hash_for(None, sentinel), b.hash_for(None, sentinel));
        assert_eq!(a.hash_for(Some(0), sentinel), b.hash_for(Some(0), sentinel));

        let (c, _) = build("_x", "p", "_x");
        assert_ne!(a.hash_for(Some(0), sentinel), c.hash_for(Some(0), sentinel));
    }

    #[test]
    fn test_mix_spreads() {
        assert_ne!(mix(0), mix(1));
        assert_eq!(mix(7), mix(7));
    }
}
