//! Blank-node bijection search
//!
//! Both graphs are turned into a variable arena ([`Half`]). Variables are
//! bucketed by a structural hash that is refined a few rounds by folding in
//! the previous-round hashes of neighbouring variables. Singleton buckets
//! force bindings, and buckets of variables that share no statement with
//! another variable are paired up directly. Otherwise the smallest bucket is
//! guessed member by member, backtracking through an undo trail and an
//! explicit stack of choice points.

use super::statement::{mix, Slot, Statement, POSITION_BITS, UNBOUND_SENTINEL};
use crate::config::GraphConfig;
use crate::graph::{Graph, GraphError, GraphResult, Node, Triple};
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::BTreeMap;
use tracing::{debug, trace};

/// Default number of hash refinement rounds
pub const DEFAULT_MAX_HASH_DEPTH: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    A,
    B,
}

/// One position of a statement as seen from a variable being bound
#[derive(Debug, PartialEq, Eq, Hash)]
enum PosKey<'a> {
    /// Held by the variable itself
    Masked,
    Fixed(&'a Node),
    /// Held by a bound variable; identified by its pair
    Bound(usize),
    Unbound,
}

type WrapperKey<'a> = (u32, [PosKey<'a>; 3]);

/// One graph prepared for matching
struct Half {
    triples: FxHashSet<Triple>,
    blanks: Vec<Node>,
    statements: Vec<Statement>,
    /// Variable statements each variable occurs in
    occurs_in: Vec<Vec<usize>>,
    /// Whether a variable shares a statement with another variable
    has_friends: Vec<bool>,
    /// Partner on the other side
    bound: Vec<Option<usize>>,
    bound_hash: Vec<u64>,
    /// Per-variable hash at each refinement level
    hashes: Vec<Vec<u64>>,
    table: BTreeMap<u64, Vec<usize>>,
}

impl Half {
    fn new(triples: FxHashSet<Triple>, depth: usize) -> Self {
        let mut var_index = FxHashMap::default();
        let mut blanks = Vec::new();
        let statements: Vec<Statement> = triples
            .iter()
            .map(|t| Statement::from_triple(t, &mut var_index, &mut blanks))
            .collect();

        let mut occurs_in = vec![Vec::new(); blanks.len()];
        let mut has_friends = vec![false; blanks.len()];
        for (index, statement) in statements.iter().enumerate() {
            for &var in &statement.vars {
                occurs_in[var].push(index);
                if statement.vars.len() > 1 {
                    has_friends[var] = true;
                }
            }
        }

        let vars = blanks.len();
        Self {
            triples,
            blanks,
            statements,
            occurs_in,
            has_friends,
            bound: vec![None; vars],
            bound_hash: vec![0; vars],
            hashes: vec![vec![0; depth]; vars],
            table: BTreeMap::new(),
        }
    }

    fn fixed_statements(&self) -> impl Iterator<Item = &Statement> {
        self.statements.iter().filter(|s| s.is_fixed())
    }

    fn slot_hash(&self, slot: &Slot, level: usize) -> u64 {
        match *slot {
            Slot::Fixed(_, hash) => hash,
            Slot::Var(var) if self.bound[var].is_some() => self.bound_hash[var],
            Slot::Var(_) if level == 0 => UNBOUND_SENTINEL,
            Slot::Var(var) => self.hashes[var][level - 1],
        }
    }

    /// Checksum over fixed containment and variable statements at level 0;
    /// None when some fixed triple is missing from `other`
    fn prepare(&self, other: &Half) -> Option<u64> {
        let mut checksum = 0u64;
        for statement in &self.statements {
            if statement.is_fixed() {
                if !other.triples.contains(&fixed_triple(statement)?) {
                    return None;
                }
            } else {
                let first = statement.vars.first().copied();
                let hash = statement.hash_for(first, |slot| self.slot_hash(slot, 0));
                checksum = checksum.wrapping_add(hash);
            }
        }
        Some(checksum)
    }

    /// Recompute the hash of every unbound variable at `level` and rebuild
    /// the bucket table; returns a checksum of the table
    fn rehash(&mut self, level: usize) -> u64 {
        let fresh: Vec<(usize, u64)> = (0..self.blanks.len())
            .filter(|&var| self.bound[var].is_none())
            .map(|var| {
                let hash = self.occurs_in[var].iter().fold(0u64, |acc, &s| {
                    let statement = &self.statements[s];
                    acc.wrapping_add(statement.hash_for(Some(var), |slot| self.slot_hash(slot, level)))
                });
                (var, hash)
            })
            .collect();

        self.table.clear();
        for (var, hash) in fresh {
            self.hashes[var][level] = hash;
            self.table.entry(hash).or_default().push(var);
        }
        self.table.iter().fold(0u64, |acc, (hash, bucket)| {
            acc.wrapping_add((bucket.len() as u64).wrapping_mul(0x10001) ^ hash)
        })
    }

    fn pair_id(&self, var: usize, side: Side) -> Option<usize> {
        match side {
            Side::A => self.bound[var].map(|_| var),
            Side::B => self.bound[var],
        }
    }

    /// Exact description of `statement` relative to `var` under the current
    /// partial bijection
    fn wrapper_key<'a>(&'a self, statement: &'a Statement, var: usize, side: Side) -> WrapperKey<'a> {
        let mask = statement.var_pos(Some(var));
        let position = move |i: usize| {
            if mask & POSITION_BITS[i] != 0 {
                return PosKey::Masked;
            }
            match &statement.slots[i] {
                Slot::Fixed(node, _) => PosKey::Fixed(node),
                Slot::Var(other) => match self.pair_id(*other, side) {
                    Some(pair) => PosKey::Bound(pair),
                    None => PosKey::Unbound,
                },
            }
        };
        (mask, [position(0), position(1), position(2)])
    }
}

fn fixed_triple(statement: &Statement) -> Option<Triple> {
    let node = |slot: &Slot| match slot {
        Slot::Fixed(node, _) => Some(node.clone()),
        Slot::Var(_) => None,
    };
    let [s, p, o] = &statement.slots;
    Some(Triple::new(node(s)?, node(p)?, node(o)?))
}

/// Outcome of settling one search level
enum Step {
    /// Every variable is bound
    Solved,
    /// The partial bijection cannot be completed
    Dead,
    /// Guess a partner for `x` among `candidates`
    Branch { x: usize, candidates: Vec<usize> },
}

/// Choice point on the search stack
struct Frame {
    /// Trail length before this level's forced bindings
    mark: usize,
    /// Trail length before the current guess
    guess_mark: usize,
    x: usize,
    candidates: Vec<usize>,
    /// Next candidate to try
    next: usize,
}

/// Search state for one pair of graphs
struct Search {
    a: Half,
    b: Half,
    depth: usize,
    /// A-side variables in binding order
    trail: Vec<usize>,
    guesses: u64,
}

impl Search {
    /// Variable `x` of A may be bound to `y` of B: their statements agree
    /// exactly, counting multiplicity
    fn check_binding(&self, x: usize, y: usize) -> bool {
        let ours = &self.a.occurs_in[x];
        let theirs = &self.b.occurs_in[y];
        if ours.len() != theirs.len() {
            return false;
        }
        let mut counts: FxHashMap<WrapperKey<'_>, i64> = FxHashMap::default();
        for &s in ours {
            *counts
                .entry(self.a.wrapper_key(&self.a.statements[s], x, Side::A))
                .or_default() += 1;
        }
        for &s in theirs {
            let key = self.b.wrapper_key(&self.b.statements[s], y, Side::B);
            match counts.get_mut(&key) {
                Some(count) if *count > 0 => *count -= 1,
                _ => return false,
            }
        }
        true
    }

    fn bind(&mut self, x: usize, y: usize) {
        let hash = mix(self.trail.len() as u64);
        self.a.bound[x] = Some(y);
        self.b.bound[y] = Some(x);
        self.a.bound_hash[x] = hash;
        self.b.bound_hash[y] = hash;
        self.trail.push(x);
    }

    fn unwind(&mut self, mark: usize) {
        while self.trail.len() > mark {
            let Some(x) = self.trail.pop() else { break };
            if let Some(y) = self.a.bound[x].take() {
                self.b.bound[y] = None;
            }
        }
    }

    /// Bind everything forced by singleton buckets, refining hashes while
    /// that can still split buckets. Leaves both tables current. Returns
    /// false on contradiction; the caller unwinds.
    fn oblig_bindings(&mut self) -> bool {
        let mut level = 0;
        loop {
            if self.a.rehash(level) != self.b.rehash(level) {
                return false;
            }

            let mut refinable = false;
            let mut singles = Vec::new();
            for (&hash, bucket) in &self.a.table {
                if bucket.len() == 1 {
                    singles.push((hash, bucket[0]));
                } else if !refinable {
                    refinable = bucket.iter().any(|&v| self.a.has_friends[v]);
                }
            }

            let new_binding = !singles.is_empty();
            for (hash, x) in singles {
                let y = match self.b.table.get(&hash).map(Vec::as_slice) {
                    Some([y]) => *y,
                    _ => return false,
                };
                if !self.check_binding(x, y) {
                    return false;
                }
                self.bind(x, y);
            }

            level = if new_binding { 0 } else { level + 1 };
            if level >= self.depth || !(refinable || new_binding) {
                return true;
            }
        }
    }

    /// Pair up every bucket whose variables share no statement with another
    /// variable. Between such variables `check_binding` is an equivalence,
    /// so any compatible pairing is final. None when there is no such
    /// bucket, Some(false) on contradiction.
    fn bind_friendless(&mut self) -> Option<bool> {
        let buckets: Vec<(Vec<usize>, Vec<usize>)> = self
            .a
            .table
            .iter()
            .filter(|(_, bucket)| bucket.iter().all(|&x| !self.a.has_friends[x]))
            .map(|(hash, bucket)| (bucket.clone(), self.b.table.get(hash).cloned().unwrap_or_default()))
            .collect();
        if buckets.is_empty() {
            return None;
        }
        for (ours, mut free) in buckets {
            if ours.len() != free.len() {
                return Some(false);
            }
            for x in ours {
                let Some(at) = free.iter().position(|&y| self.check_binding(x, y)) else {
                    return Some(false);
                };
                let y = free.swap_remove(at);
                self.bind(x, y);
            }
        }
        Some(true)
    }

    /// Apply every binding that needs no guess and pick the next choice point
    fn settle(&mut self) -> Step {
        loop {
            if !self.oblig_bindings() {
                return Step::Dead;
            }
            match self.bind_friendless() {
                Some(true) => continue,
                Some(false) => return Step::Dead,
                None => {}
            }
            let Some((hash, bucket)) = self.a.table.iter().min_by_key(|(_, bucket)| bucket.len()) else {
                return Step::Solved;
            };
            return match self.b.table.get(hash).filter(|other| other.len() == bucket.len()) {
                Some(candidates) => Step::Branch {
                    x: bucket[0],
                    candidates: candidates.clone(),
                },
                None => Step::Dead,
            };
        }
    }

    /// Depth-first search over guesses, driven by an explicit stack of
    /// choice points so deep searches do not grow the call stack
    fn search(&mut self) -> bool {
        let mut stack: Vec<Frame> = Vec::new();
        let mut mark = self.trail.len();
        loop {
            match self.settle() {
                Step::Solved => return true,
                Step::Dead => self.unwind(mark),
                Step::Branch { x, candidates } => stack.push(Frame {
                    mark,
                    guess_mark: self.trail.len(),
                    x,
                    candidates,
                    next: 0,
                }),
            }

            // Advance the innermost choice point to its next viable guess
            let (x, y) = loop {
                let Some(frame) = stack.last_mut() else {
                    return false;
                };
                let x = frame.x;
                if frame.next > 0 {
                    trace!("backtrack on {}", self.a.blanks[x]);
                }
                self.unwind(frame.guess_mark);
                let viable = frame.candidates[frame.next..]
                    .iter()
                    .position(|&y| self.check_binding(x, y));
                match viable {
                    Some(offset) => {
                        let y = frame.candidates[frame.next + offset];
                        frame.next += offset + 1;
                        break (x, y);
                    }
                    None => {
                        let exhausted = frame.mark;
                        stack.pop();
                        self.unwind(exhausted);
                    }
                }
            };

            self.guesses += 1;
            trace!("guess {} = {}", self.a.blanks[x], self.b.blanks[y]);
            self.bind(x, y);
            mark = self.trail.len();
        }
    }

    /// Every A triple mapped through the bijection is a B triple
    fn verify(&self) -> bool {
        let images: FxHashMap<&Node, &Node> = self
            .a
            .blanks
            .iter()
            .enumerate()
            .filter_map(|(x, blank)| Some((blank, &self.b.blanks[self.a.bound[x]?])))
            .collect();
        let map = |node: &Node| -> Option<Node> {
            if node.is_blank() {
                images.get(node).map(|image| (*image).clone())
            } else {
                Some(node.clone())
            }
        };
        self.a.triples.iter().all(|t| {
            match (map(t.subject()), map(t.predicate()), map(t.object())) {
                (Some(s), Some(p), Some(o)) => self.b.triples.contains(&Triple::new(s, p, o)),
                _ => false,
            }
        })
    }

    fn bijection(&self) -> GraphResult<Vec<(Node, Node)>> {
        (0..self.a.blanks.len())
            .map(|x| match self.a.bound[x] {
                Some(y) => Ok((self.a.blanks[x].clone(), self.b.blanks[y].clone())),
                None => Err(GraphError::InvariantViolation(format!(
                    "blank node {} left unbound after a successful match",
                    self.a.blanks[x]
                ))),
            })
            .collect()
    }
}

/// Graph isomorphism matcher
#[derive(Debug, Clone, Copy)]
pub struct GraphMatcher {
    max_hash_depth: usize,
}

impl Default for GraphMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphMatcher {
    pub fn new() -> Self {
        Self {
            max_hash_depth: DEFAULT_MAX_HASH_DEPTH,
        }
    }

    /// Matcher running `depth` refinement rounds; 0 is treated as 1
    pub fn with_max_hash_depth(depth: usize) -> Self {
        Self {
            max_hash_depth: depth.max(1),
        }
    }

    pub fn from_config(config: &GraphConfig) -> Self {
        Self::with_max_hash_depth(config.max_hash_depth)
    }

    pub fn max_hash_depth(&self) -> usize {
        self.max_hash_depth
    }

    /// A bijection from the blank nodes of `a` to those of `b` under which
    /// the graphs are equal, or None when they are not isomorphic
    pub fn match_graphs(&self, a: &dyn Graph, b: &dyn Graph) -> GraphResult<Option<Vec<(Node, Node)>>> {
        let caps_a = a.capabilities();
        let caps_b = b.capabilities();
        if caps_a.size_accurate && caps_b.size_accurate && a.size()? != b.size()? {
            debug!("graphs differ in size");
            return Ok(None);
        }

        let triples_a: FxHashSet<Triple> = a.find_all()?.collect();
        let triples_b: FxHashSet<Triple> = b.find_all()?.collect();
        if triples_a.len() != triples_b.len() {
            return Ok(None);
        }

        let mut search = Search {
            a: Half::new(triples_a, self.max_hash_depth),
            b: Half::new(triples_b, self.max_hash_depth),
            depth: self.max_hash_depth,
            trail: Vec::new(),
            guesses: 0,
        };
        if search.a.blanks.len() != search.b.blanks.len() {
            debug!("graphs differ in blank node count");
            return Ok(None);
        }
        let fixed_a = search.a.fixed_statements().count();
        let fixed_b = search.b.fixed_statements().count();
        if fixed_a != fixed_b {
            return Ok(None);
        }

        let prepared = (search.a.prepare(&search.b), search.b.prepare(&search.a));
        match prepared {
            (Some(ha), Some(hb)) if ha == hb => {}
            _ => {
                debug!("fixed triples or statement shapes differ");
                return Ok(None);
            }
        }

        if !search.search() {
            debug!("no bijection found after {} guesses", search.guesses);
            return Ok(None);
        }
        if !search.verify() {
            return Err(GraphError::InvariantViolation(
                "matched bijection does not map the graphs onto each other".to_string(),
            ));
        }
        debug!(
            "graphs isomorphic: {} blank nodes bound, {} guesses",
            search.trail.len(),
            search.guesses
        );
        search.bijection().map(Some)
    }

    pub fn equals(&self, a: &dyn Graph, b: &dyn Graph) -> GraphResult<bool> {
        Ok(self.match_graphs(a, b)?.is_some())
    }
}
