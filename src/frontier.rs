//! Discovered-but-unexpanded search nodes.
//!
//! All frontiers shadow their contents in a `FxHashSet<Cell>` so the solver can
//! ask whether a cell is already queued without scanning.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::collections::VecDeque;
use std::fmt::Debug;

use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::problems::grid::Cell;
use crate::problems::grid::Distance;
use crate::search::SearchNodeIndex;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FrontierEntry {
    /// The node in the `SearchTree`.
    pub node: SearchNodeIndex,
    pub cell: Cell,
    pub h: Option<Distance>,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Empty frontier")]
pub struct EmptyFrontier;

pub trait Frontier: Debug {
    /// Queues a node. Its cell must not be in the frontier already.
    fn add(&mut self, entry: FrontierEntry);
    /// Takes the next node out according to the frontier's policy.
    fn remove(&mut self) -> Result<FrontierEntry, EmptyFrontier>;
    fn len(&self) -> usize;
    fn contains_state(&self, cell: &Cell) -> bool;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Last in, first out.
#[derive(Debug, Default)]
pub struct StackFrontier {
    stack: Vec<FrontierEntry>,
    cells: FxHashSet<Cell>,
}

impl StackFrontier {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline(always)]
    #[cfg(not(feature = "verify"))]
    fn verify(&self) {}
    #[inline(always)]
    #[cfg(feature = "verify")]
    fn verify(&self) {
        verify_shadow(self.stack.iter(), &self.cells);
    }
}

impl Frontier for StackFrontier {
    fn add(&mut self, entry: FrontierEntry) {
        let fresh = self.cells.insert(entry.cell);
        debug_assert!(fresh, "{} is already in the frontier", entry.cell);
        self.stack.push(entry);
        self.verify();
    }

    fn remove(&mut self) -> Result<FrontierEntry, EmptyFrontier> {
        let entry = self.stack.pop().ok_or(EmptyFrontier)?;
        self.cells.remove(&entry.cell);
        self.verify();
        Ok(entry)
    }

    fn len(&self) -> usize {
        self.stack.len()
    }

    fn contains_state(&self, cell: &Cell) -> bool {
        self.cells.contains(cell)
    }
}

/// First in, first out.
#[derive(Debug, Default)]
pub struct QueueFrontier {
    queue: VecDeque<FrontierEntry>,
    cells: FxHashSet<Cell>,
}

impl QueueFrontier {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline(always)]
    #[cfg(not(feature = "verify"))]
    fn verify(&self) {}
    #[inline(always)]
    #[cfg(feature = "verify")]
    fn verify(&self) {
        verify_shadow(self.queue.iter(), &self.cells);
    }
}

impl Frontier for QueueFrontier {
    fn add(&mut self, entry: FrontierEntry) {
        let fresh = self.cells.insert(entry.cell);
        debug_assert!(fresh, "{} is already in the frontier", entry.cell);
        self.queue.push_back(entry);
        self.verify();
    }

    fn remove(&mut self) -> Result<FrontierEntry, EmptyFrontier> {
        let entry = self.queue.pop_front().ok_or(EmptyFrontier)?;
        self.cells.remove(&entry.cell);
        self.verify();
        Ok(entry)
    }

    fn len(&self) -> usize {
        self.queue.len()
    }

    fn contains_state(&self, cell: &Cell) -> bool {
        self.cells.contains(cell)
    }
}

/// The ranking tuple for greedy best-first search
///
/// We prefer lower h, and tie break on insertion order so equally promising
/// nodes come out first-in-first-out.
///
/// ```
/// use maze_search::frontier::GreedyRank;
///
/// assert!(GreedyRank::new(1, 7) < GreedyRank::new(2, 0));
/// assert!(GreedyRank::new(2, 0) < GreedyRank::new(2, 1));
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct GreedyRank {
    h: Distance,
    order: u64,
}

impl GreedyRank {
    pub fn new(h: Distance, order: u64) -> Self {
        Self { h, order }
    }
}

#[derive(Debug)]
struct GreedyHeapNode {
    rank: GreedyRank,
    entry: FrontierEntry,
}

impl PartialEq for GreedyHeapNode {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        self.rank.eq(&other.rank)
    }
}
impl Eq for GreedyHeapNode {}

impl PartialOrd for GreedyHeapNode {
    #[inline(always)]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for GreedyHeapNode {
    #[inline(always)]
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.rank.cmp(&other.rank)
    }
}

/// Smallest heuristic first.
///
/// Entries without a heuristic rank last.
#[derive(Debug, Default)]
pub struct GreedyFrontier {
    heap: BinaryHeap<Reverse<GreedyHeapNode>>,
    cells: FxHashSet<Cell>,
    pushed: u64,
}

impl GreedyFrontier {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline(always)]
    #[cfg(not(feature = "verify"))]
    fn verify(&self) {}
    #[inline(always)]
    #[cfg(feature = "verify")]
    fn verify(&self) {
        verify_shadow(self.heap.iter().map(|Reverse(n)| &n.entry), &self.cells);
    }
}

impl Frontier for GreedyFrontier {
    fn add(&mut self, entry: FrontierEntry) {
        let fresh = self.cells.insert(entry.cell);
        debug_assert!(fresh, "{} is already in the frontier", entry.cell);
        debug_assert!(entry.h.is_some(), "Greedy search needs a heuristic");

        let rank = GreedyRank::new(entry.h.unwrap_or(Distance::MAX), self.pushed);
        self.pushed += 1;
        self.heap.push(Reverse(GreedyHeapNode { rank, entry }));
        self.verify();
    }

    fn remove(&mut self) -> Result<FrontierEntry, EmptyFrontier> {
        let Reverse(node) = self.heap.pop().ok_or(EmptyFrontier)?;
        self.cells.remove(&node.entry.cell);
        self.verify();
        Ok(node.entry)
    }

    fn len(&self) -> usize {
        self.heap.len()
    }

    fn contains_state(&self, cell: &Cell) -> bool {
        self.cells.contains(cell)
    }
}

#[cfg(feature = "verify")]
fn verify_shadow<'a>(entries: impl Iterator<Item = &'a FrontierEntry>, cells: &FxHashSet<Cell>) {
    let mut seen = 0usize;
    for e in entries {
        assert!(cells.contains(&e.cell), "{} is not indexed", e.cell);
        seen += 1;
    }
    assert_eq!(seen, cells.len(), "A cell is queued twice");
}
