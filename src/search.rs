use nonmax::NonMaxUsize;

use crate::problems::grid::Action;
use crate::problems::grid::Cell;
use crate::problems::grid::Distance;
use crate::solution::Solution;

/// A handle to a `SearchNode` in a `SearchTree`.
///
/// `Option<SearchNodeIndex>` is as wide as the index itself.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SearchNodeIndex {
    index: NonMaxUsize,
}

impl SearchNodeIndex {
    #[inline(always)]
    fn new(index: usize) -> Option<Self> {
        Some(Self {
            index: NonMaxUsize::new(index)?,
        })
    }

    #[inline(always)]
    pub fn get(&self) -> usize {
        self.index.get()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchNode {
    /// The node this one was reached from, and how. `None` only for the root.
    pub(crate) parent: Option<(SearchNodeIndex, Action)>,
    pub(crate) cell: Cell,
    /// Distance to the goal, only computed by informed strategies.
    pub(crate) h: Option<Distance>,
}

impl SearchNode {
    pub fn root(cell: Cell, h: Option<Distance>) -> Self {
        Self {
            parent: None,
            cell,
            h,
        }
    }
    pub fn child(parent: SearchNodeIndex, action: Action, cell: Cell, h: Option<Distance>) -> Self {
        Self {
            parent: Some((parent, action)),
            cell,
            h,
        }
    }

    pub fn cell(&self) -> Cell {
        self.cell
    }
    pub fn parent(&self) -> Option<SearchNodeIndex> {
        self.parent.map(|(p, _)| p)
    }
    pub fn action(&self) -> Option<Action> {
        self.parent.map(|(_, a)| a)
    }
    pub fn h(&self) -> Option<Distance> {
        self.h
    }
}

/// All the nodes created during a search.
///
/// Parents are always pushed before their children, so following parent links
/// strictly decreases the index and can't cycle.
#[derive(Default)]
pub struct SearchTree {
    nodes: Vec<SearchNode>,
}

impl SearchTree {
    #[must_use]
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    pub fn push(&mut self, node: SearchNode) -> SearchNodeIndex {
        debug_assert!(
            node.parent().is_none_or(|p| p.get() < self.nodes.len()),
            "Parents must exist before their children"
        );
        let index = SearchNodeIndex::new(self.nodes.len())
            .expect("A Vec can't hold usize::MAX nodes");
        self.nodes.push(node);
        index
    }

    #[inline(always)]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline(always)]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SearchNode> {
        self.nodes.iter()
    }

    /// Walks the parent links back to the root.
    ///
    /// The root's cell is not part of the returned `Solution`.
    #[must_use]
    pub fn path(&self, mut node_index: SearchNodeIndex) -> Solution {
        let mut actions = vec![];
        let mut cells = vec![];

        while let Some((parent_index, a)) = self[node_index].parent {
            debug_assert!(parent_index.get() < node_index.get());
            actions.push(a);
            cells.push(self[node_index].cell);
            node_index = parent_index;
        }

        actions.reverse();
        cells.reverse();
        Solution::new(actions, cells)
    }
}

impl std::ops::Index<SearchNodeIndex> for SearchTree {
    type Output = SearchNode;

    #[inline(always)]
    fn index(&self, index: SearchNodeIndex) -> &Self::Output {
        &self.nodes[index.get()]
    }
}

impl std::fmt::Debug for SearchTree {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "SearchTree{{({} nodes)}}", self.len())
    }
}
