//! Hooks for watching a search as it runs.

use rustc_hash::FxHashSet;

use crate::problems::grid::Cell;
use crate::problems::grid::Grid;
use crate::solution::Solution;

#[derive(Copy, Clone, Debug)]
pub enum SearchEvent<'a> {
    /// A node was taken out of the frontier.
    Expanded {
        cell: Cell,
        explored: &'a FxHashSet<Cell>,
    },
    /// The goal was taken out of the frontier. Sent once, right after its
    /// `Expanded` event.
    Solved { solution: &'a Solution },
}

pub trait SearchObserver {
    fn observe(&mut self, grid: &Grid, event: SearchEvent<'_>) -> std::io::Result<()>;
}

/// Ignores everything.
#[derive(Copy, Clone, Debug, Default)]
pub struct Headless;

impl SearchObserver for Headless {
    #[inline(always)]
    fn observe(&mut self, _grid: &Grid, _event: SearchEvent<'_>) -> std::io::Result<()> {
        Ok(())
    }
}
