//! Implementation of the maze search algorithms.
//!
//! One search loop drives every strategy. A `Strategy` only picks the frontier
//! and whether nodes carry a heuristic.

pub mod solver;
pub mod strategy;
