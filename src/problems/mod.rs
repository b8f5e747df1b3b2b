//! Search spaces the solver runs on.
//!
//! A maze is a 2D grid of open and wall cells with one start and one goal.
//! Moves are the four axis-aligned steps between open cells.

pub mod grid;
