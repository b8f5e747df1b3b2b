use std::time::Duration;

use derive_more::Display;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::SeedableRng;

use crate::frontier::Frontier;
use crate::frontier::GreedyFrontier;
use crate::frontier::QueueFrontier;
use crate::frontier::StackFrontier;
use crate::problems::grid::Action;
use crate::problems::grid::Cell;
use crate::problems::grid::Distance;
use crate::problems::grid::Grid;

#[derive(Copy, Clone, Debug, Default, Display, PartialEq, Eq, clap::ValueEnum)]
pub enum Strategy {
    /// Uninformed, FIFO frontier. Finds shortest paths.
    #[default]
    #[display("breadth-first")]
    #[value(name = "bfs")]
    BreadthFirst,
    /// Uninformed, LIFO frontier.
    #[display("depth-first")]
    #[value(name = "dfs")]
    DepthFirst,
    /// Expands the node closest to the goal first. Not optimal.
    #[display("greedy best-first")]
    #[value(name = "greedy")]
    GreedyBestFirst,
}

impl Strategy {
    pub fn frontier(&self) -> Box<dyn Frontier> {
        match self {
            Strategy::BreadthFirst => Box::new(QueueFrontier::new()),
            Strategy::DepthFirst => Box::new(StackFrontier::new()),
            Strategy::GreedyBestFirst => Box::new(GreedyFrontier::new()),
        }
    }

    pub fn is_informed(&self) -> bool {
        matches!(self, Strategy::GreedyBestFirst)
    }

    /// The heuristic stored in nodes for `cell`, if this strategy uses one.
    #[inline(always)]
    pub fn h(&self, grid: &Grid, cell: &Cell) -> Option<Distance> {
        self.is_informed().then(|| grid.manhattan_distance(cell))
    }

    /// Pause between animation frames.
    pub fn default_delay(&self) -> Duration {
        match self {
            Strategy::BreadthFirst | Strategy::DepthFirst => Duration::from_millis(10),
            Strategy::GreedyBestFirst => Duration::from_millis(100),
        }
    }
}

/// The order in which a node's neighbours are pushed to the frontier.
#[derive(Clone, Debug, Default)]
pub enum NeighbourOrder {
    /// Always [`Action::ALL`] order.
    #[default]
    Fixed,
    Shuffled(ChaCha8Rng),
}

impl NeighbourOrder {
    /// Reproducible shuffling.
    pub fn seeded(seed: u64) -> Self {
        NeighbourOrder::Shuffled(ChaCha8Rng::seed_from_u64(seed))
    }

    /// Shuffling seeded from the thread-local generator.
    pub fn random() -> Self {
        NeighbourOrder::Shuffled(ChaCha8Rng::from_rng(&mut rand::rng()))
    }

    #[inline(always)]
    pub fn arrange(&mut self, neighbours: &mut [(Action, Cell)]) {
        if let NeighbourOrder::Shuffled(rng) = self {
            neighbours.shuffle(rng);
        }
    }
}
