#![no_main]

use libfuzzer_sys::fuzz_target;

use maze_search::algorithms::solver::SolveError;
use maze_search::algorithms::solver::Solver;
use maze_search::algorithms::strategy::NeighbourOrder;
use maze_search::algorithms::strategy::Strategy;
use maze_search::observer::Headless;
use maze_search::problems::grid::Grid;

fuzz_target!(|text: &str| {
    let Ok(grid) = Grid::try_from(text) else {
        return;
    };
    let (height, width) = grid.dimensions();
    for strategy in [
        Strategy::BreadthFirst,
        Strategy::DepthFirst,
        Strategy::GreedyBestFirst,
    ] {
        let mut solver = Solver::new(&grid, strategy, NeighbourOrder::seeded(0));
        match solver.solve(&mut Headless) {
            Ok(solution) => assert!(solution.replay(&grid)),
            Err(SolveError::NoSolution { explored }) => assert!(explored <= height * width),
            Err(e) => panic!("{e}"),
        }
    }
});
