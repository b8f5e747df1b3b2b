use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::algorithms::strategy::NeighbourOrder;
use crate::algorithms::strategy::Strategy;
use crate::frontier::EmptyFrontier;
use crate::frontier::Frontier;
use crate::frontier::FrontierEntry;
use crate::observer::SearchEvent;
use crate::observer::SearchObserver;
use crate::problems::grid::Cell;
use crate::problems::grid::Grid;
use crate::search::SearchNode;
use crate::search::SearchTree;
use crate::solution::Solution;

#[derive(Debug, Error)]
pub enum SolveError {
    #[error("No solution exists for this maze ({explored} nodes explored)")]
    NoSolution { explored: usize },
    #[error("Failed to render the search: {0}")]
    Render(#[from] std::io::Error),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SearchStatus {
    Running,
    GoalFound,
    /// The frontier ran dry before reaching the goal.
    Exhausted,
}

/// Searches a path from the start of a `Grid` to its goal.
///
/// The loop is the same for every `Strategy`,
///   1. Remove a node from the frontier and mark its cell explored.
///   2. Stop if it's the goal.
///   3. Push every neighbour that is neither explored nor queued.
pub struct Solver<'g> {
    grid: &'g Grid,
    strategy: Strategy,
    order: NeighbourOrder,

    /// Every node created so far. Parent links form a tree rooted at the start.
    search_tree: SearchTree,
    frontier: Box<dyn Frontier>,
    /// Cells that were removed from the frontier.
    explored: FxHashSet<Cell>,
    num_explored: usize,

    status: SearchStatus,
    solution: Option<Solution>,
}

impl<'g> Solver<'g> {
    #[must_use]
    pub fn new(grid: &'g Grid, strategy: Strategy, order: NeighbourOrder) -> Self {
        let start = grid.start();
        let h = strategy.h(grid, &start);

        let mut search_tree = SearchTree::new();
        let node = search_tree.push(SearchNode::root(start, h));
        let mut frontier = strategy.frontier();
        frontier.add(FrontierEntry {
            node,
            cell: start,
            h,
        });
        log::debug!("Starting {strategy} search on {grid:?}");

        Self {
            grid,
            strategy,
            order,
            search_tree,
            frontier,
            explored: FxHashSet::default(),
            num_explored: 0,
            status: SearchStatus::Running,
            solution: None,
        }
    }

    /// Runs the search to completion.
    pub fn solve<O>(&mut self, observer: &mut O) -> Result<Solution, SolveError>
    where
        O: SearchObserver + ?Sized,
    {
        while self.step(observer)? == SearchStatus::Running {}

        self.solution.clone().ok_or(SolveError::NoSolution {
            explored: self.num_explored,
        })
    }

    /// Expands a single node.
    ///
    /// Returns the status after the expansion. Once the search is over this
    /// keeps returning the same outcome without doing any work.
    pub fn step<O>(&mut self, observer: &mut O) -> Result<SearchStatus, SolveError>
    where
        O: SearchObserver + ?Sized,
    {
        match self.status {
            SearchStatus::Running => {}
            SearchStatus::GoalFound => return Ok(SearchStatus::GoalFound),
            SearchStatus::Exhausted => {
                return Err(SolveError::NoSolution {
                    explored: self.num_explored,
                });
            }
        }

        let entry = match self.frontier.remove() {
            Ok(entry) => entry,
            Err(EmptyFrontier) => {
                self.status = SearchStatus::Exhausted;
                log::debug!(
                    "{} search exhausted after {} nodes",
                    self.strategy,
                    self.num_explored
                );
                return Err(SolveError::NoSolution {
                    explored: self.num_explored,
                });
            }
        };
        debug_assert!(!self.explored.contains(&entry.cell));
        self.explored.insert(entry.cell);
        self.num_explored += 1;
        log::trace!("Expanding {} (h: {:?})", entry.cell, entry.h);

        observer.observe(
            self.grid,
            SearchEvent::Expanded {
                cell: entry.cell,
                explored: &self.explored,
            },
        )?;

        if entry.cell == self.grid.goal() {
            self.status = SearchStatus::GoalFound;
            let solution = self.solution.insert(self.search_tree.path(entry.node));
            log::debug!(
                "{} search found the goal after {} nodes: {solution}",
                self.strategy,
                self.num_explored
            );
            observer.observe(self.grid, SearchEvent::Solved { solution })?;
            return Ok(SearchStatus::GoalFound);
        }

        let mut neighbours = self.grid.neighbours(&entry.cell);
        self.order.arrange(&mut neighbours);
        for (action, cell) in neighbours {
            if self.explored.contains(&cell) || self.frontier.contains_state(&cell) {
                continue;
            }
            let h = self.strategy.h(self.grid, &cell);
            let node = self
                .search_tree
                .push(SearchNode::child(entry.node, action, cell, h));
            self.frontier.add(FrontierEntry { node, cell, h });
        }

        Ok(SearchStatus::Running)
    }

    pub fn grid(&self) -> &'g Grid {
        self.grid
    }
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }
    pub fn status(&self) -> SearchStatus {
        self.status
    }
    /// Nodes removed from the frontier so far, the goal included.
    pub fn num_explored(&self) -> usize {
        self.num_explored
    }
    pub fn explored(&self) -> &FxHashSet<Cell> {
        &self.explored
    }
    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }
    pub fn solution(&self) -> Option<&Solution> {
        self.solution.as_ref()
    }

    pub fn write_memory_stats<W: std::io::Write>(&self, mut out: W) -> std::io::Result<()> {
        use size::Size;
        use std::mem::size_of;
        use thousands::Separable;

        writeln!(out, "Solver Stats ({}):", self.strategy)?;
        let s = size_of::<SearchNode>();
        let l = self.search_tree.len();
        writeln!(
            out,
            "  - |Nodes|:    {} ({})",
            l.separate_with_commas(),
            Size::from_bytes(l * s)
        )?;

        let s = size_of::<FrontierEntry>();
        let l = self.frontier.len();
        writeln!(
            out,
            "  - |Frontier|: {} ({})",
            l.separate_with_commas(),
            Size::from_bytes(l * s)
        )?;

        let s = size_of::<Cell>();
        let l = self.explored.len();
        let c = self.explored.capacity();
        writeln!(
            out,
            "  - |Explored|:  {} ({})",
            l.separate_with_commas(),
            Size::from_bytes(l * s)
        )?;
        writeln!(
            out,
            "  - |Explored|*: {} ({})",
            c.separate_with_commas(),
            Size::from_bytes(c * s)
        )?;

        writeln!(
            out,
            "  - Expanded nodes: {}",
            self.num_explored.separate_with_commas()
        )?;

        Ok(())
    }
}

impl std::fmt::Debug for Solver<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Solver")
            .field("grid", self.grid)
            .field("strategy", &self.strategy)
            .field("search_tree", &self.search_tree)
            .field("frontier", &self.frontier.len())
            .field("explored", &self.explored.len())
            .field("status", &self.status)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::VecDeque;

    use indoc::indoc;
    use rustc_hash::FxHashMap;

    use crate::problems::grid::Action;
    use crate::problems::grid::GridCell;

    const MAZE1: &str = include_str!("../../data/mazes/maze1.txt");
    const MAZE2: &str = include_str!("../../data/mazes/maze2.txt");
    const MAZE3: &str = include_str!("../../data/mazes/maze3.txt");
    const OPEN: &str = include_str!("../../data/mazes/open.txt");

    const STRATEGIES: [Strategy; 3] = [
        Strategy::BreadthFirst,
        Strategy::DepthFirst,
        Strategy::GreedyBestFirst,
    ];

    /// Owned copy of a `SearchEvent`.
    #[derive(Clone, Debug, PartialEq, Eq)]
    enum Recorded {
        Expanded { cell: Cell, explored: usize },
        Solved(Solution),
    }

    #[derive(Default)]
    struct EventLog {
        events: Vec<Recorded>,
    }

    impl SearchObserver for EventLog {
        fn observe(&mut self, _grid: &Grid, event: SearchEvent<'_>) -> std::io::Result<()> {
            self.events.push(match event {
                SearchEvent::Expanded { cell, explored } => Recorded::Expanded {
                    cell,
                    explored: explored.len(),
                },
                SearchEvent::Solved { solution } => Recorded::Solved(solution.clone()),
            });
            Ok(())
        }
    }

    struct Broken;

    impl SearchObserver for Broken {
        fn observe(&mut self, _grid: &Grid, _event: SearchEvent<'_>) -> std::io::Result<()> {
            Err(std::io::Error::other("terminal went away"))
        }
    }

    /// Plain BFS distances from the start.
    fn distances(grid: &Grid) -> FxHashMap<Cell, usize> {
        let mut d = FxHashMap::default();
        let mut queue = VecDeque::from([grid.start()]);
        d.insert(grid.start(), 0usize);
        while let Some(cell) = queue.pop_front() {
            let next = d[&cell] + 1;
            for (_, n) in grid.neighbours(&cell) {
                if !d.contains_key(&n) {
                    d.insert(n, next);
                    queue.push_back(n);
                }
            }
        }
        d
    }

    fn solve(text: &str, strategy: Strategy, order: NeighbourOrder) -> (Grid, Result<Solution, SolveError>, usize) {
        let grid = Grid::try_from(text).unwrap();
        let (result, explored) = {
            let mut solver = Solver::new(&grid, strategy, order);
            let result = solver.solve(&mut crate::observer::Headless);
            (result, solver.num_explored())
        };
        (grid, result, explored)
    }

    #[test]
    fn two_row_example() {
        let grid = Grid::try_from("A \nB ").unwrap();
        let mut solver = Solver::new(&grid, Strategy::BreadthFirst, NeighbourOrder::Fixed);
        let mut log = EventLog::default();
        let solution = solver.solve(&mut log).unwrap();

        assert_eq!(solution.actions, vec![Action::Down]);
        assert_eq!(solution.cells, vec![Cell::new(1, 0)]);
        assert!(solver.explored().contains(&Cell::new(0, 0)));
        assert!(solver.explored().contains(&Cell::new(1, 0)));
        assert_eq!(solver.status(), SearchStatus::GoalFound);
        assert_eq!(solver.num_explored(), 2);
        assert_eq!(
            log.events,
            vec![
                Recorded::Expanded {
                    cell: Cell::new(0, 0),
                    explored: 1
                },
                Recorded::Expanded {
                    cell: Cell::new(1, 0),
                    explored: 2
                },
                Recorded::Solved(solution),
            ]
        );
    }

    #[test]
    fn wall_row_has_no_solution() {
        let maze = indoc! {"
            A
            #####
                B
        "};
        for strategy in STRATEGIES {
            let (grid, result, explored) = solve(maze, strategy, NeighbourOrder::seeded(3));
            assert!(
                matches!(result, Err(SolveError::NoSolution { explored: 5 })),
                "{strategy}: {result:?}"
            );
            assert_eq!(explored, 5);
            assert_eq!(grid.dimensions(), (3, 5));
        }
    }

    #[test]
    fn exhausted_search_explores_the_start_component() {
        let grid = Grid::try_from(MAZE3).unwrap();
        let component = distances(&grid);
        for strategy in STRATEGIES {
            let mut solver = Solver::new(&grid, strategy, NeighbourOrder::seeded(11));
            assert!(matches!(
                solver.solve(&mut crate::observer::Headless),
                Err(SolveError::NoSolution { explored: 9 })
            ));
            assert_eq!(solver.status(), SearchStatus::Exhausted);
            assert_eq!(solver.explored().len(), component.len());
            assert!(component.keys().all(|c| solver.explored().contains(c)));

            // Terminal states are sticky.
            assert!(matches!(
                solver.step(&mut crate::observer::Headless),
                Err(SolveError::NoSolution { explored: 9 })
            ));
            assert_eq!(solver.num_explored(), 9);
        }
    }

    #[test]
    fn breadth_first_finds_shortest_paths() {
        for maze in [MAZE1, MAZE2, OPEN] {
            let grid = Grid::try_from(maze).unwrap();
            let shortest = distances(&grid)[&grid.goal()];
            for seed in 0..10 {
                let mut solver =
                    Solver::new(&grid, Strategy::BreadthFirst, NeighbourOrder::seeded(seed));
                let solution = solver.solve(&mut crate::observer::Headless).unwrap();
                assert_eq!(solution.len(), shortest);
                assert!(solution.replay(&grid));
            }
        }
    }

    #[test]
    fn every_strategy_finds_a_valid_path() {
        for maze in [MAZE1, MAZE2, OPEN] {
            for strategy in STRATEGIES {
                for seed in 0..5 {
                    let (grid, result, explored) =
                        solve(maze, strategy, NeighbourOrder::seeded(seed));
                    let solution = result.unwrap();
                    assert!(solution.replay(&grid), "{strategy} seed {seed}: {solution}");
                    assert!(solution.len() >= distances(&grid)[&grid.goal()]);
                    assert!(explored > solution.len());
                    assert_eq!(solution.cells.last(), Some(&grid.goal()));
                }
            }
        }
    }

    #[test]
    fn corridor_counts() {
        let (_, result, explored) = solve(MAZE1, Strategy::BreadthFirst, NeighbourOrder::Fixed);
        assert_eq!(result.unwrap().len(), 10);
        // Every open cell is on the only path.
        assert_eq!(explored, 11);
    }

    #[test]
    fn fixed_order_is_reproducible() {
        for maze in [MAZE1, MAZE2, OPEN] {
            for strategy in STRATEGIES {
                let (_, first, first_explored) = solve(maze, strategy, NeighbourOrder::Fixed);
                let first = first.unwrap();
                for _ in 0..3 {
                    let (_, again, explored) = solve(maze, strategy, NeighbourOrder::Fixed);
                    assert_eq!(again.unwrap(), first);
                    assert_eq!(explored, first_explored);
                }
            }
        }
    }

    #[test]
    fn greedy_goes_straight_when_it_can() {
        let maze = indoc! {"
            A

                B
        "};
        let (grid, result, explored) =
            solve(maze, Strategy::GreedyBestFirst, NeighbourOrder::Fixed);
        let solution = result.unwrap();
        assert_eq!(solution.len(), 6);
        // Nothing but the path and the start is expanded on an open floor.
        assert_eq!(explored, 7);
        assert!(solution.replay(&grid));
    }

    #[test]
    fn frontier_never_holds_a_cell_twice() {
        for maze in [MAZE2, OPEN] {
            for strategy in STRATEGIES {
                let grid = Grid::try_from(maze).unwrap();
                let mut solver = Solver::new(&grid, strategy, NeighbourOrder::seeded(5));
                loop {
                    // Every node is either explored or queued...
                    let nodes = solver.search_tree.len();
                    assert_eq!(nodes, solver.num_explored() + solver.frontier_len());
                    // ...and was created for a cell nobody had discovered yet.
                    let cells: FxHashSet<Cell> =
                        solver.search_tree.iter().map(|n| n.cell()).collect();
                    assert_eq!(cells.len(), nodes);

                    if solver.step(&mut crate::observer::Headless).unwrap()
                        != SearchStatus::Running
                    {
                        break;
                    }
                }
            }
        }
    }

    #[test]
    fn explored_cells_are_open() {
        let grid = Grid::try_from(MAZE2).unwrap();
        let mut solver = Solver::new(&grid, Strategy::DepthFirst, NeighbourOrder::seeded(1));
        solver.solve(&mut crate::observer::Headless).unwrap();
        assert!(solver
            .explored()
            .iter()
            .all(|c| grid.at(c) == GridCell::Open));
    }

    #[test]
    fn render_errors_abort_the_search() {
        let grid = Grid::try_from(MAZE1).unwrap();
        let mut solver = Solver::new(&grid, Strategy::BreadthFirst, NeighbourOrder::Fixed);
        assert!(matches!(
            solver.solve(&mut Broken),
            Err(SolveError::Render(_))
        ));
        assert_eq!(solver.num_explored(), 1);
        assert!(solver.solution().is_none());
    }

    #[test]
    fn memory_stats() {
        let grid = Grid::try_from(MAZE1).unwrap();
        let mut solver = Solver::new(&grid, Strategy::BreadthFirst, NeighbourOrder::Fixed);
        solver.solve(&mut crate::observer::Headless).unwrap();

        let mut out = vec![];
        solver.write_memory_stats(&mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.starts_with("Solver Stats (breadth-first):"));
        assert!(out.contains("Expanded nodes: 11"));
    }
}
