use crate::problems::grid::Action;
use crate::problems::grid::Cell;
use crate::problems::grid::Grid;
use crate::problems::grid::GridCell;

const MAX_ACTIONS_DISPLAYED: usize = 20;

/// A path from the start to the goal, oldest step first.
///
/// `cells[i]` is where `actions[i]` leads. The start cell itself is not
/// included.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Solution {
    pub actions: Vec<Action>,
    pub cells: Vec<Cell>,
}

impl Solution {
    pub fn new(actions: Vec<Action>, cells: Vec<Cell>) -> Self {
        debug_assert_eq!(actions.len(), cells.len());
        Self { actions, cells }
    }

    /// Number of cells walked, excluding the start.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Replays the actions from the start of `grid`.
    ///
    /// Valid solutions only step on open cells, visit exactly `cells`, and end
    /// on the goal.
    pub fn replay(&self, grid: &Grid) -> bool {
        if self.actions.len() != self.cells.len() {
            return false;
        }

        let mut cell = grid.start();
        for (a, expected) in self.actions.iter().zip(&self.cells) {
            match grid.apply(&cell, *a) {
                Some(next) if next == *expected && grid.at(&next) == GridCell::Open => {
                    cell = next;
                }
                _ => return false,
            }
        }
        cell == grid.goal()
    }
}

impl std::fmt::Display for Solution {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "Solution({}, [", self.len())?;
        for (i, a) in self.actions.iter().take(MAX_ACTIONS_DISPLAYED).enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{a}")?;
        }
        if self.actions.len() > MAX_ACTIONS_DISPLAYED {
            write!(f, ", ...")?;
        }
        write!(f, "])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replay_checks_every_step() {
        let grid = Grid::try_from("A #\n  B").unwrap();

        let good = Solution::new(
            vec![Action::Down, Action::Right, Action::Right],
            vec![Cell::new(1, 0), Cell::new(1, 1), Cell::new(1, 2)],
        );
        assert!(good.replay(&grid));

        // Through the wall at (0,2).
        let walled = Solution::new(
            vec![Action::Right, Action::Right, Action::Down],
            vec![Cell::new(0, 1), Cell::new(0, 2), Cell::new(1, 2)],
        );
        assert!(!walled.replay(&grid));

        // Cells that don't match the actions.
        let mismatched = Solution::new(
            vec![Action::Down, Action::Right, Action::Right],
            vec![Cell::new(1, 0), Cell::new(0, 1), Cell::new(1, 2)],
        );
        assert!(!mismatched.replay(&grid));

        // Stops short of the goal.
        let short = Solution::new(vec![Action::Down], vec![Cell::new(1, 0)]);
        assert!(!short.replay(&grid));
    }

    #[test]
    fn display() {
        let s = Solution::new(
            vec![Action::Down, Action::Right],
            vec![Cell::new(1, 0), Cell::new(1, 1)],
        );
        assert_eq!(s.to_string(), "Solution(2, [down, right])");
        assert_eq!(Solution::default().to_string(), "Solution(0, [])");
    }
}
