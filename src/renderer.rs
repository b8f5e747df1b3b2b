//! Terminal drawing of a maze while it's being searched.

use std::io::Write;
use std::time::Duration;

use derive_more::Display;
use owo_colors::OwoColorize;
use rustc_hash::FxHashSet;

use crate::observer::SearchEvent;
use crate::observer::SearchObserver;
use crate::problems::grid::Cell;
use crate::problems::grid::Coord;
use crate::problems::grid::Grid;
use crate::problems::grid::GridCell;
use crate::solution::Solution;

/// Resets the terminal.
const CLEAR_SCREEN: &str = "\x1bc";
/// Moves the cursor to the top-left corner.
const CURSOR_HOME: &str = "\x1b[H";

#[derive(Copy, Clone, Debug, Display, PartialEq, Eq)]
pub enum Glyph {
    #[display("█")]
    Wall,
    #[display("A")]
    Start,
    #[display("B")]
    Goal,
    /// Explored, or on the solution.
    #[display("*")]
    Mark,
    #[display(" ")]
    Open,
}

/// A snapshot of a search over a grid.
#[derive(Clone, Debug)]
pub struct GridView<'a> {
    grid: &'a Grid,
    explored: Option<&'a FxHashSet<Cell>>,
    path: FxHashSet<Cell>,
}

impl<'a> GridView<'a> {
    pub fn new(grid: &'a Grid) -> Self {
        Self {
            grid,
            explored: None,
            path: FxHashSet::default(),
        }
    }

    pub fn with_explored(mut self, explored: &'a FxHashSet<Cell>) -> Self {
        self.explored = Some(explored);
        self
    }

    pub fn with_solution(mut self, solution: &Solution) -> Self {
        self.path = solution.cells.iter().copied().collect();
        self
    }

    pub fn glyph(&self, cell: &Cell) -> Glyph {
        if self.grid.at(cell) == GridCell::Wall {
            Glyph::Wall
        } else if *cell == self.grid.start() {
            Glyph::Start
        } else if *cell == self.grid.goal() {
            Glyph::Goal
        } else if self.explored.is_some_and(|e| e.contains(cell)) || self.path.contains(cell) {
            Glyph::Mark
        } else {
            Glyph::Open
        }
    }

    /// Glyphs row by row.
    pub fn rows(&self) -> impl Iterator<Item = impl Iterator<Item = Glyph> + '_> + '_ {
        let (height, width) = self.grid.dimensions();
        (0..height).map(move |row| {
            (0..width).map(move |col| self.glyph(&Cell::new(row as Coord, col as Coord)))
        })
    }
}

impl std::fmt::Display for GridView<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for row in self.rows() {
            for glyph in row {
                write!(f, "{glyph}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Redraws the grid in place on every search event.
pub struct TerminalRenderer<W: Write> {
    out: W,
    /// Pause after each explored frame. Zero disables pacing.
    delay: Duration,
    /// Colours glyphs with SGR codes. Cursor controls are written either way.
    colored: bool,
    cleared: bool,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W, delay: Duration) -> Self {
        Self {
            out,
            delay,
            colored: true,
            cleared: false,
        }
    }

    pub fn with_color(mut self, colored: bool) -> Self {
        self.colored = colored;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn draw(&mut self, view: &GridView<'_>, solved: bool) -> std::io::Result<()> {
        if !self.cleared {
            write!(self.out, "{CLEAR_SCREEN}")?;
            self.cleared = true;
        }
        write!(self.out, "{CURSOR_HOME}")?;

        for row in view.rows() {
            for glyph in row {
                match glyph {
                    _ if !self.colored => write!(self.out, "{glyph}")?,
                    Glyph::Wall => write!(self.out, "{}", glyph.dimmed())?,
                    Glyph::Start | Glyph::Goal => write!(self.out, "{}", glyph.bold())?,
                    Glyph::Mark if solved => write!(self.out, "{}", glyph.green())?,
                    Glyph::Mark => write!(self.out, "{}", glyph.yellow())?,
                    Glyph::Open => write!(self.out, "{glyph}")?,
                }
            }
            writeln!(self.out)?;
        }
        self.out.flush()
    }
}

impl<W: Write> SearchObserver for TerminalRenderer<W> {
    fn observe(&mut self, grid: &Grid, event: SearchEvent<'_>) -> std::io::Result<()> {
        match event {
            SearchEvent::Expanded { explored, .. } => {
                self.draw(&GridView::new(grid).with_explored(explored), false)?;
                if !self.delay.is_zero() {
                    std::thread::sleep(self.delay);
                }
            }
            SearchEvent::Solved { solution } => {
                self.draw(&GridView::new(grid).with_solution(solution), true)?;
            }
        }
        Ok(())
    }
}

impl<W: Write> std::fmt::Debug for TerminalRenderer<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "TerminalRenderer({:?}, colored: {})", self.delay, self.colored)
    }
}
