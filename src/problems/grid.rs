use derive_more::Display;
use smallvec::SmallVec;
use thiserror::Error;

use crate::error::Error;
use crate::source::MazeSource;

pub type Coord = u32;
pub type Distance = u32;

const START: char = 'A';
const GOAL: char = 'B';

/// A position in the grid.
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[display("({row},{col})")]
pub struct Cell {
    pub row: Coord,
    pub col: Coord,
}

impl Cell {
    pub const fn new(row: Coord, col: Coord) -> Self {
        Self { row, col }
    }
    pub fn new_from_usize(row: usize, col: usize) -> Option<Cell> {
        Some(Cell {
            row: Coord::try_from(row).ok()?,
            col: Coord::try_from(col).ok()?,
        })
    }
}

#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, Hash)]
pub enum Action {
    #[display("up")]
    Up, // row--
    #[display("down")]
    Down, // row++
    #[display("left")]
    Left, // col--
    #[display("right")]
    Right, // col++
}

impl Action {
    /// Expansion order used by [`Grid::neighbours`].
    pub const ALL: [Action; 4] = [Action::Up, Action::Down, Action::Left, Action::Right];
}

#[derive(Copy, Clone, Debug, Display, PartialEq, Eq)]
pub enum GridCell {
    #[display(" ")]
    Open,
    #[display("█")]
    Wall,
}

/// What a single character of maze text stands for.
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq)]
pub enum GridChar {
    Cell(GridCell),
    #[display("A")]
    Start,
    #[display("B")]
    Goal,
}

impl std::convert::From<char> for GridChar {
    fn from(ch: char) -> Self {
        match ch {
            START => GridChar::Start,
            GOAL => GridChar::Goal,
            ' ' => GridChar::Cell(GridCell::Open),
            _ => GridChar::Cell(GridCell::Wall),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridParseError {
    #[error("Maze should have exactly one starting point 'A' (found {found})")]
    StartCount { found: usize },
    #[error("Maze should have exactly one goal 'B' (found {found})")]
    GoalCount { found: usize },
    #[error("Maze is too large ({height}x{width})")]
    TooLarge { height: usize, width: usize },
}

/// A parsed maze.
///
/// Every row holds exactly `width` cells. Rows that were shorter in the source
/// text are padded with open floor.
#[derive(Clone, PartialEq, Eq)]
pub struct Grid {
    map: Vec<Vec<GridCell>>,
    start: Cell,
    goal: Cell,
}

impl Grid {
    /// Reads and parses a maze from any source.
    pub fn load<S: MazeSource + ?Sized>(source: &S) -> Result<Grid, Error> {
        let text = source.read_maze()?;
        Ok(Grid::try_from(text.as_str())?)
    }

    /// `(height, width)`
    pub fn dimensions(&self) -> (usize, usize) {
        if self.map.is_empty() {
            return (0, 0);
        }
        (self.map.len(), self.map[0].len())
    }

    pub fn start(&self) -> Cell {
        self.start
    }
    pub fn goal(&self) -> Cell {
        self.goal
    }

    #[inline(always)]
    pub fn valid(&self, cell: &Cell) -> bool {
        let (height, width) = self.dimensions();
        (cell.row as usize) < height && (cell.col as usize) < width
    }

    #[inline(always)]
    pub fn at(&self, cell: &Cell) -> GridCell {
        debug_assert!(self.valid(cell));
        self.map[cell.row as usize][cell.col as usize]
    }

    pub fn is_wall(&self, cell: &Cell) -> bool {
        self.valid(cell) && self.at(cell) == GridCell::Wall
    }

    /// The cell one step away, or `None` when it leaves the grid.
    ///
    /// Walls are not checked.
    #[inline(always)]
    pub fn apply(&self, cell: &Cell, action: Action) -> Option<Cell> {
        #[rustfmt::skip]
        let next = match action {
            Action::Up    => Cell::new(cell.row.checked_sub(1)?, cell.col),
            Action::Down  => Cell::new(cell.row.checked_add(1)?, cell.col),
            Action::Left  => Cell::new(cell.row, cell.col.checked_sub(1)?),
            Action::Right => Cell::new(cell.row, cell.col.checked_add(1)?),
        };
        self.valid(&next).then_some(next)
    }

    /// Gets the open neighbours of a cell in [`Action::ALL`] order.
    pub fn neighbours(&self, cell: &Cell) -> SmallVec<[(Action, Cell); 4]> {
        let mut v = SmallVec::<[(Action, Cell); 4]>::new();
        for action in Action::ALL {
            if let Some(next) = self.apply(cell, action) {
                if self.at(&next) == GridCell::Open {
                    v.push((action, next));
                }
            }
        }
        v
    }

    /// Distance to the goal ignoring walls.
    #[inline(always)]
    pub fn manhattan_distance(&self, cell: &Cell) -> Distance {
        manhattan_distance(cell, &self.goal)
    }
}

/// The distance of following straight lines
///
/// ```
/// use maze_search::problems::grid::Cell;
/// use maze_search::problems::grid::manhattan_distance;
/// assert_eq!(manhattan_distance(&Cell::new(0, 0), &Cell::new(0, 0)), 0);
/// assert_eq!(manhattan_distance(&Cell::new(0, 3), &Cell::new(2, 1)), 4);
/// assert_eq!(manhattan_distance(&Cell::new(5, 1), &Cell::new(1, 5)), 8);
/// ```
#[inline(always)]
#[must_use]
pub fn manhattan_distance(a: &Cell, b: &Cell) -> Distance {
    a.row.abs_diff(b.row) + a.col.abs_diff(b.col)
}

fn is_line_break(ch: char) -> bool {
    matches!(
        ch,
        '\n' | '\r'
            | '\x0b'
            | '\x0c'
            | '\x1c'
            | '\x1d'
            | '\x1e'
            | '\u{85}'
            | '\u{2028}'
            | '\u{2029}'
    )
}

/// Splits on any universal line break, counting `\r\n` as one.
///
/// A trailing break doesn't start a new line.
fn split_lines(s: &str) -> Vec<&str> {
    let mut lines = vec![];
    let mut begin = 0;
    let mut chars = s.char_indices().peekable();
    while let Some((i, ch)) = chars.next() {
        if !is_line_break(ch) {
            continue;
        }
        lines.push(&s[begin..i]);
        begin = i + ch.len_utf8();
        if ch == '\r' && chars.next_if(|&(_, next)| next == '\n').is_some() {
            begin += 1;
        }
    }
    if begin < s.len() {
        lines.push(&s[begin..]);
    }
    lines
}

impl std::convert::TryFrom<&str> for Grid {
    type Error = GridParseError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let starts = s.matches(START).count();
        if starts != 1 {
            return Err(GridParseError::StartCount { found: starts });
        }
        let goals = s.matches(GOAL).count();
        if goals != 1 {
            return Err(GridParseError::GoalCount { found: goals });
        }

        let lines = split_lines(s);
        let height = lines.len();
        let width = lines
            .iter()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0);
        if Coord::try_from(height).is_err() || Coord::try_from(width).is_err() {
            return Err(GridParseError::TooLarge { height, width });
        }

        // Cells past the end of a short line stay open.
        let mut map = vec![vec![GridCell::Open; width]; height];
        let mut start = None;
        let mut goal = None;

        for (row, line) in lines.iter().enumerate() {
            for (col, ch) in line.chars().enumerate() {
                map[row][col] = match GridChar::from(ch) {
                    GridChar::Start => {
                        start = Cell::new_from_usize(row, col);
                        GridCell::Open
                    }
                    GridChar::Goal => {
                        goal = Cell::new_from_usize(row, col);
                        GridCell::Open
                    }
                    GridChar::Cell(c) => c,
                }
            }
        }

        let start = start.ok_or(GridParseError::StartCount { found: 0 })?;
        let goal = goal.ok_or(GridParseError::GoalCount { found: 0 })?;
        log::debug!("Parsed {height}x{width} maze (start: {start}, goal: {goal})");

        Ok(Grid { map, start, goal })
    }
}

impl std::fmt::Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for (row, line) in self.map.iter().enumerate() {
            for (col, cell) in line.iter().enumerate() {
                let c = Cell::new(row as Coord, col as Coord);
                if c == self.start {
                    write!(f, "{}", GridChar::Start)?;
                } else if c == self.goal {
                    write!(f, "{}", GridChar::Goal)?;
                } else {
                    write!(f, "{cell}")?;
                }
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

impl std::fmt::Debug for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let (height, width) = self.dimensions();
        write!(f, "Grid({height}x{width}, {} -> {})", self.start, self.goal)
    }
}
