//! Shared domain models.

use std::fmt;

use crate::error::CoreError;

/// Number of rows and columns on the board.
pub const BOARD_SIZE: usize = 3;

/// Total number of cells on the board.
pub const CELL_COUNT: usize = BOARD_SIZE * BOARD_SIZE;

/// A player's mark. `X` always opens a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mark {
    /// The opening player.
    X,
    /// The second player.
    O,
}

impl Mark {
    /// Returns the opposing mark.
    pub fn other(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }

    /// Single-character label used by renderers.
    pub fn symbol(self) -> char {
        match self {
            Mark::X => 'X',
            Mark::O => 'O',
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Content of a single board position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    /// Nobody has played here yet.
    #[default]
    Empty,
    /// Occupied by the given mark.
    Marked(Mark),
}

impl Cell {
    /// True when no mark occupies the cell.
    pub fn is_empty(self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// The occupying mark, if any.
    pub fn mark(self) -> Option<Mark> {
        match self {
            Cell::Empty => None,
            Cell::Marked(mark) => Some(mark),
        }
    }
}

/// A validated board coordinate with `row` and `col` in `0..3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coord {
    row: usize,
    col: usize,
}

impl Coord {
    /// Build a coordinate, failing when either component is off the board.
    pub fn new(row: usize, col: usize) -> Result<Self, CoreError> {
        if row >= BOARD_SIZE || col >= BOARD_SIZE {
            return Err(CoreError::OutOfBounds { row, col });
        }
        Ok(Self { row, col })
    }

    /// Const constructor for coordinates known to be in range.
    pub(crate) const fn at(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Coordinate for a row-major index in `0..9`.
    pub fn from_index(index: usize) -> Result<Self, CoreError> {
        if index >= CELL_COUNT {
            return Err(CoreError::InvalidIndex(index));
        }
        Ok(Self::at(index / BOARD_SIZE, index % BOARD_SIZE))
    }

    /// Coordinate for a keypad digit `1..=9`, counted row-major from the top-left.
    pub fn from_digit(digit: char) -> Option<Self> {
        let value = digit.to_digit(10)? as usize;
        if value == 0 {
            return None;
        }
        Self::from_index(value - 1).ok()
    }

    /// Zero-based row.
    pub fn row(self) -> usize {
        self.row
    }

    /// Zero-based column.
    pub fn col(self) -> usize {
        self.col
    }

    /// Row-major index in `0..9`.
    pub fn index(self) -> usize {
        self.row * BOARD_SIZE + self.col
    }

    /// Move by the given deltas, clamping at the board edges.
    pub fn offset(self, delta_row: isize, delta_col: isize) -> Self {
        let clamp =
            |value: usize, delta: isize| value.saturating_add_signed(delta).min(BOARD_SIZE - 1);
        Self::at(clamp(self.row, delta_row), clamp(self.col, delta_col))
    }

    /// Every coordinate on the board in row-major order.
    pub fn all() -> impl Iterator<Item = Coord> {
        (0..CELL_COUNT).map(|index| Self::at(index / BOARD_SIZE, index % BOARD_SIZE))
    }
}

impl Default for Coord {
    fn default() -> Self {
        Self::at(1, 1)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}
