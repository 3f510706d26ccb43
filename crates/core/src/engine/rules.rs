//! Line evaluation.

use crate::models::{Coord, Mark};

use super::board::Board;

/// A winning triple of coordinates.
pub type Line = [Coord; 3];

/// Every line in evaluation order: rows, then columns, then both diagonals.
pub const LINES: [Line; 8] = [
    [Coord::at(0, 0), Coord::at(0, 1), Coord::at(0, 2)],
    [Coord::at(1, 0), Coord::at(1, 1), Coord::at(1, 2)],
    [Coord::at(2, 0), Coord::at(2, 1), Coord::at(2, 2)],
    [Coord::at(0, 0), Coord::at(1, 0), Coord::at(2, 0)],
    [Coord::at(0, 1), Coord::at(1, 1), Coord::at(2, 1)],
    [Coord::at(0, 2), Coord::at(1, 2), Coord::at(2, 2)],
    [Coord::at(0, 0), Coord::at(1, 1), Coord::at(2, 2)],
    [Coord::at(0, 2), Coord::at(1, 1), Coord::at(2, 0)],
];

/// First line fully owned by one mark, together with that mark.
pub fn find_winning_line(board: &Board) -> Option<(Mark, Line)> {
    LINES.iter().find_map(|line| {
        let [a, b, c] = *line;
        let mark = board.get(a).mark()?;
        if board.get(b).mark() == Some(mark) && board.get(c).mark() == Some(mark) {
            Some((mark, *line))
        } else {
            None
        }
    })
}
