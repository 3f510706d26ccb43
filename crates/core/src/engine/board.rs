use std::fmt;

use crate::models::{Cell, Coord, Mark, BOARD_SIZE};

/// The 3×3 grid. Only the engine writes to it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Board {
    cells: [[Cell; BOARD_SIZE]; BOARD_SIZE],
}

impl Board {
    /// An all-empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Content of the cell at `coord`.
    pub fn get(&self, coord: Coord) -> Cell {
        self.cells[coord.row()][coord.col()]
    }

    pub(crate) fn place(&mut self, coord: Coord, mark: Mark) {
        self.cells[coord.row()][coord.col()] = Cell::Marked(mark);
    }

    pub(crate) fn clear(&mut self) {
        self.cells = Default::default();
    }

    /// Number of non-empty cells.
    pub fn filled(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|cell| !cell.is_empty())
            .count()
    }

    /// True when every cell holds a mark.
    pub fn is_full(&self) -> bool {
        self.cells.iter().flatten().all(|cell| !cell.is_empty())
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row_idx, row) in self.cells.iter().enumerate() {
            if row_idx > 0 {
                writeln!(f, "---+---+---")?;
            }
            let symbols: Vec<String> = row
                .iter()
                .map(|cell| match cell.mark() {
                    Some(mark) => format!(" {mark} "),
                    None => "   ".to_string(),
                })
                .collect();
            writeln!(f, "{}", symbols.join("|"))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_filled_cells() {
        let mut board = Board::new();
        assert_eq!(board.filled(), 0);
        assert!(!board.is_full());

        board.place(Coord::at(0, 0), Mark::X);
        board.place(Coord::at(2, 1), Mark::O);
        assert_eq!(board.filled(), 2);
        assert_eq!(board.get(Coord::at(2, 1)), Cell::Marked(Mark::O));

        board.clear();
        assert_eq!(board, Board::new());
    }

    #[test]
    fn renders_plain_text_grid() {
        let mut board = Board::new();
        board.place(Coord::at(0, 0), Mark::X);
        board.place(Coord::at(1, 1), Mark::O);
        let expected = " X |   |   \n---+---+---\n   | O |   \n---+---+---\n   |   |   \n";
        assert_eq!(board.to_string(), expected);
    }
}
