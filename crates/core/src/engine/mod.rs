//! Game state engine: board, turn order, win evaluation and scoring.

mod board;
mod game;
mod rules;

pub use board::Board;
pub use game::{GameEngine, MoveOutcome, Phase};
pub use rules::{find_winning_line, Line, LINES};
