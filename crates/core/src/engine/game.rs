use chrono::Local;
use tracing::{debug, info};

use crate::{
    error::MoveRejection,
    models::{Cell, Coord, Mark, CELL_COUNT},
    score::{GameRecord, GameResult, ScoreTally, SessionHistory},
};

use super::{
    board::Board,
    rules::{find_winning_line, Line},
};

/// Terminal or non-terminal status of the current game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Moves are still accepted.
    InProgress,
    /// X completed a line.
    WonByX,
    /// O completed a line.
    WonByO,
    /// The board filled with no line.
    Tied,
}

impl Phase {
    /// True once the game has been won or tied.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Phase::InProgress)
    }

    fn won_by(mark: Mark) -> Self {
        match mark {
            Mark::X => Phase::WonByX,
            Mark::O => Phase::WonByO,
        }
    }
}

/// Result of a move request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The move was placed and the game goes on with `next` to play.
    Continue {
        /// Player to move next.
        next: Mark,
    },
    /// The move completed a line.
    Win {
        /// Owner of the line.
        winner: Mark,
        /// The completed line in evaluation order.
        line: Line,
    },
    /// The move filled the board without a line.
    Tie,
    /// The move was refused and nothing changed.
    Rejected(MoveRejection),
}

impl MoveOutcome {
    /// True when the move changed the board.
    pub fn is_accepted(&self) -> bool {
        !matches!(self, MoveOutcome::Rejected(_))
    }
}

/// Single source of truth for the board, the turn and the score.
#[derive(Debug, Clone)]
pub struct GameEngine {
    board: Board,
    current: Mark,
    phase: Phase,
    moves: Vec<Coord>,
    winning_line: Option<Line>,
    score: ScoreTally,
    history: SessionHistory,
}

impl GameEngine {
    /// Fresh engine with X to move and a zeroed score.
    pub fn new() -> Self {
        Self::with_history_limit(crate::score::DEFAULT_HISTORY_LIMIT)
    }

    /// Fresh engine that keeps at most `limit` finished games in its history.
    pub fn with_history_limit(limit: usize) -> Self {
        Self {
            board: Board::new(),
            current: Mark::X,
            phase: Phase::InProgress,
            moves: Vec::with_capacity(CELL_COUNT),
            winning_line: None,
            score: ScoreTally::default(),
            history: SessionHistory::new(limit),
        }
    }

    /// Place the current player's mark at `(row, col)`.
    pub fn apply_move(&mut self, row: usize, col: usize) -> MoveOutcome {
        match Coord::new(row, col) {
            Ok(coord) => self.apply_coord(coord),
            Err(err) => {
                debug!(%err, "move rejected");
                MoveOutcome::Rejected(MoveRejection::OutOfBounds)
            }
        }
    }

    /// Place the current player's mark at `coord`.
    pub fn apply_coord(&mut self, coord: Coord) -> MoveOutcome {
        if let Err(reason) = self.check_legal(coord) {
            debug!(%coord, %reason, "move rejected");
            return MoveOutcome::Rejected(reason);
        }

        let mark = self.current;
        self.board.place(coord, mark);
        self.moves.push(coord);
        debug!(%coord, %mark, turn = self.turn(), "move applied");

        if let Some((winner, line)) = find_winning_line(&self.board) {
            self.phase = Phase::won_by(winner);
            self.winning_line = Some(line);
            self.finish(GameResult::Won(winner), Some(line));
            return MoveOutcome::Win { winner, line };
        }

        if self.board.is_full() {
            self.phase = Phase::Tied;
            self.finish(GameResult::Tied, None);
            return MoveOutcome::Tie;
        }

        self.current = mark.other();
        MoveOutcome::Continue { next: self.current }
    }

    fn check_legal(&self, coord: Coord) -> Result<(), MoveRejection> {
        if self.phase.is_terminal() {
            return Err(MoveRejection::GameOver);
        }
        if !self.board.get(coord).is_empty() {
            return Err(MoveRejection::Occupied);
        }
        Ok(())
    }

    fn finish(&mut self, result: GameResult, line: Option<Line>) {
        self.score.record(result);
        self.history.push(GameRecord {
            result,
            line,
            moves: self.turn(),
            finished_at: Local::now(),
        });
        info!(
            ?result,
            moves = self.turn(),
            x_wins = self.score.x_wins,
            o_wins = self.score.o_wins,
            ties = self.score.ties,
            "game finished"
        );
    }

    /// Start a new game. The score and history carry over.
    pub fn reset(&mut self) {
        self.board.clear();
        self.current = Mark::X;
        self.phase = Phase::InProgress;
        self.moves.clear();
        self.winning_line = None;
        info!(games_played = self.score.games_played(), "new game");
    }

    /// Cumulative score for this process.
    pub fn score(&self) -> ScoreTally {
        self.score
    }

    /// Recently finished games, newest first.
    pub fn history(&self) -> &SessionHistory {
        &self.history
    }

    /// Current board for rendering.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Content of one cell.
    pub fn cell(&self, coord: Coord) -> Cell {
        self.board.get(coord)
    }

    /// Player whose turn it is. Frozen once the game is over.
    pub fn current_player(&self) -> Mark {
        self.current
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// True once the game has been won or tied.
    pub fn is_over(&self) -> bool {
        self.phase.is_terminal()
    }

    /// Number of moves played in this game.
    pub fn turn(&self) -> usize {
        self.moves.len()
    }

    /// Most recent move in this game.
    pub fn last_move(&self) -> Option<Coord> {
        self.moves.last().copied()
    }

    /// The completed line, when the game was won.
    pub fn winning_line(&self) -> Option<Line> {
        self.winning_line
    }
}

impl Default for GameEngine {
    fn default() -> Self {
        Self::new()
    }
}
