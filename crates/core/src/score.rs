//! Cross-game score keeping for the lifetime of the process.

use std::collections::VecDeque;

use chrono::{DateTime, Local};

use crate::{engine::Line, models::Mark};

/// Default number of finished games kept in the session history.
pub const DEFAULT_HISTORY_LIMIT: usize = 10;

/// Running win/tie counters. Counters only ever increase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreTally {
    /// Games won by X.
    pub x_wins: u32,
    /// Games won by O.
    pub o_wins: u32,
    /// Games that filled the board without a line.
    pub ties: u32,
}

impl ScoreTally {
    /// Total number of finished games.
    pub fn games_played(&self) -> u32 {
        self.x_wins + self.o_wins + self.ties
    }

    /// Wins recorded for `mark`.
    pub fn wins(&self, mark: Mark) -> u32 {
        match mark {
            Mark::X => self.x_wins,
            Mark::O => self.o_wins,
        }
    }

    pub(crate) fn record(&mut self, result: GameResult) {
        match result {
            GameResult::Won(Mark::X) => self.x_wins += 1,
            GameResult::Won(Mark::O) => self.o_wins += 1,
            GameResult::Tied => self.ties += 1,
        }
    }
}

/// Final result of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameResult {
    /// The given mark completed a line.
    Won(Mark),
    /// The board filled with no line.
    Tied,
}

/// A finished game kept in the session history.
#[derive(Debug, Clone)]
pub struct GameRecord {
    /// How the game ended.
    pub result: GameResult,
    /// The completed line, for wins.
    pub line: Option<Line>,
    /// Number of moves played.
    pub moves: usize,
    /// Local time the game ended.
    pub finished_at: DateTime<Local>,
}

impl GameRecord {
    /// One-line summary for history panels.
    pub fn summary(&self) -> String {
        let label = match self.result {
            GameResult::Won(mark) => format!("{mark} won"),
            GameResult::Tied => "Tie".to_string(),
        };
        format!(
            "{} · {label} in {} moves",
            self.finished_at.format("%H:%M:%S"),
            self.moves
        )
    }
}

/// Bounded list of recently finished games, newest first.
#[derive(Debug, Clone)]
pub struct SessionHistory {
    limit: usize,
    records: VecDeque<GameRecord>,
}

impl SessionHistory {
    /// Create a history holding at most `limit` records (minimum one).
    pub fn new(limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            limit,
            records: VecDeque::with_capacity(limit),
        }
    }

    pub(crate) fn push(&mut self, record: GameRecord) {
        self.records.push_front(record);
        self.records.truncate(self.limit);
    }

    /// Records, newest first.
    pub fn iter(&self) -> impl Iterator<Item = &GameRecord> {
        self.records.iter()
    }

    /// Most recently finished game.
    pub fn latest(&self) -> Option<&GameRecord> {
        self.records.front()
    }

    /// Number of records kept.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when no game has finished yet.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for SessionHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}
