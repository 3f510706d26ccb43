#![warn(clippy::all, missing_docs)]

//! Core game logic for the terminal Tic-Tac-Toe.
//!
//! This crate owns the board model, move validation, win/tie
//! evaluation, cross-game scoring and configuration handling.
//! Frontends drive it through [`GameEngine`] and render from its
//! read accessors; they never mutate the board directly.

pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod score;

pub use config::AppConfig;
pub use engine::{Board, GameEngine, Line, MoveOutcome, Phase};
pub use error::{CoreError, MoveRejection};
pub use models::{Cell, Coord, Mark};
pub use score::{GameRecord, GameResult, ScoreTally, SessionHistory};
