// Error types for the search core and its configuration

use thiserror::Error;

use crate::types::{Move, Player};

/// Raised at any recursive entry once the deadline threshold is crossed.
/// Only the iterative deepening driver (or a fixed-depth agent) recovers it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("search timed out")]
pub struct SearchTimeout;

/// Errors that can occur while loading `Isolation.toml`
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Reasons a board snapshot received from outside is rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("negative board dimensions {width}x{height}")]
    NegativeDimensions { width: i32, height: i32 },

    #[error("blocked grid has {actual} cells, expected {expected} for {width}x{height}")]
    GridSize {
        width: i32,
        height: i32,
        expected: usize,
        actual: usize,
    },

    #[error("{player:?} location {location} is not an occupied cell")]
    BadLocation { player: Player, location: Move },
}

/// Errors surfaced by the HTTP bot
#[derive(Debug, Error)]
pub enum BotError {
    #[error("invalid board: {0}")]
    InvalidBoard(#[from] BoardError),

    #[error("search task failed: {0}")]
    SearchTask(String),
}
