// Core value types shared by the rules engine, the search and the API

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::board::Board;

/// A target cell as `(row, col)`, or the `NONE` sentinel
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Move(pub i32, pub i32);

impl Move {
    /// Returned when the player to move has no legal move
    pub const NONE: Move = Move(-1, -1);

    pub fn row(&self) -> i32 {
        self.0
    }

    pub fn col(&self) -> i32 {
        self.1
    }

    pub fn is_none(&self) -> bool {
        *self == Move::NONE
    }

    /// Offsets this cell by `(drow, dcol)`
    pub fn offset(&self, drow: i32, dcol: i32) -> Move {
        Move(self.0 + drow, self.1 + dcol)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            write!(f, "none")
        } else {
            write!(f, "({}, {})", self.0, self.1)
        }
    }
}

/// Seat identity of the two players
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone, Copy, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Player {
    One,
    Two,
}

impl Player {
    pub fn opponent(&self) -> Player {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// Index into per-seat arrays
    pub fn index(&self) -> usize {
        match self {
            Player::One => 0,
            Player::Two => 1,
        }
    }

    /// Symbol used when rendering the board
    pub fn symbol(&self) -> char {
        match self {
            Player::One => '1',
            Player::Two => '2',
        }
    }
}

/// Request body for the `/start`, `/move` and `/end` endpoints
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct GameRequest {
    pub game_id: String,
    pub turn: u32,
    pub board: Board,
    /// Overrides the configured per-move budget
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}
