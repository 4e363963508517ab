// Isolation rules engine
//
// Players move like chess knights. The first move of each player may land on
// any blank cell. Every cell a player lands on stays blocked for the rest of
// the game, and a player with no legal move on their turn loses.

use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use std::fmt;

use crate::error::BoardError;
use crate::game::GameState;
use crate::types::{Move, Player};

/// Knight offsets in the order moves are enumerated
pub const KNIGHT_OFFSETS: [(i32, i32); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

/// Snapshot of an Isolation game
///
/// Deserialized boards are checked with [`Board::validate`], so a snapshot
/// from a request or a log can never index outside its grid.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(try_from = "BoardData")]
pub struct Board {
    pub width: i32,
    pub height: i32,
    /// Row-major, `true` once a cell has been occupied
    blocked: Vec<bool>,
    locations: [Option<Move>; 2],
    active: Player,
    move_count: u32,
}

/// Wire shape of `Board` before validation
#[derive(Deserialize)]
struct BoardData {
    width: i32,
    height: i32,
    blocked: Vec<bool>,
    locations: [Option<Move>; 2],
    active: Player,
    move_count: u32,
}

impl TryFrom<BoardData> for Board {
    type Error = BoardError;

    fn try_from(data: BoardData) -> Result<Self, Self::Error> {
        let board = Board {
            width: data.width,
            height: data.height,
            blocked: data.blocked,
            locations: data.locations,
            active: data.active,
            move_count: data.move_count,
        };
        board.validate()?;
        Ok(board)
    }
}

impl Board {
    /// Creates an empty board with player one to move
    pub fn new(width: i32, height: i32) -> Self {
        Board {
            width,
            height,
            blocked: vec![false; (width.max(0) * height.max(0)) as usize],
            locations: [None, None],
            active: Player::One,
            move_count: 0,
        }
    }

    fn index(&self, mv: Move) -> Option<usize> {
        if mv.row() < 0 || mv.row() >= self.height || mv.col() < 0 || mv.col() >= self.width {
            return None;
        }
        Some((mv.row() * self.width + mv.col()) as usize)
    }

    /// Checks that the grid matches the dimensions and both placed players
    /// stand on occupied cells
    pub fn validate(&self) -> Result<(), BoardError> {
        if self.width < 0 || self.height < 0 {
            return Err(BoardError::NegativeDimensions {
                width: self.width,
                height: self.height,
            });
        }

        let expected = self.width as usize * self.height as usize;
        if self.blocked.len() != expected {
            return Err(BoardError::GridSize {
                width: self.width,
                height: self.height,
                expected,
                actual: self.blocked.len(),
            });
        }

        for &player in [Player::One, Player::Two].iter() {
            if let Some(location) = self.player_location(player) {
                if self.index(location).map_or(true, |idx| !self.blocked[idx]) {
                    return Err(BoardError::BadLocation { player, location });
                }
            }
        }
        Ok(())
    }

    /// True if `mv` is an in-bounds cell that has never been occupied
    pub fn is_blank(&self, mv: Move) -> bool {
        self.index(mv).map_or(false, |idx| !self.blocked[idx])
    }

    /// True if the active player may play `mv`
    pub fn move_is_legal(&self, mv: Move) -> bool {
        self.active_moves().contains(&mv)
    }

    /// All blank cells, columns outermost
    pub fn blank_spaces(&self) -> Vec<Move> {
        let mut blanks = Vec::new();
        for col in 0..self.width {
            for row in 0..self.height {
                let cell = Move(row, col);
                if self.is_blank(cell) {
                    blanks.push(cell);
                }
            }
        }
        blanks
    }

    pub fn player_location(&self, player: Player) -> Option<Move> {
        self.locations[player.index()]
    }

    pub fn inactive_player(&self) -> Player {
        self.active.opponent()
    }

    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    /// Number of cells on the board
    pub fn area(&self) -> usize {
        self.blocked.len()
    }

    /// Fraction of the board already occupied
    pub fn filled_ratio(&self) -> f64 {
        if self.blocked.is_empty() {
            return 0.0;
        }
        let filled = self.blocked.iter().filter(|&&b| b).count();
        filled as f64 / self.blocked.len() as f64
    }

    /// Plays `mv` for the active player in place
    ///
    /// Callers are expected to check legality first; the search only ever
    /// goes through `forecast_move`.
    pub fn apply_move(&mut self, mv: Move) {
        if let Some(idx) = self.index(mv) {
            self.blocked[idx] = true;
        }
        self.locations[self.active.index()] = Some(mv);
        self.active = self.active.opponent();
        self.move_count += 1;
    }

    /// `+inf` for a decided win, `-inf` for a decided loss, 0 otherwise
    pub fn utility(&self, player: Player) -> f64 {
        if self.is_winner(player) {
            f64::INFINITY
        } else if self.is_loser(player) {
            f64::NEG_INFINITY
        } else {
            0.0
        }
    }

    fn moves_from(&self, location: Option<Move>) -> Vec<Move> {
        match location {
            None => self.blank_spaces(),
            Some(from) => KNIGHT_OFFSETS
                .iter()
                .map(|&(dr, dc)| from.offset(dr, dc))
                .filter(|&to| self.is_blank(to))
                .collect(),
        }
    }
}

impl GameState for Board {
    fn active_player(&self) -> Player {
        self.active
    }

    fn legal_moves(&self, player: Player) -> Vec<Move> {
        self.moves_from(self.player_location(player))
    }

    fn forecast_move(&self, mv: Move) -> Self {
        let mut next = self.clone();
        next.apply_move(mv);
        next
    }

    fn is_winner(&self, player: Player) -> bool {
        player == self.inactive_player() && self.active_moves().is_empty()
    }

    fn is_loser(&self, player: Player) -> bool {
        player == self.active && self.active_moves().is_empty()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.height {
            write!(f, " |")?;
            for col in 0..self.width {
                let cell = Move(row, col);
                let symbol = if self.locations[0] == Some(cell) {
                    Player::One.symbol()
                } else if self.locations[1] == Some(cell) {
                    Player::Two.symbol()
                } else if self.is_blank(cell) {
                    ' '
                } else {
                    '-'
                };
                write!(f, " {} |", symbol)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_move_can_land_anywhere() {
        let board = Board::new(3, 2);
        let moves = board.active_moves();
        assert_eq!(moves.len(), 6);
        // columns outermost
        assert_eq!(moves[0], Move(0, 0));
        assert_eq!(moves[1], Move(1, 0));
        assert_eq!(moves[2], Move(0, 1));
    }

    #[test]
    fn test_knight_moves_from_center_of_5x5() {
        let mut board = Board::new(5, 5);
        board.apply_move(Move(2, 2));
        board.apply_move(Move(0, 0));

        let moves = board.legal_moves(Player::One);
        assert_eq!(
            moves,
            vec![
                Move(0, 1),
                Move(0, 3),
                Move(1, 0),
                Move(1, 4),
                Move(3, 0),
                Move(3, 4),
                Move(4, 1),
                Move(4, 3)
            ]
        );
    }

    #[test]
    fn test_occupied_cells_stay_blocked() {
        let mut board = Board::new(5, 5);
        board.apply_move(Move(2, 2));
        board.apply_move(Move(0, 1));
        board.apply_move(Move(0, 3));

        assert!(!board.is_blank(Move(2, 2)));
        assert!(!board.is_blank(Move(0, 3)));
        // player two at (0, 1) cannot jump onto player one's old cell
        assert!(!board.legal_moves(Player::Two).contains(&Move(2, 2)));
        assert_eq!(board.blank_spaces().len(), 22);
    }

    #[test]
    fn test_forecast_leaves_original_untouched() {
        let board = Board::new(4, 4);
        let next = board.forecast_move(Move(1, 1));

        assert_eq!(board.move_count(), 0);
        assert!(board.is_blank(Move(1, 1)));
        assert_eq!(board.active_player(), Player::One);
        assert_eq!(next.active_player(), Player::Two);
        assert_eq!(next.player_location(Player::One), Some(Move(1, 1)));
    }

    #[test]
    fn test_out_of_bounds_is_not_blank() {
        let board = Board::new(3, 3);
        assert!(!board.is_blank(Move(-1, 0)));
        assert!(!board.is_blank(Move(0, 3)));
        assert!(!board.is_blank(Move::NONE));
    }

    #[test]
    fn test_utility_is_infinite_only_when_decided() {
        let mut board = Board::new(3, 3);
        board.apply_move(Move(0, 0));
        board.apply_move(Move(2, 2));
        assert_eq!(board.utility(Player::One), 0.0);

        // the centre of a 3x3 board has no knight moves
        let mut stuck = Board::new(3, 3);
        stuck.apply_move(Move(1, 1));
        stuck.apply_move(Move(0, 0));
        assert_eq!(stuck.utility(Player::One), f64::NEG_INFINITY);
        assert_eq!(stuck.utility(Player::Two), f64::INFINITY);
    }

    #[test]
    fn test_deserialized_board_round_trips() {
        let mut board = Board::new(5, 4);
        board.apply_move(Move(1, 3));
        let json = serde_json::to_string(&board).unwrap();
        let parsed: Board = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, board);
    }

    #[test]
    fn test_short_grid_is_rejected() {
        let json = r#"{"width":3,"height":3,"blocked":[false,false,false,false],
            "locations":[null,null],"active":"one","move_count":0}"#;
        let err = serde_json::from_str::<Board>(json).unwrap_err();
        assert!(err.to_string().contains("expected 9"), "{}", err);
    }

    #[test]
    fn test_location_on_blank_cell_is_rejected() {
        let json = r#"{"width":2,"height":2,"blocked":[false,false,false,false],
            "locations":[[0,1],null],"active":"two","move_count":1}"#;
        assert!(serde_json::from_str::<Board>(json).is_err());
    }

    #[test]
    fn test_validate_catches_resized_board() {
        let mut board = Board::new(3, 3);
        assert_eq!(board.validate(), Ok(()));

        board.width = 4;
        assert!(matches!(
            board.validate(),
            Err(BoardError::GridSize { expected: 12, actual: 9, .. })
        ));

        board.width = -1;
        assert!(matches!(
            board.validate(),
            Err(BoardError::NegativeDimensions { .. })
        ));
    }

    #[test]
    fn test_display_marks_players_and_blocked_cells() {
        let mut board = Board::new(3, 3);
        board.apply_move(Move(0, 0));
        board.apply_move(Move(2, 1));
        board.apply_move(Move(1, 2));

        let rendered = board.to_string();
        assert_eq!(rendered, " | - |   |   |\n |   |   | 1 |\n |   | 2 |   |\n");
    }
}
