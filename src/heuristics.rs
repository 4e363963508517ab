// Heuristic evaluation functions
//
// Every heuristic returns +inf for a decided win, -inf for a decided loss and
// a finite comparative score otherwise. The search core only relies on that
// contract, never on a particular formula.

use serde::Deserialize;

use crate::board::Board;
use crate::game::GameState;
use crate::types::Player;

/// Scores a state from the point of view of `player`
pub trait Heuristic<S: GameState> {
    fn evaluate(&self, state: &S, player: Player) -> f64;
}

impl<S, F> Heuristic<S> for F
where
    S: GameState,
    F: Fn(&S, Player) -> f64,
{
    fn evaluate(&self, state: &S, player: Player) -> f64 {
        self(state, player)
    }
}

/// Selectable Isolation heuristics
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HeuristicKind {
    /// Only distinguishes decided states
    Null,
    /// Number of moves available to the player
    OpenMove,
    /// Squared distance of the player from the board centre
    Center,
    /// Own moves minus opponent moves
    Improved,
    /// Own moves weighted by `theta` minus opponent moves
    Defensive { theta: f64 },
    /// Own moves minus opponent moves weighted by `theta`
    Aggressive { theta: f64 },
    /// Shifts from mobility to aggression as the board fills up
    Decay { theta: f64 },
}

impl HeuristicKind {
    pub fn name(&self) -> &'static str {
        match self {
            HeuristicKind::Null => "null",
            HeuristicKind::OpenMove => "open_move",
            HeuristicKind::Center => "center",
            HeuristicKind::Improved => "improved",
            HeuristicKind::Defensive { .. } => "defensive",
            HeuristicKind::Aggressive { .. } => "aggressive",
            HeuristicKind::Decay { .. } => "decay",
        }
    }
}

impl Heuristic<Board> for HeuristicKind {
    fn evaluate(&self, board: &Board, player: Player) -> f64 {
        let decided = board.utility(player);
        if decided != 0.0 {
            return decided;
        }

        match *self {
            HeuristicKind::Null => 0.0,
            HeuristicKind::OpenMove => own_moves(board, player),
            HeuristicKind::Center => center_distance(board, player),
            HeuristicKind::Improved => own_moves(board, player) - opponent_moves(board, player),
            HeuristicKind::Defensive { theta } => {
                theta * own_moves(board, player) - opponent_moves(board, player)
            }
            HeuristicKind::Aggressive { theta } => {
                own_moves(board, player) - theta * opponent_moves(board, player)
            }
            HeuristicKind::Decay { theta } => {
                let ratio = board.filled_ratio();
                (1.0 - ratio) * theta * own_moves(board, player)
                    - ratio * opponent_moves(board, player)
            }
        }
    }
}

fn own_moves(board: &Board, player: Player) -> f64 {
    board.legal_moves(player).len() as f64
}

fn opponent_moves(board: &Board, player: Player) -> f64 {
    board.legal_moves(board.opponent(player)).len() as f64
}

fn center_distance(board: &Board, player: Player) -> f64 {
    match board.player_location(player) {
        Some(loc) => {
            let half_w = board.width as f64 / 2.0;
            let half_h = board.height as f64 / 2.0;
            (half_h - loc.row() as f64).powi(2) + (half_w - loc.col() as f64).powi(2)
        }
        None => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Move;

    /// 5x5, player one at the centre, player two in a corner, player one to move
    fn midgame() -> Board {
        let mut board = Board::new(5, 5);
        board.apply_move(Move(2, 2));
        board.apply_move(Move(0, 0));
        board
    }

    #[test]
    fn test_mobility_heuristics() {
        let board = midgame();
        // player one has 8 knight moves, player two only (1, 2) and (2, 1)
        assert_eq!(board.legal_moves(Player::Two).len(), 2);

        assert_eq!(HeuristicKind::OpenMove.evaluate(&board, Player::One), 8.0);
        assert_eq!(HeuristicKind::Improved.evaluate(&board, Player::One), 6.0);
        assert_eq!(HeuristicKind::Improved.evaluate(&board, Player::Two), -6.0);
        assert_eq!(
            HeuristicKind::Defensive { theta: 2.0 }.evaluate(&board, Player::One),
            14.0
        );
        assert_eq!(
            HeuristicKind::Aggressive { theta: 2.0 }.evaluate(&board, Player::One),
            4.0
        );
    }

    #[test]
    fn test_decay_weights_by_filled_ratio() {
        let board = midgame();
        let ratio = 2.0 / 25.0;
        let expected = (1.0 - ratio) * 3.0 * 8.0 - ratio * 2.0;
        let score = HeuristicKind::Decay { theta: 3.0 }.evaluate(&board, Player::One);
        assert!((score - expected).abs() < 1e-9);
    }

    #[test]
    fn test_center_distance() {
        let board = midgame();
        assert_eq!(HeuristicKind::Center.evaluate(&board, Player::One), 0.5);
        assert_eq!(HeuristicKind::Center.evaluate(&board, Player::Two), 12.5);
    }

    #[test]
    fn test_decided_states_are_infinite_for_every_kind() {
        // 3x3: the centre has no knight moves at all
        let mut board = Board::new(3, 3);
        board.apply_move(Move(1, 1));
        board.apply_move(Move(0, 0));

        let kinds = [
            HeuristicKind::Null,
            HeuristicKind::OpenMove,
            HeuristicKind::Center,
            HeuristicKind::Improved,
            HeuristicKind::Defensive { theta: 2.0 },
            HeuristicKind::Aggressive { theta: 2.0 },
            HeuristicKind::Decay { theta: 3.0 },
        ];
        for kind in kinds.iter() {
            assert_eq!(kind.evaluate(&board, Player::One), f64::NEG_INFINITY);
            assert_eq!(kind.evaluate(&board, Player::Two), f64::INFINITY);
        }
    }

    #[test]
    fn test_closures_are_heuristics() {
        let board = midgame();
        let constant = |_: &Board, _: Player| 7.0;
        assert_eq!(constant.evaluate(&board, Player::One), 7.0);
    }

    #[test]
    fn test_kind_parses_from_toml() {
        #[derive(Deserialize)]
        struct Wrapper {
            heuristic: HeuristicKind,
        }
        let parsed: Wrapper =
            toml::from_str("[heuristic]\nkind = \"defensive\"\ntheta = 2.0\n").unwrap();
        assert_eq!(parsed.heuristic, HeuristicKind::Defensive { theta: 2.0 });
    }
}
