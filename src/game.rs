// Abstract view of a game snapshot consumed by the search core
//
// The search never inspects board cells directly. Everything it needs about
// the rules goes through this trait.

use crate::types::{Move, Player};

/// Immutable two-player game snapshot
///
/// Implementations must be pure: `forecast_move` returns a new snapshot and
/// leaves `self` untouched, so sibling branches never observe each other.
pub trait GameState: Clone {
    /// The seat whose turn it is in this snapshot
    fn active_player(&self) -> Player;

    /// Legal moves for `player`, in a deterministic order. Empty if none.
    fn legal_moves(&self, player: Player) -> Vec<Move>;

    /// Successor snapshot after the active player plays `mv`
    fn forecast_move(&self, mv: Move) -> Self;

    fn is_winner(&self, player: Player) -> bool;

    fn is_loser(&self, player: Player) -> bool;

    fn opponent(&self, player: Player) -> Player {
        player.opponent()
    }

    /// Legal moves of the player to move
    fn active_moves(&self) -> Vec<Move> {
        self.legal_moves(self.active_player())
    }
}
