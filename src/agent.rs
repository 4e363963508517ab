// Move-choosing players
//
// `IsolationAgent` packages a search configuration and a heuristic. It is the
// only caller of the search core, and it picks between the iterative
// deepening driver and a single fixed-depth search.

use log::{debug, info};
use rand::seq::IndexedRandom;
use std::time::Instant;

use crate::board::Board;
use crate::clock::Deadline;
use crate::config::SearchConfig;
use crate::game::GameState;
use crate::heuristics::Heuristic;
use crate::search::{SearchMethod, SearchResult, Searcher};
use crate::types::Move;

/// A player that can be asked for a move on an Isolation board
pub trait Agent: Send + Sync {
    fn name(&self) -> &str;

    /// Chooses a move for the active player
    ///
    /// # Arguments
    /// * `board` - Current snapshot, never mutated
    /// * `time_left` - Milliseconds left in this turn
    ///
    /// # Returns
    /// A legal move, or `Move::NONE` if none was found in time
    fn get_move(&self, board: &Board, time_left: &dyn Fn() -> f64) -> Move;
}

/// Outcome of one decision, for logging and replay
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    pub best_move: Move,
    pub score: f64,
    /// Deepest fully completed depth, 0 if none
    pub depth: i32,
    pub nodes: u64,
    pub elapsed_ms: u128,
}

/// Minimax / alpha-beta player
pub struct IsolationAgent<H> {
    name: String,
    config: SearchConfig,
    heuristic: H,
}

impl<H> IsolationAgent<H> {
    pub fn new(name: impl Into<String>, config: SearchConfig, heuristic: H) -> Self {
        IsolationAgent {
            name: name.into(),
            config,
            heuristic,
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Runs one full decision on `state`
    ///
    /// Iterative agents return the deepest completed result. Fixed-depth
    /// agents run a single search at `search_depth` and return `Move::NONE`
    /// if it times out.
    pub fn decide<S>(&self, state: &S, time_left: &dyn Fn() -> f64) -> Decision
    where
        S: GameState,
        H: Heuristic<S>,
    {
        let start = Instant::now();
        let deadline = Deadline::new(time_left, self.config.timer_threshold_ms);
        let mut searcher = Searcher::new(state.active_player(), &self.heuristic, &deadline);

        let result = if self.config.iterative {
            searcher.iterative_deepening(state, self.config.method, self.config.max_depth)
        } else {
            let depth = self.config.search_depth;
            let outcome = match self.config.method {
                SearchMethod::Minimax => searcher.minimax(state, depth),
                SearchMethod::AlphaBeta => searcher.alphabeta_full(state, depth),
            };
            outcome.unwrap_or_else(|_| {
                debug!("{}: fixed-depth search timed out", self.name);
                SearchResult::none()
            })
        };

        Decision {
            best_move: result.best_move,
            score: result.score,
            depth: result.depth,
            nodes: searcher.stats().nodes,
            elapsed_ms: start.elapsed().as_millis(),
        }
    }
}

impl<H> Agent for IsolationAgent<H>
where
    H: Heuristic<Board> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn get_move(&self, board: &Board, time_left: &dyn Fn() -> f64) -> Move {
        let decision = self.decide(board, time_left);
        info!(
            "{}: chose {} (score: {}, depth: {}, nodes: {}, time: {}ms)",
            self.name,
            decision.best_move,
            decision.score,
            decision.depth,
            decision.nodes,
            decision.elapsed_ms
        );
        decision.best_move
    }
}

/// Plays a uniformly random legal move
#[derive(Debug, Default, Clone)]
pub struct RandomAgent;

impl Agent for RandomAgent {
    fn name(&self) -> &str {
        "Random"
    }

    fn get_move(&self, board: &Board, _time_left: &dyn Fn() -> f64) -> Move {
        board
            .active_moves()
            .choose(&mut rand::rng())
            .copied()
            .unwrap_or(Move::NONE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heuristics::HeuristicKind;
    use crate::types::Player;

    fn plenty() -> f64 {
        1.0e9
    }

    fn midgame() -> Board {
        let mut board = Board::new(5, 5);
        board.apply_move(Move(2, 2));
        board.apply_move(Move(0, 0));
        board
    }

    #[test]
    fn test_fixed_depth_agent_matches_direct_search() {
        let board = midgame();
        let agent = IsolationAgent::new("MM", SearchConfig::minimax(2), HeuristicKind::Improved);
        let decision = agent.decide(&board, &plenty);

        let deadline = Deadline::new(&plenty, 10.0);
        let mut searcher = Searcher::new(Player::One, &HeuristicKind::Improved, &deadline);
        let expected = searcher.minimax(&board, 2).unwrap();

        assert_eq!(decision.best_move, expected.best_move);
        assert_eq!(decision.depth, 2);
        assert_eq!(decision.nodes, searcher.stats().nodes);
    }

    #[test]
    fn test_fixed_depth_timeout_returns_sentinel() {
        let board = midgame();
        let agent = IsolationAgent::new("MM", SearchConfig::minimax(3), HeuristicKind::Improved);
        let expired = || 5.0;
        assert_eq!(agent.get_move(&board, &expired), Move::NONE);
    }

    #[test]
    fn test_random_agent_plays_legal_moves() {
        let board = midgame();
        for _ in 0..20 {
            let mv = RandomAgent.get_move(&board, &plenty);
            assert!(board.move_is_legal(mv));
        }
    }

    #[test]
    fn test_random_agent_without_moves_returns_sentinel() {
        let mut board = Board::new(3, 3);
        board.apply_move(Move(1, 1));
        board.apply_move(Move(0, 0));
        assert_eq!(RandomAgent.get_move(&board, &plenty), Move::NONE);
    }
}
