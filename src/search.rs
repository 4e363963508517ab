// Depth-limited adversarial search
//
// Fixed-depth minimax and alpha-beta share one `Searcher`, which owns the
// per-decision counters and borrows the heuristic and the deadline. Every
// recursive entry (root included) checks the deadline first and unwinds with
// `SearchTimeout` through `?`. The iterative deepening driver is the single
// place that recovers from it.

use log::debug;
use serde::Deserialize;

use crate::clock::Deadline;
use crate::error::SearchTimeout;
use crate::game::GameState;
use crate::heuristics::Heuristic;
use crate::profile;
use crate::simple_profiler;
use crate::types::{Move, Player};

/// Which fixed-depth engine the driver runs
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SearchMethod {
    Minimax,
    AlphaBeta,
}

/// Best move of a completed search and the depth it was found at
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchResult {
    pub best_move: Move,
    pub score: f64,
    /// 0 when no depth completed
    pub depth: i32,
}

impl SearchResult {
    pub fn none() -> Self {
        SearchResult {
            best_move: Move::NONE,
            score: f64::NEG_INFINITY,
            depth: 0,
        }
    }
}

/// Counters collected while searching
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SearchStats {
    /// Recursive calls that passed the deadline check
    pub nodes: u64,
    /// Heuristic evaluations
    pub leaves: u64,
    /// Sibling lists abandoned because the window closed
    pub cutoffs: u64,
    /// Set when a leaf still had moves left, i.e. the tree goes deeper
    pub horizon_reached: bool,
}

/// Search state for one decision of `player`
pub struct Searcher<'a, H> {
    player: Player,
    heuristic: &'a H,
    deadline: &'a Deadline<'a>,
    stats: SearchStats,
}

impl<'a, H> Searcher<'a, H> {
    /// # Arguments
    /// * `player` - The maximizing player, normally the player to move at the root
    /// * `heuristic` - Leaf evaluator
    /// * `deadline` - Checked at every recursive entry
    pub fn new(player: Player, heuristic: &'a H, deadline: &'a Deadline<'a>) -> Self {
        Searcher {
            player,
            heuristic,
            deadline,
            stats: SearchStats::default(),
        }
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    fn enter(&mut self) -> Result<(), SearchTimeout> {
        self.deadline.check()?;
        self.stats.nodes += 1;
        Ok(())
    }

    fn evaluate<S>(&mut self, state: &S) -> f64
    where
        S: GameState,
        H: Heuristic<S>,
    {
        self.stats.leaves += 1;
        let (heuristic, player) = (self.heuristic, self.player);
        profile!("eval", { heuristic.evaluate(state, player) })
    }

    /// Returns the heuristic value when `state` is a leaf at this depth
    fn leaf_value<S>(&mut self, state: &S, depth: i32, moves: &[Move]) -> Option<f64>
    where
        S: GameState,
        H: Heuristic<S>,
    {
        if moves.is_empty() {
            return Some(self.evaluate(state));
        }
        if depth <= 0 {
            self.stats.horizon_reached = true;
            return Some(self.evaluate(state));
        }
        None
    }

    fn successor<S: GameState>(state: &S, mv: Move) -> S {
        profile!("forecast", { state.forecast_move(mv) })
    }

    fn moves<S: GameState>(state: &S) -> Vec<Move> {
        profile!("legal_moves", { state.active_moves() })
    }

    /// Fixed-depth minimax from the root
    ///
    /// Returns `Move::NONE` when the root has no legal moves. Otherwise the
    /// first move reaching the maximum score wins, in enumeration order.
    pub fn minimax<S>(&mut self, state: &S, depth: i32) -> Result<SearchResult, SearchTimeout>
    where
        S: GameState,
        H: Heuristic<S>,
    {
        self.enter()?;

        let legal_moves = Self::moves(state);
        if legal_moves.is_empty() {
            return Ok(SearchResult {
                best_move: Move::NONE,
                score: self.evaluate(state),
                depth,
            });
        }

        let mut best = SearchResult {
            best_move: legal_moves[0],
            score: f64::NEG_INFINITY,
            depth,
        };

        for mv in legal_moves {
            let score = self.min_value(&Self::successor(state, mv), depth - 1)?;
            if score > best.score {
                best.score = score;
                best.best_move = mv;
            }
        }

        Ok(best)
    }

    /// Value of a state where the opponent is to move
    pub fn min_value<S>(&mut self, state: &S, depth: i32) -> Result<f64, SearchTimeout>
    where
        S: GameState,
        H: Heuristic<S>,
    {
        self.enter()?;

        let legal_moves = Self::moves(state);
        if let Some(value) = self.leaf_value(state, depth, &legal_moves) {
            return Ok(value);
        }

        let mut lowest = f64::INFINITY;
        for mv in legal_moves {
            lowest = lowest.min(self.max_value(&Self::successor(state, mv), depth - 1)?);
        }
        Ok(lowest)
    }

    /// Value of a state where the searching player is to move
    pub fn max_value<S>(&mut self, state: &S, depth: i32) -> Result<f64, SearchTimeout>
    where
        S: GameState,
        H: Heuristic<S>,
    {
        self.enter()?;

        let legal_moves = Self::moves(state);
        if let Some(value) = self.leaf_value(state, depth, &legal_moves) {
            return Ok(value);
        }

        let mut highest = f64::NEG_INFINITY;
        for mv in legal_moves {
            highest = highest.max(self.min_value(&Self::successor(state, mv), depth - 1)?);
        }
        Ok(highest)
    }

    /// Alpha-beta from the root with an unbounded window
    pub fn alphabeta_full<S>(&mut self, state: &S, depth: i32) -> Result<SearchResult, SearchTimeout>
    where
        S: GameState,
        H: Heuristic<S>,
    {
        self.alphabeta(state, depth, f64::NEG_INFINITY, f64::INFINITY)
    }

    /// Fixed-depth alpha-beta from the root
    ///
    /// The root behaves like any other max layer: once `alpha >= beta` the
    /// current best move is returned without scoring the remaining siblings.
    /// A child scoring at or above the caller's `beta` is therefore returned
    /// immediately.
    pub fn alphabeta<S>(
        &mut self,
        state: &S,
        depth: i32,
        mut alpha: f64,
        beta: f64,
    ) -> Result<SearchResult, SearchTimeout>
    where
        S: GameState,
        H: Heuristic<S>,
    {
        self.enter()?;

        let legal_moves = Self::moves(state);
        if legal_moves.is_empty() {
            return Ok(SearchResult {
                best_move: Move::NONE,
                score: self.evaluate(state),
                depth,
            });
        }

        let mut best = SearchResult {
            best_move: legal_moves[0],
            score: f64::NEG_INFINITY,
            depth,
        };

        for mv in legal_moves {
            let score = self.ab_min_value(&Self::successor(state, mv), depth - 1, alpha, beta)?;
            if score > best.score {
                best.score = score;
                best.best_move = mv;
            }

            alpha = alpha.max(score);
            if alpha >= beta {
                self.record_cutoff();
                break;
            }
        }

        Ok(best)
    }

    /// Min layer with a search window; fail-hard, returns the tightened beta
    pub fn ab_min_value<S>(
        &mut self,
        state: &S,
        depth: i32,
        alpha: f64,
        mut beta: f64,
    ) -> Result<f64, SearchTimeout>
    where
        S: GameState,
        H: Heuristic<S>,
    {
        self.enter()?;

        let legal_moves = Self::moves(state);
        if let Some(value) = self.leaf_value(state, depth, &legal_moves) {
            return Ok(value);
        }

        for mv in legal_moves {
            let value = self.ab_max_value(&Self::successor(state, mv), depth - 1, alpha, beta)?;
            beta = beta.min(value);
            if beta <= alpha {
                self.record_cutoff();
                break;
            }
        }
        Ok(beta)
    }

    /// Max layer with a search window; fail-hard, returns the tightened alpha
    pub fn ab_max_value<S>(
        &mut self,
        state: &S,
        depth: i32,
        mut alpha: f64,
        beta: f64,
    ) -> Result<f64, SearchTimeout>
    where
        S: GameState,
        H: Heuristic<S>,
    {
        self.enter()?;

        let legal_moves = Self::moves(state);
        if let Some(value) = self.leaf_value(state, depth, &legal_moves) {
            return Ok(value);
        }

        for mv in legal_moves {
            let value = self.ab_min_value(&Self::successor(state, mv), depth - 1, alpha, beta)?;
            alpha = alpha.max(value);
            if alpha >= beta {
                self.record_cutoff();
                break;
            }
        }
        Ok(alpha)
    }

    fn record_cutoff(&mut self) {
        self.stats.cutoffs += 1;
        simple_profiler::record_cutoff();
    }

    /// Runs `method` at depth 1, 2, 3, ... until the deadline cancels a search
    ///
    /// Returns the result of the last fully completed depth, or
    /// `SearchResult::none()` if depth 1 never completed. The loop also stops
    /// once a completed depth never reached the horizon (the whole tree was
    /// searched) or once `max_depth` has been searched.
    pub fn iterative_deepening<S>(
        &mut self,
        state: &S,
        method: SearchMethod,
        max_depth: Option<i32>,
    ) -> SearchResult
    where
        S: GameState,
        H: Heuristic<S>,
    {
        let mut best = SearchResult::none();
        let mut depth = 1;

        loop {
            if max_depth.map_or(false, |max| depth > max) {
                debug!("Reached max depth {}", depth - 1);
                break;
            }

            self.stats.horizon_reached = false;
            let outcome = match method {
                SearchMethod::Minimax => self.minimax(state, depth),
                SearchMethod::AlphaBeta => self.alphabeta_full(state, depth),
            };

            match outcome {
                Ok(result) => {
                    debug!(
                        "Depth {} complete: {} (score: {}, nodes: {})",
                        depth, result.best_move, result.score, self.stats.nodes
                    );
                    best = result;
                    if !self.stats.horizon_reached {
                        debug!("Game tree exhausted at depth {}", depth);
                        break;
                    }
                    depth += 1;
                }
                Err(SearchTimeout) => {
                    debug!(
                        "Search timed out during depth {} (threshold {} ms)",
                        depth,
                        self.deadline.threshold_ms()
                    );
                    break;
                }
            }
        }

        best
    }
}
