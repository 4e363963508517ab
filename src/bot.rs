// Isolation bot behind the HTTP API
//
// The search itself is synchronous and CPU-bound, so every decision runs on
// tokio's blocking pool while the request handler awaits it. The agent is
// responsible for returning inside the budget: its deadline threshold aborts
// the search early enough to unwind.

use log::info;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::agent::{Agent, Decision, IsolationAgent};
use crate::clock::TurnTimer;
use crate::config::Config;
use crate::debug_logger::DebugLogger;
use crate::error::BotError;
use crate::heuristics::HeuristicKind;
use crate::types::GameRequest;

/// Isolation Bot with OOP-style API
/// Takes static configuration dependencies and exposes methods corresponding to API endpoints
pub struct Bot {
    config: Config,
    agent: Arc<IsolationAgent<HeuristicKind>>,
    logger: DebugLogger,
}

impl Bot {
    /// Creates a new Bot instance with the given configuration
    ///
    /// # Arguments
    /// * `config` - Static configuration that does not change during the bot's lifetime
    /// * `logger` - Decision log, possibly disabled
    pub fn new(config: Config, logger: DebugLogger) -> Self {
        let agent = IsolationAgent::new(config.agent_name(), config.search, config.heuristic);
        Bot {
            config,
            agent: Arc::new(agent),
            logger,
        }
    }

    /// Returns bot metadata
    /// Corresponds to GET / endpoint
    pub fn info(&self) -> Value {
        info!("INFO");

        json!({
            "apiversion": "1",
            "game": "isolation",
            "agent": self.agent.name(),
            "heuristic": self.config.heuristic.name(),
            "iterative": self.config.search.iterative,
        })
    }

    /// Called when a game starts
    /// Corresponds to POST /start endpoint
    pub fn start(&self, req: &GameRequest) {
        info!(
            "GAME START {} ({}x{})",
            req.game_id, req.board.width, req.board.height
        );
    }

    /// Called when a game ends
    /// Corresponds to POST /end endpoint
    pub fn end(&self, req: &GameRequest) {
        info!("GAME OVER {} after {} turns", req.game_id, req.turn);
    }

    /// Per-move budget for a request, after network overhead
    pub fn budget_ms(&self, req: &GameRequest) -> u64 {
        match req.timeout_ms {
            Some(timeout) => timeout.saturating_sub(self.config.timing.network_overhead_ms),
            None => self.config.timing.effective_budget_ms(),
        }
    }

    /// Computes and returns the next move
    /// Corresponds to POST /move endpoint
    ///
    /// # Returns
    /// * `Value` - JSON with the chosen `move` as `[row, col]` (`[-1, -1]` if
    ///   there is none) and the completed search `depth`
    /// * `BotError::InvalidBoard` if the board fails validation
    pub async fn get_move(&self, req: &GameRequest) -> Result<Value, BotError> {
        req.board.validate()?;

        let budget = self.budget_ms(req);
        info!("Turn {}: Computing move ({}ms budget)", req.turn, budget);

        let agent = self.agent.clone();
        let board = req.board.clone();
        let decision: Decision = tokio::task::spawn_blocking(move || {
            let timer = TurnTimer::start(budget);
            agent.decide(&board, &|| timer.time_left())
        })
        .await
        .map_err(|e| BotError::SearchTask(e.to_string()))?;

        info!(
            "Turn {}: Chose {} (score: {}, depth: {}, nodes: {}, time: {}ms)",
            req.turn,
            decision.best_move,
            decision.score,
            decision.depth,
            decision.nodes,
            decision.elapsed_ms
        );

        self.logger.log_decision(
            req.turn,
            req.board.clone(),
            decision.best_move,
            decision.depth,
        );

        Ok(json!({
            "move": decision.best_move,
            "depth": decision.depth,
        }))
    }
}
