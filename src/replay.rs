// Replay module for analyzing logged decisions
//
// This module provides functionality to:
// 1. Parse JSONL decision logs
// 2. Re-run the agent on each logged board
// 3. Compare logged vs recomputed moves
// 4. Generate analysis reports

use log::{info, warn};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::agent::{Decision, IsolationAgent};
use crate::board::Board;
use crate::clock::TurnTimer;
use crate::config::Config;
use crate::debug_logger::LogEntry;
use crate::heuristics::HeuristicKind;
use crate::types::Move;

/// Result of replaying a single turn
#[derive(Debug, Clone)]
pub struct ReplayResult {
    pub turn: u32,
    pub original_move: Move,
    pub replayed_move: Move,
    pub matches: bool,
    pub original_depth: i32,
    pub replayed_depth: i32,
    pub replayed_score: f64,
    pub computation_time_ms: u128,
}

/// Statistics for a complete replay session
#[derive(Debug, Default)]
pub struct ReplayStats {
    pub total_turns: usize,
    pub matches: usize,
    pub mismatches: usize,
    pub match_rate: f64,
}

/// Replay engine for analyzing decision logs
pub struct ReplayEngine {
    config: Config,
    agent: IsolationAgent<HeuristicKind>,
    verbose: bool,
}

impl ReplayEngine {
    /// Creates a new replay engine with the given configuration
    pub fn new(config: Config, verbose: bool) -> Self {
        let agent = IsolationAgent::new("replay", config.search, config.heuristic);
        ReplayEngine {
            config,
            agent,
            verbose,
        }
    }

    /// Loads all log entries from a JSONL file
    pub fn load_log_file<P: AsRef<Path>>(&self, log_path: P) -> Result<Vec<LogEntry>, String> {
        let file =
            File::open(log_path.as_ref()).map_err(|e| format!("Failed to open log file: {}", e))?;

        let reader = BufReader::new(file);
        let mut entries = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| format!("Failed to read line {}: {}", line_num + 1, e))?;

            if line.trim().is_empty() {
                continue;
            }

            let entry: LogEntry = serde_json::from_str(&line)
                .map_err(|e| format!("Failed to parse JSON on line {}: {}", line_num + 1, e))?;

            entries.push(entry);
        }

        info!("Loaded {} log entries", entries.len());
        Ok(entries)
    }

    /// Re-runs the agent on a single board under the configured budget
    pub fn replay_turn(&self, board: &Board) -> Result<Decision, String> {
        board
            .validate()
            .map_err(|e| format!("Invalid board: {}", e))?;
        if board.area() == 0 {
            return Err(format!(
                "Board has no cells ({}x{})",
                board.width, board.height
            ));
        }

        let timer = TurnTimer::start(self.config.timing.effective_budget_ms());
        Ok(self.agent.decide(board, &|| timer.time_left()))
    }

    /// Replays a single log entry and compares the result
    pub fn replay_entry(&self, entry: &LogEntry) -> Result<ReplayResult, String> {
        if self.verbose {
            info!("Replaying turn {}...", entry.turn);
        }

        let decision = self.replay_turn(&entry.board)?;
        let matches = entry.chosen_move == decision.best_move;

        let result = ReplayResult {
            turn: entry.turn,
            original_move: entry.chosen_move,
            replayed_move: decision.best_move,
            matches,
            original_depth: entry.depth,
            replayed_depth: decision.depth,
            replayed_score: decision.score,
            computation_time_ms: decision.elapsed_ms,
        };

        if self.verbose {
            if matches {
                info!(
                    "Turn {}: ✓ MATCH - {} (score: {}, depth: {}, time: {}ms)",
                    entry.turn,
                    decision.best_move,
                    decision.score,
                    decision.depth,
                    decision.elapsed_ms
                );
            } else {
                warn!(
                    "Turn {}: ✗ MISMATCH - Original: {} (depth {}), Replayed: {} (score: {}, depth: {}, time: {}ms)",
                    entry.turn,
                    entry.chosen_move,
                    entry.depth,
                    decision.best_move,
                    decision.score,
                    decision.depth,
                    decision.elapsed_ms
                );
            }
        }

        Ok(result)
    }

    /// Replays all entries in a log file
    pub fn replay_all(&self, entries: &[LogEntry]) -> Vec<ReplayResult> {
        let mut results = Vec::new();

        for entry in entries {
            match self.replay_entry(entry) {
                Ok(result) => results.push(result),
                Err(e) => {
                    warn!("Failed to replay turn {}: {}", entry.turn, e);
                }
            }
        }

        results
    }

    /// Replays specific turns from a log file
    pub fn replay_turns(
        &self,
        entries: &[LogEntry],
        turn_numbers: &[u32],
    ) -> Result<Vec<ReplayResult>, String> {
        let mut results = Vec::new();

        for turn_num in turn_numbers {
            let entry = entries
                .iter()
                .find(|e| e.turn == *turn_num)
                .ok_or_else(|| format!("Turn {} not found in log file", turn_num))?;

            match self.replay_entry(entry) {
                Ok(result) => results.push(result),
                Err(e) => {
                    warn!("Failed to replay turn {}: {}", turn_num, e);
                }
            }
        }

        Ok(results)
    }

    /// Generates statistics from replay results
    pub fn generate_stats(&self, results: &[ReplayResult]) -> ReplayStats {
        let total_turns = results.len();
        let matches = results.iter().filter(|r| r.matches).count();
        let mismatches = total_turns - matches;
        let match_rate = if total_turns > 0 {
            (matches as f64 / total_turns as f64) * 100.0
        } else {
            0.0
        };

        ReplayStats {
            total_turns,
            matches,
            mismatches,
            match_rate,
        }
    }

    /// Prints a detailed report of replay results
    pub fn print_report(&self, results: &[ReplayResult]) {
        let stats = self.generate_stats(results);

        println!("\n═══════════════════════════════════════════════════════════");
        println!("                    REPLAY REPORT");
        println!("═══════════════════════════════════════════════════════════");
        println!("Total Turns:    {}", stats.total_turns);
        println!("Matches:        {} ({:.1}%)", stats.matches, stats.match_rate);
        println!("Mismatches:     {}", stats.mismatches);
        println!("═══════════════════════════════════════════════════════════\n");

        if !results.is_empty() {
            let avg_time: f64 = results.iter().map(|r| r.computation_time_ms as f64).sum::<f64>()
                / results.len() as f64;
            let avg_depth: f64 =
                results.iter().map(|r| r.replayed_depth as f64).sum::<f64>() / results.len() as f64;

            println!("Average Search Depth:       {:.1}", avg_depth);
            println!("Average Computation Time:   {:.1}ms\n", avg_time);
        }

        let mismatches: Vec<_> = results.iter().filter(|r| !r.matches).collect();
        if !mismatches.is_empty() {
            println!("═══════════════════════════════════════════════════════════");
            println!("                  DETAILED MISMATCHES");
            println!("═══════════════════════════════════════════════════════════");

            for result in mismatches {
                println!(
                    "Turn {}: {} → {} (depth {} → {}, time: {}ms)",
                    result.turn,
                    result.original_move,
                    result.replayed_move,
                    result.original_depth,
                    result.replayed_depth,
                    result.computation_time_ms
                );
            }
            println!();
        }
    }

    /// Validates that specific expected moves were made
    pub fn validate_expected_moves(
        &self,
        entries: &[LogEntry],
        expected_moves: &[(u32, Vec<Move>)], // (turn, acceptable_moves)
    ) -> Result<(), String> {
        for (turn, acceptable) in expected_moves {
            let entry = entries
                .iter()
                .find(|e| e.turn == *turn)
                .ok_or_else(|| format!("Turn {} not found in log", turn))?;

            if !acceptable.contains(&entry.chosen_move) {
                return Err(format!(
                    "Turn {}: Expected one of {:?}, but got {}",
                    turn, acceptable, entry.chosen_move
                ));
            }
        }

        Ok(())
    }

    /// Parses `row/col` or `none`
    pub fn parse_move(s: &str) -> Result<Move, String> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("none") {
            return Ok(Move::NONE);
        }

        let (row, col) = s
            .split_once('/')
            .ok_or_else(|| format!("Invalid move '{}'. Expected 'row/col'", s))?;
        let row = row
            .trim()
            .parse::<i32>()
            .map_err(|e| format!("Invalid row '{}': {}", row, e))?;
        let col = col
            .trim()
            .parse::<i32>()
            .map_err(|e| format!("Invalid column '{}': {}", col, e))?;
        Ok(Move(row, col))
    }
}
