// Configuration module for reading Isolation.toml
// This module provides OOP-style configuration management for the agent

use log::warn;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::ConfigError;
use crate::heuristics::HeuristicKind;
use crate::search::SearchMethod;

/// Main configuration structure containing all tunable parameters
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub timing: TimingConfig,
    pub search: SearchConfig,
    pub heuristic: HeuristicKind,
    pub board: BoardConfig,
    pub tournament: TournamentConfig,
    pub debug: DebugConfig,
}

/// Timing constants for a single decision
#[derive(Debug, Deserialize, Clone)]
pub struct TimingConfig {
    pub response_time_budget_ms: u64,
    pub network_overhead_ms: u64,
}

impl TimingConfig {
    /// Computes the effective computation budget
    pub fn effective_budget_ms(&self) -> u64 {
        self.response_time_budget_ms.saturating_sub(self.network_overhead_ms)
    }
}

/// Search engine selection and limits
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct SearchConfig {
    pub method: SearchMethod,
    /// Use iterative deepening instead of a single fixed-depth search
    pub iterative: bool,
    /// Depth of the fixed-depth search when `iterative` is false
    pub search_depth: i32,
    /// Abort the search once fewer milliseconds than this remain
    pub timer_threshold_ms: f64,
    /// Optional cap on iterative deepening
    #[serde(default)]
    pub max_depth: Option<i32>,
}

impl SearchConfig {
    /// Iterative deepening alpha-beta
    pub fn alpha_beta() -> Self {
        SearchConfig {
            method: SearchMethod::AlphaBeta,
            iterative: true,
            search_depth: 3,
            timer_threshold_ms: 10.0,
            max_depth: None,
        }
    }

    /// Single fixed-depth minimax search
    pub fn minimax(search_depth: i32) -> Self {
        SearchConfig {
            method: SearchMethod::Minimax,
            iterative: false,
            search_depth,
            timer_threshold_ms: 10.0,
            max_depth: None,
        }
    }

    /// Agent name prefix: `AB` for iterative alpha-beta, `MM` for fixed-depth
    /// minimax, and the other two combinations spelled out
    pub fn label(&self) -> &'static str {
        match (self.method, self.iterative) {
            (SearchMethod::AlphaBeta, true) => "AB",
            (SearchMethod::Minimax, false) => "MM",
            (SearchMethod::Minimax, true) => "ID_MM",
            (SearchMethod::AlphaBeta, false) => "FD_AB",
        }
    }
}

/// Board dimensions for new games
#[derive(Debug, Deserialize, Clone)]
pub struct BoardConfig {
    pub width: i32,
    pub height: i32,
}

/// Round-robin tournament settings
#[derive(Debug, Deserialize, Clone)]
pub struct TournamentConfig {
    /// Rounds against each opponent; every round is played twice with seats swapped
    pub num_matches: usize,
    pub time_limit_ms: u64,
}

/// Debug configuration
#[derive(Debug, Deserialize, Clone)]
pub struct DebugConfig {
    pub enabled: bool,
    pub log_file_path: String,
}

impl Config {
    /// Name of the configured agent, e.g. `AB_improved` or `MM_open`
    pub fn agent_name(&self) -> String {
        format!("{}_{}", self.search.label(), self.heuristic.name())
    }

    /// Loads configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the Isolation.toml configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path.as_ref())?;
        Ok(toml::from_str(&contents)?)
    }

    /// Loads default configuration from Isolation.toml in the project root
    pub fn load_default() -> Result<Self, ConfigError> {
        Self::from_file("Isolation.toml")
    }

    /// Creates a configuration with hardcoded default values as fallback
    /// This should match the constants defined in Isolation.toml
    pub fn default_hardcoded() -> Self {
        Config {
            timing: TimingConfig {
                response_time_budget_ms: 150,
                network_overhead_ms: 0,
            },
            search: SearchConfig::alpha_beta(),
            heuristic: HeuristicKind::Defensive { theta: 2.0 },
            board: BoardConfig {
                width: 7,
                height: 7,
            },
            tournament: TournamentConfig {
                num_matches: 5,
                time_limit_ms: 150,
            },
            debug: DebugConfig {
                enabled: false,
                log_file_path: "isolation_debug.jsonl".to_string(),
            },
        }
    }

    /// Attempts to load from file, falls back to hardcoded defaults on error
    pub fn load_or_default() -> Self {
        Self::load_default().unwrap_or_else(|e| {
            warn!("Could not load Isolation.toml ({}), using hardcoded defaults", e);
            Self::default_hardcoded()
        })
    }
}
