// Library exports for the Isolation agent
// This allows the server, the replay tool and the tournament to share the search core

pub mod agent;
pub mod arena;
pub mod board;
pub mod bot;
pub mod clock;
pub mod config;
pub mod debug_logger;
pub mod error;
pub mod game;
pub mod heuristics;
pub mod replay;
pub mod search;
pub mod simple_profiler;
pub mod types;
