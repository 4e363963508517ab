// Round-robin tournament between the configured agent and the reference roster
//
// Usage:
//   cargo run --release --bin tournament -- [--config <path>] [--matches <n>]
//
// Enable timing counters with ISOLATION_PROFILE=1.

use log::info;
use std::env;
use std::process;
use std::time::Instant;

use isolation_agent::agent::{Agent, IsolationAgent, RandomAgent};
use isolation_agent::arena::Tournament;
use isolation_agent::board::Board;
use isolation_agent::config::{Config, SearchConfig};
use isolation_agent::heuristics::HeuristicKind;
use isolation_agent::simple_profiler;

fn main() {
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "warn");
    }
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let mut config_path = "Isolation.toml".to_string();
    let mut matches = None;

    let mut i = 1;
    while i < args.len() {
        match (args[i].as_str(), args.get(i + 1)) {
            ("--config", Some(path)) => {
                config_path = path.clone();
                i += 1;
            }
            ("--matches", Some(n)) => {
                matches = Some(n.parse::<usize>().unwrap_or_else(|e| {
                    eprintln!("Error: invalid match count '{}': {}", n, e);
                    process::exit(1);
                }));
                i += 1;
            }
            _ => {
                eprintln!("Usage: tournament [--config <path>] [--matches <n>]");
                process::exit(1);
            }
        }
        i += 1;
    }

    let config = Config::from_file(&config_path).unwrap_or_else(|e| {
        eprintln!("Warning: Could not load config from '{}': {}", config_path, e);
        Config::default_hardcoded()
    });
    let num_matches = matches.unwrap_or(config.tournament.num_matches);

    let fixed = SearchConfig::minimax(3);
    let iterative = SearchConfig::alpha_beta();

    let random = RandomAgent;
    let mm_open = IsolationAgent::new("MM_Open", fixed, HeuristicKind::OpenMove);
    let mm_center = IsolationAgent::new("MM_Center", fixed, HeuristicKind::Center);
    let mm_improved = IsolationAgent::new("MM_Improved", fixed, HeuristicKind::Improved);
    let ab_open = IsolationAgent::new("AB_Open", iterative, HeuristicKind::OpenMove);
    let ab_center = IsolationAgent::new("AB_Center", iterative, HeuristicKind::Center);
    let ab_improved = IsolationAgent::new("AB_Improved", iterative, HeuristicKind::Improved);
    let opponents: [&dyn Agent; 7] = [
        &random,
        &mm_open,
        &mm_center,
        &mm_improved,
        &ab_open,
        &ab_center,
        &ab_improved,
    ];

    let custom = IsolationAgent::new(config.agent_name(), config.search, config.heuristic);
    let custom_decay = IsolationAgent::new(
        "AB_Decay",
        iterative,
        HeuristicKind::Decay { theta: 3.0 },
    );
    let agents: [&dyn Agent; 3] = [&ab_improved, &custom, &custom_decay];

    info!(
        "Playing {} rounds per pairing on {}x{}",
        num_matches, config.board.width, config.board.height
    );

    simple_profiler::reset();
    let start = Instant::now();

    let tournament = Tournament::new(
        Board::new(config.board.width, config.board.height),
        num_matches,
        config.tournament.time_limit_ms,
    );
    let standings = tournament.run(&agents, &opponents);

    Tournament::print_report(&standings);
    simple_profiler::merge_thread_local();
    simple_profiler::print_report(start.elapsed().as_millis() as u64);
}
