// Match runner and round-robin tournament
//
// Each turn the active agent gets a fresh wall-clock budget. Overrunning the
// budget or returning a move that is not legal forfeits the game. Games are
// independent of each other, so the tournament plays them on the rayon pool;
// every individual search stays single-threaded.

use log::{info, warn};
use rand::seq::IndexedRandom;
use rand::Rng;
use rayon::prelude::*;

use crate::agent::Agent;
use crate::board::Board;
use crate::clock::TurnTimer;
use crate::game::GameState;
use crate::simple_profiler;
use crate::types::{Move, Player};

/// Why a game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The loser returned after its clock ran out
    Timeout,
    /// The loser returned an illegal move while legal moves existed
    Forfeit,
    /// The loser had no legal move left
    NoMoves,
}

/// Result of a single game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    pub winner: Player,
    pub outcome: Outcome,
    pub history: Vec<Move>,
}

/// Plays `board` to completion
///
/// # Arguments
/// * `board` - Starting position, possibly with opening moves applied
/// * `agents` - Agent for player one and player two
/// * `time_limit_ms` - Per-move budget
pub fn play_match(board: &Board, agents: [&dyn Agent; 2], time_limit_ms: u64) -> MatchResult {
    let mut board = board.clone();
    let mut history = Vec::new();

    loop {
        let active = board.active_player();
        let agent = agents[active.index()];
        let legal_moves = board.active_moves();

        let timer = TurnTimer::start(time_limit_ms);
        let time_left = || timer.time_left();
        let chosen = agent.get_move(&board, &time_left);
        let move_end = timer.time_left();

        if move_end < 0.0 {
            warn!(
                "{} ran out of time ({:.1}ms over)",
                agent.name(),
                -move_end
            );
            return MatchResult {
                winner: active.opponent(),
                outcome: Outcome::Timeout,
                history,
            };
        }

        if !legal_moves.contains(&chosen) {
            let outcome = if legal_moves.is_empty() {
                Outcome::NoMoves
            } else {
                warn!("{} played illegal move {}", agent.name(), chosen);
                Outcome::Forfeit
            };
            return MatchResult {
                winner: active.opponent(),
                outcome,
                history,
            };
        }

        history.push(chosen);
        board.apply_move(chosen);
    }
}

/// Places both players on random blank cells
pub fn random_opening<R: Rng>(board: &Board, rng: &mut R) -> Board {
    let mut board = board.clone();
    for _ in 0..2 {
        if let Some(&mv) = board.active_moves().choose(rng) {
            board.apply_move(mv);
        }
    }
    board
}

/// Win/loss tally of one test agent against one opponent
#[derive(Debug, Clone, PartialEq)]
pub struct Standing {
    pub agent: String,
    pub opponent: String,
    pub wins: usize,
    pub losses: usize,
    pub timeouts: usize,
    pub forfeits: usize,
}

impl Standing {
    pub fn win_rate(&self) -> f64 {
        let games = self.wins + self.losses;
        if games == 0 {
            0.0
        } else {
            100.0 * self.wins as f64 / games as f64
        }
    }
}

/// Round-robin of test agents against a fixed roster of opponents
pub struct Tournament {
    pub board: Board,
    pub num_matches: usize,
    pub time_limit_ms: u64,
}

impl Tournament {
    pub fn new(board: Board, num_matches: usize, time_limit_ms: u64) -> Self {
        Tournament {
            board,
            num_matches,
            time_limit_ms,
        }
    }

    /// Plays `num_matches` rounds of `agent` against each opponent
    ///
    /// Every round starts from a random opening and is played twice with
    /// the seats swapped, so each pairing produces `2 * num_matches` games.
    pub fn run(&self, agents: &[&dyn Agent], opponents: &[&dyn Agent]) -> Vec<Standing> {
        let mut standings = Vec::new();

        for &agent in agents {
            for &opponent in opponents {
                info!("Playing {} vs {}", agent.name(), opponent.name());

                let openings: Vec<Board> = {
                    let mut rng = rand::rng();
                    (0..self.num_matches)
                        .map(|_| random_opening(&self.board, &mut rng))
                        .collect()
                };

                // (agent seat, result) for each game
                let results: Vec<(Player, MatchResult)> = openings
                    .par_iter()
                    .flat_map_iter(|opening| {
                        let first = play_match(opening, [agent, opponent], self.time_limit_ms);
                        let second = play_match(opening, [opponent, agent], self.time_limit_ms);
                        simple_profiler::merge_thread_local();
                        vec![(Player::One, first), (Player::Two, second)]
                    })
                    .collect();

                standings.push(Self::tally(agent.name(), opponent.name(), &results));
            }
        }

        standings
    }

    fn tally(agent: &str, opponent: &str, results: &[(Player, MatchResult)]) -> Standing {
        let mut standing = Standing {
            agent: agent.to_string(),
            opponent: opponent.to_string(),
            wins: 0,
            losses: 0,
            timeouts: 0,
            forfeits: 0,
        };

        for (seat, result) in results {
            if result.winner == *seat {
                standing.wins += 1;
            } else {
                standing.losses += 1;
                match result.outcome {
                    Outcome::Timeout => standing.timeouts += 1,
                    Outcome::Forfeit => standing.forfeits += 1,
                    Outcome::NoMoves => {}
                }
            }
        }

        standing
    }

    /// Prints a win-rate table
    pub fn print_report(standings: &[Standing]) {
        println!("\n═══════════════════════════════════════════════════════════");
        println!("                  TOURNAMENT RESULTS");
        println!("═══════════════════════════════════════════════════════════");
        println!(
            "{:<16} {:<16} {:>5} {:>5} {:>8} {:>8}",
            "Agent", "Opponent", "Won", "Lost", "Timeouts", "Win %"
        );

        for s in standings {
            println!(
                "{:<16} {:<16} {:>5} {:>5} {:>8} {:>7.1}%",
                s.agent,
                s.opponent,
                s.wins,
                s.losses,
                s.timeouts,
                s.win_rate()
            );
        }
        println!("═══════════════════════════════════════════════════════════\n");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::RandomAgent;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Always answers with the same cell
    struct Stubborn(Move);

    impl Agent for Stubborn {
        fn name(&self) -> &str {
            "Stubborn"
        }

        fn get_move(&self, _board: &Board, _time_left: &dyn Fn() -> f64) -> Move {
            self.0
        }
    }

    /// Waits out its clock before answering
    struct Sleeper;

    impl Agent for Sleeper {
        fn name(&self) -> &str {
            "Sleeper"
        }

        fn get_move(&self, board: &Board, time_left: &dyn Fn() -> f64) -> Move {
            while time_left() >= 0.0 {
                std::thread::yield_now();
            }
            board.active_moves()[0]
        }
    }

    #[test]
    fn test_illegal_move_forfeits() {
        let board = Board::new(5, 5);
        let result = play_match(&board, [&Stubborn(Move(9, 9)), &RandomAgent], 1_000);
        assert_eq!(result.winner, Player::Two);
        assert_eq!(result.outcome, Outcome::Forfeit);
        assert!(result.history.is_empty());
    }

    #[test]
    fn test_overrunning_the_clock_loses_on_time() {
        let board = Board::new(5, 5);
        let result = play_match(&board, [&RandomAgent, &Sleeper], 5);
        assert_eq!(result.winner, Player::One);
        assert_eq!(result.outcome, Outcome::Timeout);
        assert_eq!(result.history.len(), 1);
    }

    #[test]
    fn test_random_game_ends_with_no_moves() {
        let board = Board::new(4, 4);
        let result = play_match(&board, [&RandomAgent, &RandomAgent], 1_000);
        assert_eq!(result.outcome, Outcome::NoMoves);
        assert!(result.history.len() >= 2);
        assert!(result.history.len() <= 16);
    }

    #[test]
    fn test_random_opening_places_both_players() {
        let mut rng = StdRng::seed_from_u64(7);
        let board = random_opening(&Board::new(7, 7), &mut rng);
        assert_eq!(board.move_count(), 2);
        assert!(board.player_location(Player::One).is_some());
        assert!(board.player_location(Player::Two).is_some());
        assert_eq!(board.active_player(), Player::One);
    }

    #[test]
    fn test_tournament_plays_both_seats() {
        let tournament = Tournament::new(Board::new(4, 4), 2, 1_000);
        let roster: [&dyn Agent; 1] = [&RandomAgent];
        let standings = tournament.run(&roster, &roster);
        assert_eq!(standings.len(), 1);
        assert_eq!(standings[0].wins + standings[0].losses, 4);
        assert_eq!(standings[0].timeouts, 0);
    }
}
