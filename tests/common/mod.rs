// Shared fixtures for the integration tests
#![allow(dead_code)]

use rand::seq::IndexedRandom;
use rand::Rng;
use std::cell::Cell;
use std::rc::Rc;

use isolation_agent::board::Board;
use isolation_agent::game::GameState;
use isolation_agent::types::{Move, Player};

#[derive(Debug)]
struct Node {
    value: f64,
    children: Vec<usize>,
}

/// Explicit game tree with a score on every node
///
/// Moves are `Move(child_id, 0)`. Nodes without children are leaves that get
/// scored, never decided wins or losses.
#[derive(Debug, Clone)]
pub struct TreeGame {
    nodes: Rc<Vec<Node>>,
    current: usize,
    active: Player,
}

impl TreeGame {
    /// Random tree where each node has between 0 and `max_branching`
    /// children (exactly `max_branching` at the root) and integer scores
    /// in -5..=5, so ties are common
    pub fn random<R: Rng>(rng: &mut R, max_branching: usize, depth: usize) -> Self {
        let mut nodes = Vec::new();
        build(&mut nodes, rng, max_branching, depth, true);
        TreeGame {
            nodes: Rc::new(nodes),
            current: 0,
            active: Player::One,
        }
    }

    /// Root with one child per score in `scores`, each child a leaf
    pub fn fan(scores: &[f64]) -> Self {
        let mut nodes = vec![Node {
            value: 0.0,
            children: (1..=scores.len()).collect(),
        }];
        for &value in scores {
            nodes.push(Node {
                value,
                children: Vec::new(),
            });
        }
        TreeGame {
            nodes: Rc::new(nodes),
            current: 0,
            active: Player::One,
        }
    }

    /// Score of the current node for player one
    pub fn value(&self) -> f64 {
        self.nodes[self.current].value
    }
}

fn build<R: Rng>(
    nodes: &mut Vec<Node>,
    rng: &mut R,
    max_branching: usize,
    depth: usize,
    root: bool,
) -> usize {
    let id = nodes.len();
    nodes.push(Node {
        value: rng.random_range(-5i32..=5) as f64,
        children: Vec::new(),
    });

    if depth > 0 {
        let branching = if root {
            max_branching
        } else {
            rng.random_range(0..=max_branching)
        };
        for _ in 0..branching {
            let child = build(nodes, rng, max_branching, depth - 1, false);
            nodes[id].children.push(child);
        }
    }
    id
}

impl GameState for TreeGame {
    fn active_player(&self) -> Player {
        self.active
    }

    fn legal_moves(&self, _player: Player) -> Vec<Move> {
        self.nodes[self.current]
            .children
            .iter()
            .map(|&child| Move(child as i32, 0))
            .collect()
    }

    fn forecast_move(&self, mv: Move) -> Self {
        TreeGame {
            nodes: self.nodes.clone(),
            current: mv.row() as usize,
            active: self.active.opponent(),
        }
    }

    fn is_winner(&self, _player: Player) -> bool {
        false
    }

    fn is_loser(&self, _player: Player) -> bool {
        false
    }
}

/// Node score from `player`'s point of view
pub fn tree_value(state: &TreeGame, player: Player) -> f64 {
    match player {
        Player::One => state.value(),
        Player::Two => -state.value(),
    }
}

/// Plays `plies` random moves from an empty board
pub fn random_position<R: Rng>(rng: &mut R, width: i32, height: i32, plies: usize) -> Board {
    let mut board = Board::new(width, height);
    for _ in 0..plies {
        match board.active_moves().choose(rng) {
            Some(&mv) => board.apply_move(mv),
            None => break,
        }
    }
    board
}

/// Never runs out
pub fn plenty() -> f64 {
    1.0e9
}

/// Reports plenty of time for the first `allowed` queries, then none
pub struct ScriptedClock {
    calls: Cell<u64>,
    allowed: u64,
}

impl ScriptedClock {
    pub fn new(allowed: u64) -> Self {
        ScriptedClock {
            calls: Cell::new(0),
            allowed,
        }
    }

    pub fn time_left(&self) -> f64 {
        let calls = self.calls.get() + 1;
        self.calls.set(calls);
        if calls > self.allowed {
            0.0
        } else {
            1.0e9
        }
    }

    pub fn calls(&self) -> u64 {
        self.calls.get()
    }
}
