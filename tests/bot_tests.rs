// Tests for the Bot behind the HTTP endpoints

use serde_json::Value;

use isolation_agent::board::Board;
use isolation_agent::bot::Bot;
use isolation_agent::config::{Config, SearchConfig};
use isolation_agent::debug_logger::DebugLogger;
use isolation_agent::error::BotError;
use isolation_agent::types::{GameRequest, Move};

fn bot() -> Bot {
    Bot::new(Config::default_hardcoded(), DebugLogger::disabled())
}

fn request(board: Board, timeout_ms: Option<u64>) -> GameRequest {
    GameRequest {
        game_id: "test-game".to_string(),
        turn: board.move_count(),
        board,
        timeout_ms,
    }
}

fn chosen_move(response: &Value) -> Move {
    serde_json::from_value(response["move"].clone()).expect("move should be [row, col]")
}

#[tokio::test]
async fn test_move_is_legal_on_open_board() {
    let mut board = Board::new(7, 7);
    board.apply_move(Move(3, 3));
    board.apply_move(Move(0, 6));

    let response = bot().get_move(&request(board.clone(), None)).await.unwrap();

    assert!(board.move_is_legal(chosen_move(&response)));
    assert!(response["depth"].as_i64().unwrap() >= 1);
}

#[tokio::test]
async fn test_first_move_can_be_any_cell() {
    let board = Board::new(5, 5);
    let response = bot().get_move(&request(board.clone(), Some(100))).await.unwrap();
    assert!(board.move_is_legal(chosen_move(&response)));
}

#[tokio::test]
async fn test_stuck_player_gets_sentinel() {
    let mut board = Board::new(3, 3);
    board.apply_move(Move(1, 1));
    board.apply_move(Move(0, 0));

    let response = bot().get_move(&request(board, None)).await.unwrap();
    assert_eq!(response["move"], serde_json::json!([-1, -1]));
}

#[tokio::test]
async fn test_request_parses_from_json() {
    let body = r#"{
        "game_id": "abc",
        "turn": 2,
        "board": {
            "width": 3,
            "height": 3,
            "blocked": [true, false, false, false, false, false, false, false, true],
            "locations": [[0, 0], [2, 2]],
            "active": "one",
            "move_count": 2
        }
    }"#;
    let req: GameRequest = serde_json::from_str(body).unwrap();
    assert_eq!(req.timeout_ms, None);

    let response = bot().get_move(&req).await.unwrap();
    assert_eq!(chosen_move(&response), Move(1, 2));
}

#[test]
fn test_request_with_mismatched_grid_is_rejected() {
    let body = r#"{
        "game_id": "abc",
        "turn": 0,
        "board": {
            "width": 3,
            "height": 3,
            "blocked": [false, false, false, false],
            "locations": [null, null],
            "active": "one",
            "move_count": 0
        }
    }"#;
    let err = serde_json::from_str::<GameRequest>(body).unwrap_err();
    assert!(err.to_string().contains("blocked grid"), "{}", err);
}

#[tokio::test]
async fn test_resized_board_returns_error_instead_of_panicking() {
    let mut board = Board::new(3, 3);
    board.height = 7;

    let result = bot().get_move(&request(board, None)).await;
    assert!(matches!(result, Err(BotError::InvalidBoard(_))));
}

#[test]
fn test_budget_prefers_request_timeout() {
    let bot = bot();
    let config = Config::default_hardcoded();

    assert_eq!(
        bot.budget_ms(&request(Board::new(3, 3), None)),
        config.timing.effective_budget_ms()
    );
    assert_eq!(
        bot.budget_ms(&request(Board::new(3, 3), Some(200))),
        200 - config.timing.network_overhead_ms
    );
}

#[test]
fn test_info_describes_the_agent() {
    let info = bot().info();
    assert_eq!(info["game"], "isolation");
    assert_eq!(info["heuristic"], Config::default_hardcoded().heuristic.name());
    assert_eq!(info["agent"], "AB_defensive");
}

#[test]
fn test_agent_name_reflects_configured_search() {
    let mut config = Config::default_hardcoded();
    config.search = SearchConfig::minimax(3);

    let info = Bot::new(config, DebugLogger::disabled()).info();
    assert_eq!(info["agent"], "MM_defensive");
    assert_eq!(info["iterative"], false);
}
