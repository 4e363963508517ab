// HTTP handler bindings for the Isolation bot API
//
// Thin wrappers that bind Rocket routes to the Bot's methods. Handlers
// deserialize the request, pull the Bot from managed state, delegate, and
// serialize the response.

use log::{error, warn};
use rocket::http::Status;
use rocket::serde::json::Json;
use serde_json::Value;

use isolation_agent::bot::Bot;
use isolation_agent::error::BotError;
use isolation_agent::types::GameRequest;

/// GET / endpoint
/// Returns bot metadata
#[get("/")]
pub fn index(bot: &rocket::State<Bot>) -> Json<Value> {
    Json(bot.info())
}

/// POST /start endpoint
#[post("/start", format = "json", data = "<start_req>")]
pub fn start(bot: &rocket::State<Bot>, start_req: Json<GameRequest>) -> Status {
    bot.start(&start_req);

    Status::Ok
}

/// POST /move endpoint
/// Called each turn to compute and return the next move
#[post("/move", format = "json", data = "<move_req>")]
pub async fn get_move(
    bot: &rocket::State<Bot>,
    move_req: Json<GameRequest>,
) -> Result<Json<Value>, Status> {
    match bot.get_move(&move_req).await {
        Ok(response) => Ok(Json(response)),
        Err(BotError::InvalidBoard(e)) => {
            warn!("Turn {}: rejected board: {}", move_req.turn, e);
            Err(Status::UnprocessableEntity)
        }
        Err(e) => {
            error!("Turn {}: {}", move_req.turn, e);
            Err(Status::InternalServerError)
        }
    }
}

/// POST /end endpoint
#[post("/end", format = "json", data = "<end_req>")]
pub fn end(bot: &rocket::State<Bot>, end_req: Json<GameRequest>) -> Status {
    bot.end(&end_req);

    Status::Ok
}
