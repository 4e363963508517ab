#[macro_use]
extern crate rocket;

use log::info;
use std::env;

use isolation_agent::bot::Bot;
use isolation_agent::config::Config;
use isolation_agent::debug_logger::DebugLogger;

mod handler;

#[launch]
async fn rocket() -> _ {
    // Rocket reads `ROCKET_PORT`; honour the conventional `PORT` as well.
    if let Ok(port) = env::var("PORT") {
        env::set_var("ROCKET_PORT", &port);
    }

    // We default to 'info' level logging. But if the `RUST_LOG` environment variable is set,
    // we keep that value instead.
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }

    env_logger::init();

    info!("Starting Isolation Server...");

    // Load configuration once at startup
    let config = Config::load_or_default();
    let logger = DebugLogger::new(config.debug.enabled, &config.debug.log_file_path).await;
    let bot = Bot::new(config, logger);

    rocket::build().manage(bot).mount(
        "/",
        routes![handler::index, handler::start, handler::get_move, handler::end],
    )
}
