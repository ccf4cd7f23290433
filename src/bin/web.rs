//! Single binary web server: static files from STATIC_DIR, API via REST.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT, STATIC_DIR,
//! SESSION_KEY (64+ bytes), LADDER_MAPS (comma-separated).

use actix_files::Files;
use actix_web::{cookie::Key, web::Data, App, HttpServer};
use bracket_circuit_web::api::{self, AppState};
use bracket_circuit_web::{Config, InMemoryStore};
use std::sync::Arc;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env();
    let key = match config.session_key.as_deref().map(|k| Key::try_from(k.as_bytes())) {
        Some(Ok(key)) => key,
        Some(Err(e)) => {
            log::warn!("SESSION_KEY rejected ({}); using a random key", e);
            Key::generate()
        }
        None => {
            log::warn!("SESSION_KEY not set; sessions will not survive a restart");
            Key::generate()
        }
    };

    let state = Data::new(AppState::new(
        Arc::new(InMemoryStore::new()),
        config.ladder_maps.clone(),
    ));
    let (host, port) = config.bind();
    log::info!("Starting server at http://{}:{}", host, port);

    let static_dir = config.static_dir.clone();
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(api::session_middleware(key.clone()))
            .configure(api::configure)
            .service(Files::new("/", &static_dir).index_file("index.html"))
    })
    .bind((host, port))?
    .run()
    .await
}
