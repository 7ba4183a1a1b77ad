use crate::archive::Archive;
use crate::game::{prompt::rules_text, Game, GameOptions};
use crate::narrator::LogNarrator;
use crate::oracle::OracleSource;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use rand::RngCore;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Everything the request handlers share.
pub struct AppState {
    pub archive: Archive,
    /// The options used when a request does not supply its own.
    pub options: GameOptions,
    pub oracle: OracleSource,
}

pub fn make_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/play", post(play_game))
        .route("/rules", get(get_rules))
        .route("/pastgames", get(get_past_games))
        .route("/games/:id", get(get_game))
        .with_state(state)
}

pub async fn serve(port: u16, state: Arc<AppState>) -> std::io::Result<()> {
    let listener = TcpListener::bind(format!("127.0.0.1:{}", port)).await?;
    log::info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, make_router(state)).await
}

async fn play_game(
    State(state): State<Arc<AppState>>,
    options: Option<Json<GameOptions>>,
) -> Result<Json<impl Serialize>, (StatusCode, String)> {
    let options = options.map(|Json(opts)| opts).unwrap_or_else(|| state.options.clone());
    let seed = rand::thread_rng().next_u64();

    let mut game = Game::new(options, seed).map_err(|err| (StatusCode::BAD_REQUEST, err.to_string()))?;
    let mut oracle = state.oracle.make(seed);
    let mut narration = LogNarrator(Vec::<String>::new());

    if let Err(err) = game.play(oracle.as_mut(), &mut narration, &state.archive).await {
        log::error!("Game {} failed: {}", game.id(), err);
        return Err((StatusCode::BAD_GATEWAY, err.to_string()));
    }

    Ok(Json(json!({
        "narration": narration.0,
        "game": game.get_summary_json(),
    })))
}

async fn get_rules(State(state): State<Arc<AppState>>) -> String {
    rules_text(&state.options)
}

async fn get_past_games(State(state): State<Arc<AppState>>) -> Json<impl Serialize> {
    Json(json!({
        "games": state.archive.past_games()
    }))
}

async fn get_game(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<impl Serialize>, StatusCode> {
    let archive = &state.archive;
    let lookup = || -> Result<_, crate::archive::ArchiveError> {
        let Some(record) = archive.find_game(&id)? else {
            return Ok(None);
        };
        Ok(Some(json!({
            "game": record,
            "nightActions": archive.find_night_actions(&id)?,
            "transcript": archive.find_transcript(&id)?,
            "votes": archive.find_votes(&id)?,
        })))
    };

    match lookup() {
        Ok(Some(game)) => Ok(Json(game)),
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(err) => {
            log::error!("Could not read game {}: {}", id, err);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
