//! Minigame listing and score banking.

use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::game::allowance;
use crate::game::types::{MinigameAllowance, GAME_JACKALOAF_JUMP};
use crate::web::auth::require_user;
use crate::web::error::HttpError;
use crate::web::state::AppState;

#[derive(Serialize)]
pub struct MinigamesResponse {
    success: bool,
    balance: i64,
    games: Vec<MinigameAllowance>,
}

/// Lists every game with its remaining plays, rolling stale counters
/// forward so the page always shows fresh numbers.
pub async fn minigames_index(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<MinigamesResponse>, HttpError> {
    let username = require_user(&state, &headers)?;
    let games = allowance::reset_if_new_day(&state.store, &username, &state.rules)?;
    let user = state.store.get_user(&username)?;
    Ok(Json(MinigamesResponse {
        success: true,
        balance: user.balance,
        games,
    }))
}

#[derive(Deserialize)]
pub struct GainQuery {
    game: Option<String>,
}

#[derive(Serialize)]
pub struct GainResponse {
    success: bool,
    balance: i64,
    plays_left: u32,
}

/// Banks a score posted as a bare integer body. The game is named by the
/// `?game=` query parameter; the jackaloaf jump client predates the
/// parameter, so it stays the default.
pub async fn gain_currency(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<GainQuery>,
    body: String,
) -> Result<Json<GainResponse>, HttpError> {
    let username = require_user(&state, &headers)?;
    let score: i64 = body
        .trim()
        .parse()
        .map_err(|_| HttpError::bad_request("Score must be a non-negative integer."))?;
    let game = query.game.as_deref().unwrap_or(GAME_JACKALOAF_JUMP);
    let outcome = allowance::award(&state.store, &username, game, score, &state.rules)?;
    Ok(Json(GainResponse {
        success: true,
        balance: outcome.balance,
        plays_left: outcome.plays_left,
    }))
}
