//! The gifting page: cooldown state and coin transfers.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::game::gifting;
use crate::web::auth::require_user;
use crate::web::error::HttpError;
use crate::web::handlers::BalanceResponse;
use crate::web::state::AppState;

#[derive(Serialize)]
pub struct GiftStateResponse {
    success: bool,
    can_gift: bool,
    remaining_minutes: i64,
    last_gift_at: Option<DateTime<Utc>>,
}

pub async fn gifting_index(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<GiftStateResponse>, HttpError> {
    let username = require_user(&state, &headers)?;
    let gift = gifting::gift_state(&state.store, &username, &state.rules)?;
    Ok(Json(GiftStateResponse {
        success: true,
        can_gift: gift.can_gift,
        remaining_minutes: gift.remaining_minutes,
        last_gift_at: gift.last_gift_at,
    }))
}

#[derive(Deserialize)]
pub struct GiftRequest {
    username: String,
    currency: i64,
}

pub async fn send_gift(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<GiftRequest>,
) -> Result<Json<BalanceResponse>, HttpError> {
    let sender = require_user(&state, &headers)?;
    let balance = gifting::send_gift(
        &state.store,
        &sender,
        &req.username,
        req.currency,
        &state.rules,
    )?;
    Ok(Json(BalanceResponse::with_balance(balance)))
}
