//! Avatar uploads from the photobooth and the crop tool.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::Deserialize;

use crate::game::avatar::{self, AvatarKind};
use crate::web::auth::require_user;
use crate::web::error::HttpError;
use crate::web::handlers::OkResponse;
use crate::web::state::AppState;

#[derive(Deserialize)]
pub struct SaveAvatarRequest {
    image: String,
}

pub async fn save_avatar(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<SaveAvatarRequest>,
) -> Result<Json<OkResponse>, HttpError> {
    let username = require_user(&state, &headers)?;
    avatar::save_avatar(
        &state.store,
        &state.data_dir,
        &username,
        &req.image,
        AvatarKind::Full,
    )
    .await?;
    Ok(Json(OkResponse::ok()))
}

#[derive(Deserialize)]
pub struct SaveCroppedRequest {
    #[serde(rename = "croppedImage")]
    cropped_image: String,
}

pub async fn save_cropped_avatar(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<SaveCroppedRequest>,
) -> Result<Json<OkResponse>, HttpError> {
    let username = require_user(&state, &headers)?;
    avatar::save_avatar(
        &state.store,
        &state.data_dir,
        &username,
        &req.cropped_image,
        AvatarKind::Cropped,
    )
    .await?;
    Ok(Json(OkResponse::ok()))
}
