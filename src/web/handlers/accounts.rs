//! Registration, login, profile, and account deletion.

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::game::avatar;
use crate::game::ledger;
use crate::game::types::{ItemGender, ItemSlot};
use crate::web::auth::{extract_bearer, require_user};
use crate::web::error::HttpError;
use crate::web::handlers::OkResponse;
use crate::web::state::AppState;

#[derive(Deserialize)]
pub struct CredentialsRequest {
    username: String,
    password: String,
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<CredentialsRequest>,
) -> Result<Json<OkResponse>, HttpError> {
    ledger::register_user(&state.store, &req.username, &req.password, &state.rules)?;
    Ok(Json(OkResponse::ok()))
}

#[derive(Serialize)]
pub struct LoginResponse {
    success: bool,
    token: String,
    username: String,
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<CredentialsRequest>,
) -> Result<Json<LoginResponse>, HttpError> {
    let (user, password_ok) = ledger::verify_password(&state.store, &req.username, &req.password)?;
    match user {
        Some(user) if password_ok => {
            let token = state.sessions.login(&user.username);
            Ok(Json(LoginResponse {
                success: true,
                token,
                username: user.username,
            }))
        }
        _ => Err(HttpError::new(
            StatusCode::UNAUTHORIZED,
            "Invalid username or password.",
        )),
    }
}

pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<OkResponse>, HttpError> {
    let token = extract_bearer(&headers).ok_or_else(HttpError::unauthorized)?;
    if state.sessions.logout(&token) {
        Ok(Json(OkResponse::ok()))
    } else {
        Err(HttpError::unauthorized())
    }
}

#[derive(Serialize)]
pub struct InventoryView {
    entry_id: u64,
    item_id: u32,
    name: String,
    slot: ItemSlot,
    gender: ItemGender,
    price: i64,
    image: String,
    css_filter: Option<String>,
    acquired_at: DateTime<Utc>,
}

#[derive(Serialize)]
pub struct PetView {
    pet_id: u64,
    species: String,
    species_name: String,
    name: String,
    pet_image: String,
    adopted_at: DateTime<Utc>,
}

#[derive(Serialize)]
pub struct ProfileResponse {
    success: bool,
    username: String,
    balance: i64,
    created_at: DateTime<Utc>,
    avatar_image: Option<String>,
    profile_image: Option<String>,
    inventory: Vec<InventoryView>,
    pets: Vec<PetView>,
}

pub async fn profile(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ProfileResponse>, HttpError> {
    let username = require_user(&state, &headers)?;
    let user = state.store.get_user(&username)?;

    let mut inventory = Vec::new();
    for entry in state.store.list_inventory(&username)? {
        let item = state.store.get_item(entry.item_id)?;
        inventory.push(InventoryView {
            entry_id: entry.id,
            item_id: item.id,
            name: item.name,
            slot: item.slot,
            gender: item.gender,
            price: item.price,
            image: item.image,
            css_filter: item.css_filter,
            acquired_at: entry.acquired_at,
        });
    }

    let mut pets = Vec::new();
    for pet in state.store.list_pets(&username)? {
        let species = state.store.get_species(&pet.species)?;
        pets.push(PetView {
            pet_id: pet.id,
            species: species.code,
            species_name: species.display_name,
            name: pet.name,
            pet_image: species.pet_image,
            adopted_at: pet.adopted_at,
        });
    }

    Ok(Json(ProfileResponse {
        success: true,
        username: user.username,
        balance: user.balance,
        created_at: user.created_at,
        avatar_image: user.avatar_image,
        profile_image: user.profile_image,
        inventory,
        pets,
    }))
}

pub async fn delete_account(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<OkResponse>, HttpError> {
    let username = require_user(&state, &headers)?;
    ledger::delete_account(&state.store, &username)?;
    avatar::remove_avatars(&state.data_dir, &username).await;
    state.sessions.logout_user(&username);
    Ok(Json(OkResponse::ok()))
}
