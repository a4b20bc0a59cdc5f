//! Adoption center: browse species, adopt, release, and recycle items.

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::game::catalog;
use crate::game::ledger;
use crate::game::types::SpeciesRecord;
use crate::web::auth::require_user;
use crate::web::error::HttpError;
use crate::web::handlers::BalanceResponse;
use crate::web::state::AppState;

#[derive(Serialize)]
pub struct SpeciesView {
    code: String,
    display_name: String,
    price: i64,
    egg_image: String,
    pet_image: String,
}

impl From<SpeciesRecord> for SpeciesView {
    fn from(species: SpeciesRecord) -> Self {
        Self {
            code: species.code,
            display_name: species.display_name,
            price: species.price,
            egg_image: species.egg_image,
            pet_image: species.pet_image,
        }
    }
}

#[derive(Serialize)]
pub struct AdoptIndexResponse {
    success: bool,
    balance: i64,
    species: Vec<SpeciesView>,
}

pub async fn adopt_index(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<AdoptIndexResponse>, HttpError> {
    let username = require_user(&state, &headers)?;
    let user = state.store.get_user(&username)?;
    let species = catalog::list_species(&state.store)?
        .into_iter()
        .map(SpeciesView::from)
        .collect();
    Ok(Json(AdoptIndexResponse {
        success: true,
        balance: user.balance,
        species,
    }))
}

#[derive(Deserialize)]
pub struct AdoptRequest {
    pet_name: String,
}

pub async fn adopt_pet(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(species): Path<String>,
    Json(req): Json<AdoptRequest>,
) -> Result<Json<BalanceResponse>, HttpError> {
    let username = require_user(&state, &headers)?;
    let outcome = ledger::adopt_pet(&state.store, &username, &species, &req.pet_name)?;
    Ok(Json(BalanceResponse::with_balance(outcome.balance)))
}

pub async fn release_pet(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(pet_id): Path<u64>,
) -> Result<Json<BalanceResponse>, HttpError> {
    let username = require_user(&state, &headers)?;
    let balance = ledger::release_pet(&state.store, &username, pet_id)?;
    Ok(Json(BalanceResponse::with_balance(balance)))
}

pub async fn recycle_item(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(entry_id): Path<u64>,
) -> Result<Json<BalanceResponse>, HttpError> {
    let username = require_user(&state, &headers)?;
    let balance = ledger::recycle_item(&state.store, &username, entry_id)?;
    Ok(Json(BalanceResponse::with_balance(balance)))
}
