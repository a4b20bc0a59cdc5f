//! The item store: browse the catalog, buy things.

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::Serialize;

use crate::game::catalog;
use crate::game::ledger;
use crate::game::types::{ItemGender, ItemRecord, ItemSlot};
use crate::web::auth::require_user;
use crate::web::error::HttpError;
use crate::web::handlers::BalanceResponse;
use crate::web::state::AppState;

#[derive(Serialize)]
pub struct ItemView {
    id: u32,
    base_id: u32,
    slot: ItemSlot,
    gender: ItemGender,
    name: String,
    price: i64,
    image: String,
    css_filter: Option<String>,
}

impl From<ItemRecord> for ItemView {
    fn from(item: ItemRecord) -> Self {
        Self {
            id: item.id,
            base_id: item.base_id,
            slot: item.slot,
            gender: item.gender,
            name: item.name,
            price: item.price,
            image: item.image,
            css_filter: item.css_filter,
        }
    }
}

/// One product and its color variants.
#[derive(Serialize)]
pub struct ItemGroup {
    base_id: u32,
    variants: Vec<ItemView>,
}

#[derive(Serialize)]
pub struct StoreResponse {
    success: bool,
    balance: i64,
    groups: Vec<ItemGroup>,
}

pub async fn store_index(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<StoreResponse>, HttpError> {
    let username = require_user(&state, &headers)?;
    let user = state.store.get_user(&username)?;

    let groups = catalog::list_items_grouped_by_base_id(&state.store)?
        .into_iter()
        .map(|(base_id, variants)| ItemGroup {
            base_id,
            variants: variants.into_iter().map(ItemView::from).collect(),
        })
        .collect();

    Ok(Json(StoreResponse {
        success: true,
        balance: user.balance,
        groups,
    }))
}

pub async fn purchase_item(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(item_id): Path<u32>,
) -> Result<Json<BalanceResponse>, HttpError> {
    let username = require_user(&state, &headers)?;
    let outcome = ledger::purchase_item(&state.store, &username, item_id)?;
    Ok(Json(BalanceResponse::with_balance(outcome.balance)))
}
