//! Request handlers, one module per page area. Handlers stay thin: resolve
//! the caller, invoke a game operation, shape the JSON reply.

pub mod accounts;
pub mod avatars;
pub mod forum;
pub mod gifting;
pub mod meta;
pub mod minigames;
pub mod pets;
pub mod store;

use serde::Serialize;

/// Bare acknowledgement body.
#[derive(Serialize)]
pub struct OkResponse {
    pub success: bool,
}

impl OkResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

/// Acknowledgement carrying the caller's new balance.
#[derive(Serialize)]
pub struct BalanceResponse {
    pub success: bool,
    pub balance: i64,
}

impl BalanceResponse {
    pub fn with_balance(balance: i64) -> Self {
        Self {
            success: true,
            balance,
        }
    }
}
