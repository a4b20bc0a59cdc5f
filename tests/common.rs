//! Test utilities & fixtures.
//! Every test opens its own store inside a fresh temp dir; the TempDir must
//! be kept alive for as long as the store is used.

use lamoland::game::ledger;
use lamoland::game::storage::{GameStore, GameStoreBuilder};
use lamoland::game::types::{GameRules, UserRecord};
use tempfile::TempDir;

pub fn open_store() -> (TempDir, GameStore) {
    let dir = TempDir::new().expect("tempdir");
    let store = GameStoreBuilder::new(dir.path().join("db"))
        .open()
        .expect("store");
    (dir, store)
}

/// Register a user with the default rules and a fixed test password.
#[allow(dead_code)] // Not every test file registers users.
pub fn register(store: &GameStore, username: &str) -> UserRecord {
    ledger::register_user(store, username, "hunter22", &GameRules::default()).expect("register")
}
