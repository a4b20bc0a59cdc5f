//! Shared state handed to every request handler.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::info;

use crate::config::Config;
use crate::game::errors::GameError;
use crate::game::storage::{GameStore, GameStoreBuilder};
use crate::game::types::GameRules;
use crate::web::session::SessionManager;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<GameStore>,
    pub rules: GameRules,
    pub sessions: Arc<SessionManager>,
    pub data_dir: PathBuf,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Open the store under `<data_dir>/lamoland` and wire up sessions.
    pub async fn new(config: &Config) -> Result<Self, GameError> {
        let data_dir = PathBuf::from(&config.storage.data_dir);
        tokio::fs::create_dir_all(&data_dir).await?;

        let store = GameStoreBuilder::new(data_dir.join("lamoland"))
            .retry_policy(config.retry_policy())
            .open()?;
        info!(
            "store opened at {} ({} users)",
            data_dir.join("lamoland").display(),
            store.count_users()?
        );

        Ok(Self {
            store: Arc::new(store),
            rules: config.rules(),
            sessions: Arc::new(SessionManager::new(i64::from(
                config.server.session_timeout,
            ))),
            data_dir,
            started_at: Utc::now(),
        })
    }

    /// Build state around an already-open store (tests).
    pub fn with_store(store: GameStore, rules: GameRules, data_dir: PathBuf) -> Self {
        Self {
            store: Arc::new(store),
            rules,
            sessions: Arc::new(SessionManager::new(60)),
            data_dir,
            started_at: Utc::now(),
        }
    }
}
