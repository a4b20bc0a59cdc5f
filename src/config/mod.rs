//! # Configuration Management Module
//!
//! This module handles all configuration aspects of the Lamoland server,
//! providing a centralized configuration system with validation, defaults,
//! and persistence.
//!
//! ## Configuration Structure
//!
//! The configuration is organized into logical sections:
//!
//! - [`ServerConfig`] - HTTP listener settings (bind address, port, sessions)
//! - [`StorageConfig`] - Data persistence settings and commit retry tuning
//! - [`GameConfig`] - Economy rules (starting balance, gift caps, allowances)
//! - [`LoggingConfig`] - Logging and debugging settings
//!
//! ## Usage
//!
//! ```rust,no_run
//! use lamoland::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Load configuration from file
//!     let config = Config::load("config.toml").await?;
//!
//!     println!("Listening on {}:{}", config.server.bind, config.server.port);
//!     println!("Data dir: {}", config.storage.data_dir);
//!
//!     // Create default configuration
//!     Config::create_default("config.toml").await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration File Format
//!
//! Lamoland uses TOML format for human-readable configuration:
//!
//! ```toml
//! [server]
//! bind = "127.0.0.1"
//! port = 8080
//! session_timeout = 60
//!
//! [storage]
//! data_dir = "./data"
//! commit_retries = 5
//! commit_retry_delay_ms = 100
//!
//! [game]
//! starting_balance = 1000
//! gift_cap = 100
//! gift_cooldown_hours = 4
//! daily_plays = 3
//! ```

use std::time::Duration;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::game::storage::RetryPolicy;
use crate::game::types::GameRules;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    #[serde(default)]
    pub game: GameConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to.
    pub bind: String,
    pub port: u16,
    /// Session inactivity timeout in minutes.
    pub session_timeout: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: String,
    /// Total commit attempts before a busy store is reported to the caller.
    #[serde(default = "default_commit_retries")]
    pub commit_retries: u32,
    /// Pause between commit attempts in milliseconds.
    #[serde(default = "default_commit_retry_delay_ms")]
    pub commit_retry_delay_ms: u64,
}

fn default_commit_retries() -> u32 {
    5
}

fn default_commit_retry_delay_ms() -> u64 {
    100
}

/// Economy tuning. Every field mirrors [`GameRules`] so deployments can
/// adjust the numbers without a rebuild.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    #[serde(default = "default_starting_balance")]
    pub starting_balance: i64,
    #[serde(default = "default_gift_cap")]
    pub gift_cap: i64,
    #[serde(default = "default_gift_cooldown_hours")]
    pub gift_cooldown_hours: i64,
    #[serde(default = "default_daily_plays")]
    pub daily_plays: u32,
}

fn default_starting_balance() -> i64 {
    1000
}

fn default_gift_cap() -> i64 {
    100
}

fn default_gift_cooldown_hours() -> i64 {
    4
}

fn default_daily_plays() -> u32 {
    3
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            starting_balance: default_starting_balance(),
            gift_cap: default_gift_cap(),
            gift_cooldown_hours: default_gift_cooldown_hours(),
            daily_plays: default_daily_plays(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
}

impl Config {
    /// Load configuration from a file
    pub async fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path, e))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file {}: {}", path, e))?;

        Ok(config)
    }

    /// Create a default configuration file
    pub async fn create_default(path: &str) -> Result<()> {
        let config = Config::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| anyhow!("Failed to serialize default config: {}", e))?;

        fs::write(path, content)
            .await
            .map_err(|e| anyhow!("Failed to write config file {}: {}", path, e))?;

        Ok(())
    }

    /// Economy rules derived from the `[game]` section.
    pub fn rules(&self) -> GameRules {
        GameRules {
            starting_balance: self.game.starting_balance,
            gift_cap: self.game.gift_cap,
            gift_cooldown_hours: self.game.gift_cooldown_hours,
            daily_plays: self.game.daily_plays,
        }
    }

    /// Commit retry policy derived from the `[storage]` section.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.storage.commit_retries,
            Duration::from_millis(self.storage.commit_retry_delay_ms),
        )
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                bind: "127.0.0.1".to_string(),
                port: 8080,
                session_timeout: 60,
            },
            storage: StorageConfig {
                data_dir: "./data".to_string(),
                commit_retries: default_commit_retries(),
                commit_retry_delay_ms: default_commit_retry_delay_ms(),
            },
            game: GameConfig::default(),
            logging: LoggingConfig {
                level: "info".to_string(),
                file: Some("lamoland.log".to_string()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        let config = Config::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.game.starting_balance, 1000);
        assert_eq!(config.game.gift_cap, 100);
        assert_eq!(config.game.gift_cooldown_hours, 4);
        assert_eq!(config.game.daily_plays, 3);
        assert_eq!(config.storage.commit_retries, 5);
        assert_eq!(config.storage.commit_retry_delay_ms, 100);
    }

    #[test]
    fn test_game_section_is_optional() {
        let toml_str = r#"
            [server]
            bind = "0.0.0.0"
            port = 9090
            session_timeout = 30

            [storage]
            data_dir = "/tmp/lamoland"

            [logging]
            level = "debug"
        "#;

        let config: Config = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.server.bind, "0.0.0.0");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.storage.commit_retries, 5);
        assert_eq!(config.game.starting_balance, 1000);
        assert_eq!(config.logging.file, None);
    }

    #[test]
    fn test_rules_reflect_game_section() {
        let mut config = Config::default();
        config.game.starting_balance = 2500;
        config.game.daily_plays = 10;

        let rules = config.rules();
        assert_eq!(rules.starting_balance, 2500);
        assert_eq!(rules.daily_plays, 10);
        assert_eq!(rules.gift_cap, 100);
    }

    #[test]
    fn test_retry_policy_reflects_storage_section() {
        let mut config = Config::default();
        config.storage.commit_retries = 3;
        config.storage.commit_retry_delay_ms = 250;

        let policy = config.retry_policy();
        assert_eq!(policy.attempts, 3);
        assert_eq!(policy.delay, Duration::from_millis(250));
    }

    #[test]
    fn test_default_config_round_trips_through_toml() {
        let config = Config::default();
        let serialized = toml::to_string_pretty(&config).expect("serialize");
        let parsed: Config = toml::from_str(&serialized).expect("parse");
        assert_eq!(parsed.server.port, config.server.port);
        assert_eq!(parsed.game.gift_cap, config.game.gift_cap);
        assert_eq!(parsed.storage.data_dir, config.storage.data_dir);
    }
}
