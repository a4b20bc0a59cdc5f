//! # Lamoland - Virtual-Pet Community Server
//!
//! Lamoland is a self-hosted community server for a virtual-pet site. Users
//! register, earn and spend Lamocoins, buy cosmetic items, adopt pets, talk
//! on a nested forum, gift coins to each other, and bank minigame scores,
//! all over a JSON HTTP API.
//!
//! ## Features
//!
//! - **Account Ledger**: Non-negative balances with atomic debit/credit; every
//!   spend commits together with the row it pays for.
//! - **Item Store & Adoption Center**: An immutable seeded catalog of cosmetic
//!   items (grouped into color variants) and pet species.
//! - **Nested Forum**: Globally-unique topic titles, comments nested up to two
//!   levels deep, owner-gated cascade deletion.
//! - **Gifting Throttle**: Capped transfers with a per-sender cooldown.
//! - **Daily Allowances**: Per-game play counters that roll over at midnight.
//! - **Security**: Argon2id password hashing, input sanitization, opaque
//!   bearer-token sessions with inactivity timeout.
//! - **Async Design**: Built with Tokio and axum; sled transactions with a
//!   bounded commit-retry wrapper underneath.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lamoland::config::Config;
//! use lamoland::web;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Load configuration
//!     let config = Config::load("config.toml").await?;
//!
//!     // Run the HTTP server until interrupted
//!     web::run(config).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`game`] - Game model: ledger, catalog, forum, gifting, allowances, storage
//! - [`web`] - JSON HTTP surface: router, handlers, sessions, error mapping
//! - [`config`] - Configuration management and defaults
//! - [`validation`] - Input validation and sanitization utilities
//! - [`metrics`] - In-process operation counters

pub mod config;
pub mod game;
pub mod logutil;
pub mod metrics;
pub mod validation;
pub mod web;
