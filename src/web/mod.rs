//! JSON HTTP surface.
//! Thin axum handlers over the game model: resolve the bearer token to a
//! username, call one domain operation, map the outcome to a `{success, ..}`
//! body. Failures share the `{"success": false, "error": ...}` shape.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod server;
pub mod session;
pub mod state;

pub use error::HttpError;
pub use server::{build_router, run};
pub use session::SessionManager;
pub use state::AppState;
