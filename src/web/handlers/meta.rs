//! Unauthenticated service info at the root path.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::metrics;
use crate::web::error::HttpError;
use crate::web::state::AppState;

#[derive(Serialize)]
pub struct ServiceInfo {
    name: &'static str,
    version: &'static str,
    users: usize,
    topics: usize,
    comments: usize,
    active_sessions: usize,
    uptime_seconds: i64,
    metrics: metrics::Snapshot,
}

pub async fn service_info(
    State(state): State<AppState>,
) -> Result<Json<ServiceInfo>, HttpError> {
    Ok(Json(ServiceInfo {
        name: "lamoland",
        version: env!("CARGO_PKG_VERSION"),
        users: state.store.count_users()?,
        topics: state.store.count_topics()?,
        comments: state.store.count_comments()?,
        active_sessions: state.sessions.active_count(),
        uptime_seconds: (chrono::Utc::now() - state.started_at).num_seconds(),
        metrics: metrics::snapshot(),
    }))
}
