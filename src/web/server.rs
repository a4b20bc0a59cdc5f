//! HTTP server assembly: route table, listener, graceful shutdown.

use std::net::SocketAddr;

use anyhow::Result;
use axum::routing::{delete, get, post};
use axum::Router;
use log::info;
use tokio::net::TcpListener;

use crate::config::Config;
use crate::web::handlers::{accounts, avatars, forum, gifting, meta, minigames, pets, store};
use crate::web::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(meta::service_info))
        .route("/register", post(accounts::register))
        .route("/login", post(accounts::login))
        .route("/logout", post(accounts::logout))
        .route("/profile", get(accounts::profile))
        .route("/store", get(store::store_index))
        .route("/purchase_item/:item_id", post(store::purchase_item))
        .route("/adopt", get(pets::adopt_index))
        .route("/adopt_pet/:species", post(pets::adopt_pet))
        .route("/release_pet/:pet_id", delete(pets::release_pet))
        .route("/delete_item/:entry_id", delete(pets::recycle_item))
        .route(
            "/forums",
            get(forum::forums_index).post(forum::create_topic),
        )
        .route(
            "/topic/:topic_id",
            get(forum::show_topic).post(forum::post_comment),
        )
        .route("/delete/topic/:topic_id", post(forum::delete_topic))
        .route("/delete/comment/:comment_id", post(forum::delete_comment))
        .route(
            "/gifting",
            get(gifting::gifting_index).post(gifting::send_gift),
        )
        .route("/minigames", get(minigames::minigames_index))
        .route("/gain_currency", post(minigames::gain_currency))
        .route("/save-avatar", post(avatars::save_avatar))
        .route("/save-avatar-cropped", post(avatars::save_cropped_avatar))
        .route("/delete_account", post(accounts::delete_account))
        .with_state(state)
}

/// Run the HTTP server until interrupted.
pub async fn run(config: Config) -> Result<()> {
    let state = AppState::new(&config).await?;
    let app = build_router(state);

    let addr: SocketAddr = format!("{}:{}", config.server.bind, config.server.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!("lamoland listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate()).expect("sigterm handler");
        sigterm.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
