use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use color_eyre::eyre::{Context, eyre};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::http_server::{auth::require_bearer_token, routes, state::AppState};

pub fn router(state: Arc<AppState>) -> Router {
    #[cfg(debug_assertions)]
    let cors_layer = CorsLayer::permissive();

    #[cfg(not(debug_assertions))]
    let cors_layer = CorsLayer::new();

    let api = Router::new()
        .route("/artists/search", get(routes::search_artists))
        .route("/playlists", post(routes::create_playlist))
        .route("/playlists/search", get(routes::search_playlists))
        .route("/playlists/{playlist_id}/setlists", post(routes::add_setlist))
        .route_layer(middleware::from_fn(require_bearer_token));

    Router::new()
        .route("/health", get(routes::health))
        .merge(api)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer),
        )
        .with_state(state)
}

pub async fn start(port: u16, state: Arc<AppState>) -> color_eyre::Result<()> {
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .wrap_err_with(|| eyre!("Failed to bind to port {}", port))?;
    tracing::info!("Listening on port {}", port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .wrap_err("Failed to start HTTP server")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutting down HTTP server");
}
