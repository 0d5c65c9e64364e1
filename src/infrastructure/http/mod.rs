use axum::{middleware, routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::controllers::{
    favorites::FavoritesController, health, image::ImageController,
};
use crate::infrastructure::config::Config;
use crate::infrastructure::middleware::request_id_middleware;

/// Assemble the application router. Split out from server startup so the
/// integration tests can drive the exact production routing in-process.
pub fn build_router(
    favorites_controller: Arc<FavoritesController>,
    image_controller: Arc<ImageController>,
) -> Router {
    let favorites_routes = Router::new()
        .route("/favorites", get(FavoritesController::get_favorites))
        .with_state(favorites_controller);

    let image_routes = Router::new()
        .route("/image", get(ImageController::relay_image))
        .with_state(image_controller);

    Router::new()
        .route("/health", get(health::health))
        .merge(favorites_routes)
        .merge(image_routes)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
}

/// Start the HTTP server with all routes configured
pub async fn start_http_server(
    config: Arc<Config>,
    favorites_controller: Arc<FavoritesController>,
    image_controller: Arc<ImageController>,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = build_router(favorites_controller, image_controller);

    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
