use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gallery_backend::controllers::favorites::FavoritesController;
use gallery_backend::controllers::image::ImageController;
use gallery_backend::domain::favorites::{FavoritesService, FavoritesSource};
use gallery_backend::infrastructure::config::{Config, LogFormat};
use gallery_backend::infrastructure::http::start_http_server;
use gallery_backend::infrastructure::pixiv::PixivClient;
use gallery_backend::infrastructure::raindrop::RaindropClient;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        "Starting Gallery Backend on {}:{}",
        config.host,
        config.port
    );

    // Instantiate upstream clients. A missing credential disables that
    // source rather than failing startup; requests against it get a 400.
    let pixiv: Option<Arc<dyn FavoritesSource>> = match &config.pixiv {
        Some(pixiv_config) => Some(Arc::new(PixivClient::new(pixiv_config.clone()))),
        None => {
            tracing::warn!("PIXIV_REFRESH_TOKEN is not set; pixiv source is disabled");
            None
        }
    };
    let raindrop: Option<Arc<dyn FavoritesSource>> = match &config.raindrop {
        Some(raindrop_config) => Some(Arc::new(RaindropClient::new(raindrop_config.clone()))),
        None => {
            tracing::warn!("RAINDROP_TOKEN is not set; raindrop source is disabled");
            None
        }
    };

    // Instantiate services
    let favorites_service = Arc::new(FavoritesService::new(
        pixiv,
        raindrop,
        config.collection_cache_enabled,
    ));

    // Instantiate controllers
    let favorites_controller = Arc::new(FavoritesController::new(favorites_service));
    let image_controller = Arc::new(ImageController::new(config.relay.clone()));

    let config = Arc::new(config);

    // Start HTTP server with all routes
    start_http_server(config, favorites_controller, image_controller).await?;

    Ok(())
}

fn init_logging(config: &Config) {
    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "gallery_backend=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "gallery_backend=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
