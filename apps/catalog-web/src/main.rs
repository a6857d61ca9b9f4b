use axum_helpers::{ShutdownCoordinator, create_production_app, create_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_catalog::mongodb::{MongoCategoryRepository, MongoProductRepository};
use domain_catalog::{CatalogService, CatalogState, PhotoStore, ViewRenderer, seed_if_empty};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    info!(database = config.mongodb.database(), "Connecting to MongoDB");
    let mongo_client =
        database::mongodb::connect_from_config_with_retry(&config.mongodb, None).await?;
    let db = mongo_client.database(config.mongodb.database());

    let products = MongoProductRepository::new(&db);
    let categories = MongoCategoryRepository::new(&db);
    if config.catalog.seed {
        seed_if_empty(&products, &categories).await?;
    }

    let photos = PhotoStore::open(&config.uploads.path).await?;
    let shutdown = ShutdownCoordinator::default();

    let catalog = Arc::new(CatalogState {
        service: CatalogService::new(products, categories),
        views: ViewRenderer::new()?,
        photos,
        config: config.catalog.clone(),
        max_upload_bytes: config.uploads.max_upload_bytes,
        shutdown: shutdown.clone(),
    });

    let state = AppState {
        config,
        mongo_client,
        db,
        catalog,
    };

    let app = create_router::<openapi::ApiDoc>(
        api::pages(&state),
        api::routes(&state),
        state.config.server.request_timeout,
    )?;

    info!("Starting catalog web server (30s shutdown timeout)");

    let mongo_client = state.mongo_client.clone();
    create_production_app(
        app,
        &state.config.server,
        shutdown,
        Duration::from_secs(30),
        async move {
            info!("Shutting down: closing MongoDB connections");
            mongo_client.shutdown().await;
            info!("MongoDB connections closed");
        },
    )
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Catalog web server shutdown complete");
    Ok(())
}
