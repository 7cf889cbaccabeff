use axum_helpers::serve;
use core_config::tracing::{init_tracing, install_color_eyre};
use tracing::info;

mod app;
mod config;
mod storage;

use config::AppConfig;
use storage::Storage;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output (before any fallible operations)
    install_color_eyre();

    let config = AppConfig::from_env()?;

    init_tracing(&config.environment);

    let storage = Storage::open(&config.database)
        .await
        .map_err(|e| eyre::eyre!("PostgreSQL connection failed: {}", e))?;

    let app = app::build_app(&storage);

    info!(
        persistent = config.database.is_persistent(),
        "Starting accounts API"
    );

    serve(app, &config.server, async move {
        info!("Shutting down: closing database connections");
        storage.close().await;
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Accounts API shutdown complete");
    Ok(())
}
