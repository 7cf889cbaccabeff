use core_config::database::DatabaseConfig;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use std::time::Duration;
use tracing::{info, warn};

const CONNECT_ATTEMPTS: u32 = 4;
const INITIAL_BACKOFF: Duration = Duration::from_millis(200);

/// Backing store selected by configuration
pub enum Storage {
    Postgres(DatabaseConnection),
    InMemory,
}

impl Storage {
    /// Connect to PostgreSQL when `DATABASE_URL` is set, otherwise use the in-memory store.
    pub async fn open(config: &DatabaseConfig) -> Result<Self, DbErr> {
        let Some(url) = config.url.as_deref() else {
            warn!("DATABASE_URL not set, accounts are kept in memory only");
            return Ok(Storage::InMemory);
        };

        let db = connect_with_retry(connect_options(url, config)).await?;

        if config.run_migrations {
            info!("Running accounts database migrations...");
            Migrator::up(&db, None).await?;
            info!("Migrations completed successfully");
        }

        Ok(Storage::Postgres(db))
    }

    /// Release the connection pool, if any.
    pub async fn close(self) {
        if let Storage::Postgres(db) = self {
            match db.close().await {
                Ok(()) => info!("PostgreSQL connection closed successfully"),
                Err(e) => tracing::error!("Error closing PostgreSQL: {}", e),
            }
        }
    }
}

fn connect_options(url: &str, config: &DatabaseConfig) -> ConnectOptions {
    let mut options = ConnectOptions::new(url);
    options
        .max_connections(config.max_connections)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .idle_timeout(Duration::from_secs(300))
        .sqlx_logging(false);
    options
}

/// Connect with exponential backoff for transient startup failures.
async fn connect_with_retry(options: ConnectOptions) -> Result<DatabaseConnection, DbErr> {
    let mut delay = INITIAL_BACKOFF;
    let mut attempt = 1;

    loop {
        match Database::connect(options.clone()).await {
            Ok(db) => {
                info!("Successfully connected to PostgreSQL database");
                return Ok(db);
            }
            Err(e) if attempt < CONNECT_ATTEMPTS => {
                warn!(attempt, "PostgreSQL connection failed: {}, retrying in {:?}", e, delay);
                tokio::time::sleep(delay).await;
                delay *= 2;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
