use core_config::{FromEnv, database::DatabaseConfig, server::ServerConfig};

pub use core_config::Environment;

/// Application configuration, composed from the shared config components
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
}

impl AppConfig {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let server = ServerConfig::from_env()?; // HOST=0.0.0.0, PORT=8080 unless set
        let database = DatabaseConfig::from_env()?; // in-memory store unless DATABASE_URL is set

        Ok(Self {
            environment,
            server,
            database,
        })
    }
}
