use axum::Router;
use axum_helpers::{ServiceInfo, create_router, health_router};
use domain_accounts::{
    AccountService, Argon2Hasher, InMemoryAccountRepository, PgAccountRepository, handlers,
};

use crate::storage::Storage;

const SERVICE_INFO: ServiceInfo =
    ServiceInfo::new(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

/// API routes for the chosen store, without middleware.
pub fn api_routes(storage: &Storage) -> Router {
    let accounts = match storage {
        Storage::Postgres(db) => handlers::router(AccountService::new(
            PgAccountRepository::new(db.clone()),
            Argon2Hasher::new(),
        )),
        Storage::InMemory => handlers::router(AccountService::new(
            InMemoryAccountRepository::new(),
            Argon2Hasher::new(),
        )),
    };

    Router::new().nest("/accounts", accounts)
}

/// Full application: `/api/accounts/...` plus `/health`.
pub fn build_app(storage: &Storage) -> Router {
    create_router(api_routes(storage)).merge(health_router(SERVICE_INFO))
}
