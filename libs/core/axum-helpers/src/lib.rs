//! # Axum Helpers
//!
//! Shared HTTP boundary pieces for the accounts service.
//!
//! ## Modules
//!
//! - **[`errors`]**: Structured error responses with error codes
//! - **[`extractors`]**: Request extractors (validated JSON and query, UUID path)
//! - **[`server`]**: Router assembly, health endpoint, graceful shutdown
//!
//! ## Quick Start
//!
//! ```ignore
//! use axum::Router;
//! use axum_helpers::server::{create_router, health_router, serve, ServiceInfo};
//! use core_config::server::ServerConfig;
//!
//! #[tokio::main]
//! async fn main() -> std::io::Result<()> {
//!     let api_routes = Router::new(); // Add your routes
//!     let app = create_router(api_routes)
//!         .merge(health_router(ServiceInfo::new("my-service", "0.1.0")));
//!
//!     serve(app, &ServerConfig::default(), async {}).await
//! }
//! ```

pub mod errors;
pub mod extractors;
pub mod server;

// Re-export error types
pub use errors::{AppError, ErrorCode, ErrorResponse};

// Re-export extractors
pub use extractors::{UuidPath, ValidatedJson, ValidatedQuery};

// Re-export server types
pub use server::{ServiceInfo, create_router, health_router, serve, shutdown_signal};
