//! Server infrastructure module.
//!
//! This module provides:
//! - Router assembly with tracing middleware and a JSON 404 fallback
//! - Liveness endpoint
//! - Graceful shutdown with a bounded cleanup phase
//!
//! # Example
//!
//! ```ignore
//! use axum_helpers::server::{create_router, health_router, serve, ServiceInfo};
//!
//! let app = create_router(api_routes)
//!     .merge(health_router(ServiceInfo::new("accounts-api", "0.1.0")));
//!
//! serve(app, &ServerConfig::default(), async { db.close().await.ok(); }).await?;
//! ```

pub mod app;
pub mod health;
pub mod shutdown;

pub use app::{create_router, serve};
pub use health::{HealthResponse, ServiceInfo, health_router};
pub use shutdown::shutdown_signal;
