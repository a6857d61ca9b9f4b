//! # Axum Helpers
//!
//! Shared plumbing for the catalog web services.
//!
//! - **[`server`]**: router assembly with OpenAPI UIs, health checks, graceful shutdown
//! - **[`http`]**: security headers and optional CORS
//! - **[`errors`]**: [`AppError`] and the JSON [`ErrorResponse`] body

pub mod errors;
pub mod http;
pub mod server;

pub use server::{
    HealthCheckFuture, HealthResponse, ShutdownCoordinator, create_production_app, create_router,
    health_router, run_health_checks, shutdown_signal,
};

pub use http::{cors_layer_from_env, create_cors_layer, security_headers};

pub use errors::{AppError, ErrorCode, ErrorResponse};
