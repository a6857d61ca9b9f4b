//! Route assembly
//!
//! Pages and probes are mounted at the root; [`routes`] is nested under
//! `/api` by `axum_helpers::create_router`.

pub mod health;

use axum::Router;
use axum_helpers::health_router;

use crate::state::AppState;

/// Server-rendered pages, photo downloads and the health probes.
pub fn pages(state: &AppState) -> Router {
    domain_catalog::pages_router(state.catalog.clone())
        .merge(health_router(state.config.app.clone()))
        .merge(health::router(state.clone()))
}

pub fn routes(state: &AppState) -> Router {
    domain_catalog::api_router(state.catalog.clone())
}
