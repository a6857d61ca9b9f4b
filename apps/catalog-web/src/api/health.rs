//! Readiness probe

use axum::{Router, extract::State, response::IntoResponse, routing::get};
use axum_helpers::{HealthCheckFuture, run_health_checks};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/ready", get(readiness_check))
        .with_state(state)
}

/// MongoDB answers a ping and the upload root is still a directory.
async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    let mongodb: HealthCheckFuture<'_> = Box::pin(async {
        let status = database::mongodb::check_health_detailed(&state.db).await;
        tracing::debug!(response_time_ms = status.response_time_ms, "MongoDB ping");
        if status.healthy {
            Ok(())
        } else {
            Err(status.message.unwrap_or_else(|| "ping failed".to_string()))
        }
    });
    let uploads: HealthCheckFuture<'_> = Box::pin(state.catalog.photos.check());

    run_health_checks(vec![("mongodb", mongodb), ("uploads", uploads)]).await
}
