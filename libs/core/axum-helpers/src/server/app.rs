use super::shutdown::ShutdownCoordinator;
use crate::errors::handlers::not_found;
use crate::http::{cors_layer_from_env, security_headers};
use axum::{Router, http::StatusCode, middleware};
use core_config::server::ServerConfig;
use std::io;
use std::time::Duration;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info, warn};
use utoipa::OpenApi;

/// Combine page routes and API routes with the cross-cutting layers.
///
/// - `pages` are mounted at the root (server-rendered HTML, uploads).
/// - `apis` are nested under `/api` and documented by `T`.
/// - OpenAPI UIs: `/swagger-ui`, `/redoc`, `/rapidoc`, `/scalar`.
/// - Layers: request tracing, a per-request deadline answering 408,
///   security headers, and CORS when `CORS_ALLOWED_ORIGIN` is set.
///
/// No response compression: the listing pages stream chunk by chunk and
/// an encoder would hold chunks back.
///
/// # Errors
/// Fails if `CORS_ALLOWED_ORIGIN` is set to an invalid value.
pub fn create_router<T>(pages: Router, apis: Router, request_timeout: Duration) -> io::Result<Router>
where
    T: OpenApi + 'static,
{
    use utoipa_rapidoc::RapiDoc;
    use utoipa_redoc::{Redoc, Servable as RedocServable};
    use utoipa_scalar::{Scalar, Servable as ScalarServable};
    use utoipa_swagger_ui::SwaggerUi;

    let router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", T::openapi()))
        .merge(Redoc::with_url("/redoc", T::openapi()))
        .merge(RapiDoc::new("/api-docs/openapi.json").path("/rapidoc"))
        .merge(Scalar::with_url("/scalar", T::openapi()))
        .merge(pages)
        .nest("/api", apis)
        .fallback(not_found)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(middleware::from_fn(security_headers));

    Ok(match cors_layer_from_env()? {
        Some(cors) => router.layer(cors),
        None => router,
    })
}

/// Serve `router` until SIGINT/SIGTERM, then drain and run `cleanup`.
///
/// `coordinator` is shared with the application state so long-running
/// response streams can observe the shutdown and finish early. `cleanup`
/// is bounded by `shutdown_timeout`.
pub async fn create_production_app<F>(
    router: Router,
    server_config: &ServerConfig,
    coordinator: ShutdownCoordinator,
    shutdown_timeout: Duration,
    cleanup: F,
) -> io::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let listener = tokio::net::TcpListener::bind(server_config.address()).await?;
    info!("Server starting on {}", listener.local_addr()?);

    let signal_handle = coordinator.clone();
    tokio::spawn(async move { signal_handle.wait_for_signal().await });

    serve_until_shutdown(listener, router, coordinator, shutdown_timeout, cleanup).await
}

/// Serve on `listener` until `coordinator` fires.
///
/// `cleanup` only starts once every in-flight request has been answered,
/// so handlers never see resources it releases.
pub async fn serve_until_shutdown<F>(
    listener: tokio::net::TcpListener,
    router: Router,
    coordinator: ShutdownCoordinator,
    shutdown_timeout: Duration,
    cleanup: F,
) -> io::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let mut stop = coordinator.subscribe();
    let already_stopping = coordinator.is_shutting_down();
    let serve_result = axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(async move {
            if !already_stopping {
                let _ = stop.recv().await;
            }
        })
        .await
        .inspect_err(|e| {
            tracing::error!("Server encountered an error: {:?}", e);
        });

    info!("Connections drained, starting cleanup (timeout: {:?})", shutdown_timeout);
    match tokio::time::timeout(shutdown_timeout, cleanup).await {
        Ok(_) => info!("Cleanup completed successfully"),
        Err(_) => warn!(
            "Cleanup exceeded timeout of {:?}, forcing shutdown",
            shutdown_timeout
        ),
    }

    serve_result
}
