//! # epoch-server
//!
//! JSON HTTP API over [`EpochService`]. Routes live under `/api`, with a
//! liveness probe at `/health`.
//!
//! Every failure is reported as `{"error": "..."}`: 400 for unparseable
//! parameters or bodies, 404 for unknown ids, 500 with a fixed message for
//! store failures (the underlying error goes to the log).

pub mod error;
mod handlers;
mod middleware;

use std::future::Future;
use std::sync::Arc;

use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::get;
use epoch_config::EpochConfig;
use epoch_core::query::QueryDefaults;
use epoch_db::service::EpochService;
use tokio::net::TcpListener;

pub use error::ApiError;

/// Shared by every handler. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<EpochService>,
    pub query_defaults: QueryDefaults,
    /// Empty allows any origin.
    pub cors_allowed_origins: Arc<[String]>,
}

impl AppState {
    /// Accepts an owned service or one already shared with other tasks.
    #[must_use]
    pub fn new(service: impl Into<Arc<EpochService>>, config: &EpochConfig) -> Self {
        Self {
            service: service.into(),
            query_defaults: config.general.query_defaults(),
            cors_allowed_origins: config.server.cors_allowed_origins.clone().into(),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route(
            "/companies",
            get(handlers::companies::list_companies).post(handlers::companies::create_company),
        )
        .route(
            "/companies/{id}",
            get(handlers::companies::get_company).put(handlers::companies::update_company),
        )
        .route("/timeline/{company_id}", get(handlers::timeline::get_timeline))
        .route(
            "/timeline/{company_id}/snapshots",
            get(handlers::timeline::list_snapshots),
        )
        .route(
            "/snapshots",
            axum::routing::post(handlers::snapshots::create_snapshot),
        )
        .route("/snapshots/{id}", get(handlers::snapshots::get_snapshot))
        .route(
            "/snapshots/{id}/sources",
            axum::routing::post(handlers::snapshots::create_source),
        )
        .route(
            "/snapshots/{id}/commentary",
            axum::routing::post(handlers::snapshots::create_commentary),
        )
        .route(
            "/snapshots/{id}/commentary/{commentary_id}",
            axum::routing::put(handlers::snapshots::update_commentary),
        );

    Router::new()
        .route("/health", get(handlers::health))
        .nest("/api", api)
        .fallback(handlers::not_found)
        .layer(from_fn_with_state(state.clone(), middleware::cors_middleware))
        .layer(axum::middleware::from_fn(
            middleware::request_tracing_middleware,
        ))
        .with_state(state)
}

/// Serve `state` on `listener` until `shutdown` resolves, then drain
/// in-flight requests.
///
/// # Errors
///
/// Returns the I/O error that stopped the accept loop.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "epoch server listening");
    }
    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown)
        .await
}

/// Resolves on Ctrl-C, or SIGTERM on unix.
pub async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = sigterm.recv() => {}
                    _ = tokio::signal::ctrl_c() => {}
                }
            }
            Err(error) => {
                tracing::warn!(%error, "cannot listen for SIGTERM; waiting for Ctrl-C only");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
    tracing::info!("shutdown signal received");
}
