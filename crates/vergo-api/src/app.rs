//! Application builder: wires router, middleware and state into an Axum app.

use std::future::{Future, IntoFuture};
use std::time::Duration;

use axum::Router;
use axum::middleware::from_fn;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use vergo_core::error::AppError;
use vergo_core::result::AppResult;

use crate::middleware::cors::build_cors_layer;
use crate::middleware::logging::request_logging;
use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    let server = state.config.server.clone();

    build_router(state)
        .layer(TimeoutLayer::new(Duration::from_secs(
            server.request_timeout_seconds,
        )))
        .layer(build_cors_layer(&server.cors))
        .layer(TraceLayer::new_for_http())
        .layer(from_fn(request_logging))
}

/// Resolves on Ctrl+C or SIGTERM.
///
/// A handler that fails to install is logged and treated as never firing,
/// so the other signal can still stop the server.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Serves `app` until `signal` resolves, then drains in-flight requests.
///
/// The drain is bounded by `grace`; connections still open when it elapses
/// are dropped.
pub async fn serve_with_grace<F>(
    listener: TcpListener,
    app: Router,
    signal: F,
    grace: Duration,
) -> AppResult<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let (fired_tx, mut fired_rx) = watch::channel(false);

    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            signal.await;
            tracing::info!("Shutdown signal received, draining in-flight requests...");
            let _ = fired_tx.send(true);
        })
        .into_future();

    let drain_deadline = async move {
        if fired_rx.wait_for(|fired| *fired).await.is_ok() {
            tokio::time::sleep(grace).await;
        } else {
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        result = server => {
            result.map_err(|e| AppError::internal(format!("Server error: {e}")))?;
        }
        () = drain_deadline => {
            tracing::warn!(
                grace_seconds = grace.as_secs_f64(),
                "Grace period elapsed with requests still in flight"
            );
        }
    }

    Ok(())
}
