//! Server bootstrap: state, listener and graceful shutdown.

use std::future::Future;

use tokio::net::TcpListener;
use tracing::info;

use crate::api::{create_router, AppState};
use crate::config::Config;
use crate::error::{Result, ServerError};
use crate::metrics;
use crate::utils::shutdown_signal;

/// Build the shared state, installing the Prometheus recorder when enabled.
pub fn build_state(config: Config) -> Result<AppState> {
    let metrics_enabled = config.metrics_enabled;
    let state = AppState::new(config);
    if !metrics_enabled {
        return Ok(state);
    }

    let handle = metrics::install_recorder()?;
    metrics::init_metrics();
    Ok(state.with_metrics(handle))
}

/// Serve on `listener` until `shutdown` resolves.
pub async fn serve_with_shutdown<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let router = create_router(state);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await?;
    info!("HTTP server stopped");
    Ok(())
}

/// Validate `config`, bind the configured address and serve until Ctrl-C or
/// SIGTERM.
pub async fn run(config: Config) -> Result<()> {
    config.validate().map_err(ServerError::InvalidConfig)?;

    let listener = TcpListener::bind((config.host.as_str(), config.port)).await?;
    info!("HTTP server listening on {}", listener.local_addr()?);
    info!("Environment: {}", config.app_env);

    let state = build_state(config)?;
    serve_with_shutdown(listener, state, shutdown_signal()).await
}
