//! Listening and serving.
//!
//! One tokio task per connection is provided by `axum::serve`; this layer adds
//! no concurrency control of its own.

use crate::config::ServerConfig;
use crate::error::ServeError;
use crate::pipeline::RequestPipeline;
use crate::router::RestService;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{info, warn};

impl<C> RestService<C>
where
    C: Send + Sync + 'static,
{
    /// Service whose pipeline honours the configured body limit.
    #[must_use]
    pub fn from_config(context: C, config: &ServerConfig) -> Self {
        Self::with_pipeline(
            RequestPipeline::new(Arc::new(context)).with_body_limit(config.body_limit),
        )
    }

    /// Serve the registered routes on `config.address()` until Ctrl+C or SIGTERM.
    ///
    /// # Errors
    ///
    /// Returns [`ServeError::Bind`] if the address cannot be bound and
    /// [`ServeError::Serve`] if the accept loop fails.
    pub async fn serve(self, config: &ServerConfig) -> Result<(), ServeError> {
        serve(self.into_router(), &config.address()).await
    }
}

/// Serve `router` on `address` until Ctrl+C or SIGTERM.
///
/// # Errors
///
/// Returns [`ServeError::Bind`] if the address cannot be bound and
/// [`ServeError::Serve`] if the accept loop fails.
pub async fn serve(router: Router, address: &str) -> Result<(), ServeError> {
    let listener = TcpListener::bind(address)
        .await
        .map_err(|source| ServeError::Bind {
            address: address.to_string(),
            source,
        })?;

    info!(address, "Listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(ServeError::Serve)?;

    info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl+C, or SIGTERM on unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C signal, shutting down gracefully...");
        },
        () = terminate => {
            info!("Received SIGTERM signal, shutting down gracefully...");
        },
    }
}
