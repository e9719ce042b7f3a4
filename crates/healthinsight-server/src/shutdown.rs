//! Graceful shutdown signal handling.
//!
//! The service is stateless, so shutdown needs no task draining: once the
//! signal fires, axum stops accepting connections and finishes in-flight
//! requests before the process exits.

use tracing::info;

/// Returns a future that resolves when a shutdown signal is received.
///
/// On Unix this listens for both SIGTERM and SIGINT.
/// On other platforms (Windows) it listens for Ctrl-C only.
pub async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm =
            signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
        let mut sigint = signal(SignalKind::interrupt()).expect("failed to install SIGINT handler");

        tokio::select! {
            _ = sigterm.recv() => {
                info!("Shutdown signal received (SIGTERM)");
            }
            _ = sigint.recv() => {
                info!("Shutdown signal received (SIGINT)");
            }
        }
    }

    #[cfg(not(unix))]
    {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutdown signal received (Ctrl-C)");
        }
    }
}
