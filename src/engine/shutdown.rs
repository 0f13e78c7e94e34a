//! Shutdown signal handling for the serving loop.

use {tokio::signal, tokio_util::sync::CancellationToken};

/// Resolves once Ctrl+C or SIGTERM is received, or `token` is cancelled.
///
/// The token is cancelled on the way out so that background tasks holding a
/// clone of it stop as well. If a signal handler cannot be installed, a warning
/// is logged and that signal is ignored.
pub(crate) async fn shutdown_signal(token: CancellationToken) {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => {
                tracing::debug!("Ctrl+C signal received");
            }
            Err(err) => {
                tracing::warn!("Failed to install Ctrl+C handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal_handler) => {
                signal_handler.recv().await;
                tracing::debug!("SIGTERM signal received");
            }
            Err(err) => {
                tracing::warn!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
        _ = token.cancelled() => {
            tracing::debug!("Shutdown requested through cancellation token");
        },
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
    token.cancel();
}
