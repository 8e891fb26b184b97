// Shutdown signal shared by the server, open event streams and the sampler
use tokio::sync::watch;

pub fn channel() -> (watch::Sender<bool>, watch::Receiver<bool>) {
    watch::channel(false)
}

/// Resolves once shutdown has been requested or the sender is gone.
pub async fn wait_for_shutdown(mut rx: watch::Receiver<bool>) {
    loop {
        if *rx.borrow_and_update() {
            return;
        }
        if rx.changed().await.is_err() {
            return;
        }
    }
}

/// Request shutdown on Ctrl-C.
///
/// If the handler cannot be installed the process keeps running; it can
/// still be stopped by other means.
pub async fn trigger_on_ctrl_c(tx: watch::Sender<bool>) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }

    tracing::info!("shutdown requested");
    let _ = tx.send(true);
}
