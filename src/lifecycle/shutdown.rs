//! Shutdown coordination and signal handling.
//!
//! # Responsibilities
//! - Broadcast the shutdown signal to every long-running task
//! - Translate ctrl-c (SIGINT) into that signal

use tokio::sync::broadcast;

/// Coordinator for graceful shutdown.
///
/// Long-running tasks subscribe and exit when the signal fires. The
/// database pools are closed by `main` only after the HTTP server has
/// drained, so no in-flight request loses its connection.
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Subscribe to the shutdown signal.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Trigger the shutdown signal.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    /// Spawn a listener that triggers the signal on ctrl-c.
    ///
    /// If the handler cannot be registered the process keeps running but
    /// can only be stopped externally, so the error is logged loudly.
    pub fn trigger_on_ctrl_c(&self) {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    tracing::info!("Shutdown signal received");
                    let _ = tx.send(());
                }
                Err(error) => {
                    tracing::error!(error = %error, "Failed to listen for shutdown signal");
                }
            }
        });
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
