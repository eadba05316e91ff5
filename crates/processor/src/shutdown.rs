//! Interrupt-driven shutdown

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::signal;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Triggers pipeline teardown at most once
#[derive(Debug, Clone, Default)]
pub struct ShutdownController {
    token: CancellationToken,
    triggered: Arc<AtomicBool>,
}

impl ShutdownController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Token cancelled when shutdown is triggered
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Start teardown. Returns `true` only for the call that initiated it.
    pub fn trigger(&self) -> bool {
        if self.triggered.swap(true, Ordering::SeqCst) {
            return false;
        }
        self.token.cancel();
        true
    }

    pub fn is_triggered(&self) -> bool {
        self.triggered.load(Ordering::SeqCst)
    }

    /// Spawn a task that triggers shutdown on Ctrl-C
    ///
    /// Interrupts after the first are logged and ignored. Abort the returned
    /// handle once the pipeline has stopped.
    pub fn listen_for_interrupt(&self) -> JoinHandle<()> {
        let controller = self.clone();
        tokio::spawn(async move {
            loop {
                if let Err(e) = signal::ctrl_c().await {
                    error!(error = %e, "Failed to listen for interrupt");
                    return;
                }

                if controller.trigger() {
                    info!("Interrupt received, shutting down");
                } else {
                    warn!("Interrupt received while already shutting down, ignoring");
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trigger_is_idempotent() {
        let controller = ShutdownController::new();
        let token = controller.token();

        assert!(!token.is_cancelled());
        assert!(controller.trigger());
        assert!(token.is_cancelled());
        assert!(!controller.trigger());
        assert!(controller.is_triggered());
    }

    #[test]
    fn test_clones_share_state() {
        let controller = ShutdownController::new();
        let other = controller.clone();

        assert!(other.trigger());
        assert!(!controller.trigger());
        assert!(controller.token().is_cancelled());
    }

    #[tokio::test]
    async fn test_listener_can_be_aborted() {
        let controller = ShutdownController::new();
        let listener = controller.listen_for_interrupt();

        listener.abort();

        assert!(listener.await.unwrap_err().is_cancelled());
        assert!(!controller.is_triggered());
    }
}
