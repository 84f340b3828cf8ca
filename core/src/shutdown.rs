//! Cooperative shutdown signal.
//!
//! The binary wires this to Ctrl-C; the round controller observes it while
//! traversing, draining and sleeping.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::time::Duration;

use tokio::sync::Notify;

use crate::error::RoundError;

#[derive(Clone, Debug, Default)]
pub struct ShutdownController {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    requested: AtomicBool,
    notify: Notify,
}

impl ShutdownController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_shutdown_requested(&self) -> bool {
        self.inner.requested.load(Ordering::SeqCst)
    }

    /// Request shutdown and wake all waiters.
    pub fn request_shutdown(&self) {
        self.inner.requested.store(true, Ordering::SeqCst);
        self.inner.notify.notify_waiters();
    }

    /// Wait until shutdown is requested.
    pub async fn wait(&self) {
        let notified = self.inner.notify.notified();
        tokio::pin!(notified);
        // Register before checking the flag so a concurrent request cannot slip between.
        notified.as_mut().enable();

        if self.is_shutdown_requested() {
            return;
        }
        notified.await;
    }

    /// Sleeps for `duration` unless shutdown is requested first.
    pub async fn sleep(&self, duration: Duration) -> Result<(), RoundError> {
        tokio::select! {
            _ = tokio::time::sleep(duration) => Ok(()),
            _ = self.wait() => Err(RoundError::Cancelled),
        }
    }

    pub fn check(&self) -> Result<(), RoundError> {
        if self.is_shutdown_requested() {
            Err(RoundError::Cancelled)
        } else {
            Ok(())
        }
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn wait_returns_immediately_once_requested() {
        let shutdown = ShutdownController::new();
        shutdown.request_shutdown();

        shutdown.wait().await;
        assert!(shutdown.check().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn sleep_completes_without_shutdown() {
        let shutdown = ShutdownController::new();
        assert!(shutdown.sleep(Duration::from_secs(30)).await.is_ok());
        assert!(shutdown.check().is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn sleep_is_interrupted_by_shutdown() {
        let shutdown = ShutdownController::new();
        let trigger = shutdown.clone();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            trigger.request_shutdown();
        });

        let started = tokio::time::Instant::now();
        let result = shutdown.sleep(Duration::from_secs(3_600)).await;

        assert!(matches!(result, Err(RoundError::Cancelled)));
        assert!(started.elapsed() < Duration::from_secs(2));
    }
}
