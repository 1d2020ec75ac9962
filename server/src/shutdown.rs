//! Tracking of in-flight request handlers and orderly shutdown.

use log::{info, warn};
use std::future::Future;
use std::net::IpAddr;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

/// Owns every handler task spawned for a datagram and the signal that
/// stops the receive loop.
///
/// Cloning is cheap and all clones share the same tracker and token, so
/// the receive loop, the dispatcher and `main` can each hold one.
#[derive(Debug, Clone, Default)]
pub struct ShutdownCoordinator {
    tracker: TaskTracker,
    token: CancellationToken,
}

impl ShutdownCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs a handler as its own task and tracks it until it finishes.
    pub fn spawn<F>(&self, task: F) -> JoinHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        self.tracker.spawn(task)
    }

    /// Handles a SHUTDOWN request. Only loopback origins are trusted;
    /// anything else is logged and ignored. Returns whether shutdown was
    /// triggered.
    pub fn request_shutdown(&self, origin: IpAddr) -> bool {
        if !is_local(origin) {
            warn!("Ignoring SHUTDOWN from non-local address {}", origin);
            return false;
        }

        info!("Shutdown requested from {}", origin);
        self.trigger();
        true
    }

    /// Stops the receive loop unconditionally (Ctrl+C, tests).
    pub fn trigger(&self) {
        self.token.cancel();
    }

    pub fn is_triggered(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolves once shutdown has been triggered.
    pub async fn triggered(&self) {
        self.token.cancelled().await
    }

    /// Handlers that have been spawned and not yet finished.
    pub fn active_handlers(&self) -> usize {
        self.tracker.len()
    }

    /// Refuses further tracking and waits for every outstanding handler.
    pub async fn drain(&self) {
        self.tracker.close();
        self.tracker.wait().await;
    }
}

fn is_local(origin: IpAddr) -> bool {
    // ::ffff:127.0.0.1 shows up on dual-stack sockets
    origin.to_canonical().is_loopback()
}
