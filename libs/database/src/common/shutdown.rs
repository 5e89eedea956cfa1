use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use strum::{AsRefStr, Display};
use tokio::signal;
use tokio::sync::broadcast;
use tracing::{error, info};

/// What ended the wait in [`ShutdownCoordinator::wait_for_signal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
pub enum ShutdownSignal {
    #[strum(serialize = "SIGINT")]
    Interrupt,
    #[strum(serialize = "SIGTERM")]
    Terminate,
    /// [`ShutdownCoordinator::shutdown`] was called directly.
    #[strum(serialize = "requested")]
    Requested,
}

/// Shutdown coordinator that manages graceful application shutdown.
///
/// This handles:
/// - Signal reception (SIGTERM, SIGINT)
/// - Broadcasting shutdown to all subsystems (e.g. the MongoDB close hook)
/// - Shutdown state tracking
#[derive(Clone)]
pub struct ShutdownCoordinator {
    /// Broadcast channel to notify all tasks of shutdown
    tx: broadcast::Sender<()>,
    /// Flag indicating if shutdown has been initiated
    shutdown_initiated: Arc<AtomicBool>,
}

impl ShutdownCoordinator {
    /// Create a new shutdown coordinator.
    ///
    /// Returns the coordinator and a receiver for shutdown signals.
    pub fn new() -> (Self, broadcast::Receiver<()>) {
        let (tx, rx) = broadcast::channel(1);
        let coordinator = Self {
            tx,
            shutdown_initiated: Arc::new(AtomicBool::new(false)),
        };
        (coordinator, rx)
    }

    /// Subscribe to shutdown notifications.
    ///
    /// A receiver created after [`shutdown`](Self::shutdown) was called never
    /// sees the notification; use [`cancelled`](Self::cancelled) instead.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Check if shutdown has been initiated.
    pub fn is_shutting_down(&self) -> bool {
        self.shutdown_initiated.load(Ordering::SeqCst)
    }

    /// Initiate shutdown and notify all subscribers. Only the first call notifies.
    pub fn shutdown(&self) {
        if self
            .shutdown_initiated
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
        {
            info!("Initiating graceful shutdown");
            let _ = self.tx.send(());
        }
    }

    /// Resolves once shutdown has been initiated, including before this call.
    pub async fn cancelled(&self) {
        let mut rx = self.subscribe();
        if self.is_shutting_down() {
            return;
        }
        // Lagged or closed both mean the notification already went out
        let _ = rx.recv().await;
    }

    /// Wait for SIGINT, SIGTERM or a direct [`shutdown`](Self::shutdown) call,
    /// then broadcast shutdown to every subscriber.
    pub async fn wait_for_signal(&self) -> ShutdownSignal {
        let received = tokio::select! {
            _ = interrupt() => ShutdownSignal::Interrupt,
            _ = terminate() => ShutdownSignal::Terminate,
            _ = self.cancelled() => ShutdownSignal::Requested,
        };

        info!(signal = %received, "Shutdown signal received");
        self.shutdown();
        received
    }
}

impl Default for ShutdownCoordinator {
    fn default() -> Self {
        Self::new().0
    }
}

/// Simple shutdown signal for basic use cases.
///
/// Completes on SIGINT or SIGTERM without any coordination. Prefer
/// [`ShutdownCoordinator`] when other tasks need to react.
pub async fn shutdown_signal() -> ShutdownSignal {
    let received = tokio::select! {
        _ = interrupt() => ShutdownSignal::Interrupt,
        _ = terminate() => ShutdownSignal::Terminate,
    };
    info!(signal = %received, "Shutdown signal received");
    received
}

async fn interrupt() {
    if let Err(e) = signal::ctrl_c().await {
        error!(error = %e, "Failed to install SIGINT handler");
        std::future::pending::<()>().await;
    }
}

#[cfg(unix)]
async fn terminate() {
    match signal::unix::signal(signal::unix::SignalKind::terminate()) {
        Ok(mut stream) => {
            stream.recv().await;
        }
        Err(e) => {
            error!(error = %e, "Failed to install SIGTERM handler");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn terminate() {
    std::future::pending::<()>().await;
}
