//! OS signal handling.
//!
//! SIGINT (Ctrl-C) and, on unix, SIGTERM cancel the wait. A handler that
//! cannot be installed is logged and never fires.

use std::io;

use crate::lifecycle::shutdown::Shutdown;

/// Resolve on the first termination signal.
pub async fn wait_for_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = ctrl_c() => {}
                    _ = term.recv() => {}
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Could not install SIGTERM handler");
                ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        ctrl_c().await;
    }
}

async fn ctrl_c() {
    delivered_or_pending(tokio::signal::ctrl_c().await, "SIGINT").await
}

/// Resolve for a delivered signal; stay pending when listening failed.
async fn delivered_or_pending(result: io::Result<()>, signal: &str) {
    if let Err(e) = result {
        tracing::warn!(signal, error = %e, "Could not listen for signal");
        std::future::pending::<()>().await;
    }
}

/// Spawn a task that triggers `shutdown` on the first termination signal.
pub fn spawn_signal_listener(shutdown: Shutdown) {
    tokio::spawn(async move {
        wait_for_signal().await;
        tracing::warn!("Termination signal received, cancelling wait");
        shutdown.trigger();
    });
}
