//! Cancellation coordination for the wait.

use std::future::Future;

use tokio::sync::broadcast;

/// Coordinator for cancelling an in-progress wait.
///
/// Clones share one broadcast channel; triggering any clone wakes every
/// future returned by [`Shutdown::cancelled`].
#[derive(Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    /// Resolves once [`Shutdown::trigger`] is called after this point.
    pub fn cancelled(&self) -> impl Future<Output = ()> + Send + 'static {
        let mut rx = self.subscribe();
        async move {
            match rx.recv().await {
                Ok(()) | Err(broadcast::error::RecvError::Lagged(_)) => {}
                // Every handle dropped: nobody can cancel any more.
                Err(broadcast::error::RecvError::Closed) => std::future::pending().await,
            }
        }
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_trigger_wakes_cancelled() {
        let shutdown = Shutdown::new();
        let cancelled = shutdown.cancelled();
        let trigger = shutdown.clone();
        tokio::spawn(async move { trigger.trigger() });

        tokio::time::timeout(Duration::from_secs(1), cancelled)
            .await
            .expect("cancelled future should resolve");
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_handles_never_cancel() {
        let cancelled = Shutdown::new().cancelled();
        let res = tokio::time::timeout(Duration::from_secs(60), cancelled).await;
        assert!(res.is_err());
    }
}
