//! Graceful shutdown coordination.
//!
//! `main` owns a [`Shutdown`] and hands a clone to the signal task. The
//! server waits on a [`ShutdownSignal`] taken before it starts serving.
//! Dropping every `Shutdown` handle counts as a trigger, so a server can
//! never outlive its coordinator.

use tokio::sync::broadcast;

#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

/// One waiter's view of the shutdown trigger.
#[derive(Debug)]
pub struct ShutdownSignal {
    rx: broadcast::Receiver<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// A waiter that resolves on the next trigger.
    pub fn signal(&self) -> ShutdownSignal {
        ShutdownSignal {
            rx: self.tx.subscribe(),
        }
    }

    /// Wake every waiter. Returns how many were waiting.
    pub fn trigger(&self) -> usize {
        let waiting = self.tx.send(()).unwrap_or(0);
        tracing::debug!(waiting, "Shutdown triggered");
        waiting
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownSignal {
    /// Resolve once shutdown is triggered or every coordinator is gone.
    pub async fn wait(mut self) {
        let _ = self.rx.recv().await;
    }
}
