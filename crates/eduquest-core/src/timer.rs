//! Cancellable countdown ticks.
//!
//! The exam countdown is driven by a spawned task delivering one tick per
//! second over a channel. The handle must be cancelled whenever the phase
//! leaves `Ongoing`; dropping it cancels too, so an orphaned task can never
//! outlive its owner and keep mutating state.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// A repeating one-second tick source with explicit cancellation.
pub struct Countdown {
    ticks: mpsc::Receiver<()>,
    task: JoinHandle<()>,
}

impl Countdown {
    /// Start ticking once per second.
    pub fn start() -> Self {
        Self::with_period(Duration::from_secs(1))
    }

    /// Start with a custom period (tests).
    pub fn with_period(period: Duration) -> Self {
        let (tx, rx) = mpsc::channel(1);
        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first interval tick fires immediately; swallow it so the
            // countdown starts a full period after `start`.
            interval.tick().await;
            loop {
                interval.tick().await;
                if tx.send(()).await.is_err() {
                    break;
                }
            }
        });
        Self { ticks: rx, task }
    }

    /// Wait for the next tick. Returns `None` once cancelled.
    pub async fn tick(&mut self) -> Option<()> {
        self.ticks.recv().await
    }

    /// Stop the tick source. Idempotent.
    pub fn cancel(&self) {
        self.task.abort();
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        self.task.abort();
    }
}
