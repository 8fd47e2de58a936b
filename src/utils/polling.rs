//! Cancellable interval polling
//!
//! Polling timers in the client (ticket availability, streaming status)
//! are modeled as an explicit subscription: [`start_polling`] spawns a
//! tokio task and returns a [`PollHandle`] whose `stop()` cancels it.
//! Callers must stop the handle when the owning view closes.

use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

/// Handle to a running polling task
#[derive(Debug)]
pub struct PollHandle {
    stop_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl PollHandle {
    /// Stop the polling task. Idempotent; safe to call after the task
    /// has already finished.
    pub fn stop(self) {
        let _ = self.stop_tx.send(true);
        self.task.abort();
        debug!("Polling task stopped");
    }

    /// Whether the polling task is still running
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }
}

/// Spawn a polling task invoking `tick` every `interval` until stopped.
///
/// The first tick fires after one full interval, not immediately. Errors
/// inside `tick` are the callback's responsibility; the loop keeps going.
pub fn start_polling<F, Fut>(interval: Duration, mut tick: F) -> PollHandle
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send,
{
    let (stop_tx, mut stop_rx) = watch::channel(false);

    let task = tokio::spawn(async move {
        let mut timer = tokio::time::interval(interval);
        // The first interval tick completes immediately; consume it so the
        // cadence starts one interval from now.
        timer.tick().await;

        loop {
            tokio::select! {
                _ = timer.tick() => tick().await,
                changed = stop_rx.changed() => {
                    if changed.is_err() || *stop_rx.borrow() {
                        break;
                    }
                }
            }
        }
    });

    PollHandle { stop_tx, task }
}
