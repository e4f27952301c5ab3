//! Background polling
//!
//! Fixed-interval repetition of an async task, used to keep the
//! pending-request and notification lists fresh. The handle stops the
//! loop explicitly or on drop, so a dismissed view never leaves its
//! poller running.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;

/// Handle to a running poll loop. Dropping it stops the loop.
pub struct PollHandle {
    task: JoinHandle<()>,
}

impl PollHandle {
    /// Stop the loop. Idempotent.
    pub fn stop(&self) {
        self.task.abort();
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Run `tick` every `interval` until the handle is stopped or dropped.
///
/// The first tick fires after one full interval, not immediately; the
/// caller fetches once up front if it wants fresh data at mount time.
/// Errors from a tick are logged and do not stop the loop.
pub fn spawn_poller<F, Fut>(interval: Duration, mut tick: F) -> PollHandle
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = crate::error::Result<()>> + Send,
{
    let task = tokio::spawn(async move {
        let mut timer = tokio::time::interval(interval);
        // The interval's first tick completes immediately; consume it so
        // the first real tick lands one interval from now.
        timer.tick().await;
        loop {
            timer.tick().await;
            if let Err(error) = tick().await {
                tracing::debug!(%error, "Poll tick failed");
            }
        }
    });
    PollHandle { task }
}
