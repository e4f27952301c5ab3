//! Debounced search driver
//!
//! Search-as-you-type must not issue one request per keystroke. Each
//! search attempt takes a monotonically increasing ticket, waits out the
//! debounce window, and proceeds only if no newer attempt has started.
//! The same ticket is re-checked before results are applied, so a slow
//! response from a superseded request can never overwrite the results of
//! the latest one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Ticket identifying one search attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchTicket(u64);

/// Sequencer for debounced, last-writer-wins searches
pub struct SearchSequencer {
    latest: AtomicU64,
    delay: Duration,
}

impl SearchSequencer {
    pub fn new(delay: Duration) -> Self {
        Self {
            latest: AtomicU64::new(0),
            delay,
        }
    }

    /// Register a new attempt, superseding all earlier ones.
    pub fn begin(&self) -> SearchTicket {
        SearchTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Wait out the debounce window.
    ///
    /// Returns false if a newer attempt started while waiting, in which
    /// case the caller must not issue a backend call.
    pub async fn settle(&self, ticket: SearchTicket) -> bool {
        tokio::time::sleep(self.delay).await;
        self.is_current(ticket)
    }

    /// True while no newer attempt has begun.
    pub fn is_current(&self, ticket: SearchTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }
}
