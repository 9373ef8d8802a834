//! Latest-wins sequencing for asynchronous completions.
//!
//! Every scheduled task takes a [`Ticket`]. A completion may commit only if
//! its ticket is still the most recently issued one and the sequencer hasn't
//! been retired. Completion order doesn't matter.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Proof of which scheduling a completion belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

impl Ticket {
    pub fn seq(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
pub struct Sequencer {
    latest: AtomicU64,
    retired: AtomicBool,
}

impl Sequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a ticket, superseding every earlier one.
    pub fn begin(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether a completion holding `ticket` may commit.
    pub fn is_current(&self, ticket: Ticket) -> bool {
        !self.is_retired() && self.latest.load(Ordering::SeqCst) == ticket.0
    }

    /// Invalidate all outstanding and future tickets.
    pub fn retire(&self) {
        self.retired.store(true, Ordering::SeqCst);
    }

    pub fn is_retired(&self) -> bool {
        self.retired.load(Ordering::SeqCst)
    }
}
