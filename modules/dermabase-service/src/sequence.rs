//! Last-request-wins ordering for overlapping queries.
//!
//! Every query takes a ticket at start time. A response may only be applied
//! if no response with a higher ticket has been applied yet, so a slow stale
//! response can never overwrite a newer result no matter when it arrives.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct RequestSequencer {
    issued: AtomicU64,
    applied: AtomicU64,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take a ticket for a request that is starting now. Tickets are
    /// monotonically increasing and never reused.
    pub fn begin(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Try to apply the response for `ticket`. Returns false when a newer
    /// response already applied; the caller must then discard its result.
    pub fn try_apply(&self, ticket: u64) -> bool {
        self.applied.fetch_max(ticket, Ordering::SeqCst) < ticket
    }

    /// The most recently issued ticket.
    pub fn latest(&self) -> u64 {
        self.issued.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tickets_increase_monotonically() {
        let sequencer = RequestSequencer::new();
        let a = sequencer.begin();
        let b = sequencer.begin();
        assert!(b > a);
        assert_eq!(sequencer.latest(), b);
    }

    #[test]
    fn in_order_responses_all_apply() {
        let sequencer = RequestSequencer::new();
        let a = sequencer.begin();
        let b = sequencer.begin();
        assert!(sequencer.try_apply(a));
        assert!(sequencer.try_apply(b));
    }

    #[test]
    fn stale_response_is_discarded_after_newer_applied() {
        let sequencer = RequestSequencer::new();
        let old = sequencer.begin();
        let new = sequencer.begin();

        // The newer request finishes first.
        assert!(sequencer.try_apply(new));
        // The stale one must not clobber it.
        assert!(!sequencer.try_apply(old));
    }

    #[test]
    fn double_apply_of_the_same_ticket_is_rejected() {
        let sequencer = RequestSequencer::new();
        let ticket = sequencer.begin();
        assert!(sequencer.try_apply(ticket));
        assert!(!sequencer.try_apply(ticket));
    }
}
