// ── Request generation tags ──
//
// Monotonic counters that let a store identify late-arriving results of
// superseded requests and discard them instead of applying them over
// newer state. Last-issued wins, regardless of completion order.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub(crate) struct Generation(AtomicU64);

impl Generation {
    pub(crate) fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    /// Start a new request, superseding all earlier ones. Returns the
    /// tag the new request must present when applying its result.
    pub(crate) fn begin(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// True if `tag` still identifies the most recently issued request.
    pub(crate) fn is_current(&self, tag: u64) -> bool {
        self.0.load(Ordering::SeqCst) == tag
    }

    /// Invalidate all outstanding requests without starting a new one.
    pub(crate) fn supersede(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}
