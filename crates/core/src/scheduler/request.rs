//! Transmit request flag

use core::sync::atomic::{AtomicBool, Ordering};

/// Coalescing transmit request
///
/// Raised from timer context, taken by the dispatch loop. Any number of
/// raises before one take collapse into a single pending request.
#[derive(Debug, Default)]
pub struct TransmitRequest {
    pending: AtomicBool,
}

impl TransmitRequest {
    /// Flag with no request pending
    pub const fn new() -> Self {
        Self {
            pending: AtomicBool::new(false),
        }
    }

    /// Mark a transmission as due. Safe from interrupt context.
    pub fn raise(&self) {
        self.pending.store(true, Ordering::Release);
    }

    /// Consume the pending request, if any
    pub fn take(&self) -> bool {
        self.pending.swap(false, Ordering::AcqRel)
    }

    /// Whether a request is waiting, without consuming it
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }
}
