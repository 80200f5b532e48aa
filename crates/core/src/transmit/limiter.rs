//! In-flight transmission limiter
//!
//! A counting semaphore without waiting: [`InFlightLimiter::try_acquire`]
//! either hands out a permit or refuses. The permit gives its slot back when
//! dropped, so an early return from a transmission can never leak one.

use core::sync::atomic::{AtomicU8, Ordering};

/// At most one transmission talks to the collector at a time
pub const DEFAULT_IN_FLIGHT_CAP: u8 = 1;

#[derive(Debug)]
pub struct InFlightLimiter {
    capacity: u8,
    in_flight: AtomicU8,
    peak: AtomicU8,
}

impl InFlightLimiter {
    pub const fn new(capacity: u8) -> Self {
        Self {
            capacity,
            in_flight: AtomicU8::new(0),
            peak: AtomicU8::new(0),
        }
    }

    /// Take a slot if one is free
    pub fn try_acquire(&self) -> Option<InFlightPermit<'_>> {
        let previous = self
            .in_flight
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                (n < self.capacity).then_some(n + 1)
            })
            .ok()?;
        self.peak.fetch_max(previous + 1, Ordering::AcqRel);
        Some(InFlightPermit { limiter: self })
    }

    /// Transmissions currently holding a permit
    pub fn in_flight(&self) -> u8 {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Highest concurrent count observed since boot
    pub fn peak(&self) -> u8 {
        self.peak.load(Ordering::Acquire)
    }

    pub fn capacity(&self) -> u8 {
        self.capacity
    }
}

impl Default for InFlightLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_IN_FLIGHT_CAP)
    }
}

/// Slot held by one running transmission
#[derive(Debug)]
pub struct InFlightPermit<'a> {
    limiter: &'a InFlightLimiter,
}

impl Drop for InFlightPermit<'_> {
    fn drop(&mut self) {
        self.limiter.in_flight.fetch_sub(1, Ordering::AcqRel);
    }
}
