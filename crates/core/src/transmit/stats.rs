//! Transmission counters

use super::task::TransmissionOutcome;
use crate::error::NetworkError;
use core::sync::atomic::{AtomicU32, Ordering};

/// Dropped samples split by the kind of network failure
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DropCounts {
    /// Link not associated or no address yet
    pub link_down: u32,
    /// Name resolution failed or returned nothing
    pub resolve: u32,
    /// Connection refused or not opened
    pub connect: u32,
    /// Request write or response read failed
    pub transfer: u32,
    /// A step ran past its time bound
    pub timeout: u32,
}

impl DropCounts {
    pub fn total(&self) -> u32 {
        self.link_down + self.resolve + self.connect + self.transfer + self.timeout
    }
}

/// Point-in-time copy of [`TransmitStats`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransmitCounters {
    /// Dispatch rounds that found a pending request
    pub rounds: u32,
    /// Exchanges that got a response from the collector
    pub delivered: u32,
    /// Responses that carried a profile
    pub profile_updates: u32,
    /// Responses without a usable profile
    pub parse_failures: u32,
    /// Samples lost to a network failure, by reason
    pub dropped: DropCounts,
    /// Payloads refused by the in-flight limiter
    pub busy: u32,
    /// Payloads refused by a full transmit queue
    pub rejected: u32,
}

#[derive(Debug, Default)]
struct DropStats {
    link_down: AtomicU32,
    resolve: AtomicU32,
    connect: AtomicU32,
    transfer: AtomicU32,
    timeout: AtomicU32,
}

impl DropStats {
    const fn new() -> Self {
        Self {
            link_down: AtomicU32::new(0),
            resolve: AtomicU32::new(0),
            connect: AtomicU32::new(0),
            transfer: AtomicU32::new(0),
            timeout: AtomicU32::new(0),
        }
    }

    fn counter(&self, error: NetworkError) -> &AtomicU32 {
        match error {
            NetworkError::LinkDown => &self.link_down,
            NetworkError::Resolve | NetworkError::NoAddress => &self.resolve,
            NetworkError::Connect => &self.connect,
            NetworkError::Send | NetworkError::Receive => &self.transfer,
            NetworkError::Timeout => &self.timeout,
        }
    }

    fn snapshot(&self) -> DropCounts {
        DropCounts {
            link_down: self.link_down.load(Ordering::Relaxed),
            resolve: self.resolve.load(Ordering::Relaxed),
            connect: self.connect.load(Ordering::Relaxed),
            transfer: self.transfer.load(Ordering::Relaxed),
            timeout: self.timeout.load(Ordering::Relaxed),
        }
    }
}

/// Shared transmission counters, updated from any task
#[derive(Debug, Default)]
pub struct TransmitStats {
    rounds: AtomicU32,
    delivered: AtomicU32,
    profile_updates: AtomicU32,
    parse_failures: AtomicU32,
    dropped: DropStats,
    busy: AtomicU32,
    rejected: AtomicU32,
}

fn bump(counter: &AtomicU32) {
    counter.fetch_add(1, Ordering::Relaxed);
}

impl TransmitStats {
    pub const fn new() -> Self {
        Self {
            rounds: AtomicU32::new(0),
            delivered: AtomicU32::new(0),
            profile_updates: AtomicU32::new(0),
            parse_failures: AtomicU32::new(0),
            dropped: DropStats::new(),
            busy: AtomicU32::new(0),
            rejected: AtomicU32::new(0),
        }
    }

    pub fn record(&self, outcome: &TransmissionOutcome) {
        match outcome {
            TransmissionOutcome::ProfileUpdated { .. } => {
                bump(&self.delivered);
                bump(&self.profile_updates);
            }
            TransmissionOutcome::Unparsed { .. } => {
                bump(&self.delivered);
                bump(&self.parse_failures);
            }
            TransmissionOutcome::Dropped { error, .. } => bump(self.dropped.counter(*error)),
            TransmissionOutcome::Busy { .. } => bump(&self.busy),
        }
    }

    pub fn record_round(&self) {
        bump(&self.rounds);
    }

    pub fn record_rejected(&self) {
        bump(&self.rejected);
    }

    pub fn snapshot(&self) -> TransmitCounters {
        TransmitCounters {
            rounds: self.rounds.load(Ordering::Relaxed),
            delivered: self.delivered.load(Ordering::Relaxed),
            profile_updates: self.profile_updates.load(Ordering::Relaxed),
            parse_failures: self.parse_failures.load(Ordering::Relaxed),
            dropped: self.dropped.snapshot(),
            busy: self.busy.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseError;
    use crate::sensor::SensorKind;
    use crate::transmit::TransmissionState;

    fn dropped(error: NetworkError) -> TransmissionOutcome {
        TransmissionOutcome::Dropped {
            kind: SensorKind::Light,
            error,
            at: TransmissionState::Connect,
        }
    }

    #[test]
    fn test_record_outcomes() {
        let stats = TransmitStats::new();
        let kind = SensorKind::Light;

        stats.record(&TransmissionOutcome::ProfileUpdated { kind, profile: 2 });
        stats.record(&TransmissionOutcome::Unparsed {
            kind,
            error: ParseError::MissingMarker,
        });
        stats.record(&dropped(NetworkError::Connect));
        stats.record(&TransmissionOutcome::Busy { kind });
        stats.record_round();
        stats.record_rejected();

        assert_eq!(
            stats.snapshot(),
            TransmitCounters {
                rounds: 1,
                delivered: 2,
                profile_updates: 1,
                parse_failures: 1,
                dropped: DropCounts {
                    connect: 1,
                    ..DropCounts::default()
                },
                busy: 1,
                rejected: 1,
            }
        );
    }

    #[test]
    fn test_drops_counted_per_reason() {
        let stats = TransmitStats::new();
        for error in [
            NetworkError::LinkDown,
            NetworkError::LinkDown,
            NetworkError::Resolve,
            NetworkError::NoAddress,
            NetworkError::Connect,
            NetworkError::Send,
            NetworkError::Receive,
            NetworkError::Timeout,
        ] {
            stats.record(&dropped(error));
        }

        let dropped = stats.snapshot().dropped;
        assert_eq!(
            dropped,
            DropCounts {
                link_down: 2,
                resolve: 2,
                connect: 1,
                transfer: 2,
                timeout: 1,
            }
        );
        assert_eq!(dropped.total(), 8);
    }
}
