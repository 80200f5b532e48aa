//! Transmission worker
//!
//! A long-lived consumer of the transmit queue. Each payload runs as one
//! [`TransmissionTask`] while holding an [`InFlightPermit`](super::InFlightPermit);
//! with as many workers as the limiter has slots, a permit is always free
//! and the limiter only guards against misconfiguration.

use super::limiter::InFlightLimiter;
use super::payload::TransmissionPayload;
use super::stats::TransmitStats;
use super::task::{TransmissionOutcome, TransmissionTask};
use super::transport::CollectorTransport;
use crate::profile::ProfileState;
use crate::protocol::{CollectorConfig, ResponseLimits};

/// Runs queued payloads one after another over a single transport
pub struct TransmissionWorker<'a, T: CollectorTransport> {
    transport: T,
    config: &'a CollectorConfig,
    limits: ResponseLimits,
    profile: &'a ProfileState,
    limiter: &'a InFlightLimiter,
    stats: &'a TransmitStats,
}

impl<'a, T: CollectorTransport> TransmissionWorker<'a, T> {
    pub fn new(
        transport: T,
        config: &'a CollectorConfig,
        limits: ResponseLimits,
        profile: &'a ProfileState,
        limiter: &'a InFlightLimiter,
        stats: &'a TransmitStats,
    ) -> Self {
        Self {
            transport,
            config,
            limits,
            profile,
            limiter,
            stats,
        }
    }

    /// Transmit one payload and count the outcome
    pub async fn process(&mut self, payload: TransmissionPayload) -> TransmissionOutcome {
        let outcome = match self.limiter.try_acquire() {
            Some(_permit) => {
                TransmissionTask::new(
                    payload,
                    &mut self.transport,
                    self.config,
                    &self.limits,
                    self.profile,
                )
                .run()
                .await
            }
            None => TransmissionOutcome::Busy { kind: payload.kind },
        };
        self.stats.record(&outcome);
        outcome
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }
}
