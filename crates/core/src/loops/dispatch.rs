//! Dispatch loop
//!
//! Consumes the transmit request and hands one payload per registered sensor
//! to the transmission workers. Submissions never wait: when the queue is
//! full the payload is dropped and counted, and the loop moves on.

use crate::scheduler::TransmitRequest;
use crate::sensor::SensorRegistry;
use crate::transmit::{TransmissionPayload, TransmitStats};
use embedded_hal_async::delay::DelayNs;

/// Non-blocking hand-off to the transmission workers
pub trait PayloadSink {
    /// Queue a payload, or give it back if there is no room
    fn try_submit(&mut self, payload: TransmissionPayload) -> Result<(), TransmissionPayload>;
}

/// Result of a dispatch round
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchRound {
    /// Payloads accepted by the sink
    pub submitted: u8,
    /// Payloads refused by the sink
    pub rejected: u8,
}

/// Dispatch side of the node
///
/// Each tick takes a pending transmit request, snapshots the registry and
/// hands one payload per present sensor to the sink without waiting on the
/// network.
pub struct DispatchLoop<'a> {
    registry: &'a SensorRegistry,
    request: &'a TransmitRequest,
    stats: &'a TransmitStats,
    stagger_ms: u32,
}

impl<'a> DispatchLoop<'a> {
    pub fn new(
        registry: &'a SensorRegistry,
        request: &'a TransmitRequest,
        stats: &'a TransmitStats,
        stagger_ms: u32,
    ) -> Self {
        Self {
            registry,
            request,
            stats,
            stagger_ms,
        }
    }

    /// Run one dispatch round if a transmission is due
    ///
    /// Returns `None` when no request was pending. The payloads carry the
    /// values of a single registry snapshot taken after the request is
    /// consumed; launches are spaced by the stagger delay.
    pub async fn tick<S: PayloadSink, D: DelayNs>(
        &mut self,
        sink: &mut S,
        delay: &mut D,
    ) -> Option<DispatchRound> {
        if !self.request.take() {
            return None;
        }
        self.stats.record_round();

        let mut round = DispatchRound::default();
        for (i, record) in self.registry.snapshot().into_iter().enumerate() {
            if i > 0 && self.stagger_ms > 0 {
                delay.delay_ms(self.stagger_ms).await;
            }
            match sink.try_submit(TransmissionPayload::from(record)) {
                Ok(()) => round.submitted += 1,
                Err(_dropped) => {
                    round.rejected += 1;
                    self.stats.record_rejected();
                }
            }
        }
        Some(round)
    }
}
