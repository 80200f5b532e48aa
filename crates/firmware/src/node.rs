//! Shared node state
//!
//! Everything more than one task touches lives in one [`NodeState`],
//! allocated once as a `static` and handed to each task as
//! `&'static NodeState` when it is spawned. Every field is safe to share
//! between cores: atomics, critical-section slot tables and an embassy
//! channel.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, Sender, TrySendError};
use sensor_node_core::loops::PayloadSink;
use sensor_node_core::sensor::SENSOR_KIND_COUNT;
use sensor_node_core::transmit::{
    InFlightLimiter, TransmissionPayload, TransmitStats, DEFAULT_IN_FLIGHT_CAP,
};
use sensor_node_core::{ProfileState, SensorRegistry, TransmitRequest};

/// One queued payload per sensor kind: a full dispatch round always fits
/// when the worker has drained the previous one.
pub const TRANSMIT_QUEUE_DEPTH: usize = SENSOR_KIND_COUNT;

pub type TransmitQueue =
    Channel<CriticalSectionRawMutex, TransmissionPayload, TRANSMIT_QUEUE_DEPTH>;

/// State shared by every task on both cores
///
/// The limiter is sized for the single transmission worker.
pub struct NodeState {
    pub registry: SensorRegistry,
    pub profile: ProfileState,
    pub request: TransmitRequest,
    pub stats: TransmitStats,
    pub limiter: InFlightLimiter,
    pub queue: TransmitQueue,
}

impl NodeState {
    pub const fn new() -> Self {
        Self {
            registry: SensorRegistry::new(),
            profile: ProfileState::new(),
            request: TransmitRequest::new(),
            stats: TransmitStats::new(),
            limiter: InFlightLimiter::new(DEFAULT_IN_FLIGHT_CAP),
            queue: Channel::new(),
        }
    }

    /// Dispatch-side handle on the transmit queue
    pub fn sink(&self) -> QueueSink<'_> {
        QueueSink {
            sender: self.queue.sender(),
        }
    }
}

impl Default for NodeState {
    fn default() -> Self {
        Self::new()
    }
}

/// [`PayloadSink`] over the transmit queue, never waits
pub struct QueueSink<'a> {
    sender: Sender<'a, CriticalSectionRawMutex, TransmissionPayload, TRANSMIT_QUEUE_DEPTH>,
}

impl PayloadSink for QueueSink<'_> {
    fn try_submit(&mut self, payload: TransmissionPayload) -> Result<(), TransmissionPayload> {
        self.sender
            .try_send(payload)
            .map_err(|e| match e {
                TrySendError::Full(payload) => payload,
            })
    }
}
