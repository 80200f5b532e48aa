//! Transmission payload

use crate::sensor::{SensorKind, SensorRecord};

/// One reading on its way to the collector
///
/// Not `Clone`. The dispatch loop builds it and moves it into the queue;
/// exactly one transmission task consumes it.
#[derive(Debug, PartialEq, Eq)]
pub struct TransmissionPayload {
    pub kind: SensorKind,
    pub value: i32,
}

impl TransmissionPayload {
    pub fn new(kind: SensorKind, value: i32) -> Self {
        Self { kind, value }
    }
}

impl From<SensorRecord> for TransmissionPayload {
    fn from(record: SensorRecord) -> Self {
        Self::new(record.kind, record.last_value)
    }
}
