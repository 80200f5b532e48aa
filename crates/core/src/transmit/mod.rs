//! Transmission pipeline
//!
//! - [`payload`]: One reading handed from the dispatch loop to a worker
//! - [`limiter`]: Explicit cap on concurrently running transmissions
//! - [`transport`]: Socket-level collaborator trait
//! - [`task`]: Single-use request/response state machine
//! - [`worker`]: Long-lived consumer that runs tasks under the limiter
//! - [`stats`]: Outcome counters

pub mod limiter;
pub mod payload;
pub mod stats;
pub mod task;
pub mod transport;
pub mod worker;

pub use limiter::{InFlightLimiter, InFlightPermit, DEFAULT_IN_FLIGHT_CAP};
pub use payload::TransmissionPayload;
pub use stats::{DropCounts, TransmitCounters, TransmitStats};
pub use task::{TransmissionOutcome, TransmissionState, TransmissionTask};
pub use transport::{CollectorEndpoint, CollectorTransport};
pub use worker::TransmissionWorker;
