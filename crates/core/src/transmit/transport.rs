//! Collector transport abstraction
//!
//! Socket-level byte transport to the collector. The firmware implements it
//! on an embassy-net TCP socket; tests use [`crate::mock::MockTransport`].
//!
//! Every async method must be bounded in time by the implementation. A
//! stalled peer surfaces as [`NetworkError::Timeout`], never as a hang.

use crate::error::NetworkError;

/// Resolved collector address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectorEndpoint {
    pub address: [u8; 4],
    pub port: u16,
}

#[allow(async_fn_in_trait)]
pub trait CollectorTransport {
    /// Whether the link is associated and has an address
    fn link_up(&self) -> bool;

    /// Resolve the collector host
    ///
    /// Host names go through DNS; IPv4 literals resolve without a query.
    /// An empty answer is [`NetworkError::NoAddress`].
    async fn resolve(&mut self, host: &str, port: u16) -> Result<CollectorEndpoint, NetworkError>;

    /// Open a stream to `endpoint`
    async fn connect(&mut self, endpoint: CollectorEndpoint) -> Result<(), NetworkError>;

    /// Write all of `data`; a short write is an error
    async fn send(&mut self, data: &[u8]) -> Result<(), NetworkError>;

    /// Read up to `buffer.len()` bytes, `Ok(0)` at end of stream
    ///
    /// Waits at most the configured read timeout.
    async fn receive(&mut self, buffer: &mut [u8]) -> Result<usize, NetworkError>;

    /// Release the stream. Called once per task, whatever the outcome.
    async fn close(&mut self);
}
