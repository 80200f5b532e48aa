//! Request encoder

use super::config::CollectorConfig;
use crate::transmit::TransmissionPayload;
use core::fmt::{self, Write};
use heapless::String;

/// Capacity of an encoded request
///
/// Sized for the longest host and user agent [`CollectorConfig`] accepts.
pub const REQUEST_CAPACITY: usize = 256;

/// Encode one reading as the collector's GET request
pub fn encode_request(
    payload: &TransmissionPayload,
    config: &CollectorConfig,
) -> Result<String<REQUEST_CAPACITY>, fmt::Error> {
    let mut request = String::new();
    write!(
        request,
        "GET /?sensor_id={}&measurement={} HTTP/1.0\r\nHost: {}:{}\r\nUser-Agent: {}\r\n\r\n",
        payload.kind.sensor_id(),
        payload.value,
        config.host,
        config.port,
        config.user_agent,
    )?;
    Ok(request)
}
