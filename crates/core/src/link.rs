//! Network association
//!
//! The radio driver owns the actual join procedure. The core only needs to
//! bring the link up before the first transmission and to know whether it
//! is still up.

use crate::error::NetworkError;
use embedded_hal_async::delay::DelayNs;

/// Link-layer association collaborator
#[allow(async_fn_in_trait)]
pub trait NetworkLink {
    /// Associate and acquire an address, failing if either step does
    async fn associate(&mut self) -> Result<(), NetworkError>;

    /// Whether the link is associated and addressed
    fn is_connected(&self) -> bool;
}

/// Associate, retrying up to `attempts` times with `retry_delay_ms` between tries
///
/// Returns the attempt number that succeeded, or the last error.
pub async fn associate_with_retry<L: NetworkLink, D: DelayNs>(
    link: &mut L,
    delay: &mut D,
    attempts: u32,
    retry_delay_ms: u32,
) -> Result<u32, NetworkError> {
    let mut last_error = NetworkError::LinkDown;
    for attempt in 1..=attempts {
        match link.associate().await {
            Ok(()) => return Ok(attempt),
            Err(e) => {
                last_error = e;
                if attempt < attempts {
                    delay.delay_ms(retry_delay_ms).await;
                }
            }
        }
    }
    Err(last_error)
}
