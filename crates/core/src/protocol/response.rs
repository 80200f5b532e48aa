//! Collector response handling
//!
//! The collector gives no framing beyond the `#` marker, so the response is
//! read in fixed chunks into a bounded buffer. The number of reads is capped
//! as well, which terminates a peer that keeps sending full chunks.

use crate::error::{ConfigError, ParseError};
use heapless::Vec;

/// Byte that introduces the profile token
pub const PROFILE_MARKER: u8 = b'#';

/// Largest chunk a single receive may request
pub const MAX_CHUNK_LEN: usize = 128;

/// Largest response the buffer can hold
pub const MAX_RESPONSE_CAPACITY: usize = 2048;

/// Position of the first profile marker, if any
pub fn find_marker(response: &[u8]) -> Option<usize> {
    response.iter().position(|&b| b == PROFILE_MARKER)
}

/// Extract the profile that follows the first `#`
///
/// The token is an optional sign followed by at least one decimal digit;
/// parsing stops at the first non-digit.
pub fn parse_profile(response: &[u8]) -> Result<i32, ParseError> {
    let marker = find_marker(response).ok_or(ParseError::MissingMarker)?;
    let mut rest = &response[marker + 1..];

    let negative = match rest.first() {
        Some(b'-') => {
            rest = &rest[1..];
            true
        }
        Some(b'+') => {
            rest = &rest[1..];
            false
        }
        _ => false,
    };

    let digits = rest.iter().take_while(|b| b.is_ascii_digit()).count();
    if digits == 0 {
        return Err(ParseError::MissingDigits);
    }

    // Accumulate negatively so i32::MIN parses
    let mut value: i32 = 0;
    for &b in &rest[..digits] {
        value = value
            .checked_mul(10)
            .and_then(|v| v.checked_sub(i32::from(b - b'0')))
            .ok_or(ParseError::OutOfRange)?;
    }
    if negative {
        Ok(value)
    } else {
        value.checked_neg().ok_or(ParseError::OutOfRange)
    }
}

/// Receive sizing for one exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseLimits {
    /// Bytes requested per receive call
    pub chunk_len: usize,
    /// Largest accepted response
    pub max_response_len: usize,
}

impl ResponseLimits {
    /// 99-byte reads (a 100-byte buffer minus terminator), 512-byte responses
    pub const REFERENCE: ResponseLimits = ResponseLimits {
        chunk_len: 99,
        max_response_len: 512,
    };

    /// Bytes actually requested per receive call, clamped to `1..=MAX_CHUNK_LEN`
    pub const fn effective_chunk_len(&self) -> usize {
        if self.chunk_len == 0 {
            1
        } else if self.chunk_len > MAX_CHUNK_LEN {
            MAX_CHUNK_LEN
        } else {
            self.chunk_len
        }
    }

    /// Upper bound on receive calls for one response
    ///
    /// Enough reads to fill `max_response_len`, plus one to observe the
    /// end of stream or the overflow.
    pub const fn max_reads(&self) -> usize {
        self.max_response_len.div_ceil(self.effective_chunk_len()) + 1
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_len == 0
            || self.chunk_len > MAX_CHUNK_LEN
            || self.max_response_len < self.chunk_len
            || self.max_response_len > MAX_RESPONSE_CAPACITY
        {
            return Err(ConfigError::InvalidResponseLimits);
        }
        Ok(())
    }
}

impl Default for ResponseLimits {
    fn default() -> Self {
        Self::REFERENCE
    }
}

/// Bounded accumulator for one response
pub struct ResponseBuffer {
    data: Vec<u8, MAX_RESPONSE_CAPACITY>,
    limit: usize,
    overflow: bool,
}

impl ResponseBuffer {
    pub fn new(limits: &ResponseLimits) -> Self {
        Self {
            data: Vec::new(),
            limit: limits.max_response_len.min(MAX_RESPONSE_CAPACITY),
            overflow: false,
        }
    }

    /// Append received bytes
    ///
    /// Bytes past the limit are discarded and the buffer is marked as
    /// overflowed. Returns `false` once overflowed.
    pub fn extend(&mut self, bytes: &[u8]) -> bool {
        let room = self.limit.saturating_sub(self.data.len());
        let take = bytes.len().min(room);
        // Cannot fail: take never exceeds the remaining capacity
        let _ = self.data.extend_from_slice(&bytes[..take]);
        if take < bytes.len() {
            self.overflow = true;
        }
        !self.overflow
    }

    /// Record that the read budget ran out with the peer still sending
    pub fn mark_overflow(&mut self) {
        self.overflow = true;
    }

    pub fn is_overflowed(&self) -> bool {
        self.overflow
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Profile carried by the accumulated response
    pub fn profile(&self) -> Result<i32, ParseError> {
        if self.overflow {
            return Err(ParseError::ResponseTooLarge);
        }
        parse_profile(&self.data)
    }
}
