//! Collector protocol
//!
//! One HTTP/1.0 GET per reading, answered by a body carrying `#<profile>`.
//!
//! - [`config`]: Collector endpoint and request identity
//! - [`request`]: Request encoder
//! - [`response`]: Bounded response accumulation and profile extraction

pub mod config;
pub mod request;
pub mod response;

pub use config::CollectorConfig;
pub use request::encode_request;
pub use response::{parse_profile, ResponseBuffer, ResponseLimits};
