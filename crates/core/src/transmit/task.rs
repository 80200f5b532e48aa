//! Transmission task
//!
//! One task per payload, never reused:
//!
//! ```text
//! Start -> ResolveAddress -> Connect -> Send -> AwaitResponse -> ParseProfile -> Done
//! ```
//!
//! Any network failure jumps straight to `Done` and drops the sample; nothing
//! is retried here, the next timer period produces a fresh reading. Network
//! errors end at this boundary and come back as a [`TransmissionOutcome`]
//! for the caller to count and log.

use super::payload::TransmissionPayload;
use super::transport::CollectorTransport;
use crate::error::{NetworkError, ParseError};
use crate::profile::ProfileState;
use crate::protocol::request::encode_request;
use crate::protocol::response::{ResponseBuffer, ResponseLimits, MAX_CHUNK_LEN};
use crate::protocol::CollectorConfig;
use crate::sensor::SensorKind;

/// State of a transmission task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransmissionState {
    /// Payload taken, link not yet checked
    Start,
    /// Looking up the collector address
    ResolveAddress,
    /// Opening the TCP connection
    Connect,
    /// Writing the request
    Send,
    /// Reading the response until end of stream or the size cap
    AwaitResponse,
    /// Extracting the profile from the response
    ParseProfile,
    /// Transport closed, outcome decided
    Done,
}

impl TransmissionState {
    pub const fn as_str(self) -> &'static str {
        match self {
            TransmissionState::Start => "start",
            TransmissionState::ResolveAddress => "resolve",
            TransmissionState::Connect => "connect",
            TransmissionState::Send => "send",
            TransmissionState::AwaitResponse => "await-response",
            TransmissionState::ParseProfile => "parse-profile",
            TransmissionState::Done => "done",
        }
    }
}

/// How a transmission ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransmissionOutcome {
    /// Collector answered with a profile, which was published
    ProfileUpdated { kind: SensorKind, profile: i32 },
    /// Collector answered but the profile could not be extracted
    Unparsed { kind: SensorKind, error: ParseError },
    /// A network step failed and the sample was dropped
    Dropped {
        kind: SensorKind,
        error: NetworkError,
        at: TransmissionState,
    },
    /// No in-flight slot was free and the sample was dropped
    Busy { kind: SensorKind },
}

impl TransmissionOutcome {
    pub fn kind(&self) -> SensorKind {
        match *self {
            TransmissionOutcome::ProfileUpdated { kind, .. }
            | TransmissionOutcome::Unparsed { kind, .. }
            | TransmissionOutcome::Dropped { kind, .. }
            | TransmissionOutcome::Busy { kind } => kind,
        }
    }

    /// Whether the collector received the reading
    pub fn is_delivered(&self) -> bool {
        matches!(
            self,
            TransmissionOutcome::ProfileUpdated { .. } | TransmissionOutcome::Unparsed { .. }
        )
    }
}

/// Single-use request/response exchange for one payload
pub struct TransmissionTask<'a, T: CollectorTransport> {
    payload: TransmissionPayload,
    transport: &'a mut T,
    config: &'a CollectorConfig,
    limits: &'a ResponseLimits,
    profile: &'a ProfileState,
    state: TransmissionState,
}

impl<'a, T: CollectorTransport> TransmissionTask<'a, T> {
    pub fn new(
        payload: TransmissionPayload,
        transport: &'a mut T,
        config: &'a CollectorConfig,
        limits: &'a ResponseLimits,
        profile: &'a ProfileState,
    ) -> Self {
        Self {
            payload,
            transport,
            config,
            limits,
            profile,
            state: TransmissionState::Start,
        }
    }

    /// Drive the exchange to `Done`
    ///
    /// Consumes the task and its payload. The transport is closed on every
    /// path, and the profile is published only when one was parsed.
    pub async fn run(mut self) -> TransmissionOutcome {
        let kind = self.payload.kind;
        let outcome = match self.exchange().await {
            Ok(Ok(profile)) => {
                self.profile.publish(profile);
                TransmissionOutcome::ProfileUpdated { kind, profile }
            }
            Ok(Err(error)) => TransmissionOutcome::Unparsed { kind, error },
            Err(error) => TransmissionOutcome::Dropped {
                kind,
                error,
                at: self.state,
            },
        };
        self.transport.close().await;
        self.state = TransmissionState::Done;
        outcome
    }

    /// Network part of the exchange
    ///
    /// The outer error is a network failure in `self.state`; the inner
    /// result is the parse of a response that did arrive.
    async fn exchange(&mut self) -> Result<Result<i32, ParseError>, NetworkError> {
        if !self.transport.link_up() {
            return Err(NetworkError::LinkDown);
        }

        self.state = TransmissionState::ResolveAddress;
        let endpoint = self
            .transport
            .resolve(&self.config.host, self.config.port)
            .await?;

        self.state = TransmissionState::Connect;
        self.transport.connect(endpoint).await?;

        self.state = TransmissionState::Send;
        let request =
            encode_request(&self.payload, self.config).map_err(|_| NetworkError::Send)?;
        self.transport.send(request.as_bytes()).await?;

        self.state = TransmissionState::AwaitResponse;
        let response = self.receive_response().await?;

        self.state = TransmissionState::ParseProfile;
        Ok(response.profile())
    }

    /// Read until a short read, the end of stream or the read budget
    async fn receive_response(&mut self) -> Result<ResponseBuffer, NetworkError> {
        let mut response = ResponseBuffer::new(self.limits);
        let mut chunk = [0u8; MAX_CHUNK_LEN];
        let chunk_len = self.limits.effective_chunk_len();
        let max_reads = self.limits.max_reads();

        for read in 1..=max_reads {
            match self.transport.receive(&mut chunk[..chunk_len]).await {
                Ok(n) => {
                    if !response.extend(&chunk[..n]) || n < chunk_len {
                        break;
                    }
                    if read == max_reads {
                        response.mark_overflow();
                    }
                }
                // Peer closed abruptly after answering: parse what arrived
                Err(_) if !response.is_empty() => break,
                Err(e) => return Err(e),
            }
        }
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockTransport;

    fn config() -> CollectorConfig {
        CollectorConfig::new("collector.local", 8080, "test-agent").unwrap()
    }

    async fn transmit(
        transport: &mut MockTransport,
        limits: &ResponseLimits,
        profile: &ProfileState,
        kind: SensorKind,
        value: i32,
    ) -> TransmissionOutcome {
        let config = config();
        TransmissionTask::new(
            TransmissionPayload::new(kind, value),
            transport,
            &config,
            limits,
            profile,
        )
        .run()
        .await
    }

    #[tokio::test]
    async fn test_successful_exchange_publishes_profile() {
        let mut transport = MockTransport::new();
        transport.set_response(b"HTTP/1.0 200 OK\r\n\r\nstatus=ok#2\r\n");
        let profile = ProfileState::new();

        let outcome = transmit(
            &mut transport,
            &ResponseLimits::REFERENCE,
            &profile,
            SensorKind::Temperature,
            37,
        )
        .await;

        assert_eq!(
            outcome,
            TransmissionOutcome::ProfileUpdated {
                kind: SensorKind::Temperature,
                profile: 2
            }
        );
        assert_eq!(profile.load(), 2);
        assert_eq!(
            transport.sent(),
            b"GET /?sensor_id=2&measurement=37 HTTP/1.0\r\nHost: collector.local:8080\r\nUser-Agent: test-agent\r\n\r\n"
        );
        assert_eq!(transport.close_count(), 1);
    }

    #[tokio::test]
    async fn test_missing_marker_leaves_profile_unchanged() {
        let mut transport = MockTransport::new();
        transport.set_response(b"HTTP/1.0 200 OK\r\n\r\nstatus=ok\r\n");
        let profile = ProfileState::new();
        profile.publish(3);

        let outcome = transmit(
            &mut transport,
            &ResponseLimits::REFERENCE,
            &profile,
            SensorKind::Light,
            10,
        )
        .await;

        assert_eq!(
            outcome,
            TransmissionOutcome::Unparsed {
                kind: SensorKind::Light,
                error: ParseError::MissingMarker
            }
        );
        assert!(outcome.is_delivered());
        assert_eq!(profile.load(), 3);
    }

    #[tokio::test]
    async fn test_link_down_drops_before_resolving() {
        let mut transport = MockTransport::new();
        transport.set_link_up(false);
        let profile = ProfileState::new();

        let outcome = transmit(
            &mut transport,
            &ResponseLimits::REFERENCE,
            &profile,
            SensorKind::Gas,
            0,
        )
        .await;

        assert_eq!(
            outcome,
            TransmissionOutcome::Dropped {
                kind: SensorKind::Gas,
                error: NetworkError::LinkDown,
                at: TransmissionState::Start
            }
        );
        assert_eq!(transport.resolve_count(), 0);
        assert_eq!(transport.close_count(), 1);
    }

    #[tokio::test]
    async fn test_resolve_failure_drops_sample() {
        let mut transport = MockTransport::new();
        transport.fail_resolve(NetworkError::NoAddress);
        let profile = ProfileState::new();

        let outcome = transmit(
            &mut transport,
            &ResponseLimits::REFERENCE,
            &profile,
            SensorKind::Light,
            1,
        )
        .await;

        assert_eq!(
            outcome,
            TransmissionOutcome::Dropped {
                kind: SensorKind::Light,
                error: NetworkError::NoAddress,
                at: TransmissionState::ResolveAddress
            }
        );
        assert_eq!(transport.connect_count(), 0);
        assert_eq!(profile.load(), 1);
    }

    #[tokio::test]
    async fn test_connect_failure_drops_sample() {
        let mut transport = MockTransport::new();
        transport.fail_connect(NetworkError::Connect);
        let profile = ProfileState::new();

        let outcome = transmit(
            &mut transport,
            &ResponseLimits::REFERENCE,
            &profile,
            SensorKind::Light,
            1,
        )
        .await;

        assert!(matches!(
            outcome,
            TransmissionOutcome::Dropped {
                error: NetworkError::Connect,
                at: TransmissionState::Connect,
                ..
            }
        ));
        assert!(transport.sent().is_empty());
        assert_eq!(transport.close_count(), 1);
    }

    #[tokio::test]
    async fn test_send_failure_drops_sample() {
        let mut transport = MockTransport::new();
        transport.fail_send(NetworkError::Send);
        let profile = ProfileState::new();

        let outcome = transmit(
            &mut transport,
            &ResponseLimits::REFERENCE,
            &profile,
            SensorKind::Temperature,
            20,
        )
        .await;

        assert!(matches!(
            outcome,
            TransmissionOutcome::Dropped {
                error: NetworkError::Send,
                at: TransmissionState::Send,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_receive_timeout_without_data_drops_sample() {
        let mut transport = MockTransport::new();
        transport.fail_receive(NetworkError::Timeout);
        let profile = ProfileState::new();

        let outcome = transmit(
            &mut transport,
            &ResponseLimits::REFERENCE,
            &profile,
            SensorKind::Temperature,
            20,
        )
        .await;

        assert!(matches!(
            outcome,
            TransmissionOutcome::Dropped {
                error: NetworkError::Timeout,
                at: TransmissionState::AwaitResponse,
                ..
            }
        ));
        assert_eq!(profile.load(), 1);
    }

    #[tokio::test]
    async fn test_receive_error_after_data_parses_what_arrived() {
        let limits = ResponseLimits {
            chunk_len: 4,
            max_response_len: 16,
        };
        let mut transport = MockTransport::new();
        // One full chunk, then the peer resets instead of closing
        transport.set_response(b"ok#3");
        transport.fail_receive(NetworkError::Receive);
        let profile = ProfileState::new();

        let outcome = transmit(&mut transport, &limits, &profile, SensorKind::Light, 5).await;

        assert_eq!(
            outcome,
            TransmissionOutcome::ProfileUpdated {
                kind: SensorKind::Light,
                profile: 3
            }
        );
        assert_eq!(transport.receive_count(), 2);
    }

    #[tokio::test]
    async fn test_response_spanning_full_chunks() {
        let limits = ResponseLimits {
            chunk_len: 4,
            max_response_len: 16,
        };
        let mut transport = MockTransport::new();
        // Exactly two full chunks, then end of stream
        transport.set_response(b"abcdef#2");
        let profile = ProfileState::new();

        let outcome = transmit(&mut transport, &limits, &profile, SensorKind::Light, 5).await;

        assert_eq!(
            outcome,
            TransmissionOutcome::ProfileUpdated {
                kind: SensorKind::Light,
                profile: 2
            }
        );
        assert_eq!(transport.receive_count(), 3);
    }

    #[tokio::test]
    async fn test_zero_chunk_limits_read_byte_by_byte() {
        let limits = ResponseLimits {
            chunk_len: 0,
            max_response_len: 512,
        };
        let mut transport = MockTransport::new();
        transport.set_response(b"#2");
        let profile = ProfileState::new();

        let outcome = transmit(&mut transport, &limits, &profile, SensorKind::Light, 5).await;

        assert_eq!(
            outcome,
            TransmissionOutcome::ProfileUpdated {
                kind: SensorKind::Light,
                profile: 2
            }
        );
        assert_eq!(transport.receive_count(), 3);
    }

    #[tokio::test]
    async fn test_endless_peer_terminates_with_too_large() {
        let limits = ResponseLimits {
            chunk_len: 8,
            max_response_len: 32,
        };
        let mut transport = MockTransport::new();
        transport.set_endless(true);
        let profile = ProfileState::new();

        let outcome = transmit(&mut transport, &limits, &profile, SensorKind::Gas, 5).await;

        assert_eq!(
            outcome,
            TransmissionOutcome::Unparsed {
                kind: SensorKind::Gas,
                error: ParseError::ResponseTooLarge
            }
        );
        assert!(transport.receive_count() <= limits.max_reads());
        assert_eq!(profile.load(), 1);
    }

    #[tokio::test]
    async fn test_unknown_profile_is_published() {
        let mut transport = MockTransport::new();
        transport.set_response(b"#9");
        let profile = ProfileState::new();

        transmit(
            &mut transport,
            &ResponseLimits::REFERENCE,
            &profile,
            SensorKind::Light,
            5,
        )
        .await;

        assert_eq!(profile.load(), 9);
    }
}
