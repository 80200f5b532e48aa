//! Collector transport over an embassy-net TCP socket
//!
//! One socket with static buffers is reused for every transmission. It is
//! closed gracefully after each exchange and aborted if the peer does not
//! finish the close in time, which leaves it ready for the next connect.

use embassy_net::dns::DnsQueryType;
use embassy_net::tcp::TcpSocket;
use embassy_net::{IpAddress, Ipv4Address, Stack};
use embassy_time::{with_timeout, Duration};
use embedded_io_async::Write;
use sensor_node_core::transmit::{CollectorEndpoint, CollectorTransport};
use sensor_node_core::NetworkError;
use static_cell::StaticCell;

const RX_BUFFER_LEN: usize = 1024;
const TX_BUFFER_LEN: usize = 512;

/// Bound on the graceful close before the socket is aborted
const CLOSE_TIMEOUT_MS: u64 = 500;

pub struct EmbassyTransport {
    stack: Stack<'static>,
    socket: TcpSocket<'static>,
    timeout: Duration,
}

impl EmbassyTransport {
    /// Create the transport; callable once, the socket buffers are static
    pub fn new(stack: Stack<'static>, timeout_ms: u64) -> Option<Self> {
        static RX_BUFFER: StaticCell<[u8; RX_BUFFER_LEN]> = StaticCell::new();
        static TX_BUFFER: StaticCell<[u8; TX_BUFFER_LEN]> = StaticCell::new();

        let rx = RX_BUFFER.try_init([0; RX_BUFFER_LEN])?;
        let tx = TX_BUFFER.try_init([0; TX_BUFFER_LEN])?;
        let timeout = Duration::from_millis(timeout_ms);
        let mut socket = TcpSocket::new(stack, rx, tx);
        socket.set_timeout(Some(timeout));

        Some(Self {
            stack,
            socket,
            timeout,
        })
    }

    fn endpoint(address: Ipv4Address, port: u16) -> CollectorEndpoint {
        CollectorEndpoint {
            address: address.octets(),
            port,
        }
    }
}

impl CollectorTransport for EmbassyTransport {
    fn link_up(&self) -> bool {
        self.stack.is_link_up() && self.stack.is_config_up()
    }

    async fn resolve(&mut self, host: &str, port: u16) -> Result<CollectorEndpoint, NetworkError> {
        if let Ok(address) = host.parse::<Ipv4Address>() {
            return Ok(Self::endpoint(address, port));
        }

        let query = self.stack.dns_query(host, DnsQueryType::A);
        let answers = match with_timeout(self.timeout, query).await {
            Ok(Ok(answers)) => answers,
            Ok(Err(_)) => return Err(NetworkError::Resolve),
            Err(_) => return Err(NetworkError::Timeout),
        };

        answers
            .iter()
            .find_map(|answer| match answer {
                IpAddress::Ipv4(address) => Some(Self::endpoint(*address, port)),
                #[allow(unreachable_patterns)]
                _ => None,
            })
            .ok_or(NetworkError::NoAddress)
    }

    async fn connect(&mut self, endpoint: CollectorEndpoint) -> Result<(), NetworkError> {
        let [a, b, c, d] = endpoint.address;
        let remote = (Ipv4Address::new(a, b, c, d), endpoint.port);
        match with_timeout(self.timeout, self.socket.connect(remote)).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(_)) => Err(NetworkError::Connect),
            Err(_) => Err(NetworkError::Timeout),
        }
    }

    async fn send(&mut self, data: &[u8]) -> Result<(), NetworkError> {
        match with_timeout(self.timeout, self.socket.write_all(data)).await {
            Ok(Ok(())) => {}
            Ok(Err(_)) => return Err(NetworkError::Send),
            Err(_) => return Err(NetworkError::Timeout),
        }
        match with_timeout(self.timeout, self.socket.flush()).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(_)) => Err(NetworkError::Send),
            Err(_) => Err(NetworkError::Timeout),
        }
    }

    async fn receive(&mut self, buffer: &mut [u8]) -> Result<usize, NetworkError> {
        match with_timeout(self.timeout, self.socket.read(buffer)).await {
            Ok(Ok(n)) => Ok(n),
            Ok(Err(_)) => Err(NetworkError::Receive),
            Err(_) => Err(NetworkError::Timeout),
        }
    }

    async fn close(&mut self) {
        self.socket.close();
        let closed = with_timeout(
            Duration::from_millis(CLOSE_TIMEOUT_MS),
            self.socket.flush(),
        )
        .await;
        if !matches!(closed, Ok(Ok(()))) {
            crate::log_debug!("Collector close did not complete, aborting");
        }
        // Abort leaves the socket in Closed even after a clean FIN exchange
        self.socket.abort();
        let _ = with_timeout(Duration::from_millis(CLOSE_TIMEOUT_MS), self.socket.flush()).await;
    }
}

/// Transport used when Wi-Fi is unconfigured or never associated
///
/// Every transmission ends at the link check and is counted as dropped.
pub struct OfflineTransport;

impl CollectorTransport for OfflineTransport {
    fn link_up(&self) -> bool {
        false
    }

    async fn resolve(
        &mut self,
        _host: &str,
        _port: u16,
    ) -> Result<CollectorEndpoint, NetworkError> {
        Err(NetworkError::LinkDown)
    }

    async fn connect(&mut self, _endpoint: CollectorEndpoint) -> Result<(), NetworkError> {
        Err(NetworkError::LinkDown)
    }

    async fn send(&mut self, _data: &[u8]) -> Result<(), NetworkError> {
        Err(NetworkError::LinkDown)
    }

    async fn receive(&mut self, _buffer: &mut [u8]) -> Result<usize, NetworkError> {
        Err(NetworkError::LinkDown)
    }

    async fn close(&mut self) {}
}
