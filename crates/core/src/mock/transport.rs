use crate::error::NetworkError;
use crate::transmit::{CollectorEndpoint, CollectorTransport};
use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll};
use heapless::Vec;

/// Scripted collector connection
///
/// Every connection is answered with the same response bytes, served in
/// as many reads as the caller's buffer size requires. Once the response is
/// exhausted a read returns the injected receive error if one is set,
/// end of stream otherwise.
#[derive(Debug)]
pub struct MockTransport {
    link_up: bool,
    resolve_error: Option<NetworkError>,
    connect_error: Option<NetworkError>,
    send_error: Option<NetworkError>,
    receive_error: Option<NetworkError>,
    response: Vec<u8, 512>,
    position: usize,
    endless: bool,
    yield_on_connect: bool,
    sent: Vec<u8, 1024>,
    resolve_count: usize,
    connect_count: usize,
    receive_count: usize,
    close_count: usize,
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            link_up: true,
            resolve_error: None,
            connect_error: None,
            send_error: None,
            receive_error: None,
            response: Vec::new(),
            position: 0,
            endless: false,
            yield_on_connect: false,
            sent: Vec::new(),
            resolve_count: 0,
            connect_count: 0,
            receive_count: 0,
            close_count: 0,
        }
    }

    /// Response served on every connection (truncated to 512 bytes)
    pub fn set_response(&mut self, response: &[u8]) {
        self.response.clear();
        let n = response.len().min(self.response.capacity());
        let _ = self.response.extend_from_slice(&response[..n]);
    }

    pub fn set_link_up(&mut self, up: bool) {
        self.link_up = up;
    }

    pub fn fail_resolve(&mut self, error: NetworkError) {
        self.resolve_error = Some(error);
    }

    pub fn fail_connect(&mut self, error: NetworkError) {
        self.connect_error = Some(error);
    }

    pub fn fail_send(&mut self, error: NetworkError) {
        self.send_error = Some(error);
    }

    /// Error returned once the response bytes are exhausted
    pub fn fail_receive(&mut self, error: NetworkError) {
        self.receive_error = Some(error);
    }

    /// Serve full buffers forever
    pub fn set_endless(&mut self, endless: bool) {
        self.endless = endless;
    }

    /// Suspend once inside `connect`, letting other futures run
    pub fn set_yield_on_connect(&mut self, yield_on_connect: bool) {
        self.yield_on_connect = yield_on_connect;
    }

    /// Bytes written across all connections
    pub fn sent(&self) -> &[u8] {
        &self.sent
    }

    pub fn clear_sent(&mut self) {
        self.sent.clear();
    }

    pub fn resolve_count(&self) -> usize {
        self.resolve_count
    }

    pub fn connect_count(&self) -> usize {
        self.connect_count
    }

    pub fn receive_count(&self) -> usize {
        self.receive_count
    }

    pub fn close_count(&self) -> usize {
        self.close_count
    }
}

impl CollectorTransport for MockTransport {
    fn link_up(&self) -> bool {
        self.link_up
    }

    async fn resolve(&mut self, _host: &str, port: u16) -> Result<CollectorEndpoint, NetworkError> {
        self.resolve_count += 1;
        match self.resolve_error {
            Some(error) => Err(error),
            None => Ok(CollectorEndpoint {
                address: [127, 0, 0, 1],
                port,
            }),
        }
    }

    async fn connect(&mut self, _endpoint: CollectorEndpoint) -> Result<(), NetworkError> {
        self.connect_count += 1;
        if self.yield_on_connect {
            YieldOnce::default().await;
        }
        if let Some(error) = self.connect_error {
            return Err(error);
        }
        self.position = 0;
        Ok(())
    }

    async fn send(&mut self, data: &[u8]) -> Result<(), NetworkError> {
        if let Some(error) = self.send_error {
            return Err(error);
        }
        let room = self.sent.capacity() - self.sent.len();
        let _ = self.sent.extend_from_slice(&data[..data.len().min(room)]);
        Ok(())
    }

    async fn receive(&mut self, buffer: &mut [u8]) -> Result<usize, NetworkError> {
        self.receive_count += 1;
        if self.endless {
            buffer.fill(b'x');
            return Ok(buffer.len());
        }
        let remaining = &self.response[self.position..];
        if remaining.is_empty() {
            return match self.receive_error {
                Some(error) => Err(error),
                None => Ok(0),
            };
        }
        let n = remaining.len().min(buffer.len());
        buffer[..n].copy_from_slice(&remaining[..n]);
        self.position += n;
        Ok(n)
    }

    async fn close(&mut self) {
        self.close_count += 1;
    }
}

/// Future that is pending exactly once
#[derive(Default)]
struct YieldOnce {
    yielded: bool,
}

impl Future for YieldOnce {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.yielded {
            Poll::Ready(())
        } else {
            self.yielded = true;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    }
}
