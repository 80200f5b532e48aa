use crate::error::NetworkError;
use crate::link::NetworkLink;

/// Link that fails a fixed number of association attempts, then succeeds
#[derive(Debug)]
pub struct MockLink {
    failures_left: u32,
    attempts: u32,
    connected: bool,
}

impl MockLink {
    pub fn new(failures_before_success: u32) -> Self {
        Self {
            failures_left: failures_before_success,
            attempts: 0,
            connected: false,
        }
    }

    /// Simulate the access point dropping the station
    pub fn drop_link(&mut self) {
        self.connected = false;
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }
}

impl NetworkLink for MockLink {
    async fn associate(&mut self) -> Result<(), NetworkError> {
        self.attempts += 1;
        if self.failures_left > 0 {
            self.failures_left -= 1;
            return Err(NetworkError::Connect);
        }
        self.connected = true;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}
