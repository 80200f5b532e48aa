use embedded_hal_async::delay::DelayNs;

/// Delay that returns immediately and adds up what was requested
#[derive(Debug, Default)]
pub struct MockDelay {
    total_ns: u64,
}

impl MockDelay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_ms(&self) -> u64 {
        self.total_ns / 1_000_000
    }
}

impl DelayNs for MockDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
    }

    async fn delay_us(&mut self, us: u32) {
        self.total_ns += u64::from(us) * 1_000;
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.total_ns += u64::from(ms) * 1_000_000;
    }
}
