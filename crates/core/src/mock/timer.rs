use crate::scheduler::PeriodicTimer;
use heapless::Vec;

/// Recorded timer call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerOp {
    Stop,
    Start(u64),
}

/// Injected timer failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockTimerError;

/// Timer that records calls instead of counting time
#[derive(Debug, Default)]
pub struct MockTimer {
    operations: Vec<TimerOp, 32>,
    period_ms: Option<u64>,
    fail_next_start: bool,
}

impl MockTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `start_periodic` fail
    pub fn fail_next_start(&mut self) {
        self.fail_next_start = true;
    }

    pub fn operations(&self) -> &[TimerOp] {
        &self.operations
    }

    /// Period the timer is running with, `None` when stopped
    pub fn period_ms(&self) -> Option<u64> {
        self.period_ms
    }
}

impl PeriodicTimer for MockTimer {
    type Error = MockTimerError;

    fn stop(&mut self) -> Result<(), MockTimerError> {
        let _ = self.operations.push(TimerOp::Stop);
        self.period_ms = None;
        Ok(())
    }

    fn start_periodic(&mut self, period_ms: u64) -> Result<(), MockTimerError> {
        if core::mem::take(&mut self.fail_next_start) {
            return Err(MockTimerError);
        }
        let _ = self.operations.push(TimerOp::Start(period_ms));
        self.period_ms = Some(period_ms);
        Ok(())
    }
}
