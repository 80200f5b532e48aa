//! Periodic transmit timer

use super::request::TransmitRequest;
use crate::profile::transmit_interval_ms;

/// Periodic timer collaborator
///
/// The firmware drives an embassy ticker from these calls; every expiry
/// must raise the [`TransmitRequest`] the scheduler was built with.
pub trait PeriodicTimer {
    type Error;

    /// Stop the timer. Stopping a stopped timer is not an error.
    fn stop(&mut self) -> Result<(), Self::Error>;

    /// (Re)start the timer with a fixed period
    fn start_periodic(&mut self, period_ms: u64) -> Result<(), Self::Error>;
}

/// Owns the transmit timer and keeps its period in step with the profile
pub struct TransmitScheduler<'a, T: PeriodicTimer> {
    timer: T,
    request: &'a TransmitRequest,
    period_ms: Option<u64>,
}

impl<'a, T: PeriodicTimer> TransmitScheduler<'a, T> {
    pub fn new(timer: T, request: &'a TransmitRequest) -> Self {
        Self {
            timer,
            request,
            period_ms: None,
        }
    }

    /// Start the timer for `profile` without raising a request
    pub fn start(&mut self, profile: i32) -> Result<u64, T::Error> {
        let period_ms = transmit_interval_ms(profile);
        self.timer.start_periodic(period_ms)?;
        self.period_ms = Some(period_ms);
        Ok(period_ms)
    }

    /// Apply a new profile
    ///
    /// Stops the timer, restarts it with the interval `profile` selects and
    /// raises an immediate transmit request. On error no request is raised
    /// and the timer may be left stopped.
    pub fn reconfigure(&mut self, profile: i32) -> Result<u64, T::Error> {
        let period_ms = transmit_interval_ms(profile);
        self.timer.stop()?;
        self.period_ms = None;
        self.timer.start_periodic(period_ms)?;
        self.period_ms = Some(period_ms);
        self.request.raise();
        Ok(period_ms)
    }

    /// Period currently programmed, `None` while stopped
    pub fn period_ms(&self) -> Option<u64> {
        self.period_ms
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockTimer, TimerOp};

    #[test]
    fn test_reconfigure_restarts_and_raises() {
        let request = TransmitRequest::new();
        let mut scheduler = TransmitScheduler::new(MockTimer::new(), &request);

        assert_eq!(scheduler.reconfigure(3), Ok(10_000));

        assert_eq!(
            scheduler.timer().operations(),
            &[TimerOp::Stop, TimerOp::Start(10_000)]
        );
        assert_eq!(scheduler.period_ms(), Some(10_000));
        assert!(request.take());
    }

    #[test]
    fn test_unknown_profile_uses_default_interval() {
        let request = TransmitRequest::new();
        let mut scheduler = TransmitScheduler::new(MockTimer::new(), &request);

        assert_eq!(scheduler.reconfigure(42), Ok(5_000));
        assert_eq!(scheduler.reconfigure(-1), Ok(5_000));
    }

    #[test]
    fn test_start_does_not_raise() {
        let request = TransmitRequest::new();
        let mut scheduler = TransmitScheduler::new(MockTimer::new(), &request);

        assert_eq!(scheduler.start(1), Ok(1_000));
        assert!(!request.is_pending());
    }

    #[test]
    fn test_failed_restart_raises_nothing() {
        let request = TransmitRequest::new();
        let mut timer = MockTimer::new();
        timer.fail_next_start();
        let mut scheduler = TransmitScheduler::new(timer, &request);

        assert!(scheduler.reconfigure(2).is_err());
        assert!(!request.is_pending());
        assert_eq!(scheduler.period_ms(), None);
    }
}
