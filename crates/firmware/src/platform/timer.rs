//! Transmit timer front end
//!
//! [`SignalTimer`] implements the core [`PeriodicTimer`] by posting
//! [`TimerCommand`]s to the timer task. The task owns the embassy ticker and
//! raises the transmit request on every expiry. Commands overwrite each
//! other, so a stop immediately followed by a start reaches the task as the
//! start alone, which restarts the ticker anyway.

use super::error::{PlatformError, TimerError};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use sensor_node_core::scheduler::PeriodicTimer;

/// Command for the timer task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "pico2_w", derive(defmt::Format))]
pub enum TimerCommand {
    Stop,
    Start { period_ms: u64 },
}

pub type TimerCommands = Signal<CriticalSectionRawMutex, TimerCommand>;

/// Handle the sample loop uses to reprogram the timer task
#[derive(Clone, Copy)]
pub struct SignalTimer {
    commands: &'static TimerCommands,
}

impl SignalTimer {
    pub const fn new(commands: &'static TimerCommands) -> Self {
        Self { commands }
    }
}

impl PeriodicTimer for SignalTimer {
    type Error = PlatformError;

    fn stop(&mut self) -> Result<(), PlatformError> {
        self.commands.signal(TimerCommand::Stop);
        Ok(())
    }

    fn start_periodic(&mut self, period_ms: u64) -> Result<(), PlatformError> {
        if period_ms == 0 {
            return Err(TimerError::InvalidDuration.into());
        }
        self.commands.signal(TimerCommand::Start { period_ms });
        Ok(())
    }
}
