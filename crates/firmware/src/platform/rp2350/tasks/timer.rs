//! Transmit timer task
//!
//! Owns the ticker behind [`SignalTimer`](crate::platform::SignalTimer).
//! Each expiry only raises the transmit request, so it never blocks the
//! executor.

use crate::platform::timer::{TimerCommand, TimerCommands};
use embassy_futures::select::{select, Either};
use embassy_time::{Duration, Ticker};
use sensor_node_core::TransmitRequest;

#[embassy_executor::task]
pub async fn transmit_timer_task(
    commands: &'static TimerCommands,
    request: &'static TransmitRequest,
) -> ! {
    // Idle until the sample loop programs the first period
    let mut command = commands.wait().await;
    loop {
        command = match command {
            TimerCommand::Stop => {
                crate::log_debug!("Transmit timer stopped");
                commands.wait().await
            }
            TimerCommand::Start { period_ms } => {
                crate::log_debug!("Transmit timer every {} ms", period_ms);
                run_periodic(commands, request, period_ms).await
            }
        };
    }
}

/// Raise the request every `period_ms` until the next command arrives
async fn run_periodic(
    commands: &'static TimerCommands,
    request: &'static TransmitRequest,
    period_ms: u64,
) -> TimerCommand {
    let mut ticker = Ticker::every(Duration::from_millis(period_ms));
    loop {
        match select(commands.wait(), ticker.next()).await {
            Either::First(command) => return command,
            Either::Second(()) => request.raise(),
        }
    }
}
