//! Dispatch loop task

use crate::config::TimingConfig;
use crate::node::NodeState;
use crate::report::log_dispatch_round;
use embassy_time::{Delay, Duration, Ticker};
use sensor_node_core::loops::DispatchLoop;

#[embassy_executor::task]
pub async fn dispatch_task(node: &'static NodeState, timing: TimingConfig) -> ! {
    let mut dispatch = DispatchLoop::new(
        &node.registry,
        &node.request,
        &node.stats,
        timing.launch_stagger_ms,
    );
    let mut sink = node.sink();
    let mut ticker = Ticker::every(Duration::from_millis(timing.dispatch_period_ms));

    crate::log_info!(
        "Dispatch loop started, period {} ms",
        timing.dispatch_period_ms
    );
    loop {
        if let Some(round) = dispatch.tick(&mut sink, &mut Delay).await {
            log_dispatch_round(&round);
        }
        ticker.next().await;
    }
}
