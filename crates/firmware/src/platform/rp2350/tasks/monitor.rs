//! Periodic status report

use crate::node::NodeState;
use crate::report::log_counters;
use embassy_time::{Duration, Instant, Ticker};

/// Report period
const MONITOR_PERIOD_SECS: u64 = 10;

#[embassy_executor::task]
pub async fn monitor_task(node: &'static NodeState) -> ! {
    let start = Instant::now();
    let mut ticker = Ticker::every(Duration::from_secs(MONITOR_PERIOD_SECS));

    loop {
        ticker.next().await;

        crate::log_debug!("Uptime {} s", start.elapsed().as_secs());
        log_counters(
            &node.stats.snapshot(),
            node.registry.len(),
            node.limiter.peak(),
        );
    }
}
