//! Sample loop task (core 1)

use crate::node::NodeState;
use crate::platform::{HalSensorBus, SignalTimer, BUS_TIMEOUT_MS};
use crate::report::log_sample_report;
use embassy_rp::i2c::{Async, I2c};
use embassy_rp::peripherals::I2C0;
use embassy_time::{Delay, Duration, Ticker};
use sensor_node_core::loops::SampleLoop;
use sensor_node_core::scheduler::TransmitScheduler;
use sensor_node_core::sensor::ChannelMap;

pub type SensorI2c = I2c<'static, I2C0, Async>;

#[embassy_executor::task]
pub async fn sample_task(
    node: &'static NodeState,
    i2c: SensorI2c,
    timer: SignalTimer,
    period_ms: u64,
) -> ! {
    let bus = HalSensorBus::new(i2c, Delay, BUS_TIMEOUT_MS);
    let mut sample_loop =
        SampleLoop::new(&node.registry, &node.profile, bus, ChannelMap::reference());
    let mut scheduler = TransmitScheduler::new(timer, &node.request);
    let mut ticker = Ticker::every(Duration::from_millis(period_ms));

    crate::log_info!("Sample loop started, period {} ms", period_ms);
    loop {
        let report = sample_loop.tick(&mut scheduler).await;
        log_sample_report(&report);
        ticker.next().await;
    }
}
