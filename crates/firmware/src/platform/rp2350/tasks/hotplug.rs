//! Enable-line edge tasks
//!
//! One task per sensor kind keeps the registry in line with its enable
//! line. Before each wait the level is compared with the registry, then the
//! task waits for the level opposite to the registered state. An edge that
//! fired while the task was logging is applied on the next pass.

use crate::node::NodeState;
use crate::report::log_hotplug_event;
use embassy_rp::gpio::Input;
use sensor_node_core::hotplug::HotPlugDetector;
use sensor_node_core::SensorKind;

#[embassy_executor::task(pool_size = 3)]
pub async fn enable_line_task(
    kind: SensorKind,
    mut line: Input<'static>,
    node: &'static NodeState,
) -> ! {
    let detector = HotPlugDetector::new(&node.registry);
    crate::log_debug!("Watching {} enable line", kind.name());
    loop {
        if let Some(event) = detector.reconcile(kind, line.is_high()) {
            log_hotplug_event(&event);
        }
        if node.registry.is_present(kind) {
            line.wait_for_low().await;
        } else {
            line.wait_for_high().await;
        }
    }
}
