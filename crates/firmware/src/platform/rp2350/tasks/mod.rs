//! Embassy tasks
//!
//! ## Core 0
//!
//! - `wifi_init_task` (in `network`) - radio bring-up and link supervision
//! - `transmit_timer_task` - raises the transmit request every period
//! - `dispatch_task` - turns a raised request into queued payloads
//! - `transmit_task` - drains the queue, one collector exchange at a time
//! - `enable_line_task` - one per sensor enable line
//! - `monitor_task` - periodic counter report
//!
//! ## Core 1
//!
//! - `sample_task` - sensor reads and transmit timer reprogramming

pub mod dispatch;
pub mod hotplug;
pub mod monitor;
pub mod sample;
pub mod timer;
pub mod transmit;

pub use dispatch::dispatch_task;
pub use hotplug::enable_line_task;
pub use monitor::monitor_task;
pub use sample::{sample_task, SensorI2c};
pub use timer::transmit_timer_task;
pub use transmit::transmit_task;

use embassy_executor::{SpawnError, SpawnToken, Spawner};

/// Spawn a task, logging instead of panicking when its pool is exhausted
pub fn spawn_or_log<S>(
    name: &'static str,
    spawner: Spawner,
    token: Result<SpawnToken<S>, SpawnError>,
) {
    match token {
        Ok(token) => {
            spawner.spawn(token);
            crate::log_debug!("Spawned {} task", name);
        }
        Err(_) => crate::log_error!("Could not spawn {} task: pool exhausted", name),
    }
}
