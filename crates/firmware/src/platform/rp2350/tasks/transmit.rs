//! Transmission worker task
//!
//! The only consumer of the transmit queue. With one worker per in-flight
//! slot, payloads wait in the queue while an exchange is running and the
//! dispatch loop is never held up by the network.

use crate::config::NodeConfig;
use crate::node::NodeState;
use crate::platform::rp2350::transport::{EmbassyTransport, OfflineTransport};
use crate::report::log_outcome;
use embassy_net::Stack;
use sensor_node_core::transmit::{CollectorTransport, TransmissionWorker};

#[embassy_executor::task]
pub async fn transmit_task(
    node: &'static NodeState,
    config: &'static NodeConfig,
    stack: Option<Stack<'static>>,
) -> ! {
    match stack.and_then(|stack| EmbassyTransport::new(stack, config.timing.read_timeout_ms)) {
        Some(transport) => run_worker(node, config, transport).await,
        None => {
            crate::log_warn!("Transmission worker running without network");
            run_worker(node, config, OfflineTransport).await
        }
    }
}

async fn run_worker<T: CollectorTransport>(
    node: &'static NodeState,
    config: &'static NodeConfig,
    transport: T,
) -> ! {
    let mut worker = TransmissionWorker::new(
        transport,
        &config.collector,
        config.limits,
        &node.profile,
        &node.limiter,
        &node.stats,
    );
    let receiver = node.queue.receiver();

    crate::log_info!(
        "Transmission worker started, collector {}:{}",
        config.collector.host.as_str(),
        config.collector.port
    );
    loop {
        let payload = receiver.receive().await;
        let outcome = worker.process(payload).await;
        log_outcome(&outcome);
    }
}
