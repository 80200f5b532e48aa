//! Log lines for loop and task results
//!
//! The core loops return plain values; this module turns them into log
//! output. Every argument goes through a static label so the same call
//! formats under defmt and under the host test logger.

use crate::platform::PlatformError;
use sensor_node_core::hotplug::HotPlugEvent;
use sensor_node_core::loops::{DispatchRound, SampleReport};
use sensor_node_core::transmit::{TransmissionOutcome, TransmitCounters};
use sensor_node_core::NetworkError;

/// One-word label for an outcome
pub fn outcome_label(outcome: &TransmissionOutcome) -> &'static str {
    match outcome {
        TransmissionOutcome::ProfileUpdated { .. } => "profile",
        TransmissionOutcome::Unparsed { .. } => "unparsed",
        TransmissionOutcome::Dropped { .. } => "dropped",
        TransmissionOutcome::Busy { .. } => "busy",
    }
}

pub fn log_outcome(outcome: &TransmissionOutcome) {
    let sensor = outcome.kind().name();
    match *outcome {
        TransmissionOutcome::ProfileUpdated { profile, .. } => {
            crate::log_info!("{}: collector set profile {}", sensor, profile);
        }
        TransmissionOutcome::Unparsed { error, .. } => {
            crate::log_warn!("{}: delivered, {}", sensor, error.as_str());
        }
        TransmissionOutcome::Dropped { error, at, .. } => {
            // Link down is expected while the supervisor reconnects
            if error == NetworkError::LinkDown {
                crate::log_debug!("{}: dropped, {}", sensor, error.as_str());
            } else {
                crate::log_warn!(
                    "{}: dropped at {}, {}",
                    sensor,
                    at.as_str(),
                    error.as_str()
                );
            }
        }
        TransmissionOutcome::Busy { .. } => {
            crate::log_warn!("{}: dropped, transmission in flight", sensor);
        }
    }
}

pub fn log_sample_report(report: &SampleReport<PlatformError>) {
    for (kind, error) in report.failures.iter() {
        crate::log_warn!("{}: sample failed, {}", kind.name(), error.as_str());
    }
    if report.discarded > 0 {
        crate::log_debug!("Discarded {} stale reading(s)", report.discarded);
    }
    match &report.profile_change {
        Some(Ok(change)) => {
            crate::log_info!(
                "Profile {} applied, transmitting every {} ms",
                change.profile,
                change.period_ms
            );
        }
        Some(Err(e)) => {
            crate::log_error!("Transmit timer reprogramming failed: {}", e.as_str());
        }
        None => {}
    }
}

pub fn log_hotplug_event(event: &HotPlugEvent) {
    match event {
        HotPlugEvent::Registered(record) => {
            crate::log_info!(
                "{} sensor connected (generation {})",
                record.kind.name(),
                record.generation
            );
        }
        HotPlugEvent::Deregistered(kind) => {
            crate::log_info!("{} sensor disconnected", kind.name());
        }
        HotPlugEvent::AlreadyAbsent(kind) => {
            crate::log_debug!("{} enable line fell while absent", kind.name());
        }
    }
}

pub fn log_dispatch_round(round: &DispatchRound) {
    if round.rejected > 0 {
        crate::log_warn!(
            "Dispatch: {} queued, {} rejected (queue full)",
            round.submitted,
            round.rejected
        );
    } else {
        crate::log_debug!("Dispatch: {} queued", round.submitted);
    }
}

pub fn log_counters(counters: &TransmitCounters, sensors: usize, peak_in_flight: u8) {
    crate::log_info!(
        "Status: sensors={} rounds={} delivered={} profiles={} unparsed={}",
        sensors,
        counters.rounds,
        counters.delivered,
        counters.profile_updates,
        counters.parse_failures
    );
    crate::log_info!(
        "Status: dropped={} busy={} rejected={} peak_in_flight={}",
        counters.dropped.total(),
        counters.busy,
        counters.rejected,
        peak_in_flight
    );
    let dropped = &counters.dropped;
    if dropped.total() > 0 {
        crate::log_info!(
            "Dropped: link_down={} resolve={} connect={} transfer={} timeout={}",
            dropped.link_down,
            dropped.resolve,
            dropped.connect,
            dropped.transfer,
            dropped.timeout
        );
    }
}
