//! Sample loop
//!
//! Every tick reads each registered sensor once and stores the converted
//! value in the registry, then checks whether the collector has published a
//! new profile and, if so, reprograms the transmit timer.
//!
//! Values are stored with the generation of the record they were read for.
//! A sensor unplugged (or replugged) while its bus read was in progress
//! therefore never receives that stale value.

use crate::error::SampleError;
use crate::profile::ProfileState;
use crate::scheduler::{PeriodicTimer, TransmitScheduler};
use crate::sensor::{
    initialize_sensor, read_sensor, ChannelMap, SensorBus, SensorKind, SensorRegistry,
    SENSOR_KIND_COUNT,
};
use heapless::Vec;

/// Profile applied to the transmit timer during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfileChange {
    pub profile: i32,
    pub period_ms: u64,
}

/// What one tick did
#[derive(Debug, PartialEq, Eq)]
pub struct SampleReport<E> {
    /// Values stored in the registry
    pub sampled: u8,
    /// Values read but discarded because the record changed meanwhile
    pub discarded: u8,
    /// Registered sensors without a bus channel
    pub unsampled: u8,
    /// Initialisation and read failures, at most two per kind
    pub failures: Vec<(SensorKind, SampleError), { 2 * SENSOR_KIND_COUNT }>,
    /// Timer reconfiguration attempted this tick
    pub profile_change: Option<Result<ProfileChange, E>>,
}

impl<E> Default for SampleReport<E> {
    fn default() -> Self {
        Self {
            sampled: 0,
            discarded: 0,
            unsampled: 0,
            failures: Vec::new(),
            profile_change: None,
        }
    }
}

/// Sampling side of the node
///
/// Reads every registered sensor over `B` and follows profile changes by
/// reprogramming the transmit timer.
pub struct SampleLoop<'a, B: SensorBus> {
    registry: &'a SensorRegistry,
    profile: &'a ProfileState,
    bus: B,
    channels: ChannelMap,
    applied_profile: Option<i32>,
    /// Record generation each sensor was last initialised for
    initialized: [Option<u32>; SENSOR_KIND_COUNT],
}

impl<'a, B: SensorBus> SampleLoop<'a, B> {
    /// The applied profile starts unset, so the first tick programs the
    /// timer and requests an immediate transmission.
    pub fn new(
        registry: &'a SensorRegistry,
        profile: &'a ProfileState,
        bus: B,
        channels: ChannelMap,
    ) -> Self {
        Self {
            registry,
            profile,
            bus,
            channels,
            applied_profile: None,
            initialized: [None; SENSOR_KIND_COUNT],
        }
    }

    pub async fn tick<T: PeriodicTimer>(
        &mut self,
        scheduler: &mut TransmitScheduler<'_, T>,
    ) -> SampleReport<T::Error> {
        let mut report = SampleReport::default();

        for record in self.registry.snapshot() {
            let kind = record.kind;
            if self.channels.channel(kind).is_none() {
                report.unsampled += 1;
                continue;
            }

            if self.initialized[kind.index()] != Some(record.generation) {
                match initialize_sensor(&mut self.bus, &self.channels, kind).await {
                    Ok(()) => self.initialized[kind.index()] = Some(record.generation),
                    Err(e) => {
                        let _ = report.failures.push((kind, SampleError::Bus(e)));
                    }
                }
            }

            match read_sensor(&mut self.bus, &self.channels, kind).await {
                Ok(Some(value)) => {
                    if self
                        .registry
                        .update_value(kind, record.generation, i32::from(value))
                    {
                        report.sampled += 1;
                    } else {
                        report.discarded += 1;
                    }
                }
                Ok(None) => report.unsampled += 1,
                Err(e) => {
                    let _ = report.failures.push((kind, e));
                }
            }
        }

        let current = self.profile.load();
        if self.applied_profile != Some(current) {
            let change = scheduler.reconfigure(current).map(|period_ms| {
                self.applied_profile = Some(current);
                ProfileChange {
                    profile: current,
                    period_ms,
                }
            });
            report.profile_change = Some(change);
        }

        report
    }

    /// Profile the timer was last programmed for
    pub fn applied_profile(&self) -> Option<i32> {
        self.applied_profile
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BusError;
    use crate::hotplug::HotPlugDetector;
    use crate::mock::{BusOp, MockBus, MockTimer, TimerOp};
    use crate::scheduler::TransmitRequest;

    fn reference_bus() -> MockBus {
        let mut bus = MockBus::new();
        bus.set_register(0x10, 0x04, [0x10, 0x00]);
        bus.set_register(0x50, 0x00, [0x06, 0x40]);
        bus
    }

    #[tokio::test]
    async fn test_first_tick_applies_initial_profile() {
        let registry = SensorRegistry::new();
        let profile = ProfileState::new();
        let request = TransmitRequest::new();
        let mut scheduler = TransmitScheduler::new(MockTimer::new(), &request);
        let mut sample =
            SampleLoop::new(&registry, &profile, MockBus::new(), ChannelMap::reference());

        let report = sample.tick(&mut scheduler).await;

        assert_eq!(
            report.profile_change,
            Some(Ok(ProfileChange {
                profile: 1,
                period_ms: 1_000
            }))
        );
        assert!(request.take());

        // Unchanged profile: no further reconfiguration
        let report = sample.tick(&mut scheduler).await;
        assert_eq!(report.profile_change, None);
        assert!(!request.take());
    }

    #[tokio::test]
    async fn test_profile_change_reprograms_timer() {
        let registry = SensorRegistry::new();
        let profile = ProfileState::new();
        let request = TransmitRequest::new();
        let mut scheduler = TransmitScheduler::new(MockTimer::new(), &request);
        let mut sample =
            SampleLoop::new(&registry, &profile, MockBus::new(), ChannelMap::reference());
        sample.tick(&mut scheduler).await;
        request.take();

        profile.publish(3);
        let report = sample.tick(&mut scheduler).await;

        assert_eq!(
            report.profile_change,
            Some(Ok(ProfileChange {
                profile: 3,
                period_ms: 10_000
            }))
        );
        assert_eq!(
            scheduler.timer().operations(),
            &[
                TimerOp::Stop,
                TimerOp::Start(1_000),
                TimerOp::Stop,
                TimerOp::Start(10_000)
            ]
        );
        assert!(request.take());
        assert_eq!(sample.applied_profile(), Some(3));
    }

    #[tokio::test]
    async fn test_failed_reconfiguration_retries_next_tick() {
        let registry = SensorRegistry::new();
        let profile = ProfileState::new();
        let request = TransmitRequest::new();
        let mut timer = MockTimer::new();
        timer.fail_next_start();
        let mut scheduler = TransmitScheduler::new(timer, &request);
        let mut sample =
            SampleLoop::new(&registry, &profile, MockBus::new(), ChannelMap::reference());

        let report = sample.tick(&mut scheduler).await;
        assert!(matches!(report.profile_change, Some(Err(_))));
        assert_eq!(sample.applied_profile(), None);

        let report = sample.tick(&mut scheduler).await;
        assert!(matches!(report.profile_change, Some(Ok(_))));
    }

    #[tokio::test]
    async fn test_samples_registered_sensors() {
        let registry = SensorRegistry::new();
        let detector = HotPlugDetector::new(&registry);
        detector.on_edge(SensorKind::Light, true);
        detector.on_edge(SensorKind::Temperature, true);
        detector.on_edge(SensorKind::Gas, true);
        let profile = ProfileState::new();
        let request = TransmitRequest::new();
        let mut scheduler = TransmitScheduler::new(MockTimer::new(), &request);
        let mut sample =
            SampleLoop::new(&registry, &profile, reference_bus(), ChannelMap::reference());

        let report = sample.tick(&mut scheduler).await;

        assert_eq!(report.sampled, 2);
        assert_eq!(report.unsampled, 1);
        assert!(report.failures.is_empty());
        assert_eq!(registry.get(SensorKind::Light).map(|r| r.last_value), Some(29));
        assert_eq!(
            registry.get(SensorKind::Temperature).map(|r| r.last_value),
            Some(12)
        );
        assert_eq!(registry.get(SensorKind::Gas).map(|r| r.last_value), Some(0));
    }

    #[tokio::test]
    async fn test_light_initialized_once_per_registration() {
        let registry = SensorRegistry::new();
        let detector = HotPlugDetector::new(&registry);
        detector.on_edge(SensorKind::Light, true);
        let profile = ProfileState::new();
        let request = TransmitRequest::new();
        let mut scheduler = TransmitScheduler::new(MockTimer::new(), &request);
        let mut sample =
            SampleLoop::new(&registry, &profile, reference_bus(), ChannelMap::reference());

        sample.tick(&mut scheduler).await;
        sample.tick(&mut scheduler).await;
        assert_eq!(sample.bus().write_count(), 4);

        // Replug: the sequence runs again
        detector.on_edge(SensorKind::Light, false);
        detector.on_edge(SensorKind::Light, true);
        sample.tick(&mut scheduler).await;
        assert_eq!(sample.bus().write_count(), 8);
    }

    #[tokio::test]
    async fn test_deregistered_sensor_is_not_read() {
        let registry = SensorRegistry::new();
        let detector = HotPlugDetector::new(&registry);
        detector.on_edge(SensorKind::Temperature, true);
        let profile = ProfileState::new();
        let request = TransmitRequest::new();
        let mut scheduler = TransmitScheduler::new(MockTimer::new(), &request);
        let mut sample =
            SampleLoop::new(&registry, &profile, reference_bus(), ChannelMap::reference());
        sample.tick(&mut scheduler).await;

        detector.on_edge(SensorKind::Temperature, false);
        sample.bus_mut().clear_operations();
        let report = sample.tick(&mut scheduler).await;

        assert_eq!(report.sampled, 0);
        assert!(!sample
            .bus()
            .operations()
            .iter()
            .any(|op| matches!(op, BusOp::Read { address: 0x50, .. })));
        assert_eq!(registry.get(SensorKind::Temperature), None);
    }

    #[tokio::test]
    async fn test_bus_failure_is_reported_and_keeps_value() {
        let registry = SensorRegistry::new();
        let detector = HotPlugDetector::new(&registry);
        detector.on_edge(SensorKind::Temperature, true);
        let profile = ProfileState::new();
        let request = TransmitRequest::new();
        let mut scheduler = TransmitScheduler::new(MockTimer::new(), &request);
        let mut bus = reference_bus();
        bus.fail_address(0x50, BusError::Timeout);
        let mut sample = SampleLoop::new(&registry, &profile, bus, ChannelMap::reference());

        let report = sample.tick(&mut scheduler).await;

        assert_eq!(report.sampled, 0);
        assert_eq!(
            report.failures.as_slice(),
            &[(SensorKind::Temperature, SampleError::Bus(BusError::Timeout))]
        );
        assert_eq!(
            registry.get(SensorKind::Temperature).map(|r| r.last_value),
            Some(0)
        );
    }
}
