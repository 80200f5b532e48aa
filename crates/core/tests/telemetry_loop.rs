//! End-to-end host test of the telemetry loop:
//! hot-plug -> sample -> timer -> dispatch -> transmission -> profile -> timer

use sensor_node_core::hotplug::HotPlugDetector;
use sensor_node_core::loops::{DispatchLoop, DispatchRound, ProfileChange, SampleLoop};
use sensor_node_core::mock::{MockBus, MockDelay, MockSink, MockTimer, MockTransport};
use sensor_node_core::protocol::{CollectorConfig, ResponseLimits};
use sensor_node_core::scheduler::{TransmitRequest, TransmitScheduler};
use sensor_node_core::sensor::ChannelMap;
use sensor_node_core::transmit::{
    InFlightLimiter, TransmissionOutcome, TransmissionWorker, TransmitStats,
};
use sensor_node_core::{ProfileState, SensorKind, SensorRegistry};

fn reference_bus() -> MockBus {
    let mut bus = MockBus::new();
    bus.set_register(0x10, 0x04, [0x10, 0x00]);
    bus.set_register(0x50, 0x00, [0x06, 0x40]);
    bus
}

#[tokio::test]
async fn test_profile_negotiation_closes_the_loop() {
    let registry = SensorRegistry::new();
    let profile = ProfileState::new();
    let request = TransmitRequest::new();
    let stats = TransmitStats::new();
    let limiter = InFlightLimiter::new(1);
    let config = CollectorConfig::new("192.168.2.77", 80, "sensor-node/1.0").unwrap();

    let detector = HotPlugDetector::new(&registry);
    detector.sync_levels([true, true, false]);

    let mut scheduler = TransmitScheduler::new(MockTimer::new(), &request);
    let mut sample = SampleLoop::new(&registry, &profile, reference_bus(), ChannelMap::reference());
    let mut dispatch = DispatchLoop::new(&registry, &request, &stats, 100);
    let mut sink = MockSink::new(3);
    let mut delay = MockDelay::new();

    let mut transport = MockTransport::new();
    transport.set_response(b"HTTP/1.0 200 OK\r\n\r\nstatus=ok#3\r\n");
    let mut worker = TransmissionWorker::new(
        transport,
        &config,
        ResponseLimits::REFERENCE,
        &profile,
        &limiter,
        &stats,
    );

    // Boot tick: sensors sampled, timer programmed for profile 1, immediate request
    let report = sample.tick(&mut scheduler).await;
    assert_eq!(report.sampled, 2);
    assert_eq!(
        report.profile_change,
        Some(Ok(ProfileChange {
            profile: 1,
            period_ms: 1_000
        }))
    );

    let round = dispatch.tick(&mut sink, &mut delay).await;
    assert_eq!(
        round,
        Some(DispatchRound {
            submitted: 2,
            rejected: 0
        })
    );

    let mut outcomes = Vec::new();
    while let Some(payload) = sink.pop() {
        outcomes.push(worker.process(payload).await);
    }
    assert_eq!(
        outcomes,
        [
            TransmissionOutcome::ProfileUpdated {
                kind: SensorKind::Light,
                profile: 3
            },
            TransmissionOutcome::ProfileUpdated {
                kind: SensorKind::Temperature,
                profile: 3
            },
        ]
    );
    let sent = core::str::from_utf8(worker.transport().sent()).unwrap();
    assert!(sent.starts_with("GET /?sensor_id=1&measurement=29 HTTP/1.0\r\n"));
    assert!(sent.contains("GET /?sensor_id=2&measurement=12 HTTP/1.0\r\n"));

    // Next sample tick picks up the new profile
    let report = sample.tick(&mut scheduler).await;
    assert_eq!(
        report.profile_change,
        Some(Ok(ProfileChange {
            profile: 3,
            period_ms: 10_000
        }))
    );
    assert_eq!(scheduler.timer().period_ms(), Some(10_000));
    assert!(request.is_pending());

    let counters = stats.snapshot();
    assert_eq!(counters.rounds, 1);
    assert_eq!(counters.delivered, 2);
    assert_eq!(counters.profile_updates, 2);
    assert_eq!(limiter.peak(), 1);
}

#[tokio::test]
async fn test_unplugged_sensor_stops_being_transmitted() {
    let registry = SensorRegistry::new();
    let profile = ProfileState::new();
    let request = TransmitRequest::new();
    let stats = TransmitStats::new();
    let detector = HotPlugDetector::new(&registry);
    detector.on_edge(SensorKind::Light, true);
    detector.on_edge(SensorKind::Temperature, true);

    let mut scheduler = TransmitScheduler::new(MockTimer::new(), &request);
    let mut sample = SampleLoop::new(&registry, &profile, reference_bus(), ChannelMap::reference());
    let mut dispatch = DispatchLoop::new(&registry, &request, &stats, 0);
    let mut sink = MockSink::new(3);

    sample.tick(&mut scheduler).await;
    detector.on_edge(SensorKind::Light, false);
    sample.tick(&mut scheduler).await;

    dispatch.tick(&mut sink, &mut MockDelay::new()).await;

    let kinds: Vec<SensorKind> = sink.drain().map(|p| p.kind).collect();
    assert_eq!(kinds, [SensorKind::Temperature]);
}

#[tokio::test]
async fn test_collector_outage_keeps_profile_and_loop_running() {
    let registry = SensorRegistry::new();
    let profile = ProfileState::new();
    let request = TransmitRequest::new();
    let stats = TransmitStats::new();
    let limiter = InFlightLimiter::new(1);
    let config = CollectorConfig::new("collector.local", 80, "sensor-node/1.0").unwrap();
    HotPlugDetector::new(&registry).sync_levels([false, true, false]);

    let mut dispatch = DispatchLoop::new(&registry, &request, &stats, 0);
    let mut sink = MockSink::new(3);
    let mut transport = MockTransport::new();
    transport.fail_connect(sensor_node_core::NetworkError::Connect);
    let mut worker = TransmissionWorker::new(
        transport,
        &config,
        ResponseLimits::REFERENCE,
        &profile,
        &limiter,
        &stats,
    );

    for _ in 0..3 {
        request.raise();
        dispatch.tick(&mut sink, &mut MockDelay::new()).await;
        while let Some(payload) = sink.pop() {
            let outcome = worker.process(payload).await;
            assert!(!outcome.is_delivered());
        }
    }

    assert_eq!(profile.load(), 1);
    let counters = stats.snapshot();
    assert_eq!(counters.rounds, 3);
    assert_eq!(counters.dropped.connect, 3);
    assert_eq!(counters.dropped.total(), 3);
    assert_eq!(worker.transport().close_count(), 3);
}
