//! Adaptive telemetry sensor node for the Raspberry Pi Pico 2 W
//!
//! # Wiring
//!
//! - I2C0: SDA GPIO4, SCL GPIO5 (light sensor 0x10, temperature sensor 0x50)
//! - Enable lines (active high, pulled down): light GPIO10, temperature
//!   GPIO11, gas GPIO12
//! - CYW43439 radio: GPIO23/24/25/29, PIO0, DMA_CH0
//!
//! # Build
//!
//! ```bash
//! WIFI_SSID=... WIFI_PASSWORD=... COLLECTOR_HOST=192.168.2.77 \
//!     cargo run --release -p sensor_node_firmware --features pico2_w --bin sensor_node
//! ```
//!
//! The sample loop runs on core 1 with its own executor and I2C interrupt.
//! Everything else shares the core 0 executor.

#![no_std]
#![no_main]

use core::ptr::addr_of_mut;
use cortex_m_rt::entry;
use embassy_executor::Executor;
use embassy_rp::bind_interrupts;
use embassy_rp::binary_info::{rp_cargo_version, rp_program_description, rp_program_name, EntryAddr};
use embassy_rp::block::ImageDef;
use embassy_rp::gpio::{Input, Pull};
use embassy_rp::i2c::{self, I2c};
use embassy_rp::multicore::{spawn_core1, Stack};
use embassy_rp::peripherals::I2C0;
use embassy_sync::signal::Signal;
use sensor_node_core::hotplug::HotPlugDetector;
use sensor_node_core::SensorKind;
use sensor_node_firmware::config::NodeConfig;
use sensor_node_firmware::node::NodeState;
use sensor_node_firmware::platform::rp2350::tasks::{
    dispatch_task, enable_line_task, monitor_task, sample_task, spawn_or_log,
    transmit_timer_task,
};
use sensor_node_firmware::platform::rp2350::{wifi_init_task, WifiPeripherals};
use sensor_node_firmware::platform::{SignalTimer, TimerCommands};
use sensor_node_firmware::{log_error, log_info};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

#[link_section = ".start_block"]
#[used]
pub static IMAGE_DEF: ImageDef = ImageDef::secure_exe();

#[link_section = ".bi_entries"]
#[used]
pub static PICOTOOL_ENTRIES: [EntryAddr; 3] = [
    rp_program_name!(c"sensor_node"),
    rp_program_description!(c"Adaptive telemetry sensor node"),
    rp_cargo_version!(),
];

bind_interrupts!(struct Irqs {
    I2C0_IRQ => i2c::InterruptHandler<I2C0>;
});

/// Sensor bus clock
const I2C_FREQUENCY_HZ: u32 = 100_000;

static NODE: NodeState = NodeState::new();
static TIMER_COMMANDS: TimerCommands = Signal::new();
static CONFIG: StaticCell<NodeConfig> = StaticCell::new();

static mut CORE1_STACK: Stack<4096> = Stack::new();
static EXECUTOR0: StaticCell<Executor> = StaticCell::new();
static EXECUTOR1: StaticCell<Executor> = StaticCell::new();

#[entry]
fn main() -> ! {
    let p = embassy_rp::init(Default::default());
    log_info!("Sensor node starting");

    let config: &'static NodeConfig = match NodeConfig::from_build_env() {
        Ok(config) => CONFIG.init(config),
        Err(e) => {
            log_error!("Invalid build configuration: {}", defmt::Display2Format(&e));
            panic!("invalid build configuration");
        }
    };
    log_info!(
        "Collector {}:{}, sample every {} ms",
        config.collector.host.as_str(),
        config.collector.port,
        config.timing.sample_period_ms
    );

    let lines = [
        (SensorKind::Light, Input::new(p.PIN_10, Pull::Down)),
        (SensorKind::Temperature, Input::new(p.PIN_11, Pull::Down)),
        (SensorKind::Gas, Input::new(p.PIN_12, Pull::Down)),
    ];
    // Sensors plugged in before boot produce no edge
    let levels = lines.each_ref().map(|(_, line)| line.is_high());
    let present = HotPlugDetector::new(&NODE.registry).sync_levels(levels);
    log_info!("{} sensor(s) present at boot", present);

    let (i2c0, scl, sda) = (p.I2C0, p.PIN_5, p.PIN_4);
    let sample_period_ms = config.timing.sample_period_ms;
    spawn_core1(
        p.CORE1,
        unsafe { &mut *addr_of_mut!(CORE1_STACK) },
        move || {
            // Created here so the I2C interrupt is enabled on core 1
            let mut i2c_config = i2c::Config::default();
            i2c_config.frequency = I2C_FREQUENCY_HZ;
            let i2c = I2c::new_async(i2c0, scl, sda, Irqs, i2c_config);

            let executor1 = EXECUTOR1.init(Executor::new());
            executor1.run(|spawner| {
                spawn_or_log(
                    "sample",
                    spawner,
                    sample_task(&NODE, i2c, SignalTimer::new(&TIMER_COMMANDS), sample_period_ms),
                );
            })
        },
    );

    let wifi = WifiPeripherals {
        pwr: p.PIN_23,
        dio: p.PIN_24,
        cs: p.PIN_25,
        clk: p.PIN_29,
        pio: p.PIO0,
        dma: p.DMA_CH0,
    };

    let executor0 = EXECUTOR0.init(Executor::new());
    executor0.run(|spawner| {
        spawn_or_log(
            "transmit timer",
            spawner,
            transmit_timer_task(&TIMER_COMMANDS, &NODE.request),
        );
        spawn_or_log("dispatch", spawner, dispatch_task(&NODE, config.timing));
        for (kind, line) in lines {
            spawn_or_log("enable line", spawner, enable_line_task(kind, line, &NODE));
        }
        spawn_or_log("monitor", spawner, monitor_task(&NODE));
        spawn_or_log("wifi", spawner, wifi_init_task(spawner, &NODE, config, wifi));
    })
}
