//! Wi-Fi association and link supervision for the Pico 2 W
//!
//! # Connection Flow
//!
//! ```text
//! 1. Initialize CYW43439 driver (PIO, DMA, firmware)
//! 2. Create the network stack, spawn driver and stack tasks
//! 3. Spawn the transmission worker with the stack
//! 4. Join WPA2 network, retrying with a fixed delay
//! 5. Wait for DHCP lease (or static address)
//! 6. Watch the link, rejoin when it drops
//! ```
//!
//! An empty SSID leaves the radio off. Transmissions then drop with
//! `LinkDown`, while sampling and hot-plug keep running.

use super::tasks::{spawn_or_log, transmit_task};
use crate::config::{NodeConfig, WifiConfig};
use crate::node::NodeState;
use cyw43::{aligned_bytes, JoinOptions};
use cyw43_pio::DEFAULT_CLOCK_DIVIDER;
use embassy_executor::Spawner;
use embassy_net::{
    Config as NetConfig, Ipv4Address, Ipv4Cidr, Stack, StackResources, StaticConfigV4,
};
use embassy_rp::clocks::RoscRng;
use embassy_rp::{
    bind_interrupts,
    gpio::{Level, Output},
    peripherals::{DMA_CH0, PIN_23, PIN_24, PIN_25, PIN_29, PIO0},
    pio::{InterruptHandler as PioInterruptHandler, Pio},
    Peri,
};
use embassy_time::{with_timeout, Delay, Duration, Timer};
use sensor_node_core::link::{associate_with_retry, NetworkLink};
use sensor_node_core::NetworkError;
use static_cell::StaticCell;

/// Join attempts per association round
const MAX_JOIN_ATTEMPTS: u32 = 10;

/// Join timeout in seconds
const JOIN_TIMEOUT_SECS: u64 = 5;

/// Address acquisition timeout in seconds
const CONFIG_TIMEOUT_SECS: u64 = 15;

/// Delay between join attempts
const RETRY_DELAY_MS: u32 = 1000;

/// Pause after a failed association round before starting the next one
const ROUND_BACKOFF_SECS: u64 = 30;

/// Link poll period while associated
const LINK_POLL_MS: u64 = 1000;

bind_interrupts!(pub struct PioIrqs {
    PIO0_IRQ_0 => PioInterruptHandler<PIO0>;
});

/// Radio pins and peripherals owned by the Wi-Fi task
pub struct WifiPeripherals {
    pub pwr: Peri<'static, PIN_23>,
    pub dio: Peri<'static, PIN_24>,
    pub cs: Peri<'static, PIN_25>,
    pub clk: Peri<'static, PIN_29>,
    pub pio: Peri<'static, PIO0>,
    pub dma: Peri<'static, DMA_CH0>,
}

/// [`NetworkLink`] over the CYW43 control handle and the embassy-net stack
pub struct WifiLink<'a> {
    control: &'a mut cyw43::Control<'static>,
    stack: Stack<'static>,
    config: &'a WifiConfig,
}

impl<'a> WifiLink<'a> {
    pub fn new(
        control: &'a mut cyw43::Control<'static>,
        stack: Stack<'static>,
        config: &'a WifiConfig,
    ) -> Self {
        Self {
            control,
            stack,
            config,
        }
    }

    /// Drop the association; also resets the driver after a failed join
    pub async fn leave(&mut self) {
        self.control.leave().await;
    }
}

impl NetworkLink for WifiLink<'_> {
    async fn associate(&mut self) -> Result<(), NetworkError> {
        let options = JoinOptions::new(self.config.password.as_bytes());
        let joined = with_timeout(
            Duration::from_secs(JOIN_TIMEOUT_SECS),
            self.control.join(self.config.ssid.as_str(), options),
        )
        .await;

        match joined {
            Ok(Ok(())) => {}
            Ok(Err(_)) => {
                crate::log_warn!("Wi-Fi join rejected");
                // First join often fails on the CYW43439; leave() resets its state
                self.control.leave().await;
                return Err(NetworkError::Connect);
            }
            Err(_) => {
                crate::log_warn!("Wi-Fi join timed out after {} s", JOIN_TIMEOUT_SECS);
                self.control.leave().await;
                return Err(NetworkError::Timeout);
            }
        }

        if with_timeout(
            Duration::from_secs(CONFIG_TIMEOUT_SECS),
            self.stack.wait_config_up(),
        )
        .await
        .is_err()
        {
            crate::log_warn!("No address after {} s", CONFIG_TIMEOUT_SECS);
            self.control.leave().await;
            return Err(NetworkError::NoAddress);
        }
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.stack.is_link_up() && self.stack.is_config_up()
    }
}

fn net_config(config: &WifiConfig) -> NetConfig {
    if config.use_dhcp {
        crate::log_info!("Configuring DHCP");
        return NetConfig::dhcpv4(Default::default());
    }

    let [a, b, c, d] = config.static_ip;
    let [ga, gb, gc, gd] = config.gateway;
    crate::log_info!(
        "Configuring static IP: {}.{}.{}.{}/{}",
        a,
        b,
        c,
        d,
        config.prefix_len()
    );
    NetConfig::ipv4_static(StaticConfigV4 {
        address: Ipv4Cidr::new(Ipv4Address::new(a, b, c, d), config.prefix_len()),
        gateway: Some(Ipv4Address::new(ga, gb, gc, gd)),
        dns_servers: Default::default(),
    })
}

fn log_address(stack: &Stack<'static>) {
    if let Some(config) = stack.config_v4() {
        let [a, b, c, d] = config.address.address().octets();
        crate::log_info!("IP address {}.{}.{}.{}", a, b, c, d);
    }
}

/// Bring up the radio, then supervise the link forever
///
/// Never returns: the CYW43 `Control` must stay a local of a live task.
/// The transmission worker gets the stack as soon as it exists and keeps
/// it across every rejoin.
pub async fn initialize_wifi(
    spawner: Spawner,
    node: &'static NodeState,
    config: &'static NodeConfig,
    peripherals: WifiPeripherals,
) -> ! {
    let wifi = &config.wifi;
    if !wifi.is_configured() {
        crate::log_warn!("Wi-Fi not configured (empty SSID), transmissions will be dropped");
        spawn_transmit_offline(spawner, node, config);
        loop {
            Timer::after(Duration::from_secs(3600)).await;
        }
    }

    crate::log_info!("Initializing Wi-Fi, SSID: {}", wifi.ssid.as_str());

    let fw = aligned_bytes!("../../../../../cyw43-firmware/43439A0.bin");
    let clm = include_bytes!("../../../../../cyw43-firmware/43439A0_clm.bin");
    let nvram = aligned_bytes!("../../../../../cyw43-firmware/nvram_rp2040.bin");

    let pwr = Output::new(peripherals.pwr, Level::Low);
    let cs = Output::new(peripherals.cs, Level::High);
    let mut pio = Pio::new(peripherals.pio, PioIrqs);
    let spi = cyw43_pio::PioSpi::new(
        &mut pio.common,
        pio.sm0,
        DEFAULT_CLOCK_DIVIDER,
        pio.irq0,
        cs,
        peripherals.dio,
        peripherals.clk,
        peripherals.dma,
    );

    static STATE: StaticCell<cyw43::State> = StaticCell::new();
    let state = STATE.init(cyw43::State::new());
    let (net_device, mut control, runner) = cyw43::new(state, pwr, spi, fw, nvram).await;
    spawn_or_log("wifi", spawner, wifi_task(runner));

    // CLM must be loaded before any network operation
    control.init(clm).await;
    let mac = control.address().await;
    crate::log_debug!(
        "Wi-Fi MAC {:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
        mac[0],
        mac[1],
        mac[2],
        mac[3],
        mac[4],
        mac[5]
    );
    control
        .set_power_management(cyw43::PowerManagementMode::None)
        .await;

    let mut rng = RoscRng;
    static RESOURCES: StaticCell<StackResources<4>> = StaticCell::new();
    let (stack, runner) = embassy_net::new(
        net_device,
        net_config(wifi),
        RESOURCES.init(StackResources::new()),
        rng.next_u64(),
    );
    spawn_or_log("net", spawner, net_task(runner));

    // Transmissions drop with LinkDown until the first association
    spawn_or_log("transmit", spawner, transmit_task(node, config, Some(stack)));

    let mut link = WifiLink::new(&mut control, stack, wifi);
    loop {
        let joined =
            associate_with_retry(&mut link, &mut Delay, MAX_JOIN_ATTEMPTS, RETRY_DELAY_MS).await;
        match joined {
            Ok(attempt) => {
                crate::log_info!("Wi-Fi associated on attempt {}", attempt);
                log_address(&stack);
                while link.is_connected() {
                    Timer::after(Duration::from_millis(LINK_POLL_MS)).await;
                }
                crate::log_warn!("Wi-Fi link lost, rejoining");
                link.leave().await;
            }
            Err(e) => {
                crate::log_error!(
                    "Wi-Fi association failed after {} attempts: {}",
                    MAX_JOIN_ATTEMPTS,
                    e.as_str()
                );
                Timer::after(Duration::from_secs(ROUND_BACKOFF_SECS)).await;
            }
        }
    }
}

fn spawn_transmit_offline(
    spawner: Spawner,
    node: &'static NodeState,
    config: &'static NodeConfig,
) {
    spawn_or_log("transmit", spawner, transmit_task(node, config, None));
}

/// CYW43439 driver event loop
#[embassy_executor::task]
async fn wifi_task(
    runner: cyw43::Runner<
        'static,
        cyw43::SpiBus<Output<'static>, cyw43_pio::PioSpi<'static, PIO0, 0, DMA_CH0>>,
    >,
) -> ! {
    runner.run().await
}

/// embassy-net stack event loop
#[embassy_executor::task]
async fn net_task(mut runner: embassy_net::Runner<'static, cyw43::NetDriver<'static>>) -> ! {
    runner.run().await
}

/// Task wrapper around [`initialize_wifi`]
#[embassy_executor::task]
pub async fn wifi_init_task(
    spawner: Spawner,
    node: &'static NodeState,
    config: &'static NodeConfig,
    peripherals: WifiPeripherals,
) -> ! {
    initialize_wifi(spawner, node, config, peripherals).await
}
