use std::env;
use std::fs;
use std::path::PathBuf;

/// Compiled-in node settings: (variable, default, secret)
///
/// Every variable is forwarded to the crate through `cargo:rustc-env`, so
/// `env!()` always resolves. Validation happens at boot in `NodeConfig`.
const SETTINGS: &[(&str, &str, bool)] = &[
    ("WIFI_SSID", "", false),
    ("WIFI_PASSWORD", "", true),
    ("WIFI_DHCP", "true", false),
    ("WIFI_IP", "0.0.0.0", false),
    ("WIFI_NETMASK", "255.255.255.0", false),
    ("WIFI_GATEWAY", "0.0.0.0", false),
    ("COLLECTOR_HOST", "192.168.2.77", false),
    ("COLLECTOR_PORT", "80", false),
    ("COLLECTOR_USER_AGENT", "sensor-node/1.0 rp2350", false),
    ("SAMPLE_PERIOD_MS", "1000", false),
    ("DISPATCH_PERIOD_MS", "1000", false),
    ("LAUNCH_STAGGER_MS", "100", false),
    ("READ_TIMEOUT_MS", "5000", false),
    ("MAX_RESPONSE_LEN", "512", false),
];

fn main() {
    for (name, default, secret) in SETTINGS {
        println!("cargo:rerun-if-env-changed={}", name);
        match env::var(name) {
            Ok(value) => {
                println!("cargo:rustc-env={}={}", name, value);
                if *secret {
                    println!("cargo:warning=Using {} from environment (hidden)", name);
                } else {
                    println!("cargo:warning=Using {} from environment: {}", name, value);
                }
            }
            Err(_) => println!("cargo:rustc-env={}={}", name, default),
        }
    }

    // Linker script only matters for the embedded target
    let target = env::var("TARGET").unwrap_or_default();
    if target.starts_with("thumbv8m") {
        let out = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR not set"));
        fs::write(out.join("memory.x"), include_bytes!("memory.x")).expect("write memory.x");
        println!("cargo:rustc-link-search={}", out.display());
        println!("cargo:rerun-if-changed=memory.x");
    }
}
