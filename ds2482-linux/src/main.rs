use clap::Parser;
use onewire_core::{OneWireCrc, OneWireSearch, OneWireSearchKind};

/// Enumerate the devices behind a DS2482-100 bridge.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the I2C bus (e.g., /dev/i2c-1)
    #[arg(short, long)]
    path: String,
    /// Value strapped on the bridge's AD1/AD0 address pins (0-3)
    #[arg(short, long, default_value_t = 0)]
    address_pins: u8,
    /// Restrict the search to one family code (e.g. 0x28 for DS18B20)
    #[arg(short, long)]
    family: Option<u8>,
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    let mut i2c = linux_embedded_hal::I2cdev::new(&args.path).expect("Failed to open I2C device");
    let delay = linux_embedded_hal::Delay;
    let mut bridge = ds2482::Ds2482Builder::default()
        .with_address_pins(args.address_pins)
        .build(&mut i2c, delay)
        .expect("Failed to bring up the DS2482 bridge");
    if !bridge.check_presence() {
        log::warn!("Bridge at 0x{:02x} stopped acknowledging", bridge.address());
    }
    let mut search = match args.family {
        Some(family) => OneWireSearch::with_family(&mut bridge, OneWireSearchKind::Normal, family),
        None => OneWireSearch::new(&mut bridge, OneWireSearchKind::Normal),
    };
    let mut count = 0u32;
    loop {
        match search.next() {
            Ok(Some(rom)) => {
                count += 1;
                let valid = OneWireCrc::validate(&rom.to_le_bytes());
                log::info!(
                    "ROM {rom:016x} (family 0x{:02x}, CRC {})",
                    rom.to_le_bytes()[0],
                    if valid { "ok" } else { "BAD" }
                );
            }
            Ok(None) => break,
            Err(e) => {
                log::error!("Search failed: {e:?}");
                break;
            }
        }
    }
    drop(search);
    log::info!("Found {count} devices");
    if let Some(fault) = bridge.last_fault() {
        log::warn!("Bridge recorded fault: {fault:?}");
    }
}
