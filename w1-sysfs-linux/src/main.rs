use clap::{Parser, Subcommand};
use onewire_bus::{Address, Device, Registrar};
use std::{collections::BTreeMap, error::Error, path::PathBuf, process::ExitCode};
use w1_sysfs::{W1_SYSFS_ROOT, W1SysfsBuilder, W1SysfsOpener, codec};

/// Talk to 1-Wire devices through the Linux w1 sysfs interface
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Directory holding the w1_bus_master<N> entries
    #[arg(long, env = "W1_SYSFS_ROOT", default_value = W1_SYSFS_ROOT)]
    root: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the bus masters
    Buses,
    /// List the devices on a bus
    Search {
        #[arg(short, long)]
        bus: u32,
        /// Only devices in alarm state (not supported by sysfs, lists all)
        #[arg(long)]
        alarm: bool,
    },
    /// Send bytes to a device and print its answer
    Tx {
        #[arg(short, long)]
        bus: u32,
        /// Device directory name, e.g. 28-04170328afff
        #[arg(short, long, value_parser = parse_device)]
        device: Address,
        /// Payload as hex, e.g. be
        #[arg(short, long, value_parser = parse_bytes, default_value = "")]
        write: Bytes,
        /// Number of bytes to read back
        #[arg(short, long, default_value_t = 0)]
        read: usize,
        /// Hold strong pull-up during the transfer
        #[arg(long)]
        strong: bool,
    },
    /// Read DS18B20/DS28EA00 temperatures
    Temp {
        #[arg(short, long)]
        bus: u32,
        /// Resolution in bits (9 to 12)
        #[arg(long, default_value_t = 12)]
        resolution: u8,
    },
}

#[derive(Debug, Clone)]
struct Bytes(Vec<u8>);

fn parse_device(s: &str) -> Result<Address, String> {
    codec::decode_dir_name(s).map_err(|e| e.to_string())
}

fn parse_bytes(s: &str) -> Result<Bytes, String> {
    let s = s.strip_prefix("0x").unwrap_or(s);
    if let Some(i) = s.bytes().position(|b| !b.is_ascii_hexdigit()) {
        return Err(format!("invalid hex digit at offset {i}"));
    }
    if s.len() % 2 != 0 {
        return Err("odd number of hex digits".into());
    }
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&s[i..i + 2], 16).map_err(|e| e.to_string()))
        .collect::<Result<_, _>>()
        .map(Bytes)
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Buses found by discovery, by number.
#[derive(Default)]
struct BusTable(BTreeMap<u32, (String, W1SysfsOpener)>);

impl Registrar<W1SysfsOpener> for BusTable {
    type Error = String;

    fn register(
        &mut self,
        name: &str,
        _aliases: &[&str],
        number: u32,
        opener: W1SysfsOpener,
    ) -> Result<(), String> {
        if let Some((existing, _)) = self.0.get(&number) {
            return Err(format!("bus {number} already registered as {existing}"));
        }
        self.0.insert(number, (name.to_string(), opener));
        Ok(())
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let builder = W1SysfsBuilder::default().with_root(&args.root);
    match args.command {
        Command::Buses => {
            let mut table = BusTable::default();
            let count = builder.discover(&mut table)?;
            log::info!("Found {} buses", count);
            for (number, (name, _)) in &table.0 {
                println!("{name}\t{number}");
            }
        }
        Command::Search { bus, alarm } => {
            let mut bus = builder.open(bus)?;
            for address in bus.search(alarm)? {
                println!("{}\t{address}", codec::encode_dir_name(address));
            }
        }
        Command::Tx {
            bus,
            device,
            write,
            read,
            strong,
        } => {
            let mut bus = builder.open(bus)?;
            let mut response = vec![0; read];
            let mut device = Device::new(&mut bus, device);
            if strong {
                device.tx_power(&write.0, &mut response)?;
            } else {
                device.tx(&write.0, &mut response)?;
            }
            println!("{}", hex(&response));
        }
        Command::Temp { bus, resolution } => {
            let mut bus = builder.open(bus)?;
            let mut delay = linux_embedded_hal::Delay;
            let mut sensors = ds18b20::Ds18b20Group::<16>::default()
                .with_resolution(ds18b20::ReadoutResolution::try_from(resolution)?);
            let devices = sensors.enumerate(&mut bus)?;
            log::info!("Found {} sensors", devices);
            sensors.trigger_temperature_conversion(&mut bus, &mut delay)?;
            let roms = sensors.roms().to_vec();
            for (rom, temp) in roms.iter().zip(sensors.read_temperatures(&mut bus)?) {
                println!("{}\t{temp}", codec::encode_dir_name(*rom));
            }
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    // Initialize the logger
    env_logger::init();
    // Parse command line arguments
    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
