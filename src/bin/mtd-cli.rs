//! `spi-nor-cli`: the external MTD shell spec §6 describes, adapted from
//! `spi-memory`'s `util.rs` onto the generalized `Transport`-based
//! `Flash<T, C>`.
//!
//! Every invocation opens the configured Linux `spidev`, probes the chip,
//! then runs exactly one of the commands from spec §6's CLI table. There is
//! no persistent daemon: each invocation is its own process, so `probe`
//! means "probe and print", not "probe and remember for a later call" —
//! the core itself carries no such state, and neither does this shell.

use std::process;
use std::time::Instant;

use log::{error, info};
use structopt::StructOpt;

use linux_embedded_hal::sysfs_gpio::Direction;
use linux_embedded_hal::{spidev, Pin as Pindev, Spidev};
use simplelog::{LevelFilter, TermLogger, TerminalMode};

use spi_nor_core::prelude::*;
use spi_nor_core::readiness::Clock;

#[derive(Debug, StructOpt)]
#[structopt(name = "spi-nor-cli")]
struct Options {
    #[structopt(subcommand)]
    command: Command,

    /// SPI device node to probe.
    #[structopt(long, default_value = "/dev/spidev0.0", env = "SPI_DEV")]
    spi_dev: String,

    /// SPI clock rate, in Hz.
    #[structopt(long, default_value = "1000000", env = "SPI_BAUD")]
    spi_baud: u32,

    /// Chip-select GPIO line number.
    #[structopt(long, default_value = "8", env = "CS_PIN")]
    cs_pin: u64,

    #[structopt(long, default_value = "info", env = "LOG_LEVEL")]
    log_level: LevelFilter,
}

#[derive(Debug, StructOpt)]
enum Command {
    /// Enumerate the configured device and report whether it's present.
    List,
    /// Print page size, erase size, and total size of the probed device.
    Info,
    /// Probe the device and print its JEDEC identity and chosen opcodes.
    Probe,
    /// Erase `len` bytes starting at `offset`. `len` may be given as `+N`
    /// to mean "round N bytes up to a whole number of erase sectors".
    Erase {
        #[structopt(parse(try_from_str = parse_hex))]
        offset: u32,
        #[structopt(parse(try_from_str = parse_len))]
        len: Len,
    },
    /// Read `len` bytes starting at `from` and print them as hex.
    Read {
        #[structopt(parse(try_from_str = parse_hex))]
        from: u32,
        len: u32,
    },
    /// Write hex-encoded `data` starting at `to`.
    Write {
        #[structopt(parse(try_from_str = parse_hex))]
        to: u32,
        #[structopt(parse(try_from_str = parse_hex_data))]
        data: Vec<u8>,
    },
}

fn parse_hex_data(s: &str) -> Result<Vec<u8>, hex::FromHexError> {
    hex::decode(s)
}

/// An erase length: either an exact byte count, or `+N`, meaning "round N
/// up to the next whole erase sector".
#[derive(Debug, Clone, Copy)]
enum Len {
    Exact(u32),
    RoundUp(u32),
}

fn parse_len(s: &str) -> Result<Len, std::num::ParseIntError> {
    if let Some(rest) = s.strip_prefix('+') {
        rest.parse().map(Len::RoundUp)
    } else {
        s.parse().map(Len::Exact)
    }
}

fn parse_hex(s: &str) -> Result<u32, std::num::ParseIntError> {
    let s = s.strip_prefix("0x").unwrap_or(s);
    u32::from_str_radix(s, 16)
}

/// `std::time::Instant`-backed [`Clock`] for `wait_ready`'s bounded polling.
struct SystemClock(Instant);

impl SystemClock {
    fn new() -> Self {
        Self(Instant::now())
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u32 {
        self.0.elapsed().as_millis() as u32
    }
}

/// Exit codes per spec §6: `0` success, `1` device failure, `2` usage.
const EXIT_DEVICE_FAILURE: i32 = 1;

fn main() {
    let opts = Options::from_args();

    let _ = TermLogger::init(opts.log_level, simplelog::Config::default(), TerminalMode::Mixed);

    let cs_pin = Pindev::new(opts.cs_pin);
    if cs_pin.export().is_err() || cs_pin.set_direction(Direction::Out).is_err() {
        error!("failed to configure chip-select GPIO {}", opts.cs_pin);
        process::exit(EXIT_DEVICE_FAILURE);
    }

    let mut spi = match Spidev::open(&opts.spi_dev) {
        Ok(spi) => spi,
        Err(e) => {
            error!("failed to open {}: {}", opts.spi_dev, e);
            process::exit(EXIT_DEVICE_FAILURE);
        }
    };
    let mut spi_config = spidev::SpidevOptions::new();
    spi_config.mode(spidev::SpiModeFlags::SPI_MODE_0 | spidev::SpiModeFlags::SPI_NO_CS);
    spi_config.max_speed_hz(opts.spi_baud);
    if spi.configure(&spi_config).is_err() {
        error!("failed to configure {}", opts.spi_dev);
        process::exit(EXIT_DEVICE_FAILURE);
    }

    let transport = SpiTransport::new(spi, cs_pin);
    let clock = SystemClock::new();
    let mut flash = match Flash::init_with_clock(transport, clock, DualTopology::Single) {
        Ok(flash) => flash,
        Err(e) => {
            error!("probe failed: {:?}", e);
            process::exit(EXIT_DEVICE_FAILURE);
        }
    };

    if let Err(code) = run(&mut flash, &opts) {
        process::exit(code);
    }
}

fn run<T, C>(flash: &mut Flash<T, C>, opts: &Options) -> Result<(), i32>
where
    T: Transport,
    C: Clock,
    T::BusError: core::fmt::Debug,
    T::Pin: core::fmt::Debug,
    <T::Pin as embedded_hal::digital::v2::OutputPin>::Error: core::fmt::Debug,
{
    match &opts.command {
        Command::List => {
            let facade = flash.facade();
            println!("{}\t{}", opts.spi_dev, facade.name);
            Ok(())
        }
        Command::Info => {
            let facade = flash.facade();
            println!("name:         {}", facade.name);
            println!("page size:    {}", facade.writebufsize);
            println!("erase size:   {}", facade.erasesize);
            println!("total size:   {}", facade.size);
            Ok(())
        }
        Command::Probe => {
            let id = flash.read_jedec_id();
            match id {
                Ok(id) => {
                    info!("jedec id: {:?}", id);
                    let facade = flash.facade();
                    println!("{}: {} ({} bytes)", opts.spi_dev, facade.name, facade.size);
                    Ok(())
                }
                Err(e) => {
                    error!("jedec id read failed: {:?}", e);
                    Err(EXIT_DEVICE_FAILURE)
                }
            }
        }
        Command::Erase { offset, len } => {
            let erase_size = flash.config().erase_size;
            let byte_len = match *len {
                Len::Exact(n) => n,
                Len::RoundUp(n) => ((n + erase_size - 1) / erase_size) * erase_size,
            };
            let amount = (byte_len / erase_size) as usize;
            info!("erasing {} sectors at 0x{:08x}", amount, offset);
            flash.erase_sectors(*offset, amount).map_err(|e| {
                error!("erase failed: {:?}", e);
                EXIT_DEVICE_FAILURE
            })
        }
        Command::Read { from, len } => {
            let mut buf = vec![0u8; *len as usize];
            flash.read(*from, &mut buf).map_err(|e| {
                error!("read failed: {:?}", e);
                EXIT_DEVICE_FAILURE
            })?;
            info!("read {} bytes from 0x{:08x}", buf.len(), from);
            println!("{}", hex_dump(&buf));
            Ok(())
        }
        Command::Write { to, data } => {
            let mut buf = data.clone();
            flash.write_bytes(*to, &mut buf).map_err(|e| {
                error!("write failed: {:?}", e);
                EXIT_DEVICE_FAILURE
            })?;
            info!("wrote {} bytes at 0x{:08x}", buf.len(), to);
            Ok(())
        }
    }
}

fn hex_dump(buf: &[u8]) -> String {
    buf.iter().map(|b| format!("{:02x}", b)).collect::<Vec<_>>().join(" ")
}
