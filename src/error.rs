use core::fmt::{self, Debug, Display};
use embedded_hal::digital::v2::OutputPin;

mod private {
    #[derive(Debug)]
    pub enum Private {}
}

/// The error type used by this crate.
///
/// This can encapsulate an SPI or GPIO error from the transport, and adds
/// the protocol-level error taxonomy the core itself raises while scanning,
/// waiting for readiness, or servicing a read/program/erase request.
pub enum Error<E, GPIO: OutputPin> {
    /// An SPI transfer failed.
    Spi(E),

    /// A GPIO could not be set.
    Gpio(GPIO::Error),

    /// Status register contained unexpected flags.
    ///
    /// This can happen when the chip is faulty, incorrectly connected, or the
    /// driver wasn't constructed or destructed properly (eg. while there is
    /// still a write in progress).
    UnexpectedStatus,

    /// An erase was misaligned, a zero-length access was attempted, or an
    /// offset fell outside the device (or, without BAR enabled, above the
    /// 16 MiB 3-byte addressing boundary).
    InvalidArgument,

    /// The JEDEC ID returned by the chip did not match any entry in the
    /// identity table.
    UnknownDevice,

    /// `wait_ready` exceeded its deadline before the chip reported ready.
    Timeout,

    /// The targeted range is locked by software write-protection.
    Protected,

    /// A write or erase was attempted on a device (or range) that is
    /// read-only.
    ReadOnly,

    /// A required transport hook was missing, or a memory-map window's size
    /// did not match the device's total size.
    ConfigError,

    /// A quad opcode was selected but the manufacturer has no known
    /// quad-enable handshake.
    QuadUnsupported,

    #[doc(hidden)]
    __NonExhaustive(private::Private),
}

impl<E, GPIO: OutputPin> Debug for Error<E, GPIO>
where
    E: Debug,
    GPIO::Error: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Spi(spi) => write!(f, "Error::Spi({:?})", spi),
            Error::Gpio(gpio) => write!(f, "Error::Gpio({:?})", gpio),
            Error::UnexpectedStatus => f.write_str("Error::UnexpectedStatus"),
            Error::InvalidArgument => f.write_str("Error::InvalidArgument"),
            Error::UnknownDevice => f.write_str("Error::UnknownDevice"),
            Error::Timeout => f.write_str("Error::Timeout"),
            Error::Protected => f.write_str("Error::Protected"),
            Error::ReadOnly => f.write_str("Error::ReadOnly"),
            Error::ConfigError => f.write_str("Error::ConfigError"),
            Error::QuadUnsupported => f.write_str("Error::QuadUnsupported"),
            Error::__NonExhaustive(_) => unreachable!(),
        }
    }
}

impl<E, GPIO: OutputPin> Display for Error<E, GPIO>
where
    E: Display,
    GPIO::Error: Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Spi(spi) => write!(f, "SPI error: {}", spi),
            Error::Gpio(gpio) => write!(f, "GPIO error: {}", gpio),
            Error::UnexpectedStatus => f.write_str("unexpected value in status register"),
            Error::InvalidArgument => f.write_str("misaligned or out-of-range access"),
            Error::UnknownDevice => f.write_str("unrecognized JEDEC id"),
            Error::Timeout => f.write_str("timed out waiting for the chip to become ready"),
            Error::Protected => f.write_str("target range is write-protected"),
            Error::ReadOnly => f.write_str("device is read-only"),
            Error::ConfigError => f.write_str("missing transport hook or bad memory-map size"),
            Error::QuadUnsupported => {
                f.write_str("quad opcode selected but manufacturer has no quad-enable handshake")
            }
            Error::__NonExhaustive(_) => unreachable!(),
        }
    }
}
