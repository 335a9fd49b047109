//! Turns an embedded-hal SPI peripheral (or a pair of them) into the
//! opcode-level primitive [`crate::nor::Flash`] drives.
//!
//! embedded-hal's `Transfer<u8>` already hides lane count from callers (a
//! QSPI peripheral's `HAL` implementation drives however many lines it has),
//! so what's left for this module to abstract is: how chip-select is
//! sequenced around a command, how a stacked or parallel dual-die package
//! is steered, and what capability ceiling (read/write modes, a
//! memory-mapped window) the bus imposes on top of the chip's own.

use crate::error::Error;
use crate::params::{ReadModes, WriteModes};
use embedded_hal::blocking::spi::Transfer;
use embedded_hal::digital::v2::OutputPin;

/// The data phase of a [`Transport::command`] call.
pub enum DataPhase<'a> {
    /// No data phase (eg. `WREN`, `WRDI`).
    None,
    /// Data is clocked out of the device into `buf`.
    Read(&'a mut [u8]),
    /// `buf` is clocked into the device.
    Write(&'a [u8]),
}

/// A bus capable of issuing SPI NOR opcodes.
///
/// Implementors own chip-select and know how many lanes and dies they can
/// drive. [`Flash`](crate::nor::Flash) only ever calls [`Transport::command`]
/// and asks about capabilities through the other methods, so the same
/// driver logic runs unmodified over a single bitbanged SPI, a hardware
/// QSPI controller with an XIP window, or a stacked/parallel dual-die
/// package.
pub trait Transport {
    /// The underlying bus's transfer error (eg. `SPI::Error`).
    type BusError;
    /// The chip-select pin type, so [`Error::Gpio`] can carry its error.
    type Pin: OutputPin;

    /// Issues `opcode`, followed optionally by `addr` (already encoded to
    /// the chip's address width), `dummy_len` dummy bytes, then the data
    /// phase. Chip-select is asserted for the whole sequence and deasserted
    /// before returning, even on error.
    fn command(
        &mut self,
        opcode: u8,
        addr: Option<&[u8]>,
        dummy_len: usize,
        data: DataPhase<'_>,
    ) -> Result<(), Error<Self::BusError, Self::Pin>>;

    /// Steers subsequent `command` calls to the upper (`true`) or lower
    /// (`false`) die of a stacked/parallel dual-flash topology.
    ///
    /// Single-chip transports accept both values as a no-op; only a caller
    /// that has mis-detected a dual topology would ever see this matter.
    fn select_die(&mut self, upper: bool) -> Result<(), Error<Self::BusError, Self::Pin>> {
        let _ = upper;
        Ok(())
    }

    /// Read lane widths this bus can drive, independent of what the chip
    /// supports. The driver uses the intersection of this and the chip's
    /// own [`ReadModes`].
    fn read_modes(&self) -> ReadModes {
        ReadModes::BASE
    }

    /// Write lane widths this bus can drive.
    fn write_modes(&self) -> WriteModes {
        WriteModes::PP
    }

    /// Size of the memory-mapped (XIP) window, if this bus exposes one.
    fn memory_map(&self) -> Option<usize> {
        None
    }

    /// Upper bound on a single `command` data-phase length, if this bus
    /// needs chunking below the chip's page size (eg. a DMA descriptor
    /// limit). `None` means "no bus-imposed limit".
    fn max_write_size(&self) -> Option<usize> {
        None
    }

    /// Reads `buf.len()` bytes from the memory-mapped window at `offset`.
    /// Only called when [`Transport::memory_map`] returned `Some`.
    fn read_mmap(&mut self, offset: usize, buf: &mut [u8]) -> Result<(), Error<Self::BusError, Self::Pin>> {
        let _ = (offset, buf);
        Ok(())
    }
}

/// Default single-die transport: one SPI peripheral, one chip-select.
pub struct SpiTransport<SPI, CS> {
    spi: SPI,
    cs: CS,
}

impl<SPI, CS> SpiTransport<SPI, CS> {
    pub fn new(spi: SPI, cs: CS) -> Self {
        Self { spi, cs }
    }

    /// Releases the underlying SPI peripheral and chip-select pin.
    pub fn free(self) -> (SPI, CS) {
        (self.spi, self.cs)
    }
}

impl<SPI, CS> Transport for SpiTransport<SPI, CS>
where
    SPI: Transfer<u8>,
    CS: OutputPin,
{
    type BusError = SPI::Error;
    type Pin = CS;

    fn command(
        &mut self,
        opcode: u8,
        addr: Option<&[u8]>,
        dummy_len: usize,
        data: DataPhase<'_>,
    ) -> Result<(), Error<SPI::Error, CS>> {
        self.cs.set_low().map_err(Error::Gpio)?;
        let result = run_command(&mut self.spi, opcode, addr, dummy_len, data).map_err(Error::Spi);
        self.cs.set_high().map_err(Error::Gpio)?;
        result
    }
}

/// Issues one opcode/addr/dummy/data sequence over an already-selected SPI
/// peripheral. Shared by [`SpiTransport`], [`StackedSpiTransport`], and
/// [`ParallelSpiTransport`].
fn run_command<SPI>(
    spi: &mut SPI,
    opcode: u8,
    addr: Option<&[u8]>,
    dummy_len: usize,
    data: DataPhase<'_>,
) -> Result<(), SPI::Error>
where
    SPI: Transfer<u8>,
{
    let mut header = [0u8; 1 + 4];
    header[0] = opcode;
    let mut header_len = 1;
    if let Some(addr) = addr {
        header[1..1 + addr.len()].copy_from_slice(addr);
        header_len += addr.len();
    }
    spi.transfer(&mut header[..header_len])?;

    if dummy_len > 0 {
        let mut dummy = [0u8; 4];
        spi.transfer(&mut dummy[..dummy_len])?;
    }

    match data {
        DataPhase::None => {}
        DataPhase::Read(buf) => {
            spi.transfer(buf)?;
        }
        DataPhase::Write(buf) => {
            // `Transfer` is the only blocking SPI trait embedded-hal 0.2
            // guarantees; a write-only transfer still has to go through it,
            // discarding whatever comes back on MISO.
            let mut scratch = [0u8; 256];
            let mut offset = 0;
            while offset < buf.len() {
                let n = core::cmp::min(scratch.len(), buf.len() - offset);
                scratch[..n].copy_from_slice(&buf[offset..offset + n]);
                spi.transfer(&mut scratch[..n])?;
                offset += n;
            }
        }
    }
    Ok(())
}

/// Transport for a stacked dual-die package (eg. Winbond W25M) where both
/// dies share one SPI bus and chip-select, and an in-band opcode switches
/// which die subsequent commands address.
pub struct StackedSpiTransport<SPI, CS> {
    inner: SpiTransport<SPI, CS>,
    upper_selected: bool,
}

/// Opcode used by stacked packages to switch the active die, followed by one
/// byte (`0x00` lower, `0x01` upper).
const DIE_SELECT: u8 = 0xc2;

impl<SPI, CS> StackedSpiTransport<SPI, CS> {
    pub fn new(spi: SPI, cs: CS) -> Self {
        Self {
            inner: SpiTransport::new(spi, cs),
            upper_selected: false,
        }
    }

    pub fn free(self) -> (SPI, CS) {
        self.inner.free()
    }
}

impl<SPI, CS> Transport for StackedSpiTransport<SPI, CS>
where
    SPI: Transfer<u8>,
    CS: OutputPin,
{
    type BusError = SPI::Error;
    type Pin = CS;

    fn command(
        &mut self,
        opcode: u8,
        addr: Option<&[u8]>,
        dummy_len: usize,
        data: DataPhase<'_>,
    ) -> Result<(), Error<SPI::Error, CS>> {
        self.inner.command(opcode, addr, dummy_len, data)
    }

    fn select_die(&mut self, upper: bool) -> Result<(), Error<SPI::Error, CS>> {
        if upper == self.upper_selected {
            return Ok(());
        }
        let select_byte = [if upper { 0x01 } else { 0x00 }];
        self.inner
            .command(DIE_SELECT, None, 0, DataPhase::Write(&select_byte))?;
        self.upper_selected = upper;
        Ok(())
    }
}

/// Transport for a parallel dual-die package: two chips on separate
/// chip-selects, asserted together, with even address bytes going to the
/// lower die and odd bytes to the upper die.
pub struct ParallelSpiTransport<SPI, CS0, CS1> {
    spi: SPI,
    cs_lower: CS0,
    cs_upper: CS1,
}

impl<SPI, CS0, CS1> ParallelSpiTransport<SPI, CS0, CS1> {
    pub fn new(spi: SPI, cs_lower: CS0, cs_upper: CS1) -> Self {
        Self { spi, cs_lower, cs_upper }
    }

    pub fn free(self) -> (SPI, CS0, CS1) {
        (self.spi, self.cs_lower, self.cs_upper)
    }
}

impl<SPI, CS0, CS1> Transport for ParallelSpiTransport<SPI, CS0, CS1>
where
    SPI: Transfer<u8>,
    CS0: OutputPin,
    CS1: OutputPin<Error = CS0::Error>,
{
    type BusError = SPI::Error;
    type Pin = CS0;

    fn command(
        &mut self,
        opcode: u8,
        addr: Option<&[u8]>,
        dummy_len: usize,
        data: DataPhase<'_>,
    ) -> Result<(), Error<SPI::Error, CS0>> {
        self.cs_lower.set_low().map_err(Error::Gpio)?;
        self.cs_upper.set_low().map_err(Error::Gpio)?;
        let result = run_command(&mut self.spi, opcode, addr, dummy_len, data).map_err(Error::Spi);
        self.cs_upper.set_high().map_err(Error::Gpio)?;
        self.cs_lower.set_high().map_err(Error::Gpio)?;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockSpi;

    impl Transfer<u8> for MockSpi {
        type Error = ();
        fn transfer<'w>(&mut self, words: &'w mut [u8]) -> Result<&'w [u8], ()> {
            Ok(words)
        }
    }

    #[derive(Debug)]
    struct MockPin(bool);

    impl OutputPin for MockPin {
        type Error = ();
        fn set_low(&mut self) -> Result<(), ()> {
            self.0 = false;
            Ok(())
        }
        fn set_high(&mut self) -> Result<(), ()> {
            self.0 = true;
            Ok(())
        }
    }

    #[test]
    fn stacked_transport_skips_redundant_switch() {
        let mut t = StackedSpiTransport::new(MockSpi, MockPin(true));
        assert!(t.select_die(false).is_ok());
        assert!(!t.upper_selected);
        assert!(t.select_die(true).is_ok());
        assert!(t.upper_selected);
    }
}
