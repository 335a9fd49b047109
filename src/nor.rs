//! The main flash driver: probing, register I/O, and the read/program/erase
//! paths built on top of a [`Transport`].

use crate::addr::{self, BankRouter, DualTopology};
use crate::error::Error;
use crate::id::Identification;
use crate::opcodes;
use crate::params::{self, FlashFlags};
use crate::protection;
use crate::readiness::{Clock, Deadline, NoClock, ERASE_TIMEOUT_MS, PROG_TIMEOUT_MS};
use crate::scan::{self, FlashConfig, ScanError};
use crate::status::{ConfigRegister, Evcr, FlagStatus, Status};
use crate::transport::{DataPhase, Transport};
use crate::vendor::Vendor;
use crate::{BlockDevice, Read};

/// Driver for 25-series-compatible SPI NOR flash chips.
///
/// Generic over the [`Transport`] so the same probing and read/program/erase
/// logic runs over a plain single-lane SPI peripheral, a QSPI controller
/// with quad support and an XIP window, or a stacked/parallel dual-die
/// package.
pub struct Flash<T: Transport, C: Clock = NoClock> {
    transport: T,
    clock: C,
    config: FlashConfig,
    bank: Option<BankRouter>,
    dual: DualTopology,
    die_size: u32,
}

impl<T: Transport> Flash<T, NoClock> {
    /// Probes the chip over `transport` and configures a driver for it, with
    /// no bounded wait on readiness (matches the historical unbounded
    /// busy-loop).
    pub fn init(transport: T) -> Result<Self, Error<T::BusError, T::Pin>> {
        Self::init_with_clock(transport, NoClock, DualTopology::Single)
    }
}

impl<T: Transport, C: Clock> Flash<T, C> {
    /// Probes the chip and configures a driver for it, bounding readiness
    /// waits against `clock`.
    pub fn init_with_clock(
        mut transport: T,
        clock: C,
        dual: DualTopology,
    ) -> Result<Self, Error<T::BusError, T::Pin>> {
        let ident = read_jedec_id(&mut transport)?;
        info!("Flash::init: jedec id = {:?}", ident);
        let params = params::lookup(ident.all_bytes()).ok_or_else(|| {
            error!("Flash::init: no identity table entry for {:?}", ident);
            Error::UnknownDevice
        })?;

        let config = scan::configure(params, &ident, transport.read_modes(), transport.write_modes(), dual)
            .map_err(|e| match e {
                ScanError::UnknownDevice => Error::UnknownDevice,
                ScanError::QuadUnsupported => {
                    error!("Flash::init: {} needs quad mode but vendor has no handshake", params.name);
                    Error::QuadUnsupported
                }
            })?;
        info!(
            "Flash::init: {} ({} bytes, page={}, erase={})",
            config.name, config.total_size, config.page_size, config.erase_size
        );

        // `config.total_size` is the logical, post-routing total (see
        // `FlashConfig`'s doc comment); BAR banking and protection both
        // operate per physical die, so unshift it back for `Stacked`/
        // `Parallel`, both of which double the logical total over a single
        // die's own capacity.
        let die_size = match dual {
            DualTopology::Single => config.total_size,
            DualTopology::Stacked | DualTopology::Parallel => config.total_size / 2,
        };

        let mut this = Self {
            transport,
            clock,
            config,
            bank: None,
            dual,
            die_size,
        };

        if scan::needs_power_on_unprotect(ident.mfr_code()) {
            this.write_enable()?;
            this.write_status(Status::empty())?;
        }

        if addr::needs_bar(die_size, config.addr_width) {
            warn!(
                "Flash::init: {} is larger than one 3-byte addressing window, enabling BAR banking",
                config.name
            );
            this.bank = Some(BankRouter::new(config.vendor));
        }

        if config.needs_quad_enable {
            this.enable_quad_mode()?;
        }

        Ok(this)
    }

    /// Releases the underlying transport.
    pub fn free(self) -> T {
        self.transport
    }

    /// The resolved configuration (geometry, opcodes, flags) for this chip.
    pub fn config(&self) -> &FlashConfig {
        &self.config
    }

    /// The MTD façade summary (`name`, `writesize`, `writebufsize`,
    /// `erasesize`, `size`, capability flags) an external shell would
    /// display for `list`/`info`/`probe`.
    pub fn facade(&self) -> crate::facade::Facade {
        crate::facade::Facade::from_config(&self.config, self.total_size())
    }

    /// Reads the JEDEC manufacturer/device identification.
    pub fn read_jedec_id(&mut self) -> Result<Identification, Error<T::BusError, T::Pin>> {
        read_jedec_id(&mut self.transport)
    }

    /// Reads the 8-bit status register.
    pub fn read_status(&mut self) -> Result<Status, Error<T::BusError, T::Pin>> {
        let mut buf = [0u8; 1];
        self.transport
            .command(opcodes::RDSR, None, 0, DataPhase::Read(&mut buf))?;
        Ok(Status::from_bits_truncate(buf[0]))
    }

    fn write_status(&mut self, status: Status) -> Result<(), Error<T::BusError, T::Pin>> {
        self.transport
            .command(opcodes::WRSR, None, 0, DataPhase::Write(&[status.bits()]))
    }

    fn read_config_register(&mut self) -> Result<ConfigRegister, Error<T::BusError, T::Pin>> {
        let mut buf = [0u8; 1];
        self.transport
            .command(opcodes::RDCR, None, 0, DataPhase::Read(&mut buf))?;
        Ok(ConfigRegister::from_bits_truncate(buf[0]))
    }

    fn write_enable(&mut self) -> Result<(), Error<T::BusError, T::Pin>> {
        self.transport.command(opcodes::WREN, None, 0, DataPhase::None)
    }

    fn read_evcr(&mut self) -> Result<Evcr, Error<T::BusError, T::Pin>> {
        let mut buf = [0u8; 1];
        self.transport
            .command(opcodes::RD_EVCR, None, 0, DataPhase::Read(&mut buf))?;
        Ok(Evcr::from_bits_truncate(buf[0]))
    }

    fn write_evcr(&mut self, evcr: Evcr) -> Result<(), Error<T::BusError, T::Pin>> {
        self.transport
            .command(opcodes::WD_EVCR, None, 0, DataPhase::Write(&[evcr.bits()]))
    }

    /// Blocks until `WIP` clears and, on parts that use the flag status
    /// register, `FSR` also reports ready, bounded by `timeout_ms` when this
    /// driver was built with a real [`Clock`].
    fn wait_ready(&mut self, timeout_ms: u32) -> Result<(), Error<T::BusError, T::Pin>> {
        let deadline = Deadline::new(&self.clock, timeout_ms);
        loop {
            let not_busy = !self.read_status()?.contains(Status::WIP)
                && if self.config.flags.contains(FlashFlags::USE_FSR) {
                    let mut buf = [0u8; 1];
                    self.transport
                        .command(opcodes::RDFSR, None, 0, DataPhase::Read(&mut buf))?;
                    FlagStatus::from_bits_truncate(buf[0]).contains(FlagStatus::READY)
                } else {
                    true
                };
            if not_busy {
                return Ok(());
            }

            if deadline.expired(&self.clock) {
                error!("wait_ready: timed out after {} ms", timeout_ms);
                return Err(Error::Timeout);
            }
        }
    }

    fn enable_quad_mode(&mut self) -> Result<(), Error<T::BusError, T::Pin>> {
        match self.config.vendor {
            Vendor::Macronix => {
                let status = self.read_status()?;
                if status.contains(Status::QUAD_EN_MX) {
                    return Ok(());
                }
                self.write_enable()?;
                self.write_status(status | Status::QUAD_EN_MX)?;
                self.wait_ready(PROG_TIMEOUT_MS)?;
                if !self.read_status()?.contains(Status::QUAD_EN_MX) {
                    error!("enable_quad_mode: Macronix QUAD_EN bit did not stick");
                    return Err(Error::QuadUnsupported);
                }
                Ok(())
            }
            Vendor::Spansion | Vendor::Winbond => {
                let cr = self.read_config_register()?;
                if cr.contains(ConfigRegister::QUAD_EN_SPAN) {
                    return Ok(());
                }
                self.write_enable()?;
                let status = self.read_status()?;
                self.transport.command(
                    opcodes::WRSR,
                    None,
                    0,
                    DataPhase::Write(&[status.bits(), (cr | ConfigRegister::QUAD_EN_SPAN).bits()]),
                )?;
                self.wait_ready(PROG_TIMEOUT_MS)?;
                if !self.read_config_register()?.contains(ConfigRegister::QUAD_EN_SPAN) {
                    error!("enable_quad_mode: Spansion/Winbond QUAD_EN bit did not stick");
                    return Err(Error::QuadUnsupported);
                }
                Ok(())
            }
            Vendor::Micron => {
                let evcr = self.read_evcr()?;
                if !evcr.contains(Evcr::QUAD_EN_MICRON) {
                    return Ok(());
                }
                self.write_enable()?;
                self.write_evcr(evcr - Evcr::QUAD_EN_MICRON)?;
                self.wait_ready(PROG_TIMEOUT_MS)?;
                if self.read_evcr()?.contains(Evcr::QUAD_EN_MICRON) {
                    error!("enable_quad_mode: Micron EVCR QUAD_EN bit did not clear");
                    return Err(Error::QuadUnsupported);
                }
                Ok(())
            }
            _ => Err(Error::QuadUnsupported),
        }
    }

    /// Routes a linear address through the dual-die topology (if any) and
    /// selects the resulting die.
    fn route(&mut self, addr: u32) -> Result<u32, Error<T::BusError, T::Pin>> {
        let routed = addr::route(self.dual, self.die_size, addr);
        self.transport.select_die(routed.upper)?;
        Ok(routed.die_offset)
    }

    /// Encodes `die_offset` into a 3- or 4-byte address field, bumping the
    /// bank register first if needed.
    fn encode(&mut self, die_offset: u32) -> Result<[u8; 4], Error<T::BusError, T::Pin>> {
        let mut buf = [0u8; 4];
        if let Some(bank) = &mut self.bank {
            let (target_bank, offset_in_bank) = bank.split(die_offset);
            if let Some((opcode, value)) = bank.select(target_bank) {
                self.transport
                    .command(opcode, None, 0, DataPhase::Write(&[value]))?;
            }
            addr::encode_address(offset_in_bank, 3, &mut buf);
        } else {
            addr::encode_address(die_offset, self.config.addr_width, &mut buf);
        }
        Ok(buf)
    }

    /// Total device size across all dies.
    pub fn total_size(&self) -> u32 {
        self.config.total_size
    }

    /// Whether `[addr, addr+len)` falls inside the software-write-protected
    /// region of the current die.
    pub fn is_locked(&mut self, addr: u32, len: u32) -> Result<bool, Error<T::BusError, T::Pin>> {
        let status = self.read_status()?;
        Ok(protection::is_locked(status, self.die_size, addr, len))
    }

    /// Protects `[ofs, ofs+len)` against program and erase. The range must
    /// extend to the end of the current die; it is rounded up to the
    /// nearest representable `BP` boundary and rejected if it would reduce
    /// protection already in place.
    pub fn lock(&mut self, ofs: u32, len: u32) -> Result<(), Error<T::BusError, T::Pin>> {
        let status = self.read_status()?;
        let new_status =
            protection::lock(status, self.die_size, ofs, len).ok_or(Error::InvalidArgument)?;
        self.write_enable()?;
        self.write_status(new_status)
    }

    /// Clears software write protection over `[ofs, ofs+len)` on the
    /// current die, rejected if it would extend the locked region rather
    /// than shrink it.
    pub fn unlock(&mut self, ofs: u32, len: u32) -> Result<(), Error<T::BusError, T::Pin>> {
        let status = self.read_status()?;
        let new_status =
            protection::unlock(status, self.die_size, ofs, len).ok_or(Error::InvalidArgument)?;
        self.write_enable()?;
        self.write_status(new_status)
    }
}

fn read_jedec_id<T: Transport>(transport: &mut T) -> Result<Identification, Error<T::BusError, T::Pin>> {
    let mut buf = [0u8; 12];
    transport.command(opcodes::RDID, None, 0, DataPhase::Read(&mut buf))?;
    Ok(Identification::from_jedec_id(&buf))
}

impl<T: Transport, C: Clock> Read<u32, T::BusError, T::Pin> for Flash<T, C> {
    /// Reads flash contents into `buf`, starting at `addr`.
    ///
    /// Transparently steers a dual-die topology, hops across Bank Address
    /// Register boundaries, and prefers the transport's memory-mapped
    /// window when the whole read fits inside it.
    fn read(&mut self, addr: u32, buf: &mut [u8]) -> Result<(), Error<T::BusError, T::Pin>> {
        if buf.is_empty() {
            return Ok(());
        }
        if addr.checked_add(buf.len() as u32).is_none() || addr as u64 + buf.len() as u64 > self.total_size() as u64
        {
            return Err(Error::InvalidArgument);
        }

        if let Some(map_size) = self.transport.memory_map() {
            if map_size as u64 >= self.total_size() as u64 {
                return self.transport.read_mmap(addr as usize, buf);
            }
        }

        let mut offset = 0usize;
        while offset < buf.len() {
            let die_offset = self.route(addr + offset as u32)?;
            let remaining_in_bank = match &self.bank {
                Some(bank) => {
                    let (_, offset_in_bank) = bank.split(die_offset);
                    (addr::BANK_SIZE - offset_in_bank) as usize
                }
                None => buf.len() - offset,
            };
            let chunk_len = core::cmp::min(buf.len() - offset, remaining_in_bank);

            let addr_bytes = self.encode(die_offset)?;
            let addr_len = self.config.addr_width as usize;
            self.transport.command(
                self.config.read_opcode,
                Some(&addr_bytes[..addr_len]),
                (self.config.read_dummy / 8) as usize,
                DataPhase::Read(&mut buf[offset..offset + chunk_len]),
            )?;
            offset += chunk_len;
        }
        Ok(())
    }
}

impl<T: Transport, C: Clock> BlockDevice<u32, T::BusError, T::Pin> for Flash<T, C> {
    /// Erases `amount` consecutive sectors starting at `addr`, which must be
    /// sector-aligned.
    fn erase_sectors(&mut self, addr: u32, amount: usize) -> Result<(), Error<T::BusError, T::Pin>> {
        if addr % self.config.erase_size != 0 {
            return Err(Error::InvalidArgument);
        }
        if self.config.flags.contains(FlashFlags::NO_ERASE) {
            return Err(Error::ReadOnly);
        }
        for i in 0..amount {
            let sector_addr = addr + (i as u32) * self.config.erase_size;
            if self.is_locked(sector_addr, self.config.erase_size)? {
                return Err(Error::Protected);
            }

            let die_offset = self.route(sector_addr)?;
            let addr_bytes = self.encode(die_offset)?;
            let addr_len = self.config.addr_width as usize;

            self.write_enable()?;
            self.transport
                .command(self.config.erase_opcode, Some(&addr_bytes[..addr_len]), 0, DataPhase::None)?;
            self.wait_ready(ERASE_TIMEOUT_MS)?;
        }
        Ok(())
    }

    /// Erases the whole chip (every die, for dual topologies).
    fn erase_all(&mut self) -> Result<(), Error<T::BusError, T::Pin>> {
        if self.config.flags.contains(FlashFlags::NO_ERASE) {
            return Err(Error::ReadOnly);
        }
        // Parallel drives both dies with a single simultaneous command (see
        // `addr::DualTopology::Parallel`); only stacked dies are switched
        // between and erased one at a time.
        let dies: &[bool] = match self.dual {
            DualTopology::Single | DualTopology::Parallel => &[false],
            DualTopology::Stacked => &[false, true],
        };
        for &upper in dies {
            self.transport.select_die(upper)?;
            self.write_enable()?;
            self.transport
                .command(opcodes::CHIP_ERASE, None, 0, DataPhase::None)?;
            self.wait_ready(ERASE_TIMEOUT_MS)?;
        }
        Ok(())
    }

    /// Programs `data` starting at `addr`, splitting at page boundaries (and
    /// any transport-imposed `max_write_size`), assuming the target range
    /// has already been erased.
    fn write_bytes(&mut self, addr: u32, data: &mut [u8]) -> Result<(), Error<T::BusError, T::Pin>> {
        if data.is_empty() {
            return Ok(());
        }
        if self.is_locked(addr, data.len() as u32)? {
            return Err(Error::Protected);
        }

        if self.config.flags.contains(FlashFlags::SST_WRITE) {
            return self.sst_write(addr, data);
        }

        let page_size = self.config.page_size as u32;
        let mut offset = 0u32;
        while (offset as usize) < data.len() {
            let page_addr = addr + offset;
            let space_in_page = page_size - (page_addr % page_size);
            let mut chunk_len = core::cmp::min(space_in_page, data.len() as u32 - offset);
            if let Some(max) = self.transport.max_write_size() {
                chunk_len = core::cmp::min(chunk_len, max as u32);
            }

            let die_offset = self.route(page_addr)?;
            let addr_bytes = self.encode(die_offset)?;
            let addr_len = self.config.addr_width as usize;

            self.write_enable()?;
            self.transport.command(
                self.config.program_opcode,
                Some(&addr_bytes[..addr_len]),
                0,
                DataPhase::Write(&data[offset as usize..(offset + chunk_len) as usize]),
            )?;
            self.wait_ready(PROG_TIMEOUT_MS)?;
            offset += chunk_len;
        }
        Ok(())
    }
}

impl<T: Transport, C: Clock> Flash<T, C> {
    /// SST byte or auto-address-increment word program, depending on what
    /// the transport's [`crate::params::WriteModes`] advertise.
    fn sst_write(&mut self, addr: u32, data: &mut [u8]) -> Result<(), Error<T::BusError, T::Pin>> {
        use crate::params::WriteModes;

        if self.transport.write_modes().contains(WriteModes::SST_WORD) && data.len() >= 2 {
            let mut offset = 0usize;
            if addr % 2 != 0 {
                self.sst_byte_program(addr, data[0])?;
                offset = 1;
            }
            self.write_enable()?;
            let mut first = true;
            while offset + 1 < data.len() {
                let word_addr = addr + offset as u32;
                let die_offset = self.route(word_addr)?;
                let addr_bytes = self.encode(die_offset)?;
                let addr_len = self.config.addr_width as usize;
                if first {
                    self.transport.command(
                        opcodes::AAI_WP,
                        Some(&addr_bytes[..addr_len]),
                        0,
                        DataPhase::Write(&data[offset..offset + 2]),
                    )?;
                    first = false;
                } else {
                    self.transport
                        .command(opcodes::AAI_WP, None, 0, DataPhase::Write(&data[offset..offset + 2]))?;
                }
                self.wait_ready(PROG_TIMEOUT_MS)?;
                offset += 2;
            }
            self.transport.command(opcodes::WRDI, None, 0, DataPhase::None)?;
            if offset < data.len() {
                self.sst_byte_program(addr + offset as u32, data[offset])?;
            }
            Ok(())
        } else {
            for (i, &byte) in data.iter().enumerate() {
                self.sst_byte_program(addr + i as u32, byte)?;
            }
            Ok(())
        }
    }

    fn sst_byte_program(&mut self, addr: u32, byte: u8) -> Result<(), Error<T::BusError, T::Pin>> {
        let die_offset = self.route(addr)?;
        let addr_bytes = self.encode(die_offset)?;
        let addr_len = self.config.addr_width as usize;
        self.write_enable()?;
        self.transport
            .command(opcodes::BP, Some(&addr_bytes[..addr_len]), 0, DataPhase::Write(&[byte]))?;
        self.wait_ready(PROG_TIMEOUT_MS)?;
        Ok(())
    }
}

/// A [`Transport`] double that records every issued command instead of
/// driving a bus, so the chunking and sequencing decisions in the engines
/// above can be checked without any actual SPI hardware.
#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{ReadModes, WriteModes};
    use core::cell::Cell;

    #[derive(Debug)]
    struct MockPin;

    impl embedded_hal::digital::v2::OutputPin for MockPin {
        type Error = ();
        fn set_low(&mut self) -> Result<(), ()> {
            Ok(())
        }
        fn set_high(&mut self) -> Result<(), ()> {
            Ok(())
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Issued {
        opcode: u8,
        addr: Option<Vec<u8>>,
        write: Option<Vec<u8>>,
        read_len: usize,
    }

    struct MockTransport {
        log: Vec<Issued>,
        /// Status register byte handed back for every `RDSR`; tests set
        /// `WIP`/`BP` bits on it directly to drive readiness or protection.
        status: Cell<u8>,
        read_modes: ReadModes,
        write_modes: WriteModes,
    }

    impl MockTransport {
        fn new() -> Self {
            Self {
                log: Vec::new(),
                status: Cell::new(0),
                read_modes: ReadModes::BASE,
                write_modes: WriteModes::PP,
            }
        }
    }

    impl Transport for MockTransport {
        type BusError = ();
        type Pin = MockPin;

        fn command(
            &mut self,
            opcode: u8,
            addr: Option<&[u8]>,
            _dummy_len: usize,
            data: DataPhase<'_>,
        ) -> Result<(), Error<(), MockPin>> {
            let (write, read_len) = match data {
                DataPhase::None => (None, 0),
                DataPhase::Read(buf) => {
                    if opcode == opcodes::RDFSR {
                        buf[0] = 0x80;
                    } else if opcode == opcodes::RDSR {
                        buf[0] = self.status.get();
                    } else {
                        for b in buf.iter_mut() {
                            *b = 0;
                        }
                    }
                    (None, buf.len())
                }
                DataPhase::Write(buf) => (Some(buf.to_vec()), 0),
            };
            self.log.push(Issued {
                opcode,
                addr: addr.map(|a| a.to_vec()),
                write,
                read_len,
            });
            Ok(())
        }

        fn read_modes(&self) -> ReadModes {
            self.read_modes
        }

        fn write_modes(&self) -> WriteModes {
            self.write_modes
        }
    }

    /// A [`Clock`] whose reading advances by a fixed step on every call, so
    /// a `wait_ready` loop against a chip that never reports ready can be
    /// driven past its deadline deterministically.
    struct AutoAdvanceClock {
        step: u32,
        current: Cell<u32>,
    }

    impl Clock for AutoAdvanceClock {
        fn now_ms(&self) -> u32 {
            let v = self.current.get();
            self.current.set(v.wrapping_add(self.step));
            v
        }
    }

    fn base_config() -> FlashConfig {
        FlashConfig {
            name: "test-part",
            vendor: Vendor::Winbond,
            page_size: 256,
            sector_size: 64 * 1024,
            total_size: 8 * 1024 * 1024,
            erase_opcode: opcodes::SE,
            erase_size: 64 * 1024,
            read_opcode: opcodes::READ,
            read_dummy: 0,
            program_opcode: opcodes::PP,
            addr_width: 3,
            needs_quad_enable: false,
            flags: FlashFlags::empty(),
        }
    }

    fn flash_with(transport: MockTransport, config: FlashConfig) -> Flash<MockTransport, NoClock> {
        let die_size = config.total_size;
        Flash {
            transport,
            clock: NoClock,
            config,
            bank: None,
            dual: DualTopology::Single,
            die_size,
        }
    }

    #[test]
    fn program_splits_at_page_boundary() {
        let mut flash = flash_with(MockTransport::new(), base_config());
        let mut data = [0xAAu8; 400];
        flash.write_bytes(0x102, &mut data).unwrap();

        let programs: Vec<_> = flash.transport.log.iter().filter(|c| c.opcode == opcodes::PP).collect();
        assert_eq!(programs.len(), 2);
        assert_eq!(programs[0].addr.as_deref(), Some(&[0x00, 0x01, 0x02][..]));
        assert_eq!(programs[0].write.as_ref().unwrap().len(), 254);
        assert_eq!(programs[1].addr.as_deref(), Some(&[0x00, 0x02, 0x00][..]));
        assert_eq!(programs[1].write.as_ref().unwrap().len(), 146);
    }

    #[test]
    fn erase_issues_one_opcode_per_sector() {
        let mut config = base_config();
        config.erase_opcode = opcodes::BE_4K;
        config.erase_size = 0x1000;
        let mut flash = flash_with(MockTransport::new(), config);

        flash.erase_sectors(0x10000, 2).unwrap();

        let erases: Vec<_> = flash.transport.log.iter().filter(|c| c.opcode == opcodes::BE_4K).collect();
        assert_eq!(erases.len(), 2);
        assert_eq!(erases[0].addr.as_deref(), Some(&[0x01, 0x00, 0x00][..]));
        assert_eq!(erases[1].addr.as_deref(), Some(&[0x01, 0x10, 0x00][..]));
    }

    #[test]
    fn erase_rejects_misaligned_offset() {
        let mut flash = flash_with(MockTransport::new(), base_config());
        assert!(matches!(flash.erase_sectors(0x100, 1), Err(Error::InvalidArgument)));
    }

    #[test]
    fn erase_rejects_no_erase_parts_as_read_only() {
        let mut config = base_config();
        config.flags |= FlashFlags::NO_ERASE;
        let mut flash = flash_with(MockTransport::new(), config);
        assert!(matches!(flash.erase_sectors(0, 1), Err(Error::ReadOnly)));
        assert!(matches!(flash.erase_all(), Err(Error::ReadOnly)));
    }

    #[test]
    fn bar_crossing_read_switches_bank_between_chunks() {
        let mut config = base_config();
        config.total_size = 32 * 1024 * 1024;
        let mut flash = flash_with(MockTransport::new(), config);
        flash.bank = Some(BankRouter::new(Vendor::Winbond));

        let mut buf = [0u8; 0x20];
        flash.read(0x00FF_FFF0, &mut buf).unwrap();

        let reads: Vec<_> = flash.transport.log.iter().filter(|c| c.opcode == opcodes::READ).collect();
        assert_eq!(reads.len(), 2);
        assert_eq!(reads[0].read_len, 0x10);
        assert_eq!(reads[0].addr.as_deref(), Some(&[0xFF, 0xFF, 0xF0][..]));
        assert_eq!(reads[1].read_len, 0x10);
        assert_eq!(reads[1].addr.as_deref(), Some(&[0x00, 0x00, 0x00][..]));

        let bar_writes: Vec<_> = flash.transport.log.iter().filter(|c| c.opcode == opcodes::WREAR).collect();
        assert_eq!(bar_writes.len(), 1);
        assert_eq!(bar_writes[0].write.as_deref(), Some(&[1u8][..]));
    }

    #[test]
    fn sst_word_program_with_odd_offset_and_trailing_byte() {
        let mut config = base_config();
        config.flags = FlashFlags::SST_WRITE;
        let mut transport = MockTransport::new();
        transport.write_modes = WriteModes::SST_WORD;
        let mut flash = flash_with(transport, config);

        // Odd start address, four bytes: a leading single-byte program, one
        // auto-increment word, then a trailing single-byte program.
        let mut data = [0x11u8, 0x22, 0x33, 0x44];
        flash.write_bytes(1, &mut data).unwrap();

        let bp: Vec<_> = flash.transport.log.iter().filter(|c| c.opcode == opcodes::BP).collect();
        assert_eq!(bp.len(), 2);
        assert_eq!(bp[0].addr.as_deref(), Some(&[0x00, 0x00, 0x01][..]));
        assert_eq!(bp[0].write.as_deref(), Some(&[0x11u8][..]));
        assert_eq!(bp[1].addr.as_deref(), Some(&[0x00, 0x00, 0x04][..]));
        assert_eq!(bp[1].write.as_deref(), Some(&[0x44u8][..]));

        let words: Vec<_> = flash.transport.log.iter().filter(|c| c.opcode == opcodes::AAI_WP).collect();
        assert_eq!(words.len(), 1);
        assert_eq!(words[0].addr.as_deref(), Some(&[0x00, 0x00, 0x02][..]));
        assert_eq!(words[0].write.as_deref(), Some(&[0x22u8, 0x33][..]));

        // write_disable must close the AAI sequence before the trailing
        // byte is programmed with a plain BP.
        let wrdi_pos = flash.transport.log.iter().position(|c| c.opcode == opcodes::WRDI).unwrap();
        let trailing_bp_pos = flash.transport.log.iter().rposition(|c| c.opcode == opcodes::BP).unwrap();
        assert!(wrdi_pos < trailing_bp_pos);
    }

    #[test]
    fn wait_ready_times_out_when_chip_stays_busy() {
        let mut transport = MockTransport::new();
        transport.status.set(Status::WIP.bits());
        let config = base_config();
        let die_size = config.total_size;
        let mut flash = Flash {
            transport,
            clock: AutoAdvanceClock {
                step: PROG_TIMEOUT_MS + 1,
                current: Cell::new(0),
            },
            config,
            bank: None,
            dual: DualTopology::Single,
            die_size,
        };

        let mut data = [0xAAu8; 4];
        assert!(matches!(flash.write_bytes(0, &mut data), Err(Error::Timeout)));
    }

    #[test]
    fn locked_range_rejects_program() {
        let transport = MockTransport::new();
        transport.status.set(Status::empty().with_bp_field(7).bits());
        let mut flash = flash_with(transport, base_config());

        let mut data = [0xAAu8; 4];
        assert!(matches!(flash.write_bytes(0, &mut data), Err(Error::Protected)));
    }

    #[test]
    fn locked_range_rejects_erase() {
        let transport = MockTransport::new();
        transport.status.set(Status::empty().with_bp_field(7).bits());
        let mut flash = flash_with(transport, base_config());

        assert!(matches!(flash.erase_sectors(0, 1), Err(Error::Protected)));
    }

    #[test]
    fn memory_mapped_read_bypasses_the_command_path() {
        struct MmapTransport {
            inner: MockTransport,
            map: Vec<u8>,
        }

        impl Transport for MmapTransport {
            type BusError = ();
            type Pin = MockPin;

            fn command(
                &mut self,
                opcode: u8,
                addr: Option<&[u8]>,
                dummy_len: usize,
                data: DataPhase<'_>,
            ) -> Result<(), Error<(), MockPin>> {
                self.inner.command(opcode, addr, dummy_len, data)
            }

            fn memory_map(&self) -> Option<usize> {
                Some(self.map.len())
            }

            fn read_mmap(&mut self, offset: usize, buf: &mut [u8]) -> Result<(), Error<(), MockPin>> {
                buf.copy_from_slice(&self.map[offset..offset + buf.len()]);
                Ok(())
            }
        }

        let mut config = base_config();
        config.total_size = 16;
        let map: Vec<u8> = (0..16).collect();
        let transport = MmapTransport {
            inner: MockTransport::new(),
            map,
        };
        let mut flash = Flash {
            transport,
            clock: NoClock,
            config,
            bank: None,
            dual: DualTopology::Single,
            die_size: 16,
        };

        let mut buf = [0u8; 4];
        flash.read(4, &mut buf).unwrap();
        assert_eq!(buf, [4, 5, 6, 7]);
        assert!(flash.transport.inner.log.is_empty());
    }
}
