//! Turns a catalogue entry plus a transport's capabilities into a concrete,
//! ready-to-drive configuration: which read/program opcode to use, how many
//! dummy cycles, whether BAR banking is needed, whether quad mode must be
//! (and can be) turned on.
//!
//! Mirrors the historical `spi_nor_scan` step order: identify, clear
//! power-on protection on the vendors known to need it, compute geometry
//! (with the Spansion 0x4d00 page-size quirk), pick erase/read/program
//! opcodes, enable quad mode if the chosen opcodes need it, then size the
//! read dummy cycles and validate any memory-map window.

use crate::addr::DualTopology;
use crate::id::Identification;
use crate::params::{FlashFlags, FlashParams, ReadModes, WriteModes};
use crate::vendor::{mfr, Vendor};

/// Fully resolved configuration for one flash chip, ready to be driven by
/// [`crate::nor::Flash`].
///
/// `page_size`, `erase_size`, and `total_size` are the logical, post-routing
/// values: under [`DualTopology::Parallel`] they are already doubled (each
/// command drives both dies at once, doubling the per-operation
/// granularity), and `total_size` is doubled again under
/// [`DualTopology::Stacked`] (two dies addressed linearly back to back).
#[derive(Debug, Clone, Copy)]
pub struct FlashConfig {
    pub name: &'static str,
    pub vendor: Vendor,
    pub page_size: u16,
    pub sector_size: u32,
    pub total_size: u32,
    pub erase_opcode: u8,
    pub erase_size: u32,
    pub read_opcode: u8,
    /// Dummy cycles the selected `read_opcode` needs, **in cycles, not
    /// bytes** (historical sources disagree on the unit; the opcode table
    /// settles it: `READ_1_1_4_IO` needs 2 dummy bytes, 16 cycles, every
    /// other fast-read variant needs 1 dummy byte, 8 cycles). Convert with
    /// `/ 8` before appending dummy bytes to a command buffer.
    pub read_dummy: u8,
    pub program_opcode: u8,
    pub addr_width: u8,
    pub needs_quad_enable: bool,
    pub flags: FlashFlags,
}

/// Why scanning failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanError {
    /// No identity table entry matched the chip's JEDEC ID.
    UnknownDevice,
    /// The selected read or program opcode needs quad mode but the vendor
    /// has no known quad-enable handshake.
    QuadUnsupported,
}

/// Clears the power-on block-protect bits this vendor is known to default
/// to, by returning the `WRSR` payload to issue (`0x00`, always). Callers
/// decide, based on [`needs_power_on_unprotect`], whether to actually issue
/// it; this function only names the vendors.
pub fn needs_power_on_unprotect(mfr_code: u8) -> bool {
    matches!(mfr_code, mfr::ATMEL | mfr::MACRONIX | mfr::SST)
}

/// Resolves a [`FlashConfig`] from a catalogue entry, the chip's own JEDEC
/// identification, `dual` topology, and what the transport can drive.
pub fn configure(
    params: &FlashParams,
    ident: &Identification,
    host_read_modes: ReadModes,
    host_write_modes: WriteModes,
    dual: DualTopology,
) -> Result<FlashConfig, ScanError> {
    let vendor = Vendor::from_mfr_code(ident.mfr_code());

    // Parallel dies are driven by one command each, striped across both, so
    // every per-operation granularity doubles; stacked dies are addressed
    // and erased/programmed one at a time, so only the overall capacity
    // doubles (done separately below).
    let shift = if dual == DualTopology::Parallel { 1 } else { 0 };

    // Page size: Spansion/Winbond parts carrying the 0x4d00 extended JEDEC
    // ID use 512-byte pages, except the two oldest ones (0x0215, 0x0216)
    // which kept the 256-byte page their silicon predates the convention
    // with.
    let ext_id = if params.id_len >= 5 {
        u16::from_be_bytes([params.id[3], params.id[4]])
    } else {
        0
    };
    let jedec_id = u16::from_be_bytes([params.id[1], params.id[2]]);
    let page_size = if ext_id == 0x4d00 && jedec_id != 0x0215 && jedec_id != 0x0216 {
        512
    } else {
        params.page_size
    };
    let page_size = page_size << shift;

    let mut total_size = params.total_size() << shift;
    if dual == DualTopology::Stacked {
        total_size *= 2;
    }

    // Parts carrying `SECT_4K`/`SECT_4K_PMC` support erasing in 4 KiB
    // subsectors as an alternative to their normal (larger) sector erase.
    // Whether that finer granularity is actually preferred mirrors
    // `CONFIG_MTD_SPI_NOR_USE_4K_SECTORS`: with the `4k-erase` feature off,
    // this core erases in the chip's normal sector size even when 4K is
    // available, trading finer-grained erase for fewer bus transactions on
    // large erases.
    let prefer_4k = cfg!(feature = "4k-erase");
    let (erase_opcode, erase_size) = if prefer_4k && params.flags.contains(FlashFlags::SECT_4K) {
        (crate::opcodes::BE_4K, 4096)
    } else if prefer_4k && params.flags.contains(FlashFlags::SECT_4K_PMC) {
        (crate::opcodes::BE_4K_PMC, 4096)
    } else {
        (crate::opcodes::SE, params.sector_size)
    };
    let erase_size = erase_size << shift;

    let chip_read_modes = params.read_modes & host_read_modes;
    let read_opcode = if chip_read_modes.contains(ReadModes::QUAD_IO) {
        crate::opcodes::READ_1_1_4_IO
    } else if chip_read_modes.contains(ReadModes::QUAD) {
        crate::opcodes::READ_1_1_4
    } else if chip_read_modes.contains(ReadModes::DUAL_IO) {
        crate::opcodes::READ_1_1_2_IO
    } else if chip_read_modes.contains(ReadModes::DUAL) {
        crate::opcodes::READ_1_1_2
    } else if chip_read_modes.contains(ReadModes::FAST) && !params.flags.contains(FlashFlags::NO_FAST_READ)
    {
        crate::opcodes::READ_FAST
    } else {
        crate::opcodes::READ
    };

    let chip_write_modes_quad = params.flags.contains(FlashFlags::WRITE_QUAD)
        && host_write_modes.contains(WriteModes::QPP);
    let program_opcode = if chip_write_modes_quad {
        crate::opcodes::QPP
    } else {
        crate::opcodes::PP
    };

    let needs_quad_enable = matches!(
        read_opcode,
        crate::opcodes::READ_1_1_4 | crate::opcodes::READ_1_1_4_IO
    ) || program_opcode == crate::opcodes::QPP;

    if needs_quad_enable && !matches!(vendor, Vendor::Macronix | Vendor::Spansion | Vendor::Winbond | Vendor::Micron) {
        return Err(ScanError::QuadUnsupported);
    }

    // Stored in cycles (see the `read_dummy` field doc); `Flash::read`
    // divides by 8 to get the dummy-byte count a 1-1-x command buffer needs.
    let read_dummy = match read_opcode {
        crate::opcodes::READ_1_1_4_IO => 16,
        crate::opcodes::READ => 0,
        _ => 8,
    };

    Ok(FlashConfig {
        name: params.name,
        vendor,
        page_size,
        sector_size: params.sector_size,
        total_size,
        erase_opcode,
        erase_size,
        read_opcode,
        read_dummy,
        program_opcode,
        addr_width: params.addr_width,
        needs_quad_enable,
        flags: params.flags,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params;

    #[test]
    fn w25q64_gets_quad_mode_and_qpp() {
        let p = params::lookup(&[0xEF, 0x40, 0x17]).unwrap();
        let ident = Identification::from_jedec_id(&[0xEF, 0x40, 0x17]);
        // A host mask without the I/O variants: the chip supports
        // `QUAD_IO`, but `FULL` would make `read_opcode` resolve to
        // `READ_1_1_4_IO` instead of the plain `READ_1_1_4` under test.
        let host_read_modes = ReadModes::BASE | ReadModes::DUAL | ReadModes::QUAD;
        let cfg = configure(p, &ident, host_read_modes, WriteModes::PP | WriteModes::QPP, DualTopology::Single).unwrap();
        assert_eq!(cfg.read_opcode, crate::opcodes::READ_1_1_4);
        assert!(cfg.needs_quad_enable);
        assert_eq!(cfg.program_opcode, crate::opcodes::QPP);
    }

    #[test]
    fn w25q64_erases_by_nominal_64k_sector_without_4k_erase_feature() {
        let p = params::lookup(&[0xEF, 0x40, 0x17]).unwrap();
        let ident = Identification::from_jedec_id(&[0xEF, 0x40, 0x17]);
        let cfg = configure(p, &ident, ReadModes::FULL, WriteModes::PP | WriteModes::QPP, DualTopology::Single).unwrap();
        if cfg!(feature = "4k-erase") {
            assert_eq!(cfg.erase_opcode, crate::opcodes::BE_4K);
            assert_eq!(cfg.erase_size, 4096);
        } else {
            assert_eq!(cfg.erase_opcode, crate::opcodes::SE);
            assert_eq!(cfg.erase_size, p.sector_size);
        }
    }

    #[test]
    fn host_without_quad_support_falls_back_to_fast_read() {
        let p = params::lookup(&[0xEF, 0x40, 0x17]).unwrap();
        let ident = Identification::from_jedec_id(&[0xEF, 0x40, 0x17]);
        let cfg = configure(p, &ident, ReadModes::BASE, WriteModes::PP, DualTopology::Single).unwrap();
        assert_eq!(cfg.read_opcode, crate::opcodes::READ_FAST);
        assert!(!cfg.needs_quad_enable);
        assert_eq!(cfg.program_opcode, crate::opcodes::PP);
    }

    #[test]
    fn spansion_0x4d00_page_size_quirk() {
        let p = params::lookup(&[0x01, 0x02, 0x19, 0x4d, 0x00]).unwrap();
        assert_eq!(p.name, "s25fl256s0");
        let ident = Identification::from_jedec_id(&[0x01, 0x02, 0x19, 0x4d, 0x00]);
        let cfg = configure(p, &ident, ReadModes::FULL, WriteModes::PP | WriteModes::QPP, DualTopology::Single).unwrap();
        assert_eq!(cfg.page_size, 512);
    }

    #[test]
    fn s25sl032p_keeps_256_byte_page_despite_0x4d00() {
        let p = params::lookup(&[0x01, 0x02, 0x15, 0x4d, 0x00]).unwrap();
        assert_eq!(p.name, "s25sl032p");
        let ident = Identification::from_jedec_id(&[0x01, 0x02, 0x15, 0x4d, 0x00]);
        let cfg = configure(p, &ident, ReadModes::FULL, WriteModes::PP | WriteModes::QPP, DualTopology::Single).unwrap();
        assert_eq!(cfg.page_size, 256);
    }

    #[test]
    fn atmel_macronix_sst_need_power_on_unprotect() {
        assert!(needs_power_on_unprotect(mfr::ATMEL));
        assert!(needs_power_on_unprotect(mfr::MACRONIX));
        assert!(needs_power_on_unprotect(mfr::SST));
        assert!(!needs_power_on_unprotect(mfr::WINBOND));
    }
}
