//! JEDEC manufacturer codes and the vendor-specific behaviour dispatched on
//! them (quad-enable handshake, BAR opcode pair).

/// JEDEC manufacturer ID, the first byte returned by `RDID`.
///
/// Sometimes these match CFI IDs, sometimes they don't.
pub mod mfr {
    pub const ATMEL: u8 = 0x1f;
    pub const MACRONIX: u8 = 0xc2;
    /// ST Micro <-> Micron: the two historically share this code.
    pub const MICRON: u8 = 0x20;
    pub const SPANSION: u8 = 0x01;
    pub const SST: u8 = 0xbf;
    pub const WINBOND: u8 = 0xef;
}

/// Manufacturers whose flashes need vendor-specific handling somewhere in
/// scan, quad-enable, or BAR dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vendor {
    Atmel,
    Macronix,
    Micron,
    Spansion,
    Sst,
    Winbond,
    /// Every other manufacturer code; handled generically (standard
    /// `WREAR`/`RDEAR` BAR opcodes, no quad-enable handshake available).
    Other(u8),
}

impl Vendor {
    pub fn from_mfr_code(code: u8) -> Vendor {
        match code {
            mfr::ATMEL => Vendor::Atmel,
            mfr::MACRONIX => Vendor::Macronix,
            mfr::MICRON => Vendor::Micron,
            mfr::SPANSION => Vendor::Spansion,
            mfr::SST => Vendor::Sst,
            mfr::WINBOND => Vendor::Winbond,
            other => Vendor::Other(other),
        }
    }

    /// Spansion uses `BRWR`/`BRRD` for the bank register; everyone else uses
    /// `WREAR`/`RDEAR` for the extended address register. Same opcodes,
    /// different register name depending on vendor convention.
    pub fn bar_opcodes(self) -> (u8, u8) {
        match self {
            Vendor::Spansion => (crate::opcodes::BRWR, crate::opcodes::BRRD),
            _ => (crate::opcodes::WREAR, crate::opcodes::RDEAR),
        }
    }
}
