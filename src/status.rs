//! Register bit layouts for the status, flag-status, configuration, and
//! Enhanced Volatile Configuration registers.

use bitflags::bitflags;

bitflags! {
    /// Status register (`RDSR`) bits.
    pub struct Status: u8 {
        /// Write in progress: an erase or program is ongoing.
        const WIP = 1 << 0;
        /// Status of the **W**rite **E**nable **L**atch.
        const WEL = 1 << 1;
        /// Block-protect bit 0. Meaning of `BP0..BP2` differs between vendors.
        const BP0 = 1 << 2;
        /// Block-protect bit 1.
        const BP1 = 1 << 3;
        /// Block-protect bit 2.
        const BP2 = 1 << 4;
        /// The 3 block-protect bits as a group.
        const PROT = 0b0001_1100;
        /// Macronix Quad I/O enable.
        const QUAD_EN_MX = 1 << 6;
        /// **S**tatus **R**egister **W**rite **D**isable bit.
        const SRWD = 1 << 7;
    }
}

impl Status {
    /// The 3-bit block-protect field, right-shifted to `0..=7`.
    pub fn bp_field(self) -> u8 {
        (self.bits() & Self::PROT.bits()) >> 2
    }

    /// Rebuilds a status byte with the block-protect field replaced by `bp`
    /// (`0..=7`), leaving every other bit untouched.
    pub fn with_bp_field(self, bp: u8) -> Status {
        let cleared = self.bits() & !Self::PROT.bits();
        Status::from_bits_truncate(cleared | ((bp << 2) & Self::PROT.bits()))
    }
}

bitflags! {
    /// Flag status register (`RDFSR`) bits, Micron-style parts only.
    pub struct FlagStatus: u8 {
        /// Set once the chip is ready (inverse polarity from `Status::WIP`).
        const READY = 1 << 7;
    }
}

bitflags! {
    /// Configuration register (`RDCR`) bits, Spansion/Winbond parts.
    pub struct ConfigRegister: u8 {
        /// Spansion/Winbond Quad I/O enable.
        const QUAD_EN_SPAN = 1 << 1;
    }
}

bitflags! {
    /// Micron Enhanced Volatile Configuration Register bits.
    pub struct Evcr: u8 {
        /// Clear to enable Quad I/O (inverted polarity: set == quad disabled).
        const QUAD_EN_MICRON = 1 << 7;
    }
}
