//! The standard SPI NOR opcode set.
//!
//! Nomenclature: some opcodes follow a `FUNCTION{4,}_x_y_z` pattern, where
//! `x`, `y`, `z` are the number of I/O lines used for the opcode, address,
//! and data phase respectively, and an optional `4` suffix marks an opcode
//! that takes a 4-byte address.

/// Write disable: clears the write-enable latch.
pub const WRDI: u8 = 0x04;
/// Write enable: sets the write-enable latch. Required before any
/// state-modifying opcode.
pub const WREN: u8 = 0x06;
/// Read the 8-bit status register.
pub const RDSR: u8 = 0x05;
/// Write the 8-bit status register (1-byte form).
pub const WRSR: u8 = 0x01;
/// Read data bytes at the standard (low) frequency, no dummy cycles.
pub const READ: u8 = 0x03;
/// Read data bytes with one dummy byte, at the chip's max frequency.
pub const READ_FAST: u8 = 0x0b;
/// Dual output read (1-1-2): opcode and address on one line, data on two.
pub const READ_1_1_2: u8 = 0x3b;
/// Dual I/O read (1-2-2): address and data both on two lines.
pub const READ_1_1_2_IO: u8 = 0xbb;
/// Quad output read (1-1-4): opcode and address on one line, data on four.
pub const READ_1_1_4: u8 = 0x6b;
/// Quad I/O read (1-4-4): address and data both on four lines.
pub const READ_1_1_4_IO: u8 = 0xeb;
/// Bank register write (Spansion: `BRWR`).
pub const BRWR: u8 = 0x17;
/// Bank register read (Spansion: `BRRD`).
pub const BRRD: u8 = 0x16;
/// Write extended address register (non-Spansion BAR opcode).
pub const WREAR: u8 = 0xc5;
/// Read extended address register (non-Spansion BAR opcode).
pub const RDEAR: u8 = 0xc8;
/// Page program, up to 256 bytes.
pub const PP: u8 = 0x02;
/// Quad page program.
pub const QPP: u8 = 0x32;
/// Erase a 4 KiB block.
pub const BE_4K: u8 = 0x20;
/// Erase a 4 KiB block, PMC variant opcode.
pub const BE_4K_PMC: u8 = 0xd7;
/// Erase a 32 KiB block.
pub const BE_32K: u8 = 0x52;
/// Erase the whole chip.
pub const CHIP_ERASE: u8 = 0xc7;
/// Sector erase (usually 64 KiB).
pub const SE: u8 = 0xd8;
/// Read JEDEC manufacturer/device ID.
pub const RDID: u8 = 0x9f;
/// Read the configuration register (Spansion/Winbond).
pub const RDCR: u8 = 0x35;
/// Read the flag status register (Micron).
pub const RDFSR: u8 = 0x70;

/// SST byte program. Aliases [`PP`]'s opcode value but is only ever issued on
/// SST parts in `SNOR_WRITE_1_1_BYTE` mode.
pub const BP: u8 = 0x02;
/// SST auto address-increment word program.
pub const AAI_WP: u8 = 0xad;

/// Read the Micron Enhanced Volatile Configuration Register.
pub const RD_EVCR: u8 = 0x65;
/// Write the Micron Enhanced Volatile Configuration Register.
pub const WD_EVCR: u8 = 0x61;
