//! The static identity table: one [`FlashParams`] entry per known part,
//! keyed by JEDEC ID.
//!
//! Transcribed from the historical `spi_nor_ids[]` table. Each vendor's
//! slice compiles in or out with the matching Cargo feature (default build
//! enables every vendor, mirroring the historical "a default build must
//! include all vendors" policy); parts with no natural vendor gate (PMC,
//! ESMT, Everspin, Fujitsu, Intel/Numonyx, Catalyst) are unconditional, same
//! as upstream.

use crate::id::MAX_ID_LEN;
use bitflags::bitflags;

bitflags! {
    /// Read modes a part (or a host controller) supports, ordered from
    /// slowest/most-compatible to fastest.
    pub struct ReadModes: u8 {
        /// Plain `READ`, no dummy cycles, works on every part.
        const READ = 1 << 0;
        /// `READ_FAST`, one dummy byte.
        const FAST = 1 << 1;
        /// Dual output read (1-1-2).
        const DUAL = 1 << 2;
        /// Quad output read (1-1-4).
        const QUAD = 1 << 3;
        /// Dual I/O read (1-2-2).
        const DUAL_IO = 1 << 4;
        /// Quad I/O read (1-4-4).
        const QUAD_IO = 1 << 5;

        /// `READ | FAST`: what essentially every part supports.
        const BASE = Self::READ.bits | Self::FAST.bits;
        /// Every mode this crate knows how to drive.
        const FULL = Self::BASE.bits | Self::DUAL.bits | Self::QUAD.bits
            | Self::DUAL_IO.bits | Self::QUAD_IO.bits;
    }
}

bitflags! {
    /// Per-part capability/quirk flags.
    pub struct FlashFlags: u16 {
        /// `BE_4K` (0x20) erases a uniform 4 KiB regardless of the part's
        /// nominal sector size.
        const SECT_4K = 1 << 0;
        /// `BE_32K` (0x52) erases a uniform 32 KiB block.
        const SECT_32K = 1 << 1;
        /// The part has no erase command at all (eg. FRAM/MRAM).
        const NO_ERASE = 1 << 2;
        /// Use the SST byte/AAI-word program sequence instead of `PP`.
        const SST_WRITE = 1 << 3;
        /// The part cannot do `READ_FAST`; force plain `READ`.
        const NO_FAST_READ = 1 << 4;
        /// `BE_4K_PMC` (0xd7) erases a uniform 4 KiB block, PMC opcode.
        const SECT_4K_PMC = 1 << 5;
        /// Use the flag status register (`RDFSR`) in addition to `RDSR`.
        const USE_FSR = 1 << 6;
        /// The part supports `QPP` quad page program.
        const WRITE_QUAD = 1 << 7;
    }
}

bitflags! {
    /// Write/program modes a part (or host controller) supports.
    pub struct WriteModes: u8 {
        /// Standard single-lane page program (`PP`).
        const PP = 1 << 0;
        /// Quad page program (`QPP`), data on four lines.
        const QPP = 1 << 1;
        /// SST single-byte program sequence.
        const SST_BYTE = 1 << 2;
        /// SST auto address-increment word program (`AAI_WP`).
        const SST_WORD = 1 << 3;
    }
}

/// A catalogue entry: JEDEC identity plus the geometry and capability flags
/// needed to configure a chip once it has been matched.
#[derive(Debug, Clone, Copy)]
pub struct FlashParams {
    pub name: &'static str,
    /// Up to [`MAX_ID_LEN`] JEDEC ID bytes; only the first `id_len` are
    /// meaningful.
    pub id: [u8; MAX_ID_LEN],
    /// `0` means "no ID, identify by pin-strap/part-number alone" (some very
    /// old parts); otherwise `3` or `5..=6`.
    pub id_len: u8,
    pub sector_size: u32,
    pub n_sectors: u16,
    pub page_size: u16,
    pub addr_width: u8,
    pub read_modes: ReadModes,
    pub flags: FlashFlags,
}

impl FlashParams {
    /// Total device size in bytes.
    pub const fn total_size(&self) -> u32 {
        self.sector_size * self.n_sectors as u32
    }

    /// Whether this entry's first `id_len` bytes match `id`'s prefix.
    pub fn matches(&self, id: &[u8]) -> bool {
        let len = self.id_len as usize;
        len != 0 && id.len() >= len && self.id[..len] == id[..len]
    }
}

const fn info(
    name: &'static str,
    jedec_id: u32,
    ext_id: u16,
    sector_size: u32,
    n_sectors: u16,
    read_modes: ReadModes,
    flags: FlashFlags,
) -> FlashParams {
    FlashParams {
        name,
        id: [
            ((jedec_id >> 16) & 0xff) as u8,
            ((jedec_id >> 8) & 0xff) as u8,
            (jedec_id & 0xff) as u8,
            ((ext_id >> 8) & 0xff) as u8,
            (ext_id & 0xff) as u8,
            0,
        ],
        id_len: if jedec_id == 0 {
            0
        } else if ext_id != 0 {
            5
        } else {
            3
        },
        sector_size,
        n_sectors,
        page_size: 256,
        addr_width: 3,
        read_modes,
        flags,
    }
}

const fn info6(
    name: &'static str,
    jedec_id: u32,
    ext_id: u32,
    sector_size: u32,
    n_sectors: u16,
    read_modes: ReadModes,
    flags: FlashFlags,
) -> FlashParams {
    FlashParams {
        name,
        id: [
            ((jedec_id >> 16) & 0xff) as u8,
            ((jedec_id >> 8) & 0xff) as u8,
            (jedec_id & 0xff) as u8,
            ((ext_id >> 16) & 0xff) as u8,
            ((ext_id >> 8) & 0xff) as u8,
            (ext_id & 0xff) as u8,
        ],
        id_len: 6,
        sector_size,
        n_sectors,
        page_size: 256,
        addr_width: 3,
        read_modes,
        flags,
    }
}

const fn cat25(
    name: &'static str,
    sector_size: u32,
    n_sectors: u16,
    page_size: u16,
    addr_width: u8,
    read_modes: ReadModes,
    flags: FlashFlags,
) -> FlashParams {
    FlashParams {
        name,
        id: [0; MAX_ID_LEN],
        id_len: 0,
        sector_size,
        n_sectors,
        page_size,
        addr_width,
        read_modes,
        flags,
    }
}

#[cfg(feature = "atmel")]
static ATMEL: &[FlashParams] = &[
    info("at25fs010", 0x1f_6601, 0, 32 * 1024, 4, ReadModes::BASE, FlashFlags::SECT_4K),
    info("at25fs040", 0x1f_6604, 0, 64 * 1024, 8, ReadModes::BASE, FlashFlags::SECT_4K),
    info("at25df041a", 0x1f_4401, 0, 64 * 1024, 8, ReadModes::BASE, FlashFlags::SECT_4K),
    info("at25df321a", 0x1f_4701, 0, 64 * 1024, 64, ReadModes::BASE, FlashFlags::SECT_4K),
    info("at25df641", 0x1f_4800, 0, 64 * 1024, 128, ReadModes::BASE, FlashFlags::SECT_4K),
    info("at26f004", 0x1f_0400, 0, 64 * 1024, 8, ReadModes::BASE, FlashFlags::SECT_4K),
    info("at26df081a", 0x1f_4501, 0, 64 * 1024, 16, ReadModes::BASE, FlashFlags::SECT_4K),
    info("at26df161a", 0x1f_4601, 0, 64 * 1024, 32, ReadModes::BASE, FlashFlags::SECT_4K),
    info("at26df321", 0x1f_4700, 0, 64 * 1024, 64, ReadModes::BASE, FlashFlags::SECT_4K),
    info("at45db011d", 0x1f_2200, 0, 64 * 1024, 4, ReadModes::BASE, FlashFlags::SECT_4K),
    info("at45db021d", 0x1f_2300, 0, 64 * 1024, 8, ReadModes::BASE, FlashFlags::SECT_4K),
    info("at45db041d", 0x1f_2400, 0, 64 * 1024, 8, ReadModes::BASE, FlashFlags::SECT_4K),
    info("at45db081d", 0x1f_2500, 0, 64 * 1024, 16, ReadModes::BASE, FlashFlags::SECT_4K),
    info("at45db161d", 0x1f_2600, 0, 64 * 1024, 32, ReadModes::BASE, FlashFlags::SECT_4K),
    info("at45db321d", 0x1f_2700, 0, 64 * 1024, 64, ReadModes::BASE, FlashFlags::SECT_4K),
    info("at45db641d", 0x1f_2800, 0, 64 * 1024, 128, ReadModes::BASE, FlashFlags::SECT_4K),
];

#[cfg(feature = "eon")]
static EON: &[FlashParams] = &[
    info("en25f32", 0x1c_3116, 0, 64 * 1024, 64, ReadModes::BASE, FlashFlags::SECT_4K),
    info("en25p32", 0x1c_2016, 0, 64 * 1024, 64, ReadModes::BASE, FlashFlags::empty()),
    info("en25q32b", 0x1c_3016, 0, 64 * 1024, 64, ReadModes::BASE, FlashFlags::empty()),
    info("en25p64", 0x1c_2017, 0, 64 * 1024, 128, ReadModes::BASE, FlashFlags::empty()),
    info("en25q64", 0x1c_3017, 0, 64 * 1024, 128, ReadModes::BASE, FlashFlags::SECT_4K),
    info("en25q128b", 0x1c_3018, 0, 64 * 1024, 256, ReadModes::BASE, FlashFlags::empty()),
    info("en25qh128", 0x1c_7018, 0, 64 * 1024, 256, ReadModes::BASE, FlashFlags::empty()),
    info("en25qh256", 0x1c_7019, 0, 64 * 1024, 512, ReadModes::BASE, FlashFlags::empty()),
    info("en25s64", 0x1c_3817, 0, 64 * 1024, 128, ReadModes::BASE, FlashFlags::SECT_4K),
];

#[cfg(feature = "gigadevice")]
static GIGADEVICE: &[FlashParams] = &[
    info("gd25q32", 0xc8_4016, 0, 64 * 1024, 64, ReadModes::BASE, FlashFlags::SECT_4K),
    info("gd25q64", 0xc8_4017, 0, 64 * 1024, 128, ReadModes::BASE, FlashFlags::SECT_4K),
    info("gd25q128", 0xc8_4018, 0, 64 * 1024, 256, ReadModes::BASE, FlashFlags::SECT_4K),
    info("gd25lq32", 0xc8_6016, 0, 64 * 1024, 64, ReadModes::BASE, FlashFlags::SECT_4K),
];

#[cfg(feature = "issi")]
static ISSI: &[FlashParams] = &[
    info("is25cd512", 0x7f_9d20, 0, 32 * 1024, 2, ReadModes::BASE, FlashFlags::SECT_4K),
    info("is25lp032", 0x9d_6016, 0, 64 * 1024, 64, ReadModes::BASE, FlashFlags::empty()),
    info("is25lp064", 0x9d_6017, 0, 64 * 1024, 128, ReadModes::BASE, FlashFlags::empty()),
    info("is25lp128", 0x9d_6018, 0, 64 * 1024, 256, ReadModes::BASE, FlashFlags::empty()),
];

#[cfg(feature = "macronix")]
static MACRONIX: &[FlashParams] = &[
    info("mx25l512e", 0xc2_2010, 0, 64 * 1024, 1, ReadModes::BASE, FlashFlags::SECT_4K),
    info("mx25l2005a", 0xc2_2012, 0, 64 * 1024, 4, ReadModes::BASE, FlashFlags::SECT_4K),
    info("mx25l4005a", 0xc2_2013, 0, 64 * 1024, 8, ReadModes::BASE, FlashFlags::SECT_4K),
    info("mx25l8005", 0xc2_2014, 0, 64 * 1024, 16, ReadModes::BASE, FlashFlags::empty()),
    info("mx25l1606e", 0xc2_2015, 0, 64 * 1024, 32, ReadModes::BASE, FlashFlags::SECT_4K),
    info("mx25l3205d", 0xc2_2016, 0, 64 * 1024, 64, ReadModes::BASE, FlashFlags::empty()),
    info("mx25l3255e", 0xc2_9e16, 0, 64 * 1024, 64, ReadModes::BASE, FlashFlags::SECT_4K),
    info("mx25l6405d", 0xc2_2017, 0, 64 * 1024, 128, ReadModes::BASE, FlashFlags::empty()),
    info("mx25u6435f", 0xc2_2537, 0, 64 * 1024, 128, ReadModes::BASE, FlashFlags::SECT_4K),
    info("mx25l12805d", 0xc2_2018, 0, 64 * 1024, 256, ReadModes::FULL, FlashFlags::WRITE_QUAD),
    info("mx25l12855e", 0xc2_2618, 0, 64 * 1024, 256, ReadModes::FULL, FlashFlags::WRITE_QUAD),
    info("mx25l25635e", 0xc2_2019, 0, 64 * 1024, 512, ReadModes::FULL, FlashFlags::WRITE_QUAD),
    info("mx25l25655e", 0xc2_2619, 0, 64 * 1024, 512, ReadModes::FULL, FlashFlags::WRITE_QUAD),
    info("mx66l51235l", 0xc2_201a, 0, 64 * 1024, 1024, ReadModes::FULL, FlashFlags::WRITE_QUAD),
    info("mx66l1g55g", 0xc2_261b, 0, 64 * 1024, 2048, ReadModes::FULL, FlashFlags::WRITE_QUAD),
];

#[cfg(feature = "micron")]
static MICRON_N25Q: &[FlashParams] = &[
    info("n25q032", 0x20_ba16, 0, 64 * 1024, 64, ReadModes::FULL, FlashFlags::WRITE_QUAD),
    info(
        "n25q064",
        0x20_ba17,
        0,
        64 * 1024,
        128,
        ReadModes::FULL,
        FlashFlags::from_bits_truncate(FlashFlags::WRITE_QUAD.bits() | FlashFlags::SECT_4K.bits()),
    ),
    info(
        "n25q064a",
        0x20_bb17,
        0,
        64 * 1024,
        128,
        ReadModes::FULL,
        FlashFlags::from_bits_truncate(FlashFlags::WRITE_QUAD.bits() | FlashFlags::SECT_4K.bits()),
    ),
    info("n25q128a11", 0x20_bb18, 0, 64 * 1024, 256, ReadModes::FULL, FlashFlags::WRITE_QUAD),
    info("n25q128a13", 0x20_ba18, 0, 64 * 1024, 256, ReadModes::FULL, FlashFlags::WRITE_QUAD),
    info(
        "n25q256a",
        0x20_ba19,
        0,
        64 * 1024,
        512,
        ReadModes::FULL,
        FlashFlags::from_bits_truncate(FlashFlags::WRITE_QUAD.bits() | FlashFlags::SECT_4K.bits()),
    ),
    info(
        "n25q512a",
        0x20_bb20,
        0,
        64 * 1024,
        1024,
        ReadModes::FULL,
        FlashFlags::from_bits_truncate(
            FlashFlags::WRITE_QUAD.bits() | FlashFlags::SECT_4K.bits() | FlashFlags::USE_FSR.bits(),
        ),
    ),
    info(
        "n25q512ax3",
        0x20_ba20,
        0,
        64 * 1024,
        1024,
        ReadModes::FULL,
        FlashFlags::from_bits_truncate(
            FlashFlags::WRITE_QUAD.bits() | FlashFlags::SECT_4K.bits() | FlashFlags::USE_FSR.bits(),
        ),
    ),
    info(
        "n25q00",
        0x20_ba21,
        0,
        64 * 1024,
        2048,
        ReadModes::FULL,
        FlashFlags::from_bits_truncate(
            FlashFlags::WRITE_QUAD.bits() | FlashFlags::SECT_4K.bits() | FlashFlags::USE_FSR.bits(),
        ),
    ),
];

#[cfg(feature = "micron")]
static STMICRO_LEGACY: &[FlashParams] = &[
    info("m25p05", 0x20_2010, 0, 32 * 1024, 2, ReadModes::BASE, FlashFlags::empty()),
    info("m25p10", 0x20_2011, 0, 32 * 1024, 4, ReadModes::BASE, FlashFlags::empty()),
    info("m25p20", 0x20_2012, 0, 64 * 1024, 4, ReadModes::BASE, FlashFlags::empty()),
    info("m25p40", 0x20_2013, 0, 64 * 1024, 8, ReadModes::BASE, FlashFlags::empty()),
    info("m25p80", 0x20_2014, 0, 64 * 1024, 16, ReadModes::BASE, FlashFlags::empty()),
    info("m25p16", 0x20_2015, 0, 64 * 1024, 32, ReadModes::BASE, FlashFlags::empty()),
    info("m25p32", 0x20_2016, 0, 64 * 1024, 64, ReadModes::BASE, FlashFlags::empty()),
    info("m25p64", 0x20_2017, 0, 64 * 1024, 128, ReadModes::BASE, FlashFlags::empty()),
    info("m25p128", 0x20_2018, 0, 256 * 1024, 64, ReadModes::BASE, FlashFlags::empty()),
    info("m25p05-nonjedec", 0, 0, 32 * 1024, 2, ReadModes::BASE, FlashFlags::empty()),
    info("m25p10-nonjedec", 0, 0, 32 * 1024, 4, ReadModes::BASE, FlashFlags::empty()),
    info("m25p20-nonjedec", 0, 0, 64 * 1024, 4, ReadModes::BASE, FlashFlags::empty()),
    info("m25p40-nonjedec", 0, 0, 64 * 1024, 8, ReadModes::BASE, FlashFlags::empty()),
    info("m25p80-nonjedec", 0, 0, 64 * 1024, 16, ReadModes::BASE, FlashFlags::empty()),
    info("m25p16-nonjedec", 0, 0, 64 * 1024, 32, ReadModes::BASE, FlashFlags::empty()),
    info("m25p32-nonjedec", 0, 0, 64 * 1024, 64, ReadModes::BASE, FlashFlags::empty()),
    info("m25p64-nonjedec", 0, 0, 64 * 1024, 128, ReadModes::BASE, FlashFlags::empty()),
    info("m25p128-nonjedec", 0, 0, 256 * 1024, 64, ReadModes::BASE, FlashFlags::empty()),
    info("m45pe10", 0x20_4011, 0, 64 * 1024, 2, ReadModes::BASE, FlashFlags::empty()),
    info("m45pe80", 0x20_4014, 0, 64 * 1024, 16, ReadModes::BASE, FlashFlags::empty()),
    info("m45pe16", 0x20_4015, 0, 64 * 1024, 32, ReadModes::BASE, FlashFlags::empty()),
    info("m25pe20", 0x20_8012, 0, 64 * 1024, 4, ReadModes::BASE, FlashFlags::empty()),
    info("m25pe80", 0x20_8014, 0, 64 * 1024, 16, ReadModes::BASE, FlashFlags::empty()),
    info("m25pe16", 0x20_8015, 0, 64 * 1024, 32, ReadModes::BASE, FlashFlags::SECT_4K),
    info("m25px16", 0x20_7115, 0, 64 * 1024, 32, ReadModes::BASE, FlashFlags::SECT_4K),
    info("m25px32", 0x20_7116, 0, 64 * 1024, 64, ReadModes::BASE, FlashFlags::SECT_4K),
    info("m25px32-s0", 0x20_7316, 0, 64 * 1024, 64, ReadModes::BASE, FlashFlags::SECT_4K),
    info("m25px32-s1", 0x20_6316, 0, 64 * 1024, 64, ReadModes::BASE, FlashFlags::SECT_4K),
    info("m25px64", 0x20_7117, 0, 64 * 1024, 128, ReadModes::BASE, FlashFlags::empty()),
    info("m25px80", 0x20_7114, 0, 64 * 1024, 16, ReadModes::BASE, FlashFlags::empty()),
];

#[cfg(feature = "spansion")]
static SPANSION: &[FlashParams] = &[
    info("s25sl032p", 0x01_0215, 0x4d00, 64 * 1024, 64, ReadModes::FULL, FlashFlags::empty()),
    info("s25sl064p", 0x01_0216, 0x4d00, 64 * 1024, 128, ReadModes::FULL, FlashFlags::empty()),
    info("s25fl256s0", 0x01_0219, 0x4d00, 256 * 1024, 128, ReadModes::FULL, FlashFlags::WRITE_QUAD),
    info("s25fl256s1", 0x01_0219, 0x4d01, 64 * 1024, 512, ReadModes::FULL, FlashFlags::empty()),
    info("s25fl512s", 0x01_0220, 0x4d00, 256 * 1024, 256, ReadModes::FULL, FlashFlags::empty()),
    info("s25fl512s1", 0x01_0220, 0x4d01, 64 * 1024, 1024, ReadModes::FULL, FlashFlags::WRITE_QUAD),
    info("s25fl512s2", 0x01_0220, 0x4f00, 256 * 1024, 256, ReadModes::FULL, FlashFlags::WRITE_QUAD),
    info("s70fl01gs", 0x01_0221, 0x4d00, 256 * 1024, 256, ReadModes::FULL, FlashFlags::WRITE_QUAD),
    info("s25sl12800", 0x01_2018, 0x0300, 256 * 1024, 64, ReadModes::FULL, FlashFlags::WRITE_QUAD),
    info("s25sl12801", 0x01_2018, 0x0301, 64 * 1024, 256, ReadModes::FULL, FlashFlags::WRITE_QUAD),
    info6("s25fl128s", 0x01_2018, 0x4d_0180, 64 * 1024, 256, ReadModes::FULL, FlashFlags::WRITE_QUAD),
    info("s25fl129p0", 0x01_2018, 0x4d00, 256 * 1024, 64, ReadModes::FULL, FlashFlags::WRITE_QUAD),
    info("s25fl129p1", 0x01_2018, 0x4d01, 64 * 1024, 256, ReadModes::FULL, FlashFlags::WRITE_QUAD),
    info("s25sl004a", 0x01_0212, 0, 64 * 1024, 8, ReadModes::BASE, FlashFlags::empty()),
    info("s25sl008a", 0x01_0213, 0, 64 * 1024, 16, ReadModes::BASE, FlashFlags::empty()),
    info("s25sl016a", 0x01_0214, 0, 64 * 1024, 32, ReadModes::BASE, FlashFlags::empty()),
    info("s25sl032a", 0x01_0215, 0, 64 * 1024, 64, ReadModes::BASE, FlashFlags::empty()),
    info("s25sl064a", 0x01_0216, 0, 64 * 1024, 128, ReadModes::BASE, FlashFlags::empty()),
    info("s25fl008k", 0xef_4014, 0, 64 * 1024, 16, ReadModes::BASE, FlashFlags::SECT_4K),
    info("s25fl016k", 0xef_4015, 0, 64 * 1024, 32, ReadModes::BASE, FlashFlags::SECT_4K),
    info("s25fl064k", 0xef_4017, 0, 64 * 1024, 128, ReadModes::BASE, FlashFlags::SECT_4K),
    info("s25fl132k", 0x01_4016, 0, 64 * 1024, 64, ReadModes::BASE, FlashFlags::SECT_4K),
    info("s25fl164k", 0x01_4017, 0, 64 * 1024, 128, ReadModes::BASE, FlashFlags::SECT_4K),
    info("s25fl204k", 0x01_4013, 0, 64 * 1024, 8, ReadModes::BASE, FlashFlags::SECT_4K),
];

#[cfg(feature = "sst")]
static SST: &[FlashParams] = &[
    info(
        "sst25vf040b",
        0xbf_258d,
        0,
        64 * 1024,
        8,
        ReadModes::BASE,
        FlashFlags::from_bits_truncate(FlashFlags::SECT_4K.bits() | FlashFlags::SST_WRITE.bits()),
    ),
    info(
        "sst25vf080b",
        0xbf_258e,
        0,
        64 * 1024,
        16,
        ReadModes::BASE,
        FlashFlags::from_bits_truncate(FlashFlags::SECT_4K.bits() | FlashFlags::SST_WRITE.bits()),
    ),
    info(
        "sst25vf016b",
        0xbf_2541,
        0,
        64 * 1024,
        32,
        ReadModes::BASE,
        FlashFlags::from_bits_truncate(FlashFlags::SECT_4K.bits() | FlashFlags::SST_WRITE.bits()),
    ),
    info(
        "sst25vf032b",
        0xbf_254a,
        0,
        64 * 1024,
        64,
        ReadModes::BASE,
        FlashFlags::from_bits_truncate(FlashFlags::SECT_4K.bits() | FlashFlags::SST_WRITE.bits()),
    ),
    info("sst25vf064c", 0xbf_254b, 0, 64 * 1024, 128, ReadModes::BASE, FlashFlags::SECT_4K),
    info(
        "sst25wf512",
        0xbf_2501,
        0,
        64 * 1024,
        1,
        ReadModes::BASE,
        FlashFlags::from_bits_truncate(FlashFlags::SECT_4K.bits() | FlashFlags::SST_WRITE.bits()),
    ),
    info(
        "sst25wf010",
        0xbf_2502,
        0,
        64 * 1024,
        2,
        ReadModes::BASE,
        FlashFlags::from_bits_truncate(FlashFlags::SECT_4K.bits() | FlashFlags::SST_WRITE.bits()),
    ),
    info(
        "sst25wf020",
        0xbf_2503,
        0,
        64 * 1024,
        4,
        ReadModes::BASE,
        FlashFlags::from_bits_truncate(FlashFlags::SECT_4K.bits() | FlashFlags::SST_WRITE.bits()),
    ),
    info(
        "sst25wf040",
        0xbf_2504,
        0,
        64 * 1024,
        8,
        ReadModes::BASE,
        FlashFlags::from_bits_truncate(FlashFlags::SECT_4K.bits() | FlashFlags::SST_WRITE.bits()),
    ),
    info("sst25wf020a", 0x62_1612, 0, 64 * 1024, 4, ReadModes::BASE, FlashFlags::SECT_4K),
    info("sst25wf040b", 0x62_1613, 0, 64 * 1024, 8, ReadModes::BASE, FlashFlags::SECT_4K),
    info(
        "sst25wf080",
        0xbf_2505,
        0,
        64 * 1024,
        16,
        ReadModes::BASE,
        FlashFlags::from_bits_truncate(FlashFlags::SECT_4K.bits() | FlashFlags::SST_WRITE.bits()),
    ),
];

#[cfg(feature = "winbond")]
static WINBOND: &[FlashParams] = &[
    info("w25p80", 0xef_2014, 0, 64 * 1024, 16, ReadModes::BASE, FlashFlags::empty()),
    info("w25p16", 0xef_2015, 0, 64 * 1024, 32, ReadModes::BASE, FlashFlags::empty()),
    info("w25p32", 0xef_2016, 0, 64 * 1024, 64, ReadModes::BASE, FlashFlags::empty()),
    info("w25x05", 0xef_3010, 0, 64 * 1024, 1, ReadModes::BASE, FlashFlags::SECT_4K),
    info("w25x10", 0xef_3011, 0, 64 * 1024, 2, ReadModes::BASE, FlashFlags::SECT_4K),
    info("w25x20", 0xef_3012, 0, 64 * 1024, 4, ReadModes::BASE, FlashFlags::SECT_4K),
    info("w25x40", 0xef_3013, 0, 64 * 1024, 8, ReadModes::BASE, FlashFlags::SECT_4K),
    info("w25x80", 0xef_3014, 0, 64 * 1024, 16, ReadModes::BASE, FlashFlags::SECT_4K),
    info("w25x16", 0xef_3015, 0, 64 * 1024, 32, ReadModes::BASE, FlashFlags::SECT_4K),
    info("w25x32", 0xef_3016, 0, 64 * 1024, 64, ReadModes::BASE, FlashFlags::SECT_4K),
    info("w25x64", 0xef_3017, 0, 64 * 1024, 128, ReadModes::BASE, FlashFlags::SECT_4K),
    info(
        "w25q80bl",
        0xef_4014,
        0,
        64 * 1024,
        16,
        ReadModes::FULL,
        FlashFlags::from_bits_truncate(FlashFlags::WRITE_QUAD.bits() | FlashFlags::SECT_4K.bits()),
    ),
    info(
        "w25q16cl",
        0xef_4015,
        0,
        64 * 1024,
        32,
        ReadModes::FULL,
        FlashFlags::from_bits_truncate(FlashFlags::WRITE_QUAD.bits() | FlashFlags::SECT_4K.bits()),
    ),
    info(
        "w25q32",
        0xef_4016,
        0,
        64 * 1024,
        64,
        ReadModes::FULL,
        FlashFlags::from_bits_truncate(FlashFlags::WRITE_QUAD.bits() | FlashFlags::SECT_4K.bits()),
    ),
    info(
        "w25q64",
        0xef_4017,
        0,
        64 * 1024,
        128,
        ReadModes::FULL,
        FlashFlags::from_bits_truncate(FlashFlags::WRITE_QUAD.bits() | FlashFlags::SECT_4K.bits()),
    ),
    info(
        "w25q128",
        0xef_4018,
        0,
        64 * 1024,
        256,
        ReadModes::FULL,
        FlashFlags::from_bits_truncate(FlashFlags::WRITE_QUAD.bits() | FlashFlags::SECT_4K.bits()),
    ),
    info(
        "w25q256",
        0xef_4019,
        0,
        64 * 1024,
        512,
        ReadModes::FULL,
        FlashFlags::from_bits_truncate(FlashFlags::WRITE_QUAD.bits() | FlashFlags::SECT_4K.bits()),
    ),
    info(
        "w25q80",
        0xef_5014,
        0,
        64 * 1024,
        16,
        ReadModes::FULL,
        FlashFlags::from_bits_truncate(FlashFlags::WRITE_QUAD.bits() | FlashFlags::SECT_4K.bits()),
    ),
    info(
        "w25q16dw",
        0xef_6015,
        0,
        64 * 1024,
        32,
        ReadModes::FULL,
        FlashFlags::from_bits_truncate(FlashFlags::WRITE_QUAD.bits() | FlashFlags::SECT_4K.bits()),
    ),
    info(
        "w25q32dw",
        0xef_6016,
        0,
        64 * 1024,
        64,
        ReadModes::FULL,
        FlashFlags::from_bits_truncate(FlashFlags::WRITE_QUAD.bits() | FlashFlags::SECT_4K.bits()),
    ),
    info(
        "w25q64dw",
        0xef_6017,
        0,
        64 * 1024,
        128,
        ReadModes::FULL,
        FlashFlags::from_bits_truncate(FlashFlags::WRITE_QUAD.bits() | FlashFlags::SECT_4K.bits()),
    ),
    info(
        "w25q128fw",
        0xef_6018,
        0,
        64 * 1024,
        256,
        ReadModes::FULL,
        FlashFlags::from_bits_truncate(FlashFlags::WRITE_QUAD.bits() | FlashFlags::SECT_4K.bits()),
    ),
];

/// Parts with no vendor Cargo feature of their own: PMC, ESMT, Everspin,
/// Fujitsu, Intel/Numonyx, and the non-JEDEC Catalyst/On-Semi EEPROMs. These
/// were unconditional in the historical table too.
static UNGATED: &[FlashParams] = &[
    // ESMT
    info("f25l32pa", 0x8c_2016, 0, 64 * 1024, 64, ReadModes::BASE, FlashFlags::SECT_4K),
    // Everspin
    cat25(
        "mr25h256",
        32 * 1024,
        1,
        256,
        2,
        ReadModes::BASE,
        FlashFlags::from_bits_truncate(FlashFlags::NO_ERASE.bits() | FlashFlags::NO_FAST_READ.bits()),
    ),
    cat25(
        "mr25h10",
        128 * 1024,
        1,
        256,
        3,
        ReadModes::BASE,
        FlashFlags::from_bits_truncate(FlashFlags::NO_ERASE.bits() | FlashFlags::NO_FAST_READ.bits()),
    ),
    // Fujitsu
    info("mb85rs1mt", 0x04_7f27, 0, 128 * 1024, 1, ReadModes::BASE, FlashFlags::NO_ERASE),
    // PMC
    info("pm25lv512", 0, 0, 32 * 1024, 2, ReadModes::BASE, FlashFlags::SECT_4K_PMC),
    info("pm25lv010", 0, 0, 32 * 1024, 4, ReadModes::BASE, FlashFlags::SECT_4K_PMC),
    info("pm25lq032", 0x7f_9d46, 0, 64 * 1024, 64, ReadModes::BASE, FlashFlags::SECT_4K),
    // Intel/Numonyx -- xxxs33b
    info("160s33b", 0x89_8911, 0, 64 * 1024, 32, ReadModes::BASE, FlashFlags::empty()),
    info("320s33b", 0x89_8912, 0, 64 * 1024, 64, ReadModes::BASE, FlashFlags::empty()),
    info("640s33b", 0x89_8913, 0, 64 * 1024, 128, ReadModes::BASE, FlashFlags::empty()),
    // Catalyst / On Semiconductor -- non-JEDEC
    cat25(
        "cat25c11",
        16,
        8,
        16,
        1,
        ReadModes::BASE,
        FlashFlags::from_bits_truncate(FlashFlags::NO_ERASE.bits() | FlashFlags::NO_FAST_READ.bits()),
    ),
    cat25(
        "cat25c03",
        32,
        8,
        16,
        2,
        ReadModes::BASE,
        FlashFlags::from_bits_truncate(FlashFlags::NO_ERASE.bits() | FlashFlags::NO_FAST_READ.bits()),
    ),
    cat25(
        "cat25c09",
        128,
        8,
        32,
        2,
        ReadModes::BASE,
        FlashFlags::from_bits_truncate(FlashFlags::NO_ERASE.bits() | FlashFlags::NO_FAST_READ.bits()),
    ),
    cat25(
        "cat25c17",
        256,
        8,
        32,
        2,
        ReadModes::BASE,
        FlashFlags::from_bits_truncate(FlashFlags::NO_ERASE.bits() | FlashFlags::NO_FAST_READ.bits()),
    ),
    cat25(
        "cat25128",
        2048,
        8,
        64,
        2,
        ReadModes::BASE,
        FlashFlags::from_bits_truncate(FlashFlags::NO_ERASE.bits() | FlashFlags::NO_FAST_READ.bits()),
    ),
];

/// Looks up a catalogue entry by its raw JEDEC ID bytes (as returned by
/// `RDID`, continuation codes already stripped by [`crate::id::Identification`]).
///
/// First match wins, walking the vendor slices in the same order the
/// historical table listed its `#ifdef` blocks.
pub fn lookup(id: &[u8]) -> Option<&'static FlashParams> {
    #[cfg(feature = "atmel")]
    if let Some(p) = find(ATMEL, id) {
        return Some(p);
    }
    #[cfg(feature = "eon")]
    if let Some(p) = find(EON, id) {
        return Some(p);
    }
    #[cfg(feature = "gigadevice")]
    if let Some(p) = find(GIGADEVICE, id) {
        return Some(p);
    }
    #[cfg(feature = "issi")]
    if let Some(p) = find(ISSI, id) {
        return Some(p);
    }
    #[cfg(feature = "macronix")]
    if let Some(p) = find(MACRONIX, id) {
        return Some(p);
    }
    #[cfg(feature = "micron")]
    if let Some(p) = find(MICRON_N25Q, id) {
        return Some(p);
    }
    #[cfg(feature = "spansion")]
    if let Some(p) = find(SPANSION, id) {
        return Some(p);
    }
    #[cfg(feature = "sst")]
    if let Some(p) = find(SST, id) {
        return Some(p);
    }
    #[cfg(feature = "micron")]
    if let Some(p) = find(STMICRO_LEGACY, id) {
        return Some(p);
    }
    #[cfg(feature = "winbond")]
    if let Some(p) = find(WINBOND, id) {
        return Some(p);
    }
    find(UNGATED, id)
}

fn find(table: &'static [FlashParams], id: &[u8]) -> Option<&'static FlashParams> {
    table.iter().find(|entry| entry.matches(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn winbond_w25q64_matches() {
        let id = [0xEF, 0x40, 0x17];
        let p = lookup(&id).expect("w25q64 should be in the table");
        assert_eq!(p.name, "w25q64");
        assert_eq!(p.total_size(), 8 * 1024 * 1024);
        assert!(p.flags.contains(FlashFlags::SECT_4K));
    }

    #[test]
    fn micron_n25q512a_uses_flag_status() {
        let id = [0x20, 0xbb, 0x20];
        let p = lookup(&id).expect("n25q512a should be in the table");
        assert_eq!(p.name, "n25q512a");
        assert!(p.flags.contains(FlashFlags::USE_FSR));
        assert_eq!(p.total_size(), 64 * 1024 * 1024);
    }

    #[test]
    fn unknown_id_returns_none() {
        assert!(lookup(&[0x00, 0x00, 0x00]).is_none());
    }

    #[test]
    fn spansion_extended_id_needs_full_five_bytes() {
        // s25sl032p and s25sl032a share the base 3-byte ID 0x010215 but only
        // the former carries the 0x4d00 extended JEDEC ID.
        let with_ext = [0x01, 0x02, 0x15, 0x4d, 0x00];
        let p = lookup(&with_ext).expect("extended id should match s25sl032p");
        assert_eq!(p.name, "s25sl032p");
    }
}
