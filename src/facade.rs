//! The MTD façade: the read-only summary of a probed chip's geometry and
//! capabilities that an external shell (`list`/`info`/`probe`, see the
//! `spi-nor-cli` binary) builds its output from, without reaching into
//! [`FlashConfig`]'s internals.
//!
//! The core never calls back into this type; it only produces it, on
//! request, from a live [`crate::nor::Flash`].

use crate::params::FlashFlags;
use crate::scan::FlashConfig;
use bitflags::bitflags;
use core::fmt;

bitflags! {
    /// Coarse capability flags a façade consumer might branch on.
    pub struct FacadeFlags: u8 {
        /// Always set: this core only ever produces NOR-flash façades.
        const NOR = 1 << 0;
        /// Clear for parts with [`FlashFlags::NO_ERASE`] (eg. FRAM/MRAM
        /// catalogue entries), which accept `write` but have no `erase`.
        const WRITEABLE = 1 << 1;
    }
}

/// A snapshot of one probed chip's identity and geometry.
#[derive(Clone, Copy)]
pub struct Facade {
    pub name: &'static str,
    pub writesize: u32,
    pub writebufsize: u32,
    pub erasesize: u32,
    pub size: u32,
    pub flags: FacadeFlags,
}

impl Facade {
    /// Builds a façade from a resolved [`FlashConfig`] and the device's
    /// total size (already doubled for stacked/parallel dual topologies).
    pub fn from_config(config: &FlashConfig, total_size: u32) -> Facade {
        let mut flags = FacadeFlags::NOR;
        if !config.flags.contains(FlashFlags::NO_ERASE) {
            flags |= FacadeFlags::WRITEABLE;
        }
        Facade {
            name: config.name,
            writesize: 1,
            writebufsize: config.page_size as u32,
            erasesize: config.erase_size,
            size: total_size,
            flags,
        }
    }
}

impl fmt::Debug for Facade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Facade")
            .field("name", &self.name)
            .field("writesize", &self.writesize)
            .field("writebufsize", &self.writebufsize)
            .field("erasesize", &self.erasesize)
            .field("size", &self.size)
            .field("flags", &self.flags)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::addr::DualTopology;
    use crate::id::Identification;
    use crate::params::{self, ReadModes, WriteModes};
    use crate::scan;

    #[test]
    fn w25q64_facade_reports_erase_size_and_is_writeable() {
        let p = params::lookup(&[0xEF, 0x40, 0x17]).unwrap();
        let ident = Identification::from_jedec_id(&[0xEF, 0x40, 0x17]);
        let config = scan::configure(p, &ident, ReadModes::FULL, WriteModes::PP | WriteModes::QPP, DualTopology::Single).unwrap();
        let facade = Facade::from_config(&config, config.total_size);
        assert_eq!(facade.name, "w25q64");
        if cfg!(feature = "4k-erase") {
            assert_eq!(facade.erasesize, 4096);
        } else {
            assert_eq!(facade.erasesize, p.sector_size);
        }
        assert_eq!(facade.writebufsize, 256);
        assert!(facade.flags.contains(FacadeFlags::WRITEABLE));
    }

    #[test]
    fn no_erase_part_is_not_writeable() {
        let p = params::lookup(&[0x04, 0x7f, 0x27]).unwrap();
        assert_eq!(p.name, "mb85rs1mt");
        let ident = Identification::from_jedec_id(&[0x04, 0x7f, 0x27]);
        let config = scan::configure(p, &ident, ReadModes::BASE, WriteModes::PP, DualTopology::Single).unwrap();
        let facade = Facade::from_config(&config, config.total_size);
        assert!(!facade.flags.contains(FacadeFlags::WRITEABLE));
    }
}
