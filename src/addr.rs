//! Address encoding, dual-die routing, and Bank Address Register management.
//!
//! Three independent concerns live here because they compose in a fixed
//! order on real hardware: a linear byte offset first gets split across
//! stacked/parallel dies (if any), then the per-die offset gets encoded
//! into however many address bytes the opcode needs, bumping the bank
//! register first if 3-byte addressing can't reach it.

use crate::opcodes;
use crate::vendor::Vendor;

/// How a package's two dies are wired relative to each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DualTopology {
    /// A single die; no routing needed.
    Single,
    /// Two dies sharing one chip-select, switched by an in-band opcode.
    /// Addressing is linear: die 0 covers `[0, size)`, die 1 covers
    /// `[size, 2*size)`.
    Stacked,
    /// Two dies on separate chip-selects, striped byte-by-byte so each die
    /// sees half the address space: both dies are driven by the same command
    /// at once (even bytes land on die 0, odd on die 1), and the address
    /// sent to both is the linear offset shifted right by one. There is no
    /// per-access die selection.
    Parallel,
}

/// Result of routing a linear offset through a dual-die topology.
pub struct Routed {
    /// `true` if this access belongs to the upper die. Always `false` under
    /// [`DualTopology::Parallel`], which drives both dies with one command
    /// instead of selecting between them.
    pub upper: bool,
    /// The offset as seen by that die, ready for [`encode_address`].
    pub die_offset: u32,
}

/// Splits a linear address (as seen by the MTD façade) into a die selector
/// and a per-die offset.
///
/// `die_size` is the size of a single die in bytes; for [`DualTopology::Single`]
/// it's ignored.
pub fn route(topology: DualTopology, die_size: u32, addr: u32) -> Routed {
    match topology {
        DualTopology::Single => Routed {
            upper: false,
            die_offset: addr,
        },
        DualTopology::Stacked => {
            if addr >= die_size {
                Routed {
                    upper: true,
                    die_offset: addr - die_size,
                }
            } else {
                Routed {
                    upper: false,
                    die_offset: addr,
                }
            }
        }
        DualTopology::Parallel => Routed {
            upper: false,
            die_offset: addr >> 1,
        },
    }
}

/// Encodes a per-die byte offset into a big-endian address field of
/// `addr_width` bytes (3 or 4), as sent after the opcode.
///
/// For 3-byte addressing, `offset` must already have been reduced to the
/// current bank (see [`BankRouter`]); this function only truncates to the
/// low 24 bits; it never bumps the bank itself.
pub fn encode_address(offset: u32, addr_width: u8, buf: &mut [u8; 4]) -> usize {
    match addr_width {
        3 => {
            buf[0] = (offset >> 16) as u8;
            buf[1] = (offset >> 8) as u8;
            buf[2] = offset as u8;
            3
        }
        4 => {
            buf[0] = (offset >> 24) as u8;
            buf[1] = (offset >> 16) as u8;
            buf[2] = (offset >> 8) as u8;
            buf[3] = offset as u8;
            4
        }
        other => unreachable!("unsupported address width {}", other),
    }
}

/// Size of the window a single Bank Address Register value covers with
/// 3-byte addressing.
pub const BANK_SIZE: u32 = 0x0100_0000;

/// Tracks which 16 MiB bank is currently selected via the extended address
/// (or Spansion bank) register, issuing a write only when the bank actually
/// changes.
pub struct BankRouter {
    vendor: Vendor,
    current_bank: u8,
}

impl BankRouter {
    pub fn new(vendor: Vendor) -> Self {
        Self {
            vendor,
            current_bank: 0,
        }
    }

    /// Computes which bank `offset` falls in and the offset within that
    /// bank, ready for 3-byte [`encode_address`].
    pub fn split(&self, offset: u32) -> (u8, u32) {
        ((offset / BANK_SIZE) as u8, offset % BANK_SIZE)
    }

    /// Returns `Some((opcode, bank_byte))` if the bank register needs
    /// writing to reach `bank`, and records the new current bank. Returns
    /// `None` if `bank` is already selected.
    pub fn select(&mut self, bank: u8) -> Option<(u8, u8)> {
        if bank == self.current_bank {
            return None;
        }
        self.current_bank = bank;
        let (write_opcode, _read_opcode) = self.vendor.bar_opcodes();
        Some((write_opcode, bank))
    }

    pub fn current_bank(&self) -> u8 {
        self.current_bank
    }
}

/// Whether a part needs bank switching at all: true only when its total
/// size exceeds the 3-byte addressing ceiling and it hasn't been configured
/// for native 4-byte addressing.
pub fn needs_bar(total_size: u32, addr_width: u8) -> bool {
    addr_width == 3 && total_size > BANK_SIZE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stacked_routes_by_die_size() {
        let r = route(DualTopology::Stacked, 0x100_0000, 0x123_4567);
        assert!(r.upper);
        assert_eq!(r.die_offset, 0x123_4567 - 0x100_0000);

        let r = route(DualTopology::Stacked, 0x100_0000, 0x00ff_ffff);
        assert!(!r.upper);
        assert_eq!(r.die_offset, 0x00ff_ffff);
    }

    #[test]
    fn parallel_halves_the_address_and_never_selects_a_die() {
        let r = route(DualTopology::Parallel, 0, 10);
        assert!(!r.upper);
        assert_eq!(r.die_offset, 5);

        let r = route(DualTopology::Parallel, 0, 11);
        assert!(!r.upper);
        assert_eq!(r.die_offset, 5);
    }

    #[test]
    fn bank_router_only_switches_on_change() {
        let mut bar = BankRouter::new(Vendor::Winbond);
        let (bank, offset) = bar.split(0x0200_0010);
        assert_eq!(bank, 2);
        assert_eq!(offset, 0x10);

        assert!(bar.select(bank).is_some());
        assert_eq!(bar.current_bank(), 2);
        assert!(bar.select(bank).is_none());
    }

    #[test]
    fn spansion_uses_brwr() {
        let mut bar = BankRouter::new(Vendor::Spansion);
        let (opcode, bank) = bar.select(1).unwrap();
        assert_eq!(opcode, opcodes::BRWR);
        assert_eq!(bank, 1);
    }

    #[test]
    fn non_spansion_uses_wrear() {
        let mut bar = BankRouter::new(Vendor::Macronix);
        let (opcode, _) = bar.select(1).unwrap();
        assert_eq!(opcode, opcodes::WREAR);
    }
}
