//! JEDEC manufacturer/device identification.

use crate::utils::HexSlice;
use core::fmt;

/// JEDEC manufacturer and device identification, as returned by `RDID`.
///
/// Supports the 3-byte base form as well as the 5- and 6-byte extended forms
/// used by some Spansion parts (see [`crate::params::FlashParams`]'s
/// `id_len`).
pub struct Identification {
    /// Up to [`MAX_ID_LEN`] ID bytes, starting after any continuation codes.
    bytes: [u8; MAX_ID_LEN],

    /// How many of `bytes` are meaningful.
    len: u8,

    /// The number of continuation codes (`0x7F`) that preceded the main
    /// manufacturer ID.
    continuations: u8,
}

/// Maximum number of ID bytes the identity table ever matches against.
pub const MAX_ID_LEN: usize = 6;

impl Identification {
    /// Builds an `Identification` from the raw bytes following `RDID`,
    /// skipping any leading continuation codes.
    ///
    /// Example response for Cypress part FM25V02A:
    /// `7F 7F 7F 7F 7F 7F C2 22 08` (9 bytes). `0x7F` is a "continuation
    /// code", not part of the core manufacturer ID; `0xC2` is the company
    /// identifier for Cypress (Ramtron).
    pub fn from_jedec_id(buf: &[u8]) -> Identification {
        let mut start_idx = 0;
        for (i, &b) in buf.iter().enumerate().take(buf.len().saturating_sub(2)) {
            if b != 0x7F {
                start_idx = i;
                break;
            }
        }

        let len = core::cmp::min(MAX_ID_LEN, buf.len().saturating_sub(start_idx));
        let mut bytes = [0u8; MAX_ID_LEN];
        bytes[..len].copy_from_slice(&buf[start_idx..start_idx + len]);

        Self {
            bytes,
            len: len as u8,
            continuations: start_idx as u8,
        }
    }

    /// The JEDEC manufacturer code for this chip.
    pub fn mfr_code(&self) -> u8 {
        self.bytes[0]
    }

    /// The manufacturer-specific device ID bytes (everything after the
    /// manufacturer code, up to however many bytes this identification
    /// carries).
    pub fn device_id(&self) -> &[u8] {
        &self.bytes[1..self.len as usize]
    }

    /// Every ID byte matched against the identity table's prefix (up to
    /// [`MAX_ID_LEN`] bytes).
    pub fn all_bytes(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }

    /// Number of continuation codes in this chip ID.
    ///
    /// For example the ARM Ltd identifier is `7F 7F 7F 7F 3B` (5 bytes), so
    /// the continuation count is 4.
    pub fn continuation_count(&self) -> u8 {
        self.continuations
    }
}

impl fmt::Debug for Identification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Identification")
            .field(&HexSlice(self.all_bytes()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_cypress_continuation_id() {
        let cypress_id_bytes = [0x7F, 0x7F, 0x7F, 0x7F, 0x7F, 0x7F, 0xC2, 0x22, 0x08];
        let ident = Identification::from_jedec_id(&cypress_id_bytes);
        assert_eq!(0xC2, ident.mfr_code());
        assert_eq!(6, ident.continuation_count());
        assert_eq!(ident.device_id(), [0x22, 0x08]);
    }

    #[test]
    fn decodes_plain_3_byte_id() {
        // Winbond w25q64: EF 40 17
        let bytes = [0xEF, 0x40, 0x17];
        let ident = Identification::from_jedec_id(&bytes);
        assert_eq!(ident.mfr_code(), 0xEF);
        assert_eq!(ident.continuation_count(), 0);
        assert_eq!(ident.all_bytes(), [0xEF, 0x40, 0x17]);
    }
}
