//! STMicro-style block-protect software write protection.
//!
//! The status register's 3-bit `BP` field selects how much of the array,
//! counted down from the top, is protected against program/erase:
//! `0` unlocks everything, `7` locks the whole chip, and everything in
//! between locks the top `1/2^(7-bp)` of the array. This module only knows
//! how to compute and compare that field; issuing the `WRSR` to apply it is
//! [`crate::nor::Flash`]'s job, since it needs a transport to do it.

use crate::status::Status;

/// Given a device's total size and the current status register, decides
/// whether `[addr, addr+len)` falls inside the locked region.
pub fn is_locked(status: Status, total_size: u32, addr: u32, len: u32) -> bool {
    let bp = status.bp_field();
    if bp == 0 {
        return false;
    }
    if bp >= 7 {
        return true;
    }
    let locked_size = total_size >> (7 - bp);
    let locked_start = total_size - locked_size;
    let end = addr.saturating_add(len);
    end > locked_start
}

/// Computes the smallest `BP` field (0..=7) that locks at least
/// `[total_size - len, total_size)`, ie. the top `len` bytes.
///
/// Returns `None` if no `BP` value can express the requested protection
/// exactly as a power-of-two fraction of the array; callers should round up
/// to the nearest valid boundary or reject the request.
pub fn bp_field_for_len(total_size: u32, len: u32) -> Option<u8> {
    if len == 0 {
        return Some(0);
    }
    if len >= total_size {
        return Some(7);
    }
    for bp in 1..7 {
        let locked_size = total_size >> (7 - bp);
        if locked_size >= len {
            return Some(bp);
        }
    }
    None
}

/// Rewrites `status` to protect `[ofs, ofs+len)`, which must extend to the
/// end of the device (the `BP` field can only describe a top-aligned
/// region), rounding up to the next representable boundary.
///
/// Rejects the request (`None`) if `[ofs, ofs+len)` doesn't reach the end of
/// the device, or if the resulting `BP` field would protect *less* than the
/// status register's current one (locking must never reduce existing
/// protection out from under a caller that relied on it).
pub fn lock(status: Status, total_size: u32, ofs: u32, len: u32) -> Option<Status> {
    if ofs.checked_add(len)? != total_size {
        return None;
    }
    let new_bp = bp_field_for_len(total_size, len)?;
    if new_bp < status.bp_field() {
        return None;
    }
    Some(status.with_bp_field(new_bp))
}

/// The largest `BP` field whose locked region fits entirely within the
/// first `remaining` bytes of the array, ie. doesn't reach into whatever
/// range is being unlocked.
fn bp_field_for_remaining(total_size: u32, remaining: u32) -> u8 {
    let mut best = 0u8;
    for bp in 1..=6u8 {
        let locked_size = total_size >> (7 - bp);
        if locked_size <= remaining {
            best = bp;
        }
    }
    best
}

/// Rewrites `status` to clear protection over `[ofs, ofs+len)`.
///
/// Because the `BP` field can only describe a top-aligned region, a request
/// that reaches the end of the device (`ofs+len == total_size`) can only be
/// satisfied by clearing protection entirely (`BP=0`) — any nonzero `BP`
/// locks a suffix that would still overlap the requested range. This falls
/// out of the general computation rather than needing a distinct branch:
/// with nothing left above the unlocked range (`remaining == 0`), the
/// largest representable `BP` is `0`.
///
/// For a request that doesn't reach the end, the largest `BP` whose locked
/// region still fits above `ofs+len` is kept, so the unlock never disturbs
/// protection outside what was asked.
///
/// Rejects the request (`None`) if `[ofs, ofs+len)` falls outside the
/// device, or if the resulting `BP` field would protect *more* than the
/// status register's current one (unlocking must never extend the locked
/// region).
pub fn unlock(status: Status, total_size: u32, ofs: u32, len: u32) -> Option<Status> {
    let end = ofs.checked_add(len)?;
    if end > total_size {
        return None;
    }
    let new_bp = bp_field_for_remaining(total_size, total_size - end);
    if new_bp > status.bp_field() {
        return None;
    }
    Some(status.with_bp_field(new_bp))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bp_zero_unlocks_everything() {
        let status = Status::empty();
        assert!(!is_locked(status, 16 * 1024 * 1024, 0, 16 * 1024 * 1024));
    }

    #[test]
    fn bp_seven_locks_everything() {
        let status = Status::empty().with_bp_field(7);
        assert!(is_locked(status, 16 * 1024 * 1024, 0, 1));
    }

    #[test]
    fn partial_lock_only_covers_top_fraction() {
        let total = 16 * 1024 * 1024u32;
        // bp=1 locks the top 1/64th: 256 KiB.
        let status = Status::empty().with_bp_field(1);
        let locked_start = total - (total >> 6);
        assert!(!is_locked(status, total, 0, 1));
        assert!(is_locked(status, total, locked_start, 1));
    }

    #[test]
    fn lock_rounds_up_to_representable_boundary() {
        let total = 16 * 1024 * 1024u32;
        // Ask for slightly more than 1/64th; should round up to bp=2 (1/32nd).
        let len = (total >> 6) + 1;
        let status = lock(Status::empty(), total, total - len, len).unwrap();
        assert_eq!(status.bp_field(), 2);
    }

    #[test]
    fn lock_rejects_range_not_reaching_end_of_device() {
        let total = 16 * 1024 * 1024u32;
        assert!(lock(Status::empty(), total, 0, total / 2).is_none());
    }

    #[test]
    fn lock_rejects_reducing_existing_protection() {
        let total = 16 * 1024 * 1024u32;
        let status = Status::empty().with_bp_field(4);
        // bp=4 locks 1/8th; asking to lock only the top 1/64th would shrink
        // the already-locked region, which must be rejected.
        let len = total >> 6;
        assert!(lock(status, total, total - len, len).is_none());
    }

    #[test]
    fn unlock_whole_device_clears_bp() {
        let total = 16 * 1024 * 1024u32;
        let status = Status::empty().with_bp_field(7);
        let unlocked = unlock(status, total, 0, total).unwrap();
        assert_eq!(unlocked.bp_field(), 0);
    }

    #[test]
    fn unlock_rejects_increasing_protection() {
        let total = 16 * 1024 * 1024u32;
        // bp=1 only locks the top 1/64th, so [0, 1) isn't locked at all; an
        // "unlock" there has nothing to shrink and must not be satisfied by
        // growing the protected region instead.
        let status = Status::empty().with_bp_field(1);
        assert!(unlock(status, total, 0, 1).is_none());
    }

    #[test]
    fn lock_then_unlock_round_trips() {
        let total = 16 * 1024 * 1024u32;
        let len = total >> 6;
        let locked = lock(Status::empty(), total, total - len, len).unwrap();
        let unlocked = unlock(locked, total, total - len, len).unwrap();
        assert_eq!(unlocked.bp_field(), 0);
    }

    #[test]
    fn unlock_not_reaching_end_rounds_down_to_fit_above_it() {
        let total = 16 * 1024 * 1024u32;
        // bp=2 locks the top 1/32nd. Unlock a range that leaves 1.5x the
        // bp=1 (1/64th) region above it — not enough room for bp=2's
        // larger region, so protection must round down to bp=1, the
        // largest boundary that still clears what was asked to unlock.
        let status = Status::empty().with_bp_field(2);
        let remaining = (total >> 6) + (total >> 7);
        let end = total - remaining;
        let unlocked = unlock(status, total, end - 16, 16).unwrap();
        assert_eq!(unlocked.bp_field(), 1);
    }
}
