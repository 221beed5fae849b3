//! Region offset bookkeeping.
//!
//! Merge and abandon compute the new region layout on a copy, check it with
//! [`verify_layout`] against the buffer lengths the edit will produce, and
//! only then touch the buffers.

use super::errors::InvariantViolation;
use super::region::{DiffRegion, Side};

/// Shifts the `side` range of every region in `regions` by `delta`.
///
/// # Errors
///
/// Returns [`InvariantViolation::NegativeOffset`] if a range would start
/// before offset zero.
pub(crate) fn shift_all(
    regions: &mut [DiffRegion],
    side: Side,
    delta: isize,
) -> Result<(), InvariantViolation> {
    if delta == 0 {
        return Ok(());
    }
    for region in regions {
        let shifted =
            region
                .range(side)
                .shifted(delta)
                .ok_or(InvariantViolation::NegativeOffset {
                    region: region.id(),
                    side,
                    delta,
                })?;
        region.set_range(side, shifted);
    }
    Ok(())
}

/// Char length change caused by writing `new_len` chars over `old_len` chars.
#[allow(clippy::cast_possible_wrap)]
pub(crate) const fn delta(old_len: usize, new_len: usize) -> isize {
    new_len as isize - old_len as isize
}

/// Checks ranges against buffer lengths, ordering and recorded contents.
///
/// # Errors
///
/// Returns the first violation found, left side first.
pub(crate) fn verify_layout(
    regions: &[DiffRegion],
    left_len: usize,
    right_len: usize,
) -> Result<(), InvariantViolation> {
    for (side, len) in [(Side::Left, left_len), (Side::Right, right_len)] {
        let mut floor = 0;
        for region in regions {
            let range = region.range(side);
            if range.end > len {
                return Err(InvariantViolation::OutOfBounds {
                    region: region.id(),
                    side,
                    start: range.start,
                    end: range.end,
                    len,
                });
            }
            if range.start < floor {
                return Err(InvariantViolation::Unordered {
                    region: region.id(),
                    side,
                });
            }
            floor = range.end;

            if region.is_resolved() {
                continue;
            }
            let own = region.content(side).chars().count();
            let counterpart = region.content(side.opposite()).chars().count();
            if range.len() != own && range.len() != counterpart {
                return Err(InvariantViolation::WidthMismatch {
                    region: region.id(),
                    side,
                    width: range.len(),
                    own,
                    counterpart,
                });
            }
        }
    }
    Ok(())
}
