//! Line-level diff algorithms.
//!
//! This module provides a trait-based approach to diff algorithms,
//! allowing callers to swap implementations while the reduction to
//! [`DiffPart`](crate::DiffPart)s stays the same.

pub mod myers;

pub use myers::MyersDiff;

/// A single diff operation over line indices of two texts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffOp {
    /// Lines that are unchanged between both texts.
    Equal {
        /// Start line index in the old text (0-based, inclusive).
        old_start: usize,
        /// End line index in the old text (0-based, exclusive).
        old_end: usize,
        /// Start line index in the new text (0-based, inclusive).
        new_start: usize,
        /// End line index in the new text (0-based, exclusive).
        new_end: usize,
    },
    /// Lines that were inserted in the new text.
    Insert {
        /// Start line index in the new text (0-based, inclusive).
        new_start: usize,
        /// End line index in the new text (0-based, exclusive).
        new_end: usize,
    },
    /// Lines that were deleted from the old text.
    Delete {
        /// Start line index in the old text (0-based, inclusive).
        old_start: usize,
        /// End line index in the old text (0-based, exclusive).
        old_end: usize,
    },
    /// Lines that were replaced (deleted and inserted).
    Replace {
        /// Start line index in the old text (0-based, inclusive).
        old_start: usize,
        /// End line index in the old text (0-based, exclusive).
        old_end: usize,
        /// Start line index in the new text (0-based, inclusive).
        new_start: usize,
        /// End line index in the new text (0-based, exclusive).
        new_end: usize,
    },
}

impl DiffOp {
    /// Returns the range of lines affected in the old text, if applicable.
    #[must_use]
    pub const fn old_range(&self) -> Option<(usize, usize)> {
        match *self {
            Self::Equal {
                old_start, old_end, ..
            }
            | Self::Delete { old_start, old_end }
            | Self::Replace {
                old_start, old_end, ..
            } => Some((old_start, old_end)),
            Self::Insert { .. } => None,
        }
    }

    /// Returns the range of lines affected in the new text, if applicable.
    #[must_use]
    pub const fn new_range(&self) -> Option<(usize, usize)> {
        match *self {
            Self::Equal {
                new_start, new_end, ..
            }
            | Self::Insert { new_start, new_end }
            | Self::Replace {
                new_start, new_end, ..
            } => Some((new_start, new_end)),
            Self::Delete { .. } => None,
        }
    }

    /// Returns true if this operation represents a change (not equal).
    #[must_use]
    pub const fn is_change(&self) -> bool {
        !matches!(self, Self::Equal { .. })
    }

    /// Builds the change operation covering the given old/new line ranges.
    ///
    /// Returns `None` when both ranges are absent or empty.
    #[must_use]
    pub fn change(old: Option<(usize, usize)>, new: Option<(usize, usize)>) -> Option<Self> {
        let old = match old {
            Some((s, e)) if e > s => Some((s, e)),
            _ => None,
        };
        let new = match new {
            Some((s, e)) if e > s => Some((s, e)),
            _ => None,
        };
        match (old, new) {
            (Some((old_start, old_end)), Some((new_start, new_end))) => Some(Self::Replace {
                old_start,
                old_end,
                new_start,
                new_end,
            }),
            (Some((old_start, old_end)), None) => Some(Self::Delete { old_start, old_end }),
            (None, Some((new_start, new_end))) => Some(Self::Insert { new_start, new_end }),
            (None, None) => None,
        }
    }
}

/// Trait for line diff algorithms.
///
/// Implementations can use different algorithms (Myers, patience, histogram, etc.)
/// as long as the returned operations walk both inputs front to back without
/// gaps, so that every line of `base` and `target` is covered exactly once.
pub trait DiffAlgorithm: Send + Sync {
    /// Computes the diff between two texts given as lines.
    ///
    /// # Arguments
    ///
    /// * `base` - The first (left) text as lines.
    /// * `target` - The second (right) text as lines.
    ///
    /// # Returns
    ///
    /// A vector of `DiffOp` operations that transform `base` into `target`.
    fn diff(&self, base: &[&str], target: &[&str]) -> Vec<DiffOp>;
}
