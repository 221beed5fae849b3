//! Reduction of line operations into equal and changed text runs.

use serde::{Deserialize, Serialize};

use crate::diff::{DiffAlgorithm, DiffOp, MyersDiff};

/// One segment of the line-level comparison of two texts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiffPart {
    /// A run of lines present identically in both texts.
    Equal {
        /// The shared lines, terminators included.
        text: String,
    },
    /// A run of lines present in only one of the texts.
    ///
    /// At least one side is non-empty.
    Change {
        /// Lines present only in the second text.
        inserted: String,
        /// Lines present only in the first text.
        deleted: String,
    },
}

impl DiffPart {
    /// Returns true for [`DiffPart::Change`].
    #[must_use]
    pub const fn is_change(&self) -> bool {
        matches!(self, Self::Change { .. })
    }

    /// The part as it appears in the first text.
    #[must_use]
    pub fn left_text(&self) -> &str {
        match self {
            Self::Equal { text } => text,
            Self::Change { deleted, .. } => deleted,
        }
    }

    /// The part as it appears in the second text.
    #[must_use]
    pub fn right_text(&self) -> &str {
        match self {
            Self::Equal { text } => text,
            Self::Change { inserted, .. } => inserted,
        }
    }
}

/// Splits text into lines, keeping each line's terminator.
///
/// A trailing fragment without a newline is returned as the last line, so
/// concatenating the result always reproduces `text`.
#[must_use]
pub fn split_lines(text: &str) -> Vec<&str> {
    text.split_inclusive('\n').collect()
}

/// Computes the line-level difference of two texts with [`MyersDiff`].
///
/// # Example
///
/// ```
/// use duplex_differ::{DiffPart, difference};
///
/// let parts = difference("a\nb\nc\n", "a\nx\nc\n");
/// assert_eq!(parts.len(), 3);
/// assert_eq!(
///     parts[1],
///     DiffPart::Change { inserted: "x\n".into(), deleted: "b\n".into() }
/// );
/// ```
#[must_use]
pub fn difference(text1: &str, text2: &str) -> Vec<DiffPart> {
    difference_with(&MyersDiff::new(), text1, text2)
}

/// Computes the line-level difference of two texts with the given algorithm.
///
/// Consecutive common lines form one [`DiffPart::Equal`]; every other line
/// between two common runs lands in a single [`DiffPart::Change`], whatever
/// the interleaving of removed and added lines the algorithm reported.
#[must_use]
pub fn difference_with(algorithm: &dyn DiffAlgorithm, text1: &str, text2: &str) -> Vec<DiffPart> {
    let base = split_lines(text1);
    let target = split_lines(text2);
    let mut parts: Vec<DiffPart> = Vec::new();

    for op in algorithm.diff(&base, &target) {
        if op.is_change() {
            let deleted = op.old_range().map_or_else(String::new, |(s, e)| base[s..e].concat());
            let inserted = op
                .new_range()
                .map_or_else(String::new, |(s, e)| target[s..e].concat());
            if deleted.is_empty() && inserted.is_empty() {
                continue;
            }
            if let Some(DiffPart::Change {
                inserted: ins,
                deleted: del,
            }) = parts.last_mut()
            {
                ins.push_str(&inserted);
                del.push_str(&deleted);
            } else {
                parts.push(DiffPart::Change { inserted, deleted });
            }
        } else if let DiffOp::Equal {
            old_start, old_end, ..
        } = op
        {
            if old_start == old_end {
                continue;
            }
            let text = base[old_start..old_end].concat();
            if let Some(DiffPart::Equal { text: last }) = parts.last_mut() {
                last.push_str(&text);
            } else {
                parts.push(DiffPart::Equal { text });
            }
        }
    }

    parts
}
