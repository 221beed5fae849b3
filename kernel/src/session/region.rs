//! Diff regions and the sides/directions they are addressed by.

use core::fmt;
use serde::{Deserialize, Serialize};

use crate::buffer::TextRange;
use crate::ids::RegionId;

/// One of the two buffers of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// The first document; holds deleted text.
    Left,
    /// The second document; holds inserted text.
    Right,
}

impl Side {
    /// The other side.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Left => write!(f, "left"),
            Self::Right => write!(f, "right"),
        }
    }
}

/// Which way a merge copies a region's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Take the left text and write it into the right buffer.
    LeftToRight,
    /// Take the right text and write it into the left buffer.
    RightToLeft,
}

impl Direction {
    /// Side whose content wins.
    #[must_use]
    pub const fn source(self) -> Side {
        match self {
            Self::LeftToRight => Side::Left,
            Self::RightToLeft => Side::Right,
        }
    }

    /// Side whose buffer receives the content.
    #[must_use]
    pub const fn target(self) -> Side {
        self.source().opposite()
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LeftToRight => write!(f, ">>"),
            Self::RightToLeft => write!(f, "<<"),
        }
    }
}

/// A navigable, mergeable difference anchored in both buffers.
///
/// The recorded contents never change after creation; only the ranges move
/// as edits upstream change buffer lengths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffRegion {
    id: RegionId,
    left: TextRange,
    right: TextRange,
    insert_content: String,
    delete_content: String,
    resolved: bool,
}

impl DiffRegion {
    pub(crate) fn new(
        id: RegionId,
        left: TextRange,
        right: TextRange,
        insert_content: String,
        delete_content: String,
    ) -> Self {
        Self {
            id,
            left,
            right,
            insert_content,
            delete_content,
            resolved: false,
        }
    }

    /// Display key of the region.
    #[must_use]
    pub const fn id(&self) -> RegionId {
        self.id
    }

    /// Range of the region in the left buffer.
    #[must_use]
    pub const fn left_range(&self) -> TextRange {
        self.left
    }

    /// Range of the region in the right buffer.
    #[must_use]
    pub const fn right_range(&self) -> TextRange {
        self.right
    }

    /// Range of the region in the buffer on `side`.
    #[must_use]
    pub const fn range(&self, side: Side) -> TextRange {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    /// Text the second document has here (empty for a pure deletion).
    #[must_use]
    pub fn insert_content(&self) -> &str {
        &self.insert_content
    }

    /// Text the first document has here (empty for a pure insertion).
    #[must_use]
    pub fn delete_content(&self) -> &str {
        &self.delete_content
    }

    /// The real text of the document on `side`.
    #[must_use]
    pub fn content(&self, side: Side) -> &str {
        match side {
            Side::Left => &self.delete_content,
            Side::Right => &self.insert_content,
        }
    }

    /// True once the region has been merged.
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        self.resolved
    }

    /// True if the document on `side` had no text of its own in this region
    /// when the diff was computed.
    ///
    /// Says nothing about what the buffer currently shows there: a
    /// placeholder while unmerged, nothing once abandoned.
    #[must_use]
    pub fn lacks_text(&self, side: Side) -> bool {
        self.content(side).is_empty()
    }

    pub(crate) fn set_range(&mut self, side: Side, range: TextRange) {
        match side {
            Side::Left => self.left = range,
            Side::Right => self.right = range,
        }
    }

    pub(crate) fn mark_resolved(&mut self) {
        self.resolved = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_sides() {
        assert_eq!(Direction::RightToLeft.source(), Side::Right);
        assert_eq!(Direction::RightToLeft.target(), Side::Left);
        assert_eq!(Direction::LeftToRight.target(), Side::Right);
    }

    #[test]
    fn content_follows_side() {
        let region = DiffRegion::new(
            RegionId::new(0),
            TextRange::new(0, 2),
            TextRange::new(0, 2),
            "x\n".into(),
            String::new(),
        );
        assert_eq!(region.content(Side::Right), "x\n");
        assert!(region.lacks_text(Side::Left));
        assert!(!region.lacks_text(Side::Right));
    }
}
