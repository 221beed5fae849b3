//! Text buffers a merge session reads from and writes into.
//!
//! Offsets are counted in chars (Unicode scalar values), not bytes, so a
//! placeholder built char-for-char from a text always has the same width as
//! that text.

use std::borrow::Cow;
use std::ops::Range;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ids::DocumentId;

/// Errors raised by buffer mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BufferError {
    /// The document is protected against edits.
    #[error("Document {0} is read-only")]
    ReadOnly(DocumentId),
    /// The range does not fit inside the document.
    #[error("Range {start}..{end} is outside document {document} of length {len}")]
    OutOfBounds {
        /// Document that was addressed.
        document: DocumentId,
        /// Requested start offset.
        start: usize,
        /// Requested end offset.
        end: usize,
        /// Current length of the document in chars.
        len: usize,
    },
}

/// Half-open char range `start..end` inside a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TextRange {
    /// First char offset (inclusive).
    pub start: usize,
    /// Last char offset (exclusive).
    pub end: usize,
}

impl TextRange {
    /// Creates a range; `end` is clamped so the range is never inverted.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        if end < start {
            Self { start, end: start }
        } else {
            Self { start, end }
        }
    }

    /// Creates a range of `len` chars starting at `start`.
    #[must_use]
    pub const fn at(start: usize, len: usize) -> Self {
        Self {
            start,
            end: start + len,
        }
    }

    /// Width of the range in chars.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns true if the range covers no chars.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Moves the range by `delta` chars, keeping its width.
    ///
    /// Returns `None` if the start would become negative.
    #[must_use]
    pub const fn shifted(self, delta: isize) -> Option<Self> {
        match self.start.checked_add_signed(delta) {
            Some(start) => Some(Self::at(start, self.len())),
            None => None,
        }
    }
}

impl From<Range<usize>> for TextRange {
    fn from(range: Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}

/// A host document a merge session can drive.
///
/// The `modified` flag is owned by the caller: replacing text does not touch
/// it. A session marks its buffers unmodified after loading a diff (scratch
/// state) and marks a buffer modified once a merge has written into it.
pub trait TextBuffer {
    /// Stable identity of the document.
    fn id(&self) -> DocumentId;

    /// Full content of the document.
    fn text(&self) -> Cow<'_, str>;

    /// Length of the document in chars.
    fn len_chars(&self) -> usize;

    /// Copies the text inside `range`.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::OutOfBounds`] if the range exceeds the document.
    fn slice(&self, range: TextRange) -> Result<String, BufferError>;

    /// Replaces the text inside `range` with `text`.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::ReadOnly`] if the document is read-only and
    /// [`BufferError::OutOfBounds`] if the range exceeds the document.
    fn replace(&mut self, range: TextRange, text: &str) -> Result<(), BufferError>;

    /// Whether edits are currently refused.
    fn is_read_only(&self) -> bool;

    /// Toggles edit protection.
    fn set_read_only(&mut self, read_only: bool);

    /// Whether the document has changes that were not persisted.
    fn is_modified(&self) -> bool;

    /// Sets the persistence state of the document.
    fn set_modified(&mut self, modified: bool);

    /// Removes the text inside `range`.
    ///
    /// # Errors
    ///
    /// Same as [`TextBuffer::replace`].
    fn erase(&mut self, range: TextRange) -> Result<(), BufferError> {
        self.replace(range, "")
    }

    /// Appends `text` at the end and returns the range it now occupies.
    ///
    /// # Errors
    ///
    /// Same as [`TextBuffer::replace`].
    fn append(&mut self, text: &str) -> Result<TextRange, BufferError> {
        let start = self.len_chars();
        self.replace(TextRange::at(start, 0), text)?;
        Ok(TextRange::at(start, text.chars().count()))
    }

    /// Removes all text.
    ///
    /// # Errors
    ///
    /// Same as [`TextBuffer::replace`].
    fn clear(&mut self) -> Result<(), BufferError> {
        let len = self.len_chars();
        self.erase(TextRange::at(0, len))
    }
}

/// Runs `edit` with read-only protection lifted, then restores the previous flag.
pub fn with_writable<B, R>(buffer: &mut B, edit: impl FnOnce(&mut B) -> R) -> R
where
    B: TextBuffer + ?Sized,
{
    let was_read_only = buffer.is_read_only();
    buffer.set_read_only(false);
    let result = edit(buffer);
    buffer.set_read_only(was_read_only);
    result
}

/// In-memory [`TextBuffer`].
#[derive(Debug, Clone)]
pub struct MemoryBuffer {
    id: DocumentId,
    text: String,
    chars: usize,
    read_only: bool,
    modified: bool,
}

impl MemoryBuffer {
    /// Creates a writable, unmodified buffer holding `text`.
    #[must_use]
    pub fn new(id: DocumentId, text: impl Into<String>) -> Self {
        let text = text.into();
        let chars = text.chars().count();
        Self {
            id,
            text,
            chars,
            read_only: false,
            modified: false,
        }
    }

    /// Returns the content as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Consumes the buffer, returning its content.
    #[must_use]
    pub fn into_string(self) -> String {
        self.text
    }

    fn byte_range(&self, range: TextRange) -> Result<Range<usize>, BufferError> {
        if range.end > self.chars || range.start > range.end {
            return Err(BufferError::OutOfBounds {
                document: self.id,
                start: range.start,
                end: range.end,
                len: self.chars,
            });
        }
        let mut boundaries = self
            .text
            .char_indices()
            .map(|(byte, _)| byte)
            .chain(std::iter::once(self.text.len()));
        let start = boundaries.nth(range.start).unwrap_or(self.text.len());
        let end = if range.is_empty() {
            start
        } else {
            boundaries.nth(range.len() - 1).unwrap_or(self.text.len())
        };
        Ok(start..end)
    }
}

impl TextBuffer for MemoryBuffer {
    fn id(&self) -> DocumentId {
        self.id
    }

    fn text(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.text)
    }

    fn len_chars(&self) -> usize {
        self.chars
    }

    fn slice(&self, range: TextRange) -> Result<String, BufferError> {
        let bytes = self.byte_range(range)?;
        Ok(self.text[bytes].to_string())
    }

    fn replace(&mut self, range: TextRange, text: &str) -> Result<(), BufferError> {
        if self.read_only {
            return Err(BufferError::ReadOnly(self.id));
        }
        let bytes = self.byte_range(range)?;
        self.text.replace_range(bytes, text);
        self.chars = self.chars - range.len() + text.chars().count();
        Ok(())
    }

    fn is_read_only(&self) -> bool {
        self.read_only
    }

    fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    fn is_modified(&self) -> bool {
        self.modified
    }

    fn set_modified(&mut self, modified: bool) {
        self.modified = modified;
    }
}
