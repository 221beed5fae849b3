//! Session errors - failures surfaced by merge sessions and their registry.

use thiserror::Error;

use super::region::Side;
use crate::buffer::BufferError;
use crate::ids::{DocumentId, RegionId, SessionId};

/// Errors that can occur while creating or driving a merge session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The session ID was not found in the registry.
    #[error("Session not found: {0}")]
    SessionNotFound(SessionId),
    /// A source document has local edits that were never persisted.
    #[error("Document {document} must be saved in order to compare")]
    UnsavedSource {
        /// The unsaved document.
        document: DocumentId,
    },
    /// Both sides of the session would be the same document.
    #[error("Cannot compare document {0} with itself")]
    SameDocument(DocumentId),
    /// The document already belongs to another session.
    #[error("Document {document} is already part of session {session}")]
    DocumentInUse {
        /// The contested document.
        document: DocumentId,
        /// The session holding it.
        session: SessionId,
    },
    /// A buffer refused an edit.
    #[error("Buffer operation failed: {0}")]
    Buffer(#[from] BufferError),
    /// Region bookkeeping would become inconsistent; nothing was changed.
    #[error("Region invariant violated: {0}")]
    Invariant(#[from] InvariantViolation),
}

/// Broken region bookkeeping.
///
/// These never occur for diffs produced by the engine; an operation that
/// detects one is aborted before any buffer is touched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    /// A change part with neither inserted nor deleted text.
    #[error("change part has neither inserted nor deleted text")]
    EmptyChange,
    /// A region range reaches past the end of its buffer.
    #[error("region {region} {side} range {start}..{end} exceeds buffer length {len}")]
    OutOfBounds {
        /// Offending region.
        region: RegionId,
        /// Buffer side.
        side: Side,
        /// Range start.
        start: usize,
        /// Range end.
        end: usize,
        /// Buffer length in chars.
        len: usize,
    },
    /// A region starts before the previous region on the same side ends.
    #[error("region {region} overlaps the preceding region on the {side} side")]
    Unordered {
        /// Offending region.
        region: RegionId,
        /// Buffer side.
        side: Side,
    },
    /// An unresolved region's width fits neither its own nor its counterpart text.
    #[error(
        "region {region} {side} range width {width} matches neither its text ({own} chars) nor its placeholder ({counterpart} chars)"
    )]
    WidthMismatch {
        /// Offending region.
        region: RegionId,
        /// Buffer side.
        side: Side,
        /// Current range width.
        width: usize,
        /// Char length of the side's own text.
        own: usize,
        /// Char length of the other side's text.
        counterpart: usize,
    },
    /// Shifting a region would move it before offset zero.
    #[error("shifting region {region} by {delta} moves it before the start of the {side} buffer")]
    NegativeOffset {
        /// Offending region.
        region: RegionId,
        /// Buffer side.
        side: Side,
        /// Attempted shift.
        delta: isize,
    },
}
