//! Duplex kernel - dual-buffer merge sessions.
//!
//! Two documents are diffed line by line, rewritten into aligned form with
//! whitespace placeholders, and then merged region by region in either
//! direction. Hosts plug in their documents through [`buffer::TextBuffer`]
//! and react to the [`session::HostEvent`]s a session queues.

/// Text buffers and char ranges.
pub mod buffer;
/// The `duplex` command line.
pub mod cli;
/// Typed identifiers.
pub mod ids;
/// Infrastructure components (config, telemetry).
pub mod infrastructure;
/// Registry of live sessions keyed by id and document.
pub mod manager;
/// Optional viewport mirroring between the two sides.
pub mod scroll_sync;
/// The merge session state machine.
pub mod session;

pub use buffer::{MemoryBuffer, TextBuffer, TextRange};
pub use ids::{DocumentId, RegionId, SessionId};
pub use manager::SessionManager;
pub use session::{Direction, DiffRegion, HostEvent, MergeSession, SessionError, Side};
