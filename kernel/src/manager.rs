//! Registry of live merge sessions.
//!
//! Hosts report document lifecycle events by [`DocumentId`]; the manager
//! finds the owning session and forwards them to the matching hook.

use std::collections::HashMap;

use tracing::{debug, info, instrument, warn};

use crate::buffer::{MemoryBuffer, TextBuffer};
use crate::ids::{DocumentId, SessionId};
use crate::infrastructure::config::MergeSettings;
use crate::session::{MergeSession, SessionError, Side};

/// A session plus which of its sources the host has finished loading.
#[derive(Debug)]
struct SessionEntry<B: TextBuffer> {
    session: MergeSession<B>,
    left_loaded: bool,
    right_loaded: bool,
}

impl<B: TextBuffer> SessionEntry<B> {
    fn side_of(&self, document: DocumentId) -> Option<Side> {
        [Side::Left, Side::Right]
            .into_iter()
            .find(|&side| self.session.buffer(side).id() == document)
    }
}

/// Owns every merge session, keyed by [`SessionId`].
#[derive(Debug)]
pub struct SessionManager<B: TextBuffer = MemoryBuffer> {
    sessions: HashMap<SessionId, SessionEntry<B>>,
    documents: HashMap<DocumentId, SessionId>,
    settings: MergeSettings,
}

impl<B: TextBuffer> SessionManager<B> {
    /// Creates an empty registry whose sessions use `settings`.
    #[must_use]
    pub fn new(settings: &MergeSettings) -> Self {
        Self {
            sessions: HashMap::new(),
            documents: HashMap::new(),
            settings: settings.clone(),
        }
    }

    /// Registers a session comparing `left` with `right`.
    ///
    /// The diff is not loaded yet; report each document through
    /// [`SessionManager::on_source_loaded`] once the host has it ready.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Both buffers are the same document
    /// - Either buffer has edits that were never persisted
    /// - Either document already belongs to another session
    #[instrument(skip(self, left, right), fields(left = %left.id(), right = %right.id()))]
    pub fn begin_session(&mut self, left: B, right: B) -> Result<SessionId, SessionError> {
        if left.id() == right.id() {
            return Err(SessionError::SameDocument(left.id()));
        }
        for buffer in [&left, &right] {
            if buffer.is_modified() {
                return Err(SessionError::UnsavedSource {
                    document: buffer.id(),
                });
            }
            if let Some(&session) = self.documents.get(&buffer.id()) {
                return Err(SessionError::DocumentInUse {
                    document: buffer.id(),
                    session,
                });
            }
        }

        let id = SessionId::new();
        self.documents.insert(left.id(), id);
        self.documents.insert(right.id(), id);
        self.sessions.insert(
            id,
            SessionEntry {
                session: MergeSession::with_settings(left, right, &self.settings),
                left_loaded: false,
                right_loaded: false,
            },
        );
        info!(session = %id, "merge session registered");
        Ok(id)
    }

    /// Records that `document` finished loading.
    ///
    /// Once both sources of a session are loaded the diff is computed.
    /// Returns true if this call loaded the diff. Unknown documents are
    /// ignored.
    ///
    /// # Errors
    ///
    /// See [`MergeSession::load_diff`].
    #[instrument(skip(self))]
    pub fn on_source_loaded(&mut self, document: DocumentId) -> Result<bool, SessionError> {
        let Some(entry) = self.entry_for(document) else {
            debug!("document is not part of a session");
            return Ok(false);
        };
        match entry.side_of(document) {
            Some(Side::Left) => entry.left_loaded = true,
            Some(Side::Right) => entry.right_loaded = true,
            None => return Ok(false),
        }
        if !(entry.left_loaded && entry.right_loaded) {
            return Ok(false);
        }
        entry.session.on_both_sources_ready()?;
        Ok(true)
    }

    /// Drops unmerged placeholders from `document` before the host saves it.
    ///
    /// Returns how many regions were rewritten; 0 for unknown documents.
    ///
    /// # Errors
    ///
    /// See [`MergeSession::abandon_unmerged_diffs`].
    #[instrument(skip(self))]
    pub fn on_before_persist(&mut self, document: DocumentId) -> Result<usize, SessionError> {
        let Some(entry) = self.entry_for(document) else {
            return Ok(0);
        };
        match entry.side_of(document) {
            Some(side) => entry.session.on_before_persist(side),
            None => Ok(0),
        }
    }

    /// Tears down the session owning `document` and hands it back, so the
    /// host can collect the final highlight clears and its buffers.
    #[instrument(skip(self))]
    pub fn on_closed(&mut self, document: DocumentId) -> Option<MergeSession<B>> {
        let id = self.documents.get(&document).copied()?;
        let Some(mut entry) = self.sessions.remove(&id) else {
            warn!(session = %id, "document mapped to a missing session");
            self.documents.remove(&document);
            return None;
        };
        for side in [Side::Left, Side::Right] {
            self.documents.remove(&entry.session.buffer(side).id());
        }
        entry.session.on_closed();
        info!(session = %id, "merge session removed");
        Some(entry.session)
    }

    /// Looks up a session.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::SessionNotFound`] for unknown ids.
    pub fn session(&self, id: SessionId) -> Result<&MergeSession<B>, SessionError> {
        self.sessions
            .get(&id)
            .map(|entry| &entry.session)
            .ok_or(SessionError::SessionNotFound(id))
    }

    /// Looks up a session for driving it.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::SessionNotFound`] for unknown ids.
    pub fn session_mut(&mut self, id: SessionId) -> Result<&mut MergeSession<B>, SessionError> {
        self.sessions
            .get_mut(&id)
            .map(|entry| &mut entry.session)
            .ok_or(SessionError::SessionNotFound(id))
    }

    /// The session `document` belongs to, if any.
    #[must_use]
    pub fn session_for(&self, document: DocumentId) -> Option<SessionId> {
        self.documents.get(&document).copied()
    }

    /// Number of registered sessions.
    #[must_use]
    pub fn active_session_count(&self) -> usize {
        self.sessions.len()
    }

    fn entry_for(&mut self, document: DocumentId) -> Option<&mut SessionEntry<B>> {
        let id = self.documents.get(&document)?;
        self.sessions.get_mut(id)
    }
}
