//! Dual-buffer merge sessions.
//!
//! A [`MergeSession`] owns a left and a right buffer. Loading the diff
//! rewrites both buffers so that every difference sits at a known range on
//! each side, padding the side without real text with a placeholder. The
//! user then walks the regions and copies content across until nothing is
//! left, or persists a side, which first drops that side's placeholders.

mod errors;
mod events;
mod layout;
mod placeholder;
mod region;


pub use errors::{InvariantViolation, SessionError};
pub use events::{HighlightStyle, HostEvent};
pub use placeholder::Placeholder;
pub use region::{DiffRegion, Direction, Side};

use duplex_differ::{DiffPart, difference};
use tracing::{debug, info, instrument, warn};

use crate::buffer::{MemoryBuffer, TextBuffer, TextRange, with_writable};
use crate::ids::RegionId;
use crate::infrastructure::config::MergeSettings;

/// Lifecycle of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Created; buffers still hold the raw source documents.
    AwaitingSources,
    /// Diff loaded; navigation, merge and abandon are live.
    Active,
    /// Torn down; every operation is a no-op.
    Closed,
}

/// A two-way merge over one pair of documents.
#[derive(Debug)]
pub struct MergeSession<B: TextBuffer = MemoryBuffer> {
    left: B,
    right: B,
    regions: Vec<DiffRegion>,
    current: Option<usize>,
    next_region: usize,
    placeholder: Placeholder,
    state: SessionState,
    events: Vec<HostEvent>,
}

impl<B: TextBuffer> MergeSession<B> {
    /// Creates a session over two documents with the default placeholder.
    #[must_use]
    pub fn new(left: B, right: B) -> Self {
        Self::with_settings(left, right, &MergeSettings::default())
    }

    /// Creates a session over two documents.
    #[must_use]
    pub fn with_settings(left: B, right: B, settings: &MergeSettings) -> Self {
        Self {
            left,
            right,
            regions: Vec::new(),
            current: None,
            next_region: 0,
            placeholder: Placeholder::new(settings.placeholder_fill),
            state: SessionState::AwaitingSources,
            events: Vec::new(),
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// The buffer on `side`.
    #[must_use]
    pub const fn buffer(&self, side: Side) -> &B {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    fn buffer_mut(&mut self, side: Side) -> &mut B {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    /// Gives the buffers back to the caller.
    #[must_use]
    pub fn into_buffers(self) -> (B, B) {
        (self.left, self.right)
    }

    /// Regions not merged yet, in document order.
    #[must_use]
    pub fn regions(&self) -> &[DiffRegion] {
        &self.regions
    }

    /// Position of the selected region in [`MergeSession::regions`].
    #[must_use]
    pub const fn current_index(&self) -> Option<usize> {
        self.current
    }

    /// The selected region, whose ranges a host keeps in view.
    #[must_use]
    pub fn current_region(&self) -> Option<&DiffRegion> {
        self.current.and_then(|index| self.regions.get(index))
    }

    /// The filler used for sides without real text.
    #[must_use]
    pub const fn placeholder(&self) -> Placeholder {
        self.placeholder
    }

    /// Takes the queued host requests.
    pub fn drain_events(&mut self) -> Vec<HostEvent> {
        std::mem::take(&mut self.events)
    }

    /// Checks every region against both buffers.
    ///
    /// # Errors
    ///
    /// Returns the first inconsistency found.
    pub fn verify(&self) -> Result<(), InvariantViolation> {
        layout::verify_layout(&self.regions, self.left.len_chars(), self.right.len_chars())
    }

    /// Diffs the two documents and rewrites both buffers into aligned form.
    ///
    /// Does nothing unless the session is still awaiting its sources.
    ///
    /// # Errors
    ///
    /// Returns [`InvariantViolation::EmptyChange`] if the diff contains an
    /// empty change, or a buffer error if a document refuses the rewrite.
    /// Buffers are untouched in the first case.
    #[instrument(skip(self), fields(left = %self.left.id(), right = %self.right.id()))]
    pub fn load_diff(&mut self) -> Result<(), SessionError> {
        if self.state != SessionState::AwaitingSources {
            debug!(state = ?self.state, "diff already loaded");
            return Ok(());
        }

        let parts = difference(&self.left.text(), &self.right.text());
        let (left_text, right_text, regions) = self.materialize(parts)?;

        with_writable(&mut self.left, |buffer| {
            buffer.clear()?;
            buffer.append(&left_text)
        })?;
        with_writable(&mut self.right, |buffer| {
            buffer.clear()?;
            buffer.append(&right_text)
        })?;
        for buffer in [&mut self.left, &mut self.right] {
            buffer.set_read_only(true);
            buffer.set_modified(false);
        }

        self.regions = regions;
        self.state = SessionState::Active;
        for index in 0..self.regions.len() {
            self.highlight(index, HighlightStyle::Normal);
        }
        info!(regions = self.regions.len(), "diff loaded");

        self.select_diff(0);
        Ok(())
    }

    /// Lays the parts out as the new left/right texts and their regions.
    fn materialize(
        &mut self,
        parts: Vec<DiffPart>,
    ) -> Result<(String, String, Vec<DiffRegion>), InvariantViolation> {
        let (mut left_text, mut right_text) = (String::new(), String::new());
        let (mut left_len, mut right_len) = (0, 0);
        let mut regions = Vec::new();

        for part in parts {
            match part {
                DiffPart::Equal { text } => {
                    let len = text.chars().count();
                    left_text.push_str(&text);
                    right_text.push_str(&text);
                    left_len += len;
                    right_len += len;
                }
                DiffPart::Change { inserted, deleted } => {
                    if inserted.is_empty() && deleted.is_empty() {
                        return Err(InvariantViolation::EmptyChange);
                    }
                    let left_piece = if deleted.is_empty() {
                        self.placeholder.render(&inserted)
                    } else {
                        deleted.clone()
                    };
                    let right_piece = if inserted.is_empty() {
                        self.placeholder.render(&deleted)
                    } else {
                        inserted.clone()
                    };

                    let left_range = TextRange::at(left_len, left_piece.chars().count());
                    let right_range = TextRange::at(right_len, right_piece.chars().count());
                    left_text.push_str(&left_piece);
                    right_text.push_str(&right_piece);
                    left_len = left_range.end;
                    right_len = right_range.end;

                    let id = RegionId::new(self.next_region);
                    self.next_region += 1;
                    regions.push(DiffRegion::new(
                        id,
                        left_range,
                        right_range,
                        inserted,
                        deleted,
                    ));
                }
            }
        }

        Ok((left_text, right_text, regions))
    }

    /// Selects the region at `index`; out-of-range indices are ignored.
    pub fn select_diff(&mut self, index: usize) {
        if self.state != SessionState::Active || index >= self.regions.len() {
            return;
        }
        if let Some(previous) = self.current.filter(|&p| p < self.regions.len()) {
            self.highlight(previous, HighlightStyle::Normal);
        }

        self.current = Some(index);
        self.highlight(index, HighlightStyle::Selected);
        let region = &self.regions[index];
        let (left, right) = (region.left_range(), region.right_range());
        self.events.push(HostEvent::ScrollTo {
            side: Side::Left,
            range: left,
        });
        self.events.push(HostEvent::ScrollTo {
            side: Side::Right,
            range: right,
        });
    }

    /// Selects the previous region.
    pub fn go_up(&mut self) {
        if let Some(index) = self.current.and_then(|c| c.checked_sub(1)) {
            self.select_diff(index);
        }
    }

    /// Selects the next region, or the first one if nothing is selected.
    pub fn go_down(&mut self) {
        self.select_diff(self.current.map_or(0, |c| c + 1));
    }

    /// Copies the selected region's content in `direction`.
    ///
    /// The chosen text is written over the region on both sides, so both
    /// buffers agree afterwards. The region leaves the list and is returned
    /// marked resolved, with its ranges set to the written text. Regions
    /// after it are shifted by each buffer's length change and the region
    /// now at the same position (or the new last one) is selected.
    ///
    /// Returns `Ok(None)` without doing anything if no unresolved region is
    /// selected.
    ///
    /// # Errors
    ///
    /// Returns an invariant violation, leaving everything untouched, if the
    /// region layout is inconsistent.
    #[instrument(skip(self), fields(region = tracing::field::Empty))]
    pub fn merge(&mut self, direction: Direction) -> Result<Option<DiffRegion>, SessionError> {
        if self.state != SessionState::Active {
            return Ok(None);
        }
        let Some(position) = self.current.filter(|&p| p < self.regions.len()) else {
            debug!("no region selected");
            return Ok(None);
        };
        if self.regions[position].is_resolved() {
            return Ok(None);
        }
        self.verify()?;

        let mut planned = self.regions.clone();
        let mut merged = planned.remove(position);
        tracing::Span::current().record("region", tracing::field::display(merged.id()));

        let content = merged.content(direction.source()).to_owned();
        let width = content.chars().count();
        let (left_old, right_old) = (merged.left_range(), merged.right_range());
        let left_delta = layout::delta(left_old.len(), width);
        let right_delta = layout::delta(right_old.len(), width);

        layout::shift_all(&mut planned[position..], Side::Left, left_delta)?;
        layout::shift_all(&mut planned[position..], Side::Right, right_delta)?;
        let left_len = self.left.len_chars() - left_old.len() + width;
        let right_len = self.right.len_chars() - right_old.len() + width;
        layout::verify_layout(&planned, left_len, right_len)?;

        with_writable(&mut self.left, |buffer| buffer.replace(left_old, &content))?;
        with_writable(&mut self.right, |buffer| buffer.replace(right_old, &content))?;

        merged.set_range(Side::Left, TextRange::at(left_old.start, width));
        merged.set_range(Side::Right, TextRange::at(right_old.start, width));
        merged.mark_resolved();

        self.regions = planned;
        self.buffer_mut(direction.target()).set_modified(true);
        self.events
            .push(HostEvent::ClearHighlight { region: merged.id() });
        self.current = None;
        info!(
            %direction,
            left_delta,
            right_delta,
            remaining = self.regions.len(),
            "region merged"
        );

        if position < self.regions.len() {
            self.select_diff(position);
        } else if let Some(last) = self.regions.len().checked_sub(1) {
            self.select_diff(last);
        }
        Ok(Some(merged))
    }

    /// Drops every placeholder from the buffer on `side` before it is persisted.
    ///
    /// Each unresolved region's range on `side` is overwritten with that
    /// side's own recorded text, so padding disappears and real text is
    /// kept. Later regions are shifted by the running length change in the
    /// same pass. Regions stay in the list and the other buffer is not
    /// touched. Returns how many regions had their text rewritten.
    ///
    /// # Errors
    ///
    /// Returns an invariant violation, leaving everything untouched, if the
    /// region layout is inconsistent.
    #[instrument(skip(self))]
    pub fn abandon_unmerged_diffs(&mut self, side: Side) -> Result<usize, SessionError> {
        if self.state != SessionState::Active {
            return Ok(0);
        }
        self.verify()?;

        let buffer = self.buffer(side);
        let mut planned = self.regions.clone();
        let mut edits: Vec<(TextRange, String)> = Vec::new();
        let (mut running, mut removed, mut added): (isize, usize, usize) = (0, 0, 0);

        for region in &mut planned {
            let shifted =
                region
                    .range(side)
                    .shifted(running)
                    .ok_or(InvariantViolation::NegativeOffset {
                        region: region.id(),
                        side,
                        delta: running,
                    })?;
            let content = region.content(side);
            if region.is_resolved() || buffer.slice(region.range(side))? == content {
                region.set_range(side, shifted);
                continue;
            }

            let width = content.chars().count();
            edits.push((shifted, content.to_owned()));
            region.set_range(side, TextRange::at(shifted.start, width));
            running += layout::delta(shifted.len(), width);
            removed += shifted.len();
            added += width;
        }

        let projected = buffer.len_chars() - removed + added;
        let (left_len, right_len) = match side {
            Side::Left => (projected, self.right.len_chars()),
            Side::Right => (self.left.len_chars(), projected),
        };
        layout::verify_layout(&planned, left_len, right_len)?;

        let rewritten = edits.len();
        with_writable(self.buffer_mut(side), |buffer| {
            edits
                .iter()
                .try_for_each(|(range, content)| buffer.replace(*range, content))
        })?;
        self.regions = planned;

        if rewritten > 0 {
            warn!(%side, rewritten, "unmerged placeholders dropped before persisting");
        }
        Ok(rewritten)
    }

    /// Host hook: both source documents have finished loading.
    ///
    /// # Errors
    ///
    /// See [`MergeSession::load_diff`].
    pub fn on_both_sources_ready(&mut self) -> Result<(), SessionError> {
        self.load_diff()
    }

    /// Host hook: the document on `side` is about to be persisted.
    ///
    /// # Errors
    ///
    /// See [`MergeSession::abandon_unmerged_diffs`].
    pub fn on_before_persist(&mut self, side: Side) -> Result<usize, SessionError> {
        self.abandon_unmerged_diffs(side)
    }

    /// Host hook: one of the documents was closed.
    ///
    /// Clears every highlight, forgets the regions and lifts read-only
    /// protection. Further calls are no-ops.
    pub fn on_closed(&mut self) {
        if self.state == SessionState::Closed {
            return;
        }
        for region in std::mem::take(&mut self.regions) {
            self.events
                .push(HostEvent::ClearHighlight { region: region.id() });
        }
        self.current = None;
        self.left.set_read_only(false);
        self.right.set_read_only(false);
        self.state = SessionState::Closed;
        info!("session closed");
    }

    fn highlight(&mut self, index: usize, style: HighlightStyle) {
        let region = &self.regions[index];
        let (id, left, right) = (region.id(), region.left_range(), region.right_range());
        self.events.push(HostEvent::Highlight {
            region: id,
            side: Side::Left,
            range: left,
            style,
        });
        self.events.push(HostEvent::Highlight {
            region: id,
            side: Side::Right,
            range: right,
            style,
        });
    }
}
