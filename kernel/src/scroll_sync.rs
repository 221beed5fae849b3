//! Viewport mirroring between the two buffers of a session.
//!
//! Hosts rarely report scroll events, so the two viewports are polled: each
//! [`ScrollSync::tick`] compares both positions with the last seen ones and
//! copies whichever side moved onto the other. [`spawn`] runs that on a tokio
//! interval until cancelled.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::oneshot;
use tokio::task::{JoinError, JoinHandle};
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, trace};

use crate::infrastructure::config::ScrollSyncSettings;
use crate::session::Side;

/// Scroll offset of a view.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewportPosition {
    /// Horizontal offset.
    pub x: f64,
    /// Vertical offset.
    pub y: f64,
}

impl ViewportPosition {
    /// Creates a position.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A host view whose scroll position can be read and set.
pub trait Viewport: Send {
    /// Current scroll offset.
    fn position(&self) -> ViewportPosition;

    /// Scrolls the view to `position`.
    fn set_position(&mut self, position: ViewportPosition);

    /// False once the view has been closed; the sync task stops then.
    fn is_attached(&self) -> bool {
        true
    }
}

/// Last positions seen on each side.
#[derive(Debug, Clone, Default)]
pub struct ScrollSync {
    last_left: Option<ViewportPosition>,
    last_right: Option<ViewportPosition>,
}

impl ScrollSync {
    /// Creates a synchronizer that has seen nothing yet; the first tick
    /// aligns the right view with the left one.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Polls both views once and returns the side that was moved, if any.
    ///
    /// The left view wins when both moved since the last tick.
    pub fn tick<L, R>(&mut self, left: &mut L, right: &mut R) -> Option<Side>
    where
        L: Viewport + ?Sized,
        R: Viewport + ?Sized,
    {
        let (left_pos, right_pos) = (left.position(), right.position());
        if self.last_left != Some(left_pos) {
            self.last_left = Some(left_pos);
            self.last_right = Some(left_pos);
            if right_pos == left_pos {
                return None;
            }
            right.set_position(left_pos);
            Some(Side::Right)
        } else if self.last_right != Some(right_pos) {
            self.last_left = Some(right_pos);
            self.last_right = Some(right_pos);
            left.set_position(right_pos);
            Some(Side::Left)
        } else {
            None
        }
    }

    /// One locked tick; false if either view is gone.
    fn step<L, R>(&mut self, left: &Mutex<L>, right: &Mutex<R>) -> bool
    where
        L: Viewport,
        R: Viewport,
    {
        let mut left = left.lock();
        let mut right = right.lock();
        if !(left.is_attached() && right.is_attached()) {
            return false;
        }
        if let Some(side) = self.tick(&mut *left, &mut *right) {
            trace!(%side, "viewport mirrored");
        }
        true
    }
}

/// Handle to a running scroll sync task.
///
/// Dropping the handle also stops the task.
#[derive(Debug)]
#[must_use = "dropping the handle stops the scroll sync task"]
pub struct ScrollSyncHandle {
    cancel: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl ScrollSyncHandle {
    /// True once the task has exited (cancelled or a view detached).
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stops the task and waits for it to exit.
    ///
    /// # Errors
    ///
    /// Returns the join error if the task panicked.
    pub async fn stop(self) -> Result<(), JoinError> {
        // The task may already be gone; a failed send is fine.
        let _ = self.cancel.send(());
        self.task.await
    }
}

/// Mirrors `left` and `right` every `period` on the current tokio runtime.
///
/// # Panics
///
/// Panics if called outside a tokio runtime or with a zero `period`.
pub fn spawn<L, R>(left: Arc<Mutex<L>>, right: Arc<Mutex<R>>, period: Duration) -> ScrollSyncHandle
where
    L: Viewport + 'static,
    R: Viewport + 'static,
{
    let (cancel, mut cancelled) = oneshot::channel::<()>();
    let task = tokio::spawn(async move {
        let mut sync = ScrollSync::new();
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            tokio::select! {
                _ = &mut cancelled => {
                    debug!("scroll sync cancelled");
                    break;
                }
                _ = ticker.tick() => {
                    if !sync.step(&left, &right) {
                        debug!("viewport detached, scroll sync stopped");
                        break;
                    }
                }
            }
        }
    });
    ScrollSyncHandle { cancel, task }
}

/// Starts [`spawn`] with the configured period, or nothing if scroll sync
/// is disabled.
pub fn spawn_configured<L, R>(
    settings: &ScrollSyncSettings,
    left: Arc<Mutex<L>>,
    right: Arc<Mutex<R>>,
) -> Option<ScrollSyncHandle>
where
    L: Viewport + 'static,
    R: Viewport + 'static,
{
    if !settings.enabled || settings.interval_ms == 0 {
        debug!(enabled = settings.enabled, "scroll sync not started");
        return None;
    }
    Some(spawn(left, right, settings.interval()))
}
