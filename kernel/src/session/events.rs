//! Requests a session sends to its host.
//!
//! The session never draws or scrolls anything itself; it queues these and
//! the host drains them after each operation.

use serde::{Deserialize, Serialize};

use super::region::Side;
use crate::buffer::TextRange;
use crate::ids::RegionId;

/// How a highlighted region should be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HighlightStyle {
    /// Outlined, not the current region.
    Normal,
    /// The region the user is on.
    Selected,
}

/// A request for the host's views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HostEvent {
    /// Draw (or redraw) the highlight keyed by `region` on one side.
    Highlight {
        /// Highlight key.
        region: RegionId,
        /// Buffer to draw in.
        side: Side,
        /// Covered chars.
        range: TextRange,
        /// Drawing style.
        style: HighlightStyle,
    },
    /// Remove the highlight keyed by `region` from both sides.
    ClearHighlight {
        /// Highlight key.
        region: RegionId,
    },
    /// Bring `range` of one buffer into view.
    ScrollTo {
        /// Buffer to scroll.
        side: Side,
        /// Range that must be visible.
        range: TextRange,
    },
}
