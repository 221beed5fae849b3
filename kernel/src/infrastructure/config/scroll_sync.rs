//! Scroll synchronization configuration.

use std::time::Duration;

use serde::Deserialize;

/// Settings for mirroring viewport positions between the two buffers.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ScrollSyncSettings {
    /// Start the sync task with each session (default: false)
    #[serde(default)]
    pub enabled: bool,

    /// Polling period in milliseconds (default: 50)
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

impl ScrollSyncSettings {
    /// Polling period as a [`Duration`].
    #[must_use]
    pub const fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl Default for ScrollSyncSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            interval_ms: default_interval_ms(),
        }
    }
}

fn default_interval_ms() -> u64 {
    50
}
