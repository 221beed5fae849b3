//! Configuration management for duplex.
//!
//! Settings are layered: built-in defaults, then an optional file, then
//! `DUPLEX__`-prefixed environment variables (`__` separates nested keys,
//! e.g. `DUPLEX__MERGE__PLACEHOLDER_FILL=.`).
//!
//! # Example
//!
//! ```
//! use duplex_kernel::infrastructure::config::Settings;
//!
//! let settings = Settings::new().expect("Failed to load configuration");
//! assert_eq!(settings.merge.placeholder_fill, ' ');
//! ```

pub mod merge;
pub mod scroll_sync;
pub mod telemetry;

pub use merge::MergeSettings;
pub use scroll_sync::ScrollSyncSettings;
pub use telemetry::TelemetrySettings;

use std::path::Path;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Settings {
    /// Merge session settings.
    #[serde(default)]
    pub merge: MergeSettings,
    /// Scroll synchronization settings.
    #[serde(default)]
    pub scroll_sync: ScrollSyncSettings,
    /// Logging settings.
    #[serde(default)]
    pub telemetry: TelemetrySettings,
}

impl Settings {
    /// Creates a new settings instance from environment variables and defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be built or deserialized.
    pub fn new() -> Result<Self, ConfigError> {
        Self::load(None)
    }

    /// Like [`Settings::new`], with `path` layered between the defaults and
    /// the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or malformed, or if the
    /// merged configuration cannot be deserialized.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("scroll_sync.enabled", false)?
            .set_default("scroll_sync.interval_ms", 50)?
            .set_default("telemetry.log_level", "info")?
            .set_default("telemetry.json", false)?;

        if let Some(path) = path {
            builder = builder.add_source(File::from(path.to_path_buf()).required(true));
        }

        builder
            .add_source(Environment::with_prefix("DUPLEX").separator("__"))
            .build()?
            .try_deserialize()
    }
}
