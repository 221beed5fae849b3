//! Logging setup.

use anyhow::{Context, Result};
use tracing_subscriber::{
    EnvFilter, Layer, Registry,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use super::config::TelemetrySettings;

/// Builder for the global tracing subscriber.
#[derive(Debug, Clone)]
pub struct TelemetryBuilder {
    log_level: String,
    json: bool,
}

impl TelemetryBuilder {
    /// Starts from `info` level, human-readable output.
    #[must_use]
    pub fn new() -> Self {
        Self {
            log_level: "info".to_string(),
            json: false,
        }
    }

    /// Takes level and format from loaded settings.
    #[must_use]
    pub fn from_settings(settings: &TelemetrySettings) -> Self {
        Self::new()
            .with_log_level(settings.log_level.clone())
            .with_json(settings.json)
    }

    /// Filter used when `RUST_LOG` is not set.
    #[must_use]
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Switches between JSON lines and plain text.
    #[must_use]
    pub const fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.log_level))
    }

    /// Installs the subscriber. Logs go to stderr so command output on
    /// stdout stays clean.
    ///
    /// # Errors
    ///
    /// Returns an error if a global subscriber is already installed.
    pub fn init(self) -> Result<()> {
        let fmt_layer = if self.json {
            fmt::layer()
                .json()
                .with_span_events(FmtSpan::CLOSE)
                .with_writer(std::io::stderr)
                .boxed()
        } else {
            fmt::layer().with_writer(std::io::stderr).boxed()
        };

        Registry::default()
            .with(self.filter())
            .with(fmt_layer)
            .try_init()
            .context("Failed to init subscriber")
    }
}

impl Default for TelemetryBuilder {
    fn default() -> Self {
        Self::new()
    }
}
