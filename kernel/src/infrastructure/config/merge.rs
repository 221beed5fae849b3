//! Merge session configuration.

use serde::Deserialize;

/// Settings applied to every merge session.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct MergeSettings {
    /// Char that replaces non-whitespace in placeholders (default: space)
    #[serde(default = "default_placeholder_fill")]
    pub placeholder_fill: char,
}

impl Default for MergeSettings {
    fn default() -> Self {
        Self {
            placeholder_fill: default_placeholder_fill(),
        }
    }
}

fn default_placeholder_fill() -> char {
    ' '
}
