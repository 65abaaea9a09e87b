//! Dialect configuration for statement rendering.
//!
//! Dialect behavior is injected, never detected: pick a preset or deserialize a
//! [`Config`] from the host application's settings.

use serde::{Deserialize, Serialize};

/// Rendering options for one SQL dialect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Identifier quote string. Empty disables quoting.
    pub escape_char: String,
    /// Parameter marker text (`?`, `$`, `@p`, ...).
    pub placeholder: String,
    /// Append an incrementing ordinal to every marker (`$1`, `$2`, ...).
    pub ordinal: bool,
    /// Render `DEFAULT VALUES` for an insert without columns.
    pub insert_default_values: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self::mysql()
    }
}

impl Config {
    /// Create a new configuration with defaults (MySQL rendering).
    pub fn new() -> Self {
        Self::default()
    }

    /// Backtick quoting, `?` markers.
    pub fn mysql() -> Self {
        Self {
            escape_char: "`".to_string(),
            placeholder: "?".to_string(),
            ordinal: false,
            insert_default_values: false,
        }
    }

    /// Double-quote quoting, `$1, $2, ...` markers.
    pub fn postgres() -> Self {
        Self {
            escape_char: "\"".to_string(),
            placeholder: "$".to_string(),
            ordinal: true,
            insert_default_values: true,
        }
    }

    /// Double-quote quoting, `?` markers.
    pub fn sqlite() -> Self {
        Self {
            escape_char: "\"".to_string(),
            placeholder: "?".to_string(),
            ordinal: false,
            insert_default_values: true,
        }
    }

    /// Set the identifier quote string (empty disables quoting).
    pub fn escape_char(mut self, escape_char: impl Into<String>) -> Self {
        self.escape_char = escape_char.into();
        self
    }

    /// Set the parameter marker text.
    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Switch between numbered and fixed parameter markers.
    pub fn ordinal(mut self, ordinal: bool) -> Self {
        self.ordinal = ordinal;
        self
    }

    /// Allow `DEFAULT VALUES` for an insert without columns.
    pub fn insert_default_values(mut self, enabled: bool) -> Self {
        self.insert_default_values = enabled;
        self
    }
}
