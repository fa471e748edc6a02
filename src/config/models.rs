use crate::common::error::{PollError, Result};
use crate::config::validator::validate_options;
use serde::Deserialize;
use std::fs;

/// Poller construction options.
///
/// Every field has a default, so an empty document is a valid options file;
/// embedders typically carry these as a table inside a larger config.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PollerOptions {
    /// Initial record-table capacity, in records. Defaults to however many
    /// records fit one allocation-granularity chunk.
    #[serde(default)]
    pub size_hint_records: Option<usize>,

    /// Override for the buffer-growth rounding unit, in bytes. Defaults to
    /// the page size reported by the host.
    #[serde(default)]
    pub allocation_granularity: Option<usize>,

    /// Set when the host is known to suppress disconnect notifications for
    /// indefinite-timeout waits on stream sockets; enables the advisory.
    #[serde(default)]
    pub unreliable_disconnect_events: bool,
}

impl PollerOptions {
    /// Parse and validate options from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let options: PollerOptions = toml::from_str(content)
            .map_err(|e| PollError::Options(format!("Failed to parse options: {}", e)))?;
        validate_options(&options)?;
        Ok(options)
    }

    /// Parse and validate options from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            PollError::Options(format!("Failed to read options file '{}': {}", path, e))
        })?;
        Self::from_toml_str(&content)
    }
}
