//! Configuration to acknowledge reader preferences as well as set defaults.
//!
//! Specifically, we try to find a folio.toml, and if present we load settings from there.
//! This provides the content location, header height, jump settle window and file locations.
//! Display preferences (colours, spacing) are not configuration: they live in
//! [`crate::theme::Preferences`] and are changed from inside the reader.

use crate::error::ConfigError;
use facet::Facet;
use std::path::Path;
use std::time::Duration;
use std::{fs, io};

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE: &str = "folio.toml";

#[derive(Facet, Clone, Debug)]
/// Reader configuration loaded from folio.toml or falling back to defaults.
pub struct Config {
    #[facet(default = "json".to_string())]
    /// Directory holding the `<NNN>.json` paper documents.
    pub content_dir: String,
    #[facet(default = 2)]
    /// Rows taken by the sticky header above the text.
    pub header_offset: i64,
    #[facet(default = 500)]
    /// Milliseconds after a jump during which the jump target stays active.
    pub settle_window_ms: u64,
    #[facet(default = "folio-settings.json".to_string())]
    /// File where display preferences are persisted; empty disables persistence.
    pub settings_path: String,
    #[facet(default = String::new())]
    /// File receiving log output; empty disables logging.
    pub log_file: String,
    #[facet(default = 1)]
    /// Rows moved per scroll key press.
    pub scroll_step: usize,
}

impl Config {
    /// Load configuration from folio.toml if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    /// Load configuration from `path`, using defaults if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(contents) => Self::from_toml(&contents),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Self::from_toml(""),
            Err(source) => Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Parse configuration TOML, filling in defaults for missing keys.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid configuration.
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        facet_toml::from_str::<Self>(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    #[must_use]
    /// Settle window as a duration.
    pub fn settle_window(&self) -> Duration {
        Duration::from_millis(self.settle_window_ms)
    }
}

#[cfg(test)]
#[path = "tests/config.rs"]
mod tests;
