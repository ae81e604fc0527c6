//! Configuration to acknowledge reader preferences as well as set defaults.
//!
//! Specifically, we try to find a guidewiki.toml, and if present we load settings from there.
//! This provides the data file location, panel width, focus band and scroll timings.

use crate::scroll_sync::ScrollSettings;
use crate::viewport::FocusBand;
use facet::Facet;
use std::fs;
use std::time::Duration;

const CONFIG_FILE: &str = "guidewiki.toml";

#[derive(Facet, Clone, Debug)]
/// User preferences loaded from guidewiki.toml or falling back to defaults.
pub struct Config {
    #[facet(default = "guides.json".to_string())]
    /// JSON file holding the array of guides.
    pub data_file: String,
    #[facet(default = 32)]
    /// Width of the outline panel in columns.
    pub outline_width: u16,
    #[facet(default = 10)]
    /// Share of the content height ignored at the top when tracking sections, in percent.
    pub focus_top_percent: u16,
    #[facet(default = 70)]
    /// Share of the content height ignored at the bottom when tracking sections, in percent.
    pub focus_bottom_percent: u16,
    #[facet(default = 1)]
    /// Rows kept above a section heading after jumping to it.
    pub scroll_clearance: usize,
    #[facet(default = 300)]
    /// Duration of the smooth scroll to a section, in milliseconds.
    pub scroll_duration_ms: u64,
    #[facet(default = 150)]
    /// Time after a smooth scroll during which tracking cannot move the highlight, in milliseconds.
    pub scroll_grace_ms: u64,
    #[facet(default = 16)]
    /// Event loop tick while idle, in milliseconds.
    pub tick_ms: u64,
    #[facet(default = 32)]
    /// Deepest nesting level rendered before subtrees are elided.
    pub max_depth: usize,
    #[facet(default = None)]
    /// File receiving diagnostic logs. Logging is off when unset.
    pub log_file: Option<String>,
}

impl Config {
    #[must_use]
    /// Load configuration from guidewiki.toml if present.
    ///
    /// A file that fails to parse yields the defaults together with a message
    /// describing the problem, for the caller to report once logging is up.
    pub fn load() -> (Self, Option<String>) {
        match fs::read_to_string(CONFIG_FILE) {
            Ok(contents) => Self::parse(&contents),
            Err(_) => (Self::default(), None),
        }
    }

    #[must_use]
    /// Parses the contents of a config file, falling back to the defaults.
    pub fn parse(contents: &str) -> (Self, Option<String>) {
        match facet_toml::from_str::<Self>(contents) {
            Ok(config) => (config, None),
            Err(e) => (
                Self::default(),
                Some(format!("ignoring invalid {CONFIG_FILE}: {e}")),
            ),
        }
    }

    #[must_use]
    /// Focus band described by the configured insets.
    pub fn focus_band(&self) -> FocusBand {
        FocusBand {
            top_percent: self.focus_top_percent,
            bottom_percent: self.focus_bottom_percent,
        }
    }

    #[must_use]
    /// Scroll behaviour described by the configured clearance and timings.
    pub fn scroll_settings(&self) -> ScrollSettings {
        ScrollSettings {
            clearance: self.scroll_clearance,
            duration: Duration::from_millis(self.scroll_duration_ms),
            grace: Duration::from_millis(self.scroll_grace_ms),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: "guides.json".to_string(),
            outline_width: 32,
            focus_top_percent: 10,
            focus_bottom_percent: 70,
            scroll_clearance: 1,
            scroll_duration_ms: 300,
            scroll_grace_ms: 150,
            tick_ms: 16,
            max_depth: 32,
            log_file: None,
        }
    }
}

#[cfg(test)]
#[path = "tests/config.rs"]
mod tests;
