use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ConfigError;
use crate::types::{ActivationMode, IconStyle, LogLevel};

/// Engine configuration.
///
/// Every field carries a serde default so partial YAML files load cleanly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Location of the icon font (http(s) URL, `file://` URL, or local path).
    /// WOFF and WOFF2 containers are decompressed before parsing.
    #[serde(default = "crate::defaults::icon_url")]
    pub icon_url: String,

    /// Location of the stylesheet carrying `.icon-name:before{content:"\hex"}` rules
    #[serde(default = "crate::defaults::style_url")]
    pub style_url: String,

    /// Activation mode
    /// - auto: activate when the workspace manifest declares `manifest_dependency`
    /// - disable: log and continue
    /// - always: activate unconditionally
    #[serde(default = "crate::defaults::mode")]
    pub mode: ActivationMode,

    /// Dependency name looked up in the manifest's `dependencies` under `auto` mode
    #[serde(default = "crate::defaults::manifest_dependency")]
    pub manifest_dependency: String,

    /// Icon artifact styling
    #[serde(default = "crate::defaults::icon_style")]
    pub icon_style: IconStyle,

    /// Editor font size in pixels; decorations are sized to match
    #[serde(default = "crate::defaults::editor_font_size")]
    pub editor_font_size: u32,

    /// Delay between the last document edit and the decoration refresh
    #[serde(default = "crate::defaults::refresh_debounce_ms")]
    pub refresh_debounce_ms: u64,

    /// Override for the artifact storage root (defaults to the platform data dir)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<PathBuf>,

    /// Log verbosity for the debug log file
    #[serde(default = "crate::defaults::log_level")]
    pub log_level: LogLevel,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            icon_url: crate::defaults::icon_url(),
            style_url: crate::defaults::style_url(),
            mode: crate::defaults::mode(),
            manifest_dependency: crate::defaults::manifest_dependency(),
            icon_style: crate::defaults::icon_style(),
            editor_font_size: crate::defaults::editor_font_size(),
            refresh_debounce_ms: crate::defaults::refresh_debounce_ms(),
            cache_dir: None,
            log_level: crate::defaults::log_level(),
        }
    }
}

impl Config {
    /// Check field values that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.editor_font_size == 0 {
            return Err(ConfigError::Validation(
                "editor_font_size must be greater than zero".to_string(),
            ));
        }
        if self.icon_style.color.trim().is_empty() {
            return Err(ConfigError::Validation(
                "icon_style.color must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether switching to `other` requires the font context to be fetched again.
    pub fn font_source_changed(&self, other: &Config) -> bool {
        self.icon_url != other.icon_url || self.style_url != other.style_url
    }
}
