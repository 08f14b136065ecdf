//! Enum and small struct types referenced by `Config` fields.

use serde::{Deserialize, Serialize};

/// How the engine decides whether to activate for a workspace.
///
/// - `auto`: activate only when the workspace manifest declares the configured
///   dependency
/// - `disable`: logged as disabled, but startup still proceeds
/// - `always`: activate unconditionally
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ActivationMode {
    #[default]
    Auto,
    Disable,
    /// Any unrecognised mode string also lands here.
    #[serde(other)]
    Always,
}

impl ActivationMode {
    /// Display name for log output
    pub fn display_name(&self) -> &'static str {
        match self {
            ActivationMode::Auto => "auto",
            ActivationMode::Disable => "disable",
            ActivationMode::Always => "always",
        }
    }
}

/// Visual style applied to rasterized icon artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconStyle {
    /// Fill color written into every generated SVG (any CSS color string)
    #[serde(default = "crate::defaults::icon_color")]
    pub color: String,
}

impl Default for IconStyle {
    fn default() -> Self {
        Self {
            color: crate::defaults::icon_color(),
        }
    }
}

/// Log level configuration.
///
/// Controls the verbosity of log output written to the debug log file.
/// Environment variable `RUST_LOG` and the `--log-level` CLI flag take precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// No logging (log file not created)
    Off,
    /// Errors only
    Error,
    /// Warnings and errors
    Warn,
    /// Informational messages
    #[default]
    Info,
    /// Debug messages
    Debug,
    /// Most verbose
    Trace,
}

impl LogLevel {
    /// Convert to `log::LevelFilter`
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}
