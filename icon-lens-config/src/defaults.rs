//! Default value functions for configuration.
//!
//! Each function is used as a `#[serde(default = "crate::defaults::...")]`
//! attribute on a `Config` field, and by `Config::default()`.

use crate::types::{ActivationMode, IconStyle, LogLevel};

pub fn icon_url() -> String {
    String::new()
}

pub fn style_url() -> String {
    String::new()
}

pub fn mode() -> ActivationMode {
    ActivationMode::Auto
}

pub fn manifest_dependency() -> String {
    "@dao-style/core".to_string()
}

pub fn icon_style() -> IconStyle {
    IconStyle::default()
}

pub fn icon_color() -> String {
    "#ccc".to_string()
}

pub fn editor_font_size() -> u32 {
    14
}

pub fn refresh_debounce_ms() -> u64 {
    500 // Coalesce typing bursts into one refresh
}

pub fn log_level() -> LogLevel {
    LogLevel::Info
}
