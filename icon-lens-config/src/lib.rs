//! Configuration system for the icon-lens glyph decoration engine.
//!
//! This crate provides configuration loading, saving, and default values.
//! It includes:
//!
//! - The `Config` struct and its YAML persistence
//! - Activation mode and icon style types
//! - Typed configuration errors
//! - File watching for configuration hot reload

pub mod config;
pub mod defaults;
pub mod error;
mod types;
#[cfg(feature = "watcher")]
pub mod watcher;

// Re-export main types for convenience
pub use config::Config;
pub use error::ConfigError;
pub use types::{ActivationMode, IconStyle, LogLevel};
#[cfg(feature = "watcher")]
pub use watcher::{FileChangeEvent, FileWatcher};
