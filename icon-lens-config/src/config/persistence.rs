//! Config persistence and path resolution methods for `Config`.
//!
//! Covers:
//! - `load` / `load_from` / `save` / `save_to` (YAML file I/O with atomic write)
//! - XDG-style path helpers (`config_path`, `config_dir`)
//! - Artifact storage root resolution (`storage_root`)

use super::config_struct::Config;
use crate::error::ConfigError;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Application directory name used under the platform config and data dirs.
pub const APP_DIR_NAME: &str = "icon-lens";

impl Config {
    /// Load configuration from the default path, creating it with defaults if missing.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from `path`, creating it with defaults if missing.
    pub fn load_from(path: &Path) -> Result<Self> {
        log::info!("Config path: {:?}", path);

        if path.exists() {
            log::info!("Loading existing config from {:?}", path);
            let contents = fs::read_to_string(path)
                .map_err(ConfigError::from)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            let config: Config = serde_yaml_ng::from_str(&contents)
                .map_err(ConfigError::from)
                .with_context(|| format!("Failed to parse config {}", path.display()))?;
            config.validate()?;
            Ok(config)
        } else {
            log::info!("Config file not found, creating default at {:?}", path);
            let config = Self::default();
            if let Err(e) = config.save_to(path) {
                log::error!("Failed to save default config: {}", e);
                return Err(e);
            }
            log::info!("Default config created successfully");
            Ok(config)
        }
    }

    /// Save configuration to the default path.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    /// Save configuration to `path`.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let yaml = serde_yaml_ng::to_string(self).map_err(ConfigError::from)?;

        // Atomic save: write to temp file then rename to prevent corruption on crash
        let temp_path = path.with_extension("yaml.tmp");
        fs::write(&temp_path, &yaml).map_err(ConfigError::from)?;
        fs::rename(&temp_path, path).map_err(ConfigError::from)?;

        Ok(())
    }

    /// Get the configuration file path (using XDG convention)
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.yaml")
    }

    /// Get the configuration directory path (using XDG convention)
    pub fn config_dir() -> PathBuf {
        #[cfg(target_os = "windows")]
        {
            if let Some(config_dir) = dirs::config_dir() {
                config_dir.join(APP_DIR_NAME)
            } else {
                PathBuf::from(".")
            }
        }
        #[cfg(not(target_os = "windows"))]
        {
            // ~/.config/icon-lens on all Unix platforms, including macOS
            if let Some(home_dir) = dirs::home_dir() {
                home_dir.join(".config").join(APP_DIR_NAME)
            } else {
                PathBuf::from(".")
            }
        }
    }

    /// Root directory under which rasterized icon artifacts are stored.
    ///
    /// `cache_dir` wins when set; otherwise the platform data dir is used.
    pub fn storage_root(&self) -> PathBuf {
        if let Some(dir) = &self.cache_dir {
            return dir.clone();
        }
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR_NAME))
            .unwrap_or_else(|| std::env::temp_dir().join(APP_DIR_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ActivationMode;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_creates_default() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("nested").join("config.yaml");

        let config = Config::load_from(&path).expect("load should create default");
        assert_eq!(config, Config::default());
        assert!(path.exists(), "default config should be written");
    }

    #[test]
    fn test_save_then_load() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("config.yaml");

        let config = Config {
            icon_url: "https://cdn.example.com/font.woff2".to_string(),
            mode: ActivationMode::Always,
            editor_font_size: 18,
            cache_dir: Some(temp_dir.path().join("artifacts")),
            ..Config::default()
        };
        config.save_to(&path).expect("save should succeed");
        assert!(!path.with_extension("yaml.tmp").exists());

        let loaded = Config::load_from(&path).expect("load should succeed");
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_invalid_yaml_is_parse_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("config.yaml");
        fs::write(&path, "icon_url: [unterminated\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("config.yaml");
        fs::write(&path, "editor_font_size: 0\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_storage_root_override() {
        let config = Config {
            cache_dir: Some(PathBuf::from("/var/cache/icons")),
            ..Config::default()
        };
        assert_eq!(config.storage_root(), PathBuf::from("/var/cache/icons"));
    }

    #[test]
    fn test_storage_root_default_ends_with_app_dir() {
        let root = Config::default().storage_root();
        assert!(root.ends_with(APP_DIR_NAME));
    }
}
