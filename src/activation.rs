//! Workspace activation gate.
//!
//! In `auto` mode the engine only runs for workspaces whose `package.json`
//! lists the configured dependency.

use std::path::Path;

use anyhow::{Context, Result};
use icon_lens_config::{ActivationMode, Config};

/// Manifest file looked up in the workspace root.
pub const MANIFEST_FILE: &str = "package.json";

/// Result of the activation check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    Active,
    /// Inactive, with the reason that was logged.
    Inactive(String),
}

impl Activation {
    pub fn is_active(&self) -> bool {
        matches!(self, Activation::Active)
    }
}

/// Decide whether the engine should run for `workspace`.
pub fn check_activation(config: &Config, workspace: &Path) -> Activation {
    match config.mode {
        ActivationMode::Auto => {
            let manifest = workspace.join(MANIFEST_FILE);
            match manifest_declares(&manifest, &config.manifest_dependency) {
                Ok(true) => {
                    log::info!("icon-lens active!");
                    Activation::Active
                }
                Ok(false) => {
                    let reason = format!(
                        "no {} in dependencies of {}",
                        config.manifest_dependency,
                        manifest.display()
                    );
                    log::info!("icon-lens disabled: {}", reason);
                    Activation::Inactive(reason)
                }
                Err(e) => {
                    let reason = format!("only supported in projects with a readable {MANIFEST_FILE}");
                    log::info!("icon-lens disabled, {}: {:#}", reason, e);
                    Activation::Inactive(reason)
                }
            }
        }
        ActivationMode::Disable => {
            // Logged only; startup continues in this mode
            log::info!("icon-lens disabled");
            Activation::Active
        }
        ActivationMode::Always => Activation::Active,
    }
}

/// Whether the manifest's `dependencies` object has a `dependency` key.
fn manifest_declares(manifest: &Path, dependency: &str) -> Result<bool> {
    let contents = std::fs::read_to_string(manifest)
        .with_context(|| format!("Failed to read {}", manifest.display()))?;
    let value: serde_json::Value = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse {}", manifest.display()))?;

    Ok(value
        .get("dependencies")
        .and_then(serde_json::Value::as_object)
        .is_some_and(|deps| deps.contains_key(dependency)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config(mode: ActivationMode) -> Config {
        Config {
            mode,
            ..Config::default()
        }
    }

    fn workspace_with(manifest: &str) -> TempDir {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        std::fs::write(temp_dir.path().join(MANIFEST_FILE), manifest).unwrap();
        temp_dir
    }

    #[test]
    fn test_auto_with_dependency() {
        let workspace =
            workspace_with(r#"{"dependencies": {"@dao-style/core": "^1.2.0", "vue": "3"}}"#);
        assert_eq!(
            check_activation(&config(ActivationMode::Auto), workspace.path()),
            Activation::Active
        );
    }

    #[test]
    fn test_auto_dev_dependency_does_not_count() {
        let workspace = workspace_with(r#"{"devDependencies": {"@dao-style/core": "1"}}"#);
        assert!(!check_activation(&config(ActivationMode::Auto), workspace.path()).is_active());
    }

    #[test]
    fn test_auto_custom_dependency() {
        let workspace = workspace_with(r#"{"dependencies": {"my-icons": "1"}}"#);
        let config = Config {
            manifest_dependency: "my-icons".to_string(),
            ..Config::default()
        };
        assert!(check_activation(&config, workspace.path()).is_active());
    }

    #[test]
    fn test_auto_missing_manifest() {
        let workspace = TempDir::new().expect("Failed to create temp dir");
        assert!(matches!(
            check_activation(&config(ActivationMode::Auto), workspace.path()),
            Activation::Inactive(_)
        ));
    }

    #[test]
    fn test_auto_malformed_manifest() {
        let workspace = workspace_with("{ not json");
        assert!(!check_activation(&config(ActivationMode::Auto), workspace.path()).is_active());
    }

    #[test]
    fn test_disable_still_proceeds() {
        let workspace = TempDir::new().expect("Failed to create temp dir");
        assert!(check_activation(&config(ActivationMode::Disable), workspace.path()).is_active());
    }

    #[test]
    fn test_always_ignores_manifest() {
        let workspace = TempDir::new().expect("Failed to create temp dir");
        assert!(check_activation(&config(ActivationMode::Always), workspace.path()).is_active());
    }
}
