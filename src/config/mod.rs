//! Application configuration
//!
//! A registry may ship a companion config document that overrides install
//! paths and UI text. Overrides are deep-merged over hard-coded defaults,
//! then install directories are normalized (`~` expansion, cwd-relative
//! resolution) so the target resolver only ever sees absolute paths.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PacksyncError, Result};
use crate::registry::ItemType;

/// Reserved marker directory for platform-typed content.
pub const MARKER_DIR: &str = ".opencode";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiConfig {
    pub brand: String,
    pub product: String,
}

/// Install path policy: which roots to use per mode, and which item types
/// are installed under those roots ("prefixed") rather than beside the
/// project's own files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallConfig {
    pub global_dir: PathBuf,
    pub local_dir: PathBuf,
    pub prefix_types: Vec<ItemType>,
}

impl InstallConfig {
    pub fn is_prefixed(&self, kind: ItemType) -> bool {
        self.prefix_types.contains(&kind)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    pub ui: UiConfig,
    pub install: InstallConfig,
}

/// Partial override shape as shipped by a registry's config document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PartialAppConfig {
    #[serde(default)]
    pub ui: Option<PartialUiConfig>,
    #[serde(default)]
    pub install: Option<PartialInstallConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PartialUiConfig {
    pub brand: Option<String>,
    pub product: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PartialInstallConfig {
    pub global_dir: Option<String>,
    pub local_dir: Option<String>,
    pub prefix_types: Option<Vec<ItemType>>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            ui: UiConfig {
                brand: "Packsync".to_string(),
                product: "Workflows".to_string(),
            },
            install: InstallConfig {
                global_dir: default_global_dir(),
                local_dir: std::env::current_dir()
                    .unwrap_or_else(|_| PathBuf::from("."))
                    .join(MARKER_DIR),
                prefix_types: vec![ItemType::Agent, ItemType::Skill, ItemType::Command],
            },
        }
    }
}

impl AppConfig {
    /// Parse a partial config document and merge it over the defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let partial: PartialAppConfig =
            serde_json::from_str(json).map_err(|e| PacksyncError::ConfigParse {
                reason: e.to_string(),
            })?;
        Ok(Self::default().merged(partial))
    }

    /// Merge a partial override over this config, then normalize install dirs.
    pub fn merged(mut self, partial: PartialAppConfig) -> Self {
        if let Some(ui) = partial.ui {
            if let Some(brand) = ui.brand {
                self.ui.brand = brand;
            }
            if let Some(product) = ui.product {
                self.ui.product = product;
            }
        }
        if let Some(install) = partial.install {
            if let Some(global) = install.global_dir {
                self.install.global_dir = normalize_dir(&global);
            }
            if let Some(local) = install.local_dir {
                self.install.local_dir = normalize_dir(&local);
            }
            if let Some(types) = install.prefix_types {
                self.install.prefix_types = types;
            }
        }
        self
    }
}

/// Global install root: `$PACKSYNC_CONFIG_DIR` override, else the platform
/// config directory with the marker-dir product name.
fn default_global_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("PACKSYNC_CONFIG_DIR") {
        return PathBuf::from(dir);
    }
    let base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("opencode")
}

/// Expand `~` and resolve relative paths against the current directory.
fn normalize_dir(input: &str) -> PathBuf {
    if let Some(rest) = input.strip_prefix('~') {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest.trim_start_matches('/'));
        }
    }
    let path = Path::new(input);
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_prefix_all_but_docs() {
        let config = AppConfig::default();
        assert!(config.install.is_prefixed(ItemType::Agent));
        assert!(config.install.is_prefixed(ItemType::Skill));
        assert!(config.install.is_prefixed(ItemType::Command));
        assert!(!config.install.is_prefixed(ItemType::Doc));
    }

    #[test]
    fn test_partial_merge_keeps_unset_fields() {
        let json = r#"{ "ui": { "brand": "Acme" } }"#;
        let config = AppConfig::from_json(json).unwrap();
        assert_eq!(config.ui.brand, "Acme");
        assert_eq!(config.ui.product, "Workflows");
        assert_eq!(
            config.install.prefix_types,
            vec![ItemType::Agent, ItemType::Skill, ItemType::Command]
        );
    }

    #[test]
    fn test_install_override_normalizes_relative_dir() {
        let json = r#"{ "install": { "local_dir": "custom/.tools" } }"#;
        let config = AppConfig::from_json(json).unwrap();
        assert!(config.install.local_dir.is_absolute());
        assert!(config.install.local_dir.ends_with("custom/.tools"));
    }

    #[test]
    fn test_invalid_json_is_a_config_error() {
        let result = AppConfig::from_json("{ not json");
        assert!(matches!(
            result.unwrap_err(),
            PacksyncError::ConfigParse { .. }
        ));
    }
}
