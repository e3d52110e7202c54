//! Command helper utilities

use std::path::{Path, PathBuf};

use crate::config::AppConfig;
use crate::error::{PacksyncError, Result};
use crate::registry::Registry;
use crate::target::InstallMode;

/// Load and validate a registry document.
pub fn load_registry(path: &Path) -> Result<Registry> {
    if !path.exists() {
        return Err(PacksyncError::RegistryNotFound {
            path: path.display().to_string(),
        });
    }
    let json = std::fs::read_to_string(path).map_err(|e| PacksyncError::ConfigRead {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    Registry::from_json(&json)
}

/// Load the app config: explicit path if given, else a sibling
/// `registry.config.json` next to the registry, else defaults.
pub fn load_config(explicit: Option<&PathBuf>, registry_path: &Path) -> Result<AppConfig> {
    let candidate = match explicit {
        Some(path) => Some(path.clone()),
        None => {
            let sibling = registry_path.with_file_name("registry.config.json");
            sibling.exists().then_some(sibling)
        }
    };
    let Some(path) = candidate else {
        return Ok(AppConfig::default());
    };
    let json = std::fs::read_to_string(&path).map_err(|e| PacksyncError::ConfigRead {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    AppConfig::from_json(&json)
}

pub fn install_mode(local: bool) -> InstallMode {
    if local {
        InstallMode::Local
    } else {
        InstallMode::Global
    }
}
