//! ConfigStore - Local Configuration Storage

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, info, warn};

use crate::constants::{CONFIG_FILE_NAME, PROVIDER_URL_ENV};
use crate::domain::config::AppConfig;
use crate::error::Result;
use crate::helpers::get_or_create_config_dir;

/// Default location of the configuration file
pub fn config_path() -> Result<PathBuf> {
    Ok(get_or_create_config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load a TOML file, falling back to `T::default()` when it does not exist
pub fn load_toml<T: DeserializeOwned + Default>(path: &Path) -> Result<T> {
    if !path.exists() {
        debug!("Config file {} not found, using defaults", path.display());
        return Ok(T::default());
    }

    let content = fs::read_to_string(path)?;
    let value: T = toml::from_str(&content)?;
    Ok(value)
}

/// Save a value as a TOML file, creating parent directories
pub fn save_toml<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(value)?;
    fs::write(path, content)?;
    Ok(())
}

/// Load the application config from `path` and apply environment overrides.
/// A missing file is written out with defaults so there is something to edit.
pub fn load_app_config(path: &Path) -> Result<AppConfig> {
    let mut config: AppConfig = load_toml(path)?;
    if !path.exists() {
        match save_toml(path, &config) {
            Ok(()) => info!("Wrote default config to {}", path.display()),
            Err(e) => warn!("Could not write default config to {}: {}", path.display(), e),
        }
    }
    apply_env_overrides(&mut config, std::env::var(PROVIDER_URL_ENV).ok());
    info!("Provider URL: {}", config.provider.base_url);
    Ok(config)
}

/// `STOCK_BROWSER_URL` replaces `provider.base_url` when set and non-empty
fn apply_env_overrides(config: &mut AppConfig, provider_url: Option<String>) {
    if let Some(url) = provider_url.filter(|u| !u.trim().is_empty()) {
        config.provider.base_url = url.trim().to_string();
    }
}
