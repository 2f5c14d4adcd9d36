//! Configuration loading and catalog path resolution

use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Environment variable naming the catalog file
pub const CATALOG_ENV_VAR: &str = "GFLASH_CATALOG";

/// Key read from the TOML config file
pub const CATALOG_CONFIG_KEY: &str = "catalog_path";

/// Fallback catalog location, relative to the working directory
pub const DEFAULT_CATALOG_PATH: &str = "data/music.json";

/// Catalog path resolution, in priority order:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable
/// 3. TOML config file
/// 4. Compiled default (fallback)
pub fn resolve_catalog_path(cli_arg: Option<&Path>, env_var_name: &str) -> PathBuf {
    let config_file = find_config_file().ok();
    resolve_catalog_path_with(cli_arg, env_var_name, config_file.as_deref())
}

/// Same as [`resolve_catalog_path`] with an explicit config file location
pub fn resolve_catalog_path_with(
    cli_arg: Option<&Path>,
    env_var_name: &str,
    config_file: Option<&Path>,
) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(env_var_name) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    // Priority 3: TOML config file
    if let Some(config_path) = config_file {
        match std::fs::read_to_string(config_path) {
            Ok(content) => match catalog_path_from_toml(&content) {
                Ok(Some(path)) => return path,
                Ok(None) => {}
                Err(e) => tracing::warn!("Ignoring config file {}: {}", config_path.display(), e),
            },
            Err(e) => tracing::warn!("Could not read config file {}: {}", config_path.display(), e),
        }
    }

    // Priority 4: Compiled default
    PathBuf::from(DEFAULT_CATALOG_PATH)
}

/// Extract `catalog_path` from TOML config content
pub fn catalog_path_from_toml(content: &str) -> Result<Option<PathBuf>> {
    let config = toml::from_str::<toml::Value>(content)
        .map_err(|e| Error::Config(e.to_string()))?;

    Ok(config
        .get(CATALOG_CONFIG_KEY)
        .and_then(|v| v.as_str())
        .map(PathBuf::from))
}

/// Locate the platform configuration file
fn find_config_file() -> Result<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("gflash").join("config.toml"));
    if let Some(path) = user_config {
        if path.exists() {
            return Ok(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/gflash/config.toml");
        if system_config.exists() {
            return Ok(system_config);
        }
    }

    Err(Error::Config("No config file found".to_string()))
}
