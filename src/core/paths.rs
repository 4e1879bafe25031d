// src/core/paths.rs

//! Where pwrctl looks for its settings file.

use crate::constants::{CONFIG_DIR_NAME, SETTINGS_ENV_VAR, SETTINGS_FILENAME};
use std::env;
use std::path::PathBuf;
use thiserror::Error;

/// Path resolution failures.
#[derive(Error, Debug)]
pub enum PathError {
    /// The OS reports no per-user config directory.
    #[error("Could not find system config directory.")]
    ConfigDirNotFound,
}

/// Returns the path to the pwrctl configuration directory (e.g. `~/.config/pwrctl`).
/// The directory is not created.
pub fn get_config_dir() -> Result<PathBuf, PathError> {
    dirs::config_dir()
        .map(|dir| dir.join(CONFIG_DIR_NAME))
        .ok_or(PathError::ConfigDirNotFound)
}

/// Returns the default settings file path inside the config directory.
pub fn get_default_settings_path() -> Result<PathBuf, PathError> {
    get_config_dir().map(|dir| dir.join(SETTINGS_FILENAME))
}

/// Where settings should be read from, and whether the file must exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsLocation {
    /// Named explicitly (`--config` or the environment); missing is an error.
    Explicit(PathBuf),
    /// The conventional location; missing means defaults.
    Default(PathBuf),
    /// No config directory on this system; defaults apply.
    None,
}

/// Resolves the settings location: the CLI path, then `PWRCTL_CONFIG`, then the config dir.
pub fn resolve_settings_location(cli_path: Option<PathBuf>) -> SettingsLocation {
    let env_path = env::var_os(SETTINGS_ENV_VAR)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from);
    resolve_settings_location_from(cli_path, env_path)
}

fn resolve_settings_location_from(
    cli_path: Option<PathBuf>,
    env_path: Option<PathBuf>,
) -> SettingsLocation {
    if let Some(path) = cli_path.or(env_path) {
        return SettingsLocation::Explicit(path);
    }
    match get_default_settings_path() {
        Ok(path) => SettingsLocation::Default(path),
        Err(e) => {
            log::debug!("{} Using default settings.", e);
            SettingsLocation::None
        }
    }
}
