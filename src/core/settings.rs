// src/core/settings.rs

//! # Settings
//!
//! Optional TOML configuration. Every field has a default, so a missing default-location
//! file is not an error. Loading only ever reads.
//!
//! ```toml
//! [power]
//! default_reason = "software"
//! force = false
//!
//! [posix]
//! backend = "auto"
//! poweroff_command = "systemctl poweroff"
//! reboot_command = "systemctl reboot"
//! ```

use crate::{
    core::paths::SettingsLocation, models::PowerReason, system::service_manager::ServiceManager,
};
use serde::Deserialize;
use std::{fs, io, path::Path};
use thiserror::Error;

/// Why a settings file could not be loaded.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// The file could not be read.
    #[error("Could not read settings file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    /// The file is not valid settings TOML.
    #[error("Failed to parse settings file '{path}': {source}")]
    TomlParse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// How the POSIX executor reaches the kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackendPreference {
    /// The syscall on Linux, the service manager elsewhere.
    #[default]
    Auto,
    /// Always the raw `reboot` syscall.
    Syscall,
    /// Always the service-manager command.
    ServiceManager,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PowerSettings {
    /// Reason used when `--reason` is not given.
    pub default_reason: PowerReason,
    /// Force every operation, as if `--force` were always given.
    pub force: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PosixSettings {
    /// Syscall, service manager, or whichever fits the OS.
    pub backend: BackendPreference,
    /// Service-manager command line for power-off.
    pub poweroff_command: Option<String>,
    /// Service-manager command line for reboot and power-cycle.
    pub reboot_command: Option<String>,
}

impl PosixSettings {
    /// The service manager described by these settings, platform defaults filling the gaps.
    pub fn service_manager(&self) -> ServiceManager {
        let defaults = ServiceManager::platform_default();
        ServiceManager::new(
            self.poweroff_command
                .as_deref()
                .unwrap_or(defaults.poweroff_command()),
            self.reboot_command
                .as_deref()
                .unwrap_or(defaults.reboot_command()),
        )
    }
}

/// The complete settings file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// `[power]`
    pub power: PowerSettings,
    /// `[posix]`
    pub posix: PosixSettings,
}

impl Settings {
    /// Loads settings from a resolved location.
    ///
    /// # Errors
    /// An explicit file that is missing or unreadable, or any file that is not valid.
    pub fn load(location: &SettingsLocation) -> Result<Self, SettingsError> {
        match location {
            SettingsLocation::Explicit(path) => Self::load_file(path),
            SettingsLocation::Default(path) if path.is_file() => Self::load_file(path),
            SettingsLocation::Default(path) => {
                log::debug!(
                    "No settings file at '{}'. Using defaults.",
                    path.display()
                );
                Ok(Self::default())
            }
            SettingsLocation::None => Ok(Self::default()),
        }
    }

    /// Reads and parses one settings file.
    pub fn load_file(path: &Path) -> Result<Self, SettingsError> {
        let content = fs::read_to_string(path).map_err(|e| SettingsError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        let settings = toml::from_str(&content).map_err(|e| SettingsError::TomlParse {
            path: path.display().to_string(),
            source: e,
        })?;
        log::debug!("Loaded settings from '{}'.", path.display());
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    fn write_settings(content: &str) -> NamedTempFile {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(content.as_bytes()).unwrap();
        temp_file.flush().unwrap();
        temp_file
    }

    #[test]
    fn test_full_settings_file() {
        // --- Setup ---
        let file = write_settings(
            r#"
            [power]
            default_reason = "hardware"
            force = true

            [posix]
            backend = "service-manager"
            poweroff_command = "loginctl poweroff"
        "#,
        );

        // --- Execute ---
        let settings =
            Settings::load(&SettingsLocation::Explicit(file.path().to_path_buf())).unwrap();

        // --- Assert ---
        assert_eq!(settings.power.default_reason, PowerReason::Hardware);
        assert!(settings.power.force);
        assert_eq!(settings.posix.backend, BackendPreference::ServiceManager);
        let manager = settings.posix.service_manager();
        assert_eq!(manager.poweroff_command(), "loginctl poweroff");
        assert_eq!(
            manager.reboot_command(),
            ServiceManager::platform_default().reboot_command()
        );
    }

    #[test]
    fn test_empty_file_gives_defaults() {
        let file = write_settings("");
        let settings = Settings::load_file(file.path()).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.posix.backend, BackendPreference::Auto);
        assert_eq!(settings.power.default_reason, PowerReason::None);
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let file = write_settings("[power]\nreasons = \"power\"\n");
        let result = Settings::load_file(file.path());
        assert!(matches!(result, Err(SettingsError::TomlParse { .. })));
        let error_msg = result.unwrap_err().to_string();
        assert!(error_msg.contains("unknown field"), "Error message was: {}", error_msg);
    }

    #[test]
    fn test_unknown_reason_is_rejected() {
        let file = write_settings("[power]\ndefault_reason = \"cosmic\"\n");
        assert!(Settings::load_file(file.path()).is_err());
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let location = SettingsLocation::Explicit(PathBuf::from("non_existent_pwrctl_settings.toml"));
        assert!(matches!(
            Settings::load(&location),
            Err(SettingsError::Io { .. })
        ));
    }

    #[test]
    fn test_missing_default_file_gives_defaults() {
        let location = SettingsLocation::Default(PathBuf::from("non_existent_pwrctl_settings.toml"));
        assert_eq!(Settings::load(&location).unwrap(), Settings::default());
    }
}
