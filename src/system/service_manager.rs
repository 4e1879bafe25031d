// src/system/service_manager.rs

//! Power-off and reboot through `systemctl` or `shutdown`.

use crate::{core::error::PowerError, system::posix::RebootCommand};
use std::process::{Command as StdCommand, Stdio};

/// Power-off and reboot through a service-manager command line (`systemctl`, `shutdown`, ...).
///
/// Used where the raw syscall is unavailable. Only the exit status is known, so any failure
/// is reported as a platform error carrying that status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceManager {
    poweroff_command: String,
    reboot_command: String,
}

impl ServiceManager {
    /// A service manager with explicit command lines, split with shell quoting rules.
    pub fn new(poweroff_command: impl Into<String>, reboot_command: impl Into<String>) -> Self {
        Self {
            poweroff_command: poweroff_command.into(),
            reboot_command: reboot_command.into(),
        }
    }

    /// The commands this OS ships with: `systemctl` on Linux, BSD-style `shutdown` elsewhere.
    pub fn platform_default() -> Self {
        if cfg!(target_os = "linux") {
            Self::new("systemctl poweroff", "systemctl reboot")
        } else {
            Self::new("shutdown -h now", "shutdown -r now")
        }
    }

    pub fn poweroff_command(&self) -> &str {
        &self.poweroff_command
    }

    pub fn reboot_command(&self) -> &str {
        &self.reboot_command
    }

    /// The command line configured for a reboot command, if it has one.
    pub fn command_for(&self, command: RebootCommand) -> Option<&str> {
        match command {
            RebootCommand::PowerOff => Some(&self.poweroff_command),
            RebootCommand::Restart => Some(&self.reboot_command),
            _ => None,
        }
    }

    /// The settings key a reboot command's command line comes from.
    fn setting_key(command: RebootCommand) -> Option<&'static str> {
        match command {
            RebootCommand::PowerOff => Some("posix.poweroff_command"),
            RebootCommand::Restart => Some("posix.reboot_command"),
            _ => None,
        }
    }

    /// Runs the command for `command` and waits for it to exit.
    pub fn run(&self, command: RebootCommand) -> Result<(), PowerError> {
        let (Some(key), Some(command_line)) = (Self::setting_key(command), self.command_for(command))
        else {
            return Err(PowerError::NoServiceManagerCommand(format!("{:?}", command)));
        };

        let invalid_setting = |problem: &str| PowerError::ServiceManagerSetting {
            key,
            problem: problem.to_string(),
        };
        let parts = shlex::split(command_line.trim())
            .ok_or_else(|| invalid_setting("unbalanced quotes or a trailing escape"))?;
        let (program, args) = parts
            .split_first()
            .ok_or_else(|| invalid_setting("the command is empty"))?;

        log::info!("Running service-manager command '{}'.", command_line);
        let status = StdCommand::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| PowerError::ServiceManagerSpawn {
                command: command_line.to_string(),
                source: e,
            })?;

        if status.success() {
            return Ok(());
        }
        match status.code() {
            Some(code) => Err(PowerError::ServiceManagerStatus {
                command: command_line.to_string(),
                status: code,
            }),
            None => Err(PowerError::ServiceManagerTerminated {
                command: command_line.to_string(),
            }),
        }
    }
}

impl Default for ServiceManager {
    fn default() -> Self {
        Self::platform_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ErrorKind;

    #[test]
    fn test_only_power_off_and_restart_have_commands() {
        let manager = ServiceManager::new("off-cmd", "reboot-cmd");
        assert_eq!(manager.command_for(RebootCommand::PowerOff), Some("off-cmd"));
        assert_eq!(manager.command_for(RebootCommand::Restart), Some("reboot-cmd"));
        for command in RebootCommand::ALL {
            if !matches!(command, RebootCommand::PowerOff | RebootCommand::Restart) {
                assert_eq!(manager.command_for(command), None);
            }
        }
    }

    #[test]
    fn test_unmapped_command_is_invalid_argument() {
        let err = ServiceManager::default()
            .run(RebootCommand::Suspend)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert!(matches!(err, PowerError::NoServiceManagerCommand(_)));
    }

    #[test]
    fn test_empty_command_names_the_setting() {
        let err = ServiceManager::new("   ", "")
            .run(RebootCommand::PowerOff)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert!(matches!(
            err,
            PowerError::ServiceManagerSetting {
                key: "posix.poweroff_command",
                ..
            }
        ));
    }

    #[test]
    fn test_unbalanced_quotes_name_the_setting() {
        let err = ServiceManager::new("true", "systemctl 'reboot")
            .run(RebootCommand::Restart)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        let message = err.to_string();
        assert!(message.contains("posix.reboot_command"), "Message was: {}", message);
        assert!(!message.contains("power request"), "Message was: {}", message);
    }

    #[test]
    fn test_missing_program_is_platform_error_without_native_code() {
        let err = ServiceManager::new("pwrctl-test-no-such-program --now", "")
            .run(RebootCommand::PowerOff)
            .unwrap_err();
        assert!(matches!(err, PowerError::ServiceManagerSpawn { .. }));
        assert_eq!(err.kind(), ErrorKind::PlatformError);
        // ENOENT must not surface as an exit status.
        assert_eq!(err.native_code(), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_zero_exit_is_success() {
        let manager = ServiceManager::new("true", "true");
        assert!(manager.run(RebootCommand::Restart).is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_nonzero_exit_is_platform_error_with_status() {
        let manager = ServiceManager::new("sh -c 'exit 3'", "false");

        let err = manager.run(RebootCommand::PowerOff).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::PlatformError);
        assert_eq!(err.native_code(), Some(3));
    }
}
