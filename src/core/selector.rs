// src/core/selector.rs

//! Picks the executor for the running operating system.

use crate::{
    core::{
        dispatch::PowerExecutor,
        error::PowerError,
        settings::{BackendPreference, PosixSettings},
    },
    system::posix::{PosixBackend, PosixExecutor},
};
use std::env::consts::OS;
use std::fmt;

/// The operating-system families the selector knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// Any Windows NT.
    Windows,
    /// Linux, with the `reboot(2)` syscall.
    Linux,
    /// A Unix without the Linux `reboot(2)` ABI (macOS, the BSDs, ...).
    OtherUnix(&'static str),
    /// Anything else, by name.
    Unsupported(&'static str),
}

impl Platform {
    /// Detects the running operating system.
    pub fn current() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else if cfg!(target_os = "linux") {
            Self::Linux
        } else if cfg!(unix) {
            Self::OtherUnix(OS)
        } else {
            Self::Unsupported(OS)
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Windows => f.write_str("windows"),
            Self::Linux => f.write_str("linux"),
            Self::OtherUnix(name) | Self::Unsupported(name) => f.write_str(name),
        }
    }
}

/// The executor strategy chosen for a platform, before any platform object is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutorKind {
    /// The token-elevation protocol and `ExitWindowsEx`.
    Windows,
    /// The raw `reboot(2)` syscall.
    LinuxSyscall,
    /// A `systemctl` / `shutdown` command.
    ServiceManager,
}

/// Chooses the one executor that applies to the running OS.
#[derive(Debug, Clone)]
pub struct PlatformSelector {
    platform: Platform,
    posix: PosixSettings,
}

impl PlatformSelector {
    /// A selector for the running OS.
    pub fn new(posix: PosixSettings) -> Self {
        Self::for_platform(Platform::current(), posix)
    }

    /// A selector for an explicit platform.
    pub fn for_platform(platform: Platform, posix: PosixSettings) -> Self {
        Self { platform, posix }
    }

    /// The platform this selector decides for.
    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Decides which strategy applies, without touching the OS.
    pub fn choose(&self) -> Result<ExecutorKind, PowerError> {
        let unsupported = || Err(PowerError::UnsupportedPlatform(self.platform.to_string()));
        match (self.platform, self.posix.backend) {
            (Platform::Windows, _) => Ok(ExecutorKind::Windows),
            (Platform::Linux, BackendPreference::Auto | BackendPreference::Syscall) => {
                Ok(ExecutorKind::LinuxSyscall)
            }
            (Platform::Linux | Platform::OtherUnix(_), BackendPreference::ServiceManager)
            | (Platform::OtherUnix(_), BackendPreference::Auto) => Ok(ExecutorKind::ServiceManager),
            (Platform::OtherUnix(_), BackendPreference::Syscall) | (Platform::Unsupported(_), _) => {
                unsupported()
            }
        }
    }

    /// Builds the executor. Called once, before any privileged work.
    ///
    /// # Errors
    /// `UnsupportedPlatform` when no strategy applies or its backend is not compiled into
    /// this build.
    pub fn resolve(&self) -> Result<Box<dyn PowerExecutor>, PowerError> {
        let kind = self.choose()?;
        log::debug!("Platform '{}' resolved to {:?}.", self.platform, kind);
        match kind {
            ExecutorKind::Windows => self.windows_executor(),
            ExecutorKind::LinuxSyscall => self.linux_syscall_executor(),
            ExecutorKind::ServiceManager => Ok(Box::new(PosixExecutor::new(
                PosixBackend::ServiceManager(self.posix.service_manager()),
            ))),
        }
    }

    fn windows_executor(&self) -> Result<Box<dyn PowerExecutor>, PowerError> {
        #[cfg(windows)]
        {
            use crate::system::{windows::WindowsExecutor, windows_ffi::Win32Security};
            Ok(Box::new(WindowsExecutor::new(Win32Security)))
        }

        #[cfg(not(windows))]
        {
            Err(PowerError::UnsupportedPlatform(self.platform.to_string()))
        }
    }

    fn linux_syscall_executor(&self) -> Result<Box<dyn PowerExecutor>, PowerError> {
        #[cfg(target_os = "linux")]
        {
            use crate::system::posix::LibcReboot;
            Ok(Box::new(PosixExecutor::new(PosixBackend::Syscall(
                Box::new(LibcReboot),
            ))))
        }

        #[cfg(not(target_os = "linux"))]
        {
            Err(PowerError::UnsupportedPlatform(self.platform.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ErrorKind;

    fn posix(backend: BackendPreference) -> PosixSettings {
        PosixSettings {
            backend,
            ..Default::default()
        }
    }

    #[test]
    fn test_choice_table() {
        use BackendPreference::*;
        let cases = [
            (Platform::Windows, Auto, Some(ExecutorKind::Windows)),
            (Platform::Windows, ServiceManager, Some(ExecutorKind::Windows)),
            (Platform::Linux, Auto, Some(ExecutorKind::LinuxSyscall)),
            (Platform::Linux, Syscall, Some(ExecutorKind::LinuxSyscall)),
            (Platform::Linux, ServiceManager, Some(ExecutorKind::ServiceManager)),
            (Platform::OtherUnix("macos"), Auto, Some(ExecutorKind::ServiceManager)),
            (Platform::OtherUnix("freebsd"), Syscall, None),
            (Platform::Unsupported("plan9"), Auto, None),
        ];
        for (platform, backend, expected) in cases {
            let choice = PlatformSelector::for_platform(platform, posix(backend)).choose();
            assert_eq!(choice.ok(), expected, "{} / {:?}", platform, backend);
        }
    }

    #[test]
    fn test_unsupported_platform_names_the_platform() {
        let selector =
            PlatformSelector::for_platform(Platform::Unsupported("plan9"), PosixSettings::default());
        let err = selector.resolve().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedPlatform);
        assert!(err.to_string().contains("plan9"));
    }

    #[test]
    fn test_service_manager_resolves_everywhere() {
        let selector = PlatformSelector::for_platform(
            Platform::OtherUnix("macos"),
            posix(BackendPreference::ServiceManager),
        );
        let executor = selector.resolve().unwrap();
        assert_eq!(executor.name(), "service-manager");
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_current_platform_on_linux_uses_syscall() {
        let selector = PlatformSelector::new(PosixSettings::default());
        assert_eq!(selector.platform(), Platform::Linux);
        assert_eq!(selector.resolve().unwrap().name(), "linux-syscall");
    }

    #[cfg(not(windows))]
    #[test]
    fn test_windows_backend_is_not_built_elsewhere() {
        let selector = PlatformSelector::for_platform(Platform::Windows, PosixSettings::default());
        assert_eq!(
            selector.resolve().unwrap_err().kind(),
            ErrorKind::UnsupportedPlatform
        );
    }
}
