// src/system/posix.rs

//! The Linux `reboot(2)` executor and its service-manager fallback.

use crate::{
    constants::{
        EFAULT, EINVAL, EPERM, LINUX_REBOOT_CMD_CAD_OFF, LINUX_REBOOT_CMD_CAD_ON,
        LINUX_REBOOT_CMD_HALT, LINUX_REBOOT_CMD_KEXEC, LINUX_REBOOT_CMD_POWER_OFF,
        LINUX_REBOOT_CMD_RESTART, LINUX_REBOOT_CMD_RESTART2, LINUX_REBOOT_CMD_SW_SUSPEND,
    },
    core::{dispatch::PowerExecutor, error::PowerError},
    models::{ErrorKind, PlatformOutcome, PowerOperation, PowerRequest},
    system::service_manager::ServiceManager,
};
use std::fmt;

/// The reboot-family actions defined by the Linux kernel ABI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RebootCommand {
    /// `LINUX_REBOOT_CMD_RESTART`.
    Restart,
    /// `LINUX_REBOOT_CMD_HALT`.
    Halt,
    /// `LINUX_REBOOT_CMD_CAD_ON`.
    CadEnable,
    /// `LINUX_REBOOT_CMD_CAD_OFF`.
    CadDisable,
    /// `LINUX_REBOOT_CMD_POWER_OFF`.
    PowerOff,
    /// `LINUX_REBOOT_CMD_RESTART2`.
    RestartWithCommand,
    /// `LINUX_REBOOT_CMD_SW_SUSPEND`.
    Suspend,
    /// `LINUX_REBOOT_CMD_KEXEC`.
    ExecuteKernel,
}

impl RebootCommand {
    /// Every command, in ABI documentation order.
    pub const ALL: [Self; 8] = [
        Self::Restart,
        Self::Halt,
        Self::CadEnable,
        Self::CadDisable,
        Self::PowerOff,
        Self::RestartWithCommand,
        Self::Suspend,
        Self::ExecuteKernel,
    ];

    /// The `LINUX_REBOOT_CMD_*` magic value for this command.
    pub const fn magic(self) -> u32 {
        match self {
            Self::Restart => LINUX_REBOOT_CMD_RESTART,
            Self::Halt => LINUX_REBOOT_CMD_HALT,
            Self::CadEnable => LINUX_REBOOT_CMD_CAD_ON,
            Self::CadDisable => LINUX_REBOOT_CMD_CAD_OFF,
            Self::PowerOff => LINUX_REBOOT_CMD_POWER_OFF,
            Self::RestartWithCommand => LINUX_REBOOT_CMD_RESTART2,
            Self::Suspend => LINUX_REBOOT_CMD_SW_SUSPEND,
            Self::ExecuteKernel => LINUX_REBOOT_CMD_KEXEC,
        }
    }

    /// The command that carries out a power operation.
    pub fn for_operation(operation: PowerOperation) -> Self {
        match operation {
            PowerOperation::Shutdown => Self::PowerOff,
            PowerOperation::Reboot | PowerOperation::Cycle => Self::Restart,
        }
    }
}

/// Classifies the errno left behind by a failed `reboot` call.
pub fn classify_errno(errno: i32) -> ErrorKind {
    match errno {
        EPERM => ErrorKind::PermissionDenied,
        EINVAL => ErrorKind::InvalidArgument,
        EFAULT => ErrorKind::PlatformError,
        _ => ErrorKind::PlatformError,
    }
}

/// The raw `reboot` system call.
pub trait RebootSyscall: fmt::Debug {
    /// Commits buffered filesystem data to disk. Called right before every real `reboot`,
    /// which otherwise discards anything not yet written.
    fn sync(&self);

    /// Invokes `reboot` with a magic command and a null argument.
    ///
    /// Returns `Err(errno)` when the call returned -1 and `Ok(value)` for any other return,
    /// which on a working kernel should never happen for a halting command.
    fn reboot(&self, magic: u32) -> Result<i64, i32>;
}

/// How the executor reaches the kernel.
#[derive(Debug)]
pub enum PosixBackend {
    /// Direct syscall with errno classification.
    Syscall(Box<dyn RebootSyscall>),
    /// A service-manager command; only success or failure is known.
    ServiceManager(ServiceManager),
}

/// Maps requests onto reboot commands and hands them to a [`PosixBackend`].
#[derive(Debug)]
pub struct PosixExecutor {
    backend: PosixBackend,
}

impl PosixExecutor {
    /// An executor over `backend`.
    pub fn new(backend: PosixBackend) -> Self {
        Self { backend }
    }

    fn run(&self, request: PowerRequest) -> PlatformOutcome {
        let command = RebootCommand::for_operation(request.operation());
        let magic = command.magic();
        log::debug!(
            "{} maps to {:?} (magic {:#010x}).",
            request.operation(),
            command,
            magic
        );

        if request.simulate() {
            log::info!("What-if: skipping reboot({:#010x}).", magic);
            return PlatformOutcome::simulated();
        }

        let result = match &self.backend {
            PosixBackend::Syscall(syscall) => {
                log::debug!("Syncing filesystems before reboot.");
                syscall.sync();
                log::info!("Invoking reboot({:#010x}).", magic);
                interpret_syscall_result(syscall.reboot(magic))
            }
            PosixBackend::ServiceManager(manager) => manager.run(command),
        };

        match result {
            Ok(()) => PlatformOutcome::accepted(),
            Err(e) => PlatformOutcome::failed(e),
        }
    }
}

fn interpret_syscall_result(result: Result<i64, i32>) -> Result<(), PowerError> {
    match result {
        Err(errno) => {
            let kind = classify_errno(errno);
            log::debug!("reboot failed with errno {} ({}).", errno, kind);
            Err(PowerError::from_native(kind, "reboot", errno))
        }
        Ok(value) => {
            log::warn!("reboot returned {} instead of halting.", value);
            Err(PowerError::UnexpectedReturn {
                step: "reboot",
                value,
            })
        }
    }
}

impl PowerExecutor for PosixExecutor {
    fn name(&self) -> &'static str {
        match self.backend {
            PosixBackend::Syscall(_) => "linux-syscall",
            PosixBackend::ServiceManager(_) => "service-manager",
        }
    }

    fn shutdown(&self, request: PowerRequest) -> PlatformOutcome {
        self.run(request)
    }

    fn reboot(&self, request: PowerRequest) -> PlatformOutcome {
        self.run(request)
    }
}

/// `reboot(2)` through libc, with the two magic arguments the kernel requires.
#[cfg(target_os = "linux")]
#[derive(Debug, Default)]
pub struct LibcReboot;

#[cfg(target_os = "linux")]
impl RebootSyscall for LibcReboot {
    #[allow(unsafe_code)]
    fn sync(&self) {
        // SAFETY: takes no arguments and cannot fail.
        unsafe { libc::sync() };
    }

    #[allow(unsafe_code)]
    fn reboot(&self, magic: u32) -> Result<i64, i32> {
        use crate::constants::{LINUX_REBOOT_MAGIC1, LINUX_REBOOT_MAGIC2};

        // SAFETY: every argument is a plain integer except the trailing argument pointer,
        // which the kernel only reads for RESTART2 and which is null here.
        let ret = unsafe {
            libc::syscall(
                libc::SYS_reboot,
                LINUX_REBOOT_MAGIC1,
                LINUX_REBOOT_MAGIC2,
                magic,
                std::ptr::null::<libc::c_void>(),
            )
        };
        if ret == -1 {
            let errno = std::io::Error::last_os_error()
                .raw_os_error()
                .unwrap_or(EFAULT);
            return Err(errno);
        }
        Ok(i64::from(ret))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PowerReason;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    #[derive(Debug, Default)]
    struct SyscallLog {
        syncs: Cell<usize>,
        reboots: RefCell<Vec<u32>>,
    }

    #[derive(Debug)]
    struct FakeSyscall {
        calls: Rc<SyscallLog>,
        result: Result<i64, i32>,
    }

    impl RebootSyscall for FakeSyscall {
        fn sync(&self) {
            self.calls.syncs.set(self.calls.syncs.get() + 1);
        }

        fn reboot(&self, magic: u32) -> Result<i64, i32> {
            assert_eq!(
                self.calls.syncs.get(),
                self.calls.reboots.borrow().len() + 1,
                "reboot must follow a sync"
            );
            self.calls.reboots.borrow_mut().push(magic);
            self.result
        }
    }

    fn executor(result: Result<i64, i32>) -> (PosixExecutor, Rc<SyscallLog>) {
        let calls = Rc::new(SyscallLog::default());
        let syscall = FakeSyscall {
            calls: Rc::clone(&calls),
            result,
        };
        (
            PosixExecutor::new(PosixBackend::Syscall(Box::new(syscall))),
            calls,
        )
    }

    #[test]
    fn test_magic_constants_match_kernel_abi() {
        let golden: [(RebootCommand, u32); 8] = [
            (RebootCommand::Restart, 0x0123_4567),
            (RebootCommand::Halt, 0xCDEF_0123),
            (RebootCommand::CadEnable, 0x89AB_CDEF),
            (RebootCommand::CadDisable, 0x0000_0000),
            (RebootCommand::PowerOff, 0x4321_FEDC),
            (RebootCommand::RestartWithCommand, 0xA1B2_C3D4),
            (RebootCommand::Suspend, 0xD000_FCE2),
            (RebootCommand::ExecuteKernel, 0x4558_4543),
        ];
        for (command, expected) in golden {
            assert_eq!(command.magic(), expected, "{:?}", command);
        }
        assert_eq!(golden.len(), RebootCommand::ALL.len());
    }

    #[test]
    fn test_operations_map_to_power_off_and_restart() {
        assert_eq!(
            RebootCommand::for_operation(PowerOperation::Shutdown),
            RebootCommand::PowerOff
        );
        assert_eq!(
            RebootCommand::for_operation(PowerOperation::Reboot),
            RebootCommand::Restart
        );
        assert_eq!(
            RebootCommand::for_operation(PowerOperation::Cycle),
            RebootCommand::Restart
        );
    }

    #[test]
    fn test_errno_classification() {
        assert_eq!(classify_errno(EPERM), ErrorKind::PermissionDenied);
        assert_eq!(classify_errno(EINVAL), ErrorKind::InvalidArgument);
        assert_eq!(classify_errno(EFAULT), ErrorKind::PlatformError);
        for other in [0, 2, 13, 38, 255, -1] {
            assert_eq!(classify_errno(other), ErrorKind::PlatformError, "errno {}", other);
        }
    }

    #[test]
    fn test_what_if_never_invokes_syscall() {
        for operation in PowerOperation::ALL {
            let (executor, calls) = executor(Err(EPERM));
            let request = PowerRequest::new(operation, PowerReason::Power, true, true);

            let outcome = match operation {
                PowerOperation::Shutdown => executor.shutdown(request),
                _ => executor.reboot(request),
            };

            assert!(outcome.succeeded());
            assert!(outcome.was_simulated());
            assert_eq!(outcome.native_code(), 0);
            assert!(calls.reboots.borrow().is_empty());
            assert_eq!(calls.syncs.get(), 0);
        }
    }

    #[test]
    fn test_forced_reboot_with_eperm_is_permission_denied() {
        // --- Setup ---
        let (executor, calls) = executor(Err(EPERM));
        let request = PowerRequest::new(PowerOperation::Reboot, PowerReason::None, true, false);

        // --- Execute ---
        let outcome = executor.reboot(request);

        // --- Assert ---
        assert_eq!(outcome.classification(), Some(ErrorKind::PermissionDenied));
        assert_eq!(outcome.native_code(), 1);
        assert_eq!(*calls.reboots.borrow(), vec![LINUX_REBOOT_CMD_RESTART]);
        assert_eq!(calls.syncs.get(), 1);
    }

    #[test]
    fn test_einval_is_invalid_argument() {
        let (executor, calls) = executor(Err(EINVAL));
        let request = PowerRequest::new(PowerOperation::Shutdown, PowerReason::None, false, false);

        let outcome = executor.shutdown(request);

        assert_eq!(outcome.classification(), Some(ErrorKind::InvalidArgument));
        assert_eq!(outcome.native_code(), 22);
        assert_eq!(*calls.reboots.borrow(), vec![LINUX_REBOOT_CMD_POWER_OFF]);
    }

    #[test]
    fn test_unexpected_return_is_platform_error_with_raw_value() {
        let (executor, _) = executor(Ok(0));
        let request = PowerRequest::new(PowerOperation::Shutdown, PowerReason::None, false, false);

        let outcome = executor.shutdown(request);

        assert_eq!(outcome.classification(), Some(ErrorKind::PlatformError));
        assert!(matches!(
            outcome.error(),
            Some(PowerError::UnexpectedReturn { value: 0, .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_service_manager_backend_reports_command_status() {
        let executor =
            PosixExecutor::new(PosixBackend::ServiceManager(ServiceManager::new("false", "true")));
        assert_eq!(executor.name(), "service-manager");

        let simulated = executor.shutdown(PowerRequest::new(
            PowerOperation::Shutdown,
            PowerReason::None,
            false,
            true,
        ));
        assert!(simulated.was_simulated());

        let failed = executor.shutdown(PowerRequest::new(
            PowerOperation::Shutdown,
            PowerReason::None,
            false,
            false,
        ));
        assert_eq!(failed.classification(), Some(ErrorKind::PlatformError));
        assert_eq!(failed.native_code(), 1);

        let restarted = executor.reboot(PowerRequest::new(
            PowerOperation::Cycle,
            PowerReason::None,
            false,
            false,
        ));
        assert!(restarted.succeeded());
    }
}
