// src/constants.rs

//! Fixed names, exit statuses and the kernel / Win32 ABI values the executors pass through.

// --- Configuration ---

/// The name of the directory holding pwrctl configuration (inside the system config dir).
pub const CONFIG_DIR_NAME: &str = "pwrctl";

/// The name of the optional settings file (inside the config directory).
pub const SETTINGS_FILENAME: &str = "config.toml";

/// Environment variable that points at an explicit settings file.
pub const SETTINGS_ENV_VAR: &str = "PWRCTL_CONFIG";

// --- Process exit statuses not taken from a native code ---

/// The operation was accepted, or the what-if run passed every check.
pub const EXIT_SUCCESS: i32 = 0;

/// A failure with no usable native code.
pub const EXIT_FAILURE: i32 = 1;

/// The request itself was malformed.
pub const EXIT_USAGE: i32 = 2;

/// The operation was cancelled before any privileged step began.
pub const EXIT_CANCELLED: i32 = 130;

// --- Linux reboot(2) ABI ---

/// First magic argument required by the raw `reboot` syscall.
pub const LINUX_REBOOT_MAGIC1: u32 = 0xfee1_dead;

/// Second magic argument required by the raw `reboot` syscall.
pub const LINUX_REBOOT_MAGIC2: u32 = 0x2812_1969;

/// Restart the system.
pub const LINUX_REBOOT_CMD_RESTART: u32 = 0x0123_4567;
/// Halt the system without powering it off.
pub const LINUX_REBOOT_CMD_HALT: u32 = 0xCDEF_0123;
/// Let Ctrl-Alt-Del trigger an immediate restart.
pub const LINUX_REBOOT_CMD_CAD_ON: u32 = 0x89AB_CDEF;
/// Send Ctrl-Alt-Del to init instead.
pub const LINUX_REBOOT_CMD_CAD_OFF: u32 = 0x0000_0000;
/// Power the system off.
pub const LINUX_REBOOT_CMD_POWER_OFF: u32 = 0x4321_FEDC;
/// Restart with a command string.
pub const LINUX_REBOOT_CMD_RESTART2: u32 = 0xA1B2_C3D4;
/// Suspend to disk.
pub const LINUX_REBOOT_CMD_SW_SUSPEND: u32 = 0xD000_FCE2;
/// Boot a kernel loaded with `kexec_load`.
pub const LINUX_REBOOT_CMD_KEXEC: u32 = 0x4558_4543;

// --- errno values classified after a failed syscall ---

/// The caller lacks `CAP_SYS_BOOT`.
pub const EPERM: i32 = 1;
/// Bad argument pointer.
pub const EFAULT: i32 = 14;
/// Bad magic numbers or command.
pub const EINVAL: i32 = 22;

// --- Win32 ---

/// `TOKEN_ADJUST_PRIVILEGES` access right.
pub const TOKEN_ADJUST_PRIVILEGES: u32 = 0x0020;

/// `TOKEN_QUERY` access right.
pub const TOKEN_QUERY: u32 = 0x0008;

/// `SE_PRIVILEGE_ENABLED` attribute for a `LUID_AND_ATTRIBUTES` entry.
pub const SE_PRIVILEGE_ENABLED: u32 = 0x0000_0002;

/// Name of the privilege required by `ExitWindowsEx`.
pub const SE_SHUTDOWN_NAME: &str = "SeShutdownPrivilege";

/// `ExitWindowsEx`: restart.
pub const EWX_REBOOT: u32 = 0x0000_0002;
/// `ExitWindowsEx`: do not wait for applications to close.
pub const EWX_FORCE: u32 = 0x0000_0004;
/// `ExitWindowsEx`: power off.
pub const EWX_POWEROFF: u32 = 0x0000_0008;

/// No shutdown reason.
pub const SHTDN_REASON_NONE: u32 = 0x0000_0000;
/// Hardware issue.
pub const SHTDN_REASON_MAJOR_HARDWARE: u32 = 0x0001_0000;
/// Software issue.
pub const SHTDN_REASON_MAJOR_SOFTWARE: u32 = 0x0003_0000;
/// Power failure.
pub const SHTDN_REASON_MAJOR_POWER: u32 = 0x0006_0000;

/// Win32 `ERROR_ACCESS_DENIED`.
pub const ERROR_ACCESS_DENIED: u32 = 5;
/// Win32 `ERROR_INVALID_PARAMETER`.
pub const ERROR_INVALID_PARAMETER: u32 = 87;
/// Win32 `ERROR_NOT_ALL_ASSIGNED`: the token does not hold the privilege.
pub const ERROR_NOT_ALL_ASSIGNED: u32 = 1300;
/// Win32 `ERROR_PRIVILEGE_NOT_HELD`.
pub const ERROR_PRIVILEGE_NOT_HELD: u32 = 1314;
