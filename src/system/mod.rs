//! # System Interaction Layer
//!
//! The boundary between the power core and the operating system.
//!
//! ## Modules
//!
//! - **`windows`**: The token / privilege / `ExitWindowsEx` protocol, written against the
//!   `SecurityApi` trait so it builds and is tested on every platform.
//! - **`windows_ffi`**: The Win32 implementation of `SecurityApi`. Windows only.
//! - **`posix`**: The `reboot(2)` magic-constant table, errno classification and the POSIX
//!   executor, plus the libc syscall backend on Linux.
//! - **`service_manager`**: The fallback that asks `systemctl`/`shutdown` instead of the
//!   kernel, for systems without the Linux syscall.

pub mod posix;
pub mod service_manager;
pub mod windows;
#[cfg(windows)]
pub mod windows_ffi;
