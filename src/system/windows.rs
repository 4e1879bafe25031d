// src/system/windows.rs

//! The Windows shutdown protocol.
//!
//! `ExitWindowsEx` only succeeds for a process whose token has `SeShutdownPrivilege` enabled,
//! so every request walks the same sequence:
//!
//! `Start → TokenOpened → PrivilegeResolved → PrivilegeAdjusted → Dispatched → Done`
//!
//! Any step may end the sequence with a classified failure. The process token is held in a
//! scope guard from the moment it is opened, so it is released exactly once on every path.
//!
//! The protocol is written against [`SecurityApi`] and compiles everywhere. The real Win32
//! backend lives in `windows_ffi` and only exists on Windows.

use crate::{
    constants::{
        ERROR_ACCESS_DENIED, ERROR_INVALID_PARAMETER, ERROR_NOT_ALL_ASSIGNED,
        ERROR_PRIVILEGE_NOT_HELD, EWX_FORCE, EWX_POWEROFF, EWX_REBOOT, SHTDN_REASON_MAJOR_HARDWARE,
        SHTDN_REASON_MAJOR_POWER, SHTDN_REASON_MAJOR_SOFTWARE, SHTDN_REASON_NONE,
    },
    core::{dispatch::PowerExecutor, error::PowerError},
    models::{ErrorKind, PlatformOutcome, PowerReason, PowerRequest},
};
use std::fmt;

/// A locally-unique identifier naming a privilege.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Luid {
    /// Low-order 32 bits.
    pub low_part: u32,
    /// High-order 32 bits.
    pub high_part: i32,
}

/// The Win32 security and shutdown primitives the protocol needs.
///
/// Every fallible call returns the thread's last-error code on failure.
pub trait SecurityApi: fmt::Debug {
    /// An open process token.
    type Token;

    /// Opens the current process token with adjust and query rights.
    fn open_process_token(&self) -> Result<Self::Token, u32>;

    /// Resolves `SeShutdownPrivilege` to its LUID on the local system.
    fn lookup_shutdown_privilege(&self) -> Result<Luid, u32>;

    /// Enables a single privilege on the token.
    fn enable_privilege(&self, token: &Self::Token, privilege: Luid) -> Result<(), u32>;

    /// Calls `ExitWindowsEx`. On success the OS may end this process at any moment.
    fn exit_windows(&self, flags: u32, reason: u32) -> Result<(), u32>;

    /// Closes the token handle.
    fn release_token(&self, token: Self::Token);
}

/// A protocol step, used for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElevationStep {
    /// Step 1: open the process token.
    OpenToken,
    /// Step 2: look up `SeShutdownPrivilege`.
    ResolvePrivilege,
    /// Step 3: enable the privilege on the token.
    AdjustPrivilege,
    /// Step 7: `ExitWindowsEx`.
    Dispatch,
}

impl ElevationStep {
    /// The Win32 primitive behind the step.
    pub fn primitive(self) -> &'static str {
        match self {
            Self::OpenToken => "OpenProcessToken",
            Self::ResolvePrivilege => "LookupPrivilegeValue",
            Self::AdjustPrivilege => "AdjustTokenPrivileges",
            Self::Dispatch => "ExitWindowsEx",
        }
    }
}

/// Maps a reason onto the `SHTDN_REASON_*` code passed to `ExitWindowsEx`.
pub fn shutdown_reason_code(reason: PowerReason) -> u32 {
    match reason {
        PowerReason::None => SHTDN_REASON_NONE,
        PowerReason::Power => SHTDN_REASON_MAJOR_POWER,
        PowerReason::Software => SHTDN_REASON_MAJOR_SOFTWARE,
        PowerReason::Hardware => SHTDN_REASON_MAJOR_HARDWARE,
    }
}

/// Computes the `EWX_*` flags for a power-off or a restart.
pub fn exit_flags(restart: bool, force: bool) -> u32 {
    let base = if restart { EWX_REBOOT } else { EWX_POWEROFF };
    if force { base | EWX_FORCE } else { base }
}

/// Classifies a Win32 last-error code reported by one of the protocol steps.
pub fn classify_win32_error(step: ElevationStep, code: u32) -> ErrorKind {
    match (step, code) {
        // The privilege should always exist; failing to resolve it is anomalous.
        (ElevationStep::ResolvePrivilege, _) => ErrorKind::PlatformError,
        (_, ERROR_ACCESS_DENIED) => ErrorKind::PermissionDenied,
        (
            ElevationStep::AdjustPrivilege | ElevationStep::Dispatch,
            ERROR_NOT_ALL_ASSIGNED | ERROR_PRIVILEGE_NOT_HELD,
        ) => ErrorKind::PermissionDenied,
        (ElevationStep::Dispatch, ERROR_INVALID_PARAMETER) => ErrorKind::InvalidArgument,
        _ => ErrorKind::PlatformError,
    }
}

fn win32_error(step: ElevationStep, code: u32) -> PowerError {
    let kind = classify_win32_error(step, code);
    log::debug!(
        "{} failed with Win32 error {} ({}).",
        step.primitive(),
        code,
        kind
    );
    // Exit codes are 32-bit on Windows; the bit pattern is passed through unchanged.
    PowerError::from_native(kind, step.primitive(), code as i32)
}

/// Runs the privilege-elevation protocol on top of a [`SecurityApi`].
#[derive(Debug)]
pub struct WindowsExecutor<A: SecurityApi> {
    api: A,
}

impl<A: SecurityApi> WindowsExecutor<A> {
    /// An executor that calls through `api`.
    pub fn new(api: A) -> Self {
        Self { api }
    }

    fn run(&self, request: PowerRequest) -> PlatformOutcome {
        match self.elevate_and_dispatch(&request) {
            Ok(outcome) => outcome,
            Err(e) => PlatformOutcome::failed(e),
        }
    }

    /// Steps 1 to 8 of the protocol. A what-if request still elevates and only skips the
    /// final `ExitWindowsEx`, which makes it a dry run of "do we have permission".
    fn elevate_and_dispatch(&self, request: &PowerRequest) -> Result<PlatformOutcome, PowerError> {
        log::debug!("Windows power protocol: Start");

        // 1. Open the token. From here on it is released when the guard drops.
        let token = self
            .api
            .open_process_token()
            .map_err(|code| win32_error(ElevationStep::OpenToken, code))?;
        let token = scopeguard::guard(token, |token| {
            log::debug!("Releasing process token.");
            self.api.release_token(token);
        });
        log::debug!("Windows power protocol: TokenOpened");

        // 2. Resolve the privilege name.
        let privilege = self
            .api
            .lookup_shutdown_privilege()
            .map_err(|code| win32_error(ElevationStep::ResolvePrivilege, code))?;
        log::debug!("Windows power protocol: PrivilegeResolved ({:?})", privilege);

        // 3. Enable it on the token.
        self.api
            .enable_privilege(&token, privilege)
            .map_err(|code| win32_error(ElevationStep::AdjustPrivilege, code))?;
        log::debug!("Windows power protocol: PrivilegeAdjusted");

        // 4 & 5. Reason code and flags.
        let reason = shutdown_reason_code(request.reason());
        let flags = exit_flags(request.operation().restarts(), request.force());

        // 6. What-if stops short of the irreversible call.
        if request.simulate() {
            log::info!(
                "What-if: skipping ExitWindowsEx(flags={:#x}, reason={:#x}).",
                flags,
                reason
            );
            return Ok(PlatformOutcome::simulated());
        }

        // 7. Dispatch. Success means "accepted"; the OS may end this process asynchronously.
        log::info!(
            "Calling ExitWindowsEx(flags={:#x}, reason={:#x}).",
            flags,
            reason
        );
        self.api
            .exit_windows(flags, reason)
            .map_err(|code| win32_error(ElevationStep::Dispatch, code))?;
        log::debug!("Windows power protocol: Dispatched");

        // 8. The guard releases the token on the way out.
        Ok(PlatformOutcome::accepted())
    }
}

impl<A: SecurityApi> PowerExecutor for WindowsExecutor<A> {
    fn name(&self) -> &'static str {
        "windows"
    }

    fn shutdown(&self, request: PowerRequest) -> PlatformOutcome {
        self.run(request)
    }

    fn reboot(&self, request: PowerRequest) -> PlatformOutcome {
        self.run(request)
    }
}
