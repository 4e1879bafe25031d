// src/core/error.rs

//! Classified power failures.

use crate::models::ErrorKind;
use thiserror::Error;

/// A classified power-operation failure.
///
/// Every platform call is turned into one of these at its own boundary, so a failure never
/// travels further as a bare integer. `step` names the primitive that failed.
#[derive(Error, Debug)]
pub enum PowerError {
    /// The caller lacks the right or privilege for `step`.
    #[error("{step} was denied by the operating system (native code {code}).")]
    PermissionDenied { step: &'static str, code: i32 },

    /// `step` rejected its arguments.
    #[error("{step} rejected its arguments (native code {code}).")]
    InvalidArgument { step: &'static str, code: i32 },

    /// The request text named no known operation.
    #[error("Invalid power request: {0}")]
    InvalidRequest(String),

    /// No executor exists for, or was built into, this platform.
    #[error("No power implementation is available for platform '{0}'.")]
    UnsupportedPlatform(String),

    /// A reason outside none, power, software and hardware.
    #[error("Unrecognized power-off reason '{0}'.")]
    UnsupportedReason(String),

    /// `step` failed with a code that has no finer classification.
    #[error("{step} failed (native code {code}).")]
    Platform { step: &'static str, code: i32 },

    /// A halting call came back.
    #[error("{step} returned {value} instead of halting the machine.")]
    UnexpectedReturn { step: &'static str, value: i64 },

    /// A configured service-manager command line cannot be run.
    #[error("Setting `{key}` is not a usable command line: {problem}")]
    ServiceManagerSetting { key: &'static str, problem: String },

    /// The reboot command has no service-manager counterpart.
    #[error("{0} has no service-manager equivalent.")]
    NoServiceManagerCommand(String),

    /// The service-manager command exited non-zero.
    #[error("Service manager command '{command}' exited with status {status}.")]
    ServiceManagerStatus { command: String, status: i32 },

    /// The service-manager command was killed by a signal.
    #[error("Service manager command '{command}' was terminated before it could report a status.")]
    ServiceManagerTerminated { command: String },

    /// The service-manager command could not be spawned.
    #[error("Service manager command '{command}' could not be started: {source}")]
    ServiceManagerSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Cancelled before the first step.
    #[error("Operation was cancelled before any privileged step began.")]
    Cancelled,
}

impl PowerError {
    /// The taxonomy bucket this failure belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::PermissionDenied { .. } => ErrorKind::PermissionDenied,
            Self::InvalidArgument { .. }
            | Self::InvalidRequest(_)
            | Self::ServiceManagerSetting { .. }
            | Self::NoServiceManagerCommand(_) => ErrorKind::InvalidArgument,
            Self::UnsupportedPlatform(_) => ErrorKind::UnsupportedPlatform,
            Self::UnsupportedReason(_) => ErrorKind::UnsupportedReason,
            Self::Platform { .. }
            | Self::UnexpectedReturn { .. }
            | Self::ServiceManagerStatus { .. }
            | Self::ServiceManagerTerminated { .. }
            | Self::ServiceManagerSpawn { .. } => ErrorKind::PlatformError,
            Self::Cancelled => ErrorKind::Cancelled,
        }
    }

    /// The raw code reported by the platform, when the platform reported one.
    pub fn native_code(&self) -> Option<i32> {
        match self {
            Self::PermissionDenied { code, .. }
            | Self::InvalidArgument { code, .. }
            | Self::Platform { code, .. } => Some(*code),
            Self::UnexpectedReturn { value, .. } => {
                Some(i32::try_from(*value).unwrap_or(i32::MAX))
            }
            Self::ServiceManagerStatus { status, .. } => Some(*status),
            Self::InvalidRequest(_)
            | Self::UnsupportedPlatform(_)
            | Self::UnsupportedReason(_)
            | Self::ServiceManagerSetting { .. }
            | Self::NoServiceManagerCommand(_)
            | Self::ServiceManagerTerminated { .. }
            // The spawn error is an OS error about the helper, not a power-call code.
            | Self::ServiceManagerSpawn { .. }
            | Self::Cancelled => None,
        }
    }

    /// Builds the error for a failed platform call from its kind and native code.
    pub(crate) fn from_native(kind: ErrorKind, step: &'static str, code: i32) -> Self {
        match kind {
            ErrorKind::PermissionDenied => Self::PermissionDenied { step, code },
            ErrorKind::InvalidArgument => Self::InvalidArgument { step, code },
            _ => Self::Platform { step, code },
        }
    }
}
