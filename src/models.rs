// src/models.rs

//! Power requests and the outcome every executor returns.

use crate::core::error::PowerError;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

// --- REQUEST MODELS ---

/// The power operation a caller asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PowerOperation {
    /// Power the machine off.
    Shutdown,
    /// Restart the machine.
    Reboot,
    /// Power-cycle the machine. Carried out as a reboot.
    Cycle,
}

impl PowerOperation {
    /// Every operation, in declaration order.
    pub const ALL: [Self; 3] = [Self::Shutdown, Self::Reboot, Self::Cycle];

    /// `true` when the operation ends in a restart rather than a power-off.
    pub fn restarts(self) -> bool {
        matches!(self, Self::Reboot | Self::Cycle)
    }
}

impl fmt::Display for PowerOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Shutdown => "shutdown",
            Self::Reboot => "reboot",
            Self::Cycle => "cycle",
        };
        f.write_str(name)
    }
}

impl FromStr for PowerOperation {
    type Err = PowerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "off" | "shutdown" | "poweroff" => Ok(Self::Shutdown),
            "reboot" | "restart" => Ok(Self::Reboot),
            "cycle" => Ok(Self::Cycle),
            _ => Err(PowerError::InvalidRequest(format!(
                "unknown power operation '{}' (expected off, reboot or cycle)",
                s
            ))),
        }
    }
}

/// Why the power operation happens. Forwarded to the OS shutdown-reason subsystem where one exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerReason {
    /// No reason given.
    #[default]
    None,
    /// A power failure.
    Power,
    /// A software failure.
    Software,
    /// A hardware failure.
    Hardware,
}

impl PowerReason {
    /// Every reason, in ordinal order.
    pub const ALL: [Self; 4] = [Self::None, Self::Power, Self::Software, Self::Hardware];
}

impl fmt::Display for PowerReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "none",
            Self::Power => "power",
            Self::Software => "software",
            Self::Hardware => "hardware",
        };
        f.write_str(name)
    }
}

impl TryFrom<u32> for PowerReason {
    type Error = PowerError;

    fn try_from(ordinal: u32) -> Result<Self, Self::Error> {
        match ordinal {
            0 => Ok(Self::None),
            1 => Ok(Self::Power),
            2 => Ok(Self::Software),
            3 => Ok(Self::Hardware),
            other => Err(PowerError::UnsupportedReason(other.to_string())),
        }
    }
}

impl FromStr for PowerReason {
    type Err = PowerError;

    /// Accepts a reason name (any case) or its ordinal.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(ordinal) = trimmed.parse::<u32>() {
            return Self::try_from(ordinal);
        }
        match trimmed.to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "power" => Ok(Self::Power),
            "software" => Ok(Self::Software),
            "hardware" => Ok(Self::Hardware),
            _ => Err(PowerError::UnsupportedReason(s.to_string())),
        }
    }
}

/// A validated, immutable description of one power operation.
///
/// The value is neither `Clone` nor `Copy`: it is built once by the caller and moved into
/// exactly one executor.
#[derive(Debug, PartialEq, Eq)]
pub struct PowerRequest {
    operation: PowerOperation,
    reason: PowerReason,
    force: bool,
    simulate: bool,
}

impl PowerRequest {
    /// Builds a request from already-typed parts.
    pub fn new(operation: PowerOperation, reason: PowerReason, force: bool, simulate: bool) -> Self {
        Self {
            operation,
            reason,
            force,
            simulate,
        }
    }

    /// Builds a request from raw text, validating the operation and the reason.
    ///
    /// # Errors
    /// `InvalidRequest` for an operation outside {off, reboot, cycle} and `UnsupportedReason`
    /// for a reason outside {none, power, software, hardware}.
    pub fn parse(
        operation: &str,
        reason: Option<&str>,
        force: bool,
        simulate: bool,
    ) -> Result<Self, PowerError> {
        let operation = operation.parse()?;
        let reason = match reason {
            Some(text) => text.parse()?,
            None => PowerReason::default(),
        };
        Ok(Self::new(operation, reason, force, simulate))
    }

    /// What to do.
    pub fn operation(&self) -> PowerOperation {
        self.operation
    }

    /// Why.
    pub fn reason(&self) -> PowerReason {
        self.reason
    }

    /// Whether running applications are closed without waiting.
    pub fn force(&self) -> bool {
        self.force
    }

    /// `true` for a what-if run: every step except the final dispatch is performed.
    pub fn simulate(&self) -> bool {
        self.simulate
    }
}

// --- OUTCOME MODELS ---

/// Classification of a failed power operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The caller lacks the rights for the operation.
    PermissionDenied,
    /// The request or a platform call argument was malformed.
    InvalidArgument,
    /// No executor exists for the running platform.
    UnsupportedPlatform,
    /// The reason is outside the defined set.
    UnsupportedReason,
    /// An opaque native failure.
    PlatformError,
    /// The operation was cancelled before any privileged step began.
    Cancelled,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::PermissionDenied => "permission denied",
            Self::InvalidArgument => "invalid argument",
            Self::UnsupportedPlatform => "unsupported platform",
            Self::UnsupportedReason => "unsupported reason",
            Self::PlatformError => "platform error",
            Self::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

/// The single result an executor hands to the reporter.
#[derive(Debug)]
pub struct PlatformOutcome {
    simulated: bool,
    error: Option<PowerError>,
}

impl PlatformOutcome {
    /// The operating system accepted the request.
    pub fn accepted() -> Self {
        Self {
            simulated: false,
            error: None,
        }
    }

    /// A what-if run got as far as the final dispatch and stopped there.
    pub fn simulated() -> Self {
        Self {
            simulated: true,
            error: None,
        }
    }

    /// The operation failed with a classified error.
    pub fn failed(error: PowerError) -> Self {
        Self {
            simulated: false,
            error: Some(error),
        }
    }

    /// `true` for an accepted or simulated request.
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }

    /// `true` when a what-if run stopped before dispatch.
    pub fn was_simulated(&self) -> bool {
        self.simulated
    }

    /// The raw platform code. Zero on success.
    pub fn native_code(&self) -> i32 {
        self.error
            .as_ref()
            .and_then(PowerError::native_code)
            .unwrap_or(0)
    }

    /// The failure class, if the operation failed.
    pub fn classification(&self) -> Option<ErrorKind> {
        self.error.as_ref().map(PowerError::kind)
    }

    /// The failure, if any.
    pub fn error(&self) -> Option<&PowerError> {
        self.error.as_ref()
    }
}

impl From<PowerError> for PlatformOutcome {
    fn from(error: PowerError) -> Self {
        Self::failed(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_parsing_accepts_aliases() {
        assert_eq!("off".parse::<PowerOperation>().unwrap(), PowerOperation::Shutdown);
        assert_eq!("Shutdown".parse::<PowerOperation>().unwrap(), PowerOperation::Shutdown);
        assert_eq!("restart".parse::<PowerOperation>().unwrap(), PowerOperation::Reboot);
        assert_eq!(" cycle ".parse::<PowerOperation>().unwrap(), PowerOperation::Cycle);
    }

    #[test]
    fn test_unknown_operation_is_invalid_argument() {
        let err = "hibernate".parse::<PowerOperation>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(err.native_code(), None);
    }

    #[test]
    fn test_cycle_restarts_like_reboot() {
        assert!(PowerOperation::Cycle.restarts());
        assert!(PowerOperation::Reboot.restarts());
        assert!(!PowerOperation::Shutdown.restarts());
    }

    #[test]
    fn test_reason_parses_names_and_ordinals() {
        assert_eq!("HARDWARE".parse::<PowerReason>().unwrap(), PowerReason::Hardware);
        for (ordinal, reason) in PowerReason::ALL.iter().enumerate() {
            let text = ordinal.to_string();
            assert_eq!(text.parse::<PowerReason>().unwrap(), *reason);
        }
    }

    #[test]
    fn test_out_of_range_reason_is_unsupported() {
        for text in ["4", "99", "cosmic-rays", ""] {
            let err = text.parse::<PowerReason>().unwrap_err();
            assert_eq!(err.kind(), ErrorKind::UnsupportedReason, "input: {:?}", text);
        }
        assert!(matches!(
            PowerReason::try_from(7),
            Err(PowerError::UnsupportedReason(ref s)) if s == "7"
        ));
    }

    #[test]
    fn test_request_parse_defaults_reason_to_none() {
        let request = PowerRequest::parse("reboot", None, true, false).unwrap();
        assert_eq!(request.operation(), PowerOperation::Reboot);
        assert_eq!(request.reason(), PowerReason::None);
        assert!(request.force());
        assert!(!request.simulate());
    }

    #[test]
    fn test_request_parse_rejects_bad_operation_before_reason() {
        let err = PowerRequest::parse("nap", Some("bogus"), false, false).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_reason_deserializes_from_lowercase_names() {
        #[derive(Deserialize)]
        struct Holder {
            reason: PowerReason,
        }
        let holder: Holder = toml::from_str(r#"reason = "software""#).unwrap();
        assert_eq!(holder.reason, PowerReason::Software);
    }

    #[test]
    fn test_outcome_accessors() {
        let ok = PlatformOutcome::accepted();
        assert!(ok.succeeded());
        assert_eq!(ok.native_code(), 0);
        assert_eq!(ok.classification(), None);

        let failed = PlatformOutcome::from(PowerError::Cancelled);
        assert!(!failed.succeeded());
        assert_eq!(failed.classification(), Some(ErrorKind::Cancelled));
        assert_eq!(failed.native_code(), 0);
    }
}
