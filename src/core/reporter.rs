// src/core/reporter.rs

//! Turns an outcome into one diagnostic and an exit status.

use crate::{
    constants::{EXIT_CANCELLED, EXIT_FAILURE, EXIT_SUCCESS, EXIT_USAGE},
    core::error::PowerError,
    models::{ErrorKind, PlatformOutcome},
};

/// How an error should be rendered by the sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ErrorFormat {
    /// Also render the chain of underlying causes.
    pub show_causes: bool,
}

/// The output collaborator the reporter writes through. Formatting and color belong to it.
pub trait ReportSink {
    /// Writes the one line reported for a success.
    fn write_line(&mut self, text: &str);
    /// Writes the one diagnostic reported for a failure.
    fn write_error(&mut self, error: &PowerError, format: ErrorFormat);
}

/// Maps an outcome onto the process exit status.
///
/// Native codes pass through unmodified. A failure that carries no usable native code still
/// never exits with 0.
pub fn exit_status(outcome: &PlatformOutcome) -> i32 {
    let Some(error) = outcome.error() else {
        return EXIT_SUCCESS;
    };
    match error.native_code() {
        Some(code) if code != 0 => code,
        _ => match error.kind() {
            ErrorKind::Cancelled => EXIT_CANCELLED,
            ErrorKind::UnsupportedReason => EXIT_USAGE,
            ErrorKind::InvalidArgument if error.native_code().is_none() => EXIT_USAGE,
            _ => EXIT_FAILURE,
        },
    }
}

/// Hands exactly one diagnostic to the sink and returns the exit status.
pub fn report(outcome: &PlatformOutcome, sink: &mut dyn ReportSink, format: ErrorFormat) -> i32 {
    match outcome.error() {
        None if outcome.was_simulated() => sink.write_line(t!("report.simulated")),
        None => sink.write_line(t!("report.accepted")),
        Some(error) => sink.write_error(error, format),
    }
    exit_status(outcome)
}
