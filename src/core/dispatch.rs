// src/core/dispatch.rs

//! The executor capability and the single cancellation checkpoint.

use crate::{
    CancellationToken,
    core::error::PowerError,
    models::{PlatformOutcome, PowerOperation, PowerRequest},
};
use std::fmt;
use std::sync::atomic::Ordering;

/// The capability every platform executor provides.
///
/// Each call owns its request and runs the platform protocol to completion. Implementations
/// hold no state shared between invocations.
pub trait PowerExecutor: fmt::Debug {
    /// A short name for logs (e.g. `"windows"`, `"linux-syscall"`).
    fn name(&self) -> &'static str;

    /// Powers the machine off.
    fn shutdown(&self, request: PowerRequest) -> PlatformOutcome;

    /// Restarts the machine. Power-cycles go through here too.
    fn reboot(&self, request: PowerRequest) -> PlatformOutcome;
}

/// Returns `Err(Cancelled)` if cancellation has been requested.
pub fn check_for_cancellation(cancellation_token: &CancellationToken) -> Result<(), PowerError> {
    if cancellation_token.load(Ordering::SeqCst) {
        return Err(PowerError::Cancelled);
    }
    Ok(())
}

/// Builds the Ctrl-C handler for `cancellation_token`.
///
/// The handler only raises the flag, so the default termination is replaced by the single
/// checkpoint in [`execute`]. A protocol that has already started is not interrupted.
pub fn interrupt_handler(cancellation_token: CancellationToken) -> impl FnMut() + Send + 'static {
    move || {
        cancellation_token.store(true, Ordering::SeqCst);
        log::warn!(
            "Interrupt received. A power operation that has not started is cancelled; one already in progress will run to completion."
        );
    }
}

/// Runs one request through an executor.
///
/// Cancellation is observed exactly once, here, before the executor's first step. Once the
/// protocol has started it runs to completion.
pub fn execute(
    executor: &dyn PowerExecutor,
    request: PowerRequest,
    cancellation_token: &CancellationToken,
) -> PlatformOutcome {
    if let Err(e) = check_for_cancellation(cancellation_token) {
        log::debug!("Cancellation requested before {} started.", executor.name());
        return PlatformOutcome::failed(e);
    }

    log::debug!(
        "Dispatching {:?} to the '{}' executor.",
        request,
        executor.name()
    );
    match request.operation() {
        PowerOperation::Shutdown => executor.shutdown(request),
        PowerOperation::Reboot | PowerOperation::Cycle => executor.reboot(request),
    }
}
