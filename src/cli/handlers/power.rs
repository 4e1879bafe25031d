// src/cli/handlers/power.rs

//! `pwrctl power`: shut down, reboot or power-cycle.

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    CancellationToken,
    cli::{HandlerContext, console::ConsoleSink},
    core::{
        dispatch,
        error::PowerError,
        reporter::{self, ErrorFormat},
        selector::PlatformSelector,
        settings::{PowerSettings, Settings},
    },
    models::{PlatformOutcome, PowerRequest},
};

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    name = "power",
    about = "Shuts down, reboots or power-cycles this machine."
)]
struct PowerArgs {
    /// The operation: off (shutdown, poweroff), reboot (restart) or cycle.
    action: String,

    /// Why the machine is going down: none, power, software, hardware or 0-3.
    #[arg(short, long)]
    reason: Option<String>,

    /// Do not wait for running applications to close.
    #[arg(short, long)]
    force: bool,

    /// Run every check, including privilege elevation, but do not send the request.
    #[arg(long = "what-if", hide = true)]
    what_if: bool,
}

/// The handler for `power`. Returns the exit status of the operation.
pub fn handle(args: Vec<String>, context: &HandlerContext) -> Result<i32> {
    let power_args = match PowerArgs::try_parse_from(&args) {
        Ok(parsed) => parsed,
        Err(e) => {
            // `--help` lands here too, with a zero exit code.
            e.print()?;
            return Ok(e.exit_code());
        }
    };

    let settings = Settings::load(&context.settings_location)
        .with_context(|| t!("settings.error.load_failed"))?;

    let outcome = run_power(power_args, &settings, &context.cancellation_token);

    let format = ErrorFormat {
        show_causes: context.verbose,
    };
    Ok(reporter::report(&outcome, &mut ConsoleSink, format))
}

/// Turns the parsed arguments into a request, filling gaps from the settings file.
fn build_request(power_args: &PowerArgs, power: &PowerSettings) -> Result<PowerRequest, PowerError> {
    let default_reason = power.default_reason.to_string();
    PowerRequest::parse(
        &power_args.action,
        Some(power_args.reason.as_deref().unwrap_or(&default_reason)),
        power_args.force || power.force,
        power_args.what_if,
    )
}

/// Builds the request, resolves the executor for this OS and runs it.
fn run_power(
    power_args: PowerArgs,
    settings: &Settings,
    cancellation_token: &CancellationToken,
) -> PlatformOutcome {
    let request = match build_request(&power_args, &settings.power) {
        Ok(request) => request,
        Err(e) => return PlatformOutcome::failed(e),
    };
    log::debug!("Built {:?}.", request);

    let executor = match PlatformSelector::new(settings.posix.clone()).resolve() {
        Ok(executor) => executor,
        Err(e) => return PlatformOutcome::failed(e),
    };
    log::info!("Using the '{}' executor.", executor.name());

    dispatch::execute(executor.as_ref(), request, cancellation_token)
}
