// src/bin/pwrctl.rs

//! The `pwrctl` command-line tool.

use anyhow::Result;
use clap::Parser;
use colored::*;
use pwrctl::{
    CancellationToken,
    cli::{Cli, HandlerContext, dispatcher},
    constants::EXIT_FAILURE,
    core::{dispatch, paths},
    t,
};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

/// The entry point of `pwrctl`: sets up logging, dispatches and turns the result into an
/// exit status.
fn main() {
    let cancellation_token = Arc::new(AtomicBool::new(false));
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Ctrl-C only raises the flag; the power protocol checks it once, before its first step.
    let on_interrupt = dispatch::interrupt_handler(Arc::clone(&cancellation_token));
    if let Err(e) = ctrlc::set_handler(on_interrupt) {
        log::warn!("Could not install the Ctrl-C handler: {}", e);
    }

    match run_cli(cli, cancellation_token) {
        Ok(status) => std::process::exit(status),
        Err(e) => {
            eprintln!("\n{}: {:#}", t!("console.error_label").red().bold(), e);
            std::process::exit(EXIT_FAILURE);
        }
    }
}

/// `RUST_LOG` wins; otherwise `--verbose` selects debug and the default is warn.
fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn run_cli(cli: Cli, cancellation_token: CancellationToken) -> Result<i32> {
    log::debug!("CLI args parsed: {:?}", cli);

    let context = HandlerContext {
        settings_location: paths::resolve_settings_location(cli.config),
        verbose: cli.verbose,
        cancellation_token,
    };
    dispatcher::dispatch(cli.command, cli.args, &context)
}
