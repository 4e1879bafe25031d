//! Command-line surface of `pwrctl`.

use crate::{CancellationToken, core::paths::SettingsLocation};
use clap::Parser;
use std::path::PathBuf;

pub mod console;
pub mod dispatcher;
pub mod handlers;

/// pwrctl: shut down, reboot or power-cycle this machine.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    styles = clap::builder::Styles::styled()
        .header(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
        .usage(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
        .literal(clap::builder::styling::AnsiColor::Cyan.on_default().bold())
        .placeholder(clap::builder::styling::AnsiColor::Green.on_default()),
)]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// Log every step at debug level and print the cause chain of failures.
    #[arg(short, long)]
    pub verbose: bool,

    /// Read settings from this file instead of the default location.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// The command to run (`power`).
    pub command: Option<String>,

    /// Arguments for the command.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

/// What every command handler receives besides its own arguments.
#[derive(Debug)]
pub struct HandlerContext {
    pub settings_location: SettingsLocation,
    pub verbose: bool,
    pub cancellation_token: CancellationToken,
}
