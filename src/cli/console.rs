// src/cli/console.rs

//! Terminal output for reports.

use crate::core::{
    error::PowerError,
    reporter::{ErrorFormat, ReportSink},
};
use colored::*;
use std::error::Error;

/// Writes report lines to stdout and diagnostics to stderr, colored when the terminal allows.
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl ReportSink for ConsoleSink {
    fn write_line(&mut self, text: &str) {
        println!("{}", text.green());
    }

    fn write_error(&mut self, error: &PowerError, format: ErrorFormat) {
        eprintln!("{}: {}", t!("console.error_label").red().bold(), error);
        if !format.show_causes {
            return;
        }
        let mut source = error.source();
        while let Some(cause) = source {
            eprintln!("  {}: {}", t!("console.caused_by").dimmed(), cause);
            source = cause.source();
        }
    }
}
