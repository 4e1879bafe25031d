//! Cross-platform shutdown, reboot and power-cycle control.
//!
//! A caller builds one [`models::PowerRequest`], resolves the executor for the running OS
//! with [`PlatformSelector`](crate::core::selector::PlatformSelector), runs it through
//! [`execute`](crate::core::dispatch::execute) and renders the [`models::PlatformOutcome`]
//! with [`report`](crate::core::reporter::report).

include!(concat!(env!("OUT_DIR"), "/translations.rs"));

use std::sync::Arc;
use std::sync::atomic::AtomicBool;

/// Set to `true` to cancel an operation that has not yet started its privileged steps.
pub type CancellationToken = Arc<AtomicBool>;

pub mod cli;
pub mod constants;
pub mod core;
pub mod models;
pub mod system;
