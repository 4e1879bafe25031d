// src/core/mod.rs

//! Platform-independent power logic.

pub mod dispatch;
pub mod error;
pub mod paths;
pub mod reporter;
pub mod selector;
pub mod settings;
