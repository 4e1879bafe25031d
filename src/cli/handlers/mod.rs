//! One module per command.

pub mod power;
