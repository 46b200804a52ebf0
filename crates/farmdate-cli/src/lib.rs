//! Library half of the `farmdate` binary: logging setup, argument reading,
//! and subcommand bodies.

pub mod commands;
pub mod input;
pub mod logging;
