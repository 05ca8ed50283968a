//! Command-line interface: argument parsing and one-shot command handlers.

pub mod args;
pub mod commands;
