//! Command-line interface for Tally.
//!
//! This module provides the CLI argument parsing using clap's derive macros
//! and command implementations.
//!
//! # Architecture
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`commands`] - Command implementations

pub mod args;
pub mod commands;

pub use args::{
    BalanceArgs, Cli, Commands, ConfigArgs, HistoryArgs, SetupArgs, StatusArgs, TransferArgs,
};
pub use commands::{Command, CommandDispatcher, CommandResult};
