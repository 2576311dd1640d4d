//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! # Architecture
//!
//! Commands are dispatched via [`CommandDispatcher`], which routes CLI
//! subcommands to their implementations. This allows:
//! - Single binary with subcommands (`tally setup`, `tally status`)
//! - Shared initialization logic
//! - Consistent global flag handling

pub mod balance;
pub mod completions;
pub mod config;
pub mod dispatcher;
pub mod history;
pub mod setup;
pub mod status;
pub mod transfer;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};
