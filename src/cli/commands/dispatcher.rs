//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::path::{Path, PathBuf};

use crate::cli::args::{Cli, Commands};
use crate::config::Config;
use crate::error::Result;
use crate::flow::CancelToken;
use crate::ui::UserInterface;

/// Exit code for a run the user aborted, by declining or interrupting.
pub const EXIT_CANCELLED: i32 = 130;

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command against the given user interface, returning a
    /// [`CommandResult`] with the exit code to use.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }

    /// Create a result for a cancelled run.
    pub fn cancelled() -> Self {
        Self::failure(EXIT_CANCELLED)
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    config: Config,
    home: PathBuf,
    cancel: CancelToken,
}

impl CommandDispatcher {
    /// Create a new dispatcher over the resolved config and home directory.
    pub fn new(config: Config, home: PathBuf, cancel: CancelToken) -> Self {
        Self {
            config,
            home,
            cancel,
        }
    }

    /// The tally home directory.
    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Dispatch and execute a command.
    ///
    /// Routes the CLI subcommand to the appropriate command implementation
    /// and executes it. No subcommand means `status`.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        match &cli.command {
            Some(Commands::Setup(args)) => {
                let cmd = super::setup::SetupCommand::new(
                    &self.config,
                    &self.home,
                    self.cancel.clone(),
                    args.clone(),
                );
                cmd.execute(ui)
            }
            Some(Commands::Balance(args)) => {
                let cmd = super::balance::BalanceCommand::new(&self.config, &self.home, args.clone());
                cmd.execute(ui)
            }
            Some(Commands::Transfer(args)) => {
                let cmd =
                    super::transfer::TransferCommand::new(&self.config, &self.home, args.clone());
                cmd.execute(ui)
            }
            Some(Commands::Status(args)) => {
                let cmd = super::status::StatusCommand::new(&self.config, &self.home, args.clone());
                cmd.execute(ui)
            }
            Some(Commands::History(args)) => {
                let cmd = super::history::HistoryCommand::new(&self.config, &self.home, args.clone());
                cmd.execute(ui)
            }
            Some(Commands::Config(args)) => {
                let cmd = super::config::ConfigCommand::new(&self.config, &self.home, args.clone());
                cmd.execute(ui)
            }
            Some(Commands::Completions(args)) => {
                let cmd = super::completions::CompletionsCommand::new(args.clone());
                cmd.execute(ui)
            }
            None => {
                let cmd = super::status::StatusCommand::new(
                    &self.config,
                    &self.home,
                    crate::cli::args::StatusArgs::default(),
                );
                cmd.execute(ui)
            }
        }
    }
}
