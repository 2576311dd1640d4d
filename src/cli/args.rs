//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Tally - devnet ledger client.
#[derive(Debug, Parser)]
#[command(name = "tally")]
#[command(author, version, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config file (overrides default config.yml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Ledger node RPC URL (overrides config)
    #[arg(short, long, global = true, env = "TALLY_RPC_URL")]
    pub url: Option<String>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Provision a devnet account (keypair, alias, faucet funds)
    Setup(SetupArgs),

    /// Show an account's balance
    Balance(BalanceArgs),

    /// Send TAL to another account
    Transfer(TransferArgs),

    /// Show node and local state (default if no command specified)
    Status(StatusArgs),

    /// Show recent flow runs
    History(HistoryArgs),

    /// Show resolved configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `setup` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct SetupArgs {
    /// Alias to register (prompted if omitted)
    #[arg(short, long)]
    pub alias: Option<String>,

    /// Faucet amount in TAL (prompted if omitted)
    #[arg(long)]
    pub amount: Option<String>,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Replace an existing keypair
    #[arg(long)]
    pub force: bool,
}

/// Arguments for the `balance` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct BalanceArgs {
    /// Address to look up (defaults to the local account)
    pub account: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `transfer` command.
#[derive(Debug, Clone, clap::Args)]
pub struct TransferArgs {
    /// Recipient address
    pub to: String,

    /// Amount in TAL (e.g. "1.5")
    pub amount: String,

    /// Attach a memo to the transfer
    #[arg(short, long)]
    pub memo: Option<String>,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Output the receipt as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `status` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct StatusArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `history` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct HistoryArgs {
    /// Number of runs to show
    #[arg(long)]
    pub limit: Option<usize>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `config` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ConfigArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
