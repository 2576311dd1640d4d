//! Tally CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use tally::cli::{Cli, CommandDispatcher, Commands};
use tally::config::{tally_home, Config};
use tally::flow::{install_interrupt_handler, CancelToken};
use tally::ui::{create_ui, OutputMode};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is INFO
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("tally=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tally=info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    tracing::debug!("tally starting with args: {:?}", cli);

    let output_mode = if cli.quiet {
        OutputMode::Quiet
    } else if cli.verbose {
        OutputMode::Verbose
    } else {
        OutputMode::Normal
    };

    if cli.no_color {
        std::env::set_var("NO_COLOR", "1");
    }

    let mut ui = create_ui(true, output_mode);

    let home = tally_home();
    let mut config = match Config::load(cli.config.as_deref(), &home) {
        Ok(config) => config,
        Err(e) => {
            ui.error(&format!("Error: {}", e));
            return ExitCode::from(1);
        }
    };
    if let Some(url) = &cli.url {
        config.rpc_url = url.clone();
    }

    // Ctrl-C during a flow flips the token; the engine finishes the run as
    // Cancelled instead of the process dying mid-write.
    let cancel = CancelToken::new();
    if matches!(cli.command, Some(Commands::Setup(_))) {
        install_interrupt_handler(&cancel);
    }

    let dispatcher = CommandDispatcher::new(config, home, cancel);

    match dispatcher.dispatch(&cli, ui.as_mut()) {
        Ok(result) => ExitCode::from(result.exit_code as u8),
        Err(e) => {
            ui.error(&format!("Error: {}", e));
            ExitCode::from(1)
        }
    }
}
