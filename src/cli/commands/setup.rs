//! Setup command implementation.
//!
//! `tally setup` runs the onboarding flow: keypair, alias registration,
//! faucet funds, verification. The flow engine drives the steps; this
//! command wires it to the configured node, records the run in history,
//! and maps the terminal flow state to an exit code.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::cli::args::SetupArgs;
use crate::client::{format_units, HttpLedgerClient, LedgerClient};
use crate::config::Config;
use crate::error::Result;
use crate::flow::{BackoffTimer, CancelToken, FlowResult, FlowStatus, SystemTimer};
use crate::flows::{build_flow, OnboardingInputs, OnboardingServices, UiReporter};
use crate::keys::Keystore;
use crate::state::{FlowRecord, HistoryStore};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The setup command implementation.
pub struct SetupCommand {
    config: Config,
    home: PathBuf,
    cancel: CancelToken,
    args: SetupArgs,
}

impl SetupCommand {
    /// Create a new setup command.
    pub fn new(config: &Config, home: &Path, cancel: CancelToken, args: SetupArgs) -> Self {
        Self {
            config: config.clone(),
            home: home.to_path_buf(),
            cancel,
            args,
        }
    }

    /// Run the onboarding flow against the given client.
    ///
    /// Split out from [`Command::execute`] so tests can substitute a mock
    /// ledger for the HTTP client.
    pub fn run_with_client(
        &self,
        client: Arc<dyn LedgerClient>,
        ui: &mut dyn UserInterface,
    ) -> Result<CommandResult> {
        self.run_with_timer(client, SystemTimer, ui)
    }

    fn run_with_timer(
        &self,
        client: Arc<dyn LedgerClient>,
        timer: impl BackoffTimer + 'static,
        ui: &mut dyn UserInterface,
    ) -> Result<CommandResult> {
        let services = OnboardingServices {
            client,
            keystore: Keystore::new(&self.home),
            timeout_seconds: self.config.timeout_seconds,
            force: self.args.force,
        };
        let engine = build_flow(&services)
            .with_cancel_token(self.cancel.clone())
            .with_timer(timer);

        let ui_cell: RefCell<&mut dyn UserInterface> = RefCell::new(ui);
        let mut inputs = OnboardingInputs::new(
            &ui_cell,
            self.config.network.clone(),
            self.args.alias.clone(),
            self.args.amount.clone(),
            self.args.yes,
        );
        let mut reporter = UiReporter::new(&ui_cell);
        let result = engine.execute(&mut inputs, &mut reporter);

        let mut ui = ui_cell.into_inner();
        record_run(&self.home, &self.config, &result, ui);

        match result.status {
            FlowStatus::Completed => {
                show_account(ui, &result);
                Ok(CommandResult::success())
            }
            FlowStatus::Cancelled => Ok(CommandResult::cancelled()),
            _ => Ok(CommandResult::failure(1)),
        }
    }
}

/// Append the run to history; failures degrade to a warning.
fn record_run(home: &Path, config: &Config, result: &FlowResult, ui: &mut dyn UserInterface) {
    let store = HistoryStore::new(home, config.history_limit);
    if let Err(e) = store.append(FlowRecord::from_result(result)) {
        ui.warning(&format!("Could not record run in history: {}", e));
    }
}

fn show_account(ui: &mut dyn UserInterface, result: &FlowResult) {
    if let Some(address) = result.data.get_str("address") {
        ui.message(&format!("  Address: {}", address));
    }
    if let Some(alias) = result.data.get_str("alias") {
        ui.message(&format!("  Alias:   {}", alias));
    }
    if let Some(balance) = result.data.get_u64("balance") {
        ui.message(&format!("  Balance: {} TAL", format_units(balance)));
    }
}

impl Command for SetupCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let client = HttpLedgerClient::new(&self.config.rpc_url, self.config.request_timeout())?;
        self.run_with_client(Arc::new(client), ui)
    }
}
