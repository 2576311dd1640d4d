//! Balance command implementation.
//!
//! `tally balance [account]` looks an account up on the ledger. With no
//! argument it falls back to the configured default account, then to the
//! local keypair's address.

use std::path::{Path, PathBuf};

use serde_json::json;

use crate::cli::args::BalanceArgs;
use crate::client::{format_units, HttpLedgerClient, LedgerClient};
use crate::config::Config;
use crate::error::{Result, TallyError};
use crate::keys::{validate_address, Keystore};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The balance command implementation.
pub struct BalanceCommand {
    config: Config,
    home: PathBuf,
    args: BalanceArgs,
}

impl BalanceCommand {
    /// Create a new balance command.
    pub fn new(config: &Config, home: &Path, args: BalanceArgs) -> Self {
        Self {
            config: config.clone(),
            home: home.to_path_buf(),
            args,
        }
    }

    /// Pick the address to look up: argument, configured default, then the
    /// local keypair. Only the argument is validated; the other two were
    /// produced by tally itself.
    fn resolve_address(&self) -> Result<Option<String>> {
        if let Some(account) = &self.args.account {
            validate_address(account)?;
            return Ok(Some(account.clone()));
        }
        if let Some(account) = &self.config.default_account {
            return Ok(Some(account.clone()));
        }
        let keystore = Keystore::new(&self.home);
        if keystore.exists() {
            return Ok(Some(keystore.load()?.address().to_string()));
        }
        Ok(None)
    }

    /// Look the account up via the given client.
    pub fn run_with_client(
        &self,
        client: &dyn LedgerClient,
        ui: &mut dyn UserInterface,
    ) -> Result<CommandResult> {
        let address = match self.resolve_address()? {
            Some(address) => address,
            None => {
                ui.error("No account specified and no local keypair found. Run 'tally setup' first.");
                return Ok(CommandResult::failure(1));
            }
        };

        let account = match client.account(&address) {
            Ok(account) => account,
            Err(TallyError::AccountNotFound { account }) => {
                ui.error(&format!("Account {} is not known to the ledger.", account));
                return Ok(CommandResult::failure(1));
            }
            Err(e) => return Err(e),
        };

        if self.args.json {
            let payload = json!({
                "address": account.address,
                "alias": account.alias,
                "balance": account.balance,
                "balance_tal": format_units(account.balance),
                "nonce": account.nonce,
            });
            println!("{}", serde_json::to_string_pretty(&payload)?);
            return Ok(CommandResult::success());
        }

        ui.message(&format!("Address: {}", account.address));
        if let Some(alias) = &account.alias {
            ui.message(&format!("Alias:   {}", alias));
        }
        ui.message(&format!("Balance: {} TAL", format_units(account.balance)));
        ui.message(&format!("Nonce:   {}", account.nonce));
        Ok(CommandResult::success())
    }
}

impl Command for BalanceCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let client = HttpLedgerClient::new(&self.config.rpc_url, self.config.request_timeout())?;
        self.run_with_client(&client, ui)
    }
}
