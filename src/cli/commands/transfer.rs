//! Transfer command implementation.
//!
//! `tally transfer <to> <amount>` signs and submits a transfer from the
//! local account. The sender's nonce comes from a fresh account lookup, so
//! a transfer right after setup or another transfer needs no local state.

use std::path::{Path, PathBuf};

use serde_json::json;

use crate::cli::args::TransferArgs;
use crate::client::{format_units, parse_amount, HttpLedgerClient, LedgerClient, TransferRequest};
use crate::config::Config;
use crate::error::Result;
use crate::keys::{validate_address, Keystore};
use crate::ui::{Prompt, UserInterface};

use super::dispatcher::{Command, CommandResult};

/// The transfer command implementation.
pub struct TransferCommand {
    config: Config,
    home: PathBuf,
    args: TransferArgs,
}

impl TransferCommand {
    /// Create a new transfer command.
    pub fn new(config: &Config, home: &Path, args: TransferArgs) -> Self {
        Self {
            config: config.clone(),
            home: home.to_path_buf(),
            args,
        }
    }

    fn confirm(&self, ui: &mut dyn UserInterface, amount: u64) -> Result<bool> {
        if self.args.yes {
            return Ok(true);
        }
        if !ui.is_interactive() {
            ui.warning("Confirmation required; re-run with --yes to proceed without a terminal");
            return Ok(false);
        }
        let answer = ui.prompt(&Prompt::confirm(
            "send_transfer",
            format!("Send {} TAL to {}?", format_units(amount), self.args.to),
        ))?;
        Ok(answer.as_bool().unwrap_or(false))
    }

    /// Submit the transfer via the given client.
    pub fn run_with_client(
        &self,
        client: &dyn LedgerClient,
        ui: &mut dyn UserInterface,
    ) -> Result<CommandResult> {
        validate_address(&self.args.to)?;
        let amount = parse_amount(&self.args.amount)?;

        let keypair = Keystore::new(&self.home).load()?;
        let sender = client.account(keypair.address())?;

        if sender.balance < amount {
            ui.error(&format!(
                "Insufficient funds: balance is {} TAL, transfer needs {} TAL",
                format_units(sender.balance),
                format_units(amount)
            ));
            return Ok(CommandResult::failure(1));
        }

        if !self.confirm(ui, amount)? {
            ui.warning("Transfer cancelled.");
            return Ok(CommandResult::cancelled());
        }

        let payload = format!(
            "{}:{}:{}:{}",
            keypair.address(),
            self.args.to,
            amount,
            sender.nonce
        );
        let request = TransferRequest {
            from: keypair.address().to_string(),
            to: self.args.to.clone(),
            amount,
            memo: self.args.memo.clone(),
            nonce: sender.nonce,
            auth_tag: keypair.auth_tag(payload.as_bytes()),
        };
        let receipt = client.transfer(&request)?;

        if self.args.json {
            let payload = json!({
                "tx_id": receipt.tx_id,
                "from": request.from,
                "to": request.to,
                "amount": receipt.amount,
                "amount_tal": format_units(receipt.amount),
                "fee": receipt.fee,
            });
            println!("{}", serde_json::to_string_pretty(&payload)?);
            return Ok(CommandResult::success());
        }

        ui.success(&format!(
            "Sent {} TAL to {} (tx {})",
            format_units(receipt.amount),
            self.args.to,
            receipt.tx_id
        ));
        if receipt.fee > 0 {
            ui.message(&format!("Fee: {} TAL", format_units(receipt.fee)));
        }
        Ok(CommandResult::success())
    }
}

impl Command for TransferCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let client = HttpLedgerClient::new(&self.config.rpc_url, self.config.request_timeout())?;
        self.run_with_client(&client, ui)
    }
}
