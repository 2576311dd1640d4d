//! Status command implementation.
//!
//! `tally status` (also the default command) shows what the node reports
//! and what exists locally. It is intentionally forgiving: an unreachable
//! node or a missing keypair is reported, not treated as a failure, so the
//! command works on a fresh machine before any setup.

use std::path::{Path, PathBuf};

use serde_json::json;

use crate::cli::args::StatusArgs;
use crate::client::{HttpLedgerClient, LedgerClient};
use crate::config::Config;
use crate::error::Result;
use crate::keys::Keystore;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The status command implementation.
pub struct StatusCommand {
    config: Config,
    home: PathBuf,
    args: StatusArgs,
}

impl StatusCommand {
    /// Create a new status command.
    pub fn new(config: &Config, home: &Path, args: StatusArgs) -> Self {
        Self {
            config: config.clone(),
            home: home.to_path_buf(),
            args,
        }
    }

    /// Gather and render status via the given client.
    pub fn run_with_client(
        &self,
        client: &dyn LedgerClient,
        ui: &mut dyn UserInterface,
    ) -> Result<CommandResult> {
        let node = client.status();
        let keystore = Keystore::new(&self.home);
        let account = if keystore.exists() {
            Some(keystore.load()?)
        } else {
            None
        };

        if self.args.json {
            let payload = json!({
                "rpc_url": self.config.rpc_url,
                "network": self.config.network,
                "node": node.as_ref().ok(),
                "node_error": node.as_ref().err().map(|e| e.to_string()),
                "account": account.as_ref().map(|k| k.address()),
            });
            println!("{}", serde_json::to_string_pretty(&payload)?);
            return Ok(CommandResult::success());
        }

        ui.show_header("tally");
        ui.message(&format!("RPC URL: {}", self.config.rpc_url));

        match node {
            Ok(status) => {
                ui.message(&format!("Network: {}", status.network));
                ui.message(&format!("Block height: {}", status.block_height));
                ui.message(&format!(
                    "Faucet: {}",
                    if status.faucet_enabled {
                        "enabled"
                    } else {
                        "disabled"
                    }
                ));
                ui.message(&format!("Node version: {}", status.version));
            }
            Err(e) => {
                ui.warning(&format!(
                    "Node unreachable at {}: {}",
                    self.config.rpc_url, e
                ));
            }
        }

        match account {
            Some(keypair) => {
                ui.message(&format!(
                    "Account: {} ({})",
                    keypair.address(),
                    keypair.fingerprint()
                ));
            }
            None => {
                ui.message("No local keypair. Run 'tally setup' to create one.");
            }
        }

        Ok(CommandResult::success())
    }
}

impl Command for StatusCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let client = HttpLedgerClient::new(&self.config.rpc_url, self.config.request_timeout())?;
        self.run_with_client(&client, ui)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockLedgerClient;
    use crate::keys::Keypair;
    use crate::ui::MockUI;
    use tempfile::TempDir;

    #[test]
    fn healthy_node_and_keypair_are_shown() {
        let home = TempDir::new().unwrap();
        let keypair = Keypair::from_secret([5u8; 32]);
        Keystore::new(home.path()).save(&keypair, false).unwrap();

        let cmd = StatusCommand::new(&Config::default(), home.path(), StatusArgs::default());
        let mut ui = MockUI::new();
        let result = cmd
            .run_with_client(&MockLedgerClient::new(), &mut ui)
            .unwrap();

        assert!(result.success);
        assert!(ui.has_message("Network: devnet"));
        assert!(ui.has_message("Block height: 1042"));
        assert!(ui.has_message("Faucet: enabled"));
        assert!(ui.has_message(keypair.address()));
    }

    #[test]
    fn unreachable_node_warns_but_succeeds() {
        let home = TempDir::new().unwrap();
        let client = MockLedgerClient::new();
        client.fail_status(1, "connection refused");

        let cmd = StatusCommand::new(&Config::default(), home.path(), StatusArgs::default());
        let mut ui = MockUI::new();
        let result = cmd.run_with_client(&client, &mut ui).unwrap();

        assert!(result.success);
        assert!(ui.has_warning("Node unreachable"));
    }

    #[test]
    fn missing_keypair_suggests_setup() {
        let home = TempDir::new().unwrap();
        let cmd = StatusCommand::new(&Config::default(), home.path(), StatusArgs::default());
        let mut ui = MockUI::new();
        cmd.run_with_client(&MockLedgerClient::new(), &mut ui)
            .unwrap();

        assert!(ui.has_message("tally setup"));
    }
}
