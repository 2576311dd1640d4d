//! Config command implementation.
//!
//! `tally config` prints the resolved configuration, after defaults and
//! the `--url` override have been applied.

use std::path::{Path, PathBuf};

use serde_json::json;

use crate::cli::args::ConfigArgs;
use crate::config::{config_path, Config};
use crate::error::Result;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The config command implementation.
pub struct ConfigCommand {
    config: Config,
    home: PathBuf,
    args: ConfigArgs,
}

impl ConfigCommand {
    /// Create a new config command.
    pub fn new(config: &Config, home: &Path, args: ConfigArgs) -> Self {
        Self {
            config: config.clone(),
            home: home.to_path_buf(),
            args,
        }
    }

    /// Plain-text rendering of the resolved configuration.
    fn render(config: &Config, home: &Path) -> String {
        let mut out = String::new();
        out.push_str(&format!("Home:            {}\n", home.display()));
        out.push_str(&format!(
            "Config file:     {}\n",
            config_path(home).display()
        ));
        out.push_str(&format!("RPC URL:         {}\n", config.rpc_url));
        out.push_str(&format!("Network:         {}\n", config.network));
        out.push_str(&format!(
            "Default account: {}\n",
            config.default_account.as_deref().unwrap_or("(none)")
        ));
        out.push_str(&format!("Timeout:         {}s\n", config.timeout_seconds));
        out.push_str(&format!("History limit:   {}\n", config.history_limit));
        out
    }
}

impl Command for ConfigCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        if self.args.json {
            let payload = json!({
                "home": self.home,
                "config_file": config_path(&self.home),
                "rpc_url": self.config.rpc_url,
                "network": self.config.network,
                "default_account": self.config.default_account,
                "timeout_seconds": self.config.timeout_seconds,
                "history_limit": self.config.history_limit,
            });
            println!("{}", serde_json::to_string_pretty(&payload)?);
            return Ok(CommandResult::success());
        }

        for line in Self::render(&self.config, &self.home).lines() {
            ui.message(line);
        }
        Ok(CommandResult::success())
    }
}
