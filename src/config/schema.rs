//! Configuration schema.

use serde::{Deserialize, Serialize};

fn default_rpc_url() -> String {
    "http://127.0.0.1:7420".to_string()
}

fn default_network() -> String {
    "devnet".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_history_limit() -> usize {
    50
}

/// Resolved tally configuration.
///
/// Every field has a default, so an empty or missing config file yields a
/// working devnet setup. CLI flags (`--url`) and environment variables
/// (`TALLY_RPC_URL`) override the file after loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Base URL of the ledger node.
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,

    /// Network name, shown in prompts and status output.
    #[serde(default = "default_network")]
    pub network: String,

    /// Account (address or alias) used when a command names none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_account: Option<String>,

    /// Per-request deadline for ledger calls.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// How many flow runs the history file retains.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc_url: default_rpc_url(),
            network: default_network(),
            default_account: None,
            timeout_seconds: default_timeout_seconds(),
            history_limit: default_history_limit(),
        }
    }
}

impl Config {
    /// Per-request deadline as a [`std::time::Duration`].
    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_seconds)
    }
}
