//! Ledger node client.
//!
//! [`LedgerClient`] is the seam between the CLI and the network: flows and
//! commands talk to the trait, [`HttpLedgerClient`] speaks the node's HTTP
//! API, and [`MockLedgerClient`] stands in for tests.

pub mod http;
pub mod mock;
pub mod types;

pub use http::HttpLedgerClient;
pub use mock::MockLedgerClient;
pub use types::{
    format_units, parse_amount, Account, FaucetReceipt, FaucetRequest, LedgerStatus,
    RegisterReceipt, RegisterRequest, TransferReceipt, TransferRequest, UNITS_PER_TAL,
};

use crate::error::Result;

/// Operations the CLI needs from a ledger node.
pub trait LedgerClient {
    /// Node status and network info.
    fn status(&self) -> Result<LedgerStatus>;

    /// Look up an account by address.
    ///
    /// An address the ledger has never seen is
    /// [`TallyError::AccountNotFound`](crate::error::TallyError::AccountNotFound),
    /// not an empty account.
    fn account(&self, address: &str) -> Result<Account>;

    /// Register an alias for an address.
    fn register_alias(&self, request: &RegisterRequest) -> Result<RegisterReceipt>;

    /// Ask the faucet to credit an address.
    fn request_funds(&self, request: &FaucetRequest) -> Result<FaucetReceipt>;

    /// Move funds between accounts.
    fn transfer(&self, request: &TransferRequest) -> Result<TransferReceipt>;
}
