//! In-memory ledger for testing.
//!
//! `MockLedgerClient` models a tiny single-node ledger: accounts live in a
//! map, receipts get sequential ids, and each endpoint can be told to fail
//! a number of times before recovering. That last part is what flow retry
//! tests lean on.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::{Result, TallyError};

use super::types::{
    Account, FaucetReceipt, FaucetRequest, LedgerStatus, RegisterReceipt, RegisterRequest,
    TransferReceipt, TransferRequest,
};
use super::LedgerClient;

#[derive(Debug, Default)]
struct FailPlan {
    remaining: u32,
    message: String,
}

impl FailPlan {
    fn arm(&mut self, times: u32, message: &str) {
        self.remaining = times;
        self.message = message.to_string();
    }

    fn take(&mut self) -> Option<String> {
        if self.remaining > 0 {
            self.remaining -= 1;
            Some(self.message.clone())
        } else {
            None
        }
    }
}

#[derive(Debug)]
struct Inner {
    status: LedgerStatus,
    accounts: HashMap<String, Account>,
    fail_status: FailPlan,
    fail_account: FailPlan,
    fail_register: FailPlan,
    fail_faucet: FailPlan,
    fail_transfer: FailPlan,
    calls: Vec<String>,
    next_tx: u64,
}

/// Mock ledger client backed by an in-memory account map.
#[derive(Debug)]
pub struct MockLedgerClient {
    inner: Mutex<Inner>,
}

impl Default for MockLedgerClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockLedgerClient {
    /// A healthy devnet node with no accounts.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                status: LedgerStatus {
                    network: "devnet".to_string(),
                    block_height: 1042,
                    faucet_enabled: true,
                    version: "1.3.0".to_string(),
                },
                accounts: HashMap::new(),
                fail_status: FailPlan::default(),
                fail_account: FailPlan::default(),
                fail_register: FailPlan::default(),
                fail_faucet: FailPlan::default(),
                fail_transfer: FailPlan::default(),
                calls: Vec::new(),
                next_tx: 1,
            }),
        }
    }

    /// Seed an account.
    pub fn insert_account(&self, account: Account) {
        let mut inner = self.inner.lock().unwrap();
        inner.accounts.insert(account.address.clone(), account);
    }

    /// Turn the faucet off.
    pub fn disable_faucet(&self) {
        self.inner.lock().unwrap().status.faucet_enabled = false;
    }

    /// Make the next `times` status calls fail with `message`.
    pub fn fail_status(&self, times: u32, message: &str) {
        self.inner.lock().unwrap().fail_status.arm(times, message);
    }

    /// Make the next `times` account lookups fail with `message`.
    pub fn fail_account(&self, times: u32, message: &str) {
        self.inner.lock().unwrap().fail_account.arm(times, message);
    }

    /// Make the next `times` alias registrations fail with `message`.
    pub fn fail_register(&self, times: u32, message: &str) {
        self.inner.lock().unwrap().fail_register.arm(times, message);
    }

    /// Make the next `times` faucet requests fail with `message`.
    pub fn fail_faucet(&self, times: u32, message: &str) {
        self.inner.lock().unwrap().fail_faucet.arm(times, message);
    }

    /// Make the next `times` transfers fail with `message`.
    pub fn fail_transfer(&self, times: u32, message: &str) {
        self.inner.lock().unwrap().fail_transfer.arm(times, message);
    }

    /// Every call made so far, e.g. `"register_alias:alice"`.
    pub fn calls(&self) -> Vec<String> {
        self.inner.lock().unwrap().calls.clone()
    }

    /// How many calls hit the named endpoint.
    pub fn call_count(&self, name: &str) -> usize {
        self.inner
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|c| c.as_str() == name || c.starts_with(&format!("{}:", name)))
            .count()
    }

    /// Current state of an account, if it exists.
    pub fn account_state(&self, address: &str) -> Option<Account> {
        self.inner.lock().unwrap().accounts.get(address).cloned()
    }
}

impl Inner {
    fn mint_tx(&mut self) -> String {
        let id = format!("tx_{:06}", self.next_tx);
        self.next_tx += 1;
        id
    }
}

fn rpc_error(endpoint: &str, message: String) -> TallyError {
    TallyError::Rpc {
        endpoint: endpoint.to_string(),
        message,
    }
}

impl LedgerClient for MockLedgerClient {
    fn status(&self) -> Result<LedgerStatus> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push("status".to_string());
        if let Some(message) = inner.fail_status.take() {
            return Err(rpc_error("/v1/status", message));
        }
        Ok(inner.status.clone())
    }

    fn account(&self, address: &str) -> Result<Account> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(format!("account:{}", address));
        if let Some(message) = inner.fail_account.take() {
            return Err(rpc_error(&format!("/v1/accounts/{}", address), message));
        }
        inner
            .accounts
            .get(address)
            .cloned()
            .ok_or_else(|| TallyError::AccountNotFound {
                account: address.to_string(),
            })
    }

    fn register_alias(&self, request: &RegisterRequest) -> Result<RegisterReceipt> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(format!("register_alias:{}", request.alias));
        if let Some(message) = inner.fail_register.take() {
            return Err(rpc_error("/v1/aliases", message));
        }

        let taken = inner
            .accounts
            .values()
            .any(|a| a.alias.as_deref() == Some(request.alias.as_str()));
        if taken {
            return Err(rpc_error(
                "/v1/aliases",
                format!("alias '{}' is already registered", request.alias),
            ));
        }

        let address = request.address.clone();
        let alias = request.alias.clone();
        inner
            .accounts
            .entry(address.clone())
            .or_insert_with(|| Account {
                address,
                alias: None,
                balance: 0,
                nonce: 0,
            })
            .alias = Some(alias.clone());

        let tx_id = inner.mint_tx();
        Ok(RegisterReceipt { tx_id, alias })
    }

    fn request_funds(&self, request: &FaucetRequest) -> Result<FaucetReceipt> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(format!("request_funds:{}", request.address));
        if let Some(message) = inner.fail_faucet.take() {
            return Err(rpc_error("/v1/faucet", message));
        }
        if !inner.status.faucet_enabled {
            return Err(rpc_error(
                "/v1/faucet",
                "faucet is disabled on this network".to_string(),
            ));
        }

        let address = request.address.clone();
        inner
            .accounts
            .entry(address.clone())
            .or_insert_with(|| Account {
                address,
                alias: None,
                balance: 0,
                nonce: 0,
            })
            .balance += request.amount;

        let tx_id = inner.mint_tx();
        Ok(FaucetReceipt {
            tx_id,
            amount: request.amount,
        })
    }

    fn transfer(&self, request: &TransferRequest) -> Result<TransferReceipt> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(format!("transfer:{}", request.to));
        if let Some(message) = inner.fail_transfer.take() {
            return Err(rpc_error("/v1/transfers", message));
        }

        let sender_balance = match inner.accounts.get(&request.from) {
            Some(account) => account.balance,
            None => {
                return Err(rpc_error(
                    "/v1/transfers",
                    format!("unknown sender {}", request.from),
                ))
            }
        };
        if sender_balance < request.amount {
            return Err(rpc_error(
                "/v1/transfers",
                format!(
                    "insufficient funds: have {}, need {}",
                    sender_balance, request.amount
                ),
            ));
        }

        let to = request.to.clone();
        if let Some(sender) = inner.accounts.get_mut(&request.from) {
            sender.balance -= request.amount;
            sender.nonce += 1;
        }
        inner
            .accounts
            .entry(to.clone())
            .or_insert_with(|| Account {
                address: to,
                alias: None,
                balance: 0,
                nonce: 0,
            })
            .balance += request.amount;

        let tx_id = inner.mint_tx();
        Ok(TransferReceipt {
            tx_id,
            amount: request.amount,
            fee: 0,
        })
    }
}
