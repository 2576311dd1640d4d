//! HTTP implementation of the ledger client.

use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::error::{Result, TallyError};

use super::types::{
    Account, FaucetReceipt, FaucetRequest, LedgerStatus, RegisterReceipt, RegisterRequest,
    TransferReceipt, TransferRequest,
};
use super::LedgerClient;

/// Error body returned by the ledger node on failure.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Talks to a ledger node over HTTP.
pub struct HttpLedgerClient {
    base_url: String,
    client: Client,
}

impl HttpLedgerClient {
    /// Create a client for the node at `base_url`.
    ///
    /// The timeout applies per request; slow endpoints surface as
    /// transport errors rather than hanging the CLI.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("tally/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// The node URL this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        debug!("GET {}", path);
        let response = self.client.get(self.url(path)).send()?;
        decode(path, response)
    }

    fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        debug!("POST {}", path);
        let response = self.client.post(self.url(path)).json(body).send()?;
        decode(path, response)
    }
}

fn decode<T: DeserializeOwned>(path: &str, response: Response) -> Result<T> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json()?);
    }

    // Nodes report failures as {"error": "..."}; fall back to the
    // status line when the body is not in that shape.
    let message = match response.json::<ErrorBody>() {
        Ok(body) => body.error,
        Err(_) => format!("HTTP {}", status),
    };

    Err(TallyError::Rpc {
        endpoint: path.to_string(),
        message,
    })
}

impl LedgerClient for HttpLedgerClient {
    fn status(&self) -> Result<LedgerStatus> {
        self.get("/v1/status")
    }

    fn account(&self, address: &str) -> Result<Account> {
        let path = format!("/v1/accounts/{}", address);
        debug!("GET {}", path);
        let response = self.client.get(self.url(&path)).send()?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(TallyError::AccountNotFound {
                account: address.to_string(),
            });
        }

        decode(&path, response)
    }

    fn register_alias(&self, request: &RegisterRequest) -> Result<RegisterReceipt> {
        self.post("/v1/aliases", request)
    }

    fn request_funds(&self, request: &FaucetRequest) -> Result<FaucetReceipt> {
        self.post("/v1/faucet", request)
    }

    fn transfer(&self, request: &TransferRequest) -> Result<TransferReceipt> {
        self.post("/v1/transfers", request)
    }
}
