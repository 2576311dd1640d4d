//! Wire types for the ledger RPC surface.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TallyError};

/// Base units per TAL.
pub const UNITS_PER_TAL: u64 = 1_000_000;

/// Node status, from `GET /v1/status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerStatus {
    /// Network name (e.g. "devnet").
    pub network: String,
    /// Height of the latest sealed block.
    pub block_height: u64,
    /// Whether the faucet endpoint is accepting requests.
    pub faucet_enabled: bool,
    /// Node software version.
    pub version: String,
}

/// Account state, from `GET /v1/accounts/{address}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    /// Balance in base units.
    pub balance: u64,
    /// Next transfer nonce.
    pub nonce: u64,
}

/// Body for `POST /v1/aliases`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub address: String,
    pub alias: String,
    pub auth_tag: String,
}

/// Receipt for a successful alias registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterReceipt {
    pub tx_id: String,
    pub alias: String,
}

/// Body for `POST /v1/faucet`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaucetRequest {
    pub address: String,
    /// Requested amount in base units.
    pub amount: u64,
}

/// Receipt for a successful faucet request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaucetReceipt {
    pub tx_id: String,
    /// Granted amount in base units.
    pub amount: u64,
}

/// Body for `POST /v1/transfers`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferRequest {
    pub from: String,
    pub to: String,
    /// Amount in base units.
    pub amount: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    pub nonce: u64,
    pub auth_tag: String,
}

/// Receipt for a successful transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferReceipt {
    pub tx_id: String,
    pub amount: u64,
    pub fee: u64,
}

/// Format a base-unit amount as a TAL decimal string.
///
/// Trailing zeros in the fractional part are trimmed: `1_500_000`
/// renders as "1.5", `1_000_000` as "1".
pub fn format_units(units: u64) -> String {
    let whole = units / UNITS_PER_TAL;
    let frac = units % UNITS_PER_TAL;
    if frac == 0 {
        whole.to_string()
    } else {
        let frac_str = format!("{:06}", frac);
        format!("{}.{}", whole, frac_str.trim_end_matches('0'))
    }
}

/// Parse a decimal TAL string ("1.5") into base units.
///
/// Accepts at most six fractional digits. Anything else, including
/// negative values and empty strings, is an [`TallyError::InvalidAmount`].
pub fn parse_amount(value: &str) -> Result<u64> {
    let invalid = || TallyError::InvalidAmount {
        value: value.to_string(),
    };

    let s = value.trim();
    if s.is_empty() {
        return Err(invalid());
    }

    let (whole_str, frac_str) = match s.split_once('.') {
        Some((w, f)) => (w, f),
        None => (s, ""),
    };

    if whole_str.is_empty() && frac_str.is_empty() {
        return Err(invalid());
    }
    if frac_str.len() > 6 {
        return Err(invalid());
    }
    if !whole_str.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    if !frac_str.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }

    let whole: u64 = if whole_str.is_empty() {
        0
    } else {
        whole_str.parse().map_err(|_| invalid())?
    };
    let frac: u64 = if frac_str.is_empty() {
        0
    } else {
        format!("{:0<6}", frac_str).parse().map_err(|_| invalid())?
    };

    whole
        .checked_mul(UNITS_PER_TAL)
        .and_then(|w| w.checked_add(frac))
        .ok_or_else(invalid)
}
