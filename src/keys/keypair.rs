//! Keypair generation and address derivation.
//!
//! Devnet credentials only. The "public key" is a hash of the secret and
//! [`Keypair::auth_tag`] is a SHA-256 MAC over secret plus payload; the
//! devnet checks possession, it does not verify signatures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

use crate::error::{Result, TallyError};

/// Every address starts with this.
pub const ADDRESS_PREFIX: &str = "tal1";

/// Hex characters in the body of an address.
pub const ADDRESS_HEX_LEN: usize = 40;

const SECRET_LEN: usize = 32;
const FINGERPRINT_LEN: usize = 8;

/// A local account keypair.
#[derive(Clone, Serialize, Deserialize)]
pub struct Keypair {
    address: String,
    #[serde(with = "secret_hex")]
    secret: [u8; SECRET_LEN],
    created_at: DateTime<Utc>,
}

impl Keypair {
    /// Generate a fresh keypair from OS entropy.
    pub fn generate() -> Result<Self> {
        let mut secret = [0u8; SECRET_LEN];
        getrandom::getrandom(&mut secret).map_err(|e| TallyError::KeyGeneration {
            message: format!("OS entropy unavailable: {}", e),
        })?;
        Ok(Self::from_secret(secret))
    }

    /// Build a keypair from a known secret (deterministic, for tests).
    pub fn from_secret(secret: [u8; SECRET_LEN]) -> Self {
        let address = derive_address(&secret);
        Self {
            address,
            secret,
            created_at: Utc::now(),
        }
    }

    /// The account address, `tal1` plus 40 hex characters.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// When this keypair was generated.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Short identifier for display: the first 8 hex characters of the
    /// address hash.
    pub fn fingerprint(&self) -> &str {
        &self.address[ADDRESS_PREFIX.len()..ADDRESS_PREFIX.len() + FINGERPRINT_LEN]
    }

    /// Possession proof for a mutating request: SHA-256 over the secret
    /// followed by the payload, hex-encoded.
    pub fn auth_tag(&self, payload: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.secret);
        hasher.update(payload);
        hex::encode(hasher.finalize())
    }
}

// The secret stays out of logs and debug dumps.
impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keypair")
            .field("address", &self.address)
            .field("secret", &"[redacted]")
            .field("created_at", &self.created_at)
            .finish()
    }
}

fn derive_address(secret: &[u8; SECRET_LEN]) -> String {
    let public = Sha256::digest(secret);
    let address_hash = Sha256::digest(public);
    let hex = hex::encode(address_hash);
    format!("{}{}", ADDRESS_PREFIX, &hex[..ADDRESS_HEX_LEN])
}

/// Check that `value` is a well-formed address.
pub fn validate_address(value: &str) -> Result<()> {
    let invalid = || TallyError::InvalidAddress {
        value: value.to_string(),
    };

    let body = value.strip_prefix(ADDRESS_PREFIX).ok_or_else(invalid)?;
    if body.len() != ADDRESS_HEX_LEN {
        return Err(invalid());
    }
    if !body
        .chars()
        .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
    {
        return Err(invalid());
    }
    Ok(())
}

mod secret_hex {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::SECRET_LEN;

    pub fn serialize<S: Serializer>(
        secret: &[u8; SECRET_LEN],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(secret))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<[u8; SECRET_LEN], D::Error> {
        let s = String::deserialize(deserializer)?;
        let bytes = hex::decode(&s).map_err(serde::de::Error::custom)?;
        bytes
            .try_into()
            .map_err(|_| serde::de::Error::custom("secret must be 32 bytes of hex"))
    }
}
