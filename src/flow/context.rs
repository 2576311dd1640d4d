//! Mutable state bag threaded through all steps of one flow run.

use std::collections::BTreeMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

/// Key under which the run identifier is seeded.
pub const KEY_FLOW_ID: &str = "flow_id";
/// Key under which the run start timestamp (RFC 3339) is seeded.
pub const KEY_STARTED_AT: &str = "started_at";

/// String-keyed values shared by the steps of one flow run.
///
/// Exclusively owned by a single execution: steps mutate it in place, the
/// engine never replaces or resets it mid-flow, and the final snapshot is
/// handed back through [`crate::flow::FlowResult`]. An ordered map keeps
/// snapshots rendering deterministically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExecutionContext {
    values: BTreeMap<String, Value>,
}

impl ExecutionContext {
    /// Create a context seeded with flow metadata (`flow_id`, `started_at`).
    pub fn new() -> Self {
        let mut values = BTreeMap::new();
        values.insert(KEY_FLOW_ID.to_string(), Value::from(new_flow_id()));
        values.insert(
            KEY_STARTED_AT.to_string(),
            Value::from(Utc::now().to_rfc3339()),
        );
        Self { values }
    }

    /// The seeded run identifier.
    pub fn flow_id(&self) -> Option<&str> {
        self.get_str(KEY_FLOW_ID)
    }

    /// Insert or replace a value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(Value::as_str)
    }

    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.values.get(key).and_then(Value::as_u64)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.values.get(key).and_then(Value::as_bool)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// All values, in key order.
    pub fn values(&self) -> &BTreeMap<String, Value> {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Default for ExecutionContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Generate a run identifier: `flow_{timestamp_ms}_{random_hex}`.
fn new_flow_id() -> String {
    let now = Utc::now();
    let mut random = [0u8; 4];
    if getrandom::getrandom(&mut random).is_err() {
        // Ids need uniqueness, not secrecy; a clock hash will do if the OS
        // entropy source is unavailable.
        let nanos = now.timestamp_nanos_opt().unwrap_or_default();
        let digest = Sha256::digest(nanos.to_le_bytes());
        random.copy_from_slice(&digest[..4]);
    }
    format!("flow_{}_{}", now.timestamp_millis(), hex::encode(random))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_context_seeds_metadata() {
        let ctx = ExecutionContext::new();

        assert!(ctx.contains(KEY_FLOW_ID));
        assert!(ctx.contains(KEY_STARTED_AT));
        assert_eq!(ctx.len(), 2);
    }

    #[test]
    fn flow_id_has_expected_shape() {
        let ctx = ExecutionContext::new();
        let id = ctx.flow_id().unwrap();

        assert!(id.starts_with("flow_"));
        let parts: Vec<&str> = id.strip_prefix("flow_").unwrap().split('_').collect();
        assert_eq!(parts.len(), 2);
        assert!(parts[0].parse::<i64>().is_ok());
        assert_eq!(parts[1].len(), 8);
    }

    #[test]
    fn flow_ids_are_unique() {
        let a = ExecutionContext::new();
        let b = ExecutionContext::new();
        assert_ne!(a.flow_id(), b.flow_id());
    }

    #[test]
    fn started_at_parses_as_rfc3339() {
        let ctx = ExecutionContext::new();
        let started = ctx.get_str(KEY_STARTED_AT).unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(started).is_ok());
    }

    #[test]
    fn set_and_get_round_trip() {
        let mut ctx = ExecutionContext::new();
        ctx.set("alias", "dev-wallet");
        ctx.set("amount", 2_500_000u64);
        ctx.set("funded", false);

        assert_eq!(ctx.get_str("alias"), Some("dev-wallet"));
        assert_eq!(ctx.get_u64("amount"), Some(2_500_000));
        assert_eq!(ctx.get_bool("funded"), Some(false));
    }

    #[test]
    fn set_replaces_existing_value() {
        let mut ctx = ExecutionContext::new();
        ctx.set("network", "devnet");
        ctx.set("network", "testnet");
        assert_eq!(ctx.get_str("network"), Some("testnet"));
    }

    #[test]
    fn typed_getters_reject_wrong_types() {
        let mut ctx = ExecutionContext::new();
        ctx.set("alias", "dev-wallet");

        assert_eq!(ctx.get_u64("alias"), None);
        assert_eq!(ctx.get_bool("alias"), None);
    }

    #[test]
    fn remove_returns_value() {
        let mut ctx = ExecutionContext::new();
        ctx.set("scratch", 1u64);
        assert!(ctx.remove("scratch").is_some());
        assert!(!ctx.contains("scratch"));
    }

    #[test]
    fn serializes_as_flat_map() {
        let mut ctx = ExecutionContext::new();
        ctx.set("alias", "dev-wallet");

        let json = serde_json::to_value(&ctx).unwrap();
        assert!(json.is_object());
        assert_eq!(json["alias"], "dev-wallet");

        let back: ExecutionContext = serde_json::from_value(json).unwrap();
        assert_eq!(back, ctx);
    }
}
