//! HTTP ledger client tests against a mock node.

use std::time::Duration;

use httpmock::prelude::*;
use serde_json::json;

use tally::client::{
    FaucetRequest, HttpLedgerClient, LedgerClient, RegisterRequest, TransferRequest,
};
use tally::TallyError;

fn client(server: &MockServer) -> HttpLedgerClient {
    HttpLedgerClient::new(&server.base_url(), Duration::from_secs(5)).unwrap()
}

#[test]
fn status_decodes_the_node_report() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/v1/status");
        then.status(200).json_body(json!({
            "network": "devnet",
            "block_height": 10_420,
            "faucet_enabled": true,
            "version": "1.3.0"
        }));
    });

    let status = client(&server).status().unwrap();

    assert_eq!(status.network, "devnet");
    assert_eq!(status.block_height, 10_420);
    assert!(status.faucet_enabled);
    assert_eq!(status.version, "1.3.0");
}

#[test]
fn account_lookup_decodes_alias_and_balance() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/v1/accounts/tal1abc");
        then.status(200).json_body(json!({
            "address": "tal1abc",
            "alias": "dev-wallet",
            "balance": 2_500_000,
            "nonce": 4
        }));
    });

    let account = client(&server).account("tal1abc").unwrap();

    assert_eq!(account.alias.as_deref(), Some("dev-wallet"));
    assert_eq!(account.balance, 2_500_000);
    assert_eq!(account.nonce, 4);
}

#[test]
fn missing_account_maps_to_account_not_found() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/v1/accounts/tal1missing");
        then.status(404).json_body(json!({"error": "no such account"}));
    });

    let err = client(&server).account("tal1missing").unwrap_err();

    assert!(matches!(
        err,
        TallyError::AccountNotFound { ref account } if account == "tal1missing"
    ));
}

#[test]
fn register_posts_the_signed_request() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/v1/aliases").json_body(json!({
            "address": "tal1abc",
            "alias": "dev-wallet",
            "auth_tag": "deadbeef"
        }));
        then.status(200).json_body(json!({
            "tx_id": "tx_000001",
            "alias": "dev-wallet"
        }));
    });

    let receipt = client(&server)
        .register_alias(&RegisterRequest {
            address: "tal1abc".to_string(),
            alias: "dev-wallet".to_string(),
            auth_tag: "deadbeef".to_string(),
        })
        .unwrap();

    assert_eq!(receipt.tx_id, "tx_000001");
    assert_eq!(receipt.alias, "dev-wallet");
    mock.assert();
}

#[test]
fn faucet_request_decodes_the_grant() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/v1/faucet").json_body(json!({
            "address": "tal1abc",
            "amount": 10_000_000
        }));
        then.status(200).json_body(json!({
            "tx_id": "tx_000002",
            "amount": 10_000_000
        }));
    });

    let receipt = client(&server)
        .request_funds(&FaucetRequest {
            address: "tal1abc".to_string(),
            amount: 10_000_000,
        })
        .unwrap();

    assert_eq!(receipt.amount, 10_000_000);
    mock.assert();
}

#[test]
fn transfer_posts_memo_and_nonce() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/v1/transfers").json_body(json!({
            "from": "tal1abc",
            "to": "tal1def",
            "amount": 1_500_000,
            "memo": "coffee",
            "nonce": 7,
            "auth_tag": "deadbeef"
        }));
        then.status(200).json_body(json!({
            "tx_id": "tx_000003",
            "amount": 1_500_000,
            "fee": 1_000
        }));
    });

    let receipt = client(&server)
        .transfer(&TransferRequest {
            from: "tal1abc".to_string(),
            to: "tal1def".to_string(),
            amount: 1_500_000,
            memo: Some("coffee".to_string()),
            nonce: 7,
            auth_tag: "deadbeef".to_string(),
        })
        .unwrap();

    assert_eq!(receipt.tx_id, "tx_000003");
    assert_eq!(receipt.fee, 1_000);
    mock.assert();
}

#[test]
fn node_error_body_becomes_an_rpc_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/v1/aliases");
        then.status(409)
            .json_body(json!({"error": "alias 'dev-wallet' is already registered"}));
    });

    let err = client(&server)
        .register_alias(&RegisterRequest {
            address: "tal1abc".to_string(),
            alias: "dev-wallet".to_string(),
            auth_tag: "deadbeef".to_string(),
        })
        .unwrap_err();

    match err {
        TallyError::Rpc { endpoint, message } => {
            assert_eq!(endpoint, "/v1/aliases");
            assert!(message.contains("already registered"));
        }
        other => panic!("expected rpc error, got {:?}", other),
    }
}

#[test]
fn unshaped_error_falls_back_to_the_status_line() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/v1/status");
        then.status(500).body("node melted");
    });

    let err = client(&server).status().unwrap_err();

    let text = err.to_string();
    assert!(text.contains("HTTP 500"), "got: {}", text);
    assert!(text.contains("/v1/status"), "got: {}", text);
}

#[test]
fn requests_carry_the_tally_user_agent() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/v1/status")
            .header("user-agent", concat!("tally/", env!("CARGO_PKG_VERSION")));
        then.status(200).json_body(json!({
            "network": "devnet",
            "block_height": 1,
            "faucet_enabled": true,
            "version": "1.3.0"
        }));
    });

    client(&server).status().unwrap();
    mock.assert();
}
