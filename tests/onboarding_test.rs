//! End-to-end onboarding tests.
//!
//! Drives the setup command against a mock ledger and mock UI, checking the
//! full path from CLI arguments through the flow engine to the keystore and
//! history file on disk.

use std::sync::Arc;

use tally::cli::commands::setup::SetupCommand;
use tally::cli::SetupArgs;
use tally::client::MockLedgerClient;
use tally::config::Config;
use tally::flow::CancelToken;
use tally::keys::Keystore;
use tally::state::HistoryStore;
use tally::ui::MockUI;
use tempfile::TempDir;

fn command(home: &TempDir, cancel: CancelToken, args: SetupArgs) -> SetupCommand {
    SetupCommand::new(&Config::default(), home.path(), cancel, args)
}

fn args(alias: &str, yes: bool, force: bool) -> SetupArgs {
    SetupArgs {
        alias: Some(alias.to_string()),
        amount: Some("5".to_string()),
        yes,
        force,
    }
}

#[test]
fn interactive_prompts_drive_a_full_setup() {
    let home = TempDir::new().unwrap();
    let client = Arc::new(MockLedgerClient::new());

    let mut ui = MockUI::new();
    ui.set_interactive(true);
    ui.set_prompt_response("alias", "team-wallet");
    ui.set_prompt_response("run_flow", "yes");
    // amount left to the prompt default of 10 TAL

    let cmd = command(
        &home,
        CancelToken::new(),
        SetupArgs {
            alias: None,
            amount: None,
            yes: false,
            force: false,
        },
    );
    let result = cmd.run_with_client(Arc::clone(&client) as _, &mut ui).unwrap();

    assert!(result.success);
    assert_eq!(result.exit_code, 0);
    assert_eq!(ui.prompts_shown(), &["alias", "amount", "run_flow"]);
    assert!(ui.has_message("Balance: 10 TAL"));
    assert!(ui.has_successful_summary());

    let keypair = Keystore::new(home.path()).load().unwrap();
    let account = client.account_state(keypair.address()).unwrap();
    assert_eq!(account.alias.as_deref(), Some("team-wallet"));
    assert_eq!(account.balance, 10_000_000);
}

#[test]
fn rerun_without_force_keeps_the_existing_keypair() {
    let home = TempDir::new().unwrap();
    let client = Arc::new(MockLedgerClient::new());

    let mut ui = MockUI::new();
    let first = command(&home, CancelToken::new(), args("first-run", true, false));
    assert!(first
        .run_with_client(Arc::clone(&client) as _, &mut ui)
        .unwrap()
        .success);
    let original = Keystore::new(home.path()).load().unwrap();

    let mut ui = MockUI::new();
    let second = command(&home, CancelToken::new(), args("second-run", true, false));
    let result = second
        .run_with_client(Arc::clone(&client) as _, &mut ui)
        .unwrap();

    assert_eq!(result.exit_code, 1);
    assert!(ui.has_error("--force"));
    let kept = Keystore::new(home.path()).load().unwrap();
    assert_eq!(kept.address(), original.address());

    let history = HistoryStore::new(home.path(), 50).load().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].status.as_str(), "completed");
    assert_eq!(history[1].status.as_str(), "failed");
    assert_eq!(history[1].failed_step.as_deref(), Some("keypair"));
}

#[test]
fn rerun_with_force_provisions_a_fresh_account() {
    let home = TempDir::new().unwrap();
    let client = Arc::new(MockLedgerClient::new());

    let mut ui = MockUI::new();
    let first = command(&home, CancelToken::new(), args("first-run", true, false));
    assert!(first
        .run_with_client(Arc::clone(&client) as _, &mut ui)
        .unwrap()
        .success);
    let original = Keystore::new(home.path()).load().unwrap();

    let mut ui = MockUI::new();
    let second = command(&home, CancelToken::new(), args("second-run", true, true));
    let result = second
        .run_with_client(Arc::clone(&client) as _, &mut ui)
        .unwrap();

    assert!(result.success);
    let replaced = Keystore::new(home.path()).load().unwrap();
    assert_ne!(replaced.address(), original.address());
    assert_eq!(
        client
            .account_state(replaced.address())
            .unwrap()
            .alias
            .as_deref(),
        Some("second-run")
    );
}

#[test]
fn cancelled_before_start_touches_nothing() {
    let home = TempDir::new().unwrap();
    let client = Arc::new(MockLedgerClient::new());
    let cancel = CancelToken::new();
    cancel.cancel();

    let mut ui = MockUI::new();
    let cmd = command(&home, cancel, args("dev-wallet", true, false));
    let result = cmd.run_with_client(Arc::clone(&client) as _, &mut ui).unwrap();

    assert_eq!(result.exit_code, 130);
    assert!(client.calls().is_empty());
    assert!(!Keystore::new(home.path()).exists());

    let history = HistoryStore::new(home.path(), 50).load().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].status.as_str(), "cancelled");
    assert!(history[0].completed_steps.is_empty());
}

#[test]
fn dry_faucet_still_provisions_an_unfunded_account() {
    let home = TempDir::new().unwrap();
    let client = Arc::new(MockLedgerClient::new());
    client.disable_faucet();

    let mut ui = MockUI::new();
    let cmd = command(&home, CancelToken::new(), args("dev-wallet", true, false));
    let result = cmd.run_with_client(Arc::clone(&client) as _, &mut ui).unwrap();

    assert!(result.success);
    assert!(ui.has_message("Balance: 0 TAL"));
    assert!(ui.has_successful_summary());

    let history = HistoryStore::new(home.path(), 50).load().unwrap();
    assert_eq!(
        history[0].completed_steps,
        ["keypair", "register", "verify"]
    );
}
