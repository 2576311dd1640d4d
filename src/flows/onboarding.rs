//! The onboarding flow: provision a funded devnet account.
//!
//! Four steps: generate a keypair, register an alias, request faucet funds
//! (optional), and verify the account on the ledger. Steps share state only
//! through the execution context; the keypair itself is reloaded from the
//! keystore by each step that needs it, so every step stays safe to retry.

use std::cell::RefCell;
use std::sync::{Arc, OnceLock};

use regex::Regex;

use crate::client::{parse_amount, FaucetRequest, LedgerClient, RegisterRequest, UNITS_PER_TAL};
use crate::error::{Result, TallyError};
use crate::flow::{
    ExecutionContext, FlowEngine, InputCollector, Step, StepOutcome,
};
use crate::keys::Keystore;
use crate::ui::{Prompt, UserInterface};

/// Name under which onboarding runs appear in results and history.
pub const FLOW_NAME: &str = "onboarding";

const DEFAULT_FUND_TAL: &str = "10";
const DEFAULT_FUND_UNITS: u64 = 10 * UNITS_PER_TAL;

/// Check that `value` is a usable alias: 3 to 32 characters, starting with
/// a lowercase letter, then lowercase letters, digits, or dashes.
pub fn validate_alias(value: &str) -> Result<()> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern =
        PATTERN.get_or_init(|| Regex::new(r"^[a-z][a-z0-9-]{2,31}$").expect("alias pattern"));
    if pattern.is_match(value) {
        Ok(())
    } else {
        Err(TallyError::InvalidAlias {
            value: value.to_string(),
        })
    }
}

/// Everything the onboarding steps need from the outside.
pub struct OnboardingServices {
    pub client: Arc<dyn LedgerClient>,
    pub keystore: Keystore,
    /// Per-attempt deadline for remote steps, in seconds.
    pub timeout_seconds: u64,
    /// Replace an existing keypair instead of refusing.
    pub force: bool,
}

/// Assemble the onboarding flow against the given services.
///
/// The returned engine still needs a cancel token wired in by the caller;
/// everything else is declared here.
pub fn build_flow(services: &OnboardingServices) -> FlowEngine {
    FlowEngine::new(FLOW_NAME)
        .add_step(keypair_step(services))
        .add_step(register_step(services))
        .add_step(fund_step(services))
        .add_step(verify_step(services))
}

/// Generate a keypair and store it. One attempt only: a second run would
/// discard the key the first run just wrote.
fn keypair_step(services: &OnboardingServices) -> Step {
    let keystore = services.keystore.clone();
    let force = services.force;

    Step::new(
        "keypair",
        "Generate and store a local keypair",
        move |ctx: &mut ExecutionContext| {
            let keypair = match crate::keys::Keypair::generate() {
                Ok(keypair) => keypair,
                Err(e) => return StepOutcome::transient(e.to_string()),
            };
            if let Err(e) = keystore.save(&keypair, force) {
                return StepOutcome::transient(e.to_string());
            }
            ctx.set("address", keypair.address());
            ctx.set("fingerprint", keypair.fingerprint());
            StepOutcome::Success
        },
    )
    .with_max_retries(1)
}

fn register_step(services: &OnboardingServices) -> Step {
    let client = Arc::clone(&services.client);
    let keystore = services.keystore.clone();

    Step::new(
        "register",
        "Register your alias on the ledger",
        move |ctx: &mut ExecutionContext| {
            let alias = match ctx.get_str("alias") {
                Some(alias) => alias.to_string(),
                None => return StepOutcome::transient("no alias collected"),
            };
            let keypair = match keystore.load() {
                Ok(keypair) => keypair,
                Err(e) => return StepOutcome::transient(e.to_string()),
            };

            let payload = format!("{}:{}", alias, keypair.address());
            let request = RegisterRequest {
                address: keypair.address().to_string(),
                alias,
                auth_tag: keypair.auth_tag(payload.as_bytes()),
            };
            match client.register_alias(&request) {
                Ok(receipt) => {
                    ctx.set("register_tx", receipt.tx_id);
                    StepOutcome::Success
                }
                Err(e) => StepOutcome::transient(e.to_string()),
            }
        },
    )
    .depends_on(["keypair"])
    .with_timeout_seconds(services.timeout_seconds)
}

/// Optional: a dry faucet leaves the account unfunded but usable.
fn fund_step(services: &OnboardingServices) -> Step {
    let client = Arc::clone(&services.client);

    Step::new(
        "fund",
        "Request starter funds from the faucet",
        move |ctx: &mut ExecutionContext| {
            let address = match ctx.get_str("address") {
                Some(address) => address.to_string(),
                None => return StepOutcome::transient("no address in context"),
            };
            let amount = ctx.get_u64("amount_units").unwrap_or(DEFAULT_FUND_UNITS);

            match client.request_funds(&FaucetRequest { address, amount }) {
                Ok(receipt) => {
                    ctx.set("fund_tx", receipt.tx_id);
                    StepOutcome::Success
                }
                Err(e) => StepOutcome::transient(e.to_string()),
            }
        },
    )
    .optional()
    .depends_on(["keypair"])
    .with_timeout_seconds(services.timeout_seconds)
}

/// Read the account back and confirm the registration is visible.
fn verify_step(services: &OnboardingServices) -> Step {
    let client = Arc::clone(&services.client);

    Step::new(
        "verify",
        "Confirm the account is live",
        move |ctx: &mut ExecutionContext| {
            let address = match ctx.get_str("address") {
                Some(address) => address.to_string(),
                None => return StepOutcome::transient("no address in context"),
            };

            match client.account(&address) {
                Ok(account) => {
                    let expected = ctx.get_str("alias");
                    if expected.is_some() && account.alias.as_deref() != expected {
                        return StepOutcome::transient("alias not yet visible on the ledger");
                    }
                    ctx.set("balance", account.balance);
                    StepOutcome::Success
                }
                Err(e) => StepOutcome::transient(e.to_string()),
            }
        },
    )
    .depends_on(["register"])
    .with_timeout_seconds(services.timeout_seconds)
}

/// Collects onboarding inputs from CLI flags, falling back to prompts.
///
/// Flags win over prompts so `tally setup --alias dev --yes` runs without
/// touching the terminal; in a headless environment the prompts resolve
/// through `TALLY_PROMPT_*` variables instead.
pub struct OnboardingInputs<'a, 'b> {
    ui: &'a RefCell<&'b mut dyn UserInterface>,
    network: String,
    alias: Option<String>,
    amount: Option<String>,
    assume_yes: bool,
}

impl<'a, 'b> OnboardingInputs<'a, 'b> {
    pub fn new(
        ui: &'a RefCell<&'b mut dyn UserInterface>,
        network: impl Into<String>,
        alias: Option<String>,
        amount: Option<String>,
        assume_yes: bool,
    ) -> Self {
        Self {
            ui,
            network: network.into(),
            alias,
            amount,
            assume_yes,
        }
    }
}

impl InputCollector for OnboardingInputs<'_, '_> {
    fn collect(&mut self, ctx: &mut ExecutionContext) -> Result<()> {
        let alias = match &self.alias {
            Some(alias) => alias.clone(),
            None => self
                .ui
                .borrow_mut()
                .prompt(&Prompt::input("alias", "Alias for this account"))?
                .as_string(),
        };
        validate_alias(&alias)?;

        let amount = match &self.amount {
            Some(amount) => amount.clone(),
            None => self
                .ui
                .borrow_mut()
                .prompt(
                    &Prompt::input("amount", "Faucet amount in TAL")
                        .with_default(DEFAULT_FUND_TAL),
                )?
                .as_string(),
        };
        let amount_units = parse_amount(&amount)?;

        ctx.set("alias", alias);
        ctx.set("amount_units", amount_units);
        ctx.set("network", self.network.clone());
        Ok(())
    }

    fn confirm(&mut self) -> Result<bool> {
        if self.assume_yes {
            return Ok(true);
        }
        let mut ui = self.ui.borrow_mut();
        if !ui.is_interactive() {
            ui.warning("Confirmation required; re-run with --yes to proceed without a terminal");
            return Ok(false);
        }
        let answer = ui.prompt(&Prompt::confirm(
            "run_flow",
            format!("Provision this account on {}?", self.network),
        ))?;
        Ok(answer.as_bool().unwrap_or(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockLedgerClient;
    use crate::flow::{FlowStatus, MockCollector, MockReporter, MockTimer};
    use crate::ui::MockUI;
    use tempfile::TempDir;

    fn services(client: Arc<MockLedgerClient>, home: &TempDir) -> OnboardingServices {
        OnboardingServices {
            client,
            keystore: Keystore::new(home.path()),
            timeout_seconds: 30,
            force: false,
        }
    }

    fn inputs() -> MockCollector {
        MockCollector::confirming()
            .with_input("alias", "dev-wallet")
            .with_input("amount_units", 5_000_000u64)
    }

    #[test]
    fn onboarding_completes_against_healthy_node() {
        let home = TempDir::new().unwrap();
        let client = Arc::new(MockLedgerClient::new());
        let services = services(Arc::clone(&client), &home);

        let mut collector = inputs();
        let mut reporter = MockReporter::default();
        let result = build_flow(&services)
            .with_timer(MockTimer::new())
            .execute(&mut collector, &mut reporter);

        assert_eq!(result.status, FlowStatus::Completed);
        assert_eq!(
            result.completed_steps,
            ["keypair", "register", "fund", "verify"]
        );

        let address = result.data.get_str("address").unwrap();
        assert!(address.starts_with("tal1"));
        assert!(result.data.get_str("register_tx").is_some());
        assert!(result.data.get_str("fund_tx").is_some());
        assert_eq!(result.data.get_u64("balance"), Some(5_000_000));

        assert!(services.keystore.exists());
        let account = client.account_state(address).unwrap();
        assert_eq!(account.alias.as_deref(), Some("dev-wallet"));
        assert_eq!(account.balance, 5_000_000);
    }

    #[test]
    fn register_outage_is_retried_then_recovers() {
        let home = TempDir::new().unwrap();
        let client = Arc::new(MockLedgerClient::new());
        client.fail_register(2, "node catching up");
        let services = services(Arc::clone(&client), &home);

        let result = build_flow(&services)
            .with_timer(MockTimer::new())
            .execute(&mut inputs(), &mut MockReporter::default());

        assert_eq!(result.status, FlowStatus::Completed);
        assert_eq!(client.call_count("register_alias"), 3);
    }

    #[test]
    fn persistent_register_failure_fails_the_flow() {
        let home = TempDir::new().unwrap();
        let client = Arc::new(MockLedgerClient::new());
        client.fail_register(10, "alias service down");
        let services = services(Arc::clone(&client), &home);

        let result = build_flow(&services)
            .with_timer(MockTimer::new())
            .execute(&mut inputs(), &mut MockReporter::default());

        assert_eq!(result.status, FlowStatus::Failed);
        assert_eq!(result.failed_step.as_deref(), Some("register"));
        assert!(result.error.as_deref().unwrap().contains("alias service down"));
        // fund and verify depend on steps past the failure point
        assert_eq!(client.call_count("request_funds"), 0);
        assert_eq!(client.call_count("account"), 0);
    }

    #[test]
    fn dry_faucet_skips_fund_but_completes() {
        let home = TempDir::new().unwrap();
        let client = Arc::new(MockLedgerClient::new());
        client.disable_faucet();
        let services = services(Arc::clone(&client), &home);

        let mut reporter = MockReporter::default();
        let result = build_flow(&services)
            .with_timer(MockTimer::new())
            .execute(&mut inputs(), &mut reporter);

        assert_eq!(result.status, FlowStatus::Completed);
        assert_eq!(result.completed_steps, ["keypair", "register", "verify"]);
        assert!(reporter.has_skipped("fund"));
        assert_eq!(result.data.get_u64("balance"), Some(0));
        assert!(!result.data.contains("fund_tx"));
    }

    #[test]
    fn existing_keypair_fails_fast_without_force() {
        let home = TempDir::new().unwrap();
        let client = Arc::new(MockLedgerClient::new());
        let services = services(Arc::clone(&client), &home);
        services
            .keystore
            .save(&crate::keys::Keypair::generate().unwrap(), false)
            .unwrap();

        let result = build_flow(&services)
            .with_timer(MockTimer::new())
            .execute(&mut inputs(), &mut MockReporter::default());

        assert_eq!(result.status, FlowStatus::Failed);
        assert_eq!(result.failed_step.as_deref(), Some("keypair"));
        assert!(result.error.as_deref().unwrap().contains("--force"));
        // single attempt, nothing hit the network
        assert!(client.calls().is_empty());
    }

    #[test]
    fn force_replaces_existing_keypair() {
        let home = TempDir::new().unwrap();
        let client = Arc::new(MockLedgerClient::new());
        let mut services = services(Arc::clone(&client), &home);
        services.force = true;

        let old = crate::keys::Keypair::generate().unwrap();
        services.keystore.save(&old, false).unwrap();

        let result = build_flow(&services)
            .with_timer(MockTimer::new())
            .execute(&mut inputs(), &mut MockReporter::default());

        assert_eq!(result.status, FlowStatus::Completed);
        let stored = services.keystore.load().unwrap();
        assert_ne!(stored.address(), old.address());
    }

    #[test]
    fn alias_validation() {
        assert!(validate_alias("dev").is_ok());
        assert!(validate_alias("dev-wallet-2").is_ok());

        assert!(validate_alias("ab").is_err());
        assert!(validate_alias("Dev").is_err());
        assert!(validate_alias("3dev").is_err());
        assert!(validate_alias("dev_wallet").is_err());
        assert!(validate_alias(&"a".repeat(33)).is_err());
    }

    #[test]
    fn inputs_prefer_flags_over_prompts() {
        let mut ui = MockUI::new();
        let cell: RefCell<&mut dyn UserInterface> = RefCell::new(&mut ui);
        let mut inputs = OnboardingInputs::new(
            &cell,
            "devnet",
            Some("dev-wallet".to_string()),
            Some("2.5".to_string()),
            true,
        );

        let mut ctx = ExecutionContext::new();
        inputs.collect(&mut ctx).unwrap();
        assert!(inputs.confirm().unwrap());

        assert_eq!(ctx.get_str("alias"), Some("dev-wallet"));
        assert_eq!(ctx.get_u64("amount_units"), Some(2_500_000));
        assert_eq!(ctx.get_str("network"), Some("devnet"));
        assert!(ui.prompts_shown().is_empty());
    }

    #[test]
    fn inputs_prompt_for_missing_values() {
        let mut ui = MockUI::new();
        ui.set_prompt_response("alias", "prompted-alias");
        ui.set_interactive(true);
        ui.set_prompt_response("run_flow", "yes");
        let cell: RefCell<&mut dyn UserInterface> = RefCell::new(&mut ui);
        let mut inputs = OnboardingInputs::new(&cell, "devnet", None, None, false);

        let mut ctx = ExecutionContext::new();
        inputs.collect(&mut ctx).unwrap();
        assert!(inputs.confirm().unwrap());

        assert_eq!(ctx.get_str("alias"), Some("prompted-alias"));
        // amount fell back to the prompt default
        assert_eq!(ctx.get_u64("amount_units"), Some(DEFAULT_FUND_UNITS));
    }

    #[test]
    fn invalid_alias_flag_is_rejected() {
        let mut ui = MockUI::new();
        let cell: RefCell<&mut dyn UserInterface> = RefCell::new(&mut ui);
        let mut inputs =
            OnboardingInputs::new(&cell, "devnet", Some("Not Valid".to_string()), None, true);

        let err = inputs.collect(&mut ExecutionContext::new()).unwrap_err();
        assert!(matches!(err, TallyError::InvalidAlias { .. }));
    }

    #[test]
    fn headless_without_yes_declines() {
        let mut ui = MockUI::new();
        let cell: RefCell<&mut dyn UserInterface> = RefCell::new(&mut ui);
        let mut inputs = OnboardingInputs::new(&cell, "devnet", None, None, false);

        assert!(!inputs.confirm().unwrap());
        assert!(ui.has_warning("--yes"));
    }
}
