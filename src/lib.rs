//! Tally - CLI client for the Tally ledger devnet.
//!
//! Tally provisions and operates devnet accounts: it generates keypairs,
//! registers aliases, pulls faucet funds, and submits transfers, with the
//! multi-step work driven by a small synchronous flow engine.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`client`] - Ledger node HTTP client and wire types
//! - [`config`] - Configuration loading and the tally home directory
//! - [`error`] - Error types and result aliases
//! - [`flow`] - Flow engine: steps, retry, cancellation, reporting
//! - [`flows`] - Concrete flows (onboarding) and terminal rendering
//! - [`keys`] - Keypair generation, address derivation, keystore
//! - [`state`] - Persistent flow run history
//! - [`ui`] - Interactive prompts, spinners, and terminal output
//!
//! # Example
//!
//! ```
//! use tally::flow::{ExecutionContext, FlowEngine, MockCollector, NullReporter, Step, StepOutcome};
//!
//! let engine = FlowEngine::new("demo").add_step(Step::new(
//!     "greet",
//!     "Record a greeting",
//!     |ctx: &mut ExecutionContext| {
//!         ctx.set("greeting", "hello");
//!         StepOutcome::Success
//!     },
//! ));
//!
//! let result = engine.execute(&mut MockCollector::confirming(), &mut NullReporter);
//! assert!(result.succeeded());
//! assert_eq!(result.data.get_str("greeting"), Some("hello"));
//! ```

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod flow;
pub mod flows;
pub mod keys;
pub mod state;
pub mod ui;

pub use error::{Result, TallyError};
