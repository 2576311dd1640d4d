//! Flow orchestration engine.
//!
//! Runs one declared sequence of dependent, retryable steps — a guided
//! procedure like `tally setup` — to exactly one terminal outcome. Steps are
//! gated on the *completion* of their named dependencies, retried with
//! exponential backoff while they fail transiently, and skipped (optional)
//! or fatal (required) when attempts run out. Cancellation is cooperative
//! and always wins: declining the confirmation or interrupting mid-run ends
//! the flow as `Cancelled`, never `Failed`.
//!
//! The engine is deliberately self-contained: inputs, side effects, and
//! rendering arrive through the [`InputCollector`], [`StepOperation`], and
//! [`Reporter`] seams, so it can be exercised hermetically:
//!
//! ```
//! use tally::flow::{
//!     ExecutionContext, FlowEngine, FlowStatus, MockCollector, MockReporter, Step, StepOutcome,
//! };
//!
//! let engine = FlowEngine::new("demo")
//!     .add_step(Step::new("greet", "Say hello", |ctx: &mut ExecutionContext| {
//!         ctx.set("greeting", "hello");
//!         StepOutcome::Success
//!     }));
//!
//! let mut inputs = MockCollector::confirming();
//! let mut reporter = MockReporter::default();
//! let result = engine.execute(&mut inputs, &mut reporter);
//!
//! assert_eq!(result.status, FlowStatus::Completed);
//! assert_eq!(result.completed_steps, ["greet"]);
//! assert_eq!(result.data.get_str("greeting"), Some("hello"));
//! ```

pub mod cancel;
pub mod context;
pub mod engine;
pub mod mock;
pub mod report;
pub mod result;
pub mod retry;
pub mod step;

pub use cancel::{install_interrupt_handler, CancelToken};
pub use context::{ExecutionContext, KEY_FLOW_ID, KEY_STARTED_AT};
pub use engine::{dependencies_met, FlowEngine, InputCollector};
pub use mock::{MockCollector, MockReporter, MockTimer};
pub use report::{NullReporter, Reporter};
pub use result::{FlowResult, FlowStatus};
pub use retry::{AttemptOutcome, BackoffTimer, RetryPolicy, SystemTimer, WaitOutcome};
pub use step::{Step, StepOperation, StepOutcome, DEFAULT_MAX_RETRIES};
