//! Bounded retry with exponential backoff.

use std::thread;
use std::time::Duration;

use tracing::debug;

use super::cancel::CancelToken;
use super::context::ExecutionContext;
use super::report::Reporter;
use super::step::{Step, StepOutcome};

/// Default base backoff unit.
const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);
/// Default backoff ceiling. Exponential growth is capped here so a large
/// attempt bound cannot produce hour-long waits.
const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(60);
/// Slice length for the real timer, so cancellation is observed promptly
/// mid-wait.
const SLEEP_SLICE: Duration = Duration::from_millis(50);

/// How a backoff wait ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// The full delay was served.
    Elapsed,
    /// Cancellation was observed before the delay finished.
    Interrupted,
}

/// Sleep used between retry attempts.
///
/// Swappable so tests can record delays instead of serving them.
pub trait BackoffTimer {
    fn wait(&mut self, delay: Duration, cancel: &CancelToken) -> WaitOutcome;
}

/// Real timer: sleeps in short slices, polling the cancel token between
/// slices so an interrupt aborts the wait instead of finishing it.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimer;

impl BackoffTimer for SystemTimer {
    fn wait(&mut self, delay: Duration, cancel: &CancelToken) -> WaitOutcome {
        let mut remaining = delay;
        loop {
            if cancel.is_cancelled() {
                return WaitOutcome::Interrupted;
            }
            if remaining.is_zero() {
                return WaitOutcome::Elapsed;
            }
            let slice = remaining.min(SLEEP_SLICE);
            thread::sleep(slice);
            remaining = remaining.saturating_sub(slice);
        }
    }
}

/// Result of driving one step's operation through the retry policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// The operation succeeded within the attempt bound.
    Completed { attempts: u32 },
    /// Every allowed attempt failed; the last reason is attached.
    Exhausted { attempts: u32, last_error: String },
    /// Cancellation was observed at an attempt boundary, inside an attempt,
    /// or during a backoff wait.
    Cancelled,
}

/// Exponential backoff policy.
///
/// Attempt `i` (zero-based) failing waits `base_delay * 2^i` before attempt
/// `i + 1`, with no jitter, capped at `max_delay`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    base_delay: Duration,
    max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            base_delay: DEFAULT_BASE_DELAY,
            max_delay: DEFAULT_MAX_DELAY,
        }
    }
}

impl RetryPolicy {
    pub fn new(base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            base_delay,
            max_delay,
        }
    }

    pub fn base_delay(&self) -> Duration {
        self.base_delay
    }

    pub fn max_delay(&self) -> Duration {
        self.max_delay
    }

    /// Delay served after the given zero-based attempt fails.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let factor = match 2u32.checked_pow(attempt) {
            Some(factor) => factor,
            None => return self.max_delay,
        };
        match self.base_delay.checked_mul(factor) {
            Some(delay) => delay.min(self.max_delay),
            None => self.max_delay,
        }
    }

    /// Run `step`'s operation until it succeeds, exhausts its attempt bound,
    /// or cancellation is observed. The cancel token is checked before every
    /// attempt and honored mid-wait by the timer.
    pub fn run(
        &self,
        step: &Step,
        ctx: &mut ExecutionContext,
        cancel: &CancelToken,
        timer: &mut dyn BackoffTimer,
        reporter: &mut dyn Reporter,
    ) -> AttemptOutcome {
        let max_retries = step.max_retries();
        let mut last_error = String::new();

        for attempt in 0..max_retries {
            if cancel.is_cancelled() {
                return AttemptOutcome::Cancelled;
            }

            match step.attempt(ctx) {
                StepOutcome::Success => {
                    return AttemptOutcome::Completed {
                        attempts: attempt + 1,
                    }
                }
                StepOutcome::Cancelled => return AttemptOutcome::Cancelled,
                StepOutcome::Transient(reason) => {
                    debug!(
                        "step '{}' attempt {}/{} failed: {}",
                        step.name(),
                        attempt + 1,
                        max_retries,
                        reason
                    );
                    last_error = reason;

                    if attempt + 1 < max_retries {
                        let delay = self.delay_for_attempt(attempt);
                        reporter.step_retrying(step, attempt + 2, max_retries, delay);
                        if timer.wait(delay, cancel) == WaitOutcome::Interrupted {
                            return AttemptOutcome::Cancelled;
                        }
                    }
                }
            }
        }

        AttemptOutcome::Exhausted {
            attempts: max_retries,
            last_error,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::super::mock::MockTimer;
    use super::super::report::NullReporter;
    use super::*;

    fn failing_step(name: &str, max_retries: u32, calls: Rc<Cell<u32>>) -> Step {
        Step::new(name, "Always fails", move |_: &mut ExecutionContext| {
            calls.set(calls.get() + 1);
            StepOutcome::transient("boom")
        })
        .with_max_retries(max_retries)
    }

    #[test]
    fn delay_doubles_per_attempt() {
        let policy = RetryPolicy::default();

        assert_eq!(policy.delay_for_attempt(0), Duration::from_secs(1));
        assert_eq!(policy.delay_for_attempt(1), Duration::from_secs(2));
        assert_eq!(policy.delay_for_attempt(2), Duration::from_secs(4));
        assert_eq!(policy.delay_for_attempt(5), Duration::from_secs(32));
    }

    #[test]
    fn delay_is_capped() {
        let policy = RetryPolicy::default();

        // 2^10 seconds would be ~17 minutes; the cap holds it at 60s.
        assert_eq!(policy.delay_for_attempt(10), Duration::from_secs(60));
        assert_eq!(policy.delay_for_attempt(31), Duration::from_secs(60));
        // Past u32 pow range the cap still applies.
        assert_eq!(policy.delay_for_attempt(40), Duration::from_secs(60));
    }

    #[test]
    fn custom_policy_uses_its_base() {
        let policy = RetryPolicy::new(Duration::from_millis(100), Duration::from_secs(1));

        assert_eq!(policy.delay_for_attempt(0), Duration::from_millis(100));
        assert_eq!(policy.delay_for_attempt(2), Duration::from_millis(400));
        assert_eq!(policy.delay_for_attempt(4), Duration::from_secs(1));
    }

    #[test]
    fn first_attempt_success_needs_no_wait() {
        let step = Step::new("ok", "Succeeds", |_: &mut ExecutionContext| {
            StepOutcome::Success
        });
        let mut ctx = ExecutionContext::new();
        let mut timer = MockTimer::new();

        let outcome = RetryPolicy::default().run(
            &step,
            &mut ctx,
            &CancelToken::new(),
            &mut timer,
            &mut NullReporter,
        );

        assert_eq!(outcome, AttemptOutcome::Completed { attempts: 1 });
        assert!(timer.waits.is_empty());
    }

    #[test]
    fn exhaustion_reports_last_error_and_waits_between_attempts() {
        let calls = Rc::new(Cell::new(0));
        let step = failing_step("flaky", 3, Rc::clone(&calls));
        let mut ctx = ExecutionContext::new();
        let mut timer = MockTimer::new();

        let outcome = RetryPolicy::default().run(
            &step,
            &mut ctx,
            &CancelToken::new(),
            &mut timer,
            &mut NullReporter,
        );

        assert_eq!(
            outcome,
            AttemptOutcome::Exhausted {
                attempts: 3,
                last_error: "boom".to_string(),
            }
        );
        assert_eq!(calls.get(), 3);
        // Two waits: after attempt 1 (1s) and attempt 2 (2s). None after the
        // final attempt.
        assert_eq!(
            timer.waits,
            vec![Duration::from_secs(1), Duration::from_secs(2)]
        );
    }

    #[test]
    fn single_attempt_bound_never_waits() {
        let calls = Rc::new(Cell::new(0));
        let step = failing_step("once", 1, Rc::clone(&calls));
        let mut ctx = ExecutionContext::new();
        let mut timer = MockTimer::new();

        let outcome = RetryPolicy::default().run(
            &step,
            &mut ctx,
            &CancelToken::new(),
            &mut timer,
            &mut NullReporter,
        );

        assert!(matches!(outcome, AttemptOutcome::Exhausted { attempts: 1, .. }));
        assert_eq!(calls.get(), 1);
        assert!(timer.waits.is_empty());
    }

    #[test]
    fn success_after_failures_stops_retrying() {
        let calls = Rc::new(Cell::new(0));
        let calls_op = Rc::clone(&calls);
        let step = Step::new("flaky", "Succeeds third time", move |_: &mut ExecutionContext| {
            calls_op.set(calls_op.get() + 1);
            if calls_op.get() < 3 {
                StepOutcome::transient("not yet")
            } else {
                StepOutcome::Success
            }
        })
        .with_max_retries(5);
        let mut ctx = ExecutionContext::new();
        let mut timer = MockTimer::new();

        let outcome = RetryPolicy::default().run(
            &step,
            &mut ctx,
            &CancelToken::new(),
            &mut timer,
            &mut NullReporter,
        );

        assert_eq!(outcome, AttemptOutcome::Completed { attempts: 3 });
        assert_eq!(calls.get(), 3);
        assert_eq!(timer.total_wait(), Duration::from_secs(3));
    }

    #[test]
    fn cancel_before_first_attempt_skips_operation() {
        let calls = Rc::new(Cell::new(0));
        let step = failing_step("never", 3, Rc::clone(&calls));
        let mut ctx = ExecutionContext::new();
        let cancel = CancelToken::new();
        cancel.cancel();

        let outcome = RetryPolicy::default().run(
            &step,
            &mut ctx,
            &cancel,
            &mut MockTimer::new(),
            &mut NullReporter,
        );

        assert_eq!(outcome, AttemptOutcome::Cancelled);
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn cancel_during_backoff_aborts_wait() {
        let calls = Rc::new(Cell::new(0));
        let step = failing_step("interrupted", 5, Rc::clone(&calls));
        let mut ctx = ExecutionContext::new();
        // First wait is interrupted, so only one attempt runs.
        let mut timer = MockTimer::interrupting_after(0);

        let outcome = RetryPolicy::default().run(
            &step,
            &mut ctx,
            &CancelToken::new(),
            &mut timer,
            &mut NullReporter,
        );

        assert_eq!(outcome, AttemptOutcome::Cancelled);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn operation_reporting_cancelled_stops_immediately() {
        let calls = Rc::new(Cell::new(0));
        let calls_op = Rc::clone(&calls);
        let step = Step::new("aware", "Sees the interrupt", move |_: &mut ExecutionContext| {
            calls_op.set(calls_op.get() + 1);
            StepOutcome::Cancelled
        })
        .with_max_retries(3);
        let mut ctx = ExecutionContext::new();

        let outcome = RetryPolicy::default().run(
            &step,
            &mut ctx,
            &CancelToken::new(),
            &mut MockTimer::new(),
            &mut NullReporter,
        );

        assert_eq!(outcome, AttemptOutcome::Cancelled);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn system_timer_serves_short_delays() {
        let mut timer = SystemTimer;
        let started = std::time::Instant::now();

        let outcome = timer.wait(Duration::from_millis(30), &CancelToken::new());

        assert_eq!(outcome, WaitOutcome::Elapsed);
        assert!(started.elapsed() >= Duration::from_millis(30));
    }

    #[test]
    fn system_timer_interrupts_on_cancelled_token() {
        let mut timer = SystemTimer;
        let cancel = CancelToken::new();
        cancel.cancel();

        let outcome = timer.wait(Duration::from_secs(120), &cancel);

        assert_eq!(outcome, WaitOutcome::Interrupted);
    }
}
