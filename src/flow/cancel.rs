//! Cooperative cancellation for flow execution.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared cancellation flag.
///
/// Clones observe the same flag. The engine polls it at the per-step and
/// per-attempt boundaries and during backoff waits; it is never reset, so
/// one token serves exactly one flow run.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Safe to call from any thread or from a signal
    /// handler holding a clone's inner flag.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    #[cfg(unix)]
    fn shared_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.flag)
    }
}

/// Route SIGINT to `token` so Ctrl-C cancels the flow at the next boundary
/// instead of killing the process mid-step.
///
/// Installs at most once per process; returns false if a handler is already
/// installed for a different token or the platform has no handler support.
#[cfg(unix)]
pub fn install_interrupt_handler(token: &CancelToken) -> bool {
    use std::sync::OnceLock;

    static INTERRUPT_FLAG: OnceLock<Arc<AtomicBool>> = OnceLock::new();

    extern "C" fn on_sigint(_signal: libc::c_int) {
        // Only async-signal-safe work here: one atomic store.
        if let Some(flag) = INTERRUPT_FLAG.get() {
            flag.store(true, Ordering::SeqCst);
        }
    }

    if INTERRUPT_FLAG.set(token.shared_flag()).is_err() {
        return false;
    }

    let previous = unsafe { libc::signal(libc::SIGINT, on_sigint as libc::sighandler_t) };
    previous != libc::SIG_ERR
}

/// Without signal support Ctrl-C keeps its default behavior; library callers
/// can still cancel through the token directly.
#[cfg(not(unix))]
pub fn install_interrupt_handler(_token: &CancelToken) -> bool {
    false
}
