//! Persistent run history.
//!
//! Every flow run leaves a [`FlowRecord`] in `<home>/history.json`;
//! [`HistoryStore`] trims the file to the configured retention. History is
//! best-effort: a store failure degrades to a warning, it never fails the
//! command whose flow just ran.

pub mod history;
pub mod store;

pub use history::{FlowRecord, FlowRunStatus};
pub use store::HistoryStore;
