//! Error types for Tally operations.
//!
//! This module defines [`TallyError`], the primary error type used throughout
//! the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Use `TallyError` for domain-specific errors that need distinct handling
//! - Use `anyhow::Error` (via `TallyError::Other`) for unexpected errors
//! - All errors should provide actionable messages for users
//!
//! Flow execution is the one place that does NOT return errors: the engine
//! converts every failure into a terminal [`crate::flow::FlowResult`].

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for Tally operations.
#[derive(Debug, Error)]
pub enum TallyError {
    /// Configuration file not found at an explicitly requested location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// A prompt was needed but no interactive terminal and no default exist.
    #[error("Cannot prompt for '{key}' in non-interactive mode (no default value)")]
    PromptUnavailable { key: String },

    /// The ledger service answered with an error body.
    #[error("Ledger error from {endpoint}: {message}")]
    Rpc { endpoint: String, message: String },

    /// The requested account does not exist on the ledger.
    #[error("Account not found: {account}")]
    AccountNotFound { account: String },

    /// Address failed validation.
    #[error("Invalid address '{value}' (expected tal1 followed by 40 hex characters)")]
    InvalidAddress { value: String },

    /// Amount string failed validation.
    #[error("Invalid amount '{value}' (expected a decimal TAL value like 1.5)")]
    InvalidAmount { value: String },

    /// Alias failed validation.
    #[error("Invalid alias '{value}' (expected 3-32 lowercase letters, digits, and dashes)")]
    InvalidAlias { value: String },

    /// No keypair on disk where one was expected.
    #[error("Keypair not found at {path} (run 'tally setup' first)")]
    KeypairNotFound { path: PathBuf },

    /// Refusing to clobber an existing keypair.
    #[error("Keypair already exists at {path} (use --force to overwrite)")]
    KeypairExists { path: PathBuf },

    /// Keypair file exists but could not be decoded.
    #[error("Failed to read keypair at {path}: {message}")]
    KeypairParse { path: PathBuf, message: String },

    /// OS entropy source failed.
    #[error("Random generator unavailable: {message}")]
    KeyGeneration { message: String },

    /// HTTP transport failure (connect, timeout, TLS).
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encode/decode failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for Tally operations.
pub type Result<T> = std::result::Result<T, TallyError>;
