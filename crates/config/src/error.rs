//! Error types for configuration loading and resolution.
//!
//! Responsibilities:
//! - Define error variants for all configuration failures.
//!
//! Does NOT handle:
//! - Missing optional documents (non-fatal; the resolver falls back to an
//!   empty document and logs).
//! - Unresolved lookup keys (non-fatal; `get` returns the caller's default).
//!
//! Invariants:
//! - `AmbiguousPlacement` is distinct from the "not found" sentinel
//!   (`Ok(None)` from `resolve_path`), so callers can tell a contract
//!   violation in the data from a merely unmapped name.
//! - Dotenv errors NEVER include raw .env line contents to prevent secret
//!   leakage.

use std::io::ErrorKind;
use thiserror::Error;

/// Errors that can occur during configuration loading and resolution.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A path-mapping row has both placement override flags set.
    #[error("ambiguous placement for '{logical_name}': MPON and RON are both set")]
    AmbiguousPlacement { logical_name: String },

    #[error("invalid value for {var}: {message}")]
    InvalidValue { var: String, message: String },

    #[error("unable to determine a configuration root: {0}")]
    RootUnavailable(String),

    #[error("database settings document is missing or has no 'database' section")]
    MissingDatabaseConfig,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse the `.env` file due to invalid syntax.
    ///
    /// SAFETY: This error only includes the byte index of the parse failure,
    /// NOT the offending line content, to prevent leaking secrets.
    #[error(
        "failed to parse .env file at position {error_index}. Hint: set DOTENV_DISABLED=1 to skip .env loading"
    )]
    DotenvParse { error_index: usize },

    /// Failed to read the `.env` file due to an I/O error.
    #[error("failed to read .env file: {kind}")]
    DotenvIo { kind: ErrorKind },

    /// Unknown dotenv error (future variants from the dotenvy crate).
    #[error("failed to load .env file. Hint: set DOTENV_DISABLED=1 to skip .env loading")]
    DotenvUnknown,
}
