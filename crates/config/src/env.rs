//! Environment variable overrides for configuration lookups.
//!
//! Responsibilities:
//! - Map dotted lookup keys to prefixed environment variable names.
//! - Coerce raw override strings to typed values.
//! - Provide `.env` bootstrapping with the `DOTENV_DISABLED` gate.
//!
//! Invariants:
//! - An override, when present, takes precedence over every loaded document.
//! - Empty or whitespace-only environment variables are treated as unset.
//! - Returned values are trimmed (leading/trailing whitespace removed).

use crate::error::ConfigError;
use crate::value::Value;

/// Read an environment variable, returning None if unset, empty, or
/// whitespace-only. Returns the trimmed value if present.
pub fn env_var_or_none(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == s.len() {
            // No trimming needed, return original to avoid allocation
            Some(s)
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// The environment variable name overriding `dotted_key` under `prefix`
/// (`database.host` with prefix `FACTOR_UPDATE_` -> `FACTOR_UPDATE_DATABASE_HOST`).
pub(crate) fn env_key(prefix: &str, dotted_key: &str) -> String {
    let mut name = String::with_capacity(prefix.len() + dotted_key.len());
    name.push_str(prefix);
    for ch in dotted_key.chars() {
        if ch == '.' {
            name.push('_');
        } else {
            name.extend(ch.to_uppercase());
        }
    }
    name
}

/// Coerce a raw override string to a typed value.
///
/// `"true"`/`"false"` (case-insensitive) become booleans, integer-parseable
/// strings become integers, float-parseable strings become floats, and
/// everything else passes through as a string.
pub fn coerce_env_value(raw: &str) -> Value {
    if raw.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if raw.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }
    if let Ok(int) = raw.parse::<i64>() {
        return Value::Int(int);
    }
    if let Ok(float) = raw.parse::<f64>() {
        return Value::Float(float);
    }
    Value::String(raw.to_string())
}

/// The coerced override for `dotted_key`, if the corresponding environment
/// variable is set and non-blank.
pub fn env_override(prefix: &str, dotted_key: &str) -> Option<Value> {
    env_var_or_none(&env_key(prefix, dotted_key)).map(|raw| coerce_env_value(&raw))
}

/// Check if dotenv loading is disabled via environment variable.
fn dotenv_disabled() -> bool {
    matches!(
        std::env::var("DOTENV_DISABLED").ok().as_deref(),
        Some("true") | Some("1")
    )
}

/// Load environment variables from a `.env` file if present.
///
/// If the `DOTENV_DISABLED` environment variable is set to "true" or "1",
/// the `.env` file is not loaded (useful for testing). Missing `.env`
/// files are silently ignored.
///
/// SAFETY: Error messages never include raw .env line contents to prevent
/// secret leakage.
pub fn load_dotenv() -> Result<(), ConfigError> {
    if dotenv_disabled() {
        return Ok(());
    }

    match dotenvy::dotenv() {
        Ok(_) => Ok(()),
        Err(e) if is_not_found(&e) => Ok(()),
        Err(dotenvy::Error::LineParse(_, idx)) => Err(ConfigError::DotenvParse { error_index: idx }),
        Err(dotenvy::Error::Io(io_err)) => Err(ConfigError::DotenvIo {
            kind: io_err.kind(),
        }),
        Err(_) => Err(ConfigError::DotenvUnknown),
    }
}

/// Check if a dotenv error indicates the file was not found.
fn is_not_found(err: &dotenvy::Error) -> bool {
    matches!(
        err,
        dotenvy::Error::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound
    )
}
