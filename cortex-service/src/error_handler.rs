//! Unified error handling for `cortex-service`.
//!
//! This module exposes a single top-level error type [`CortexError`] for the whole
//! library, and groups domain-specific errors in nested enums ([`ConfigError`],
//! [`UpstreamError`]). Small helpers for reading/validating environment variables
//! and SQL identifiers are provided and return the unified [`Result<T>`] alias.
//!
//! All messages include the suffix `[Cortex Service]` to simplify attribution in logs.

use reqwest::StatusCode;
use thiserror::Error;

/* ------------------------------------------------------------------------- */
/* Public result alias                                                       */
/* ------------------------------------------------------------------------- */

/// Unified result alias for the entire crate.
pub type Result<T> = std::result::Result<T, CortexError>;

/* ------------------------------------------------------------------------- */
/* Top-level error                                                           */
/* ------------------------------------------------------------------------- */

/// Top-level error for the `cortex-service` crate.
///
/// Variants wrap domain-specific enums (config/upstream) and the raw HTTP
/// transport error. Prefer adding new sub-enums for distinct domains instead
/// of growing this type indefinitely.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum CortexError {
    /// Configuration/validation errors (startup or identifier checks).
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The platform answered, but not with what we asked for.
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    /// Underlying HTTP transport error (e.g., `reqwest::Error`).
    #[error("[Cortex Service] transport error: {0}")]
    HttpTransport(#[from] reqwest::Error),
}

impl CortexError {
    /// Returns `true` when the error means a requested document does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CortexError::Upstream(UpstreamError::DocumentNotFound(_))
        )
    }
}

/* ------------------------------------------------------------------------- */
/* Config errors                                                             */
/* ------------------------------------------------------------------------- */

/// Error enum for environment/config-driven setup.
///
/// Keep this focused: only errors that realistically happen at config
/// load/validation time.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable is missing or empty.
    #[error("[Cortex Service] missing required environment variable: {0}")]
    MissingVar(&'static str),

    /// A number failed to parse (like timeouts).
    #[error("[Cortex Service] invalid number in {var}: {reason}")]
    InvalidNumber {
        /// Variable name (e.g., `SNOWFLAKE_TIMEOUT_SECS`).
        var: &'static str,
        /// Human-readable reason (e.g., `expected u64`).
        reason: &'static str,
    },

    /// Value had the wrong format (e.g., invalid URL).
    #[error("[Cortex Service] invalid format in {var}: {reason}")]
    InvalidFormat {
        /// Variable name (e.g., `SNOWFLAKE_ACCOUNT_URL`).
        var: &'static str,
        /// Explanation (e.g., `must start with http:// or https://`).
        reason: &'static str,
    },

    /// Unsupported value in `SNOWFLAKE_TOKEN_TYPE`.
    #[error("[Cortex Service] unsupported token type: {0}")]
    UnsupportedTokenType(String),

    /// A table, stage or service name is not a plain (optionally qualified) identifier.
    #[error("[Cortex Service] invalid SQL identifier: {0:?}")]
    InvalidIdentifier(String),
}

/* ------------------------------------------------------------------------- */
/* Upstream errors                                                           */
/* ------------------------------------------------------------------------- */

/// Error enum for platform responses.
///
/// Used by every service to represent protocol and decoding problems in a
/// uniform way. None of these are retried.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Upstream returned a non-successful HTTP status.
    #[error("[Cortex Service] HTTP {status} from {url}: {snippet}")]
    HttpStatus {
        /// Numeric HTTP status code.
        status: StatusCode,
        /// Request URL.
        url: String,
        /// Short snippet of the response body (trimmed).
        snippet: String,
    },

    /// Response payload could not be decoded as expected.
    #[error("[Cortex Service] decode error: {0}")]
    Decode(String),

    /// SQL statement was rejected or did not finish synchronously.
    #[error("[Cortex Service] statement failed ({code}): {message}")]
    Statement {
        /// Snowflake error code (e.g., `002003`).
        code: String,
        /// Message returned by the statements API.
        message: String,
    },

    /// The requested stage file does not exist.
    #[error("[Cortex Service] document not found: {0}")]
    DocumentNotFound(String),
}

/// Trims a response body to a short, log-friendly snippet.
pub(crate) fn make_snippet(text: &str) -> String {
    text.chars().take(240).collect()
}

/* ------------------------------------------------------------------------- */
/* Env helpers (return unified `Result<T>`)                                  */
/* ------------------------------------------------------------------------- */

/// Fetches a required, non-empty environment variable.
///
/// # Errors
/// Returns [`CortexError::Config`] with [`ConfigError::MissingVar`] if the
/// variable is absent or empty.
pub fn must_env(name: &'static str) -> Result<String> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConfigError::MissingVar(name).into()),
    }
}

/// Fetches an optional environment variable (`None` if unset/empty).
pub fn env_opt(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Fetches an environment variable or falls back to `dflt`.
pub fn env_or(name: &str, dflt: &str) -> String {
    env_opt(name).unwrap_or_else(|| dflt.to_string())
}

/// Parses an optional `u64` from env (`Ok(None)` if unset/empty).
///
/// # Errors
/// Returns [`CortexError::Config`] with [`ConfigError::InvalidNumber`] if the
/// variable is set but not a valid `u64`.
pub fn env_opt_u64(name: &'static str) -> Result<Option<u64>> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => v.trim().parse::<u64>().map(Some).map_err(|_| {
            CortexError::from(ConfigError::InvalidNumber {
                var: name,
                reason: "expected u64",
            })
        }),
        _ => Ok(None),
    }
}

/* ------------------------------------------------------------------------- */
/* Validation helpers (return unified `Result<T>`)                           */
/* ------------------------------------------------------------------------- */

/// Validates that an HTTP endpoint starts with `http://` or `https://`.
///
/// # Errors
/// Returns [`CortexError::Config`] with [`ConfigError::InvalidFormat`] when
/// the string does not start with a valid HTTP scheme.
pub fn validate_http_endpoint(var: &'static str, value: &str) -> Result<()> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::InvalidFormat {
            var,
            reason: "must start with http:// or https://",
        }
        .into())
    }
}

/// Validates a plain or dot-qualified SQL identifier (`DB.SCHEMA.TABLE`).
///
/// Each part must start with a letter or `_` and continue with letters,
/// digits, `_` or `$`. Quoted identifiers are not accepted because the value
/// is interpolated into statement text.
///
/// # Errors
/// Returns [`ConfigError::InvalidIdentifier`] for anything else.
pub fn validate_identifier(value: &str) -> Result<()> {
    let ok = !value.is_empty()
        && value.split('.').all(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(c) if c.is_ascii_alphabetic() || c == '_' => {
                    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
                }
                _ => false,
            }
        });
    if ok {
        Ok(())
    } else {
        Err(ConfigError::InvalidIdentifier(value.to_string()).into())
    }
}

/// Validates a stage reference such as `@DB.SCHEMA.STAGE`.
///
/// # Errors
/// Returns [`ConfigError::InvalidIdentifier`] if the `@` prefix is missing or
/// the remainder is not a valid identifier.
pub fn validate_stage(value: &str) -> Result<()> {
    match value.strip_prefix('@') {
        Some(rest) if validate_identifier(rest).is_ok() => Ok(()),
        _ => Err(ConfigError::InvalidIdentifier(value.to_string()).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers_accept_qualified_names() {
        assert!(validate_identifier("TALK_TO_DOC.PUBLIC.qa_table").is_ok());
        assert!(validate_identifier("TEXT_SEARCH_SERVICE").is_ok());
        assert!(validate_identifier("_x$1").is_ok());
    }

    #[test]
    fn identifiers_reject_injection() {
        for bad in ["", "a;drop table x", "1abc", "a..b", "a b", "\"quoted\"", "a.b;"] {
            assert!(validate_identifier(bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn stages_need_at_prefix() {
        assert!(validate_stage("@TALK_TO_DOC.PUBLIC.PDFDOCS").is_ok());
        assert!(validate_stage("TALK_TO_DOC.PUBLIC.PDFDOCS").is_err());
        assert!(validate_stage("@").is_err());
    }

    #[test]
    fn endpoint_scheme_is_checked() {
        assert!(validate_http_endpoint("X", "https://acme.snowflakecomputing.com").is_ok());
        assert!(validate_http_endpoint("X", "acme.snowflakecomputing.com").is_err());
    }

    #[test]
    fn snippet_is_bounded() {
        let long = "x".repeat(1000);
        assert_eq!(make_snippet(&long).len(), 240);
        assert_eq!(make_snippet("short"), "short");
    }

    #[test]
    fn not_found_is_detected() {
        let err = CortexError::from(UpstreamError::DocumentNotFound("a.pdf".into()));
        assert!(err.is_not_found());
        let err = CortexError::from(UpstreamError::Decode("x".into()));
        assert!(!err.is_not_found());
    }
}
