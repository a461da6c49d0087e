//! Default platform config loaded strictly from environment variables.
//!
//! # Environment variables
//!
//! - `SNOWFLAKE_ACCOUNT_URL`  = account base URL (mandatory)
//! - `SNOWFLAKE_TOKEN`        = bearer token (mandatory)
//! - `SNOWFLAKE_TOKEN_TYPE`   = `PROGRAMMATIC_ACCESS_TOKEN` (default), `KEYPAIR_JWT`, `OAUTH`
//! - `SNOWFLAKE_DATABASE`     = database of the search services (default `TALK_TO_DOC`)
//! - `SNOWFLAKE_SCHEMA`       = schema of the search services (default `PUBLIC`)
//! - `SNOWFLAKE_WAREHOUSE`    = optional warehouse for SQL statements
//! - `SNOWFLAKE_ROLE`         = optional role for SQL statements
//! - `SNOWFLAKE_TIMEOUT_SECS` = optional HTTP timeout (default 120)

use crate::{
    config::{cortex_config::CortexConfig, token_type::TokenType},
    error_handler::{
        CortexError, env_opt, env_opt_u64, env_or, must_env, validate_http_endpoint,
        validate_identifier,
    },
};

/// Default request timeout when `SNOWFLAKE_TIMEOUT_SECS` is not set.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Builds a [`CortexConfig`] from the process environment.
///
/// # Errors
///
/// - [`ConfigError::MissingVar`](crate::error_handler::ConfigError::MissingVar) for a missing URL or token
/// - [`ConfigError::InvalidFormat`](crate::error_handler::ConfigError::InvalidFormat) for a non-HTTP URL
/// - [`ConfigError::InvalidNumber`](crate::error_handler::ConfigError::InvalidNumber) for a bad timeout
/// - [`ConfigError::InvalidIdentifier`](crate::error_handler::ConfigError::InvalidIdentifier) for a bad database/schema
pub fn config_from_env() -> Result<CortexConfig, CortexError> {
    let account_url = must_env("SNOWFLAKE_ACCOUNT_URL")?;
    validate_http_endpoint("SNOWFLAKE_ACCOUNT_URL", account_url.trim())?;

    let token = must_env("SNOWFLAKE_TOKEN")?;
    let token_type = match env_opt("SNOWFLAKE_TOKEN_TYPE") {
        Some(v) => v.parse::<TokenType>()?,
        None => TokenType::default(),
    };

    let database = env_or("SNOWFLAKE_DATABASE", "TALK_TO_DOC");
    let schema = env_or("SNOWFLAKE_SCHEMA", "PUBLIC");
    validate_identifier(&database)?;
    validate_identifier(&schema)?;

    let timeout_secs = env_opt_u64("SNOWFLAKE_TIMEOUT_SECS")?.or(Some(DEFAULT_TIMEOUT_SECS));

    Ok(CortexConfig {
        account_url,
        token,
        token_type,
        database,
        schema,
        warehouse: env_opt("SNOWFLAKE_WAREHOUSE"),
        role: env_opt("SNOWFLAKE_ROLE"),
        timeout_secs,
    })
}
