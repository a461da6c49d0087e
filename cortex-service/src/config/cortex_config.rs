use crate::config::token_type::TokenType;

/// Connection settings for one Snowflake account.
///
/// # Fields
///
/// - `account_url`: base URL, e.g. `https://acme-xy123.snowflakecomputing.com`.
/// - `token` / `token_type`: bearer credentials and their kind.
/// - `database` / `schema`: namespace of the search services and the
///   default namespace of SQL statements.
/// - `warehouse` / `role`: optional execution context for SQL statements.
/// - `timeout_secs`: per-request HTTP timeout.
///
/// # Examples
///
/// ```
/// use cortex_service::config::cortex_config::CortexConfig;
/// use cortex_service::config::token_type::TokenType;
///
/// let cfg = CortexConfig {
///     account_url: "https://acme.snowflakecomputing.com".into(),
///     token: "secret".into(),
///     token_type: TokenType::ProgrammaticAccessToken,
///     database: "TALK_TO_DOC".into(),
///     schema: "PUBLIC".into(),
///     warehouse: None,
///     role: None,
///     timeout_secs: Some(120),
/// };
/// assert_eq!(cfg.base_url(), "https://acme.snowflakecomputing.com");
/// ```
#[derive(Clone)]
pub struct CortexConfig {
    pub account_url: String,
    pub token: String,
    pub token_type: TokenType,
    pub database: String,
    pub schema: String,
    pub warehouse: Option<String>,
    pub role: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl CortexConfig {
    /// Account URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.account_url.trim().trim_end_matches('/')
    }
}

// Hand-written so the token never ends up in logs.
impl std::fmt::Debug for CortexConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CortexConfig")
            .field("account_url", &self.account_url)
            .field("token", &"***")
            .field("token_type", &self.token_type)
            .field("database", &self.database)
            .field("schema", &self.schema)
            .field("warehouse", &self.warehouse)
            .field("role", &self.role)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> CortexConfig {
        CortexConfig {
            account_url: "https://acme.snowflakecomputing.com/".into(),
            token: "top-secret".into(),
            token_type: TokenType::OAuth,
            database: "DB".into(),
            schema: "S".into(),
            warehouse: Some("WH".into()),
            role: None,
            timeout_secs: None,
        }
    }

    #[test]
    fn base_url_drops_trailing_slash() {
        assert_eq!(cfg().base_url(), "https://acme.snowflakecomputing.com");
    }

    #[test]
    fn debug_hides_token() {
        let out = format!("{:?}", cfg());
        assert!(!out.contains("top-secret"));
        assert!(out.contains("***"));
    }
}
