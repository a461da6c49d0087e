use std::str::FromStr;

use crate::error_handler::ConfigError;

/// Kind of bearer token sent to the Snowflake REST APIs.
///
/// The value travels in the `X-Snowflake-Authorization-Token-Type` header so
/// the platform knows how to validate the `Authorization: Bearer` value.
///
/// # Examples
///
/// ```
/// use cortex_service::config::token_type::TokenType;
///
/// let t: TokenType = "keypair_jwt".parse().unwrap();
/// assert_eq!(t.header_value(), "KEYPAIR_JWT");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TokenType {
    /// Programmatic access token created for a user.
    #[default]
    ProgrammaticAccessToken,
    /// JWT signed with the user's key pair.
    KeypairJwt,
    /// OAuth access token.
    OAuth,
}

impl TokenType {
    /// Header value understood by the platform.
    pub fn header_value(self) -> &'static str {
        match self {
            TokenType::ProgrammaticAccessToken => "PROGRAMMATIC_ACCESS_TOKEN",
            TokenType::KeypairJwt => "KEYPAIR_JWT",
            TokenType::OAuth => "OAUTH",
        }
    }
}

impl FromStr for TokenType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PROGRAMMATIC_ACCESS_TOKEN" | "PAT" => Ok(TokenType::ProgrammaticAccessToken),
            "KEYPAIR_JWT" | "JWT" => Ok(TokenType::KeypairJwt),
            "OAUTH" => Ok(TokenType::OAuth),
            other => Err(ConfigError::UnsupportedTokenType(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_aliases_case_insensitively() {
        assert_eq!("pat".parse::<TokenType>().unwrap(), TokenType::ProgrammaticAccessToken);
        assert_eq!(" oauth ".parse::<TokenType>().unwrap(), TokenType::OAuth);
        assert_eq!("Jwt".parse::<TokenType>().unwrap(), TokenType::KeypairJwt);
    }

    #[test]
    fn rejects_unknown() {
        assert!(matches!(
            "basic".parse::<TokenType>(),
            Err(ConfigError::UnsupportedTokenType(v)) if v == "BASIC"
        ));
    }
}
