//! One thin client per platform API, sharing a single authenticated transport.

pub mod complete_service;
pub mod qa_table_service;
pub mod search_service;
pub mod sql_service;
pub mod stage_service;
pub mod transport;

#[cfg(test)]
pub(crate) mod test_support {
    use crate::config::{cortex_config::CortexConfig, token_type::TokenType};

    /// Config pointing at a local mock server.
    pub fn config_for(uri: &str) -> CortexConfig {
        CortexConfig {
            account_url: uri.to_string(),
            token: "test-token".into(),
            token_type: TokenType::ProgrammaticAccessToken,
            database: "TALK_TO_DOC".into(),
            schema: "PUBLIC".into(),
            warehouse: Some("COMPUTE_WH".into()),
            role: None,
            timeout_secs: Some(5),
        }
    }
}
