//! Runtime configuration loaded from environment variables.

use cortex_service::ConfigError;
use cortex_service::error_handler::{env_opt_u64, env_or, validate_identifier, validate_stage};

use crate::error::ChatResult;
use crate::prompt::DEFAULT_MAX_CONTEXT_CHARS;

/// Config bag for the chat core. All fields have defaults via `from_env`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatConfig {
    /// Character budget for the assembled prompt context.
    pub max_context_chars: usize,
    /// Fully qualified table receiving saved Q/A pairs.
    pub qa_table: String,
    /// Stage holding the source PDFs (`@DB.SCHEMA.STAGE`).
    pub doc_stage: String,
    /// Search service preferred when a session has not picked one.
    pub default_search_service: String,
    /// Model used for every completion while the custom-model toggle is on.
    pub custom_qa_model: String,
    /// User name recorded with saves when the session did not provide one.
    pub default_user: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            max_context_chars: DEFAULT_MAX_CONTEXT_CHARS,
            qa_table: "TALK_TO_DOC.PUBLIC.qa_table".into(),
            doc_stage: "@TALK_TO_DOC.PUBLIC.PDFDOCS".into(),
            default_search_service: "TEXT_SEARCH_SERVICE".into(),
            custom_qa_model: "customized_QA_model".into(),
            default_user: "anonymous".into(),
        }
    }
}

impl ChatConfig {
    /// Build from environment variables with the defaults above.
    ///
    /// # Errors
    /// A non-numeric or zero `DOC_CHAT_MAX_CONTEXT_CHARS`, or a table/stage
    /// name that is not a plain identifier.
    pub fn from_env() -> ChatResult<Self> {
        let d = Self::default();

        let max_context_chars = match env_opt_u64("DOC_CHAT_MAX_CONTEXT_CHARS")? {
            Some(0) => {
                return Err(ConfigError::InvalidNumber {
                    var: "DOC_CHAT_MAX_CONTEXT_CHARS",
                    reason: "must be greater than zero",
                }
                .into());
            }
            Some(n) => usize::try_from(n).map_err(|_| ConfigError::InvalidNumber {
                var: "DOC_CHAT_MAX_CONTEXT_CHARS",
                reason: "does not fit in usize",
            })?,
            None => d.max_context_chars,
        };

        let cfg = Self {
            max_context_chars,
            qa_table: env_or("DOC_CHAT_QA_TABLE", &d.qa_table),
            doc_stage: env_or("DOC_CHAT_DOC_STAGE", &d.doc_stage),
            default_search_service: env_or(
                "DOC_CHAT_DEFAULT_SEARCH_SERVICE",
                &d.default_search_service,
            ),
            custom_qa_model: env_or("DOC_CHAT_CUSTOM_QA_MODEL", &d.custom_qa_model),
            default_user: env_or("DOC_CHAT_DEFAULT_USER", &d.default_user),
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Checks identifiers that end up interpolated into SQL.
    pub fn validate(&self) -> ChatResult<()> {
        validate_identifier(&self.qa_table)?;
        validate_stage(&self.doc_stage)?;
        validate_identifier(&self.default_search_service)?;
        Ok(())
    }
}
