//! Typed error for the doc-chat crate.

use cortex_service::{ConfigError, CortexError};
use thiserror::Error;

/// Convenient alias for crate-wide results.
pub type ChatResult<T> = Result<T, ChatError>;

#[derive(Debug, Error)]
pub enum ChatError {
    /// Errors from the platform client (config, transport, upstream).
    #[error(transparent)]
    Cortex(#[from] CortexError),

    /// Failure reported by a non-Cortex `DocPlatform` implementation.
    #[error("platform error: {0}")]
    Platform(String),

    /// No search service was discovered, so questions cannot be answered.
    #[error("no search service is configured")]
    NoSearchService,

    /// The session picked a service that is not in the catalog.
    #[error("unknown search service: {0}")]
    UnknownSearchService(String),

    /// Save requested before any answer was generated.
    #[error("there is no generated answer to save")]
    NothingToSave,

    /// Preview requested for a document the current answer does not cite.
    #[error("document {0:?} is not among the current references")]
    DocumentNotInResults(String),
}

impl From<ConfigError> for ChatError {
    fn from(err: ConfigError) -> Self {
        ChatError::Cortex(err.into())
    }
}

impl ChatError {
    /// `true` when the platform reported a missing document.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ChatError::Cortex(e) if e.is_not_found())
    }
}
