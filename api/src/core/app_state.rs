use doc_chat::{DocChat, DocPlatform};

use crate::core::session_store::SessionStore;

/// Shared state for all HTTP handlers.
///
/// One chat engine for the process, one isolated state per session.
pub struct AppState<P> {
    /// Platform, config, discovered services and completion cache.
    pub chat: DocChat<P>,
    /// Live sessions keyed by id.
    pub sessions: SessionStore,
}

impl<P: DocPlatform> AppState<P> {
    pub fn new(chat: DocChat<P>) -> Self {
        Self::with_sessions(chat, SessionStore::default())
    }

    pub fn with_sessions(chat: DocChat<P>, sessions: SessionStore) -> Self {
        Self { chat, sessions }
    }

    /// User recorded for a new session: the given name or the configured fallback.
    pub fn user_or_default(&self, user: Option<&str>) -> String {
        user.map(str::trim)
            .filter(|u| !u.is_empty())
            .unwrap_or(&self.chat.config().default_user)
            .to_string()
    }
}
