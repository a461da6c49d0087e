use doc_chat::SessionState;
use serde::Serialize;
use uuid::Uuid;

/// Snapshot of one session.
#[derive(Debug, Serialize)]
pub struct SessionResponse<'a> {
    pub id: Uuid,
    pub user: &'a str,
    pub state: &'a SessionState,
}
