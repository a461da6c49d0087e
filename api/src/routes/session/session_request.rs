use serde::Deserialize;

/// Request payload for POST /sessions.
#[derive(Debug, Default, Deserialize)]
pub struct CreateSessionRequest {
    /// Name stored with saved answers; the configured default when omitted.
    #[serde(default)]
    pub user: Option<String>,
}

/// Request payload for PATCH /sessions/{id}/options. Omitted fields stay as they are.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateOptionsRequest {
    #[serde(default)]
    pub model_name: Option<String>,
    #[serde(default)]
    pub num_retrieved_chunks: Option<usize>,
    #[serde(default)]
    pub num_chat_messages: Option<usize>,
    #[serde(default)]
    pub use_chat_history: Option<bool>,
    #[serde(default)]
    pub use_customized_qa_model: Option<bool>,
    #[serde(default)]
    pub search_service: Option<String>,
}
