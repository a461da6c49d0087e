//! Per-session state: user options, the last answer and the transcript.

use serde::Serialize;

use crate::api_types::RetrievedChunk;
use crate::catalog::MODELS;
use crate::cfg::ChatConfig;
use crate::history::{ConversationHistory, DEFAULT_HISTORY_CAPACITY};

/// Default number of passages retrieved per question.
pub const DEFAULT_RETRIEVED_CHUNKS: usize = 5;

/// Everything one conversation owns. Sessions never share an instance.
///
/// The turn handler never mutates a state in place: it returns a new one,
/// so a failed turn leaves the caller's copy untouched.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SessionState {
    pub model_name: String,
    pub num_retrieved_chunks: usize,
    pub num_chat_messages: usize,
    pub use_chat_history: bool,
    pub use_customized_qa_model: bool,
    /// Explicit search-service choice; `None` means the catalog default.
    pub search_service: Option<String>,
    pub generated_response: String,
    pub results: Vec<RetrievedChunk>,
    pub last_question: String,
    /// Document last opened in the preview.
    pub pdf_filename: Option<String>,
    pub messages: ConversationHistory,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            model_name: MODELS[0].to_string(),
            num_retrieved_chunks: DEFAULT_RETRIEVED_CHUNKS,
            num_chat_messages: DEFAULT_HISTORY_CAPACITY,
            use_chat_history: true,
            use_customized_qa_model: false,
            search_service: None,
            generated_response: String::new(),
            results: Vec::new(),
            last_question: String::new(),
            pdf_filename: None,
            messages: ConversationHistory::new(DEFAULT_HISTORY_CAPACITY),
        }
    }
}

impl SessionState {
    /// Restores every field to its default, transcript included.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Sets the history length and resizes the transcript to match.
    pub fn set_num_chat_messages(&mut self, n: usize) {
        self.num_chat_messages = n;
        self.messages.set_capacity(n);
    }

    /// Model used for completions: the custom model while the override is on.
    pub fn effective_model<'a>(&'a self, cfg: &'a ChatConfig) -> &'a str {
        if self.use_customized_qa_model {
            &cfg.custom_qa_model
        } else {
            &self.model_name
        }
    }

    /// Whether an answer is available for saving or preview.
    pub fn has_answer(&self) -> bool {
        !self.generated_response.is_empty()
    }
}
