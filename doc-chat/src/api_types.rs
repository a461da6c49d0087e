//! Public API types re-used by external crates (e.g., the HTTP API layer).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A passage returned by the search collaborator. Never mutated after retrieval.
///
/// # Example
/// ```
/// use doc_chat::RetrievedChunk;
/// let c = RetrievedChunk {
///     text: "Arctic-Embed is a family of text embedding models.".into(),
///     source_document_id: "arctic/embed.pdf".into(),
///     source_url: None,
///     language: Some("English".into()),
///     meta_info: None,
/// };
/// assert!(!c.text.is_empty());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrievedChunk {
    pub text: String,
    /// Path of the document inside the stage (`relative_path`).
    pub source_document_id: String,
    pub source_url: Option<String>,
    pub language: Option<String>,
    pub meta_info: Option<String>,
}

/// Who wrote a history entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One conversation history entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Parameters of one similarity query.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SearchOptions {
    /// Search service name.
    pub service: String,
    /// Column holding the passage text when `chunk` is not returned.
    pub text_column: String,
    /// Columns to request.
    pub columns: Vec<String>,
    /// Maximum number of passages.
    pub limit: usize,
    /// Optional service-side filter, passed through verbatim.
    pub filter: Option<Value>,
}

/// A question/answer pair appended to the persistence table.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SavedQa {
    pub question: String,
    pub answer: String,
    pub source_url: Option<String>,
    pub chunk_text: Option<String>,
    pub language: Option<String>,
    pub meta_info: Option<String>,
    pub source_document_id: Option<String>,
    pub user: String,
    /// When the save was requested; the table stamps its own `CREATED_AT`.
    pub timestamp: DateTime<Utc>,
}

/// What the user submitted in one turn.
///
/// # Example
/// ```
/// use doc_chat::TurnInput;
/// let input = TurnInput {
///     typed_question: Some("   ".into()),
///     selected_question: Some("What is Snowflake's Arctic-Embed model?".into()),
/// };
/// assert_eq!(input.question(), Some("What is Snowflake's Arctic-Embed model?"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct TurnInput {
    /// Free-text question; wins when non-blank.
    #[serde(default)]
    pub typed_question: Option<String>,
    /// Question picked from the example catalog.
    #[serde(default)]
    pub selected_question: Option<String>,
}

impl TurnInput {
    /// Question to process: typed text if non-blank, otherwise the selection.
    pub fn question(&self) -> Option<&str> {
        fn non_blank(s: &Option<String>) -> Option<&str> {
            s.as_deref().filter(|q| !q.trim().is_empty())
        }
        non_blank(&self.typed_question).or_else(|| non_blank(&self.selected_question))
    }
}

/// User edits applied on top of the generated Q/A before saving.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct SaveOverrides {
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub answer: Option<String>,
}

/// Everything a front end needs to display the result of a turn.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RenderModel {
    /// Processed question; `None` when the turn had nothing to do.
    pub question: Option<String>,
    /// Raw generated answer (empty when no completion happened).
    pub answer: String,
    /// Answer with `$` escaped, followed by the references table.
    pub answer_markdown: String,
    /// Distinct source documents, first-seen order.
    pub references: Vec<String>,
    pub references_markdown: String,
    /// Degraded-state explanation (e.g. nothing matched).
    pub notice: Option<String>,
}
