use doc_chat::TurnInput;
use serde::Deserialize;

/// Request payload for POST /sessions/{id}/ask.
#[derive(Debug, Default, Deserialize)]
pub struct AskRequest {
    /// Free-text question; wins when non-blank.
    #[serde(default)]
    pub question: Option<String>,
    /// Question picked from the catalog's example list.
    #[serde(default)]
    pub selected_question: Option<String>,
}

impl From<AskRequest> for TurnInput {
    fn from(r: AskRequest) -> Self {
        TurnInput {
            typed_question: r.question,
            selected_question: r.selected_question,
        }
    }
}
