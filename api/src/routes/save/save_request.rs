use doc_chat::SaveOverrides;
use serde::Deserialize;

/// Request payload for POST /sessions/{id}/save. Omitted fields use the last turn.
#[derive(Debug, Default, Deserialize)]
pub struct SaveRequest {
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub answer: Option<String>,
}

impl From<SaveRequest> for SaveOverrides {
    fn from(r: SaveRequest) -> Self {
        SaveOverrides {
            question: r.question,
            answer: r.answer,
        }
    }
}
