//! Saving the current answer and previewing its source documents.

use chrono::Utc;
use tracing::{debug, info, instrument};

use crate::api_types::{SaveOverrides, SavedQa};
use crate::chat::DocChat;
use crate::error::{ChatError, ChatResult};
use crate::platform::DocPlatform;
use crate::references::distinct_sources;
use crate::state::SessionState;
use crate::text::dedent;

/// Builds the record to persist for the current answer.
///
/// Question and answer default to the last turn; non-blank overrides replace
/// them. Both are dedented and trimmed. Source metadata comes from the first
/// retrieved chunk.
///
/// # Errors
/// [`ChatError::NothingToSave`] when no answer has been generated yet.
pub fn prepare_save(state: &SessionState, overrides: &SaveOverrides, user: &str) -> ChatResult<SavedQa> {
    if !state.has_answer() {
        return Err(ChatError::NothingToSave);
    }

    let pick = |over: &Option<String>, dflt: &str| {
        let raw = over
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(dflt);
        dedent(raw).trim().to_string()
    };

    let first = state.results.first();
    Ok(SavedQa {
        question: pick(&overrides.question, &state.last_question),
        answer: pick(&overrides.answer, &state.generated_response),
        source_url: first.and_then(|c| c.source_url.clone()),
        chunk_text: first.map(|c| c.text.clone()),
        language: first.and_then(|c| c.language.clone()),
        meta_info: first.and_then(|c| c.meta_info.clone()),
        source_document_id: first.map(|c| c.source_document_id.clone()),
        user: user.to_string(),
        timestamp: Utc::now(),
    })
}

/// Distinct source documents of the current answer, first-seen order.
pub fn documents(state: &SessionState) -> Vec<String> {
    distinct_sources(&state.results)
}

impl<P: DocPlatform> DocChat<P> {
    /// Persists the current Q/A once and returns the stored record.
    ///
    /// The session state is not modified.
    ///
    /// # Errors
    /// [`ChatError::NothingToSave`] or the platform's persistence error.
    #[instrument(skip_all, fields(user = %user))]
    pub async fn save_answer(
        &self,
        state: &SessionState,
        overrides: &SaveOverrides,
        user: &str,
    ) -> ChatResult<SavedQa> {
        let user = if user.trim().is_empty() {
            self.config().default_user.as_str()
        } else {
            user
        };
        let record = prepare_save(state, overrides, user)?;
        self.platform().append(&record).await?;
        info!(
            table = %self.config().qa_table,
            source = record.source_document_id.as_deref().unwrap_or("-"),
            "Q/A saved"
        );
        Ok(record)
    }

    /// Raw bytes of a document cited by the current answer.
    ///
    /// Returns the next state with `pdf_filename` set to `doc_id`.
    ///
    /// # Errors
    /// [`ChatError::DocumentNotInResults`] for ids outside the current
    /// references, or the platform's fetch error (not-found included).
    #[instrument(skip(self, state))]
    pub async fn preview_document(
        &self,
        state: &SessionState,
        doc_id: &str,
    ) -> ChatResult<(SessionState, Vec<u8>)> {
        if !documents(state).iter().any(|d| d == doc_id) {
            return Err(ChatError::DocumentNotInResults(doc_id.to_string()));
        }
        let bytes = self.platform().fetch_document(doc_id).await?;
        debug!(bytes = bytes.len(), "document fetched");

        let mut next = state.clone();
        next.pdf_filename = Some(doc_id.to_string());
        Ok((next, bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cfg::ChatConfig;
    use crate::testing::{FakePlatform, chunk};

    fn answered() -> SessionState {
        let mut s = SessionState::default();
        s.last_question = "  What is Arctic-TILT?\n".into();
        s.generated_response = "\n    Arctic-TILT reads documents.\n      It is small.\n".into();
        s.results = vec![chunk("first passage", "tilt.pdf"), chunk("second", "other.pdf")];
        s
    }

    async fn engine(fake: FakePlatform) -> DocChat<FakePlatform> {
        DocChat::discover(fake, ChatConfig::default()).await.unwrap()
    }

    #[test]
    fn defaults_are_dedented_and_trimmed() {
        let rec = prepare_save(&answered(), &SaveOverrides::default(), "ana").unwrap();
        assert_eq!(rec.question, "What is Arctic-TILT?");
        assert_eq!(rec.answer, "Arctic-TILT reads documents.\n  It is small.");
        assert_eq!(rec.user, "ana");
    }

    #[test]
    fn metadata_comes_from_first_chunk() {
        let rec = prepare_save(&answered(), &SaveOverrides::default(), "u").unwrap();
        assert_eq!(rec.source_document_id.as_deref(), Some("tilt.pdf"));
        assert_eq!(rec.chunk_text.as_deref(), Some("first passage"));
        assert_eq!(rec.language.as_deref(), Some("English"));
        assert_eq!(rec.source_url.as_deref(), Some("https://stage.example/tilt.pdf"));
    }

    #[test]
    fn overrides_replace_defaults() {
        let over = SaveOverrides {
            question: Some("Edited question".into()),
            answer: Some("   ".into()),
        };
        let rec = prepare_save(&answered(), &over, "u").unwrap();
        assert_eq!(rec.question, "Edited question");
        assert!(rec.answer.starts_with("Arctic-TILT"));
    }

    #[test]
    fn nothing_to_save_without_answer() {
        let err = prepare_save(&SessionState::default(), &SaveOverrides::default(), "u").unwrap_err();
        assert!(matches!(err, ChatError::NothingToSave));
    }

    #[tokio::test]
    async fn save_appends_once_and_keeps_state() {
        let chat = engine(FakePlatform::new()).await;
        let state = answered();

        let rec = chat.save_answer(&state, &SaveOverrides::default(), "").await.unwrap();
        assert_eq!(rec.user, "anonymous");
        assert_eq!(chat.platform().appended(), vec![rec]);
        assert_eq!(state, answered());
    }

    #[tokio::test]
    async fn failed_save_is_reported() {
        let chat = engine(FakePlatform::new().failing_append("table locked")).await;
        let err = chat
            .save_answer(&answered(), &SaveOverrides::default(), "u")
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::Platform(_)));
        assert!(chat.platform().appended().is_empty());
    }

    #[tokio::test]
    async fn preview_only_serves_current_references() {
        let fake = FakePlatform::new().with_document("tilt.pdf", b"%PDF-1.7");
        let chat = engine(fake).await;
        let state = answered();

        let (next, bytes) = chat.preview_document(&state, "tilt.pdf").await.unwrap();
        assert_eq!(bytes, b"%PDF-1.7");
        assert_eq!(next.pdf_filename.as_deref(), Some("tilt.pdf"));

        let err = chat.preview_document(&state, "secret.pdf").await.unwrap_err();
        assert!(matches!(err, ChatError::DocumentNotInResults(d) if d == "secret.pdf"));
        assert_eq!(chat.platform().fetch_calls(), ["tilt.pdf"]);
    }

    #[tokio::test]
    async fn missing_stage_file_is_not_found() {
        let chat = engine(FakePlatform::new()).await;
        let err = chat.preview_document(&answered(), "other.pdf").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn documents_are_distinct() {
        let mut s = answered();
        s.results.push(chunk("again", "tilt.pdf"));
        assert_eq!(documents(&s), ["tilt.pdf", "other.pdf"]);
    }
}
