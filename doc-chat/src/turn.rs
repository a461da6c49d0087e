//! One question/answer turn.

use tracing::{debug, instrument};

use crate::api_types::{ChatMessage, RenderModel, SearchOptions, TurnInput};
use crate::catalog::SEARCH_COLUMNS;
use crate::chat::DocChat;
use crate::error::ChatResult;
use crate::platform::DocPlatform;
use crate::prompt::generate_prompt;
use crate::references::{distinct_sources, references_markdown};
use crate::state::SessionState;
use crate::text::escape_dollars;

/// Shown when the search returned nothing to build a prompt from.
pub const NO_PASSAGES_NOTICE: &str =
    "No relevant passages were found for this question; try rephrasing it or picking another search service.";

impl<P: DocPlatform> DocChat<P> {
    /// Runs one turn against `state` and returns the next state and what to render.
    ///
    /// A blank question returns the state unchanged without calling anything.
    /// Any collaborator failure returns `Err` and nothing is committed.
    ///
    /// # Errors
    /// [`crate::ChatError::NoSearchService`] / `UnknownSearchService` when no
    /// service resolves, or the platform's search / completion error.
    #[instrument(skip_all, fields(model = %state.effective_model(self.config())))]
    pub async fn handle_turn(
        &self,
        state: &SessionState,
        input: &TurnInput,
    ) -> ChatResult<(SessionState, RenderModel)> {
        let Some(question) = input.question() else {
            debug!("blank question, nothing to do");
            return Ok((state.clone(), RenderModel::default()));
        };

        let service = self.catalog().resolve(state.search_service.as_deref())?;
        let opts = SearchOptions {
            service: service.name.clone(),
            text_column: service.search_column.clone(),
            columns: SEARCH_COLUMNS.iter().map(|c| c.to_string()).collect(),
            limit: state.num_retrieved_chunks,
            filter: None,
        };
        let chunks = self.platform().search(question, &opts).await?;
        debug!(service = %opts.service, hits = chunks.len(), "search done");

        let (answer, notice) =
            match generate_prompt(question, &chunks, self.config().max_context_chars) {
                Some(prompt) => {
                    debug!(prompt_chars = prompt.chars().count(), "prompt built");
                    let model = state.effective_model(self.config());
                    let answer = self.cache().get_or_complete(self.platform(), model, &prompt).await?;
                    debug!(answer_chars = answer.chars().count(), "completion done");
                    (answer, None)
                }
                None => {
                    debug!("no passages, completion skipped");
                    (String::new(), Some(NO_PASSAGES_NOTICE.to_string()))
                }
            };

        let references = distinct_sources(&chunks);
        let references_md = references_markdown(&references);

        let mut next = state.clone();
        if next.use_chat_history {
            next.messages.push(ChatMessage::user(question));
            if !answer.is_empty() {
                next.messages.push(ChatMessage::assistant(answer.clone()));
            }
        }
        next.generated_response = answer.clone();
        next.results = chunks;
        next.last_question = question.to_string();
        next.pdf_filename = None;

        let answer_markdown = match (answer.is_empty(), references_md.is_empty()) {
            (_, true) => escape_dollars(&answer),
            (true, false) => references_md.clone(),
            (false, false) => format!("{}\n\n{references_md}", escape_dollars(&answer)),
        };

        let render = RenderModel {
            question: Some(question.to_string()),
            answer,
            answer_markdown,
            references,
            references_markdown: references_md,
            notice,
        };
        Ok((next, render))
    }
}
