//! Conversational Q/A over a document corpus.
//!
//! A turn takes the session's [`SessionState`] and the user's input,
//! retrieves passages through a [`DocPlatform`], packs them into a prompt,
//! asks the completion model and returns the next state together with a
//! [`RenderModel`]. Saving an answer and previewing a cited document are
//! separate actions on the same engine.
//!
//! # Example
//! ```no_run
//! # use doc_chat::{ChatConfig, CortexPlatform, DocChat, SessionState, TurnInput};
//! # use cortex_service::{CortexService, config::default_config::config_from_env};
//! # #[tokio::main] async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let cfg = ChatConfig::from_env()?;
//! let platform = CortexPlatform::new(CortexService::new(config_from_env()?)?, &cfg);
//! let chat = DocChat::discover(platform, cfg).await?;
//!
//! let input = TurnInput {
//!     typed_question: Some("What is Snowflake's Arctic-Embed model?".into()),
//!     selected_question: None,
//! };
//! let (state, render) = chat.handle_turn(&SessionState::default(), &input).await?;
//! println!("{}", render.answer_markdown);
//! # let _ = state;
//! # Ok(()) }
//! ```

mod api_types;
mod cfg;
mod chat;
mod error;
mod history;
mod retrieve;
mod save;
mod state;
mod turn;

pub mod catalog;
pub mod llm;
pub mod platform;
pub mod prompt;
pub mod references;
pub mod text;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use api_types::{
    ChatMessage, RenderModel, RetrievedChunk, Role, SaveOverrides, SavedQa, SearchOptions,
    TurnInput,
};
pub use catalog::{EXAMPLE_QUESTIONS, MODELS, ServiceCatalog};
pub use cfg::ChatConfig;
pub use chat::DocChat;
pub use error::{ChatError, ChatResult};
pub use history::{ConversationHistory, DEFAULT_HISTORY_CAPACITY};
pub use llm::CompletionCache;
pub use platform::{CortexPlatform, DocPlatform};
pub use save::{documents, prepare_save};
pub use state::{DEFAULT_RETRIEVED_CHUNKS, SessionState};
pub use turn::NO_PASSAGES_NOTICE;
