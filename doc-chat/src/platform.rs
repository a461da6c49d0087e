//! External collaborators behind one trait, plus the Cortex-backed implementation.
//!
//! The core never talks HTTP itself: search, completion, document fetch and
//! persistence all go through [`DocPlatform`], so tests can swap in a double.
//! Methods return `Send` futures and are used through generics (no boxing).

use std::future::Future;

use cortex_service::{CortexService, QaRow, SearchServiceInfo};
use tracing::debug;

use crate::api_types::{RetrievedChunk, SavedQa, SearchOptions};
use crate::cfg::ChatConfig;
use crate::error::ChatResult;
use crate::retrieve::chunk_from_row;

/// Search, completion, document and persistence collaborators.
///
/// Every failure is propagated as-is; implementations must not retry.
pub trait DocPlatform: Send + Sync {
    /// Similarity query; relevance-ranked, empty on no match.
    fn search(
        &self,
        query: &str,
        opts: &SearchOptions,
    ) -> impl Future<Output = ChatResult<Vec<RetrievedChunk>>> + Send;

    /// Generates an answer for `prompt` with `model`.
    fn complete(&self, model: &str, prompt: &str)
    -> impl Future<Output = ChatResult<String>> + Send;

    /// Raw bytes of a source document.
    fn fetch_document(&self, id: &str) -> impl Future<Output = ChatResult<Vec<u8>>> + Send;

    /// Appends one saved Q/A record.
    fn append(&self, record: &SavedQa) -> impl Future<Output = ChatResult<()>> + Send;

    /// Search services available to the session.
    fn list_search_services(
        &self,
    ) -> impl Future<Output = ChatResult<Vec<SearchServiceInfo>>> + Send;
}

/// [`DocPlatform`] over Snowflake Cortex.
#[derive(Clone)]
pub struct CortexPlatform {
    svc: CortexService,
    doc_stage: String,
    qa_table: String,
}

impl CortexPlatform {
    pub fn new(svc: CortexService, cfg: &ChatConfig) -> Self {
        Self {
            svc,
            doc_stage: cfg.doc_stage.clone(),
            qa_table: cfg.qa_table.clone(),
        }
    }
}

impl DocPlatform for CortexPlatform {
    async fn search(&self, query: &str, opts: &SearchOptions) -> ChatResult<Vec<RetrievedChunk>> {
        let columns: Vec<&str> = opts.columns.iter().map(String::as_str).collect();
        let rows = self
            .svc
            .search(&opts.service, query, &columns, opts.limit, opts.filter.as_ref())
            .await?;
        debug!(rows = rows.len(), "cortex search rows");
        Ok(rows
            .iter()
            .map(|r| chunk_from_row(r, &opts.text_column))
            .collect())
    }

    async fn complete(&self, model: &str, prompt: &str) -> ChatResult<String> {
        Ok(self.svc.complete(model, prompt).await?)
    }

    async fn fetch_document(&self, id: &str) -> ChatResult<Vec<u8>> {
        Ok(self.svc.download_stage_file(&self.doc_stage, id).await?)
    }

    async fn append(&self, record: &SavedQa) -> ChatResult<()> {
        let row = QaRow {
            question: &record.question,
            answer: &record.answer,
            file_url: record.source_url.as_deref(),
            chunk: record.chunk_text.as_deref(),
            language: record.language.as_deref(),
            meta_info: record.meta_info.as_deref(),
            relative_path: record.source_document_id.as_deref(),
            username: &record.user,
        };
        Ok(self.svc.append_qa_row(&self.qa_table, &row).await?)
    }

    async fn list_search_services(&self) -> ChatResult<Vec<SearchServiceInfo>> {
        Ok(self.svc.list_search_services().await?)
    }
}
