//! In-memory [`DocPlatform`] double for tests.
//!
//! Returns canned chunks, answers and documents, and records every call so
//! tests can assert on what reached the platform.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use cortex_service::{CortexError, SearchServiceInfo, UpstreamError};

use crate::api_types::{RetrievedChunk, SavedQa, SearchOptions};
use crate::error::{ChatError, ChatResult};
use crate::platform::DocPlatform;

#[derive(Default)]
struct Calls {
    search: Vec<(String, SearchOptions)>,
    complete: Vec<(String, String)>,
    fetch: Vec<String>,
    appended: Vec<SavedQa>,
}

/// Configurable fake; build it with the `with_*` / `failing_*` methods.
#[derive(Default)]
pub struct FakePlatform {
    chunks: Vec<RetrievedChunk>,
    answer: String,
    documents: HashMap<String, Vec<u8>>,
    services: Vec<SearchServiceInfo>,
    search_error: Option<String>,
    complete_error: Option<String>,
    append_error: Option<String>,
    calls: Mutex<Calls>,
}

/// Chunk with just text and document id, for brevity in tests.
pub fn chunk(text: &str, doc: &str) -> RetrievedChunk {
    RetrievedChunk {
        text: text.to_string(),
        source_document_id: doc.to_string(),
        source_url: Some(format!("https://stage.example/{doc}")),
        language: Some("English".to_string()),
        meta_info: None,
    }
}

impl FakePlatform {
    pub fn new() -> Self {
        Self {
            services: vec![SearchServiceInfo {
                name: "TEXT_SEARCH_SERVICE".to_string(),
                search_column: "CHUNK".to_string(),
            }],
            ..Self::default()
        }
    }

    pub fn with_chunks(mut self, chunks: Vec<RetrievedChunk>) -> Self {
        self.chunks = chunks;
        self
    }

    pub fn with_answer(mut self, answer: &str) -> Self {
        self.answer = answer.to_string();
        self
    }

    pub fn with_document(mut self, id: &str, bytes: &[u8]) -> Self {
        self.documents.insert(id.to_string(), bytes.to_vec());
        self
    }

    pub fn with_services(mut self, services: Vec<SearchServiceInfo>) -> Self {
        self.services = services;
        self
    }

    pub fn failing_search(mut self, msg: &str) -> Self {
        self.search_error = Some(msg.to_string());
        self
    }

    pub fn failing_complete(mut self, msg: &str) -> Self {
        self.complete_error = Some(msg.to_string());
        self
    }

    pub fn failing_append(mut self, msg: &str) -> Self {
        self.append_error = Some(msg.to_string());
        self
    }

    pub fn search_calls(&self) -> Vec<(String, SearchOptions)> {
        self.calls().search.clone()
    }

    /// `(model, prompt)` pairs, in call order.
    pub fn complete_calls(&self) -> Vec<(String, String)> {
        self.calls().complete.clone()
    }

    pub fn fetch_calls(&self) -> Vec<String> {
        self.calls().fetch.clone()
    }

    pub fn appended(&self) -> Vec<SavedQa> {
        self.calls().appended.clone()
    }

    fn calls(&self) -> MutexGuard<'_, Calls> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn fail(msg: &Option<String>) -> ChatResult<()> {
    match msg {
        Some(m) => Err(ChatError::Platform(m.clone())),
        None => Ok(()),
    }
}

impl DocPlatform for FakePlatform {
    async fn search(&self, query: &str, opts: &SearchOptions) -> ChatResult<Vec<RetrievedChunk>> {
        self.calls().search.push((query.to_string(), opts.clone()));
        fail(&self.search_error)?;
        Ok(self.chunks.iter().take(opts.limit).cloned().collect())
    }

    async fn complete(&self, model: &str, prompt: &str) -> ChatResult<String> {
        self.calls()
            .complete
            .push((model.to_string(), prompt.to_string()));
        fail(&self.complete_error)?;
        Ok(self.answer.clone())
    }

    async fn fetch_document(&self, id: &str) -> ChatResult<Vec<u8>> {
        self.calls().fetch.push(id.to_string());
        match self.documents.get(id) {
            Some(bytes) => Ok(bytes.clone()),
            None => Err(CortexError::from(UpstreamError::DocumentNotFound(id.to_string())).into()),
        }
    }

    async fn append(&self, record: &SavedQa) -> ChatResult<()> {
        fail(&self.append_error)?;
        self.calls().appended.push(record.clone());
        Ok(())
    }

    async fn list_search_services(&self) -> ChatResult<Vec<SearchServiceInfo>> {
        Ok(self.services.clone())
    }
}
