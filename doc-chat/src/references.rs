//! Citation helpers: distinct source documents of an answer.

use std::collections::HashSet;

use crate::api_types::RetrievedChunk;

/// Distinct source document ids in first-seen order. Blank ids are skipped.
///
/// # Example
/// ```
/// # use doc_chat::{RetrievedChunk, references::distinct_sources};
/// let c = |d: &str| RetrievedChunk {
///     text: String::new(),
///     source_document_id: d.into(),
///     source_url: None,
///     language: None,
///     meta_info: None,
/// };
/// assert_eq!(distinct_sources(&[c("A"), c("B"), c("A")]), ["A", "B"]);
/// ```
pub fn distinct_sources(chunks: &[RetrievedChunk]) -> Vec<String> {
    let mut seen = HashSet::new();
    chunks
        .iter()
        .map(|c| c.source_document_id.as_str())
        .filter(|id| !id.trim().is_empty())
        .filter(|id| seen.insert(*id))
        .map(str::to_string)
        .collect()
}

/// Markdown table listing the references; empty when there are none.
pub fn references_markdown(sources: &[String]) -> String {
    if sources.is_empty() {
        return String::new();
    }
    let mut out = String::from("###### References \n\n| PDF Title |\n|-------|\n");
    for title in sources {
        out.push_str("| ");
        out.push_str(&title.replace('|', "\\|"));
        out.push_str(" |\n");
    }
    out
}
