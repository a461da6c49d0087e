//! Mapping of raw search rows into [`RetrievedChunk`]s.

use cortex_service::SearchRow;
use serde_json::Value;

use crate::api_types::RetrievedChunk;

/// Builds a chunk from one search row.
///
/// The text comes from `chunk`, falling back to the service's search column.
/// Missing columns become empty / `None`; non-string values are kept as
/// their JSON rendering.
pub fn chunk_from_row(row: &SearchRow, text_column: &str) -> RetrievedChunk {
    let text = column(row, "chunk")
        .or_else(|| column(row, text_column))
        .unwrap_or_default();

    RetrievedChunk {
        text,
        source_document_id: column(row, "relative_path").unwrap_or_default(),
        source_url: column(row, "file_url"),
        language: column(row, "language"),
        meta_info: column(row, "meta_info"),
    }
}

fn column(row: &SearchRow, name: &str) -> Option<String> {
    let value = row
        .get(name)
        .or_else(|| row.iter().find(|(k, _)| k.eq_ignore_ascii_case(name)).map(|(_, v)| v))?;
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
