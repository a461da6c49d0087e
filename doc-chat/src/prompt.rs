//! Prompt builder: greedy context packing under a character budget.

use crate::api_types::RetrievedChunk;

/// Default character budget for the assembled context.
pub const DEFAULT_MAX_CONTEXT_CHARS: usize = 3000;

/// Packs chunk texts, space-separated, into at most `max_chars` characters.
///
/// Chunks are taken in the given (relevance) order. Each chunk is appended
/// with one trailing space while the accumulated length stays within the
/// budget; the first chunk that would overflow stops packing, even if later
/// chunks are shorter. The result is trimmed and then hard-cut at
/// `max_chars` characters.
///
/// # Example
/// ```
/// # use doc_chat::{RetrievedChunk, prompt::build_context};
/// let chunk = |t: &str| RetrievedChunk {
///     text: t.into(),
///     source_document_id: "a.pdf".into(),
///     source_url: None,
///     language: None,
///     meta_info: None,
/// };
/// let ctx = build_context(&[chunk("alpha"), chunk("beta")], 100);
/// assert_eq!(ctx, "alpha beta");
/// ```
pub fn build_context(chunks: &[RetrievedChunk], max_chars: usize) -> String {
    let mut out = String::new();
    let mut used = 0usize;

    for chunk in chunks {
        let len = chunk.text.chars().count();
        // text + trailing space
        if used + len + 1 > max_chars {
            break;
        }
        out.push_str(&chunk.text);
        out.push(' ');
        used += len + 1;
    }

    truncate_chars(out.trim(), max_chars).to_string()
}

/// Wraps the question and the packed context into the model prompt.
///
/// Returns `None` when there are no chunks: the caller must not call the
/// completion service in that case.
///
/// # Example
/// ```
/// # use doc_chat::prompt::generate_prompt;
/// assert!(generate_prompt("How to X?", &[], 3000).is_none());
/// ```
pub fn generate_prompt(
    question: &str,
    chunks: &[RetrievedChunk],
    max_chars: usize,
) -> Option<String> {
    if chunks.is_empty() {
        return None;
    }
    let context = build_context(chunks, max_chars);
    Some(render(question, &context))
}

fn render(question: &str, context: &str) -> String {
    format!(
        r#"[INST]
You are a helpful AI assistant specialized in retrieving information from documents.
The user has asked the following question:

<question>
{question}
</question>

Based on the context provided, generate a coherent and relevant answer to the question.

<context>
{context}
</context>
[/INST]

Answer:
"#
    )
}

fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((end, _)) => &s[..end],
        None => s,
    }
}
