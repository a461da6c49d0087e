//! Source documents of the current answer and their raw preview.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State, rejection::QueryRejection},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use doc_chat::{DocPlatform, documents};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};
use uuid::Uuid;

use crate::{
    core::{
        app_state::AppState,
        http::{request_id::request_id, response_envelope::ApiResponse},
    },
    error_handler::AppResult,
};

#[derive(Debug, Serialize)]
pub struct DocumentsResponse {
    /// Distinct documents cited by the last answer, first-seen order.
    pub documents: Vec<String>,
    /// Document last opened in the preview.
    pub selected: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PreviewQuery {
    pub doc: String,
}

/// Handler: GET /sessions/{id}/documents
pub async fn list_documents<P: DocPlatform + 'static>(
    State(app): State<Arc<AppState<P>>>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> AppResult<Response> {
    let request_id = request_id(&headers);
    debug!(request_id = %request_id, session = %id, "list_documents: start");

    let session = app.sessions.get(id).await.inspect_err(|e| {
        error!(request_id = %request_id, session = %id, error = %e, "list_documents: failed");
    })?;
    let session = session.lock().await;
    let cited = documents(&session.state);

    debug!(request_id = %request_id, session = %id, count = cited.len(), "list_documents: success");
    Ok(ApiResponse::success(DocumentsResponse {
        documents: cited,
        selected: session.state.pdf_filename.clone(),
    })
    .ok())
}

/// Handler: GET /sessions/{id}/documents/preview?doc=<id>
///
/// Streams the raw PDF bytes of a cited document and remembers the choice.
pub async fn preview_document<P: DocPlatform + 'static>(
    State(app): State<Arc<AppState<P>>>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    query: Result<Query<PreviewQuery>, QueryRejection>,
) -> AppResult<Response> {
    let request_id = request_id(&headers);
    let Query(q) = query?;
    debug!(request_id = %request_id, session = %id, doc = %q.doc, "preview_document: start");

    let session = app.sessions.get(id).await?;
    let mut session = session.lock().await;

    let (next, bytes) = app
        .chat
        .preview_document(&session.state, &q.doc)
        .await
        .inspect_err(|e| {
            error!(request_id = %request_id, session = %id, error = %e, "preview_document: failed");
        })?;
    session.state = next;

    debug!(request_id = %request_id, bytes = bytes.len(), "preview_document: success");
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, HeaderValue::from_static("application/pdf"))],
        bytes,
    )
        .into_response())
}
