//! POST /sessions/{id}/ask — runs one question/answer turn.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::HeaderMap,
    response::Response,
};
use doc_chat::{DocPlatform, TurnInput};
use tracing::{debug, error};
use uuid::Uuid;

use crate::{
    core::{
        app_state::AppState,
        http::{request_id::request_id, response_envelope::ApiResponse},
    },
    error_handler::AppResult,
    routes::ask::ask_request::AskRequest,
};

/// Handler: POST /sessions/{id}/ask
///
/// The session stays locked for the whole turn; on failure its state is
/// left exactly as it was.
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:8080/sessions/$ID/ask \
///   -H 'content-type: application/json' \
///   -d '{"question":"What is Snowflake'\''s Arctic-Embed model?"}'
/// ```
pub async fn ask_route<P: DocPlatform + 'static>(
    State(app): State<Arc<AppState<P>>>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    Json(body): Json<AskRequest>,
) -> AppResult<Response> {
    let request_id = request_id(&headers);
    debug!(request_id = %request_id, session = %id, "ask_route: start");

    let session = app.sessions.get(id).await?;
    let mut session = session.lock().await;

    let input = TurnInput::from(body);
    let (next, render) = app
        .chat
        .handle_turn(&session.state, &input)
        .await
        .inspect_err(|e| {
            error!(request_id = %request_id, session = %id, error = %e, "ask_route: turn failed");
        })?;
    session.state = next;

    debug!(
        request_id = %request_id,
        session = %id,
        references = render.references.len(),
        "ask_route: success"
    );
    Ok(ApiResponse::success(render).ok())
}
