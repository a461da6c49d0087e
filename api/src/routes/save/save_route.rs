//! POST /sessions/{id}/save — persists the current question/answer pair.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::Response,
};
use doc_chat::{DocPlatform, SaveOverrides};
use tracing::{debug, error};
use uuid::Uuid;

use crate::{
    core::{
        app_state::AppState,
        http::{request_id::request_id, response_envelope::ApiResponse},
    },
    error_handler::AppResult,
    routes::save::save_request::SaveRequest,
};

/// Handler: POST /sessions/{id}/save
///
/// The body is optional; the session state is not changed.
pub async fn save_route<P: DocPlatform + 'static>(
    State(app): State<Arc<AppState<P>>>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    body: Option<Json<SaveRequest>>,
) -> AppResult<Response> {
    let request_id = request_id(&headers);
    debug!(request_id = %request_id, session = %id, "save_route: start");

    let overrides = SaveOverrides::from(body.map(|Json(b)| b).unwrap_or_default());
    let session = app.sessions.get(id).await?;
    let session = session.lock().await;

    let record = app
        .chat
        .save_answer(&session.state, &overrides, &session.user)
        .await
        .inspect_err(|e| {
            error!(request_id = %request_id, session = %id, error = %e, "save_route: failed");
        })?;

    Ok(ApiResponse::success(record).into_response_with_status(StatusCode::CREATED))
}
