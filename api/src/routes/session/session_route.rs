//! Session lifecycle: create, inspect, delete, change options, reset.

use std::ops::RangeInclusive;
use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use doc_chat::{DocPlatform, MODELS, SessionState};
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::{
    core::{
        app_state::AppState,
        http::{request_id::request_id, response_envelope::ApiResponse},
    },
    error_handler::{AppError, AppResult},
    routes::session::{
        session_request::{CreateSessionRequest, UpdateOptionsRequest},
        session_response::SessionResponse,
    },
};

/// Accepted range for chunk count and history length.
pub const OPTION_BOUNDS: RangeInclusive<usize> = 1..=10;

/// Handler: POST /sessions
///
/// The body is optional.
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:8080/sessions \
///   -H 'content-type: application/json' \
///   -d '{"user":"ana"}'
/// ```
pub async fn create_session<P: DocPlatform + 'static>(
    State(app): State<Arc<AppState<P>>>,
    headers: HeaderMap,
    body: Option<Json<CreateSessionRequest>>,
) -> Response {
    let request_id = request_id(&headers);
    let body = body.map(|Json(b)| b).unwrap_or_default();
    let user = app.user_or_default(body.user.as_deref());
    let (id, session) = app.sessions.create(user).await;
    let session = session.lock().await;

    info!(request_id = %request_id, session = %id, user = %session.user, "session created");

    ApiResponse::success(SessionResponse {
        id,
        user: &session.user,
        state: &session.state,
    })
    .into_response_with_status(StatusCode::CREATED)
}

/// Handler: GET /sessions/{id}
pub async fn get_session<P: DocPlatform + 'static>(
    State(app): State<Arc<AppState<P>>>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> AppResult<Response> {
    let request_id = request_id(&headers);
    debug!(request_id = %request_id, session = %id, "get_session: start");

    let session = app.sessions.get(id).await.inspect_err(|e| {
        error!(request_id = %request_id, session = %id, error = %e, "get_session: failed");
    })?;
    let session = session.lock().await;

    debug!(request_id = %request_id, session = %id, "get_session: success");
    Ok(ApiResponse::success(SessionResponse {
        id,
        user: &session.user,
        state: &session.state,
    })
    .ok())
}

/// Handler: DELETE /sessions/{id}
pub async fn delete_session<P: DocPlatform + 'static>(
    State(app): State<Arc<AppState<P>>>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> AppResult<Response> {
    let request_id = request_id(&headers);
    app.sessions.remove(id).await.inspect_err(|e| {
        error!(request_id = %request_id, session = %id, error = %e, "delete_session: failed");
    })?;

    info!(request_id = %request_id, session = %id, "session deleted");
    Ok(StatusCode::NO_CONTENT.into_response())
}

/// Handler: PATCH /sessions/{id}/options
///
/// Validates every field before applying any of them.
pub async fn update_options<P: DocPlatform + 'static>(
    State(app): State<Arc<AppState<P>>>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    Json(body): Json<UpdateOptionsRequest>,
) -> AppResult<Response> {
    let request_id = request_id(&headers);
    debug!(request_id = %request_id, session = %id, "update_options: start");

    let session = app.sessions.get(id).await?;
    let mut session = session.lock().await;

    let next = apply_options(&app, &session.state, &body).inspect_err(|e| {
        error!(request_id = %request_id, session = %id, error = %e, "update_options: rejected");
    })?;
    session.state = next;

    debug!(request_id = %request_id, session = %id, "update_options: success");
    Ok(ApiResponse::success(SessionResponse {
        id,
        user: &session.user,
        state: &session.state,
    })
    .ok())
}

fn apply_options<P: DocPlatform>(
    app: &AppState<P>,
    state: &SessionState,
    body: &UpdateOptionsRequest,
) -> AppResult<SessionState> {
    let mut next = state.clone();

    if let Some(model) = &body.model_name {
        if !MODELS.contains(&model.as_str()) {
            return Err(AppError::validation(
                "model_name",
                format!("expected one of {}", MODELS.join(", ")),
            ));
        }
        next.model_name = model.clone();
    }
    if let Some(n) = body.num_retrieved_chunks {
        next.num_retrieved_chunks = in_bounds("num_retrieved_chunks", n)?;
    }
    if let Some(n) = body.num_chat_messages {
        next.set_num_chat_messages(in_bounds("num_chat_messages", n)?);
    }
    if let Some(on) = body.use_chat_history {
        next.use_chat_history = on;
    }
    if let Some(on) = body.use_customized_qa_model {
        next.use_customized_qa_model = on;
    }
    if let Some(name) = &body.search_service {
        let service = app.chat.catalog().get(name).ok_or_else(|| {
            AppError::validation("search_service", format!("unknown search service {name:?}"))
        })?;
        next.search_service = Some(service.name.clone());
    }
    Ok(next)
}

fn in_bounds(field: &'static str, n: usize) -> AppResult<usize> {
    if OPTION_BOUNDS.contains(&n) {
        Ok(n)
    } else {
        Err(AppError::validation(
            field,
            format!(
                "must be between {} and {}",
                OPTION_BOUNDS.start(),
                OPTION_BOUNDS.end()
            ),
        ))
    }
}

/// Handler: POST /sessions/{id}/reset
///
/// Restores every state field to its default; the user name is kept.
pub async fn reset_session<P: DocPlatform + 'static>(
    State(app): State<Arc<AppState<P>>>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> AppResult<Response> {
    let request_id = request_id(&headers);
    let session = app.sessions.get(id).await?;
    let mut session = session.lock().await;
    session.state.reset();

    debug!(request_id = %request_id, session = %id, "reset_session: success");
    Ok(ApiResponse::success(SessionResponse {
        id,
        user: &session.user,
        state: &session.state,
    })
    .ok())
}
