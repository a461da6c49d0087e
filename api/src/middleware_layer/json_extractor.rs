//! Rewrites axum's plain-text extractor rejections into the JSON envelope.

use axum::{
    body::{Body, Bytes},
    http::{HeaderValue, Request, StatusCode, header},
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use crate::core::http::response_envelope::{ApiErrorDetail, ApiResponse};

async fn take_body(res: Response) -> (axum::http::response::Parts, Bytes) {
    let (parts, body) = res.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .unwrap_or_default();
    (parts, bytes)
}

fn guess_path_from_serde_msg(msg: &str) -> Option<String> {
    for key in [
        "question",
        "selected_question",
        "answer",
        "user",
        "model_name",
        "num_retrieved_chunks",
        "num_chat_messages",
        "use_chat_history",
        "use_customized_qa_model",
        "search_service",
    ] {
        if msg.contains(&format!("`{key}`")) {
            return Some(key.to_string());
        }
    }
    None
}

fn ensure_request_id(parts: &mut axum::http::response::Parts) -> String {
    if let Some(v) = parts
        .headers
        .get("X-Request-Id")
        .and_then(|h| h.to_str().ok())
        .filter(|v| !v.trim().is_empty())
    {
        return v.to_string();
    }
    let nanos = Utc::now()
        .timestamp_nanos_opt()
        .unwrap_or_else(|| Utc::now().timestamp_micros() * 1000);
    let id = format!("req-{nanos}");
    if let Ok(v) = HeaderValue::from_str(&id) {
        parts.headers.insert("X-Request-Id", v);
    }
    id
}

/// Bodies already wrapped by a handler are left alone.
fn is_envelope(bytes: &[u8]) -> bool {
    serde_json::from_slice::<serde_json::Value>(bytes)
        .map(|v| v.get("success").is_some())
        .unwrap_or(false)
}

pub async fn json_error_mapper(req: Request<Body>, next: Next) -> Response {
    let res = next.run(req).await;
    let status = res.status();

    // Only 400/422 come from extractor rejections.
    if !(status == StatusCode::BAD_REQUEST || status == StatusCode::UNPROCESSABLE_ENTITY) {
        return res;
    }

    let (mut parts, bytes) = take_body(res).await;
    if is_envelope(&bytes) {
        return Response::from_parts(parts, bytes.into());
    }

    let original = String::from_utf8_lossy(&bytes);
    ensure_request_id(&mut parts);

    let detail = ApiErrorDetail {
        path: guess_path_from_serde_msg(&original),
        hint: if original.contains("invalid type") {
            Some("Check the field type (e.g. numbers for counts, true/false for toggles).".into())
        } else if original.contains("Content-Type") {
            Some("Send the body as JSON with `Content-Type: application/json`.".into())
        } else {
            None
        },
    };

    let envelope = ApiResponse::<()>::error(
        if status == StatusCode::BAD_REQUEST {
            "BAD_REQUEST"
        } else {
            "UNPROCESSABLE_ENTITY"
        },
        original.trim(),
        vec![detail],
    );

    let body = match serde_json::to_vec(&envelope) {
        Ok(v) => v,
        Err(_) => bytes.to_vec(),
    };

    parts.headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    parts.headers.remove(header::CONTENT_LENGTH);

    Response::from_parts(parts, body.into())
}
