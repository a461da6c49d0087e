use axum::http::HeaderMap;

/// Value of `X-Request-Id`, or `-` when the caller did not send one.
pub fn request_id(headers: &HeaderMap) -> String {
    headers
        .get("X-Request-Id")
        .and_then(|h| h.to_str().ok())
        .unwrap_or("-")
        .to_string()
}
