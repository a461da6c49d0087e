use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use cortex_service::CortexError;
use doc_chat::ChatError;
use thiserror::Error;
use uuid::Uuid;

use crate::core::http::response_envelope::{ApiErrorDetail, ApiResponse};

/// Public application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // --- IO / server ---
    #[error("failed to bind listener on {addr}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error")]
    Server(#[source] std::io::Error),

    // --- Request / routing ---
    #[error("bad request: {0}")]
    BadRequest(String),

    /// A request field is outside what the session accepts.
    #[error("invalid value for {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error("session {0} not found")]
    SessionNotFound(Uuid),

    // --- Core ---
    #[error(transparent)]
    Chat(#[from] ChatError),
}

impl AppError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        AppError::Validation {
            field,
            message: message.into(),
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            // 4xx
            AppError::BadRequest(_) | AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::SessionNotFound(_) => StatusCode::NOT_FOUND,

            AppError::Chat(e) => match e {
                ChatError::UnknownSearchService(_) => StatusCode::BAD_REQUEST,
                ChatError::NothingToSave => StatusCode::CONFLICT,
                ChatError::DocumentNotInResults(_) => StatusCode::NOT_FOUND,
                ChatError::NoSearchService => StatusCode::SERVICE_UNAVAILABLE,
                e if e.is_not_found() => StatusCode::NOT_FOUND,
                ChatError::Cortex(CortexError::Config(_)) => StatusCode::INTERNAL_SERVER_ERROR,
                _ => StatusCode::BAD_GATEWAY,
            },

            // 5xx
            AppError::Bind { .. } | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            AppError::Bind { .. } => "BIND_ERROR",
            AppError::Server(_) => "SERVER_ERROR",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::Validation { .. } => "VALIDATION_ERROR",
            AppError::SessionNotFound(_) => "SESSION_NOT_FOUND",
            AppError::Chat(e) => match e {
                ChatError::UnknownSearchService(_) => "UNKNOWN_SEARCH_SERVICE",
                ChatError::NothingToSave => "NOTHING_TO_SAVE",
                ChatError::DocumentNotInResults(_) => "DOCUMENT_NOT_IN_RESULTS",
                ChatError::NoSearchService => "NO_SEARCH_SERVICE",
                e if e.is_not_found() => "DOCUMENT_NOT_FOUND",
                ChatError::Cortex(CortexError::Config(_)) => "CONFIG_ERROR",
                _ => "UPSTREAM_ERROR",
            },
        }
    }

    fn details(&self) -> Vec<ApiErrorDetail> {
        match self {
            AppError::Validation { field, message } => {
                vec![ApiErrorDetail::field(field, message.clone())]
            }
            _ => Vec::new(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        ApiResponse::<()>::error(self.error_code(), self.to_string(), self.details())
            .into_response_with_status(status)
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;

impl From<axum::extract::rejection::QueryRejection> for AppError {
    fn from(err: axum::extract::rejection::QueryRejection) -> Self {
        AppError::BadRequest(err.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cortex_service::UpstreamError;

    fn status(e: ChatError) -> (StatusCode, &'static str) {
        let e = AppError::from(e);
        (e.status_code(), e.error_code())
    }

    #[test]
    fn chat_errors_map_to_http() {
        assert_eq!(
            status(ChatError::NoSearchService),
            (StatusCode::SERVICE_UNAVAILABLE, "NO_SEARCH_SERVICE")
        );
        assert_eq!(
            status(ChatError::Platform("x".into())),
            (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR")
        );
        assert_eq!(
            status(ChatError::Cortex(
                UpstreamError::DocumentNotFound("a.pdf".into()).into()
            )),
            (StatusCode::NOT_FOUND, "DOCUMENT_NOT_FOUND")
        );
        assert_eq!(
            status(ChatError::Cortex(UpstreamError::Decode("bad".into()).into())),
            (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR")
        );
        assert_eq!(
            status(ChatError::NothingToSave),
            (StatusCode::CONFLICT, "NOTHING_TO_SAVE")
        );
    }

    #[test]
    fn unknown_session_is_404() {
        let e = AppError::SessionNotFound(Uuid::nil());
        assert_eq!(e.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(e.error_code(), "SESSION_NOT_FOUND");
    }
}
