//! JSON session surface over the document chat engine.

mod core;
mod error_handler;
mod middleware_layer;
mod routes;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router, middleware,
    routing::{get, patch, post},
};
use cortex_service::error_handler::{env_opt_u64, env_or};
use doc_chat::{ChatError, DocChat, DocPlatform};
use tokio::signal;
use tracing::{error, info};

pub use crate::core::app_state::AppState;
pub use crate::core::session_store::{DEFAULT_IDLE_TTL, DEFAULT_MAX_SESSIONS, SessionStore};
pub use crate::error_handler::{AppError, AppResult};

use crate::{
    middleware_layer::json_extractor::json_error_mapper,
    routes::{
        ask::ask_route::ask_route,
        catalog_route::catalog_route,
        documents::documents_route::{list_documents, preview_document},
        save::save_route::save_route,
        session::session_route::{
            create_session, delete_session, get_session, reset_session, update_options,
        },
    },
};

/// Default bind address when `API_ADDRESS` is not set.
pub const DEFAULT_API_ADDRESS: &str = "127.0.0.1:8080";

/// All session routes over the shared state.
pub fn build_router<P: DocPlatform + 'static>(state: Arc<AppState<P>>) -> Router {
    Router::new()
        .route("/catalog", get(catalog_route::<P>))
        .route("/sessions", post(create_session::<P>))
        .route(
            "/sessions/{id}",
            get(get_session::<P>).delete(delete_session::<P>),
        )
        .route("/sessions/{id}/options", patch(update_options::<P>))
        .route("/sessions/{id}/reset", post(reset_session::<P>))
        .route("/sessions/{id}/ask", post(ask_route::<P>))
        .route("/sessions/{id}/documents", get(list_documents::<P>))
        .route(
            "/sessions/{id}/documents/preview",
            get(preview_document::<P>),
        )
        .route("/sessions/{id}/save", post(save_route::<P>))
        .layer(middleware::from_fn(json_error_mapper))
        .with_state(state)
}

/// Session registry bounds from `API_MAX_SESSIONS` and `API_SESSION_IDLE_SECS`.
///
/// # Errors
/// [`AppError::Chat`] wrapping a config error if a variable is not a number.
pub fn session_store_from_env() -> AppResult<SessionStore> {
    let max_sessions = env_opt_u64("API_MAX_SESSIONS")
        .map_err(ChatError::from)?
        .map_or(DEFAULT_MAX_SESSIONS, |n| {
            usize::try_from(n).unwrap_or(usize::MAX)
        });
    let idle_ttl = env_opt_u64("API_SESSION_IDLE_SECS")
        .map_err(ChatError::from)?
        .map_or(DEFAULT_IDLE_TTL, Duration::from_secs);
    Ok(SessionStore::new(max_sessions, idle_ttl))
}

/// Serves the session routes on `API_ADDRESS` until Ctrl+C.
///
/// # Errors
/// [`AppError::Bind`] if the address cannot be bound, [`AppError::Server`]
/// if serving fails, [`AppError::Chat`] for malformed session bounds.
pub async fn start<P: DocPlatform + 'static>(chat: DocChat<P>) -> AppResult<()> {
    let addr = env_or("API_ADDRESS", DEFAULT_API_ADDRESS);
    let sessions = session_store_from_env()?;
    let app = build_router(Arc::new(AppState::with_sessions(chat, sessions)));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|source| AppError::Bind {
            addr: addr.clone(),
            source,
        })?;
    info!(%addr, "session API listening");

    // Start server with graceful shutdown on Ctrl+C
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    info!("session API stopped");
    Ok(())
}

/// Resolves when Ctrl+C is pressed.
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
