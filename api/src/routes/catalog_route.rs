//! GET /catalog — models, example questions and discovered search services.

use std::sync::Arc;

use axum::{extract::State, http::HeaderMap, response::Response};
use cortex_service::SearchServiceInfo;
use doc_chat::{DocPlatform, EXAMPLE_QUESTIONS, MODELS};
use serde::Serialize;
use tracing::debug;

use crate::core::{
    app_state::AppState,
    http::{request_id::request_id, response_envelope::ApiResponse},
};

#[derive(Debug, Serialize)]
pub struct CatalogResponse<'a> {
    pub models: &'a [&'static str],
    pub example_questions: &'a [&'static str],
    pub search_services: &'a [SearchServiceInfo],
    /// `None` when no search service was discovered.
    pub default_search_service: Option<&'a str>,
}

pub async fn catalog_route<P: DocPlatform + 'static>(
    State(app): State<Arc<AppState<P>>>,
    headers: HeaderMap,
) -> Response {
    let request_id = request_id(&headers);
    let catalog = app.chat.catalog();
    debug!(
        request_id = %request_id,
        services = catalog.services().len(),
        "catalog_route: success"
    );

    ApiResponse::success(CatalogResponse {
        models: &MODELS,
        example_questions: &EXAMPLE_QUESTIONS,
        search_services: catalog.services(),
        default_search_service: catalog.default_service().map(|s| s.name.as_str()),
    })
    .ok()
}
