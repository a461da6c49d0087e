use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use doc_chat::{
    ChatConfig, DocChat,
    testing::{FakePlatform, chunk},
};
use serde_json::{Value, json};
use tower::util::ServiceExt;

use crate::{AppState, DEFAULT_IDLE_TTL, SessionStore, build_router};

async fn setup(fake: FakePlatform) -> (Arc<AppState<FakePlatform>>, Router) {
    let chat = DocChat::discover(fake, ChatConfig::default()).await.unwrap();
    let state = Arc::new(AppState::new(chat));
    let router = build_router(state.clone());
    (state, router)
}

fn answering() -> FakePlatform {
    FakePlatform::new()
        .with_chunks(vec![
            chunk("Arctic-Embed is a family of embedding models.", "embed.pdf"),
            chunk("It ranks well on MTEB.", "embed.pdf"),
            chunk("Arctic-TILT reads documents.", "tilt.pdf"),
        ])
        .with_answer("Arctic-Embed turns text into vectors.")
        .with_document("embed.pdf", b"%PDF-1.7 embed")
}

async fn call(router: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let (status, _, bytes) = call_raw(router, method, uri, body).await;
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

async fn call_raw(
    router: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Option<String>, Vec<u8>) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(v) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(v.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .map(|v| v.to_str().unwrap().to_string());
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, content_type, bytes.to_vec())
}

async fn new_session(router: &Router, user: &str) -> String {
    let (status, body) = call(router, Method::POST, "/sessions", Some(json!({ "user": user }))).await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn catalog_lists_models_questions_and_services() {
    let (_, router) = setup(FakePlatform::new()).await;
    let (status, body) = call(&router, Method::GET, "/catalog", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["models"][0], "mistral-large");
    assert_eq!(body["data"]["example_questions"].as_array().unwrap().len(), 13);
    assert_eq!(body["data"]["default_search_service"], "TEXT_SEARCH_SERVICE");
}

#[tokio::test]
async fn new_session_starts_from_defaults() {
    let (_, router) = setup(FakePlatform::new()).await;
    let (status, body) = call(&router, Method::POST, "/sessions", None).await;
    assert_eq!(status, StatusCode::CREATED);

    let id = body["data"]["id"].as_str().unwrap();
    let (status, body) = call(&router, Method::GET, &format!("/sessions/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let state = &body["data"]["state"];
    assert_eq!(body["data"]["user"], "anonymous");
    assert_eq!(state["model_name"], "mistral-large");
    assert_eq!(state["num_retrieved_chunks"], 5);
    assert_eq!(state["num_chat_messages"], 5);
    assert_eq!(state["use_chat_history"], true);
    assert_eq!(state["generated_response"], "");
}

#[tokio::test]
async fn unknown_session_is_404_in_envelope() {
    let (_, router) = setup(FakePlatform::new()).await;
    let uri = format!("/sessions/{}", uuid::Uuid::new_v4());
    let (status, body) = call(&router, Method::GET, &uri, None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "SESSION_NOT_FOUND");
}

#[tokio::test]
async fn options_are_validated_before_applying() {
    let (_, router) = setup(FakePlatform::new()).await;
    let id = new_session(&router, "ana").await;
    let uri = format!("/sessions/{id}/options");

    let (status, body) = call(
        &router,
        Method::PATCH,
        &uri,
        Some(json!({ "model_name": "llama3-8b", "num_chat_messages": 11 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(body["error"]["details"][0]["path"], "num_chat_messages");

    let (_, body) = call(&router, Method::GET, &format!("/sessions/{id}"), None).await;
    assert_eq!(body["data"]["state"]["model_name"], "mistral-large");

    let (status, body) = call(
        &router,
        Method::PATCH,
        &uri,
        Some(json!({
            "model_name": "llama3-8b",
            "num_retrieved_chunks": 10,
            "num_chat_messages": 2,
            "use_customized_qa_model": true
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let state = &body["data"]["state"];
    assert_eq!(state["model_name"], "llama3-8b");
    assert_eq!(state["num_retrieved_chunks"], 10);
    assert_eq!(state["messages"]["capacity"], 2);
    assert_eq!(state["use_customized_qa_model"], true);
}

#[tokio::test]
async fn unknown_model_or_service_is_rejected() {
    let (_, router) = setup(FakePlatform::new()).await;
    let id = new_session(&router, "ana").await;
    let uri = format!("/sessions/{id}/options");

    let (status, _) = call(&router, Method::PATCH, &uri, Some(json!({ "model_name": "gpt" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, body) =
        call(&router, Method::PATCH, &uri, Some(json!({ "search_service": "NOPE" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["details"][0]["path"], "search_service");
}

#[tokio::test]
async fn malformed_body_is_wrapped_in_envelope() {
    let (_, router) = setup(FakePlatform::new()).await;
    let id = new_session(&router, "ana").await;

    let (status, body) = call(
        &router,
        Method::PATCH,
        &format!("/sessions/{id}/options"),
        Some(json!({ "num_chat_messages": "many" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "UNPROCESSABLE_ENTITY");
}

#[tokio::test]
async fn ask_then_browse_and_preview_documents() {
    let (_, router) = setup(answering()).await;
    let id = new_session(&router, "ana").await;

    let (status, body) = call(
        &router,
        Method::POST,
        &format!("/sessions/{id}/ask"),
        Some(json!({ "selected_question": "What is Snowflake's Arctic-Embed model?" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["answer"], "Arctic-Embed turns text into vectors.");
    assert_eq!(body["data"]["references"], json!(["embed.pdf", "tilt.pdf"]));

    let (_, body) = call(&router, Method::GET, &format!("/sessions/{id}/documents"), None).await;
    assert_eq!(body["data"]["documents"], json!(["embed.pdf", "tilt.pdf"]));
    assert_eq!(body["data"]["selected"], Value::Null);

    let (status, content_type, bytes) = call_raw(
        &router,
        Method::GET,
        &format!("/sessions/{id}/documents/preview?doc=embed.pdf"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("application/pdf"));
    assert_eq!(bytes, b"%PDF-1.7 embed");

    let (_, body) = call(&router, Method::GET, &format!("/sessions/{id}/documents"), None).await;
    assert_eq!(body["data"]["selected"], "embed.pdf");

    let (status, body) = call(
        &router,
        Method::GET,
        &format!("/sessions/{id}/documents/preview?doc=other.pdf"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "DOCUMENT_NOT_IN_RESULTS");
}

#[tokio::test]
async fn failed_turn_keeps_session_state() {
    let fake = FakePlatform::new()
        .with_chunks(vec![chunk("text", "a.pdf")])
        .failing_complete("model unavailable");
    let (_, router) = setup(fake).await;
    let id = new_session(&router, "ana").await;

    let (status, body) = call(
        &router,
        Method::POST,
        &format!("/sessions/{id}/ask"),
        Some(json!({ "question": "q" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"]["code"], "UPSTREAM_ERROR");

    let (_, body) = call(&router, Method::GET, &format!("/sessions/{id}"), None).await;
    assert_eq!(body["data"]["state"]["last_question"], "");
    assert_eq!(body["data"]["state"]["messages"]["messages"], json!([]));
}

#[tokio::test]
async fn no_search_service_is_503() {
    let (_, router) = setup(FakePlatform::new().with_services(Vec::new())).await;
    let id = new_session(&router, "ana").await;

    let (status, body) = call(
        &router,
        Method::POST,
        &format!("/sessions/{id}/ask"),
        Some(json!({ "question": "q" })),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"]["code"], "NO_SEARCH_SERVICE");
}

#[tokio::test]
async fn save_records_user_and_edits() {
    let (state, router) = setup(answering()).await;
    let id = new_session(&router, "ana").await;

    let (status, body) = call(&router, Method::POST, &format!("/sessions/{id}/save"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "NOTHING_TO_SAVE");

    call(
        &router,
        Method::POST,
        &format!("/sessions/{id}/ask"),
        Some(json!({ "question": "What is Arctic-Embed?" })),
    )
    .await;

    let (status, body) = call(
        &router,
        Method::POST,
        &format!("/sessions/{id}/save"),
        Some(json!({ "answer": "  Edited answer.  " })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["answer"], "Edited answer.");

    let saved = state.chat.platform().appended();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].user, "ana");
    assert_eq!(saved[0].question, "What is Arctic-Embed?");
    assert_eq!(saved[0].source_document_id.as_deref(), Some("embed.pdf"));
}

#[tokio::test]
async fn reset_keeps_user_and_clears_conversation() {
    let (_, router) = setup(answering()).await;
    let id = new_session(&router, "ana").await;
    call(
        &router,
        Method::POST,
        &format!("/sessions/{id}/ask"),
        Some(json!({ "question": "q" })),
    )
    .await;

    let (status, body) = call(&router, Method::POST, &format!("/sessions/{id}/reset"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user"], "ana");
    assert_eq!(body["data"]["state"]["last_question"], "");
    assert_eq!(body["data"]["state"]["results"], json!([]));
}

#[tokio::test]
async fn sessions_do_not_share_state() {
    let (_, router) = setup(answering()).await;
    let a = new_session(&router, "ana").await;
    let b = new_session(&router, "bo").await;

    call(
        &router,
        Method::POST,
        &format!("/sessions/{a}/ask"),
        Some(json!({ "question": "only a" })),
    )
    .await;

    let (_, body) = call(&router, Method::GET, &format!("/sessions/{b}"), None).await;
    assert_eq!(body["data"]["state"]["last_question"], "");
    assert_eq!(body["data"]["user"], "bo");
}

#[tokio::test]
async fn deleted_session_is_gone() {
    let (state, router) = setup(FakePlatform::new()).await;
    let id = new_session(&router, "ana").await;

    let (status, _, _) = call_raw(&router, Method::DELETE, &format!("/sessions/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(state.sessions.len().await, 0);

    let (status, body) = call(&router, Method::GET, &format!("/sessions/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "SESSION_NOT_FOUND");

    let (status, _) = call(&router, Method::DELETE, &format!("/sessions/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn oldest_session_is_evicted_when_full() {
    let chat = DocChat::discover(FakePlatform::new(), ChatConfig::default())
        .await
        .unwrap();
    let state = Arc::new(AppState::with_sessions(
        chat,
        SessionStore::new(2, DEFAULT_IDLE_TTL),
    ));
    let router = build_router(state.clone());

    let first = new_session(&router, "ana").await;
    let second = new_session(&router, "bo").await;
    let third = new_session(&router, "cy").await;

    assert_eq!(state.sessions.len().await, 2);
    let (status, _) = call(&router, Method::GET, &format!("/sessions/{first}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    for id in [second, third] {
        let (status, _) = call(&router, Method::GET, &format!("/sessions/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
    }
}

#[tokio::test]
async fn read_only_routes_accept_request_id() {
    let (_, router) = setup(FakePlatform::new()).await;
    let id = new_session(&router, "ana").await;

    for uri in [format!("/sessions/{id}"), format!("/sessions/{id}/documents")] {
        let request = Request::builder()
            .method(Method::GET)
            .uri(&uri)
            .header("x-request-id", "req-42")
            .body(Body::empty())
            .unwrap();
        let response = router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
    }

    let request = Request::builder()
        .method(Method::GET)
        .uri(format!("/sessions/{id}/documents"))
        .header("x-request-id", "req-43")
        .body(Body::empty())
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["data"]["documents"], json!([]));
    assert_eq!(body["data"]["selected"], Value::Null);
}
