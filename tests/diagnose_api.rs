//! End-to-end tests for the HTTP API
//!
//! Assembles the real router with mock providers and an in-memory history
//! store, then drives it with `tower::ServiceExt::oneshot`.

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use pcdoctor::api;
use pcdoctor_core::auth::ApiKeyEntry;
use pcdoctor_core::{AuthStore, HistoryStore};
use pcdoctor_llm::{FailoverChain, LlmProvider, MockProvider};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

const UPSTREAM_REPLY: &str = r#"{"diagnosis":"Overheating","confidence":80,"possibleCauses":["Dust buildup"],"steps":[{"step":1,"title":"Clean fans","description":"...","difficulty":"easy","estimatedTime":"10 mins"}],"preventiveTips":["Clean regularly"]}"#;

fn diagnose_body() -> Value {
    json!({
        "systemSpecs": {
            "cpu": "Intel i7",
            "gpu": "RTX 3070",
            "ram": "16GB",
            "os": "Windows 11",
            "storage": "512GB SSD"
        },
        "problem": "Computer freezes during gaming"
    })
}

async fn test_app(providers: Vec<Arc<dyn LlmProvider>>) -> (Router, Arc<HistoryStore>) {
    let store = Arc::new(HistoryStore::new_in_memory().await.unwrap());
    let router = api::router(
        Arc::new(AuthStore::disabled()),
        store.clone(),
        Arc::new(FailoverChain::new(providers)),
    );
    (router, store)
}

fn post_diagnose(body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/diagnose")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn happy_path_reproduces_upstream_json() {
    let (app, store) = test_app(vec![Arc::new(MockProvider::succeeding(
        "key-1",
        UPSTREAM_REPLY,
    ))])
    .await;

    let response = app.oneshot(post_diagnose(&diagnose_body())).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let expected: Value = serde_json::from_str(UPSTREAM_REPLY).unwrap();
    assert_eq!(body, expected);

    // Persisted for the (anonymous) caller
    let records = store.list("anonymous", 10).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(
        records[0].problem_description,
        "Computer freezes during gaming"
    );
    assert_eq!(records[0].diagnosis_result.diagnosis, "Overheating");
}

#[tokio::test]
async fn blank_problem_is_rejected_with_400() {
    for problem in ["", "   "] {
        let (app, store) = test_app(vec![Arc::new(MockProvider::succeeding(
            "key-1",
            UPSTREAM_REPLY,
        ))])
        .await;
        let body = json!({ "systemSpecs": {}, "problem": problem });

        let response = app.oneshot(post_diagnose(&body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Problem description is required");
        assert!(store.list("anonymous", 10).await.unwrap().is_empty());
    }
}

#[tokio::test]
async fn single_char_problem_is_accepted() {
    let (app, _store) = test_app(vec![Arc::new(MockProvider::succeeding(
        "key-1",
        UPSTREAM_REPLY,
    ))])
    .await;
    let body = json!({ "systemSpecs": {}, "problem": "x" });

    let response = app.oneshot(post_diagnose(&body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn non_json_upstream_reply_degrades_to_200() {
    let (app, _store) = test_app(vec![Arc::new(MockProvider::succeeding(
        "key-1",
        "I cannot help with that.",
    ))])
    .await;

    let response = app.oneshot(post_diagnose(&diagnose_body())).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["diagnosis"], "Unable to parse AI response. Please try again.");
    assert_eq!(body["confidence"], 50);
    assert_eq!(body["possibleCauses"], json!(["AI response parsing error"]));
}

#[tokio::test]
async fn failover_reaches_second_key() {
    let second = Arc::new(MockProvider::succeeding("key-2", UPSTREAM_REPLY));
    let (app, _store) = test_app(vec![
        Arc::new(MockProvider::failing("key-1", "401 invalid key")),
        second.clone(),
    ])
    .await;

    let response = app.oneshot(post_diagnose(&diagnose_body())).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(second.calls(), 1);
}

#[tokio::test]
async fn exhausted_keys_return_500() {
    let (app, store) = test_app(vec![
        Arc::new(MockProvider::failing("key-1", "boom")),
        Arc::new(MockProvider::failing("key-2", "boom")),
    ])
    .await;

    let response = app.oneshot(post_diagnose(&diagnose_body())).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(
        body["error"],
        "Failed to get diagnosis from AI service - all API keys exhausted"
    );
    assert!(store.list("anonymous", 10).await.unwrap().is_empty());
}

#[tokio::test]
async fn empty_credential_pool_returns_500_without_calls() {
    let (app, _store) = test_app(vec![]).await;

    let response = app.oneshot(post_diagnose(&diagnose_body())).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["error"], "No OpenRouter API keys configured");
}

#[tokio::test]
async fn empty_upstream_content_returns_500() {
    let (app, _store) = test_app(vec![Arc::new(MockProvider::succeeding("key-1", "  "))]).await;

    let response = app.oneshot(post_diagnose(&diagnose_body())).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["error"], "No response from AI service");
}

#[tokio::test]
async fn persistence_failure_does_not_change_the_response() {
    let (app, store) = test_app(vec![Arc::new(MockProvider::succeeding(
        "key-1",
        UPSTREAM_REPLY,
    ))])
    .await;
    store.close().await;

    let response = app.oneshot(post_diagnose(&diagnose_body())).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["diagnosis"], "Overheating");
}

#[tokio::test]
async fn auth_enabled_requires_a_valid_key() {
    let store = Arc::new(HistoryStore::new_in_memory().await.unwrap());
    let auth = AuthStore::new(
        true,
        &[ApiKeyEntry {
            key: "pcd-test-key".to_string(),
            user_id: "alice".to_string(),
        }],
    );
    let app = api::router(
        Arc::new(auth),
        store.clone(),
        Arc::new(FailoverChain::new(vec![Arc::new(MockProvider::succeeding(
            "key-1",
            UPSTREAM_REPLY,
        ))])),
    );

    // No credentials
    let response = app
        .clone()
        .oneshot(post_diagnose(&diagnose_body()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Wrong key
    let mut request = post_diagnose(&diagnose_body());
    request
        .headers_mut()
        .insert("x-api-key", "wrong".parse().unwrap());
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Valid bearer key
    let mut request = post_diagnose(&diagnose_body());
    request.headers_mut().insert(
        header::AUTHORIZATION,
        "Bearer pcd-test-key".parse().unwrap(),
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // History landed under the key's user
    assert_eq!(store.list("alice", 10).await.unwrap().len(), 1);
}

#[tokio::test]
async fn history_endpoints_browse_search_and_delete() {
    let (app, _store) = test_app(vec![Arc::new(MockProvider::succeeding(
        "key-1",
        UPSTREAM_REPLY,
    ))])
    .await;

    let response = app
        .clone()
        .oneshot(post_diagnose(&diagnose_body()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // List
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/history")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let records = body_json(response).await;
    assert_eq!(records.as_array().unwrap().len(), 1);
    let id = records[0]["id"].as_str().unwrap().to_string();

    // Search hit and miss
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/history?q=freezes")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 1);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/history?q=nomatch")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert!(body_json(response).await.as_array().unwrap().is_empty());

    // Get one
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/history/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["diagnosis_result"]["diagnosis"], "Overheating");

    // Delete, then it is gone
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/history/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/history/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_is_open() {
    let (app, _store) = test_app(vec![]).await;
    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
}
