use std::sync::Arc;
use std::time::Duration;

use inference::{
    ActionItemExtractor, CompletionRequest, InferenceConfig, InferenceError, OpenAiClient,
    TextCompletion
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn request() -> CompletionRequest {
    CompletionRequest {
        system: "You extract things.".to_string(),
        user: "Description:\nPlan the offsite".to_string(),
        temperature: 0.3
    }
}

fn envelope(choices: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "created": 1_700_000_000,
        "model": "gpt-4o",
        "choices": choices
    }))
}

fn completion(content: serde_json::Value) -> ResponseTemplate {
    envelope(json!([
        { "index": 0, "message": { "role": "assistant", "content": content }, "finish_reason": "stop" }
    ]))
}

fn provider_error(status: u16, kind: &str, code: Option<&str>) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(json!({
        "error": { "message": "Request refused", "type": kind, "param": null, "code": code }
    }))
}

fn client_for(server: &MockServer, api_key: Option<&str>) -> OpenAiClient {
    let config = InferenceConfig::default()
        .with_base_url(server.uri())
        .with_timeout(Duration::from_millis(500));
    OpenAiClient::new(config, api_key.map(str::to_string))
}

#[tokio::test]
async fn test_returns_message_content() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "gpt-4o",
            "messages": [
                { "role": "system", "content": "You extract things." },
                { "role": "user", "content": "Description:\nPlan the offsite" }
            ]
        })))
        .respond_with(completion(json!("[\"Book venue\"]")))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Some("sk-test"));
    let content = client.complete(&request()).await.unwrap();
    assert_eq!(content, "[\"Book venue\"]");
}

#[tokio::test]
async fn test_key_is_trimmed_before_sending() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header("authorization", "Bearer sk-test"))
        .respond_with(completion(json!("ok")))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Some("  sk-test \n"));
    assert_eq!(client.complete(&request()).await.unwrap(), "ok");
}

#[tokio::test]
async fn test_null_content_is_empty_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(completion(serde_json::Value::Null))
        .mount(&server)
        .await;

    let client = client_for(&server, Some("sk-test"));
    assert_eq!(client.complete(&request()).await.unwrap(), "");
}

#[tokio::test]
async fn test_missing_key_never_reaches_provider() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(completion(json!("unused")))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server, None);
    let err = client.complete(&request()).await.unwrap_err();
    assert!(matches!(err, InferenceError::UpstreamUnavailable { .. }));
}

#[tokio::test]
async fn test_rejected_key_is_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(provider_error(401, "invalid_request_error", Some("invalid_api_key")))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Some("sk-wrong"));
    let err = client.complete(&request()).await.unwrap_err();
    assert!(matches!(err, InferenceError::UpstreamUnavailable { .. }));
}

#[tokio::test]
async fn test_forbidden_key_is_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(provider_error(403, "permission_error", None))
        .mount(&server)
        .await;

    let client = client_for(&server, Some("sk-test"));
    let err = client.complete(&request()).await.unwrap_err();
    assert!(matches!(err, InferenceError::UpstreamUnavailable { .. }));
}

#[tokio::test]
async fn test_rate_limit_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(provider_error(429, "requests", Some("rate_limit_exceeded")))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Some("sk-test"));
    let err = client.complete(&request()).await.unwrap_err();
    assert!(matches!(err, InferenceError::UpstreamCallFailed { .. }));
}

#[tokio::test]
async fn test_server_error_is_call_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Some("sk-test"));
    let err = client.complete(&request()).await.unwrap_err();
    match err {
        InferenceError::UpstreamCallFailed { reason } => assert!(reason.contains("overloaded")),
        other => panic!("unexpected error: {other:?}")
    }
}

#[tokio::test]
async fn test_timeout_is_call_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(completion(json!("late")).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let client = client_for(&server, Some("sk-test"));
    let err = client.complete(&request()).await.unwrap_err();
    assert!(matches!(err, InferenceError::UpstreamCallFailed { .. }));
}

#[tokio::test]
async fn test_malformed_envelope_is_call_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let client = client_for(&server, Some("sk-test"));
    let err = client.complete(&request()).await.unwrap_err();
    assert!(matches!(err, InferenceError::UpstreamCallFailed { .. }));
}

#[tokio::test]
async fn test_no_choices_is_call_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(envelope(json!([])))
        .mount(&server)
        .await;

    let client = client_for(&server, Some("sk-test"));
    let err = client.complete(&request()).await.unwrap_err();
    assert!(matches!(err, InferenceError::UpstreamCallFailed { .. }));
}

#[tokio::test]
async fn test_extractor_end_to_end_with_bullets() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "temperature": 0.3 })))
        .respond_with(completion(json!("- Draft Q3 roadmap\n- Assign onboarding owners")))
        .expect(1)
        .mount(&server)
        .await;

    let extractor = ActionItemExtractor::new(Arc::new(client_for(&server, Some("sk-test"))));
    let items = extractor
        .extract("Discuss Q3 roadmap, onboarding owners.")
        .await
        .unwrap();
    assert!(items.is_degraded());
    assert_eq!(
        items.into_inner(),
        vec!["Draft Q3 roadmap", "Assign onboarding owners"]
    );
}
