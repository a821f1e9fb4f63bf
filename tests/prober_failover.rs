//! ProviderProber against a mock HTTP server.

use ai_polish::config::ProviderSettings;
use ai_polish::error_code::ErrorClass;
use ai_polish::provider::{Completion, CompletionSource, ProviderProber, StaticConfig};
use ai_polish::validation::LocalRewriter;
use ai_polish::{Error, OptimizeMode};
use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;
use std::sync::Arc;

const KEY: &str = "test-key";

fn chat_body(content: &str) -> String {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [{"index": 0, "message": {"role": "assistant", "content": content}}]
    })
    .to_string()
}

fn prober(server: &ServerGuard, models: &[&str], endpoints: &[&str]) -> ProviderProber {
    let settings = ProviderSettings {
        models: models.iter().map(|s| s.to_string()).collect(),
        endpoints: endpoints.iter().map(|s| s.to_string()).collect(),
        request_timeout_ms: 5_000,
        ..ProviderSettings::default()
    };
    ProviderProber::new(
        &settings,
        Arc::new(StaticConfig::new(KEY, server.url())),
        LocalRewriter::new(),
    )
    .unwrap()
}

#[tokio::test]
async fn not_found_moves_to_next_endpoint() {
    let mut server = Server::new_async().await;
    let a = server
        .mock("POST", "/v1/chat/completions")
        .with_status(404)
        .with_body("no such route")
        .expect(1)
        .create_async()
        .await;
    let b = server
        .mock("POST", "/api/v1/chat/completions")
        .match_header("authorization", "Bearer test-key")
        .match_header("content-type", "application/json")
        .match_header("accept", "application/json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(chat_body("投资存在风险，入市需审慎。"))
        .expect(1)
        .create_async()
        .await;

    let out = prober(&server, &["m1"], &["v1/chat/completions", "api/v1/chat/completions"])
        .complete("投资有风险，入市需谨慎。", OptimizeMode::Basic)
        .await
        .unwrap();

    assert_eq!(
        out,
        Completion::Provider {
            text: "投资存在风险，入市需审慎。".into(),
            model: "m1".into(),
            endpoint: "api/v1/chat/completions".into(),
        }
    );
    a.assert_async().await;
    b.assert_async().await;
}

#[tokio::test]
async fn rate_limit_rotates_model_on_same_endpoint() {
    let mut server = Server::new_async().await;
    let m1 = server
        .mock("POST", "/v1/chat/completions")
        .match_body(Matcher::PartialJson(json!({"model": "m1"})))
        .with_status(429)
        .with_body("slow down")
        .expect(1)
        .create_async()
        .await;
    let m2 = server
        .mock("POST", "/v1/chat/completions")
        .match_body(Matcher::PartialJson(json!({"model": "m2"})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(chat_body("rotated result"))
        .expect(1)
        .create_async()
        .await;
    let next_endpoint = server
        .mock("POST", "/v1/completions")
        .with_status(200)
        .expect(0)
        .create_async()
        .await;

    let out = prober(&server, &["m1", "m2"], &["v1/chat/completions", "v1/completions"])
        .complete("some text to rewrite", OptimizeMode::Basic)
        .await
        .unwrap();

    match out {
        Completion::Provider {
            text,
            model,
            endpoint,
        } => {
            assert_eq!(text, "rotated result");
            assert_eq!(model, "m2");
            assert_eq!(endpoint, "v1/chat/completions");
        }
        other => panic!("unexpected completion: {:?}", other),
    }
    m1.assert_async().await;
    m2.assert_async().await;
    next_endpoint.assert_async().await;
}

#[tokio::test]
async fn rotated_model_sticks_for_later_endpoints() {
    let mut server = Server::new_async().await;
    let _limited = server
        .mock("POST", "/v1/chat/completions")
        .match_body(Matcher::PartialJson(json!({"model": "m1"})))
        .with_status(429)
        .create_async()
        .await;
    let _missing = server
        .mock("POST", "/v1/chat/completions")
        .match_body(Matcher::PartialJson(json!({"model": "m2"})))
        .with_status(404)
        .create_async()
        .await;
    let legacy = server
        .mock("POST", "/v1/completions")
        .match_body(Matcher::PartialJson(json!({"model": "m2"})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"choices": [{"text": "legacy completion"}]}).to_string())
        .expect(1)
        .create_async()
        .await;

    let out = prober(&server, &["m1", "m2"], &["v1/chat/completions", "v1/completions"])
        .complete("some text", OptimizeMode::Strict)
        .await
        .unwrap();

    assert_eq!(out.text(), "legacy completion");
    legacy.assert_async().await;
}

#[tokio::test]
async fn rate_limited_on_every_model_is_fatal() {
    let mut server = Server::new_async().await;
    let limited = server
        .mock("POST", "/v1/chat/completions")
        .with_status(429)
        .expect(3)
        .create_async()
        .await;

    let err = prober(&server, &["m1", "m2", "m3"], &["v1/chat/completions", "v1/completions"])
        .complete("text", OptimizeMode::Basic)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::RateLimited { models_tried: 3, .. }));
    assert_eq!(err.class(), ErrorClass::RateLimited);
    limited.assert_async().await;
}

#[tokio::test]
async fn auth_failure_stops_probing() {
    let mut server = Server::new_async().await;
    let denied = server
        .mock("POST", "/v1/chat/completions")
        .with_status(401)
        .with_body(r#"{"error": {"message": "invalid api key"}}"#)
        .expect(1)
        .create_async()
        .await;
    let never = server
        .mock("POST", "/v1/completions")
        .with_status(200)
        .expect(0)
        .create_async()
        .await;

    let err = prober(&server, &["m1", "m2"], &["v1/chat/completions", "v1/completions"])
        .complete("text", OptimizeMode::Basic)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Auth { status: 401, .. }));
    assert!(err.to_string().contains("invalid api key"));
    denied.assert_async().await;
    never.assert_async().await;
}

#[tokio::test]
async fn server_error_stops_probing() {
    let mut server = Server::new_async().await;
    let broken = server
        .mock("POST", "/v1/chat/completions")
        .with_status(503)
        .expect(1)
        .create_async()
        .await;
    let never = server
        .mock("POST", "/v1/completions")
        .expect(0)
        .create_async()
        .await;

    let err = prober(&server, &["m1"], &["v1/chat/completions", "v1/completions"])
        .complete("text", OptimizeMode::Basic)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Server { status: 503, .. }));
    assert!(err.is_retryable());
    broken.assert_async().await;
    never.assert_async().await;
}

#[tokio::test]
async fn html_body_is_skipped_and_plain_text_accepted() {
    let mut server = Server::new_async().await;
    let html = server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_header("content-type", "text/html; charset=utf-8")
        .with_body("<!DOCTYPE html><html><body>Welcome</body></html>")
        .expect(1)
        .create_async()
        .await;
    let plain = server
        .mock("POST", "/api/optimize")
        .match_body(Matcher::PartialJson(
            json!({"text": "原始文本", "optimization_type": "strict"}),
        ))
        .with_status(200)
        .with_header("content-type", "text/plain")
        .with_body("  改写后的文本  \n")
        .expect(1)
        .create_async()
        .await;

    let out = prober(&server, &["m1"], &["v1/chat/completions", "api/optimize"])
        .complete("原始文本", OptimizeMode::Strict)
        .await
        .unwrap();

    assert_eq!(out.text(), "改写后的文本");
    html.assert_async().await;
    plain.assert_async().await;
}

#[tokio::test]
async fn fallback_fields_are_read_in_order() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("POST", "/api/optimize")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"result": "from result", "optimized_text": "from optimized_text"}).to_string())
        .create_async()
        .await;

    let out = prober(&server, &["m1"], &["api/optimize"])
        .complete("text", OptimizeMode::Basic)
        .await
        .unwrap();
    assert_eq!(out.text(), "from optimized_text");
}

#[tokio::test]
async fn exhausted_endpoints_return_last_error() {
    let mut server = Server::new_async().await;
    let _a = server
        .mock("POST", "/v1/chat/completions")
        .with_status(404)
        .create_async()
        .await;
    let _b = server
        .mock("POST", "/v1/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id": "cmpl-1", "choices": []}"#)
        .create_async()
        .await;

    let err = prober(&server, &["m1"], &["v1/chat/completions", "v1/completions"])
        .complete("text", OptimizeMode::Basic)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidResponse { .. }));
}

#[tokio::test]
async fn unreachable_host_is_a_network_error() {
    let settings = ProviderSettings {
        models: vec!["m1".into()],
        endpoints: vec!["v1/chat/completions".into(), "v1/completions".into()],
        request_timeout_ms: 2_000,
        ..ProviderSettings::default()
    };
    let prober = ProviderProber::new(
        &settings,
        Arc::new(StaticConfig::new(KEY, "http://127.0.0.1:1")),
        LocalRewriter::new(),
    )
    .unwrap();

    let err = prober
        .complete("text", OptimizeMode::Basic)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Transport(_)));
    assert!(err.is_retryable());
}
