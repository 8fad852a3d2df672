//! Gemini provider against a local mock server.

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use sdg_classifier::provider::{ClassificationProvider, GeminiProvider};
use sdg_classifier::{Classifier, ClassifierError, ClassifierSettings};

const GENERATE_PATH: &str = "/v1beta/models/gemini-test:generateContent";

fn gemini_body(text: &str) -> serde_json::Value {
    json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": text}]},
            "finishReason": "STOP"
        }],
        "usageMetadata": {"promptTokenCount": 812, "candidatesTokenCount": 64, "totalTokenCount": 876}
    })
}

fn provider(server: &MockServer) -> GeminiProvider {
    GeminiProvider::new("test-key", "gemini-test", server.uri()).unwrap()
}

#[tokio::test]
async fn sends_key_and_returns_text_with_usage() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(header("x-goog-api-key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_body("{\"impacts\": []}")))
        .expect(1)
        .mount(&server)
        .await;

    let reply = provider(&server).complete("system", "user").await.unwrap();
    assert_eq!(reply.text, "{\"impacts\": []}");
    let usage = reply.usage.unwrap();
    assert_eq!(usage.input, 812);
    assert_eq!(usage.output, 64);
}

#[tokio::test]
async fn rate_limit_maps_to_rate_limited() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let err = provider(&server).complete("s", "u").await.unwrap_err();
    assert!(matches!(err, ClassifierError::RateLimited));
}

#[tokio::test]
async fn server_error_maps_to_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .mount(&server)
        .await;

    let err = provider(&server).complete("s", "u").await.unwrap_err();
    assert!(matches!(err, ClassifierError::Http { status: 503, ref body } if body == "overloaded"));
}

#[tokio::test]
async fn missing_candidates_is_a_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"candidates": []})))
        .mount(&server)
        .await;

    let err = provider(&server).complete("s", "u").await.unwrap_err();
    assert!(matches!(err, ClassifierError::ResponseParse(_)));
}

#[tokio::test]
async fn classifier_end_to_end_over_http() {
    let server = MockServer::start().await;
    let reply = r#"{"impacts": [
        {"sdg_number": 6, "relevance_score": 88, "justification": "Water purification for arid areas."},
        {"sdg_number": 3, "relevance_score": 61, "justification": "Reduces waterborne disease."}
    ]}"#;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_body(reply)))
        .mount(&server)
        .await;

    let classifier = Classifier::new(
        ClassifierSettings::default(),
        Some(Arc::new(provider(&server)) as Arc<dyn ClassificationProvider>),
    );

    let impacts = classifier
        .classify(
            "Low-cost water purification",
            "Developing filters for arid and semi-arid lands.",
        )
        .await;
    assert_eq!(impacts.len(), 2);
    assert_eq!(impacts[0].goal_number.get(), 6);
    assert_eq!(impacts[1].score, 61);
}

#[tokio::test]
async fn unreachable_server_degrades_to_empty() {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let gemini = GeminiProvider::new("test-key", "gemini-test", uri).unwrap();
    let classifier = Classifier::new(
        ClassifierSettings::default(),
        Some(Arc::new(gemini) as Arc<dyn ClassificationProvider>),
    );

    assert!(classifier.classify("t", "d").await.is_empty());
    assert_eq!(classifier.stats().failures, 1);
}
