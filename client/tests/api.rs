//! Integration tests for the service client against a mock HTTP server.

use url::Url;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use labelens_client::{AnalysisPayload, ApiClient, ApiError, ChatRequest};
use labelens_types::{ChatMessage, Impact};

async fn client_for(server: &MockServer) -> ApiClient {
    ApiClient::new(Url::parse(&server.uri()).expect("mock server uri parses"))
}

fn analysis_body() -> serde_json::Value {
    serde_json::json!({
        "health_score": 42,
        "summary": "{neg}High sugar{/neg}",
        "key_points": [{
            "ingredient": "Sugar",
            "impact": "negative",
            "why_it_matters": "Added sugar drives the score down",
            "certainty_level": "high"
        }],
        "decision_guidance": ["Look for unsweetened options"]
    })
}

#[tokio::test]
async fn analyze_sends_single_field_body_and_parses_result() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/analyze"))
        .and(body_json(serde_json::json!({"ingredients": "sugar, salt"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(analysis_body()))
        .expect(1)
        .mount(&server)
        .await;

    let payload = AnalysisPayload::ingredients("sugar, salt").expect("non-empty");
    let result = client_for(&server)
        .await
        .analyze(&payload)
        .await
        .expect("analysis succeeds");

    assert_eq!(result.health_score, 42);
    assert_eq!(result.key_points[0].impact, Impact::Negative);
}

#[tokio::test]
async fn analyze_maps_error_body_with_details() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/analyze"))
        .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
            "error": "bad_image",
            "details": "Image unreadable"
        })))
        .mount(&server)
        .await;

    let payload = AnalysisPayload::sample("sample_01").expect("non-empty");
    let err = client_for(&server)
        .await
        .analyze(&payload)
        .await
        .expect_err("service fault");

    assert!(matches!(err, ApiError::Service { .. }));
    assert_eq!(err.user_message(), "Image unreadable");
}

#[tokio::test]
async fn body_reported_fault_wins_over_success_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/analyze"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"error": "model_unavailable"})),
        )
        .mount(&server)
        .await;

    let payload = AnalysisPayload::ingredients("water").expect("non-empty");
    let err = client_for(&server)
        .await
        .analyze(&payload)
        .await
        .expect_err("fault in body");

    assert_eq!(err.user_message(), "model_unavailable");
}

#[tokio::test]
async fn non_json_error_status_maps_to_service_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/analyze"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let payload = AnalysisPayload::ingredients("water").expect("non-empty");
    let err = client_for(&server)
        .await
        .analyze(&payload)
        .await
        .expect_err("status error");

    match err {
        ApiError::Service { error, details } => {
            assert!(error.contains("502"), "status in message: {error}");
            assert!(details.is_none());
        }
        other => panic!("expected Service error, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_success_body_is_a_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/analyze"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let payload = AnalysisPayload::ingredients("water").expect("non-empty");
    let err = client_for(&server)
        .await
        .analyze(&payload)
        .await
        .expect_err("parse failure");

    assert!(matches!(err, ApiError::Parse(_)));
}

#[tokio::test]
async fn chat_carries_history_and_context_on_the_wire() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(body_json(serde_json::json!({
            "message": "Is this safe?",
            "history": [
                {"role": "user", "parts": ["What was scanned?"]},
                {"role": "model", "parts": ["A soda."]},
            ],
            "context": "{\"health_score\":20}",
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"reply": "In moderation."})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let reply = client_for(&server)
        .await
        .chat(ChatRequest {
            message: "Is this safe?".to_string(),
            history: vec![
                ChatMessage::user("What was scanned?"),
                ChatMessage::model("A soda."),
            ],
            context: Some("{\"health_score\":20}".to_string()),
        })
        .await
        .expect("chat succeeds");

    assert_eq!(reply, "In moderation.");
}

#[tokio::test]
async fn chat_without_context_sends_null() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(body_json(serde_json::json!({
            "message": "hello",
            "history": [],
            "context": null,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"reply": "hi"})))
        .expect(1)
        .mount(&server)
        .await;

    let reply = client_for(&server)
        .await
        .chat(ChatRequest {
            message: "hello".to_string(),
            history: vec![],
            context: None,
        })
        .await
        .expect("chat succeeds");

    assert_eq!(reply, "hi");
}

#[tokio::test]
async fn samples_lists_products() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/samples"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"id": "sample_01", "name": "Biscuits", "ingredients": "wheat, sugar, palm oil"},
            {"id": "sample_04", "name": "Soda"},
        ])))
        .mount(&server)
        .await;

    let samples = client_for(&server)
        .await
        .samples()
        .await
        .expect("listing succeeds");

    assert_eq!(samples.len(), 2);
    assert_eq!(samples[0].id, "sample_01");
    assert_eq!(samples[1].ingredients, None);
}
