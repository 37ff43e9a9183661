/// HTTP round trips through the real `ureq` client against a mockito server.
use growthdash::api::{ApiClient, ApiError, Transport};
use growthdash::chat::ChatSession;
use growthdash::health;
use growthdash::modules::{FormInput, ModuleKind, market};
use mockito::Matcher;
use serde_json::json;

#[test]
fn post_sends_json_to_root_plus_endpoint() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/api/market/sentiment")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(json!({ "feedback": "great product" })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"sentiment":"positive","confidence":0.87,"summary":"Customers love it"}"#)
        .create();

    let client = ApiClient::new(&server.url(), "/api");
    let form = FormInput::new().with(market::SENTIMENT_INPUT, "great product");
    let mut panel = ModuleKind::Sentiment.panel();

    ModuleKind::Sentiment.submit(&client, &form, &mut panel);

    mock.assert();
    assert_eq!(
        panel.result().and_then(|m| m.get("Confidence")),
        Some("87.0%")
    );
}

#[test]
fn non_2xx_post_is_request_failed() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/api/pricing/optimize")
        .with_status(500)
        .with_body("boom")
        .create();

    let client = ApiClient::new(&server.url(), "/api");
    let result = client.post_json("/pricing/optimize", &json!({}));

    mock.assert();
    let err = result.unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert!(err.to_string().starts_with("HTTP 500"), "{err}");
}

#[test]
fn non_2xx_module_call_renders_prefixed_error() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("POST", "/api/compliance/check")
        .with_status(404)
        .create();

    let client = ApiClient::new(&server.url(), "/api");
    let mut panel = ModuleKind::Compliance.panel();
    ModuleKind::Compliance.submit(&client, &FormInput::new(), &mut panel);

    assert!(
        panel
            .error()
            .is_some_and(|e| e.starts_with("Compliance check failed: HTTP 404")),
        "{:?}",
        panel.error()
    );
}

#[test]
fn unparseable_body_is_decode_error() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("POST", "/api/chat")
        .with_status(200)
        .with_body("<html>not json</html>")
        .create();

    let client = ApiClient::new(&server.url(), "/api");
    let result = client.post_json("/chat", &json!({ "message": "hi", "history": [] }));

    assert!(matches!(result, Err(ApiError::Decode(_))));
}

#[test]
fn health_get_parses_body_regardless_of_status() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/api/health")
        .with_status(503)
        .with_header("content-type", "application/json")
        .with_body(r#"{"status":"degraded"}"#)
        .create();

    let client = ApiClient::new(&server.url(), "/api");
    let report = health::check_once(&client);

    mock.assert();
    assert_eq!(report.outcome, Ok(json!({ "status": "degraded" })));
}

#[test]
fn chat_round_trip_over_http() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/api/chat")
        .match_body(Matcher::Json(json!({ "message": "hello", "history": [] })))
        .with_status(200)
        .with_body(r#"{"response":"Hi there","status":"success"}"#)
        .create();

    let client = ApiClient::new(&server.url(), "/api");
    let mut session = ChatSession::new();
    let mut input = "hello".to_string();
    session.submit(&client, &mut input);

    mock.assert();
    assert_eq!(session.transcript().len(), 2);
    assert_eq!(session.log()[1].text, "Hi there");
}

#[test]
fn custom_api_root_is_respected() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/v2/personalize")
        .with_status(200)
        .with_body("{}")
        .create();

    let client = ApiClient::new(&format!("{}/", server.url()), "/v2");
    client
        .post_json("/personalize", &json!({ "user_profile": "x" }))
        .unwrap();

    mock.assert();
}
