//! Ollama client tests with a mocked Ollama server.

#![cfg(feature = "ollama")]

use licita::llm::{LLMClient, invoke_structured, ollama::OllamaClient};
use licita::types::{AppError, QueryList};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Create a mock Ollama chat completion response
fn mock_chat_response(content: &str) -> serde_json::Value {
    json!({
        "model": "llama3.1:8b",
        "created_at": "2025-01-01T00:00:00Z",
        "message": {
            "role": "assistant",
            "content": content
        },
        "done": true,
        "total_duration": 1000,
        "load_duration": 100,
        "prompt_eval_count": 10,
        "prompt_eval_duration": 100,
        "eval_count": 20,
        "eval_duration": 200
    })
}

fn client(server: &MockServer, model: &str) -> OllamaClient {
    OllamaClient::new(server.uri(), model.to_string()).expect("client builds")
}

#[tokio::test]
async fn test_generate_returns_message_content() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_partial_json(json!({"model": "deepseek-r1:8b"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(mock_chat_response("<think>ok</think>Resposta [1]")),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let answer = client(&mock_server, "deepseek-r1:8b")
        .generate("Como elaborar um ETP?")
        .await
        .expect("generate succeeds");

    assert_eq!(answer, "<think>ok</think>Resposta [1]");
}

#[tokio::test]
async fn test_structured_request_sends_schema_as_format() {
    let mock_server = MockServer::start().await;
    let schema = serde_json::to_value(schemars::schema_for!(QueryList)).expect("schema");

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_partial_json(json!({ "format": schema })))
        .respond_with(ResponseTemplate::new(200).set_body_json(mock_chat_response(
            r#"{"queries": ["DFD Lei 14.133", "DFD Decreto 1.525"]}"#,
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let ollama = client(&mock_server, "llama3.1:8b");
    let list: QueryList = invoke_structured(&ollama, "Como elaborar um DFD?")
        .await
        .expect("structured output parses");

    assert_eq!(list.queries, vec!["DFD Lei 14.133", "DFD Decreto 1.525"]);

    let requests = mock_server.received_requests().await.expect("recorded requests");
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).expect("JSON body");
    assert!(body["format"].is_object(), "format was {}", body["format"]);
    assert_eq!(body["format"]["required"], json!(["queries"]));
}

#[tokio::test]
async fn test_structured_output_mismatch() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(mock_chat_response(r#"{"query": "DFD"}"#)),
        )
        .mount(&mock_server)
        .await;

    let ollama = client(&mock_server, "llama3.1:8b");
    let err = invoke_structured::<QueryList>(&ollama, "Como elaborar um DFD?")
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Generation(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_server_error_is_llm_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(500).set_body_string("model not found"))
        .mount(&mock_server)
        .await;

    let err = client(&mock_server, "llama3.1:8b")
        .generate("Olá")
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::LLM(_)), "got {:?}", err);
}
