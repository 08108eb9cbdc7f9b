//! Tavily client tests against a mocked Tavily API.

use licita::search::{SearchProvider, tavily::TavilySearch};
use licita::types::AppError;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> TavilySearch {
    TavilySearch::new(format!("{}/", server.uri()), "tvly-test".to_string())
        .expect("client builds")
}

#[tokio::test]
async fn test_search_returns_hits_in_rank_order() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .and(header("authorization", "Bearer tvly-test"))
        .and(body_partial_json(json!({
            "query": "DFD site:gov.br",
            "max_results": 2,
            "include_raw_content": false
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "query": "DFD site:gov.br",
            "results": [
                {"title": "Lei 14.133", "url": "https://www.planalto.gov.br/l14133", "content": "...", "score": 0.9},
                {"title": "Decreto 1.525", "url": "https://www.sefaz.mt.gov.br/d1525", "content": "...", "score": 0.8}
            ]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let hits = client(&mock_server)
        .search("DFD site:gov.br", 2)
        .await
        .expect("search succeeds");

    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].title, "Lei 14.133");
    assert_eq!(hits[1].url, "https://www.sefaz.mt.gov.br/d1525");
}

#[tokio::test]
async fn test_search_truncates_to_max_results() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                {"title": "a", "url": "https://gov.br/a"},
                {"title": "b", "url": "https://gov.br/b"},
                {"title": "c", "url": "https://gov.br/c"}
            ]
        })))
        .mount(&mock_server)
        .await;

    let hits = client(&mock_server).search("q", 1).await.expect("search");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].url, "https://gov.br/a");
}

#[tokio::test]
async fn test_search_http_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "unauthorized"})))
        .mount(&mock_server)
        .await;

    let err = client(&mock_server).search("q", 2).await.unwrap_err();
    assert!(matches!(err, AppError::Search(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_extract_returns_raw_content() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/extract"))
        .and(body_partial_json(json!({"urls": ["https://www.planalto.gov.br/l14133"]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                {"url": "https://www.planalto.gov.br/l14133", "raw_content": "Art. 1º Esta Lei estabelece normas gerais..."}
            ],
            "failed_results": []
        })))
        .mount(&mock_server)
        .await;

    let content = client(&mock_server)
        .extract("https://www.planalto.gov.br/l14133")
        .await
        .expect("extract succeeds");

    assert_eq!(
        content.as_deref(),
        Some("Art. 1º Esta Lei estabelece normas gerais...")
    );
}

#[tokio::test]
async fn test_extract_empty_results_is_none() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/extract"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [],
            "failed_results": [{"url": "https://gov.br/x", "error": "timeout"}]
        })))
        .mount(&mock_server)
        .await;

    let content = client(&mock_server)
        .extract("https://gov.br/x")
        .await
        .expect("extract succeeds");
    assert!(content.is_none());
}

#[tokio::test]
async fn test_extract_blank_content_is_none() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/extract"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{"url": "https://gov.br/x", "raw_content": "   \n"}]
        })))
        .mount(&mock_server)
        .await;

    let content = client(&mock_server).extract("https://gov.br/x").await.expect("extract");
    assert!(content.is_none());
}

#[tokio::test]
async fn test_extract_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/extract"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let err = client(&mock_server).extract("https://gov.br/x").await.unwrap_err();
    assert!(matches!(err, AppError::Extraction(_)), "got {:?}", err);
}
