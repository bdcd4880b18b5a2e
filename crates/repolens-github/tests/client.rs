//! Integration tests for `GithubClient` using wiremock HTTP mocks.

use repolens_github::{GithubClient, GithubError};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> GithubClient {
    GithubClient::with_base_url(None, 5, base_url).expect("client construction should not fail")
}

// ---------------------------------------------------------------------------
// search_repositories
// ---------------------------------------------------------------------------

#[tokio::test]
async fn search_repositories_sends_ranked_query_and_maps_items() {
    let server = MockServer::start().await;

    let body = json!({
        "total_count": 2,
        "items": [
            {
                "owner": { "login": "acme" },
                "name": "widget",
                "html_url": "https://github.com/acme/widget",
                "description": "A widget",
                "language": "Rust"
            },
            {
                "owner": { "login": "globex" },
                "name": "gizmo",
                "html_url": "https://github.com/globex/gizmo",
                "description": null,
                "language": null
            }
        ]
    });

    Mock::given(method("GET"))
        .and(path("/search/repositories"))
        .and(query_param("q", "Vector Database"))
        .and(query_param("sort", "stars"))
        .and(query_param("order", "desc"))
        .and(query_param("per_page", "5"))
        .and(query_param("page", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let candidates = client
        .search_repositories("Vector Database", 3)
        .await
        .expect("search should succeed");

    assert_eq!(candidates.len(), 2);
    assert_eq!(candidates[0].full_name().as_deref(), Some("acme/widget"));
    assert_eq!(candidates[0].declared_language.as_deref(), Some("Rust"));
    assert_eq!(candidates[1].full_name().as_deref(), Some("globex/gizmo"));
    assert!(candidates[1].description.is_none());
}

#[tokio::test]
async fn search_repositories_empty_items_yields_empty_vec() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/repositories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&json!({ "items": [] })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let candidates = client.search_repositories("Rust", 1).await.expect("search");
    assert!(candidates.is_empty());
}

#[tokio::test]
async fn search_repositories_surfaces_rate_limit_as_http_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/repositories"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .search_repositories("Rust", 1)
        .await
        .expect_err("403 should fail");
    assert!(matches!(err, GithubError::Http(_)), "got {err:?}");
}

#[tokio::test]
async fn search_repositories_malformed_body_is_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/repositories"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .search_repositories("Rust", 1)
        .await
        .expect_err("html should fail");
    assert!(matches!(err, GithubError::Deserialize { .. }), "got {err:?}");
}

#[tokio::test]
async fn token_is_sent_as_bearer_auth() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/repositories"))
        .and(header("authorization", "Bearer ghp_test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&json!({ "items": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let client = GithubClient::with_base_url(Some("ghp_test"), 5, &server.uri())
        .expect("client construction should not fail");
    client.search_repositories("Rust", 1).await.expect("search");
}

// ---------------------------------------------------------------------------
// fetch_readme
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetch_readme_decodes_wrapped_base64() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/acme/widget/readme"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&json!({
            "encoding": "base64",
            "content": "IyBXaWRn\nZXQKQSB0\nb29s\n"
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let readme = client.fetch_readme("acme", "widget").await.expect("fetch");
    assert_eq!(readme.as_deref(), Some("# Widget\nA tool"));
}

#[tokio::test]
async fn fetch_readme_not_found_is_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/acme/empty/readme"))
        .respond_with(ResponseTemplate::new(404).set_body_json(&json!({ "message": "Not Found" })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let readme = client.fetch_readme("acme", "empty").await.expect("404 is not an error");
    assert!(readme.is_none());
}

#[tokio::test]
async fn fetch_readme_undecodable_content_is_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/acme/widget/readme"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&json!({
            "content": "***garbage***"
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let readme = client.fetch_readme("acme", "widget").await.expect("fetch");
    assert!(readme.is_none());
}

#[tokio::test]
async fn fetch_readme_server_error_is_http_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/acme/widget/readme"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .fetch_readme("acme", "widget")
        .await
        .expect_err("502 should fail");
    assert!(matches!(err, GithubError::Http(_)));
}
