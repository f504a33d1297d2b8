use super::*;
use crate::types::Attachment;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn site(server: &MockServer, max_pages: u32) -> SiteConfig {
    SiteConfig {
        hosts: vec!["imageboard-a".to_string()],
        api_base: server.uri(),
        media_base: format!("{}/media", server.uri()),
        max_pages,
    }
}

fn backend(kind: BackendKind, server: &MockServer) -> Backend {
    Backend::new(kind, &site(server, 10), reqwest::Client::new())
}

// Catalog flavor

#[tokio::test]
async fn test_catalog_page_takes_first_post_of_each_summary() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ex/1.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "threads": [
                { "posts": [ { "no": 111 }, { "no": 112 } ] },
                { "posts": [] },
                { "posts": [ { "no": 222 } ] }
            ]
        })))
        .mount(&server)
        .await;

    let backend = backend(BackendKind::Catalog, &server);
    let threads = backend.adapter().list_page("ex", 1).await.unwrap();
    assert_eq!(threads, vec!["111", "222"]);
}

#[tokio::test]
async fn test_catalog_missing_page_is_end_of_listing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ex/4.json"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let backend = backend(BackendKind::Catalog, &server);
    let threads = backend.adapter().list_page("ex", 4).await.unwrap();
    assert!(threads.is_empty());
}

#[tokio::test]
async fn test_catalog_thread_posts() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ex/thread/123.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "posts": [
                { "no": 123, "tim": 1546293948883u64, "ext": ".png" },
                { "no": 124 },
                { "no": 125, "tim": 1546293948999u64, "ext": ".webm",
                  "extra": [ { "tim": 1546293949000u64, "ext": ".jpg" } ] }
            ]
        })))
        .mount(&server)
        .await;

    let backend = backend(BackendKind::Catalog, &server);
    let posts = backend.adapter().list_posts("ex", "123").await.unwrap();
    assert_eq!(posts.len(), 3);
    assert_eq!(
        posts[0].primary,
        Some(Attachment::new("1546293948883", "png"))
    );
    assert!(posts[1].primary.is_none());
    assert_eq!(posts[2].extras, vec![Attachment::new("1546293949000", "jpg")]);

    let files = posts[0].extract_files(false);
    assert_eq!(
        files[0].url(),
        format!("{}/media/ex/1546293948883.png", server.uri())
    );
}

#[tokio::test]
async fn test_catalog_thread_server_error_aborts() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ex/thread/123.json"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let backend = backend(BackendKind::Catalog, &server);
    match backend.adapter().list_posts("ex", "123").await {
        Err(EnumerationError::Status { status, url }) => {
            assert_eq!(status, 500);
            assert!(url.ends_with("/ex/thread/123.json"));
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_catalog_thread_not_found_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ex/thread/9.json"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let backend = backend(BackendKind::Catalog, &server);
    assert!(matches!(
        backend.adapter().list_posts("ex", "9").await,
        Err(EnumerationError::Status { status: 404, .. })
    ));
}

#[tokio::test]
async fn test_malformed_page_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ex/1.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let backend = backend(BackendKind::Catalog, &server);
    assert!(matches!(
        backend.adapter().list_page("ex", 1).await,
        Err(EnumerationError::Decode { .. })
    ));
}

#[tokio::test]
async fn test_unreachable_host_is_transport_error() {
    // nothing listens on port 1
    let site = SiteConfig {
        hosts: vec!["imageboard-a".to_string()],
        api_base: "http://127.0.0.1:1".to_string(),
        media_base: "http://127.0.0.1:1".to_string(),
        max_pages: 10,
    };

    let backend = Backend::new(BackendKind::Catalog, &site, reqwest::Client::new());
    assert!(matches!(
        backend.adapter().list_page("ex", 1).await,
        Err(EnumerationError::Transport { .. })
    ));
}

// Thread-API flavor

#[tokio::test]
async fn test_thread_api_posts_with_string_ids_and_extra_files() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tech/res/555.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "posts": [
                { "no": 555, "tim": "a1b2c3", "ext": ".jpg",
                  "extra_files": [
                      { "tim": "a1b2c4", "ext": ".png" },
                      { "tim": "a1b2c5", "ext": ".gif" }
                  ] },
                { "no": 556, "extra_files": [ { "tim": "d4", "ext": ".mp4" } ] }
            ]
        })))
        .mount(&server)
        .await;

    let backend = backend(BackendKind::ThreadApi, &server);
    let adapter = backend.adapter();
    assert_eq!(adapter.kind(), BackendKind::ThreadApi);
    assert_eq!(
        adapter.thread_url("tech", "555"),
        format!("{}/tech/res/555.json", server.uri())
    );

    let posts = adapter.list_posts("tech", "555").await.unwrap();
    assert_eq!(posts[0].extract_files(true).len(), 1);
    assert_eq!(posts[0].extract_files(false).len(), 3);
    assert_eq!(posts[1].extract_files(false).len(), 1);

    let file = &posts[0].extract_files(false)[1];
    assert_eq!(
        file.url(),
        format!("{}/media/tech/src/a1b2c4.png", server.uri())
    );
}

#[tokio::test]
async fn test_incomplete_extra_entries_are_dropped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tech/res/600.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "posts": [
                { "no": 600, "tim": "a1", "ext": ".jpg",
                  "extra_files": [
                      { "tim": "a2" },
                      { "ext": ".png" },
                      { "tim": null, "ext": ".gif" },
                      { "tim": "a3", "ext": ".webm" }
                  ] },
                { "no": 601, "tim": "b1" }
            ]
        })))
        .mount(&server)
        .await;

    let backend = backend(BackendKind::ThreadApi, &server);
    let posts = backend.adapter().list_posts("tech", "600").await.unwrap();
    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0].primary, Some(Attachment::new("a1", "jpg")));
    assert_eq!(posts[0].extras, vec![Attachment::new("a3", "webm")]);
    assert!(posts[1].primary.is_none());
}

#[tokio::test]
async fn test_thread_api_page_listing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tech/2.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "threads": [ { "posts": [ { "no": 9 } ] } ]
        })))
        .mount(&server)
        .await;

    let backend = backend(BackendKind::ThreadApi, &server);
    assert_eq!(
        backend.adapter().list_page("tech", 2).await.unwrap(),
        vec!["9"]
    );
}

// HTML scrape

#[tokio::test]
async fn test_html_listing_and_thread() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/b/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<div class="op"><div class="post" id="777"></div></div>"#,
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/read.php"))
        .and(query_param("b", "b"))
        .and(query_param("t", "777"))
        .and(query_param("p", "p1--"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<div class="post" id="777">
                <span class="file_size"><a href="/b/src/100.png">100.png</a></span>
                <span class="multithumb"><a href="/b/src/101.jpg">t</a></span>
            </div>"#,
        ))
        .mount(&server)
        .await;

    let backend = backend(BackendKind::Html, &server);
    let adapter = backend.adapter();
    assert_eq!(adapter.list_page("b", 1).await.unwrap(), vec!["777"]);

    let posts = adapter.list_posts("b", "777").await.unwrap();
    assert_eq!(posts.len(), 1);
    let files = posts[0].extract_files(false);
    assert_eq!(files.len(), 2);
    assert_eq!(files[0].url(), format!("{}/media/b/src/100.png", server.uri()));
    assert_eq!(files[1].file_name(), "101.jpg");
}

#[tokio::test]
async fn test_html_thread_error_status_aborts() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/read.php"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let backend = backend(BackendKind::Html, &server);
    assert!(matches!(
        backend.adapter().list_posts("b", "777").await,
        Err(EnumerationError::Status { status: 503, .. })
    ));
}

#[test]
fn test_backend_dispatch_matches_kind() {
    let site = SiteConfig {
        hosts: vec!["x".into()],
        api_base: "https://x.example".into(),
        media_base: "https://x.example".into(),
        max_pages: 3,
    };
    for kind in [BackendKind::Catalog, BackendKind::ThreadApi, BackendKind::Html] {
        let backend = Backend::new(kind, &site, reqwest::Client::new());
        assert_eq!(backend.adapter().kind(), kind);
        assert_eq!(backend.adapter().max_pages(), 3);
    }
}
