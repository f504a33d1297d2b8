//! Mock imageboard fixtures

use chan_dl::{ChanDownloader, Config};
use serde_json::{Value, json};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Host name the mock catalog site answers to
pub const MOCK_HOST: &str = "imageboard-a";

/// Downloader whose catalog site is the mock server, writing into a fresh tempdir
pub fn mock_downloader(server: &MockServer, concurrency: usize) -> (ChanDownloader, TempDir) {
    let temp_dir = tempfile::tempdir().expect("failed to create temp dir");

    let mut config = Config::default();
    config.download.output_dir = temp_dir.path().to_path_buf();
    config.download.concurrency = concurrency;
    config.sites.catalog.hosts = vec![MOCK_HOST.to_string()];
    config.sites.catalog.api_base = server.uri();
    config.sites.catalog.media_base = server.uri();

    let downloader = ChanDownloader::new(config).expect("mock config must be valid");
    (downloader, temp_dir)
}

/// Catalog post JSON with a primary attachment `{tim}{ext}`
pub fn post_with_file(no: u64, tim: u64, ext: &str) -> Value {
    json!({ "no": no, "tim": tim, "ext": ext })
}

/// Serve a catalog thread document for `/{board}/thread/{thread}.json`
pub async fn mount_thread(server: &MockServer, board: &str, thread: u64, posts: Vec<Value>) {
    Mock::given(method("GET"))
        .and(path(format!("/{board}/thread/{thread}.json")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "posts": posts })))
        .expect(1)
        .mount(server)
        .await;
}

/// Serve a catalog listing page for `/{board}/{page}.json`
pub async fn mount_page(server: &MockServer, board: &str, page: u32, threads: &[u64]) {
    let threads: Vec<Value> = threads
        .iter()
        .map(|no| json!({ "posts": [ { "no": no } ] }))
        .collect();
    Mock::given(method("GET"))
        .and(path(format!("/{board}/{page}.json")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "threads": threads })))
        .mount(server)
        .await;
}

/// Serve `body` as the media file at `/{board}/{name}`, exactly once
pub async fn mount_media(server: &MockServer, board: &str, name: &str, body: Vec<u8>) {
    Mock::given(method("GET"))
        .and(path(format!("/{board}/{name}")))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body))
        .expect(1)
        .mount(server)
        .await;
}
