//! Shared helpers for downloader tests.

use crate::config::Config;
use crate::downloader::ChanDownloader;
use crate::types::{Attachment, BackendKind, File, Post};
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::MockServer;

/// Downloader whose catalog site is served by `server` under host `imageboard-a`
///
/// Returns the tempdir holding the output directory; keep it alive.
pub(crate) fn create_test_downloader(
    server: &MockServer,
    concurrency: usize,
) -> (ChanDownloader, TempDir) {
    let temp_dir = tempfile::tempdir().unwrap();

    let mut config = Config::default();
    config.download.output_dir = temp_dir.path().join("out");
    config.download.concurrency = concurrency;
    config.sites.catalog.hosts = vec!["imageboard-a".to_string()];
    config.sites.catalog.api_base = server.uri();
    config.sites.catalog.media_base = server.uri();

    (ChanDownloader::new(config).unwrap(), temp_dir)
}

/// Catalog file `{name}.{ext}` on board `ex`, served from `media_base`
pub(crate) fn catalog_file(media_base: &str, name: &str, ext: &str) -> File {
    let mut post = Post::new(BackendKind::Catalog, Arc::from(media_base), "ex", "123");
    post.primary = Some(Attachment::new(name, ext));
    post.extract_files(false).remove(0)
}
