//! Download facade and pipeline.
//!
//! - [`ChanDownloader`] - resolves an address, enumerates its files, downloads them
//! - [`progress`] - shared run accounting
//! - `pipeline` - admission gate and one task per file
//! - `fetch` - a single attachment fetch

mod fetch;
mod pipeline;
pub mod progress;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
pub(crate) mod test_helpers;

pub use fetch::destination_path;
pub use progress::Progress;

use crate::backend::Backend;
use crate::config::Config;
use crate::enumeration::Source;
use crate::error::Result;
use crate::resolver::{parse_address, resolve};
use crate::types::{DownloadOutcome, File, ProgressSnapshot, Summary};
use pipeline::DownloadPipeline;
use std::sync::Arc;
use tracing::info;

/// Imageboard attachment downloader
///
/// Owns the validated configuration, the HTTP client shared by every backend and
/// fetch, and the admission gate limiting simultaneous downloads.
pub struct ChanDownloader {
    config: Arc<Config>,
    client: reqwest::Client,
    pipeline: DownloadPipeline,
}

impl ChanDownloader {
    /// Validate `config` and build the shared HTTP client
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .timeout(config.download.request_timeout)
            .user_agent(config.download.user_agent.as_str())
            .build()?;

        let pipeline = DownloadPipeline::new(
            client.clone(),
            config.download.concurrency,
            config.download.output_dir.clone(),
        );

        Ok(Self {
            config: Arc::new(config),
            client,
            pipeline,
        })
    }

    /// Active configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Resolve `address` to the board or thread it names
    ///
    /// Nothing is fetched. Callers that want to confirm board-wide downloads can
    /// check [`Source::is_board`] before going further.
    pub fn resolve(&self, address: &str) -> Result<Source> {
        let url = parse_address(address)?;
        let resolved = resolve(&url, &self.config.sites)?;
        let backend = Backend::new(
            resolved.backend,
            self.config.sites.get(resolved.backend),
            self.client.clone(),
        );
        Ok(Source::new(Arc::new(backend), resolved))
    }

    /// Every file of `source`, honoring the configured `exclude_extras`
    pub async fn list_files(&self, source: &Source) -> Result<Vec<File>> {
        source.list_files(self.config.download.exclude_extras).await
    }

    /// Download `files`, reporting each outcome as it completes
    pub async fn download<F>(
        &self,
        files: &[File],
        progress: Arc<Progress>,
        on_outcome: F,
    ) -> Summary
    where
        F: FnMut(&DownloadOutcome, ProgressSnapshot),
    {
        self.pipeline.run(files, progress, on_outcome).await
    }

    /// Resolve, enumerate and download `address` in one go
    ///
    /// Resolution and enumeration failures abort before anything is downloaded,
    /// as does an output directory that cannot be created.
    pub async fn run<F>(&self, address: &str, on_outcome: F) -> Result<Summary>
    where
        F: FnMut(&DownloadOutcome, ProgressSnapshot),
    {
        let source = self.resolve(address)?;
        let files = self.list_files(&source).await?;
        info!(
            address,
            board = source.board(),
            files = files.len(),
            "enumeration complete"
        );

        tokio::fs::create_dir_all(self.config.output_dir()).await?;

        Ok(self
            .download(&files, Arc::new(Progress::new()), on_outcome)
            .await)
    }
}
