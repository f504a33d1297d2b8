//! # chan-dl
//!
//! Library for downloading every attachment of an imageboard thread or board.
//!
//! ## Overview
//!
//! An address is resolved to one of three backends, which differ only in how
//! they enumerate threads and posts:
//! - **Catalog API** - paginated JSON catalog with per-thread JSON documents
//! - **Thread API** - per-thread JSON with a list of extra files per post
//! - **HTML scrape** - listing and thread pages parsed from markup
//!
//! The resulting files are downloaded concurrently, at most `concurrency` at a
//! time, into `{output_dir}/{board}/`. Existing files are never overwritten.
//!
//! ## Quick Start
//!
//! ```no_run
//! use chan_dl::{ChanDownloader, Config};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut config = Config::default();
//!     config.download.concurrency = 4;
//!
//!     let downloader = ChanDownloader::new(config)?;
//!     let summary = downloader
//!         .run("https://boards.4chan.org/g/thread/123", |outcome, progress| {
//!             println!("[{}/{}] {}", progress.done, progress.total, outcome.file);
//!         })
//!         .await?;
//!
//!     println!("{} files, {} bytes", summary.succeeded, summary.bytes);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Backend adapters (catalog API, thread API, HTML scrape)
pub mod backend;
/// Configuration types
pub mod config;
/// Download facade and pipeline
pub mod downloader;
/// Board and thread file enumeration
pub mod enumeration;
/// Error types
pub mod error;
/// Address resolution
pub mod resolver;
/// Core domain types
pub mod types;

// Re-export commonly used types
pub use backend::{Adapter, Backend};
pub use config::{Config, DownloadConfig, SiteConfig, SitesConfig};
pub use downloader::{ChanDownloader, Progress};
pub use enumeration::{Board, Source, Thread};
pub use error::{EnumerationError, Error, FetchError, Result};
pub use resolver::Resolved;
pub use types::{
    Attachment, BackendKind, DownloadOutcome, File, Post, ProgressSnapshot, Summary,
};
