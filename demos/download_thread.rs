//! Thread download example
//!
//! This example demonstrates the core functionality of chan-dl:
//! - Configuring the downloader
//! - Resolving an address to a thread or a board
//! - Listing the files to download
//! - Reporting progress as each file completes

use chan_dl::config::{Config, DownloadConfig};
use chan_dl::{ChanDownloader, Progress};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing for logging (optional)
    // Uncomment if you add tracing-subscriber to your dependencies:
    // tracing_subscriber::fmt::init();

    // Build configuration
    let config = Config {
        download: DownloadConfig {
            output_dir: "chdl".into(),
            concurrency: 4,
            exclude_extras: false,
            ..Default::default()
        },
        ..Default::default()
    };

    // Create downloader instance
    let downloader = ChanDownloader::new(config)?;

    // Resolve the address; whole boards can be large, so this example sticks to threads
    let source = downloader.resolve("https://boards.4chan.org/g/thread/123")?;
    if source.is_board() {
        println!("Refusing to download the whole /{}/ board", source.board());
        return Ok(());
    }

    let files = downloader.list_files(&source).await?;
    println!("Found {} files", files.len());

    // Download, printing each outcome as it completes
    let progress = Arc::new(Progress::new());
    let summary = downloader
        .download(&files, Arc::clone(&progress), |outcome, snapshot| {
            match &outcome.result {
                Ok(bytes) => println!(
                    "[{}/{}] {} ({} bytes)",
                    snapshot.done, snapshot.total, outcome.file, bytes
                ),
                Err(e) => println!(
                    "[{}/{}] {} failed: {}",
                    snapshot.done, snapshot.total, outcome.file, e
                ),
            }
        })
        .await;

    println!(
        "Done: {} downloaded, {} failed, {} bytes in {:.1}s",
        summary.succeeded,
        summary.failed,
        summary.bytes,
        summary.elapsed.as_secs_f64()
    );
    Ok(())
}
