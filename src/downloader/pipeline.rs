//! Gated, one-task-per-file download pipeline.

use super::fetch::fetch_file;
use super::progress::Progress;
use crate::error::FetchError;
use crate::types::{DownloadOutcome, File, ProgressSnapshot, Summary};
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{Semaphore, mpsc};
use tracing::{debug, info, warn};

/// Runs fetches behind a counting admission gate
pub(crate) struct DownloadPipeline {
    client: reqwest::Client,
    /// Limits simultaneous fetches to the configured concurrency
    gate: Arc<Semaphore>,
    concurrency: usize,
    output_dir: Arc<PathBuf>,
}

impl DownloadPipeline {
    pub(crate) fn new(client: reqwest::Client, concurrency: usize, output_dir: PathBuf) -> Self {
        Self {
            client,
            gate: Arc::new(Semaphore::new(concurrency)),
            concurrency,
            output_dir: Arc::new(output_dir),
        }
    }

    /// Download `files`, producing exactly one outcome per file
    ///
    /// Submission only waits on the gate. Outcomes are handed to `on_outcome` in
    /// completion order, each with the progress state right after it. Returns
    /// once every file has an outcome.
    pub(crate) async fn run<F>(
        &self,
        files: &[File],
        progress: Arc<Progress>,
        mut on_outcome: F,
    ) -> Summary
    where
        F: FnMut(&DownloadOutcome, ProgressSnapshot),
    {
        let started = Instant::now();
        let total = files.len() as u64;
        progress.add_total(total);
        info!(
            files = total,
            concurrency = self.concurrency,
            output_dir = %self.output_dir.display(),
            "starting downloads"
        );

        let (outcome_tx, mut outcome_rx) = mpsc::unbounded_channel::<DownloadOutcome>();

        let dispatch = {
            let progress = Arc::clone(&progress);
            async move {
                for file in files {
                    let permit = match Arc::clone(&self.gate).acquire_owned().await {
                        Ok(permit) => permit,
                        Err(_) => {
                            let _ = outcome_tx.send(DownloadOutcome {
                                file: file.clone(),
                                result: Err(FetchError::TaskFailed(
                                    "admission gate closed".to_string(),
                                )),
                            });
                            continue;
                        }
                    };

                    let client = self.client.clone();
                    let output_dir = Arc::clone(&self.output_dir);
                    let progress = Arc::clone(&progress);
                    let outcome_tx = outcome_tx.clone();
                    let file = file.clone();

                    tokio::spawn(async move {
                        progress.fetch_started();
                        let result = AssertUnwindSafe(fetch_file(&client, &file, &output_dir))
                            .catch_unwind()
                            .await
                            .unwrap_or_else(|panic| {
                                Err(FetchError::TaskFailed(panic_message(panic.as_ref())))
                            });
                        progress.fetch_finished();

                        // free the slot before reporting
                        drop(permit);

                        if outcome_tx.send(DownloadOutcome { file, result }).is_err() {
                            warn!("outcome receiver dropped before all downloads finished");
                        }
                    });
                }
            }
        };

        let collect = async {
            let mut succeeded = 0u64;
            let mut failed = 0u64;
            let mut bytes = 0u64;

            while let Some(outcome) = outcome_rx.recv().await {
                let snapshot = progress.record(&outcome);
                match &outcome.result {
                    Ok(written) => {
                        succeeded += 1;
                        bytes += written;
                        debug!(file = %outcome.file, bytes = written, "download finished");
                    }
                    Err(e) => {
                        failed += 1;
                        warn!(file = %outcome.file, error = %e, "download failed");
                    }
                }
                on_outcome(&outcome, snapshot);
            }

            (succeeded, failed, bytes)
        };

        let ((), (succeeded, failed, bytes)) = tokio::join!(dispatch, collect);

        let summary = Summary {
            files: total,
            succeeded,
            failed,
            bytes,
            elapsed: started.elapsed(),
        };
        info!(
            files = summary.files,
            succeeded = summary.succeeded,
            failed = summary.failed,
            bytes = summary.bytes,
            elapsed_ms = summary.elapsed.as_millis() as u64,
            "downloads complete"
        );
        summary
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else {
        "download task panicked".to_string()
    }
}
