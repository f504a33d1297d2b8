//! Single attachment fetch: destination checks, bounded request, streamed write.

use crate::error::FetchError;
use crate::types::File;
use futures::StreamExt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

/// `{output_dir}/{board}/{name}.{extension}`
pub fn destination_path(output_dir: &Path, file: &File) -> PathBuf {
    output_dir.join(file.board()).join(file.file_name())
}

/// Download one file into its board directory
///
/// An existing destination is never touched and no request is made for it. The
/// client's timeout bounds the whole request, body included.
pub(crate) async fn fetch_file(
    client: &reqwest::Client,
    file: &File,
    output_dir: &Path,
) -> Result<u64, FetchError> {
    let dest = destination_path(output_dir, file);
    if let Some(dir) = dest.parent() {
        tokio::fs::create_dir_all(dir).await?;
    }

    if tokio::fs::try_exists(&dest).await? {
        return Err(FetchError::AlreadyExists { path: dest });
    }

    let response = client.get(file.url()).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            status: status.as_u16(),
        });
    }

    let mut out = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&dest)
        .await
        .map_err(|e| match e.kind() {
            ErrorKind::AlreadyExists => FetchError::AlreadyExists { path: dest.clone() },
            _ => FetchError::Io(e),
        })?;

    match write_body(response, &mut out).await {
        Ok(written) => Ok(written),
        Err(e) => {
            drop(out);
            // a truncated file would be skipped as "already exists" next run
            if let Err(remove_err) = tokio::fs::remove_file(&dest).await {
                tracing::warn!(
                    path = %dest.display(),
                    error = %remove_err,
                    "failed to remove partial download"
                );
            }
            Err(e)
        }
    }
}

async fn write_body(
    response: reqwest::Response,
    out: &mut tokio::fs::File,
) -> Result<u64, FetchError> {
    let mut body = response.bytes_stream();
    let mut written = 0u64;
    while let Some(chunk) = body.next().await {
        let chunk = chunk?;
        out.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    out.flush().await?;
    Ok(written)
}
