//! Core types for chan-dl

use crate::error::FetchError;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::time::Duration;

/// The closed set of imageboard protocols chan-dl understands
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackendKind {
    /// Paginated JSON catalog API (`/{board}/{page}.json`, `/{board}/thread/{id}.json`)
    Catalog,
    /// Second-generation JSON thread API (`/{board}/res/{id}.json`)
    ThreadApi,
    /// Server-rendered HTML forum view, scraped by structural markers
    Html,
}

impl BackendKind {
    /// Stable lowercase name used in logs and error messages
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Catalog => "catalog",
            BackendKind::ThreadApi => "thread-api",
            BackendKind::Html => "html",
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One attachment as it appears on a post: a file id and its extension
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attachment {
    /// Server-side file id (timestamp-like on the JSON boards)
    pub name: String,
    /// Extension without the leading dot
    pub extension: String,
}

impl Attachment {
    /// Create an attachment, stripping a leading `.` from the extension
    pub fn new(name: impl Into<String>, extension: impl AsRef<str>) -> Self {
        let extension = extension.as_ref();
        Self {
            name: name.into(),
            extension: extension.strip_prefix('.').unwrap_or(extension).to_string(),
        }
    }
}

/// A downloadable attachment
///
/// Identified by `(backend, board, thread, name, extension)`; two files with the
/// same tuple compare equal regardless of which media origin they were built with.
#[derive(Clone, Debug)]
pub struct File {
    backend: BackendKind,
    board: String,
    thread: String,
    name: String,
    extension: String,
    media_base: Arc<str>,
}

impl File {
    pub(crate) fn new(
        backend: BackendKind,
        media_base: Arc<str>,
        board: impl Into<String>,
        thread: impl Into<String>,
        attachment: Attachment,
    ) -> Self {
        Self {
            backend,
            board: board.into(),
            thread: thread.into(),
            name: attachment.name,
            extension: attachment.extension,
            media_base,
        }
    }

    /// Direct asset URL; computed, never fetched
    pub fn url(&self) -> String {
        let base = self.media_base.trim_end_matches('/');
        match self.backend {
            BackendKind::Catalog => format!(
                "{}/{}/{}.{}",
                base, self.board, self.name, self.extension
            ),
            BackendKind::ThreadApi | BackendKind::Html => format!(
                "{}/{}/src/{}.{}",
                base, self.board, self.name, self.extension
            ),
        }
    }

    /// Backend this file was enumerated from
    pub fn backend(&self) -> BackendKind {
        self.backend
    }

    /// Board id
    pub fn board(&self) -> &str {
        &self.board
    }

    /// Thread id
    pub fn thread(&self) -> &str {
        &self.thread
    }

    /// File id
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Extension without the leading dot
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// `{name}.{extension}`, the on-disk file name
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.name, self.extension)
    }
}

impl PartialEq for File {
    fn eq(&self, other: &Self) -> bool {
        self.backend == other.backend
            && self.board == other.board
            && self.thread == other.thread
            && self.name == other.name
            && self.extension == other.extension
    }
}

impl Eq for File {}

impl Hash for File {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.backend.hash(state);
        self.board.hash(state);
        self.thread.hash(state);
        self.name.hash(state);
        self.extension.hash(state);
    }
}

impl std::fmt::Display for File {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}.{}", self.board, self.name, self.extension)
    }
}

/// One post of a thread
///
/// Posts only live long enough to have their files extracted.
#[derive(Clone, Debug)]
pub struct Post {
    backend: BackendKind,
    media_base: Arc<str>,
    board: String,
    thread: String,
    /// The post's own attachment, if it has one
    pub primary: Option<Attachment>,
    /// Additional attachments on multi-file posts
    pub extras: Vec<Attachment>,
}

impl Post {
    pub(crate) fn new(
        backend: BackendKind,
        media_base: Arc<str>,
        board: impl Into<String>,
        thread: impl Into<String>,
    ) -> Self {
        Self {
            backend,
            media_base,
            board: board.into(),
            thread: thread.into(),
            primary: None,
            extras: Vec::new(),
        }
    }

    /// Board id
    pub fn board(&self) -> &str {
        &self.board
    }

    /// Thread id
    pub fn thread(&self) -> &str {
        &self.thread
    }

    /// Files on this post: the primary first, then extras unless excluded
    ///
    /// A post without a primary attachment still contributes its extras.
    pub fn extract_files(&self, exclude_extras: bool) -> Vec<File> {
        let mut files = Vec::with_capacity(1 + self.extras.len());
        if let Some(primary) = &self.primary {
            files.push(self.file(primary.clone()));
        }
        if !exclude_extras {
            files.extend(self.extras.iter().cloned().map(|extra| self.file(extra)));
        }
        files
    }

    fn file(&self, attachment: Attachment) -> File {
        File::new(
            self.backend,
            Arc::clone(&self.media_base),
            self.board.as_str(),
            self.thread.as_str(),
            attachment,
        )
    }
}

/// Completion record for one file
#[derive(Debug)]
pub struct DownloadOutcome {
    /// The file this outcome belongs to
    pub file: File,
    /// Bytes written on success, the cause on failure
    pub result: std::result::Result<u64, FetchError>,
}

impl DownloadOutcome {
    /// Whether the file was written
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// Bytes written (0 for failures)
    pub fn bytes(&self) -> u64 {
        self.result.as_ref().copied().unwrap_or(0)
    }
}

/// Point-in-time view of a run's progress
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ProgressSnapshot {
    /// Outcomes produced so far
    pub done: u64,
    /// Files in the run
    pub total: u64,
    /// Failed outcomes so far
    pub failed: u64,
    /// Bytes written by successful downloads
    pub bytes: u64,
}

/// Final totals of a download run
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Summary {
    /// Files submitted
    pub files: u64,
    /// Files written
    pub succeeded: u64,
    /// Files that failed
    pub failed: u64,
    /// Bytes written by successful downloads
    pub bytes: u64,
    /// Wall time of the download phase
    pub elapsed: Duration,
}
