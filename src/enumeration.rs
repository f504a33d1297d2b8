//! File enumeration: Board → Threads → Posts → Files, or Thread → Posts → Files.
//!
//! Walks are sequential and keep the backend's page and post order. The first
//! failing request ends the walk; nothing collected before it is returned.

use crate::backend::Backend;
use crate::error::Result;
use crate::resolver::Resolved;
use crate::types::{BackendKind, File, Post};
use std::sync::Arc;
use tracing::{debug, info};

/// A whole board on one backend
#[derive(Clone, Debug)]
pub struct Board {
    backend: Arc<Backend>,
    board: String,
}

impl Board {
    /// Board `board` on `backend`
    pub fn new(backend: Arc<Backend>, board: impl Into<String>) -> Self {
        Self {
            backend,
            board: board.into(),
        }
    }

    /// Board id
    pub fn id(&self) -> &str {
        &self.board
    }

    /// Backend this board lives on
    pub fn backend(&self) -> BackendKind {
        self.backend.adapter().kind()
    }

    /// A thread on this board, without fetching anything
    pub fn thread(&self, thread: impl Into<String>) -> Thread {
        Thread::new(Arc::clone(&self.backend), self.board.as_str(), thread)
    }

    /// Threads on listing page `page` (1-indexed)
    pub async fn list_page(&self, page: u32) -> Result<Vec<Thread>> {
        let ids = self.backend.adapter().list_page(&self.board, page).await?;
        Ok(ids.into_iter().map(|id| self.thread(id)).collect())
    }

    /// Every thread on the board
    ///
    /// Pages are walked from 1 up to the backend's page limit; the first empty
    /// or missing page ends the walk.
    pub async fn list_threads(&self) -> Result<Vec<Thread>> {
        let max_pages = self.backend.adapter().max_pages();
        let mut threads = Vec::new();

        for page in 1..=max_pages {
            let listed = self.list_page(page).await?;
            if listed.is_empty() {
                debug!(board = %self.board, page, "listing ended");
                break;
            }
            debug!(board = %self.board, page, threads = listed.len(), "listed page");
            threads.extend(listed);
        }

        info!(
            backend = %self.backend(),
            board = %self.board,
            threads = threads.len(),
            "enumerated board threads"
        );
        Ok(threads)
    }

    /// Every post of every thread on the board
    pub async fn list_posts(&self) -> Result<Vec<Post>> {
        let mut posts = Vec::new();
        for thread in self.list_threads().await? {
            posts.extend(thread.list_posts().await?);
        }
        Ok(posts)
    }

    /// Every file on the board, in page and post order
    pub async fn list_files(&self, exclude_extras: bool) -> Result<Vec<File>> {
        let mut files = Vec::new();
        for thread in self.list_threads().await? {
            files.extend(thread.list_files(exclude_extras).await?);
        }
        Ok(files)
    }
}

/// One thread on one backend
#[derive(Clone, Debug)]
pub struct Thread {
    backend: Arc<Backend>,
    board: String,
    thread: String,
}

impl PartialEq for Thread {
    fn eq(&self, other: &Self) -> bool {
        self.backend() == other.backend() && self.board == other.board && self.thread == other.thread
    }
}

impl Eq for Thread {}

impl Thread {
    /// Thread `thread` of board `board` on `backend`
    pub fn new(backend: Arc<Backend>, board: impl Into<String>, thread: impl Into<String>) -> Self {
        Self {
            backend,
            board: board.into(),
            thread: thread.into(),
        }
    }

    /// Endpoint the posts are read from
    pub fn fetch_url(&self) -> String {
        self.backend.adapter().thread_url(&self.board, &self.thread)
    }

    /// Backend this thread lives on
    pub fn backend(&self) -> BackendKind {
        self.backend.adapter().kind()
    }

    /// Board id
    pub fn board(&self) -> &str {
        &self.board
    }

    /// Thread id
    pub fn id(&self) -> &str {
        &self.thread
    }

    /// Posts in thread order
    pub async fn list_posts(&self) -> Result<Vec<Post>> {
        Ok(self
            .backend
            .adapter()
            .list_posts(&self.board, &self.thread)
            .await?)
    }

    /// Files of every post, in post order
    pub async fn list_files(&self, exclude_extras: bool) -> Result<Vec<File>> {
        let files: Vec<File> = self
            .list_posts()
            .await?
            .iter()
            .flat_map(|post| post.extract_files(exclude_extras))
            .collect();

        debug!(
            board = %self.board,
            thread = %self.thread,
            files = files.len(),
            "enumerated thread files"
        );
        Ok(files)
    }
}

/// What an address points at
#[derive(Clone, Debug)]
pub enum Source {
    /// A whole board
    Board(Board),
    /// A single thread
    Thread(Thread),
}

impl Source {
    /// Build the source a resolved address points at
    pub fn new(backend: Arc<Backend>, resolved: Resolved) -> Self {
        let board = Board::new(backend, resolved.board);
        match resolved.thread {
            Some(thread) => Source::Thread(board.thread(thread)),
            None => Source::Board(board),
        }
    }

    /// Board id
    pub fn board(&self) -> &str {
        match self {
            Source::Board(board) => board.id(),
            Source::Thread(thread) => thread.board(),
        }
    }

    /// Whether the address named a whole board
    pub fn is_board(&self) -> bool {
        matches!(self, Source::Board(_))
    }

    /// Flattened file list; `exclude_extras` applies to every post
    pub async fn list_files(&self, exclude_extras: bool) -> Result<Vec<File>> {
        match self {
            Source::Board(board) => board.list_files(exclude_extras).await,
            Source::Thread(thread) => thread.list_files(exclude_extras).await,
        }
    }
}
