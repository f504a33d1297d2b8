//! JSON imageboard APIs: the catalog flavor and the second-generation thread API.
//!
//! Both flavors share the same document shapes:
//!
//! ```json
//! // /{board}/{page}.json
//! { "threads": [ { "posts": [ { "no": 570368 } ] } ] }
//!
//! // /{board}/thread/{id}.json  or  /{board}/res/{id}.json
//! { "posts": [ { "no": 570368, "tim": 1546293948883, "ext": ".png",
//!                "extra": [ { "tim": 1546293948884, "ext": ".jpg" } ] } ] }
//! ```
//!
//! The thread API names the supplementary list `extra_files` and serves `tim`
//! as a string; both spellings are accepted.

use super::{Adapter, Page, get_json};
use crate::config::SiteConfig;
use crate::error::EnumerationError;
use crate::types::{Attachment, BackendKind, Post};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

/// Adapter for the JSON catalog and thread APIs
pub struct JsonApi {
    kind: BackendKind,
    api_base: String,
    media_base: Arc<str>,
    max_pages: u32,
    client: reqwest::Client,
}

impl JsonApi {
    /// Catalog flavor: threads at `/{board}/thread/{id}.json`
    pub fn catalog(site: &SiteConfig, client: reqwest::Client) -> Self {
        Self::with_kind(BackendKind::Catalog, site, client)
    }

    /// Thread-API flavor: threads at `/{board}/res/{id}.json`
    pub fn thread_api(site: &SiteConfig, client: reqwest::Client) -> Self {
        Self::with_kind(BackendKind::ThreadApi, site, client)
    }

    fn with_kind(kind: BackendKind, site: &SiteConfig, client: reqwest::Client) -> Self {
        Self {
            kind,
            api_base: site.api_base.trim_end_matches('/').to_string(),
            media_base: Arc::from(site.media_base.trim_end_matches('/')),
            max_pages: site.max_pages,
            client,
        }
    }

    fn page_url(&self, board: &str, page: u32) -> String {
        format!("{}/{}/{}.json", self.api_base, board, page)
    }
}

/// Ids arrive as numbers on one API generation and strings on the other
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FlexId {
    Number(serde_json::Number),
    Text(String),
}

impl FlexId {
    fn into_string(self) -> String {
        match self {
            FlexId::Number(n) => n.to_string(),
            FlexId::Text(s) => s,
        }
    }
}

#[derive(Debug, Deserialize)]
struct PageResponse {
    #[serde(default)]
    threads: Vec<ThreadSummary>,
}

#[derive(Debug, Deserialize)]
struct ThreadSummary {
    #[serde(default)]
    posts: Vec<SummaryPost>,
}

#[derive(Debug, Deserialize)]
struct SummaryPost {
    no: FlexId,
}

#[derive(Debug, Deserialize)]
struct ThreadResponse {
    #[serde(default)]
    posts: Vec<RawPost>,
}

#[derive(Debug, Deserialize)]
struct RawPost {
    #[serde(default)]
    tim: Option<FlexId>,
    #[serde(default)]
    ext: Option<String>,
    #[serde(default, alias = "extra_files")]
    extra: Vec<RawAttachment>,
}

#[derive(Debug, Deserialize)]
struct RawAttachment {
    #[serde(default)]
    tim: Option<FlexId>,
    #[serde(default)]
    ext: Option<String>,
}

/// Entries missing either half are dropped, for primaries and extras alike
fn attachment(tim: Option<FlexId>, ext: Option<&str>) -> Option<Attachment> {
    let (tim, ext) = (tim?, ext?);
    let name = tim.into_string();
    let attachment = Attachment::new(name, ext);
    if attachment.name.is_empty() || attachment.extension.is_empty() {
        return None;
    }
    Some(attachment)
}

#[async_trait]
impl Adapter for JsonApi {
    fn kind(&self) -> BackendKind {
        self.kind
    }

    fn max_pages(&self) -> u32 {
        self.max_pages
    }

    fn thread_url(&self, board: &str, thread: &str) -> String {
        match self.kind {
            BackendKind::Catalog => format!("{}/{}/thread/{}.json", self.api_base, board, thread),
            _ => format!("{}/{}/res/{}.json", self.api_base, board, thread),
        }
    }

    async fn list_page(&self, board: &str, page: u32) -> Result<Vec<String>, EnumerationError> {
        let url = self.page_url(board, page);
        let data: PageResponse = match get_json(&self.client, &url, true).await? {
            Page::Found(data) => data,
            Page::NotFound => return Ok(Vec::new()),
        };

        // only the opening post of each summary carries the thread id
        Ok(data
            .threads
            .into_iter()
            .filter_map(|summary| summary.posts.into_iter().next())
            .map(|op| op.no.into_string())
            .collect())
    }

    async fn list_posts(&self, board: &str, thread: &str) -> Result<Vec<Post>, EnumerationError> {
        let url = self.thread_url(board, thread);
        let data: ThreadResponse = match get_json(&self.client, &url, false).await? {
            Page::Found(data) => data,
            Page::NotFound => {
                return Err(EnumerationError::Status { url, status: 404 });
            }
        };

        let posts = data
            .posts
            .into_iter()
            .map(|raw| {
                let mut post = Post::new(self.kind, Arc::clone(&self.media_base), board, thread);
                post.primary = attachment(raw.tim, raw.ext.as_deref());
                post.extras = raw
                    .extra
                    .into_iter()
                    .filter_map(|extra| attachment(extra.tim, extra.ext.as_deref()))
                    .collect();
                post
            })
            .collect::<Vec<_>>();

        tracing::debug!(
            backend = %self.kind,
            board,
            thread,
            posts = posts.len(),
            "listed thread posts"
        );
        Ok(posts)
    }
}
