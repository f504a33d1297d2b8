//! HTML forum backend, read by structural markers rather than a schema.
//!
//! Markers:
//! - listing pages: `.op > .post`, whose `id` attribute is the thread id
//! - thread pages: every `.post` block is one post
//! - primary attachment: the single `.file_size a` caption, e.g. `1234567.png`
//! - supplementary attachments: `span.multithumbfirst a, span.multithumb a`
//!   hrefs, e.g. `/b/src/1234568.jpg`
//!
//! Markup that does not carry these markers yields no threads or no files. That
//! is not reported as an error.

use super::{Adapter, Page, get_html};
use crate::config::SiteConfig;
use crate::error::EnumerationError;
use crate::types::{Attachment, BackendKind, Post};
use async_trait::async_trait;
use scraper::{Html, Selector};
use std::sync::{Arc, LazyLock};

#[allow(clippy::expect_used)]
static OP_POST: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".op > .post").expect("valid op selector"));

#[allow(clippy::expect_used)]
static POST: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".post").expect("valid post selector"));

#[allow(clippy::expect_used)]
static FILE_SIZE_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".file_size a").expect("valid file size selector"));

#[allow(clippy::expect_used)]
static THUMB_LINKS: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("span.multithumbfirst a, span.multithumb a").expect("valid thumb selector")
});

/// Adapter for the server-rendered forum view
pub struct HtmlScrape {
    base: String,
    media_base: Arc<str>,
    max_pages: u32,
    client: reqwest::Client,
}

impl HtmlScrape {
    /// Build the adapter against a site's origins
    pub fn new(site: &SiteConfig, client: reqwest::Client) -> Self {
        Self {
            base: site.api_base.trim_end_matches('/').to_string(),
            media_base: Arc::from(site.media_base.trim_end_matches('/')),
            max_pages: site.max_pages,
            client,
        }
    }

    fn page_url(&self, board: &str, page: u32) -> String {
        if page <= 1 {
            format!("{}/{}/", self.base, board)
        } else {
            format!("{}/{}/{}.html", self.base, board, page)
        }
    }
}

/// Split `name.ext` on the first dot; anything without both halves is dropped
fn split_file_name(raw: &str) -> Option<Attachment> {
    let (name, extension) = raw.trim().split_once('.')?;
    if name.is_empty() || extension.is_empty() {
        return None;
    }
    Some(Attachment::new(name, extension))
}

/// Thread ids of a listing page, in page order
pub(crate) fn parse_thread_ids(document: &str) -> Vec<String> {
    let document = Html::parse_document(document);
    document
        .select(&OP_POST)
        .filter_map(|op| op.value().attr("id"))
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

/// Primary and supplementary attachments of every post on a thread page
pub(crate) fn parse_posts(document: &str) -> Vec<(Option<Attachment>, Vec<Attachment>)> {
    let document = Html::parse_document(document);
    document
        .select(&POST)
        .map(|post| {
            let captions: Vec<_> = post.select(&FILE_SIZE_LINK).collect();
            let primary = match captions.as_slice() {
                [caption] => split_file_name(&caption.text().collect::<String>()),
                _ => None,
            };

            let extras = post
                .select(&THUMB_LINKS)
                .filter_map(|link| link.value().attr("href"))
                .filter_map(|href| href.rsplit('/').next())
                .filter_map(split_file_name)
                .collect();

            (primary, extras)
        })
        .collect()
}

#[async_trait]
impl Adapter for HtmlScrape {
    fn kind(&self) -> BackendKind {
        BackendKind::Html
    }

    fn max_pages(&self) -> u32 {
        self.max_pages
    }

    fn thread_url(&self, board: &str, thread: &str) -> String {
        let query = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("b", board)
            .append_pair("t", thread)
            .append_pair("p", "p1--")
            .finish();
        format!("{}/read.php?{}", self.base, query)
    }

    async fn list_page(&self, board: &str, page: u32) -> Result<Vec<String>, EnumerationError> {
        let url = self.page_url(board, page);
        match get_html(&self.client, &url, true).await? {
            Page::Found(body) => Ok(parse_thread_ids(&body)),
            Page::NotFound => Ok(Vec::new()),
        }
    }

    async fn list_posts(&self, board: &str, thread: &str) -> Result<Vec<Post>, EnumerationError> {
        let url = self.thread_url(board, thread);
        let body = match get_html(&self.client, &url, false).await? {
            Page::Found(body) => body,
            Page::NotFound => return Err(EnumerationError::Status { url, status: 404 }),
        };

        let parsed = parse_posts(&body);
        if parsed.is_empty() {
            tracing::warn!(board, thread, url = %url, "no post markers found on thread page");
        }

        Ok(parsed
            .into_iter()
            .map(|(primary, extras)| {
                let mut post =
                    Post::new(BackendKind::Html, Arc::clone(&self.media_base), board, thread);
                post.primary = primary;
                post.extras = extras;
                post
            })
            .collect())
    }
}
