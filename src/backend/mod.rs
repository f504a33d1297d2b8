//! Imageboard backends
//!
//! Three structurally different protocols sit behind one [`Adapter`] trait:
//! - [`JsonApi`] in its catalog flavor (paginated JSON catalog, `thread/{id}.json`)
//! - [`JsonApi`] in its thread-API flavor (`res/{id}.json`, `extra_files`)
//! - [`HtmlScrape`] (server-rendered pages read by structural markers)
//!
//! [`Backend`] is the closed set of these; it is built once per run from the
//! resolved [`BackendKind`] and handed out as `&dyn Adapter`.

mod html;
mod json_api;

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;

pub use html::HtmlScrape;
pub use json_api::JsonApi;

use crate::config::SiteConfig;
use crate::error::EnumerationError;
use crate::types::{BackendKind, Post};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

/// Capability set every backend implements
///
/// Board-wide and per-thread walks are built on top of these two calls by
/// [`Board`](crate::enumeration::Board) and [`Thread`](crate::enumeration::Thread).
#[async_trait]
pub trait Adapter: Send + Sync {
    /// Which protocol this adapter speaks
    fn kind(&self) -> BackendKind;

    /// Highest listing page walked for a whole board
    fn max_pages(&self) -> u32;

    /// Endpoint listing the posts of one thread
    fn thread_url(&self, board: &str, thread: &str) -> String;

    /// Thread ids on listing page `page` (1-indexed)
    ///
    /// An empty list means the listing has ended; a missing page is reported
    /// the same way rather than as an error.
    async fn list_page(&self, board: &str, page: u32) -> Result<Vec<String>, EnumerationError>;

    /// Posts of one thread, in thread order
    async fn list_posts(&self, board: &str, thread: &str) -> Result<Vec<Post>, EnumerationError>;
}

/// The closed set of supported backends
pub enum Backend {
    /// Catalog-API flavor
    Catalog(JsonApi),
    /// Thread-API flavor
    ThreadApi(JsonApi),
    /// HTML-scrape backend
    Html(HtmlScrape),
}

impl Backend {
    /// Build the backend for `kind` against its configured site
    pub fn new(kind: BackendKind, site: &SiteConfig, client: reqwest::Client) -> Self {
        match kind {
            BackendKind::Catalog => Backend::Catalog(JsonApi::catalog(site, client)),
            BackendKind::ThreadApi => Backend::ThreadApi(JsonApi::thread_api(site, client)),
            BackendKind::Html => Backend::Html(HtmlScrape::new(site, client)),
        }
    }

    /// The adapter behind this backend
    pub fn adapter(&self) -> &dyn Adapter {
        match self {
            Backend::Catalog(api) | Backend::ThreadApi(api) => api as &dyn Adapter,
            Backend::Html(scrape) => scrape as &dyn Adapter,
        }
    }
}

impl std::fmt::Debug for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Backend").field(&self.adapter().kind()).finish()
    }
}

/// Body of a listing request that may legitimately be missing
pub(crate) enum Page<T> {
    Found(T),
    NotFound,
}

/// GET `url`, mapping transport failures and (optionally) 404s
async fn get(
    client: &reqwest::Client,
    url: &str,
    not_found_ends_listing: bool,
) -> Result<Page<reqwest::Response>, EnumerationError> {
    tracing::debug!(url, "fetching");

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|source| transport(url, source))?;

    let status = response.status();
    if not_found_ends_listing && status == StatusCode::NOT_FOUND {
        tracing::debug!(url, "listing page not found, treating as end of listing");
        return Ok(Page::NotFound);
    }
    if !status.is_success() {
        return Err(EnumerationError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    Ok(Page::Found(response))
}

fn transport(url: &str, source: reqwest::Error) -> EnumerationError {
    EnumerationError::Transport {
        url: url.to_string(),
        source,
    }
}

/// GET and decode a JSON document
pub(crate) async fn get_json<T: DeserializeOwned>(
    client: &reqwest::Client,
    url: &str,
    not_found_ends_listing: bool,
) -> Result<Page<T>, EnumerationError> {
    let response = match get(client, url, not_found_ends_listing).await? {
        Page::Found(response) => response,
        Page::NotFound => return Ok(Page::NotFound),
    };

    let body = response
        .bytes()
        .await
        .map_err(|source| transport(url, source))?;

    serde_json::from_slice(&body)
        .map(Page::Found)
        .map_err(|e| EnumerationError::Decode {
            url: url.to_string(),
            reason: e.to_string(),
        })
}

/// GET an HTML document as text
pub(crate) async fn get_html(
    client: &reqwest::Client,
    url: &str,
    not_found_ends_listing: bool,
) -> Result<Page<String>, EnumerationError> {
    match get(client, url, not_found_ends_listing).await? {
        Page::Found(response) => response
            .text()
            .await
            .map(Page::Found)
            .map_err(|source| transport(url, source)),
        Page::NotFound => Ok(Page::NotFound),
    }
}
