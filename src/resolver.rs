//! Address resolution: host → backend, path/query → board and thread ids.
//!
//! Selection is a pure function of the host and the configured host lists. Each
//! backend then applies its own address shape:
//!
//! | backend    | board             | thread                                     |
//! |------------|-------------------|--------------------------------------------|
//! | catalog    | `/{board}`        | `/{board}/thread/{id}[/{slug}]`            |
//! | thread-api | `/{board}`        | `/{board}/res/{id}.html`                   |
//! | html       | `/{board}`, `/read.php?b={board}` | `/{board}/res/{id}.html`, `/read.php?b={board}&t={id}` |

use crate::config::SitesConfig;
use crate::error::{Error, Result};
use crate::types::BackendKind;
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

#[allow(clippy::expect_used)]
static BOARD_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("valid board pattern"));

#[allow(clippy::expect_used)]
static NUMERIC_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("valid thread pattern"));

// `123.html`, `123+50.html` and `123` all name thread 123
#[allow(clippy::expect_used)]
static RES_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]+)(?:[.+].*)?$").expect("valid res pattern"));

/// Path of the query-addressed thread view on the HTML backend
const READ_ENDPOINT: &str = "/read.php";

/// Result of resolving an address
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolved {
    /// Backend that owns the host
    pub backend: BackendKind,
    /// Board id
    pub board: String,
    /// Thread id for single-thread addresses
    pub thread: Option<String>,
}

/// Parse an address string
pub fn parse_address(address: &str) -> Result<Url> {
    Ok(Url::parse(address.trim())?)
}

/// Resolve a parsed address into a backend and its board/thread ids
///
/// # Errors
///
/// - [`Error::UnknownBackend`] if no configured site claims the host
/// - [`Error::InvalidFormat`] if the host is known but the address does not fit
///   that backend's shape
pub fn resolve(address: &Url, sites: &SitesConfig) -> Result<Resolved> {
    let host = address.host_str().unwrap_or_default();
    let backend = sites
        .backend_for_host(host)
        .ok_or_else(|| Error::UnknownBackend {
            host: host.to_string(),
        })?;

    if !matches!(address.scheme(), "http" | "https") {
        return Err(Error::invalid_format(
            backend,
            address,
            format!("unsupported scheme {}", address.scheme()),
        ));
    }

    let (board, thread) = match backend {
        BackendKind::Catalog => detail_catalog(address)?,
        BackendKind::ThreadApi => detail_res(backend, address)?,
        BackendKind::Html => {
            if address.path() == READ_ENDPOINT {
                detail_read_query(address)?
            } else {
                detail_res(backend, address)?
            }
        }
    };

    if !BOARD_ID.is_match(&board) {
        return Err(Error::invalid_format(
            backend,
            address,
            format!("invalid board id {board:?}"),
        ));
    }

    tracing::debug!(%backend, board = %board, thread = ?thread, "resolved address");

    Ok(Resolved {
        backend,
        board,
        thread,
    })
}

fn segments(address: &Url) -> Vec<&str> {
    address
        .path_segments()
        .map(|s| s.filter(|seg| !seg.is_empty()).collect())
        .unwrap_or_default()
}

fn detail_catalog(address: &Url) -> Result<(String, Option<String>)> {
    let backend = BackendKind::Catalog;
    match segments(address).as_slice() {
        [] => Err(Error::invalid_format(backend, address, "missing board")),
        [board, "thread"] => Err(Error::invalid_format(
            backend,
            address,
            format!("missing thread id for /{board}/thread"),
        )),
        [board, "thread", thread, ..] => {
            if !NUMERIC_ID.is_match(thread) {
                return Err(Error::invalid_format(
                    backend,
                    address,
                    format!("thread id {thread:?} is not numeric"),
                ));
            }
            Ok((board.to_string(), Some(thread.to_string())))
        }
        // `/g/`, `/g/2`, `/g/catalog` all address the whole board
        [board, ..] => Ok((board.to_string(), None)),
    }
}

fn detail_res(backend: BackendKind, address: &Url) -> Result<(String, Option<String>)> {
    match segments(address).as_slice() {
        [] => Err(Error::invalid_format(backend, address, "missing board")),
        [board, "res"] => Err(Error::invalid_format(
            backend,
            address,
            format!("missing thread id for /{board}/res"),
        )),
        [board, "res", segment, ..] => {
            let thread = RES_SEGMENT
                .captures(segment)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().to_string())
                .ok_or_else(|| {
                    Error::invalid_format(
                        backend,
                        address,
                        format!("thread segment {segment:?} is not numeric"),
                    )
                })?;
            Ok((board.to_string(), Some(thread)))
        }
        [board, ..] => Ok((board.to_string(), None)),
    }
}

fn detail_read_query(address: &Url) -> Result<(String, Option<String>)> {
    let backend = BackendKind::Html;
    let mut board = None;
    let mut thread = None;
    for (key, value) in address.query_pairs() {
        match key.as_ref() {
            "b" if !value.is_empty() => board = Some(value.into_owned()),
            "t" if !value.is_empty() => thread = Some(value.into_owned()),
            _ => {}
        }
    }

    let board = board.ok_or_else(|| {
        Error::invalid_format(backend, address, "missing board query parameter b")
    })?;

    if let Some(t) = thread.as_deref().filter(|t| !NUMERIC_ID.is_match(t)) {
        return Err(Error::invalid_format(
            backend,
            address,
            format!("thread id {t:?} is not numeric"),
        ));
    }

    Ok((board, thread))
}
