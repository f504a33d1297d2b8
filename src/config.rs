//! Configuration types for chan-dl

use crate::error::{Error, Result};
use crate::types::BackendKind;
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::Duration};

/// Download behavior configuration (output directory, concurrency, timeouts)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Output directory; each board gets a subdirectory (default: "./chdl")
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Maximum concurrent attachment downloads (default: 10)
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Skip supplementary attachments on multi-file posts (default: false)
    #[serde(default)]
    pub exclude_extras: bool,

    /// Timeout applied to every HTTP request (default: 10 seconds)
    #[serde(default = "default_request_timeout", with = "duration_serde")]
    pub request_timeout: Duration,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            concurrency: default_concurrency(),
            exclude_extras: false,
            request_timeout: default_request_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

/// Endpoints and host aliases of one imageboard backend
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Hosts that select this backend (matched case-insensitively)
    pub hosts: Vec<String>,

    /// Origin serving listing and thread endpoints
    pub api_base: String,

    /// Origin serving attachments
    pub media_base: String,

    /// Highest listing page walked when enumerating a whole board
    pub max_pages: u32,
}

impl SiteConfig {
    /// Whether `host` selects this backend
    pub fn claims(&self, host: &str) -> bool {
        self.hosts.iter().any(|h| h.eq_ignore_ascii_case(host))
    }
}

/// Per-backend site settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SitesConfig {
    /// Catalog-API backend (4chan-style)
    #[serde(default = "default_catalog_site")]
    pub catalog: SiteConfig,

    /// Thread-API backend (8chan-style)
    #[serde(default = "default_thread_api_site")]
    pub thread_api: SiteConfig,

    /// HTML-scrape backend (7chan-style)
    #[serde(default = "default_html_site")]
    pub html: SiteConfig,
}

impl Default for SitesConfig {
    fn default() -> Self {
        Self {
            catalog: default_catalog_site(),
            thread_api: default_thread_api_site(),
            html: default_html_site(),
        }
    }
}

impl SitesConfig {
    /// Settings for one backend
    pub fn get(&self, kind: BackendKind) -> &SiteConfig {
        match kind {
            BackendKind::Catalog => &self.catalog,
            BackendKind::ThreadApi => &self.thread_api,
            BackendKind::Html => &self.html,
        }
    }

    /// Backend whose host list contains `host`
    pub fn backend_for_host(&self, host: &str) -> Option<BackendKind> {
        [BackendKind::Catalog, BackendKind::ThreadApi, BackendKind::Html]
            .into_iter()
            .find(|kind| self.get(*kind).claims(host))
    }
}

/// Main configuration for [`ChanDownloader`](crate::ChanDownloader)
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Download behavior settings
    #[serde(default)]
    pub download: DownloadConfig,

    /// Backend endpoints and host aliases
    #[serde(default)]
    pub sites: SitesConfig,
}

impl Config {
    /// Output directory
    pub fn output_dir(&self) -> &PathBuf {
        &self.download.output_dir
    }

    /// Check the configuration for values the downloader cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.download.concurrency == 0 {
            return Err(Error::config("concurrency", "concurrency must be at least 1"));
        }
        if self.download.request_timeout.is_zero() {
            return Err(Error::config(
                "request_timeout",
                "request timeout must be greater than zero",
            ));
        }

        for kind in [BackendKind::Catalog, BackendKind::ThreadApi, BackendKind::Html] {
            let site = self.sites.get(kind);
            let key = format!("sites.{}", kind);
            if site.hosts.is_empty() {
                return Err(Error::config(&key, format!("no hosts configured for {kind}")));
            }
            if site.max_pages == 0 {
                return Err(Error::config(&key, format!("max_pages for {kind} must be at least 1")));
            }
            for (field, value) in [("api_base", &site.api_base), ("media_base", &site.media_base)] {
                url::Url::parse(value).map_err(|e| {
                    Error::config(&format!("{key}.{field}"), format!("invalid origin {value}: {e}"))
                })?;
            }
        }

        Ok(())
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./chdl")
}

fn default_concurrency() -> usize {
    10
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_user_agent() -> String {
    format!("chan-dl/{}", env!("CARGO_PKG_VERSION"))
}

fn hosts(list: &[&str]) -> Vec<String> {
    list.iter().map(|h| h.to_string()).collect()
}

fn default_catalog_site() -> SiteConfig {
    SiteConfig {
        hosts: hosts(&["boards.4chan.org", "www.4chan.org", "4chan.org"]),
        api_base: "https://a.4cdn.org".to_string(),
        media_base: "https://i.4cdn.org".to_string(),
        max_pages: 10,
    }
}

fn default_thread_api_site() -> SiteConfig {
    SiteConfig {
        hosts: hosts(&["8ch.net", "www.8ch.net"]),
        api_base: "https://8ch.net".to_string(),
        media_base: "https://8ch.net".to_string(),
        max_pages: 16,
    }
}

fn default_html_site() -> SiteConfig {
    SiteConfig {
        hosts: hosts(&["7chan.org", "www.7chan.org"]),
        api_base: "https://7chan.org".to_string(),
        media_base: "https://7chan.org".to_string(),
        max_pages: 8,
    }
}

// Duration serialization helper (whole seconds)
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
