//! Router configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use crate::Result;

/// Hosting suffix whose sites are served from a `/<repo>/` subpath.
pub const HOSTED_PAGES_SUFFIX: &str = "github.io";

/// Maximum number of cached pages.
pub const DEFAULT_CACHE_CAPACITY: usize = 10;

pub const DEFAULT_FAILURE_MARKUP: &str = "<p>Sorry, this page failed to load.</p>";

/// Deployment root, always of the form `/` or `/<segment>/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct BasePath(String);

impl BasePath {
    pub fn root() -> Self {
        Self("/".to_string())
    }

    pub fn new(prefix: &str) -> Self {
        let trimmed = prefix.trim().trim_matches('/');
        if trimmed.is_empty() {
            Self::root()
        } else {
            Self(format!("/{trimmed}/"))
        }
    }

    /// Hosted-pages deployments live under `/<repo>/`, everything else at the root.
    pub fn detect(hostname: &str, hosted_suffix: &str, repo: &str) -> Self {
        if hostname.ends_with(hosted_suffix) {
            Self::new(repo)
        } else {
            Self::root()
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0 == "/"
    }
}

impl Default for BasePath {
    fn default() -> Self {
        Self::root()
    }
}

impl From<String> for BasePath {
    fn from(value: String) -> Self {
        Self::new(&value)
    }
}

impl From<BasePath> for String {
    fn from(value: BasePath) -> Self {
        value.0
    }
}

impl std::fmt::Display for BasePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Document origin, e.g. `https://gercotronic.github.io`
    pub origin: String,
    /// Deployment root on that origin
    pub base_path: BasePath,
    /// Where bare or `index.html` initial locations land
    pub default_path: String,
    /// Initial paths that route to `default_path`
    pub landing_aliases: Vec<String>,
    /// Paths under this prefix are routed
    pub internal_prefix: String,
    /// Paths with this suffix are routed
    pub document_suffix: String,
    /// Content container selectors, tried in order
    pub container_selectors: Vec<String>,
    pub cache_capacity: usize,
    /// Shown in the content area when a page fails to load
    pub failure_markup: String,
    /// Delay before the post-swap layout refresh
    pub layout_refresh_delay_ms: u64,
    /// Unset means a hung request holds the navigation guard indefinitely
    pub request_timeout_secs: Option<u64>,
}

impl RouterConfig {
    pub fn new(origin: impl Into<String>, base_path: BasePath) -> Self {
        Self {
            origin: origin.into().trim_end_matches('/').to_string(),
            base_path,
            ..Self::default()
        }
    }

    /// Build a config for a page served from `location`, detecting a hosted subpath.
    pub fn for_location(location: &Url, repo: &str) -> Self {
        let hostname = location.host_str().unwrap_or_default();
        let base_path = BasePath::detect(hostname, HOSTED_PAGES_SUFFIX, repo);
        Self::new(location.origin().ascii_serialization(), base_path)
    }

    /// Absolute URL of the deployment root; page paths are joined onto it.
    pub fn fetch_base(&self) -> Result<Url> {
        Ok(Url::parse(&format!(
            "{}{}",
            self.origin.trim_end_matches('/'),
            self.base_path
        ))?)
    }

    pub fn layout_refresh_delay(&self) -> Duration {
        Duration::from_millis(self.layout_refresh_delay_ms)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            origin: "http://localhost:8080".to_string(),
            base_path: BasePath::root(),
            default_path: "pages/home.html".to_string(),
            landing_aliases: vec![String::new(), "index.html".to_string()],
            internal_prefix: "pages/".to_string(),
            document_suffix: ".html".to_string(),
            container_selectors: vec![".page-wrapper".to_string(), "section".to_string()],
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            failure_markup: DEFAULT_FAILURE_MARKUP.to_string(),
            layout_refresh_delay_ms: 100,
            request_timeout_secs: None,
        }
    }
}
