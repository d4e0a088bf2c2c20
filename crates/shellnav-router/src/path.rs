//! Href normalization and link classification
//!
//! Every href the router sees is reduced to a [`CanonicalPath`] before it is
//! used as a cache key, a history key or a fetch target:
//! 1. strip the document origin
//! 2. strip the deployment base path
//! 3. strip leading `./` and `/`
//! 4. drop query and fragment

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;

use crate::config::{BasePath, RouterConfig};

/// Origin-, base-, query- and fragment-free page location relative to the deployment root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalPath(String);

impl CanonicalPath {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for CanonicalPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for CanonicalPath {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for CanonicalPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone)]
pub struct PathNormalizer {
    origin: String,
    base: BasePath,
}

impl PathNormalizer {
    pub fn new(origin: impl Into<String>, base: BasePath) -> Self {
        Self {
            origin: origin.into().trim_end_matches('/').to_string(),
            base,
        }
    }

    pub fn from_config(config: &RouterConfig) -> Self {
        Self::new(config.origin.clone(), config.base_path.clone())
    }

    pub fn base(&self) -> &BasePath {
        &self.base
    }

    /// Reduce an href to its canonical path. Idempotent.
    ///
    /// No percent-decoding and no trailing-slash handling.
    pub fn normalize(&self, href: &str) -> CanonicalPath {
        if href.is_empty() {
            return CanonicalPath::default();
        }

        // Prefixes are stripped until none applies so nested prefixes cannot
        // resurface on a second pass.
        let mut rest = href;
        loop {
            let before = rest.len();
            if !self.origin.is_empty() {
                if let Some(stripped) = rest.strip_prefix(self.origin.as_str()) {
                    rest = stripped;
                }
            }
            if let Some(stripped) = rest.strip_prefix(self.base.as_str()) {
                rest = stripped;
            }
            rest = strip_leading_separators(rest);
            if rest.len() == before {
                break;
            }
        }

        let end = rest.find(['?', '#']).unwrap_or(rest.len());
        CanonicalPath(rest[..end].to_string())
    }
}

fn strip_leading_separators(mut input: &str) -> &str {
    loop {
        if let Some(rest) = input.strip_prefix("./") {
            input = rest;
        } else if let Some(rest) = input.strip_prefix('/') {
            input = rest;
        } else {
            return input;
        }
    }
}

/// Decides which hrefs the router intercepts and which are left to the browser.
#[derive(Debug, Clone)]
pub struct LinkClassifier {
    normalizer: PathNormalizer,
    internal_prefix: String,
    document_suffix: String,
}

impl LinkClassifier {
    pub fn new(
        normalizer: PathNormalizer,
        internal_prefix: impl Into<String>,
        document_suffix: impl Into<String>,
    ) -> Self {
        Self {
            normalizer,
            internal_prefix: internal_prefix.into(),
            document_suffix: document_suffix.into(),
        }
    }

    pub fn from_config(config: &RouterConfig) -> Self {
        Self::new(
            PathNormalizer::from_config(config),
            config.internal_prefix.clone(),
            config.document_suffix.clone(),
        )
    }

    pub fn normalizer(&self) -> &PathNormalizer {
        &self.normalizer
    }

    pub fn normalize(&self, href: &str) -> CanonicalPath {
        self.normalizer.normalize(href)
    }

    /// Whether the router should handle this href instead of the browser.
    pub fn is_routable(&self, href: &str) -> bool {
        if href.is_empty() || Self::is_external(href) {
            return false;
        }

        let path = self.normalizer.normalize(href);
        path.as_str().starts_with(&self.internal_prefix)
            || path.as_str().ends_with(&self.document_suffix)
    }

    /// Absolute or protocol-relative URLs, mail/phone links and in-page anchors.
    fn is_external(href: &str) -> bool {
        href.starts_with("http://")
            || href.starts_with("https://")
            || href.starts_with("//")
            || href.starts_with("mailto:")
            || href.starts_with("tel:")
            || href.starts_with('#')
    }
}
