//! Language resolution
//!
//! Candidates are considered in source order: stored preference, query
//! string, browser languages. The first one that matches a supported
//! language (exactly, or by its primary subtag) wins.

use url::form_urlencoded;

use crate::config::I18nConfig;

/// Raw language candidates gathered from the environment.
#[derive(Debug, Clone, Default)]
pub struct LanguageSources {
    pub stored: Option<String>,
    pub query: Option<String>,
    /// Browser languages in preference order
    pub navigator: Vec<String>,
}

impl LanguageSources {
    fn candidates(&self) -> impl Iterator<Item = &str> {
        self.stored
            .as_deref()
            .into_iter()
            .chain(self.query.as_deref())
            .chain(self.navigator.iter().map(String::as_str))
    }
}

/// Value of `param` in a URL query string (without the leading `?`).
pub fn query_language(query: &str, param: &str) -> Option<String> {
    form_urlencoded::parse(query.trim_start_matches('?').as_bytes())
        .find(|(key, _)| key == param)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.trim().is_empty())
}

#[derive(Debug, Clone)]
pub struct LanguageResolver {
    supported: Vec<String>,
    fallback: String,
}

impl LanguageResolver {
    pub fn new(supported: Vec<String>, fallback: String) -> Self {
        Self {
            supported: supported.into_iter().map(|l| l.to_lowercase()).collect(),
            fallback: fallback.to_lowercase(),
        }
    }

    pub fn from_config(config: &I18nConfig) -> Self {
        Self::new(
            config.supported_languages.clone(),
            config.fallback_language.clone(),
        )
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    /// Supported language code for `candidate`, e.g. `de-AT` -> `de`.
    pub fn match_supported(&self, candidate: &str) -> Option<&str> {
        let candidate = candidate.trim().to_lowercase().replace('_', "-");
        if candidate.is_empty() {
            return None;
        }

        if let Some(exact) = self.supported.iter().find(|l| **l == candidate) {
            return Some(exact.as_str());
        }

        let primary = candidate.split('-').next()?;
        self.supported
            .iter()
            .find(|l| l.as_str() == primary)
            .map(String::as_str)
    }

    pub fn resolve(&self, sources: &LanguageSources) -> String {
        sources
            .candidates()
            .find_map(|c| self.match_supported(c))
            .unwrap_or(self.fallback.as_str())
            .to_string()
    }
}
