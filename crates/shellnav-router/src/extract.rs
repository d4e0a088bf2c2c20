//! Content container extraction from fetched pages
//!
//! A fetched page is a full HTML document; only the inner markup of its
//! content container is swapped into the shell. Strategies are tried in
//! order and the first match wins.

use scraper::{Html, Selector};

/// One way of locating the content container in a parsed page.
pub trait ExtractionStrategy: Send + Sync {
    fn name(&self) -> &str;

    /// Inner markup of the container, if this strategy finds one.
    fn extract(&self, doc: &Html) -> Option<String>;
}

/// First element matching a CSS selector.
pub struct SelectorStrategy {
    source: String,
    selector: Selector,
}

impl SelectorStrategy {
    pub fn parse(selector: &str) -> Option<Self> {
        match Selector::parse(selector) {
            Ok(parsed) => Some(Self {
                source: selector.to_string(),
                selector: parsed,
            }),
            Err(e) => {
                tracing::warn!(selector, error = ?e, "Ignoring invalid container selector");
                None
            }
        }
    }
}

impl ExtractionStrategy for SelectorStrategy {
    fn name(&self) -> &str {
        &self.source
    }

    fn extract(&self, doc: &Html) -> Option<String> {
        doc.select(&self.selector).next().map(|el| el.inner_html())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    /// Inner markup of the matched container
    pub html: String,
    /// Name of the strategy that matched
    pub matched_by: String,
}

pub struct FragmentExtractor {
    strategies: Vec<Box<dyn ExtractionStrategy>>,
}

impl FragmentExtractor {
    pub fn new(strategies: Vec<Box<dyn ExtractionStrategy>>) -> Self {
        Self { strategies }
    }

    /// Selector strategies in the given order; invalid selectors are skipped.
    pub fn from_selectors<S: AsRef<str>>(selectors: &[S]) -> Self {
        let strategies = selectors
            .iter()
            .filter_map(|s| SelectorStrategy::parse(s.as_ref()))
            .map(|s| Box::new(s) as Box<dyn ExtractionStrategy>)
            .collect();
        Self::new(strategies)
    }

    pub fn strategy_names(&self) -> Vec<&str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    pub fn extract(&self, html: &str) -> Option<Fragment> {
        let doc = Html::parse_document(html);
        self.strategies.iter().find_map(|strategy| {
            strategy.extract(&doc).map(|markup| Fragment {
                html: markup,
                matched_by: strategy.name().to_string(),
            })
        })
    }
}

impl Default for FragmentExtractor {
    fn default() -> Self {
        Self::from_selectors(&[".page-wrapper", "section"])
    }
}
