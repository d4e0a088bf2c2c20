//! Shellnav Router
//!
//! Client-side navigation for a static site rendered into a persistent shell:
//! - internal links are intercepted and their page fragment swapped in
//! - fetched pages are kept in a small bounded cache, hovered links are prefetched
//! - session history is kept in sync; back/forward re-render through the cache
//! - translation and visual effects run through injected [`NavigationHooks`]

mod cache;
mod config;
mod controller;
mod error;
mod events;
mod extract;
mod fetch;
mod history;
mod hooks;
mod path;
mod shell;

pub use cache::PageCache;
pub use config::{
    BasePath, RouterConfig, DEFAULT_CACHE_CAPACITY, DEFAULT_FAILURE_MARKUP, HOSTED_PAGES_SUFFIX,
};
pub use controller::{NavigateOptions, NavigationController, NavigationOutcome, PrefetchOutcome};
pub use error::{EffectError, FetchError, RouterError};
pub use events::{Dispatch, RouterEvent};
pub use extract::{ExtractionStrategy, Fragment, FragmentExtractor, SelectorStrategy};
pub use fetch::{HttpFetcher, PageFetcher};
pub use history::{HistoryEntry, HistoryState, PopStateEvent, SessionHistory};
pub use hooks::{NavigationHooks, NoopHooks};
pub use path::{CanonicalPath, LinkClassifier, PathNormalizer};
pub use shell::{NavLink, ScrollBehavior, Shell};

pub type Result<T> = std::result::Result<T, RouterError>;
