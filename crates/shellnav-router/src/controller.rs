//! Navigation controller
//!
//! Owns the page cache, the shell, the session history and the in-flight
//! guard. A navigation runs:
//! 1. guard (concurrent requests are dropped, never queued)
//! 2. normalize href, build fetch URL
//! 3. cached HTML, or fetch and fill the cache
//! 4. extract the content container
//! 5. swap, translate, push history, effects, scroll, active links
//!
//! Failures in 2-5 are logged and replace the content with a fixed message.
//! Nothing is returned to the caller as an error.

use parking_lot::{Mutex, MutexGuard};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use url::Url;

use crate::cache::PageCache;
use crate::config::RouterConfig;
use crate::error::{EffectError, FetchError, RouterError};
use crate::extract::FragmentExtractor;
use crate::fetch::PageFetcher;
use crate::history::{HistoryState, PopStateEvent, SessionHistory};
use crate::hooks::NavigationHooks;
use crate::path::{CanonicalPath, LinkClassifier};
use crate::shell::{ScrollBehavior, Shell};
use crate::Result;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavigateOptions {
    /// Fetch even when the page is cached
    pub bypass_cache: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// Content swapped and effects run
    Rendered,
    /// Page loaded but had no content container; nothing changed
    NoContent,
    /// Load failed; failure message shown
    Failed,
    /// Another navigation was in flight
    Dropped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefetchOutcome {
    NotRoutable,
    AlreadyCached,
    /// A prefetch for the same path is still pending
    InProgress,
    Stored,
    Failed,
}

/// Holds the in-flight flag for the lifetime of one navigation.
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Marks a path as being prefetched until dropped.
struct PendingPrefetch<'a> {
    pending: &'a Mutex<HashSet<CanonicalPath>>,
    path: CanonicalPath,
}

impl<'a> PendingPrefetch<'a> {
    fn claim(pending: &'a Mutex<HashSet<CanonicalPath>>, path: &CanonicalPath) -> Option<Self> {
        if !pending.lock().insert(path.clone()) {
            return None;
        }
        Some(Self {
            pending,
            path: path.clone(),
        })
    }
}

impl Drop for PendingPrefetch<'_> {
    fn drop(&mut self) {
        self.pending.lock().remove(&self.path);
    }
}

pub struct NavigationController<F, H> {
    config: RouterConfig,
    fetch_base: Url,
    classifier: LinkClassifier,
    extractor: FragmentExtractor,
    cache: Mutex<PageCache>,
    shell: Mutex<Shell>,
    history: Mutex<SessionHistory>,
    current: Mutex<Option<CanonicalPath>>,
    in_flight: AtomicBool,
    pending_prefetch: Mutex<HashSet<CanonicalPath>>,
    fetcher: F,
    hooks: Arc<H>,
}

impl<F, H> NavigationController<F, H>
where
    F: PageFetcher,
    H: NavigationHooks,
{
    /// Controller with an empty shell and history starting at the deployment root.
    pub fn new(config: RouterConfig, fetcher: F, hooks: Arc<H>) -> Result<Self> {
        let fetch_base = config.fetch_base()?;
        if fetch_base.cannot_be_a_base() {
            return Err(RouterError::Config(format!(
                "origin '{}' cannot be used as a base URL",
                config.origin
            )));
        }

        let classifier = LinkClassifier::from_config(&config);
        let extractor = FragmentExtractor::from_selectors(&config.container_selectors);
        let shell = Shell::new(classifier.normalizer().clone(), Vec::<String>::new());
        let history = SessionHistory::new(config.base_path.as_str());

        Ok(Self {
            cache: Mutex::new(PageCache::new(config.cache_capacity)),
            shell: Mutex::new(shell),
            history: Mutex::new(history),
            current: Mutex::new(None),
            in_flight: AtomicBool::new(false),
            pending_prefetch: Mutex::new(HashSet::new()),
            config,
            fetch_base,
            classifier,
            extractor,
            fetcher,
            hooks,
        })
    }

    /// Links outside the content area (header, footer) for active-link tracking.
    pub fn with_chrome_links<I, S>(mut self, hrefs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.shell = Mutex::new(Shell::new(self.classifier.normalizer().clone(), hrefs));
        self
    }

    /// Location path the session starts at, e.g. `/index.html`.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.history = Mutex::new(SessionHistory::new(location));
        self
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    pub fn classifier(&self) -> &LinkClassifier {
        &self.classifier
    }

    pub fn hooks(&self) -> &Arc<H> {
        &self.hooks
    }

    pub fn is_routable(&self, href: &str) -> bool {
        self.classifier.is_routable(href)
    }

    pub fn is_navigating(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Path of the last rendered page.
    pub fn current_path(&self) -> Option<CanonicalPath> {
        self.current.lock().clone()
    }

    pub fn is_cached(&self, href: &str) -> bool {
        let path = self.classifier.normalize(href);
        self.cache.lock().has(path.as_str())
    }

    pub fn cache(&self) -> MutexGuard<'_, PageCache> {
        self.cache.lock()
    }

    pub fn with_shell<T>(&self, f: impl FnOnce(&mut Shell) -> T) -> T {
        let mut shell = self.shell.lock();
        f(&mut shell)
    }

    pub fn with_history<T>(&self, f: impl FnOnce(&SessionHistory) -> T) -> T {
        let history = self.history.lock();
        f(&history)
    }

    /// Load `href` into the shell. Never fails; see [`NavigationOutcome`].
    pub async fn navigate(
        &self,
        href: &str,
        push_history: bool,
        options: NavigateOptions,
    ) -> NavigationOutcome {
        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            tracing::debug!(href, "Navigation already in flight, dropping request");
            return NavigationOutcome::Dropped;
        };

        let path = self.classifier.normalize(href);
        match self.load(&path, push_history, options).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(path = %path, error = %e, "Failed to load page");
                self.shell
                    .lock()
                    .set_content(self.config.failure_markup.clone());
                NavigationOutcome::Failed
            }
        }
    }

    /// Warm the cache for a hovered link. All errors are swallowed.
    pub async fn prefetch(&self, href: &str) -> PrefetchOutcome {
        if !self.classifier.is_routable(href) {
            return PrefetchOutcome::NotRoutable;
        }

        let path = self.classifier.normalize(href);
        let cached = self.cache.lock().has(path.as_str());
        if cached {
            return PrefetchOutcome::AlreadyCached;
        }

        let Some(_pending) = PendingPrefetch::claim(&self.pending_prefetch, &path) else {
            return PrefetchOutcome::InProgress;
        };

        let url = match self.page_url(&path) {
            Ok(url) => url,
            Err(e) => {
                tracing::debug!(path = %path, error = %e, "Prefetch skipped");
                return PrefetchOutcome::Failed;
            }
        };

        match self.fetcher.fetch(&url).await {
            Ok(html) => {
                self.cache.lock().set(path.clone(), html);
                tracing::debug!(path = %path, "Prefetched page");
                PrefetchOutcome::Stored
            }
            Err(e) => {
                tracing::debug!(path = %path, error = %e, "Prefetch failed");
                PrefetchOutcome::Failed
            }
        }
    }

    /// Route the initial location.
    ///
    /// Landing aliases go to the default page, other routable paths load as
    /// deep links, anything else is left to the browser (`None`).
    pub async fn start(&self) -> Option<NavigationOutcome> {
        let location = self.history.lock().location().to_string();
        let initial = self.classifier.normalize(&location);

        if self
            .config
            .landing_aliases
            .iter()
            .any(|alias| alias == initial.as_str())
        {
            let default_path = self.config.default_path.clone();
            return Some(
                self.navigate(&default_path, false, NavigateOptions::default())
                    .await,
            );
        }

        if self.classifier.is_routable(initial.as_str()) {
            return Some(
                self.navigate(initial.as_str(), false, NavigateOptions::default())
                    .await,
            );
        }

        tracing::info!(location = %location, "Initial location not routable, leaving page as is");
        None
    }

    /// Re-render the page a history move landed on.
    ///
    /// The stored fragment is not restored directly; the page goes through
    /// `navigate` again (cache first).
    pub async fn handle_pop_state(&self, event: PopStateEvent) -> Option<NavigationOutcome> {
        if let Some(state) = event.state.filter(|s| !s.href.is_empty()) {
            return Some(
                self.navigate(state.href.as_str(), false, NavigateOptions::default())
                    .await,
            );
        }

        let path = self.classifier.normalize(&event.location);
        if self.classifier.is_routable(path.as_str()) {
            return Some(
                self.navigate(path.as_str(), false, NavigateOptions::default())
                    .await,
            );
        }

        None
    }

    pub async fn back(&self) -> Option<NavigationOutcome> {
        let event = self.history.lock().back()?;
        self.handle_pop_state(event).await
    }

    pub async fn forward(&self) -> Option<NavigationOutcome> {
        let event = self.history.lock().forward()?;
        self.handle_pop_state(event).await
    }

    /// Fetch a non-page file (e.g. a translation catalog) relative to the
    /// deployment root. Bypasses the page cache.
    pub async fn fetch_asset(&self, path: &str) -> Result<String> {
        let url = self.fetch_base.join(path.trim_start_matches('/'))?;
        self.fetcher.fetch(&url).await.map_err(RouterError::Fetch)
    }

    fn page_url(&self, path: &CanonicalPath) -> Result<Url> {
        Ok(self.fetch_base.join(path.as_str())?)
    }

    async fn load(
        &self,
        path: &CanonicalPath,
        push_history: bool,
        options: NavigateOptions,
    ) -> Result<NavigationOutcome> {
        let url = self.page_url(path)?;
        let html = self.resolve_html(path, &url, options).await?;
        Ok(self.render(path, &html, push_history))
    }

    async fn resolve_html(
        &self,
        path: &CanonicalPath,
        url: &Url,
        options: NavigateOptions,
    ) -> Result<String> {
        let cached = if options.bypass_cache {
            None
        } else {
            self.cache.lock().get(path.as_str()).map(str::to_string)
        };
        if let Some(html) = cached {
            tracing::debug!(path = %path, "Serving page from cache");
            return Ok(html);
        }

        let html = self.fetcher.fetch(url).await.map_err(|e| match e {
            FetchError::Status { status, .. } => {
                tracing::debug!(path = %path, status, "Page request returned an error status");
                RouterError::PageNotFound(path.to_string())
            }
            other => RouterError::Fetch(other),
        })?;

        self.cache.lock().set(path.clone(), html.clone());
        Ok(html)
    }

    fn render(&self, path: &CanonicalPath, html: &str, push_history: bool) -> NavigationOutcome {
        let Some(fragment) = self.extractor.extract(html) else {
            tracing::debug!(path = %path, "No content container in page, nothing to swap");
            return NavigationOutcome::NoContent;
        };

        let mut shell = self.shell.lock();
        shell.set_content(fragment.html.clone());
        self.hooks.translate(&mut shell);

        if push_history {
            let url = format!("{}{}", self.config.base_path, path);
            self.history.lock().push_state(
                HistoryState {
                    html: fragment.html,
                    href: path.clone(),
                },
                url,
            );
        }

        report_effect(self.hooks.cleanup_effects());
        report_effect(self.hooks.run_entry_effects(&shell));
        report_effect(self.hooks.run_ambient_effect(&shell));

        shell.scroll_to_top(ScrollBehavior::Smooth);
        shell.set_active_path(path);
        drop(shell);

        *self.current.lock() = Some(path.clone());
        self.schedule_layout_refresh();

        tracing::info!(path = %path, container = %fragment.matched_by, "Navigated");
        NavigationOutcome::Rendered
    }

    fn schedule_layout_refresh(&self) {
        if !self.hooks.wants_layout_refresh() {
            return;
        }

        let hooks = Arc::clone(&self.hooks);
        let delay = self.config.layout_refresh_delay();
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    tokio::time::sleep(delay).await;
                    hooks.refresh_layout_effects();
                });
            }
            Err(_) => hooks.refresh_layout_effects(),
        }
    }
}

fn report_effect(result: std::result::Result<(), EffectError>) {
    if let Err(e) = result {
        tracing::warn!(effect = %e.effect, reason = %e.reason, "Effect failed");
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::config::BasePath;
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;
    use tokio::sync::Notify;

    pub(crate) fn page(title: &str) -> String {
        format!(
            "<html><body><nav><a href=\"pages/home.html\">Home</a></nav>\
             <div class=\"page-wrapper\"><h1>{title}</h1></div></body></html>"
        )
    }

    pub(crate) struct Gate {
        pub started: Arc<Notify>,
        pub release: Arc<Notify>,
    }

    #[derive(Default)]
    pub(crate) struct StubFetcher {
        pages: Mutex<HashMap<String, std::result::Result<String, u16>>>,
        requests: Mutex<Vec<String>>,
        gate: Option<Gate>,
    }

    impl StubFetcher {
        pub(crate) fn with_page(self, path: &str, body: String) -> Self {
            self.pages.lock().insert(path.to_string(), Ok(body));
            self
        }

        pub(crate) fn with_status(self, path: &str, status: u16) -> Self {
            self.pages.lock().insert(path.to_string(), Err(status));
            self
        }

        pub(crate) fn with_gate(mut self, gate: Gate) -> Self {
            self.gate = Some(gate);
            self
        }

        pub(crate) fn requests(&self) -> Vec<String> {
            self.requests.lock().clone()
        }
    }

    impl PageFetcher for StubFetcher {
        async fn fetch(&self, url: &Url) -> std::result::Result<String, FetchError> {
            self.requests.lock().push(url.path().to_string());

            if let Some(gate) = &self.gate {
                gate.started.notify_one();
                gate.release.notified().await;
            }

            let entry = self.pages.lock().get(url.path()).cloned();
            match entry {
                Some(Ok(body)) => Ok(body),
                Some(Err(status)) => Err(FetchError::Status {
                    url: url.to_string(),
                    status,
                }),
                None => Err(FetchError::Transport("connection refused".to_string())),
            }
        }
    }

    #[derive(Default)]
    pub(crate) struct RecordingHooks {
        pub calls: Mutex<Vec<&'static str>>,
        pub fail_entry: bool,
        pub layout_refresh: bool,
        pub refreshed: AtomicUsize,
    }

    impl RecordingHooks {
        pub(crate) fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().clone()
        }
    }

    impl NavigationHooks for RecordingHooks {
        fn translate(&self, _shell: &mut Shell) {
            self.calls.lock().push("translate");
        }

        fn cleanup_effects(&self) -> std::result::Result<(), EffectError> {
            self.calls.lock().push("cleanup");
            Ok(())
        }

        fn run_entry_effects(&self, _shell: &Shell) -> std::result::Result<(), EffectError> {
            self.calls.lock().push("entry");
            if self.fail_entry {
                return Err(EffectError::new("hero", "animation library missing"));
            }
            Ok(())
        }

        fn run_ambient_effect(&self, _shell: &Shell) -> std::result::Result<(), EffectError> {
            self.calls.lock().push("ambient");
            Ok(())
        }

        fn wants_layout_refresh(&self) -> bool {
            self.layout_refresh
        }

        fn refresh_layout_effects(&self) {
            self.refreshed.fetch_add(1, Ordering::SeqCst);
        }
    }

    pub(crate) fn requests(nav: &NavigationController<StubFetcher, RecordingHooks>) -> Vec<String> {
        nav.fetcher.requests()
    }

    pub(crate) fn controller(
        fetcher: StubFetcher,
        hooks: Arc<RecordingHooks>,
    ) -> NavigationController<StubFetcher, RecordingHooks> {
        let config = RouterConfig::new("https://site.example", BasePath::root());
        NavigationController::new(config, fetcher, hooks).unwrap()
    }

    #[tokio::test]
    async fn test_navigate_fetches_then_serves_from_cache() {
        let fetcher = StubFetcher::default().with_page("/pages/about.html", page("About"));
        let hooks = Arc::new(RecordingHooks::default());
        let nav = controller(fetcher, hooks);

        let outcome = nav
            .navigate("/pages/about.html?ref=nav", true, NavigateOptions::default())
            .await;
        assert_eq!(outcome, NavigationOutcome::Rendered);
        assert_eq!(nav.with_shell(|s| s.content().to_string()), "<h1>About</h1>");
        assert!(nav.is_cached("pages/about.html"));
        assert_eq!(nav.current_path().unwrap().as_str(), "pages/about.html");

        let outcome = nav
            .navigate("pages/about.html", true, NavigateOptions::default())
            .await;
        assert_eq!(outcome, NavigationOutcome::Rendered);
        assert_eq!(nav.fetcher.requests(), vec!["/pages/about.html"]);
        assert_eq!(nav.with_history(|h| h.len()), 3);
    }

    #[tokio::test]
    async fn test_bypass_cache_refetches() {
        let fetcher = StubFetcher::default().with_page("/pages/about.html", page("About"));
        let nav = controller(fetcher, Arc::new(RecordingHooks::default()));

        nav.navigate("pages/about.html", false, NavigateOptions::default())
            .await;
        nav.navigate(
            "pages/about.html",
            false,
            NavigateOptions { bypass_cache: true },
        )
        .await;

        assert_eq!(nav.fetcher.requests().len(), 2);
        assert_eq!(nav.cache().len(), 1);
    }

    #[tokio::test]
    async fn test_push_history_records_fragment() {
        let fetcher = StubFetcher::default().with_page("/pages/services.html", page("Services"));
        let nav = controller(fetcher, Arc::new(RecordingHooks::default()));

        nav.navigate("pages/services.html", true, NavigateOptions::default())
            .await;

        nav.with_history(|history| {
            let entry = history.current();
            assert_eq!(entry.url, "/pages/services.html");
            let state = entry.state.as_ref().unwrap();
            assert_eq!(state.href.as_str(), "pages/services.html");
            assert_eq!(state.html, "<h1>Services</h1>");
        });
    }

    #[tokio::test]
    async fn test_missing_page_shows_failure_message() {
        let fetcher = StubFetcher::default().with_status("/pages/missing.html", 404);
        let hooks = Arc::new(RecordingHooks::default());
        let nav = controller(fetcher, Arc::clone(&hooks));

        let outcome = nav
            .navigate("pages/missing.html", true, NavigateOptions::default())
            .await;

        assert_eq!(outcome, NavigationOutcome::Failed);
        let content = nav.with_shell(|s| s.content().to_string());
        assert!(content.ends_with("<p>Sorry, this page failed to load.</p>"));
        assert_eq!(nav.with_history(|h| h.len()), 1);
        assert!(!nav.is_navigating());
        assert!(hooks.calls().is_empty());
        assert!(!nav.is_cached("pages/missing.html"));
    }

    #[tokio::test]
    async fn test_network_error_shows_failure_message() {
        let nav = controller(StubFetcher::default(), Arc::new(RecordingHooks::default()));

        let outcome = nav
            .navigate("pages/offline.html", true, NavigateOptions::default())
            .await;

        assert_eq!(outcome, NavigationOutcome::Failed);
        assert_eq!(
            nav.with_shell(|s| s.content().to_string()),
            "<p>Sorry, this page failed to load.</p>"
        );
        assert!(nav.current_path().is_none());
    }

    #[tokio::test]
    async fn test_page_without_container_is_soft_noop() {
        let fetcher = StubFetcher::default().with_page(
            "/pages/bare.html",
            "<html><body><div>no wrapper</div></body></html>".to_string(),
        );
        let hooks = Arc::new(RecordingHooks::default());
        let nav = controller(fetcher, Arc::clone(&hooks));
        nav.with_shell(|s| s.set_content("<p>previous</p>"));

        let outcome = nav
            .navigate("pages/bare.html", true, NavigateOptions::default())
            .await;

        assert_eq!(outcome, NavigationOutcome::NoContent);
        assert_eq!(nav.with_shell(|s| s.content().to_string()), "<p>previous</p>");
        assert_eq!(nav.with_history(|h| h.len()), 1);
        assert!(hooks.calls().is_empty());
        assert!(!nav.is_navigating());
        // the body is still cached
        assert!(nav.is_cached("pages/bare.html"));
    }

    #[tokio::test]
    async fn test_hooks_run_in_order() {
        let fetcher = StubFetcher::default().with_page("/pages/home.html", page("Home"));
        let hooks = Arc::new(RecordingHooks::default());
        let nav = controller(fetcher, Arc::clone(&hooks));

        nav.navigate("pages/home.html", true, NavigateOptions::default())
            .await;

        assert_eq!(hooks.calls(), vec!["translate", "cleanup", "entry", "ambient"]);
    }

    #[tokio::test]
    async fn test_effect_failure_does_not_abort_navigation() {
        let fetcher = StubFetcher::default().with_page("/pages/home.html", page("Home"));
        let hooks = Arc::new(RecordingHooks {
            fail_entry: true,
            ..Default::default()
        });
        let nav = controller(fetcher, Arc::clone(&hooks));
        nav.with_shell(|s| s.set_scroll_top(300));

        let outcome = nav
            .navigate("pages/home.html", true, NavigateOptions::default())
            .await;

        assert_eq!(outcome, NavigationOutcome::Rendered);
        assert_eq!(hooks.calls(), vec!["translate", "cleanup", "entry", "ambient"]);
        nav.with_shell(|s| {
            assert_eq!(s.scroll_top(), 0);
            assert_eq!(s.last_scroll(), Some(ScrollBehavior::Smooth));
            assert_eq!(s.active_path().unwrap().as_str(), "pages/home.html");
        });
    }

    #[tokio::test]
    async fn test_active_links_updated() {
        let fetcher = StubFetcher::default().with_page("/pages/services.html", page("Services"));
        let config = RouterConfig::new("https://site.example", BasePath::root());
        let nav = NavigationController::new(config, fetcher, Arc::new(RecordingHooks::default()))
            .unwrap()
            .with_chrome_links(["pages/home.html", "/pages/services.html", "#top"]);

        nav.navigate("pages/services.html", true, NavigateOptions::default())
            .await;

        assert_eq!(nav.with_shell(|s| s.active_hrefs().join(",")), "/pages/services.html");
    }

    #[tokio::test]
    async fn test_concurrent_navigation_is_dropped() {
        let started = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        let fetcher = StubFetcher::default()
            .with_page("/pages/a.html", page("A"))
            .with_page("/pages/b.html", page("B"))
            .with_gate(Gate {
                started: Arc::clone(&started),
                release: Arc::clone(&release),
            });
        let nav = Arc::new(controller(fetcher, Arc::new(RecordingHooks::default())));

        let first = {
            let nav = Arc::clone(&nav);
            tokio::spawn(async move {
                nav.navigate("pages/a.html", true, NavigateOptions::default())
                    .await
            })
        };
        started.notified().await;
        assert!(nav.is_navigating());

        let second = nav
            .navigate("pages/b.html", true, NavigateOptions::default())
            .await;
        assert_eq!(second, NavigationOutcome::Dropped);
        assert_eq!(nav.with_shell(|s| s.content().to_string()), "");
        assert_eq!(nav.fetcher.requests(), vec!["/pages/a.html"]);

        release.notify_one();
        assert_eq!(first.await.unwrap(), NavigationOutcome::Rendered);
        assert!(!nav.is_navigating());
        assert_eq!(nav.with_shell(|s| s.content().to_string()), "<h1>A</h1>");
        assert!(!nav.is_cached("pages/b.html"));
    }

    struct PanickingHooks;

    impl NavigationHooks for PanickingHooks {
        fn translate(&self, _shell: &mut Shell) {
            panic!("translation table corrupt");
        }
    }

    #[tokio::test]
    async fn test_guard_released_when_hook_panics() {
        let fetcher = StubFetcher::default().with_page("/pages/about.html", page("About"));
        let config = RouterConfig::new("https://site.example", BasePath::root());
        let nav = Arc::new(
            NavigationController::new(config, fetcher, Arc::new(PanickingHooks)).unwrap(),
        );

        let task = {
            let nav = Arc::clone(&nav);
            tokio::spawn(async move {
                nav.navigate("pages/about.html", true, NavigateOptions::default())
                    .await
            })
        };
        let err = task.await.unwrap_err();
        assert!(err.is_panic());

        assert!(!nav.is_navigating());
        assert_eq!(nav.with_history(|h| h.len()), 1);
    }

    #[tokio::test]
    async fn test_start_routes_landing_to_default() {
        let fetcher = StubFetcher::default().with_page("/pages/home.html", page("Home"));
        let config = RouterConfig::new("https://site.example", BasePath::root());
        let nav = NavigationController::new(config, fetcher, Arc::new(RecordingHooks::default()))
            .unwrap()
            .with_location("/index.html");

        assert_eq!(nav.start().await, Some(NavigationOutcome::Rendered));
        assert_eq!(nav.fetcher.requests(), vec!["/pages/home.html"]);
        assert_eq!(nav.with_history(|h| h.len()), 1);
    }

    #[tokio::test]
    async fn test_start_deep_link_and_foreign_location() {
        let fetcher = StubFetcher::default().with_page("/pages/about.html", page("About"));
        let config = RouterConfig::new("https://site.example", BasePath::root());
        let nav = NavigationController::new(config, fetcher, Arc::new(RecordingHooks::default()))
            .unwrap()
            .with_location("/pages/about.html");
        assert_eq!(nav.start().await, Some(NavigationOutcome::Rendered));
        assert_eq!(nav.with_shell(|s| s.content().to_string()), "<h1>About</h1>");

        let config = RouterConfig::new("https://site.example", BasePath::root());
        let nav = NavigationController::new(
            config,
            StubFetcher::default(),
            Arc::new(RecordingHooks::default()),
        )
        .unwrap()
        .with_location("/assets/brochure.pdf");
        assert_eq!(nav.start().await, None);
        assert!(nav.fetcher.requests().is_empty());
    }

    #[tokio::test]
    async fn test_pop_state_without_state_uses_location() {
        let fetcher = StubFetcher::default().with_page("/pages/about.html", page("About"));
        let nav = controller(fetcher, Arc::new(RecordingHooks::default()));

        let outcome = nav
            .handle_pop_state(PopStateEvent {
                state: None,
                location: "/pages/about.html".to_string(),
            })
            .await;

        assert_eq!(outcome, Some(NavigationOutcome::Rendered));
        assert_eq!(nav.fetcher.requests(), vec!["/pages/about.html"]);
        assert_eq!(nav.with_history(|h| h.len()), 1);
    }

    #[tokio::test]
    async fn test_back_rerenders_through_cache() {
        let fetcher = StubFetcher::default()
            .with_page("/pages/home.html", page("Home"))
            .with_page("/pages/about.html", page("About"));
        let nav = controller(fetcher, Arc::new(RecordingHooks::default()));

        nav.navigate("pages/home.html", true, NavigateOptions::default())
            .await;
        nav.navigate("pages/about.html", true, NavigateOptions::default())
            .await;

        assert_eq!(nav.back().await, Some(NavigationOutcome::Rendered));
        assert_eq!(nav.with_shell(|s| s.content().to_string()), "<h1>Home</h1>");
        assert_eq!(nav.fetcher.requests().len(), 2);
        assert_eq!(nav.with_history(|h| h.len()), 3);

        assert_eq!(nav.forward().await, Some(NavigationOutcome::Rendered));
        assert_eq!(nav.with_shell(|s| s.content().to_string()), "<h1>About</h1>");
        assert_eq!(nav.forward().await, None);
    }

    #[tokio::test]
    async fn test_prefetch_fetches_once() {
        let fetcher = StubFetcher::default().with_page("/pages/services.html", page("Services"));
        let nav = controller(fetcher, Arc::new(RecordingHooks::default()));

        assert_eq!(nav.prefetch("pages/services.html").await, PrefetchOutcome::Stored);
        assert_eq!(
            nav.prefetch("/pages/services.html#top").await,
            PrefetchOutcome::AlreadyCached
        );
        assert_eq!(nav.fetcher.requests().len(), 1);

        // navigation is served from the prefetched copy
        nav.navigate("pages/services.html", true, NavigateOptions::default())
            .await;
        assert_eq!(nav.fetcher.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_prefetch_ignores_external_and_failures() {
        let fetcher = StubFetcher::default().with_status("/pages/gone.html", 410);
        let nav = controller(fetcher, Arc::new(RecordingHooks::default()));

        assert_eq!(
            nav.prefetch("https://partner.example/pages/x.html").await,
            PrefetchOutcome::NotRoutable
        );
        assert_eq!(nav.prefetch("pages/gone.html").await, PrefetchOutcome::Failed);
        assert!(!nav.is_cached("pages/gone.html"));
        assert_eq!(nav.with_shell(|s| s.content().to_string()), "");
        assert_eq!(nav.with_history(|h| h.len()), 1);
    }

    #[tokio::test]
    async fn test_concurrent_prefetch_of_same_path_fetches_once() {
        let started = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        let fetcher = StubFetcher::default()
            .with_page("/pages/a.html", page("A"))
            .with_gate(Gate {
                started: Arc::clone(&started),
                release: Arc::clone(&release),
            });
        let nav = Arc::new(controller(fetcher, Arc::new(RecordingHooks::default())));

        let first = {
            let nav = Arc::clone(&nav);
            tokio::spawn(async move { nav.prefetch("pages/a.html").await })
        };
        started.notified().await;

        assert_eq!(nav.prefetch("pages/a.html").await, PrefetchOutcome::InProgress);

        release.notify_one();
        assert_eq!(first.await.unwrap(), PrefetchOutcome::Stored);
        assert_eq!(nav.fetcher.requests().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_layout_refresh_runs_after_delay() {
        let fetcher = StubFetcher::default().with_page("/pages/home.html", page("Home"));
        let hooks = Arc::new(RecordingHooks {
            layout_refresh: true,
            ..Default::default()
        });
        let nav = controller(fetcher, Arc::clone(&hooks));

        nav.navigate("pages/home.html", true, NavigateOptions::default())
            .await;
        assert_eq!(hooks.refreshed.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(hooks.refreshed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_hosted_base_path() {
        let fetcher = StubFetcher::default().with_page("/site/pages/about.html", page("About"));
        let config = RouterConfig::new("https://gerco.github.io", BasePath::new("site"));
        let nav = NavigationController::new(config, fetcher, Arc::new(RecordingHooks::default()))
            .unwrap();

        nav.navigate(
            "https://gerco.github.io/site/pages/about.html",
            true,
            NavigateOptions::default(),
        )
        .await;

        assert_eq!(nav.fetcher.requests(), vec!["/site/pages/about.html"]);
        assert_eq!(nav.with_history(|h| h.location().to_string()), "/site/pages/about.html");
    }
}
