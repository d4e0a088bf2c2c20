//! Site assembly
//!
//! Owns the settings database, the translation service, the effects
//! lifecycle and the navigation controller, and wires them together the
//! way the page does on load.

use std::sync::Arc;
use url::Url;

use shellnav_i18n::{query_language, Catalog, I18n, LanguageSources};
use shellnav_router::{
    Dispatch, NavigationController, NavigationHooks, NavigationOutcome, PageFetcher, RouterEvent,
};
use shellnav_storage::Database;

use crate::config::Config;
use crate::effects::{EffectDriver, EffectsLifecycle};
use crate::hooks::SiteHooks;
use crate::Result;

pub type SiteRouter<F, D> = NavigationController<F, SiteHooks<D>>;

pub struct Site<F, D> {
    config: Config,
    db: Database,
    i18n: Arc<I18n>,
    effects: Arc<EffectsLifecycle<D>>,
    router: Arc<SiteRouter<F, D>>,
    /// Language requested through the location's query string
    requested_language: Option<String>,
}

impl<F, D> Site<F, D>
where
    F: PageFetcher,
    D: EffectDriver,
{
    /// Open the settings database at `config.database_path` and assemble the site.
    pub fn open(config: Config, fetcher: F, driver: D, location: &Url) -> Result<Self> {
        if let Some(parent) = config.database_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db = Database::open(&config.database_path)?;
        Self::new(config, db, fetcher, driver, location)
    }

    pub fn new(config: Config, db: Database, fetcher: F, driver: D, location: &Url) -> Result<Self> {
        let i18n = Arc::new(I18n::new(config.i18n.clone(), db.clone()));
        let effects = Arc::new(EffectsLifecycle::new(driver));
        let hooks = Arc::new(SiteHooks::new(Arc::clone(&i18n), Arc::clone(&effects)));

        let router = NavigationController::new(config.router.clone(), fetcher, hooks)?
            .with_chrome_links(config.chrome_links.iter().cloned())
            .with_location(location.path());

        let requested_language = location
            .query()
            .and_then(|q| query_language(q, &config.i18n.query_param));

        tracing::debug!(
            location = %location,
            base_path = %config.router.base_path,
            "Site assembled"
        );

        Ok(Self {
            config,
            db,
            i18n,
            effects,
            router: Arc::new(router),
            requested_language,
        })
    }

    /// Pick and load the language, then route the initial location.
    ///
    /// `navigator_languages` are the browser's preferred languages, most preferred first.
    pub async fn boot(&self, navigator_languages: Vec<String>) -> Result<Option<NavigationOutcome>> {
        let sources = LanguageSources {
            stored: None,
            query: self.requested_language.clone(),
            navigator: navigator_languages,
        };
        let language = self.i18n.detect_language(sources)?;

        let catalog = self.load_catalog(&language).await;
        self.i18n.activate(&language, catalog)?;
        self.translate_shell();

        Ok(self.router.start().await)
    }

    /// Switch language and re-translate what is on screen.
    pub async fn change_language(&self, language: &str) -> Result<()> {
        let catalog = self.load_catalog(language).await;
        self.i18n.activate(language, catalog)?;
        self.translate_shell();
        Ok(())
    }

    pub fn dispatch(&self, event: RouterEvent) -> Dispatch {
        self.router.dispatch(event)
    }

    /// Open or close the mobile menu. Returns the new state.
    pub fn toggle_menu(&self) -> bool {
        self.router.with_shell(|shell| shell.toggle_menu())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn i18n(&self) -> &Arc<I18n> {
        &self.i18n
    }

    pub fn effects(&self) -> &Arc<EffectsLifecycle<D>> {
        &self.effects
    }

    pub fn router(&self) -> &Arc<SiteRouter<F, D>> {
        &self.router
    }

    /// `None` for a missing or malformed catalog; markup then stays as authored.
    async fn load_catalog(&self, language: &str) -> Option<Catalog> {
        let path = self.i18n.catalog_path(language);
        let raw = match self.router.fetch_asset(&path).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(language, path = %path, error = %e, "Failed to load translations");
                return None;
            }
        };

        match Catalog::from_json(&raw) {
            Ok(catalog) => Some(catalog),
            Err(e) => {
                tracing::warn!(language, path = %path, error = %e, "Invalid translation catalog");
                None
            }
        }
    }

    fn translate_shell(&self) {
        let hooks = Arc::clone(self.router.hooks());
        self.router.with_shell(|shell| hooks.translate(shell));
    }
}
