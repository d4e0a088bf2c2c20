//! Shellnav Core
//!
//! Assembles the single-page site: settings storage, translations, visual
//! effects and client-side navigation behind one [`Site`].

mod config;
mod effects;
mod error;
mod hooks;
mod site;

pub use config::{Config, DEFAULT_REPO};
pub use effects::{
    AmbientHandle, EffectDriver, EffectsLifecycle, EntryAnimation, TracingDriver,
    AMBIENT_CONTAINERS, ENTRY_ANIMATIONS, TWEEN_TARGETS,
};
pub use error::CoreError;
pub use hooks::SiteHooks;
pub use site::{Site, SiteRouter};

// Re-export the component crates
pub use shellnav_i18n::{Catalog, I18n, I18nConfig, I18nError, LanguageSources};
pub use shellnav_router::{
    BasePath, Dispatch, EffectError, FetchError, HttpFetcher, NavigateOptions,
    NavigationController, NavigationOutcome, PageFetcher, PrefetchOutcome, RouterConfig,
    RouterError, RouterEvent,
};
pub use shellnav_storage::{Database, StorageError};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}
