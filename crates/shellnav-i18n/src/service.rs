//! Active language and catalog

use parking_lot::RwLock;

use shellnav_storage::Database;

use crate::catalog::Catalog;
use crate::config::I18nConfig;
use crate::error::I18nError;
use crate::language::{LanguageResolver, LanguageSources};
use crate::markup::translate_markup;
use crate::Result;

struct Active {
    language: String,
    /// `None` when no catalog could be loaded; markup is then left as is
    catalog: Option<Catalog>,
}

pub struct I18n {
    config: I18nConfig,
    resolver: LanguageResolver,
    db: Database,
    active: RwLock<Active>,
}

impl I18n {
    /// Starts on the fallback language with no catalog.
    pub fn new(config: I18nConfig, db: Database) -> Self {
        let resolver = LanguageResolver::from_config(&config);
        let active = Active {
            language: resolver.fallback().to_string(),
            catalog: None,
        };

        Self {
            config,
            resolver,
            db,
            active: RwLock::new(active),
        }
    }

    pub fn config(&self) -> &I18nConfig {
        &self.config
    }

    /// Last language persisted by [`I18n::activate`].
    pub fn stored_language(&self) -> Result<Option<String>> {
        Ok(self.db.get_setting(&self.config.preference_key)?)
    }

    /// Pick the language to boot with. `sources.stored` is filled from settings when unset.
    pub fn detect_language(&self, mut sources: LanguageSources) -> Result<String> {
        if sources.stored.is_none() {
            sources.stored = self.stored_language()?;
        }
        Ok(self.resolver.resolve(&sources))
    }

    /// Catalog path for `language`, relative to the deployment root.
    pub fn catalog_path(&self, language: &str) -> String {
        self.config.catalog_path(language)
    }

    /// Make `language` current with its loaded catalog and remember the choice.
    pub fn activate(&self, language: &str, catalog: Option<Catalog>) -> Result<()> {
        let language = self
            .resolver
            .match_supported(language)
            .ok_or_else(|| I18nError::UnsupportedLanguage(language.to_string()))?
            .to_string();

        self.db.set_setting(&self.config.preference_key, &language)?;

        match &catalog {
            Some(c) => tracing::info!(language = %language, keys = c.len(), "Activated language"),
            None => tracing::info!(language = %language, "Activated language without translations"),
        }
        *self.active.write() = Active { language, catalog };
        Ok(())
    }

    pub fn language(&self) -> String {
        self.active.read().language.clone()
    }

    /// Apply the active catalog to every `data-i18n` element in `markup`.
    pub fn translate_markup(&self, markup: &str) -> String {
        let active = self.active.read();
        match &active.catalog {
            Some(catalog) => translate_markup(markup, |key| catalog.t(key)),
            None => markup.to_string(),
        }
    }
}
