//! Shellnav i18n
//!
//! Key-based text substitution for swapped-in page content:
//! - language resolved from the stored preference, the `lng` query
//!   parameter, then the browser's languages, falling back to `en`
//! - catalogs are i18next-style `translation.json` files, nested keys joined with `.`
//! - every element carrying `data-i18n` gets its text replaced

mod catalog;
mod config;
mod error;
mod language;
mod markup;
mod service;

pub use catalog::Catalog;
pub use config::I18nConfig;
pub use error::I18nError;
pub use language::{query_language, LanguageResolver, LanguageSources};
pub use markup::{translate_markup, TRANSLATION_ATTR};
pub use service::I18n;

pub type Result<T> = std::result::Result<T, I18nError>;
