//! i18n error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum I18nError {
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("Invalid translation catalog: {0}")]
    InvalidCatalog(String),

    #[error("Catalog parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] shellnav_storage::StorageError),
}
