//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Storage error: {0}")]
    Storage(#[from] shellnav_storage::StorageError),

    #[error("Router error: {0}")]
    Router(#[from] shellnav_router::RouterError),

    #[error("Translation error: {0}")]
    I18n(#[from] shellnav_i18n::I18nError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}
