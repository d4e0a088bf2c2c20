//! Shellnav Storage Layer
//!
//! SQLite-backed key/value settings. Stands in for the browser's local
//! persistent storage (last selected language and similar preferences).

mod database;
mod error;
mod migrations;

pub use database::Database;
pub use error::StorageError;

pub type Result<T> = std::result::Result<T, StorageError>;
