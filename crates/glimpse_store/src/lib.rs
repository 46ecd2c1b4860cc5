//! Glimpse Persistence Layer
//!
//! SQLite-backed storage for named collections: a collection is a set of
//! root folders plus ordering settings, keyed by a sanitized name.

mod collections;
mod pool;
mod schema;

pub use collections::{collection_key, Collection, CollectionStore, SortMethod};
pub use pool::DbPool;
pub use schema::migrate;

use directories::ProjectDirs;
use std::path::PathBuf;
use thiserror::Error;

/// Persistence errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Pool error: {0}")]
    Pool(String),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Collection not found: {0}")]
    NotFound(String),

    #[error("Collection already exists: {0}")]
    AlreadyExists(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Get the data directory holding the collection database
pub fn store_dir() -> PathBuf {
    ProjectDirs::from("com", "Glimpse", "Glimpse")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("./data"))
}

/// Open the collection store at the default location
pub fn init() -> Result<CollectionStore> {
    let db_dir = store_dir();
    std::fs::create_dir_all(&db_dir)?;
    open_at(&db_dir.join("collections.db"))
}

/// Open (and migrate) a collection store backed by the given database file
pub fn open_at(sqlite_path: &std::path::Path) -> Result<CollectionStore> {
    let pool = pool::init_pool(sqlite_path)?;
    migrate(&pool)?;

    tracing::info!("Collection database initialized at {:?}", sqlite_path);
    Ok(CollectionStore::new(pool))
}
