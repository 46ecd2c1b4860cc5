//! Collection records and CRUD operations
//!
//! A collection never owns image files; deleting one removes the record
//! only. Renaming is modeled as delete-old + create-new, sequenced by the
//! caller.

use crate::{DbPool, Result, StoreError};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// How a collection orders its images
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortMethod {
    #[default]
    #[serde(rename = "random")]
    Random,
    #[serde(rename = "name")]
    Name,
    #[serde(rename = "path")]
    Path,
    #[serde(rename = "size")]
    Size,
    #[serde(rename = "date")]
    Date,
}

impl SortMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortMethod::Random => "random",
            SortMethod::Name => "name",
            SortMethod::Path => "path",
            SortMethod::Size => "size",
            SortMethod::Date => "date",
        }
    }

    /// Parse a stored value; unknown text falls back to random
    pub fn from_db(s: &str) -> Self {
        match s {
            "name" => SortMethod::Name,
            "path" => SortMethod::Path,
            "size" => SortMethod::Size,
            "date" => SortMethod::Date,
            "random" => SortMethod::Random,
            other => {
                tracing::warn!("Unknown sort method '{}', using random", other);
                SortMethod::Random
            }
        }
    }
}

/// A named set of image folders plus ordering settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    pub name: String,
    /// Root folders, display order preserved, no duplicates
    pub paths: Vec<PathBuf>,
    pub sort_method: SortMethod,
    /// Ignored when `sort_method` is random
    pub sort_descending: bool,
    /// Unix seconds
    pub created_at: i64,
    /// Unix seconds; None until first opened
    pub last_used_at: Option<i64>,
    /// Cached count, refreshed on structural change
    pub image_count: usize,
}

impl Collection {
    /// The persistence key for this collection
    pub fn key(&self) -> String {
        collection_key(&self.name)
    }
}

/// Sanitize a collection name into its persistence key.
///
/// Keeps alphanumerics, spaces, dashes and underscores; a name that
/// sanitizes to nothing gets a placeholder key.
pub fn collection_key(name: &str) -> String {
    let key: String = name
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .collect();
    let key = key.trim().to_string();

    if key.is_empty() {
        "_unnamed".to_string()
    } else {
        key
    }
}

/// CRUD surface over the collections table
pub struct CollectionStore {
    pool: DbPool,
}

const COLLECTION_COLUMNS: &str =
    "name, paths, sort_method, sort_descending, created_at, last_used_at, image_count";

impl CollectionStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> Result<r2d2::PooledConnection<r2d2_sqlite::SqliteConnectionManager>> {
        self.pool.get().map_err(|e| StoreError::Pool(e.to_string()))
    }

    /// Create a new collection. Fails with `AlreadyExists` when the
    /// sanitized name is already taken; never overwrites.
    pub fn create(
        &self,
        name: &str,
        paths: Vec<PathBuf>,
        sort_method: SortMethod,
        sort_descending: bool,
    ) -> Result<Collection> {
        let key = collection_key(name);
        if self.exists(name)? {
            return Err(StoreError::AlreadyExists(name.to_string()));
        }

        // Duplicates are rejected, first occurrence wins
        let mut deduped: Vec<PathBuf> = Vec::with_capacity(paths.len());
        for path in paths {
            if !deduped.contains(&path) {
                deduped.push(path);
            }
        }

        let collection = Collection {
            name: name.to_string(),
            paths: deduped,
            sort_method,
            sort_descending,
            created_at: Utc::now().timestamp(),
            last_used_at: None,
            image_count: 0,
        };

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO collections (key, name, paths, sort_method, sort_descending, created_at, last_used_at, image_count)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            rusqlite::params![
                key,
                collection.name,
                paths_to_json(&collection.paths)?,
                collection.sort_method.as_str(),
                collection.sort_descending as i64,
                collection.created_at,
                collection.last_used_at,
                collection.image_count as i64,
            ],
        )?;

        tracing::info!("Created collection '{}'", collection.name);
        Ok(collection)
    }

    /// Load a collection by name
    pub fn load(&self, name: &str) -> Result<Collection> {
        let conn = self.conn()?;
        let key = collection_key(name);

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM collections WHERE key = ?1",
            COLLECTION_COLUMNS
        ))?;

        match stmt.query_row([&key], row_to_collection) {
            Ok(collection) => Ok(collection?),
            Err(rusqlite::Error::QueryReturnedNoRows) => {
                Err(StoreError::NotFound(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Persist every field of an existing collection at its key
    pub fn save(&self, collection: &Collection) -> Result<()> {
        let conn = self.conn()?;

        let rows = conn.execute(
            "UPDATE collections
             SET name = ?2, paths = ?3, sort_method = ?4, sort_descending = ?5,
                 created_at = ?6, last_used_at = ?7, image_count = ?8
             WHERE key = ?1",
            rusqlite::params![
                collection.key(),
                collection.name,
                paths_to_json(&collection.paths)?,
                collection.sort_method.as_str(),
                collection.sort_descending as i64,
                collection.created_at,
                collection.last_used_at,
                collection.image_count as i64,
            ],
        )?;

        if rows == 0 {
            return Err(StoreError::NotFound(collection.name.clone()));
        }
        Ok(())
    }

    /// Delete a collection record (never touches image files)
    pub fn delete(&self, name: &str) -> Result<()> {
        let conn = self.conn()?;
        let rows = conn.execute(
            "DELETE FROM collections WHERE key = ?1",
            [collection_key(name)],
        )?;

        if rows == 0 {
            return Err(StoreError::NotFound(name.to_string()));
        }
        tracing::info!("Deleted collection '{}'", name);
        Ok(())
    }

    /// All collections, most recently used first (never-used last),
    /// ties broken by name
    pub fn list_all(&self) -> Result<Vec<Collection>> {
        let conn = self.conn()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM collections
             ORDER BY last_used_at IS NULL, last_used_at DESC, name COLLATE NOCASE ASC",
            COLLECTION_COLUMNS
        ))?;

        let rows = stmt.query_map([], row_to_collection)?;

        let mut collections = Vec::new();
        for row in rows {
            collections.push(row??);
        }
        Ok(collections)
    }

    /// Whether a collection with this (sanitized) name exists
    pub fn exists(&self, name: &str) -> Result<bool> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM collections WHERE key = ?1",
            [collection_key(name)],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Stamp the collection as just opened and persist immediately.
    /// The in-memory value is only updated once the write succeeds.
    pub fn mark_used(&self, collection: &mut Collection) -> Result<()> {
        let now = Utc::now().timestamp();
        let conn = self.conn()?;

        let rows = conn.execute(
            "UPDATE collections SET last_used_at = ?2 WHERE key = ?1",
            rusqlite::params![collection.key(), now],
        )?;
        if rows == 0 {
            return Err(StoreError::NotFound(collection.name.clone()));
        }

        collection.last_used_at = Some(now);
        Ok(())
    }

    /// Refresh the cached image count and persist immediately
    pub fn set_image_count(&self, collection: &mut Collection, count: usize) -> Result<()> {
        let conn = self.conn()?;

        let rows = conn.execute(
            "UPDATE collections SET image_count = ?2 WHERE key = ?1",
            rusqlite::params![collection.key(), count as i64],
        )?;
        if rows == 0 {
            return Err(StoreError::NotFound(collection.name.clone()));
        }

        collection.image_count = count;
        Ok(())
    }
}

fn paths_to_json(paths: &[PathBuf]) -> Result<String> {
    Ok(serde_json::to_string(paths)?)
}

fn row_to_collection(row: &rusqlite::Row) -> rusqlite::Result<Result<Collection>> {
    let name: String = row.get(0)?;
    let paths_json: String = row.get(1)?;
    let sort_method: String = row.get(2)?;
    let sort_descending: i64 = row.get(3)?;
    let created_at: i64 = row.get(4)?;
    let last_used_at: Option<i64> = row.get(5)?;
    let image_count: i64 = row.get(6)?;

    Ok(serde_json::from_str::<Vec<PathBuf>>(&paths_json)
        .map_err(StoreError::from)
        .map(|paths| Collection {
            name,
            paths,
            sort_method: SortMethod::from_db(&sort_method),
            sort_descending: sort_descending != 0,
            created_at,
            last_used_at,
            image_count: image_count.max(0) as usize,
        }))
}
