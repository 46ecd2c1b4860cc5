//! Database schema and migrations

use crate::{DbPool, Result, StoreError};

const SCHEMA_VERSION: i32 = 1;

/// Run database migrations
pub fn migrate(pool: &DbPool) -> Result<()> {
    let conn = pool.get().map_err(|e| StoreError::Pool(e.to_string()))?;

    let current_version: i32 = conn
        .query_row("PRAGMA user_version", [], |row| row.get(0))
        .unwrap_or(0);

    if current_version < SCHEMA_VERSION {
        tracing::info!(
            "Migrating database from version {} to {}",
            current_version,
            SCHEMA_VERSION
        );

        if current_version < 1 {
            apply_v1(&conn)?;
        }

        conn.execute(&format!("PRAGMA user_version = {}", SCHEMA_VERSION), [])?;
    }

    Ok(())
}

fn apply_v1(conn: &rusqlite::Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        -- Collections: one row per named set of image folders
        CREATE TABLE IF NOT EXISTS collections (
            collection_id INTEGER PRIMARY KEY AUTOINCREMENT,

            -- Persistence key: sanitized collection name
            key TEXT NOT NULL UNIQUE,

            -- Display name as the user typed it
            name TEXT NOT NULL,

            -- Root folders (JSON array, display order preserved)
            paths TEXT NOT NULL,

            -- Ordering settings
            sort_method TEXT NOT NULL DEFAULT 'random',
            sort_descending INTEGER NOT NULL DEFAULT 0,

            created_at INTEGER NOT NULL DEFAULT (strftime('%s', 'now')),
            last_used_at INTEGER,

            -- Cached count, refreshed on structural change
            image_count INTEGER NOT NULL DEFAULT 0
        );

        CREATE INDEX IF NOT EXISTS idx_collections_last_used ON collections(last_used_at);
        CREATE INDEX IF NOT EXISTS idx_collections_name ON collections(name);
        "#,
    )?;

    Ok(())
}
