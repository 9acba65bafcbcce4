//! SQLite storage implementation

use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use rusqlite::{Connection, params};
use crate::{Result, Error};
use crate::entry::ResourceEntry;
use super::{ResourceStore, schema};

/// SQLite-backed storage for localization records
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open a database file (creates if doesn't exist)
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        let store = Self { conn: Mutex::new(conn) };
        store.initialize_schema()?;
        tracing::info!("Opened localization store at {}", path.display());
        Ok(store)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn: Mutex::new(conn) };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Initialize the database schema
    fn initialize_schema(&self) -> Result<()> {
        let conn = self.conn();
        for stmt in schema::all_schema_statements() {
            conn.execute(stmt, [])?;
        }
        Ok(())
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // ========== Admin Operations ==========

    /// Insert or replace the translation of an entry
    pub fn upsert(&self, entry: &ResourceEntry) -> Result<()> {
        self.conn().execute(
            r#"
            INSERT INTO localization_records (resource_culture, resource_name, content_key, localized_content)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(resource_name, resource_culture, content_key)
            DO UPDATE SET localized_content = excluded.localized_content
            "#,
            params![
                entry.locale,
                entry.resource_name,
                entry.content_key,
                entry.localized_content,
            ],
        )?;
        Ok(())
    }

    /// Entries registered for a pair that have no translation yet
    pub fn untranslated(&self, resource_name: &str, locale: &str) -> Result<Vec<ResourceEntry>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            r#"
            SELECT resource_name, resource_culture, content_key, localized_content
            FROM localization_records
            WHERE resource_name = ?1 AND resource_culture = ?2
              AND (localized_content IS NULL OR localized_content = '')
            ORDER BY content_key
            "#,
        )?;

        let entries = stmt
            .query_map([resource_name, locale], |row| self.row_to_entry(row))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(entries)
    }

    /// Count all entries
    pub fn count_entries(&self) -> Result<usize> {
        let count: i64 = self.conn().query_row("SELECT COUNT(*) FROM localization_records", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Count entries without a translation
    pub fn count_untranslated(&self) -> Result<usize> {
        let count: i64 = self.conn().query_row(
            "SELECT COUNT(*) FROM localization_records WHERE localized_content IS NULL OR localized_content = ''",
            [],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// Get database statistics
    pub fn stats(&self) -> Result<StoreStats> {
        Ok(StoreStats {
            entries: self.count_entries()?,
            untranslated: self.count_untranslated()?,
        })
    }

    /// Helper to convert a row to a ResourceEntry
    fn row_to_entry(&self, row: &rusqlite::Row) -> rusqlite::Result<ResourceEntry> {
        Ok(ResourceEntry {
            resource_name: row.get(0)?,
            locale: row.get(1)?,
            content_key: row.get(2)?,
            localized_content: row.get(3)?,
        })
    }
}

impl ResourceStore for SqliteStore {
    fn read_all(&self, resource_name: &str, locale: &str) -> Result<Vec<(String, Option<String>)>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT content_key, localized_content FROM localization_records WHERE resource_name = ?1 AND resource_culture = ?2",
        )?;

        let pairs = stmt
            .query_map([resource_name, locale], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(pairs)
    }

    fn insert(&self, entry: &ResourceEntry) -> Result<()> {
        let result = self.conn().execute(
            r#"
            INSERT INTO localization_records (resource_culture, resource_name, content_key, localized_content)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![
                entry.locale,
                entry.resource_name,
                entry.content_key,
                entry.localized_content,
            ],
        );

        match result {
            Ok(_) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == rusqlite::ErrorCode::ConstraintViolation => {
                Err(Error::DuplicateEntry(format!(
                    "{}/{}/{}",
                    entry.resource_name, entry.locale, entry.content_key
                )))
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Database statistics
#[derive(Debug, Clone)]
pub struct StoreStats {
    pub entries: usize,
    pub untranslated: usize,
}

impl std::fmt::Display for StoreStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Database Statistics:")?;
        writeln!(f, "  Entries: {}", self.entries)?;
        writeln!(f, "  Untranslated: {}", self.untranslated)
    }
}
