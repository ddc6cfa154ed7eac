//! SQLite connection management.

use std::fs;
use std::path::Path;

use rusqlite::{ffi, Connection};
use tracing::debug;

use super::migrations;

/// Owns a `rusqlite::Connection` with the schema migrated to the latest version.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens (or creates) the database file at `path`, creating missing parent
    /// directories, and runs pending migrations.
    ///
    /// # Errors
    /// Returns `rusqlite::Error` if the parent directory cannot be created, the
    /// file cannot be opened or a migration fails.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, rusqlite::Error> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    rusqlite::Error::SqliteFailure(
                        ffi::Error::new(ffi::SQLITE_CANTOPEN),
                        Some(format!("cannot create {}: {}", parent.display(), e)),
                    )
                })?;
            }
        }
        debug!(path = %path.display(), "opening database");
        let conn = Connection::open(path)?;
        let db = Self { conn };
        migrations::run_all(&db.conn)?;
        Ok(db)
    }

    /// Opens a throwaway in-memory database and runs migrations.
    pub fn open_in_memory() -> Result<Self, rusqlite::Error> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        migrations::run_all(&db.conn)?;
        Ok(db)
    }

    /// Returns the underlying connection for queries.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}
