//! SQLite backend for astra's durable slots.
//!
//! The schema is a single key/value table. Each slot holds one serialized
//! value and is replaced wholesale on every write.

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use thiserror::Error;

use crate::slots::SlotStore;

/// Error types for SQLite operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Invalid slot key: {0}")]
    InvalidKey(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<Error> for crate::errors::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Sqlite(e) => crate::errors::Error::SQLite(e),
            Error::InvalidKey(key) => {
                crate::errors::Error::InvalidInput(format!("invalid slot key: {key:?}"))
            }
        }
    }
}

/// SQLite database backend for astra.
pub struct Database {
    conn: Connection,
}

fn create_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS slots (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn validate_key(key: &str) -> Result<()> {
    if key.trim().is_empty() {
        return Err(Error::InvalidKey(key.to_string()));
    }
    Ok(())
}

impl Database {
    /// Open or create a SQLite database at the given path.
    ///
    /// Initializes the schema if the database is new.
    ///
    /// # Errors
    ///
    /// Returns error if the database cannot be opened or schema initialization fails.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        create_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Open a private in-memory database (for tests and dry runs).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        create_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Read a slot value.
    ///
    /// Returns None if the slot does not exist.
    pub fn get_slot(&self, key: &str) -> Result<Option<String>> {
        validate_key(key)?;
        let value = self
            .conn
            .query_row("SELECT value FROM slots WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    /// Replace a slot value inside a transaction.
    pub fn put_slot(&self, key: &str, value: &str) -> Result<()> {
        validate_key(key)?;
        let now = Utc::now().to_rfc3339();

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            r#"
            INSERT INTO slots (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
            params![key, value, &now],
        )?;
        tx.commit()?;
        Ok(())
    }

    /// Delete a slot.
    ///
    /// Returns true if a slot was deleted, false if it didn't exist.
    pub fn delete_slot(&self, key: &str) -> Result<bool> {
        validate_key(key)?;
        let rows = self.conn.execute("DELETE FROM slots WHERE key = ?1", [key])?;
        Ok(rows > 0)
    }

    #[cfg(test)]
    pub(crate) fn conn(&self) -> &Connection {
        &self.conn
    }
}

impl SlotStore for Database {
    fn read(&self, key: &str) -> crate::errors::Result<Option<String>> {
        Ok(self.get_slot(key)?)
    }

    fn write(&self, key: &str, value: &str) -> crate::errors::Result<()> {
        Ok(self.put_slot(key, value)?)
    }

    fn remove(&self, key: &str) -> crate::errors::Result<()> {
        self.delete_slot(key)?;
        Ok(())
    }
}
