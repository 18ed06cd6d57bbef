//! Storage layer for ecostock.
//!
//! This module provides `SQLite`-based storage for the catalog, stock
//! movements and expiry entries. Record-specific queries live in the
//! submodules; this file holds the connection handling shared by all of them.

mod catalog;
mod expirations;
pub mod migrations;
mod movements;
mod parties;
mod products;
pub mod schema;

use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Path reported for in-memory databases.
const MEMORY_PATH: &str = ":memory:";

/// Storage engine for inventory records.
///
/// Wraps a single `SQLite` connection with foreign keys enabled. Stock only
/// changes through movements, so every stock update happens inside the
/// same savepoint as the movement that caused it.
#[derive(Debug)]
pub struct Storage {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
}

impl Storage {
    /// Open or create a storage database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist.
    /// Initializes the schema if this is a new database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        conn.execute_batch(
            "PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL; PRAGMA foreign_keys=ON;",
        )?;
        migrations::initialize_schema(&conn)?;

        info!("Database opened successfully at {}", path.display());
        Ok(Self { path, conn })
    }

    /// Create an in-memory storage instance.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(MEMORY_PATH),
            source,
        })?;

        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        migrations::initialize_schema(&conn)?;

        debug!("Opened in-memory database");
        Ok(Self {
            path: PathBuf::from(MEMORY_PATH),
            conn,
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the data lives only in memory.
    #[must_use]
    pub fn is_in_memory(&self) -> bool {
        self.path.as_os_str() == MEMORY_PATH
    }

    /// Run `op` atomically.
    ///
    /// Uses a savepoint so calls may nest. Any error rolls back every write
    /// made by `op`.
    ///
    /// # Errors
    ///
    /// Returns the error produced by `op`, or a database error if the
    /// savepoint cannot be managed.
    pub fn atomically<T>(&self, op: impl FnOnce(&Self) -> Result<T>) -> Result<T> {
        self.conn.execute_batch("SAVEPOINT ecostock_op")?;
        match op(self) {
            Ok(value) => {
                self.conn.execute_batch("RELEASE ecostock_op")?;
                Ok(value)
            }
            Err(err) => {
                self.conn
                    .execute_batch("ROLLBACK TO ecostock_op; RELEASE ecostock_op")?;
                Err(err)
            }
        }
    }

    /// Whether the store holds no products and no catalog data.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn is_empty(&self) -> Result<bool> {
        let stats = self.stats()?;
        Ok(stats.categories == 0 && stats.units == 0 && stats.products == 0 && stats.suppliers == 0)
    }

    /// Get database statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn stats(&self) -> Result<StorageStats> {
        let db_size_bytes = if self.is_in_memory() {
            0
        } else {
            std::fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0)
        };

        Ok(StorageStats {
            categories: self.count_rows("categories")?,
            units: self.count_rows("units")?,
            products: self.count_rows("products")?,
            suppliers: self.count_rows("suppliers")?,
            distributors: self.count_rows("distributors")?,
            movements: self.count_rows("movements")?,
            expirations: self.count_rows("expirations")?,
            db_size_bytes,
        })
    }

    fn count_rows(&self, table: &'static str) -> Result<i64> {
        let count: i64 =
            self.conn
                .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
                    row.get(0)
                })?;
        Ok(count)
    }
}

/// Statistics about the storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageStats {
    /// Number of categories.
    pub categories: i64,
    /// Number of units of measure.
    pub units: i64,
    /// Number of products.
    pub products: i64,
    /// Number of suppliers.
    pub suppliers: i64,
    /// Number of distributors.
    pub distributors: i64,
    /// Number of recorded movements.
    pub movements: i64,
    /// Number of expiry entries.
    pub expirations: i64,
    /// Size of the database file in bytes.
    pub db_size_bytes: u64,
}

fn conversion_error(column: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(column, rusqlite::types::Type::Text, message.into())
}

/// Read a `YYYY-MM-DD` column.
fn get_date(row: &rusqlite::Row, column: usize) -> rusqlite::Result<NaiveDate> {
    let text: String = row.get(column)?;
    text.parse()
        .map_err(|e| conversion_error(column, format!("invalid date '{text}': {e}")))
}

/// Read an optional decimal column stored as text.
fn get_decimal(row: &rusqlite::Row, column: usize) -> rusqlite::Result<Option<Decimal>> {
    let text: Option<String> = row.get(column)?;
    text.map(|t| {
        t.parse()
            .map_err(|e| conversion_error(column, format!("invalid decimal '{t}': {e}")))
    })
    .transpose()
}

/// Read an RFC 3339 timestamp column.
fn get_timestamp(row: &rusqlite::Row, column: usize) -> rusqlite::Result<DateTime<Utc>> {
    let text: String = row.get(column)?;
    DateTime::parse_from_rfc3339(&text)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| conversion_error(column, format!("invalid timestamp '{text}': {e}")))
}

/// Read a column holding the string form of an enum.
fn get_parsed<T: std::str::FromStr>(row: &rusqlite::Row, column: usize) -> rusqlite::Result<T> {
    let text: String = row.get(column)?;
    text.parse()
        .map_err(|_| conversion_error(column, format!("unexpected value '{text}'")))
}

fn decimal_text(value: Option<Decimal>) -> Option<String> {
    value.map(|d| d.to_string())
}
