//! Expiry entry queries.

use rusqlite::{params, OptionalExtension};
use tracing::debug;

use super::{get_date, Storage};
use crate::error::Result;
use crate::model::{ExpiryDraft, ExpiryEntry};

const EXPIRY_COLUMNS: &str = "id, product_id, lot, quantity, expires_on, notified";

impl Storage {
    /// Insert an expiry entry and return its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn insert_expiry(&self, draft: &ExpiryDraft) -> Result<i64> {
        self.conn.execute(
            r"
            INSERT INTO expirations (product_id, lot, quantity, expires_on, notified)
            VALUES (?1, ?2, ?3, ?4, 0)
            ",
            params![
                draft.product_id,
                draft.lot,
                draft.quantity,
                draft.expires_on.to_string(),
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!("Inserted expiry entry {id}");
        Ok(id)
    }

    /// Replace an expiry entry and clear its notified flag.
    ///
    /// Returns `false` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn update_expiry(&self, id: i64, draft: &ExpiryDraft) -> Result<bool> {
        let affected = self.conn.execute(
            r"
            UPDATE expirations
            SET product_id = ?2, lot = ?3, quantity = ?4, expires_on = ?5, notified = 0
            WHERE id = ?1
            ",
            params![
                id,
                draft.product_id,
                draft.lot,
                draft.quantity,
                draft.expires_on.to_string(),
            ],
        )?;
        Ok(affected > 0)
    }

    /// Delete an expiry entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn delete_expiry(&self, id: i64) -> Result<bool> {
        let affected = self
            .conn
            .execute("DELETE FROM expirations WHERE id = ?1", [id])?;
        Ok(affected > 0)
    }

    /// Get an expiry entry by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn get_expiry(&self, id: i64) -> Result<Option<ExpiryEntry>> {
        let entry = self
            .conn
            .query_row(
                &format!("SELECT {EXPIRY_COLUMNS} FROM expirations WHERE id = ?1"),
                [id],
                Self::row_to_expiry,
            )
            .optional()?;
        Ok(entry)
    }

    /// List all expiry entries, soonest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn list_expirations(&self) -> Result<Vec<ExpiryEntry>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {EXPIRY_COLUMNS} FROM expirations ORDER BY expires_on, id"
        ))?;
        let entries = stmt
            .query_map([], Self::row_to_expiry)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    /// Flag entries as notified. Returns how many were updated.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn mark_notified(&self, ids: &[i64]) -> Result<usize> {
        self.atomically(|s| {
            let mut stmt = s
                .conn
                .prepare("UPDATE expirations SET notified = 1 WHERE id = ?1 AND notified = 0")?;
            let mut updated = 0;
            for id in ids {
                updated += stmt.execute([id])?;
            }
            Ok(updated)
        })
    }

    fn row_to_expiry(row: &rusqlite::Row) -> rusqlite::Result<ExpiryEntry> {
        Ok(ExpiryEntry {
            id: row.get(0)?,
            product_id: row.get(1)?,
            lot: row.get(2)?,
            quantity: row.get(3)?,
            expires_on: get_date(row, 4)?,
            notified: row.get(5)?,
        })
    }
}
