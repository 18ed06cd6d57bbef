//! Stock movement queries.
//!
//! Writing a movement and applying its effect on stock happen in one
//! savepoint, so the recorded stock always matches the movement history.

use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension};
use tracing::debug;

use super::{get_date, get_parsed, Storage};
use crate::error::Result;
use crate::model::{Movement, MovementDraft};

const MOVEMENT_SELECT: &str = r"
SELECT m.id, m.date, m.kind, m.product_id, p.name, m.quantity, m.recorded_by, m.notes
FROM movements m
JOIN products p ON p.id = m.product_id
";

impl Storage {
    /// Record a movement, adjust the product's stock and return the id.
    ///
    /// # Errors
    ///
    /// Returns an error if the product does not exist, an exit exceeds the
    /// available stock, or the database operation fails.
    pub fn insert_movement(&self, draft: &MovementDraft) -> Result<i64> {
        self.atomically(|s| {
            s.adjust_stock(draft.product_id, draft.kind.signed(draft.quantity))?;
            s.conn.execute(
                r"
                INSERT INTO movements (date, kind, product_id, quantity, recorded_by, notes)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                ",
                params![
                    draft.date.to_string(),
                    draft.kind.as_str(),
                    draft.product_id,
                    draft.quantity,
                    draft.recorded_by,
                    draft.notes,
                ],
            )?;
            let id = s.conn.last_insert_rowid();
            debug!("Recorded {} movement {id}", draft.kind);
            Ok(id)
        })
    }

    /// Replace a movement, reversing its old effect on stock and applying
    /// the new one. Returns `false` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the change would leave any product with negative
    /// stock, or the database operation fails.
    pub fn update_movement(&self, id: i64, draft: &MovementDraft) -> Result<bool> {
        self.atomically(|s| {
            let Some(old) = s.get_movement(id)? else {
                return Ok(false);
            };
            s.adjust_stock(old.product_id, -old.stock_delta())?;
            s.adjust_stock(draft.product_id, draft.kind.signed(draft.quantity))?;
            s.conn.execute(
                r"
                UPDATE movements
                SET date = ?2, kind = ?3, product_id = ?4, quantity = ?5,
                    recorded_by = ?6, notes = ?7
                WHERE id = ?1
                ",
                params![
                    id,
                    draft.date.to_string(),
                    draft.kind.as_str(),
                    draft.product_id,
                    draft.quantity,
                    draft.recorded_by,
                    draft.notes,
                ],
            )?;
            Ok(true)
        })
    }

    /// Delete a movement and reverse its effect on stock.
    ///
    /// # Errors
    ///
    /// Returns an error if reversing would leave negative stock, or the
    /// database operation fails.
    pub fn delete_movement(&self, id: i64) -> Result<bool> {
        self.atomically(|s| {
            let Some(old) = s.get_movement(id)? else {
                return Ok(false);
            };
            s.adjust_stock(old.product_id, -old.stock_delta())?;
            s.conn.execute("DELETE FROM movements WHERE id = ?1", [id])?;
            Ok(true)
        })
    }

    /// Get a movement by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn get_movement(&self, id: i64) -> Result<Option<Movement>> {
        let movement = self
            .conn
            .query_row(
                &format!("{MOVEMENT_SELECT} WHERE m.id = ?1"),
                [id],
                Self::row_to_movement,
            )
            .optional()?;
        Ok(movement)
    }

    /// List all movements, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn list_movements(&self) -> Result<Vec<Movement>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{MOVEMENT_SELECT} ORDER BY m.date DESC, m.id DESC"))?;
        let movements = stmt
            .query_map([], Self::row_to_movement)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(movements)
    }

    /// List movements dated within `from..=to`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn movements_between(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<Movement>> {
        let mut stmt = self.conn.prepare(&format!(
            "{MOVEMENT_SELECT} WHERE m.date >= ?1 AND m.date <= ?2 ORDER BY m.date, m.id"
        ))?;
        let movements = stmt
            .query_map(
                params![from.to_string(), to.to_string()],
                Self::row_to_movement,
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(movements)
    }

    fn row_to_movement(row: &rusqlite::Row) -> rusqlite::Result<Movement> {
        Ok(Movement {
            id: row.get(0)?,
            date: get_date(row, 1)?,
            kind: get_parsed(row, 2)?,
            product_id: row.get(3)?,
            product_name: row.get(4)?,
            quantity: row.get(5)?,
            recorded_by: row.get(6)?,
            notes: row.get(7)?,
        })
    }
}
