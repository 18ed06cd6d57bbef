//! Category and unit of measure queries.

use rusqlite::{params, OptionalExtension};
use tracing::debug;

use super::Storage;
use crate::error::Result;
use crate::model::{Category, CategoryDraft, UnitDraft, UnitOfMeasure};

const CATEGORY_COLUMNS: &str = "id, name, description, kind, shelf_life, presentation";
const UNIT_COLUMNS: &str = "id, name, abbreviation, description";

impl Storage {
    /// Insert a category and return its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn insert_category(&self, draft: &CategoryDraft) -> Result<i64> {
        self.conn.execute(
            r"
            INSERT INTO categories (name, description, kind, shelf_life, presentation)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ",
            params![
                draft.name,
                draft.description,
                draft.kind,
                draft.shelf_life,
                draft.presentation,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!("Inserted category {id}");
        Ok(id)
    }

    /// Replace a category's fields. Returns `false` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn update_category(&self, id: i64, draft: &CategoryDraft) -> Result<bool> {
        let affected = self.conn.execute(
            r"
            UPDATE categories
            SET name = ?2, description = ?3, kind = ?4, shelf_life = ?5, presentation = ?6
            WHERE id = ?1
            ",
            params![
                id,
                draft.name,
                draft.description,
                draft.kind,
                draft.shelf_life,
                draft.presentation,
            ],
        )?;
        Ok(affected > 0)
    }

    /// Delete a category. Products in it become uncategorized.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn delete_category(&self, id: i64) -> Result<bool> {
        let affected = self
            .conn
            .execute("DELETE FROM categories WHERE id = ?1", [id])?;
        Ok(affected > 0)
    }

    /// Get a category by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn get_category(&self, id: i64) -> Result<Option<Category>> {
        let category = self
            .conn
            .query_row(
                &format!("SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = ?1"),
                [id],
                Self::row_to_category,
            )
            .optional()?;
        Ok(category)
    }

    /// List all categories in creation order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn list_categories(&self) -> Result<Vec<Category>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {CATEGORY_COLUMNS} FROM categories ORDER BY id"))?;
        let categories = stmt
            .query_map([], Self::row_to_category)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(categories)
    }

    /// Insert a unit of measure and return its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn insert_unit(&self, draft: &UnitDraft) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO units (name, abbreviation, description) VALUES (?1, ?2, ?3)",
            params![draft.name, draft.abbreviation, draft.description],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!("Inserted unit {id}");
        Ok(id)
    }

    /// Replace a unit's fields. Returns `false` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn update_unit(&self, id: i64, draft: &UnitDraft) -> Result<bool> {
        let affected = self.conn.execute(
            "UPDATE units SET name = ?2, abbreviation = ?3, description = ?4 WHERE id = ?1",
            params![id, draft.name, draft.abbreviation, draft.description],
        )?;
        Ok(affected > 0)
    }

    /// Delete a unit. Products counted in it lose their unit.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn delete_unit(&self, id: i64) -> Result<bool> {
        let affected = self.conn.execute("DELETE FROM units WHERE id = ?1", [id])?;
        Ok(affected > 0)
    }

    /// Get a unit by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn get_unit(&self, id: i64) -> Result<Option<UnitOfMeasure>> {
        let unit = self
            .conn
            .query_row(
                &format!("SELECT {UNIT_COLUMNS} FROM units WHERE id = ?1"),
                [id],
                Self::row_to_unit,
            )
            .optional()?;
        Ok(unit)
    }

    /// List all units in creation order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn list_units(&self) -> Result<Vec<UnitOfMeasure>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {UNIT_COLUMNS} FROM units ORDER BY id"))?;
        let units = stmt
            .query_map([], Self::row_to_unit)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(units)
    }

    fn row_to_category(row: &rusqlite::Row) -> rusqlite::Result<Category> {
        Ok(Category {
            id: row.get(0)?,
            name: row.get(1)?,
            description: row.get(2)?,
            kind: row.get(3)?,
            shelf_life: row.get(4)?,
            presentation: row.get(5)?,
        })
    }

    fn row_to_unit(row: &rusqlite::Row) -> rusqlite::Result<UnitOfMeasure> {
        Ok(UnitOfMeasure {
            id: row.get(0)?,
            name: row.get(1)?,
            abbreviation: row.get(2)?,
            description: row.get(3)?,
        })
    }
}
