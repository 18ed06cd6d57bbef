//! Product queries, stock adjustment and supplier assignment.

use std::collections::BTreeMap;

use chrono::Utc;
use rusqlite::{params, OptionalExtension};
use tracing::debug;

use super::{decimal_text, get_decimal, get_parsed, get_timestamp, Storage};
use crate::error::{Error, Result};
use crate::model::{Product, ProductDraft, Supplier};

const PRODUCT_COLUMNS: &str = "id, code, name, description, lot, category_id, unit_id, \
     stock, min_stock, unit_cost, unit_price, status, updated_at";

impl Storage {
    /// Insert a product and return its id.
    ///
    /// The product starts with zero stock; `draft.stock` is ignored because
    /// stock only changes through movements.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn insert_product(&self, draft: &ProductDraft) -> Result<i64> {
        self.conn.execute(
            r"
            INSERT INTO products (code, name, description, lot, category_id, unit_id,
                                  stock, min_stock, unit_cost, unit_price, status, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, ?7, ?8, ?9, ?10, ?11)
            ",
            params![
                draft.code,
                draft.name,
                draft.description,
                draft.lot,
                draft.category_id,
                draft.unit_id,
                draft.min_stock,
                decimal_text(draft.unit_cost),
                decimal_text(draft.unit_price),
                draft.status.as_str(),
                Utc::now().to_rfc3339(),
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!("Inserted product {id}");
        Ok(id)
    }

    /// Replace a product's descriptive fields. Stock is left untouched.
    ///
    /// Returns `false` if the product does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn update_product(&self, id: i64, draft: &ProductDraft) -> Result<bool> {
        let affected = self.conn.execute(
            r"
            UPDATE products
            SET code = ?2, name = ?3, description = ?4, lot = ?5, category_id = ?6,
                unit_id = ?7, min_stock = ?8, unit_cost = ?9, unit_price = ?10,
                status = ?11, updated_at = ?12
            WHERE id = ?1
            ",
            params![
                id,
                draft.code,
                draft.name,
                draft.description,
                draft.lot,
                draft.category_id,
                draft.unit_id,
                draft.min_stock,
                decimal_text(draft.unit_cost),
                decimal_text(draft.unit_price),
                draft.status.as_str(),
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(affected > 0)
    }

    /// Delete a product together with its movements, expiry entries and
    /// supplier assignments.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn delete_product(&self, id: i64) -> Result<bool> {
        let affected = self
            .conn
            .execute("DELETE FROM products WHERE id = ?1", [id])?;
        Ok(affected > 0)
    }

    /// Get a product by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn get_product(&self, id: i64) -> Result<Option<Product>> {
        let product = self
            .conn
            .query_row(
                &format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"),
                [id],
                Self::row_to_product,
            )
            .optional()?;
        Ok(product)
    }

    /// List all products in creation order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn list_products(&self) -> Result<Vec<Product>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id"))?;
        let products = stmt
            .query_map([], Self::row_to_product)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(products)
    }

    /// Apply `delta` to a product's stock and return the new stock.
    ///
    /// Fails without writing if the stock would drop below zero or exceed
    /// the largest storable count.
    pub(super) fn adjust_stock(&self, product_id: i64, delta: i64) -> Result<i64> {
        let (name, stock): (String, i64) = self
            .conn
            .query_row(
                "SELECT name, stock FROM products WHERE id = ?1",
                [product_id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?
            .ok_or_else(|| Error::not_found("product", product_id))?;

        let new_stock = stock
            .checked_add(delta)
            .ok_or_else(|| Error::validation("quantity", "would take stock out of range"))?;
        if new_stock < 0 {
            return Err(Error::InsufficientStock {
                product: name,
                available: stock,
                requested: -delta,
            });
        }

        self.conn.execute(
            "UPDATE products SET stock = ?2, updated_at = ?3 WHERE id = ?1",
            params![product_id, new_stock, Utc::now().to_rfc3339()],
        )?;
        debug!("Stock of product {product_id}: {stock} -> {new_stock}");
        Ok(new_stock)
    }

    /// Assign a supplier to a product. Returns `false` if already assigned.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn assign_supplier(&self, product_id: i64, supplier_id: i64) -> Result<bool> {
        let affected = self.conn.execute(
            "INSERT OR IGNORE INTO product_suppliers (product_id, supplier_id) VALUES (?1, ?2)",
            [product_id, supplier_id],
        )?;
        Ok(affected > 0)
    }

    /// Remove a supplier from a product. Returns `false` if not assigned.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn unassign_supplier(&self, product_id: i64, supplier_id: i64) -> Result<bool> {
        let affected = self.conn.execute(
            "DELETE FROM product_suppliers WHERE product_id = ?1 AND supplier_id = ?2",
            [product_id, supplier_id],
        )?;
        Ok(affected > 0)
    }

    /// Suppliers assigned to a product, by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn suppliers_of_product(&self, product_id: i64) -> Result<Vec<Supplier>> {
        let mut stmt = self.conn.prepare(
            r"
            SELECT s.id, s.kind, s.name, s.phone, s.email, s.address, s.active
            FROM suppliers s
            JOIN product_suppliers ps ON ps.supplier_id = s.id
            WHERE ps.product_id = ?1
            ORDER BY s.name
            ",
        )?;
        let suppliers = stmt
            .query_map([product_id], Self::row_to_supplier)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(suppliers)
    }

    /// All `(product_id, supplier_id)` assignments.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn supplier_links(&self) -> Result<Vec<(i64, i64)>> {
        let mut stmt = self.conn.prepare(
            "SELECT product_id, supplier_id FROM product_suppliers ORDER BY product_id, supplier_id",
        )?;
        let links = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(links)
    }

    /// Supplier names keyed by product id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn supplier_names_by_product(&self) -> Result<BTreeMap<i64, Vec<String>>> {
        let mut stmt = self.conn.prepare(
            r"
            SELECT ps.product_id, s.name
            FROM product_suppliers ps
            JOIN suppliers s ON s.id = ps.supplier_id
            ORDER BY ps.product_id, s.name
            ",
        )?;
        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut names: BTreeMap<i64, Vec<String>> = BTreeMap::new();
        for (product_id, name) in rows {
            names.entry(product_id).or_default().push(name);
        }
        Ok(names)
    }

    fn row_to_product(row: &rusqlite::Row) -> rusqlite::Result<Product> {
        Ok(Product {
            id: row.get(0)?,
            code: row.get(1)?,
            name: row.get(2)?,
            description: row.get(3)?,
            lot: row.get(4)?,
            category_id: row.get(5)?,
            unit_id: row.get(6)?,
            stock: row.get(7)?,
            min_stock: row.get(8)?,
            unit_cost: get_decimal(row, 9)?,
            unit_price: get_decimal(row, 10)?,
            status: get_parsed(row, 11)?,
            updated_at: get_timestamp(row, 12)?,
        })
    }
}
