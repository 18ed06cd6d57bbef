//! `SQLite` schema definitions for ecostock.
//!
//! This module contains the SQL statements for creating and managing
//! the database schema.

/// SQL statement to create the categories table.
pub const CREATE_CATEGORIES_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS categories (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    description TEXT NOT NULL,
    kind TEXT NOT NULL,
    shelf_life TEXT NOT NULL,
    presentation TEXT NOT NULL
)
";

/// SQL statement to create the units of measure table.
pub const CREATE_UNITS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS units (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    abbreviation TEXT NOT NULL,
    description TEXT
)
";

/// SQL statement to create the products table.
///
/// Prices are stored as decimal text to avoid float rounding.
pub const CREATE_PRODUCTS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS products (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    code TEXT NOT NULL,
    name TEXT NOT NULL,
    description TEXT NOT NULL,
    lot TEXT,
    category_id INTEGER REFERENCES categories(id) ON DELETE SET NULL,
    unit_id INTEGER REFERENCES units(id) ON DELETE SET NULL,
    stock INTEGER NOT NULL DEFAULT 0,
    min_stock INTEGER NOT NULL DEFAULT 0,
    unit_cost TEXT,
    unit_price TEXT,
    status TEXT NOT NULL,
    updated_at TEXT NOT NULL
)
";

/// SQL statement to create the suppliers table.
pub const CREATE_SUPPLIERS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS suppliers (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    kind TEXT,
    name TEXT NOT NULL,
    phone TEXT NOT NULL,
    email TEXT NOT NULL,
    address TEXT NOT NULL,
    active INTEGER NOT NULL DEFAULT 1
)
";

/// SQL statement to create the distributors table.
pub const CREATE_DISTRIBUTORS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS distributors (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    supplier_id INTEGER REFERENCES suppliers(id) ON DELETE SET NULL,
    name TEXT NOT NULL,
    phone TEXT NOT NULL,
    email TEXT NOT NULL,
    address TEXT NOT NULL,
    delivery_route TEXT,
    active INTEGER NOT NULL DEFAULT 1
)
";

/// SQL statement to create the product/supplier assignment table.
pub const CREATE_PRODUCT_SUPPLIERS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS product_suppliers (
    product_id INTEGER NOT NULL REFERENCES products(id) ON DELETE CASCADE,
    supplier_id INTEGER NOT NULL REFERENCES suppliers(id) ON DELETE CASCADE,
    PRIMARY KEY (product_id, supplier_id)
)
";

/// SQL statement to create the stock movements table.
pub const CREATE_MOVEMENTS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS movements (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    date TEXT NOT NULL,
    kind TEXT NOT NULL,
    product_id INTEGER NOT NULL REFERENCES products(id) ON DELETE CASCADE,
    quantity INTEGER NOT NULL,
    recorded_by TEXT NOT NULL,
    notes TEXT NOT NULL
)
";

/// SQL statement to create the expiry entries table.
pub const CREATE_EXPIRATIONS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS expirations (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    product_id INTEGER NOT NULL REFERENCES products(id) ON DELETE CASCADE,
    lot TEXT,
    quantity INTEGER NOT NULL,
    expires_on TEXT NOT NULL,
    notified INTEGER NOT NULL DEFAULT 0
)
";

/// SQL statement to create an index on movement dates for period reports.
pub const CREATE_MOVEMENTS_DATE_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_movements_date ON movements(date)
";

/// SQL statement to create an index on movement products.
pub const CREATE_MOVEMENTS_PRODUCT_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_movements_product ON movements(product_id)
";

/// SQL statement to create an index on expiry dates.
pub const CREATE_EXPIRATIONS_DATE_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_expirations_date ON expirations(expires_on)
";

/// SQL statement to create the metadata table for storing key-value pairs.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    CREATE_CATEGORIES_TABLE,
    CREATE_UNITS_TABLE,
    CREATE_PRODUCTS_TABLE,
    CREATE_SUPPLIERS_TABLE,
    CREATE_DISTRIBUTORS_TABLE,
    CREATE_PRODUCT_SUPPLIERS_TABLE,
    CREATE_MOVEMENTS_TABLE,
    CREATE_EXPIRATIONS_TABLE,
    CREATE_MOVEMENTS_DATE_INDEX,
    CREATE_MOVEMENTS_PRODUCT_INDEX,
    CREATE_EXPIRATIONS_DATE_INDEX,
    CREATE_METADATA_TABLE,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_statements_not_empty() {
        assert!(!SCHEMA_STATEMENTS.is_empty());
        for stmt in SCHEMA_STATEMENTS {
            assert!(!stmt.trim().is_empty());
        }
    }

    #[test]
    fn test_referenced_tables_are_created_first() {
        let position = |stmt: &str| SCHEMA_STATEMENTS.iter().position(|s| *s == stmt).unwrap();
        assert!(position(CREATE_CATEGORIES_TABLE) < position(CREATE_PRODUCTS_TABLE));
        assert!(position(CREATE_PRODUCTS_TABLE) < position(CREATE_MOVEMENTS_TABLE));
        assert!(position(CREATE_SUPPLIERS_TABLE) < position(CREATE_DISTRIBUTORS_TABLE));
    }

    #[test]
    fn test_products_table_columns() {
        assert!(CREATE_PRODUCTS_TABLE.contains("stock INTEGER NOT NULL"));
        assert!(CREATE_PRODUCTS_TABLE.contains("unit_cost TEXT"));
        assert!(CREATE_PRODUCTS_TABLE.contains("ON DELETE SET NULL"));
    }

    #[test]
    fn test_dependants_cascade_with_product() {
        assert!(CREATE_MOVEMENTS_TABLE.contains("ON DELETE CASCADE"));
        assert!(CREATE_EXPIRATIONS_TABLE.contains("ON DELETE CASCADE"));
        assert!(CREATE_PRODUCT_SUPPLIERS_TABLE.contains("ON DELETE CASCADE"));
    }
}
