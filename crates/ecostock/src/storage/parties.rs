//! Supplier and distributor queries.

use rusqlite::{params, OptionalExtension};
use tracing::debug;

use super::Storage;
use crate::error::Result;
use crate::model::{Distributor, DistributorDraft, Supplier, SupplierDraft};

const SUPPLIER_COLUMNS: &str = "id, kind, name, phone, email, address, active";
const DISTRIBUTOR_COLUMNS: &str =
    "id, supplier_id, name, phone, email, address, delivery_route, active";

impl Storage {
    /// Insert a supplier and return its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn insert_supplier(&self, draft: &SupplierDraft) -> Result<i64> {
        self.conn.execute(
            r"
            INSERT INTO suppliers (kind, name, phone, email, address, active)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ",
            params![
                draft.kind,
                draft.name,
                draft.phone,
                draft.email,
                draft.address,
                draft.active,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!("Inserted supplier {id}");
        Ok(id)
    }

    /// Replace a supplier's fields. Returns `false` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn update_supplier(&self, id: i64, draft: &SupplierDraft) -> Result<bool> {
        let affected = self.conn.execute(
            r"
            UPDATE suppliers
            SET kind = ?2, name = ?3, phone = ?4, email = ?5, address = ?6, active = ?7
            WHERE id = ?1
            ",
            params![
                id,
                draft.kind,
                draft.name,
                draft.phone,
                draft.email,
                draft.address,
                draft.active,
            ],
        )?;
        Ok(affected > 0)
    }

    /// Set whether a supplier is active. Returns `false` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn set_supplier_active(&self, id: i64, active: bool) -> Result<bool> {
        let affected = self.conn.execute(
            "UPDATE suppliers SET active = ?2 WHERE id = ?1",
            params![id, active],
        )?;
        Ok(affected > 0)
    }

    /// Delete a supplier. Its distributors are detached and its product
    /// assignments removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn delete_supplier(&self, id: i64) -> Result<bool> {
        let affected = self
            .conn
            .execute("DELETE FROM suppliers WHERE id = ?1", [id])?;
        Ok(affected > 0)
    }

    /// Get a supplier by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn get_supplier(&self, id: i64) -> Result<Option<Supplier>> {
        let supplier = self
            .conn
            .query_row(
                &format!("SELECT {SUPPLIER_COLUMNS} FROM suppliers WHERE id = ?1"),
                [id],
                Self::row_to_supplier,
            )
            .optional()?;
        Ok(supplier)
    }

    /// List all suppliers in creation order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn list_suppliers(&self) -> Result<Vec<Supplier>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {SUPPLIER_COLUMNS} FROM suppliers ORDER BY id"))?;
        let suppliers = stmt
            .query_map([], Self::row_to_supplier)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(suppliers)
    }

    /// Insert a distributor and return its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn insert_distributor(&self, draft: &DistributorDraft) -> Result<i64> {
        self.conn.execute(
            r"
            INSERT INTO distributors (supplier_id, name, phone, email, address, delivery_route, active)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ",
            params![
                draft.supplier_id,
                draft.name,
                draft.phone,
                draft.email,
                draft.address,
                draft.delivery_route,
                draft.active,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!("Inserted distributor {id}");
        Ok(id)
    }

    /// Replace a distributor's fields. Returns `false` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn update_distributor(&self, id: i64, draft: &DistributorDraft) -> Result<bool> {
        let affected = self.conn.execute(
            r"
            UPDATE distributors
            SET supplier_id = ?2, name = ?3, phone = ?4, email = ?5, address = ?6,
                delivery_route = ?7, active = ?8
            WHERE id = ?1
            ",
            params![
                id,
                draft.supplier_id,
                draft.name,
                draft.phone,
                draft.email,
                draft.address,
                draft.delivery_route,
                draft.active,
            ],
        )?;
        Ok(affected > 0)
    }

    /// Set whether a distributor is active. Returns `false` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn set_distributor_active(&self, id: i64, active: bool) -> Result<bool> {
        let affected = self.conn.execute(
            "UPDATE distributors SET active = ?2 WHERE id = ?1",
            params![id, active],
        )?;
        Ok(affected > 0)
    }

    /// Delete a distributor.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn delete_distributor(&self, id: i64) -> Result<bool> {
        let affected = self
            .conn
            .execute("DELETE FROM distributors WHERE id = ?1", [id])?;
        Ok(affected > 0)
    }

    /// Get a distributor by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn get_distributor(&self, id: i64) -> Result<Option<Distributor>> {
        let distributor = self
            .conn
            .query_row(
                &format!("SELECT {DISTRIBUTOR_COLUMNS} FROM distributors WHERE id = ?1"),
                [id],
                Self::row_to_distributor,
            )
            .optional()?;
        Ok(distributor)
    }

    /// List all distributors in creation order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn list_distributors(&self) -> Result<Vec<Distributor>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {DISTRIBUTOR_COLUMNS} FROM distributors ORDER BY id"
        ))?;
        let distributors = stmt
            .query_map([], Self::row_to_distributor)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(distributors)
    }

    pub(super) fn row_to_supplier(row: &rusqlite::Row) -> rusqlite::Result<Supplier> {
        Ok(Supplier {
            id: row.get(0)?,
            kind: row.get(1)?,
            name: row.get(2)?,
            phone: row.get(3)?,
            email: row.get(4)?,
            address: row.get(5)?,
            active: row.get(6)?,
        })
    }

    fn row_to_distributor(row: &rusqlite::Row) -> rusqlite::Result<Distributor> {
        Ok(Distributor {
            id: row.get(0)?,
            supplier_id: row.get(1)?,
            name: row.get(2)?,
            phone: row.get(3)?,
            email: row.get(4)?,
            address: row.get(5)?,
            delivery_route: row.get(6)?,
            active: row.get(7)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::model::{DistributorDraft, SupplierDraft};
    use crate::storage::tests::create_test_storage;

    fn fertilcol() -> SupplierDraft {
        SupplierDraft {
            kind: Some("Fabricante".to_string()),
            name: "Fertilizantes Colombianos S.A.".to_string(),
            phone: "3001234567".to_string(),
            email: "ventas@fertilcol.com".to_string(),
            address: "Zona Industrial, Cartagena".to_string(),
            active: true,
        }
    }

    fn central(supplier_id: Option<i64>) -> DistributorDraft {
        DistributorDraft {
            supplier_id,
            name: "AgroDistribuidor Central".to_string(),
            phone: "3001234567".to_string(),
            email: "ventas@agrodistcentral.com".to_string(),
            address: "Calle 45 #23-67, Bogotá".to_string(),
            delivery_route: None,
            active: true,
        }
    }

    #[test]
    fn test_supplier_crud_and_activation() {
        let storage = create_test_storage();
        let id = storage.insert_supplier(&fertilcol()).unwrap();

        let stored = storage.get_supplier(id).unwrap().unwrap();
        assert_eq!(stored.kind.as_deref(), Some("Fabricante"));
        assert!(stored.active);

        assert!(storage.set_supplier_active(id, false).unwrap());
        assert!(!storage.get_supplier(id).unwrap().unwrap().active);
        assert!(!storage.set_supplier_active(999, false).unwrap());

        let mut draft = fertilcol();
        draft.phone = "6057654321".to_string();
        assert!(storage.update_supplier(id, &draft).unwrap());
        let stored = storage.get_supplier(id).unwrap().unwrap();
        assert_eq!(stored.phone, "6057654321");
        assert!(stored.active);

        assert_eq!(storage.list_suppliers().unwrap().len(), 1);
        assert!(storage.delete_supplier(id).unwrap());
        assert!(storage.list_suppliers().unwrap().is_empty());
    }

    #[test]
    fn test_deleting_supplier_detaches_distributors() {
        let storage = create_test_storage();
        let supplier = storage.insert_supplier(&fertilcol()).unwrap();
        let distributor = storage.insert_distributor(&central(Some(supplier))).unwrap();

        storage.delete_supplier(supplier).unwrap();
        let stored = storage.get_distributor(distributor).unwrap().unwrap();
        assert!(stored.supplier_id.is_none());
    }

    #[test]
    fn test_distributor_crud() {
        let storage = create_test_storage();
        let id = storage.insert_distributor(&central(None)).unwrap();

        let mut draft = central(None);
        draft.delivery_route = Some("Sabana Norte".to_string());
        assert!(storage.update_distributor(id, &draft).unwrap());
        assert_eq!(
            storage
                .get_distributor(id)
                .unwrap()
                .unwrap()
                .delivery_route
                .as_deref(),
            Some("Sabana Norte")
        );

        assert!(storage.set_distributor_active(id, false).unwrap());
        assert!(!storage.list_distributors().unwrap()[0].active);
        assert!(storage.delete_distributor(id).unwrap());
        assert!(storage.get_distributor(id).unwrap().is_none());
    }
}
