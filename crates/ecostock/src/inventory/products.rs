//! Products and their supplier assignments.
//!
//! A product's stock is never written directly. Creating a product with
//! stock records an opening entry, and editing the stock field records an
//! adjustment movement for the difference.

use super::{found, referenced, Inventory, Saved};
use crate::error::{Error, Result};
use crate::filter;
use crate::model::{MovementDraft, MovementKind, Product, ProductDraft, ProductStatus, Supplier};
use crate::notice::{Notice, NoticeLevel};
use crate::validation::{ensure_unique, non_negative, non_negative_amount, optional, required};

/// Name recorded on movements the service creates itself.
pub(crate) const SYSTEM_USER: &str = "system";

impl Inventory {
    /// Products matching `search` and `status`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn list_products(
        &self,
        search: Option<&str>,
        status: Option<ProductStatus>,
    ) -> Result<Vec<Product>> {
        let products = self.storage.list_products()?;
        Ok(filter::apply(products, search, status, |p| Some(p.status)))
    }

    /// Get a product.
    ///
    /// # Errors
    ///
    /// Returns a not-found error if it does not exist.
    pub fn get_product(&self, id: i64) -> Result<Product> {
        found(self.storage.get_product(id)?, "product", id)
    }

    /// Create a product. Initial stock is recorded as an opening entry.
    ///
    /// # Errors
    ///
    /// Returns a validation or duplicate error for a bad draft.
    pub fn create_product(&self, draft: ProductDraft) -> Result<Saved<Product>> {
        let draft = self.check_product(draft, None)?;
        let today = self.today();
        let id = self.storage.atomically(|s| {
            let id = s.insert_product(&draft)?;
            let opening = draft.stock.unwrap_or(0);
            if opening > 0 {
                s.insert_movement(&MovementDraft {
                    date: today,
                    kind: MovementKind::Entry,
                    product_id: id,
                    quantity: opening,
                    recorded_by: SYSTEM_USER.to_string(),
                    notes: "Opening stock".to_string(),
                })?;
            }
            Ok(id)
        })?;
        let product = self.get_product(id)?;
        let notice = Notice::success(format!("Product '{}' created", product.name));
        Ok(Saved::new(product, notice))
    }

    /// Replace a product. A changed stock is recorded as an adjustment; a
    /// draft without a stock keeps the current one.
    ///
    /// # Errors
    ///
    /// Returns a not-found, validation or duplicate error.
    pub fn update_product(&self, id: i64, draft: ProductDraft) -> Result<Saved<Product>> {
        let current = self.get_product(id)?;
        let draft = self.check_product(draft, Some(id))?;
        let today = self.today();
        self.storage.atomically(|s| {
            s.update_product(id, &draft)?;
            let target = draft.stock.unwrap_or(current.stock);
            let delta = target - current.stock;
            if delta != 0 {
                let kind = if delta > 0 {
                    MovementKind::Entry
                } else {
                    MovementKind::Exit
                };
                s.insert_movement(&MovementDraft {
                    date: today,
                    kind,
                    product_id: id,
                    quantity: delta.abs(),
                    recorded_by: SYSTEM_USER.to_string(),
                    notes: format!("Stock adjustment from {} to {target}", current.stock),
                })?;
            }
            Ok(())
        })?;
        let product = self.get_product(id)?;
        let notice = Notice::success(format!("Product '{}' updated", product.name));
        Ok(Saved::new(product, notice))
    }

    /// Delete a product with its movements, expiry entries and supplier
    /// assignments.
    ///
    /// # Errors
    ///
    /// Returns a not-found error if it does not exist.
    pub fn delete_product(&self, id: i64) -> Result<Notice> {
        let product = self.get_product(id)?;
        self.storage.delete_product(id)?;
        Ok(Notice::success(format!("Product '{}' deleted", product.name)))
    }

    /// Assign a supplier to a product.
    ///
    /// # Errors
    ///
    /// Returns a not-found error if either record does not exist.
    pub fn assign_supplier(&self, product_id: i64, supplier_id: i64) -> Result<Notice> {
        let product = self.get_product(product_id)?;
        let supplier = self.get_supplier(supplier_id)?;
        if self.storage.assign_supplier(product_id, supplier_id)? {
            Ok(Notice::success(format!(
                "Supplier '{}' assigned to '{}'",
                supplier.name, product.name
            )))
        } else {
            Ok(Notice::new(
                NoticeLevel::Info,
                format!("Supplier '{}' already supplies '{}'", supplier.name, product.name),
            ))
        }
    }

    /// Remove a supplier from a product.
    ///
    /// # Errors
    ///
    /// Returns a not-found error if either record does not exist or the
    /// supplier is not assigned to the product.
    pub fn unassign_supplier(&self, product_id: i64, supplier_id: i64) -> Result<Notice> {
        let product = self.get_product(product_id)?;
        let supplier = self.get_supplier(supplier_id)?;
        if !self.storage.unassign_supplier(product_id, supplier_id)? {
            return Err(Error::not_found("supplier assignment", supplier_id));
        }
        Ok(Notice::success(format!(
            "Supplier '{}' removed from '{}'",
            supplier.name, product.name
        )))
    }

    /// Suppliers assigned to a product.
    ///
    /// # Errors
    ///
    /// Returns a not-found error if the product does not exist.
    pub fn suppliers_of_product(&self, product_id: i64) -> Result<Vec<Supplier>> {
        self.get_product(product_id)?;
        self.storage.suppliers_of_product(product_id)
    }

    fn check_product(&self, draft: ProductDraft, editing: Option<i64>) -> Result<ProductDraft> {
        let draft = ProductDraft {
            code: required("code", &draft.code)?,
            name: required("name", &draft.name)?,
            description: draft.description.trim().to_string(),
            lot: optional(draft.lot),
            category_id: draft.category_id,
            unit_id: draft.unit_id,
            stock: draft.stock.map(|s| non_negative("stock", s)).transpose()?,
            min_stock: non_negative("minStock", draft.min_stock)?,
            unit_cost: non_negative_amount("unitCost", draft.unit_cost)?,
            unit_price: non_negative_amount("unitPrice", draft.unit_price)?,
            status: draft.status,
        };

        if let Some(id) = draft.category_id {
            referenced(self.storage.get_category(id)?, "categoryId", "category", id)?;
        }
        if let Some(id) = draft.unit_id {
            referenced(self.storage.get_unit(id)?, "unitId", "unit", id)?;
        }

        let existing = self.storage.list_products()?;
        ensure_unique(
            "product",
            "code",
            &draft.code,
            existing.iter().map(|p| (p.id, p.code.as_str())),
            editing,
        )?;
        ensure_unique(
            "product",
            "name",
            &draft.name,
            existing.iter().map(|p| (p.id, p.name.as_str())),
            editing,
        )?;
        Ok(draft)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use crate::error::Error;
    use crate::inventory::tests::{inventory, product_draft, supplier_draft};
    use crate::model::{MovementKind, ProductStatus};
    use crate::notice::NoticeLevel;

    #[test]
    fn test_create_records_opening_entry() {
        let inventory = inventory();
        let saved = inventory
            .create_product(product_draft("PROD001", "Urea Granulada 46%", 500))
            .unwrap();
        assert_eq!(saved.record.stock, 500);
        assert_eq!(saved.notice.message, "Product 'Urea Granulada 46%' created");

        let movements = inventory.list_movements(None, None).unwrap();
        assert_eq!(movements.len(), 1);
        assert_eq!(movements[0].kind, MovementKind::Entry);
        assert_eq!(movements[0].quantity, 500);
        assert_eq!(movements[0].recorded_by, "system");
        assert_eq!(movements[0].date, inventory.today());
    }

    #[test]
    fn test_create_without_stock_records_nothing() {
        let inventory = inventory();
        inventory
            .create_product(product_draft("PROD001", "Urea", 0))
            .unwrap();
        assert!(inventory.list_movements(None, None).unwrap().is_empty());
    }

    #[test]
    fn test_update_stock_records_adjustment() {
        let inventory = inventory();
        let id = inventory
            .create_product(product_draft("PROD001", "Urea", 100))
            .unwrap()
            .record
            .id;

        let saved = inventory
            .update_product(id, product_draft("PROD001", "Urea", 60))
            .unwrap();
        assert_eq!(saved.record.stock, 60);

        let movements = inventory.list_movements(None, Some(MovementKind::Exit)).unwrap();
        assert_eq!(movements.len(), 1);
        assert_eq!(movements[0].quantity, 40);
        assert!(inventory.reconcile().unwrap().is_empty());
    }

    #[test]
    fn test_update_without_stock_keeps_it() {
        let inventory = inventory();
        let id = inventory
            .create_product(product_draft("PROD001", "Urea", 500))
            .unwrap()
            .record
            .id;

        let mut draft = product_draft("PROD001", "Urea", 0);
        draft.stock = None;
        draft.description = "Nitrógeno de liberación rápida".to_string();
        let saved = inventory.update_product(id, draft).unwrap();
        assert_eq!(saved.record.stock, 500);
        assert_eq!(saved.record.description, "Nitrógeno de liberación rápida");

        assert!(inventory
            .list_movements(None, Some(MovementKind::Exit))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_stock_above_limit_is_rejected() {
        let inventory = inventory();
        let id = inventory
            .create_product(product_draft("PROD001", "Urea", 10))
            .unwrap()
            .record
            .id;

        let mut draft = product_draft("PROD001", "Urea", 0);
        draft.stock = Some(i64::MAX);
        assert!(inventory.update_product(id, draft).unwrap_err().is_invalid_input());
        assert_eq!(inventory.get_product(id).unwrap().stock, 10);
    }

    #[test]
    fn test_validation_rules() {
        let inventory = inventory();

        let mut draft = product_draft("PROD001", "Urea", 0);
        draft.min_stock = -1;
        assert!(matches!(
            inventory.create_product(draft).unwrap_err(),
            Error::Validation {
                field: "minStock",
                ..
            }
        ));

        let mut draft = product_draft("PROD001", "Urea", 0);
        draft.unit_cost = Some(Decimal::new(-5, 0));
        assert!(inventory.create_product(draft).unwrap_err().is_invalid_input());

        let mut draft = product_draft("PROD001", "Urea", 0);
        draft.category_id = Some(77);
        assert!(matches!(
            inventory.create_product(draft).unwrap_err(),
            Error::Validation {
                field: "categoryId",
                ..
            }
        ));

        let draft = product_draft("", "Urea", 0);
        assert!(inventory.create_product(draft).unwrap_err().is_invalid_input());
    }

    #[test]
    fn test_code_and_name_unique() {
        let inventory = inventory();
        inventory
            .create_product(product_draft("PROD001", "Urea", 0))
            .unwrap();

        assert!(matches!(
            inventory
                .create_product(product_draft("prod001", "Otro", 0))
                .unwrap_err(),
            Error::Duplicate { field: "code", .. }
        ));
        assert!(matches!(
            inventory
                .create_product(product_draft("PROD002", " urea", 0))
                .unwrap_err(),
            Error::Duplicate { field: "name", .. }
        ));
    }

    #[test]
    fn test_filter_by_status() {
        let inventory = inventory();
        inventory
            .create_product(product_draft("PROD001", "Urea", 0))
            .unwrap();
        let mut suspended = product_draft("PROD002", "Glifosato", 0);
        suspended.status = ProductStatus::Suspended;
        inventory.create_product(suspended).unwrap();

        let found = inventory
            .list_products(None, Some(ProductStatus::Suspended))
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Glifosato");
        assert_eq!(inventory.list_products(Some("prod"), None).unwrap().len(), 2);
    }

    #[test]
    fn test_supplier_assignment() {
        let inventory = inventory();
        let product = inventory
            .create_product(product_draft("PROD001", "Urea", 0))
            .unwrap()
            .record;
        let supplier = inventory
            .create_supplier(supplier_draft("Fertilizantes Colombianos S.A.", "ventas@fertilcol.com"))
            .unwrap()
            .record;

        let notice = inventory.assign_supplier(product.id, supplier.id).unwrap();
        assert_eq!(notice.level, NoticeLevel::Success);
        let again = inventory.assign_supplier(product.id, supplier.id).unwrap();
        assert_eq!(again.level, NoticeLevel::Info);

        assert_eq!(inventory.suppliers_of_product(product.id).unwrap().len(), 1);
        inventory.unassign_supplier(product.id, supplier.id).unwrap();
        assert!(inventory
            .unassign_supplier(product.id, supplier.id)
            .unwrap_err()
            .is_not_found());
        assert!(inventory.assign_supplier(product.id, 99).unwrap_err().is_not_found());
    }
}
