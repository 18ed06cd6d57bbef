//! Suppliers and distributors.

use super::{found, referenced, Inventory, Saved};
use crate::error::{Error, Result};
use crate::filter;
use crate::model::{Activity, Distributor, DistributorDraft, Supplier, SupplierDraft};
use crate::notice::Notice;
use crate::validation::{email, ensure_unique, optional, phone, required};

impl Inventory {
    /// Suppliers matching `search` and `status`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn list_suppliers(
        &self,
        search: Option<&str>,
        status: Option<Activity>,
    ) -> Result<Vec<Supplier>> {
        let suppliers = self.storage.list_suppliers()?;
        Ok(filter::apply(suppliers, search, status, |s| Some(s.activity())))
    }

    /// Get a supplier.
    ///
    /// # Errors
    ///
    /// Returns a not-found error if it does not exist.
    pub fn get_supplier(&self, id: i64) -> Result<Supplier> {
        found(self.storage.get_supplier(id)?, "supplier", id)
    }

    /// Create a supplier.
    ///
    /// # Errors
    ///
    /// Returns a validation or duplicate error for a bad draft.
    pub fn create_supplier(&self, draft: SupplierDraft) -> Result<Saved<Supplier>> {
        let draft = self.check_supplier(draft, None)?;
        let id = self.storage.insert_supplier(&draft)?;
        let supplier = self.get_supplier(id)?;
        let notice = Notice::success(format!("Supplier '{}' created", supplier.name));
        Ok(Saved::new(supplier, notice))
    }

    /// Replace a supplier.
    ///
    /// # Errors
    ///
    /// Returns a not-found, validation or duplicate error.
    pub fn update_supplier(&self, id: i64, draft: SupplierDraft) -> Result<Saved<Supplier>> {
        self.get_supplier(id)?;
        let draft = self.check_supplier(draft, Some(id))?;
        self.storage.update_supplier(id, &draft)?;
        let supplier = self.get_supplier(id)?;
        let notice = Notice::success(format!("Supplier '{}' updated", supplier.name));
        Ok(Saved::new(supplier, notice))
    }

    /// Activate or deactivate a supplier.
    ///
    /// # Errors
    ///
    /// Returns a not-found error if it does not exist.
    pub fn set_supplier_active(&self, id: i64, active: bool) -> Result<Saved<Supplier>> {
        if !self.storage.set_supplier_active(id, active)? {
            return Err(Error::not_found("supplier", id));
        }
        let supplier = self.get_supplier(id)?;
        let notice = Notice::success(format!(
            "Supplier '{}' is now {}",
            supplier.name,
            supplier.activity()
        ));
        Ok(Saved::new(supplier, notice))
    }

    /// Delete a supplier. Its distributors are detached.
    ///
    /// # Errors
    ///
    /// Returns a not-found error if it does not exist.
    pub fn delete_supplier(&self, id: i64) -> Result<Notice> {
        let supplier = self.get_supplier(id)?;
        self.storage.delete_supplier(id)?;
        Ok(Notice::success(format!("Supplier '{}' deleted", supplier.name)))
    }

    fn check_supplier(&self, draft: SupplierDraft, editing: Option<i64>) -> Result<SupplierDraft> {
        let draft = SupplierDraft {
            kind: optional(draft.kind),
            name: required("name", &draft.name)?,
            phone: phone("phone", &draft.phone)?,
            email: email("email", &draft.email)?,
            address: required("address", &draft.address)?,
            active: draft.active,
        };
        let existing = self.storage.list_suppliers()?;
        ensure_unique(
            "supplier",
            "name",
            &draft.name,
            existing.iter().map(|s| (s.id, s.name.as_str())),
            editing,
        )?;
        ensure_unique(
            "supplier",
            "email",
            &draft.email,
            existing.iter().map(|s| (s.id, s.email.as_str())),
            editing,
        )?;
        Ok(draft)
    }

    /// Distributors matching `search` and `status`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn list_distributors(
        &self,
        search: Option<&str>,
        status: Option<Activity>,
    ) -> Result<Vec<Distributor>> {
        let distributors = self.storage.list_distributors()?;
        Ok(filter::apply(distributors, search, status, |d| {
            Some(d.activity())
        }))
    }

    /// Get a distributor.
    ///
    /// # Errors
    ///
    /// Returns a not-found error if it does not exist.
    pub fn get_distributor(&self, id: i64) -> Result<Distributor> {
        found(self.storage.get_distributor(id)?, "distributor", id)
    }

    /// Create a distributor.
    ///
    /// # Errors
    ///
    /// Returns a validation or duplicate error for a bad draft.
    pub fn create_distributor(&self, draft: DistributorDraft) -> Result<Saved<Distributor>> {
        let draft = self.check_distributor(draft, None)?;
        let id = self.storage.insert_distributor(&draft)?;
        let distributor = self.get_distributor(id)?;
        let notice = Notice::success(format!("Distributor '{}' created", distributor.name));
        Ok(Saved::new(distributor, notice))
    }

    /// Replace a distributor.
    ///
    /// # Errors
    ///
    /// Returns a not-found, validation or duplicate error.
    pub fn update_distributor(
        &self,
        id: i64,
        draft: DistributorDraft,
    ) -> Result<Saved<Distributor>> {
        self.get_distributor(id)?;
        let draft = self.check_distributor(draft, Some(id))?;
        self.storage.update_distributor(id, &draft)?;
        let distributor = self.get_distributor(id)?;
        let notice = Notice::success(format!("Distributor '{}' updated", distributor.name));
        Ok(Saved::new(distributor, notice))
    }

    /// Activate or deactivate a distributor.
    ///
    /// # Errors
    ///
    /// Returns a not-found error if it does not exist.
    pub fn set_distributor_active(&self, id: i64, active: bool) -> Result<Saved<Distributor>> {
        if !self.storage.set_distributor_active(id, active)? {
            return Err(Error::not_found("distributor", id));
        }
        let distributor = self.get_distributor(id)?;
        let notice = Notice::success(format!(
            "Distributor '{}' is now {}",
            distributor.name,
            distributor.activity()
        ));
        Ok(Saved::new(distributor, notice))
    }

    /// Delete a distributor.
    ///
    /// # Errors
    ///
    /// Returns a not-found error if it does not exist.
    pub fn delete_distributor(&self, id: i64) -> Result<Notice> {
        let distributor = self.get_distributor(id)?;
        self.storage.delete_distributor(id)?;
        Ok(Notice::success(format!(
            "Distributor '{}' deleted",
            distributor.name
        )))
    }

    fn check_distributor(
        &self,
        draft: DistributorDraft,
        editing: Option<i64>,
    ) -> Result<DistributorDraft> {
        let draft = DistributorDraft {
            supplier_id: draft.supplier_id,
            name: required("name", &draft.name)?,
            phone: phone("phone", &draft.phone)?,
            email: email("email", &draft.email)?,
            address: required("address", &draft.address)?,
            delivery_route: optional(draft.delivery_route),
            active: draft.active,
        };
        if let Some(id) = draft.supplier_id {
            referenced(self.storage.get_supplier(id)?, "supplierId", "supplier", id)?;
        }

        let existing = self.storage.list_distributors()?;
        ensure_unique(
            "distributor",
            "name",
            &draft.name,
            existing.iter().map(|d| (d.id, d.name.as_str())),
            editing,
        )?;
        ensure_unique(
            "distributor",
            "email",
            &draft.email,
            existing.iter().map(|d| (d.id, d.email.as_str())),
            editing,
        )?;
        Ok(draft)
    }
}

#[cfg(test)]
mod tests {
    use crate::error::Error;
    use crate::inventory::tests::{inventory, supplier_draft};
    use crate::model::{Activity, DistributorDraft};

    fn distributor_draft(name: &str, email: &str, supplier_id: Option<i64>) -> DistributorDraft {
        DistributorDraft {
            supplier_id,
            name: name.to_string(),
            phone: "+57 (1) 234-5678".to_string(),
            email: email.to_string(),
            address: "Calle 45 #23-67, Bogotá".to_string(),
            delivery_route: Some(" Sabana Norte ".to_string()),
            active: true,
        }
    }

    #[test]
    fn test_supplier_contact_validation() {
        let inventory = inventory();

        let mut draft = supplier_draft("Fertilcol", "ventas@fertilcol.com");
        draft.email = "ventas@fertilcol".to_string();
        assert!(matches!(
            inventory.create_supplier(draft).unwrap_err(),
            Error::Validation { field: "email", .. }
        ));

        let mut draft = supplier_draft("Fertilcol", "ventas@fertilcol.com");
        draft.phone = "300-12".to_string();
        assert!(matches!(
            inventory.create_supplier(draft).unwrap_err(),
            Error::Validation { field: "phone", .. }
        ));
    }

    #[test]
    fn test_supplier_email_unique() {
        let inventory = inventory();
        inventory
            .create_supplier(supplier_draft("Fertilcol", "ventas@fertilcol.com"))
            .unwrap();

        let err = inventory
            .create_supplier(supplier_draft("Otro", "VENTAS@fertilcol.com"))
            .unwrap_err();
        assert!(matches!(err, Error::Duplicate { field: "email", .. }));
    }

    #[test]
    fn test_activation() {
        let inventory = inventory();
        let id = inventory
            .create_supplier(supplier_draft("Fertilcol", "ventas@fertilcol.com"))
            .unwrap()
            .record
            .id;

        let saved = inventory.set_supplier_active(id, false).unwrap();
        assert!(!saved.record.active);
        assert_eq!(saved.notice.message, "Supplier 'Fertilcol' is now inactive");

        assert_eq!(
            inventory
                .list_suppliers(None, Some(Activity::Inactive))
                .unwrap()
                .len(),
            1
        );
        assert!(inventory
            .list_suppliers(None, Some(Activity::Active))
            .unwrap()
            .is_empty());
        assert!(inventory.set_supplier_active(99, true).unwrap_err().is_not_found());
    }

    #[test]
    fn test_distributor_references_supplier() {
        let inventory = inventory();
        let err = inventory
            .create_distributor(distributor_draft("Central", "a@central.com", Some(5)))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Validation {
                field: "supplierId",
                ..
            }
        ));

        let supplier = inventory
            .create_supplier(supplier_draft("Fertilcol", "ventas@fertilcol.com"))
            .unwrap()
            .record;
        let saved = inventory
            .create_distributor(distributor_draft("Central", "a@central.com", Some(supplier.id)))
            .unwrap();
        assert_eq!(saved.record.delivery_route.as_deref(), Some("Sabana Norte"));

        inventory.delete_supplier(supplier.id).unwrap();
        assert!(inventory
            .get_distributor(saved.record.id)
            .unwrap()
            .supplier_id
            .is_none());
    }

    #[test]
    fn test_distributor_activation_and_delete() {
        let inventory = inventory();
        let id = inventory
            .create_distributor(distributor_draft("Central", "a@central.com", None))
            .unwrap()
            .record
            .id;

        inventory.set_distributor_active(id, false).unwrap();
        assert!(!inventory.get_distributor(id).unwrap().active);
        assert!(inventory
            .set_distributor_active(id, true)
            .unwrap()
            .record
            .active);

        inventory.delete_distributor(id).unwrap();
        assert!(inventory.get_distributor(id).unwrap_err().is_not_found());
    }
}
