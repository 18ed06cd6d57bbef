//! Categories and units of measure.

use super::{found, Inventory, Saved};
use crate::error::Result;
use crate::filter;
use crate::model::{Category, CategoryDraft, UnitDraft, UnitOfMeasure};
use crate::notice::Notice;
use crate::validation::{ensure_unique, optional, required};

impl Inventory {
    /// Categories matching `search`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn list_categories(&self, search: Option<&str>) -> Result<Vec<Category>> {
        let categories = self.storage.list_categories()?;
        Ok(filter::apply(categories, search, None::<()>, |_| None))
    }

    /// Get a category.
    ///
    /// # Errors
    ///
    /// Returns a not-found error if it does not exist.
    pub fn get_category(&self, id: i64) -> Result<Category> {
        found(self.storage.get_category(id)?, "category", id)
    }

    /// Create a category.
    ///
    /// # Errors
    ///
    /// Returns a validation or duplicate error for a bad draft.
    pub fn create_category(&self, draft: CategoryDraft) -> Result<Saved<Category>> {
        let draft = self.check_category(draft, None)?;
        let id = self.storage.insert_category(&draft)?;
        let category = self.get_category(id)?;
        let notice = Notice::success(format!("Category '{}' created", category.name));
        Ok(Saved::new(category, notice))
    }

    /// Replace a category.
    ///
    /// # Errors
    ///
    /// Returns a not-found, validation or duplicate error.
    pub fn update_category(&self, id: i64, draft: CategoryDraft) -> Result<Saved<Category>> {
        self.get_category(id)?;
        let draft = self.check_category(draft, Some(id))?;
        self.storage.update_category(id, &draft)?;
        let category = self.get_category(id)?;
        let notice = Notice::success(format!("Category '{}' updated", category.name));
        Ok(Saved::new(category, notice))
    }

    /// Delete a category. Its products become uncategorized.
    ///
    /// # Errors
    ///
    /// Returns a not-found error if it does not exist.
    pub fn delete_category(&self, id: i64) -> Result<Notice> {
        let category = self.get_category(id)?;
        self.storage.delete_category(id)?;
        Ok(Notice::success(format!("Category '{}' deleted", category.name)))
    }

    fn check_category(&self, draft: CategoryDraft, editing: Option<i64>) -> Result<CategoryDraft> {
        let draft = CategoryDraft {
            name: required("name", &draft.name)?,
            description: required("description", &draft.description)?,
            kind: required("kind", &draft.kind)?,
            shelf_life: required("shelfLife", &draft.shelf_life)?,
            presentation: required("presentation", &draft.presentation)?,
        };
        let existing = self.storage.list_categories()?;
        ensure_unique(
            "category",
            "name",
            &draft.name,
            existing.iter().map(|c| (c.id, c.name.as_str())),
            editing,
        )?;
        Ok(draft)
    }

    /// Units matching `search`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn list_units(&self, search: Option<&str>) -> Result<Vec<UnitOfMeasure>> {
        let units = self.storage.list_units()?;
        Ok(filter::apply(units, search, None::<()>, |_| None))
    }

    /// Get a unit.
    ///
    /// # Errors
    ///
    /// Returns a not-found error if it does not exist.
    pub fn get_unit(&self, id: i64) -> Result<UnitOfMeasure> {
        found(self.storage.get_unit(id)?, "unit", id)
    }

    /// Create a unit of measure.
    ///
    /// # Errors
    ///
    /// Returns a validation or duplicate error for a bad draft.
    pub fn create_unit(&self, draft: UnitDraft) -> Result<Saved<UnitOfMeasure>> {
        let draft = self.check_unit(draft, None)?;
        let id = self.storage.insert_unit(&draft)?;
        let unit = self.get_unit(id)?;
        let notice = Notice::success(format!("Unit '{}' created", unit.name));
        Ok(Saved::new(unit, notice))
    }

    /// Replace a unit of measure.
    ///
    /// # Errors
    ///
    /// Returns a not-found, validation or duplicate error.
    pub fn update_unit(&self, id: i64, draft: UnitDraft) -> Result<Saved<UnitOfMeasure>> {
        self.get_unit(id)?;
        let draft = self.check_unit(draft, Some(id))?;
        self.storage.update_unit(id, &draft)?;
        let unit = self.get_unit(id)?;
        let notice = Notice::success(format!("Unit '{}' updated", unit.name));
        Ok(Saved::new(unit, notice))
    }

    /// Delete a unit of measure.
    ///
    /// # Errors
    ///
    /// Returns a not-found error if it does not exist.
    pub fn delete_unit(&self, id: i64) -> Result<Notice> {
        let unit = self.get_unit(id)?;
        self.storage.delete_unit(id)?;
        Ok(Notice::success(format!("Unit '{}' deleted", unit.name)))
    }

    fn check_unit(&self, draft: UnitDraft, editing: Option<i64>) -> Result<UnitDraft> {
        let draft = UnitDraft {
            name: required("name", &draft.name)?,
            abbreviation: required("abbreviation", &draft.abbreviation)?,
            description: optional(draft.description),
        };
        let existing = self.storage.list_units()?;
        ensure_unique(
            "unit",
            "name",
            &draft.name,
            existing.iter().map(|u| (u.id, u.name.as_str())),
            editing,
        )?;
        ensure_unique(
            "unit",
            "abbreviation",
            &draft.abbreviation,
            existing.iter().map(|u| (u.id, u.abbreviation.as_str())),
            editing,
        )?;
        Ok(draft)
    }
}

#[cfg(test)]
mod tests {
    use crate::error::Error;
    use crate::inventory::tests::{category_draft, inventory, product_draft, unit_draft};
    use crate::notice::NoticeLevel;

    #[test]
    fn test_create_category_trims_and_notifies() {
        let inventory = inventory();
        let mut draft = category_draft("  Fertilizantes ");
        draft.kind = " Insumo".to_string();

        let saved = inventory.create_category(draft).unwrap();
        assert_eq!(saved.record.name, "Fertilizantes");
        assert_eq!(saved.record.kind, "Insumo");
        assert_eq!(saved.notice.level, NoticeLevel::Success);
        assert_eq!(saved.notice.message, "Category 'Fertilizantes' created");
    }

    #[test]
    fn test_category_requires_every_field() {
        let inventory = inventory();
        let mut draft = category_draft("Herramientas");
        draft.shelf_life = "   ".to_string();

        let err = inventory.create_category(draft).unwrap_err();
        assert!(matches!(
            err,
            Error::Validation {
                field: "shelfLife",
                ..
            }
        ));
    }

    #[test]
    fn test_category_name_unique_ignoring_case() {
        let inventory = inventory();
        let first = inventory
            .create_category(category_draft("Fertilizantes"))
            .unwrap();

        let err = inventory
            .create_category(category_draft("FERTILIZANTES "))
            .unwrap_err();
        assert!(err.is_conflict());

        // Saving the same record unchanged is allowed.
        inventory
            .update_category(first.record.id, category_draft("fertilizantes"))
            .unwrap();
    }

    #[test]
    fn test_category_search() {
        let inventory = inventory();
        inventory.create_category(category_draft("Fertilizantes")).unwrap();
        inventory.create_category(category_draft("Herramientas")).unwrap();

        assert_eq!(inventory.list_categories(Some("herra")).unwrap().len(), 1);
        assert_eq!(inventory.list_categories(Some("  ")).unwrap().len(), 2);
    }

    #[test]
    fn test_delete_category_detaches_products() {
        let inventory = inventory();
        let category = inventory
            .create_category(category_draft("Fertilizantes"))
            .unwrap()
            .record;
        let mut draft = product_draft("PROD001", "Urea Granulada 46%", 0);
        draft.category_id = Some(category.id);
        let product = inventory.create_product(draft).unwrap().record;

        let notice = inventory.delete_category(category.id).unwrap();
        assert_eq!(notice.message, "Category 'Fertilizantes' deleted");
        assert!(inventory.get_product(product.id).unwrap().category_id.is_none());
        assert!(inventory.delete_category(category.id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_unit_abbreviation_unique() {
        let inventory = inventory();
        inventory.create_unit(unit_draft("Kilogramo", "kg")).unwrap();

        let err = inventory.create_unit(unit_draft("Kilo", "KG")).unwrap_err();
        assert!(matches!(
            err,
            Error::Duplicate {
                field: "abbreviation",
                ..
            }
        ));
    }

    #[test]
    fn test_update_missing_unit() {
        let inventory = inventory();
        let err = inventory
            .update_unit(42, unit_draft("Litro", "L"))
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
