//! Uniform access to the record kinds managed through the inventory.
//!
//! Every managed record type implements [`Resource`], so the list, search,
//! status filter, count and export plumbing of the outer surfaces is written
//! once.

use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{Inventory, Saved};
use crate::error::{Error, Result};
use crate::expiry::{ExpiryAlert, ExpiryStatus};
use crate::export::CsvRow;
use crate::filter::{self, Searchable, StatusCounts};
use crate::model::{
    Activity, Category, CategoryDraft, Distributor, DistributorDraft, ExpiryDraft, Movement,
    MovementDraft, MovementKind, Product, ProductDraft, ProductStatus, Supplier, SupplierDraft,
    UnitDraft, UnitOfMeasure,
};
use crate::notice::Notice;

/// A record kind with list, get, create, update and delete operations.
pub trait Resource: Serialize + Searchable + CsvRow + Clone + Send + 'static {
    /// Singular name, used in messages.
    const NAME: &'static str;
    /// Plural name, used in routes and export file names.
    const PLURAL: &'static str;

    /// Form payload for create and update.
    type Draft: DeserializeOwned + Send + 'static;
    /// Status the list can be filtered by.
    type Status: Copy + Ord + Serialize + FromStr<Err = Error> + Send + 'static;

    /// Records matching `search` and `status`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list(
        inventory: &Inventory,
        search: Option<&str>,
        status: Option<Self::Status>,
    ) -> Result<Vec<Self>>;

    /// Status of this record, if the kind has one.
    fn status_of(&self) -> Option<Self::Status>;

    /// Get one record.
    ///
    /// # Errors
    ///
    /// Returns a not-found error if it does not exist.
    fn get(inventory: &Inventory, id: i64) -> Result<Self>;

    /// Create a record.
    ///
    /// # Errors
    ///
    /// Returns a validation or conflict error for a bad draft.
    fn create(inventory: &Inventory, draft: Self::Draft) -> Result<Saved<Self>>;

    /// Replace a record.
    ///
    /// # Errors
    ///
    /// Returns a not-found, validation or conflict error.
    fn update(inventory: &Inventory, id: i64, draft: Self::Draft) -> Result<Saved<Self>>;

    /// Delete a record.
    ///
    /// # Errors
    ///
    /// Returns a not-found error if it does not exist.
    fn delete(inventory: &Inventory, id: i64) -> Result<Notice>;

    /// Per-status totals over the records matching `search`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn counts(inventory: &Inventory, search: Option<&str>) -> Result<StatusCounts<Self::Status>> {
        let items = Self::list(inventory, search, None)?;
        Ok(filter::count_by_status(&items, Self::status_of))
    }
}

/// Status of record kinds that have none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum NoStatus {}

impl FromStr for NoStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Err(Error::validation(
            "status",
            format!("'{}' cannot be used here: this list has no status filter", s.trim()),
        ))
    }
}

/// Parse a status filter from a query string.
///
/// A missing or blank value, "all" and "todos" mean no filter.
///
/// # Errors
///
/// Returns a validation error for an unknown status.
pub fn parse_status<S: FromStr<Err = Error>>(raw: Option<&str>) -> Result<Option<S>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) if s.eq_ignore_ascii_case("all") || s.eq_ignore_ascii_case("todos") => Ok(None),
        Some(s) => s.parse().map(Some),
    }
}

impl Resource for Category {
    const NAME: &'static str = "category";
    const PLURAL: &'static str = "categories";
    type Draft = CategoryDraft;
    type Status = NoStatus;

    fn list(inventory: &Inventory, search: Option<&str>, _: Option<NoStatus>) -> Result<Vec<Self>> {
        inventory.list_categories(search)
    }

    fn status_of(&self) -> Option<NoStatus> {
        None
    }

    fn get(inventory: &Inventory, id: i64) -> Result<Self> {
        inventory.get_category(id)
    }

    fn create(inventory: &Inventory, draft: CategoryDraft) -> Result<Saved<Self>> {
        inventory.create_category(draft)
    }

    fn update(inventory: &Inventory, id: i64, draft: CategoryDraft) -> Result<Saved<Self>> {
        inventory.update_category(id, draft)
    }

    fn delete(inventory: &Inventory, id: i64) -> Result<Notice> {
        inventory.delete_category(id)
    }
}

impl Resource for UnitOfMeasure {
    const NAME: &'static str = "unit";
    const PLURAL: &'static str = "units";
    type Draft = UnitDraft;
    type Status = NoStatus;

    fn list(inventory: &Inventory, search: Option<&str>, _: Option<NoStatus>) -> Result<Vec<Self>> {
        inventory.list_units(search)
    }

    fn status_of(&self) -> Option<NoStatus> {
        None
    }

    fn get(inventory: &Inventory, id: i64) -> Result<Self> {
        inventory.get_unit(id)
    }

    fn create(inventory: &Inventory, draft: UnitDraft) -> Result<Saved<Self>> {
        inventory.create_unit(draft)
    }

    fn update(inventory: &Inventory, id: i64, draft: UnitDraft) -> Result<Saved<Self>> {
        inventory.update_unit(id, draft)
    }

    fn delete(inventory: &Inventory, id: i64) -> Result<Notice> {
        inventory.delete_unit(id)
    }
}

impl Resource for Product {
    const NAME: &'static str = "product";
    const PLURAL: &'static str = "products";
    type Draft = ProductDraft;
    type Status = ProductStatus;

    fn list(
        inventory: &Inventory,
        search: Option<&str>,
        status: Option<ProductStatus>,
    ) -> Result<Vec<Self>> {
        inventory.list_products(search, status)
    }

    fn status_of(&self) -> Option<ProductStatus> {
        Some(self.status)
    }

    fn get(inventory: &Inventory, id: i64) -> Result<Self> {
        inventory.get_product(id)
    }

    fn create(inventory: &Inventory, draft: ProductDraft) -> Result<Saved<Self>> {
        inventory.create_product(draft)
    }

    fn update(inventory: &Inventory, id: i64, draft: ProductDraft) -> Result<Saved<Self>> {
        inventory.update_product(id, draft)
    }

    fn delete(inventory: &Inventory, id: i64) -> Result<Notice> {
        inventory.delete_product(id)
    }
}

impl Resource for Supplier {
    const NAME: &'static str = "supplier";
    const PLURAL: &'static str = "suppliers";
    type Draft = SupplierDraft;
    type Status = Activity;

    fn list(
        inventory: &Inventory,
        search: Option<&str>,
        status: Option<Activity>,
    ) -> Result<Vec<Self>> {
        inventory.list_suppliers(search, status)
    }

    fn status_of(&self) -> Option<Activity> {
        Some(self.activity())
    }

    fn get(inventory: &Inventory, id: i64) -> Result<Self> {
        inventory.get_supplier(id)
    }

    fn create(inventory: &Inventory, draft: SupplierDraft) -> Result<Saved<Self>> {
        inventory.create_supplier(draft)
    }

    fn update(inventory: &Inventory, id: i64, draft: SupplierDraft) -> Result<Saved<Self>> {
        inventory.update_supplier(id, draft)
    }

    fn delete(inventory: &Inventory, id: i64) -> Result<Notice> {
        inventory.delete_supplier(id)
    }
}

impl Resource for Distributor {
    const NAME: &'static str = "distributor";
    const PLURAL: &'static str = "distributors";
    type Draft = DistributorDraft;
    type Status = Activity;

    fn list(
        inventory: &Inventory,
        search: Option<&str>,
        status: Option<Activity>,
    ) -> Result<Vec<Self>> {
        inventory.list_distributors(search, status)
    }

    fn status_of(&self) -> Option<Activity> {
        Some(self.activity())
    }

    fn get(inventory: &Inventory, id: i64) -> Result<Self> {
        inventory.get_distributor(id)
    }

    fn create(inventory: &Inventory, draft: DistributorDraft) -> Result<Saved<Self>> {
        inventory.create_distributor(draft)
    }

    fn update(inventory: &Inventory, id: i64, draft: DistributorDraft) -> Result<Saved<Self>> {
        inventory.update_distributor(id, draft)
    }

    fn delete(inventory: &Inventory, id: i64) -> Result<Notice> {
        inventory.delete_distributor(id)
    }
}

impl Resource for Movement {
    const NAME: &'static str = "movement";
    const PLURAL: &'static str = "movements";
    type Draft = MovementDraft;
    type Status = MovementKind;

    fn list(
        inventory: &Inventory,
        search: Option<&str>,
        kind: Option<MovementKind>,
    ) -> Result<Vec<Self>> {
        inventory.list_movements(search, kind)
    }

    fn status_of(&self) -> Option<MovementKind> {
        Some(self.kind)
    }

    fn get(inventory: &Inventory, id: i64) -> Result<Self> {
        inventory.get_movement(id)
    }

    fn create(inventory: &Inventory, draft: MovementDraft) -> Result<Saved<Self>> {
        inventory.create_movement(draft)
    }

    fn update(inventory: &Inventory, id: i64, draft: MovementDraft) -> Result<Saved<Self>> {
        inventory.update_movement(id, draft)
    }

    fn delete(inventory: &Inventory, id: i64) -> Result<Notice> {
        inventory.delete_movement(id)
    }
}

impl Resource for ExpiryAlert {
    const NAME: &'static str = "expiry entry";
    const PLURAL: &'static str = "expirations";
    type Draft = ExpiryDraft;
    type Status = ExpiryStatus;

    fn list(
        inventory: &Inventory,
        search: Option<&str>,
        status: Option<ExpiryStatus>,
    ) -> Result<Vec<Self>> {
        inventory.list_expirations(search, status)
    }

    fn status_of(&self) -> Option<ExpiryStatus> {
        Some(self.status)
    }

    fn get(inventory: &Inventory, id: i64) -> Result<Self> {
        inventory.get_expiry_alert(id)
    }

    fn create(inventory: &Inventory, draft: ExpiryDraft) -> Result<Saved<Self>> {
        inventory.create_expiry(draft)
    }

    fn update(inventory: &Inventory, id: i64, draft: ExpiryDraft) -> Result<Saved<Self>> {
        inventory.update_expiry(id, draft)
    }

    fn delete(inventory: &Inventory, id: i64) -> Result<Notice> {
        inventory.delete_expiry(id)
    }
}
