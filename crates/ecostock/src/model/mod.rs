//! Domain records for ecostock.
//!
//! Each record comes with a *draft*: the form payload used to create or
//! update it. Drafts carry no id; the store assigns ids on insert.

mod catalog;
mod expiry;
mod movement;
mod party;
mod product;

pub use catalog::{Category, CategoryDraft, UnitDraft, UnitOfMeasure};
pub use expiry::{ExpiryDraft, ExpiryEntry};
pub use movement::{Movement, MovementDraft, MovementKind};
pub use party::{Activity, Distributor, DistributorDraft, Supplier, SupplierDraft};
pub use product::{Product, ProductDraft, ProductStatus};
