//! Headline numbers for the dashboard.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::expiry::{ExpiryAlert, ExpiryStatus};
use crate::model::{Product, Supplier};
use crate::stock::StockLevel;

/// Headline inventory numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    /// Products in the catalog.
    pub total_products: usize,
    /// Products with active status.
    pub active_products: usize,
    /// Active products at or below their threshold, excluding empty ones.
    pub low_stock: usize,
    /// Active products with nothing left.
    pub out_of_stock: usize,
    /// Categories in the catalog.
    pub categories: usize,
    /// Suppliers currently worked with.
    pub active_suppliers: usize,
    /// Lots expiring within the warning window.
    pub expiring_soon: usize,
    /// Lots past their date.
    pub expired: usize,
    /// Stock value at cost.
    pub inventory_value: Decimal,
}

/// Compute the dashboard summary.
#[must_use]
pub fn dashboard(
    products: &[Product],
    categories: usize,
    suppliers: &[Supplier],
    expirations: &[ExpiryAlert],
    default_threshold: i64,
) -> DashboardSummary {
    let active: Vec<&Product> = products.iter().filter(|p| p.is_active()).collect();
    let level_count = |level: StockLevel| {
        active
            .iter()
            .filter(|p| StockLevel::of(p, default_threshold) == level)
            .count()
    };
    let expiry_count = |status: ExpiryStatus| {
        expirations
            .iter()
            .filter(|alert| alert.status == status)
            .count()
    };

    DashboardSummary {
        total_products: products.len(),
        active_products: active.len(),
        low_stock: level_count(StockLevel::Low),
        out_of_stock: level_count(StockLevel::OutOfStock),
        categories,
        active_suppliers: suppliers.iter().filter(|s| s.active).count(),
        expiring_soon: expiry_count(ExpiryStatus::ExpiringSoon),
        expired: expiry_count(ExpiryStatus::Expired),
        inventory_value: products
            .iter()
            .fold(Decimal::ZERO, |sum, p| sum.saturating_add(p.stock_value())),
    }
}
