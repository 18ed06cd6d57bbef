//! Stock levels, low-stock alerts and stock derived from movements.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{Movement, Product};

/// How healthy a product's stock is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockLevel {
    /// Above the low-stock threshold.
    Normal,
    /// At or below the threshold but not empty.
    Low,
    /// Nothing left.
    OutOfStock,
}

impl StockLevel {
    /// Classify a stock count against a threshold.
    #[must_use]
    pub fn classify(stock: i64, threshold: i64) -> Self {
        if stock <= 0 {
            Self::OutOfStock
        } else if stock <= threshold {
            Self::Low
        } else {
            Self::Normal
        }
    }

    /// Classify a product, using its own minimum when it has one.
    #[must_use]
    pub fn of(product: &Product, default_threshold: i64) -> Self {
        Self::classify(product.stock, threshold_for(product, default_threshold))
    }

    /// Human label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Normal => "Available",
            Self::Low => "Low stock",
            Self::OutOfStock => "Out of stock",
        }
    }
}

impl std::fmt::Display for StockLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Low-stock threshold for a product.
#[must_use]
pub fn threshold_for(product: &Product, default_threshold: i64) -> i64 {
    if product.min_stock > 0 {
        product.min_stock
    } else {
        default_threshold
    }
}

/// How soon a low-stock product needs restocking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestockUrgency {
    /// Still has some stock.
    Medium,
    /// Out of stock.
    High,
}

/// A product at or below its low-stock threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LowStockItem {
    /// Product id.
    pub product_id: i64,
    /// Inventory code.
    pub code: String,
    /// Product name.
    pub name: String,
    /// Units in stock.
    pub stock: i64,
    /// Threshold the stock was compared with.
    pub threshold: i64,
    /// Units missing to reach the threshold.
    pub shortfall: i64,
    /// Out of stock or merely low.
    pub urgency: RestockUrgency,
}

/// Active products at or below their threshold, emptiest first.
#[must_use]
pub fn low_stock(products: &[Product], default_threshold: i64) -> Vec<LowStockItem> {
    let mut items: Vec<LowStockItem> = products
        .iter()
        .filter(|p| p.is_active())
        .filter(|p| StockLevel::of(p, default_threshold) != StockLevel::Normal)
        .map(|p| {
            let threshold = threshold_for(p, default_threshold);
            LowStockItem {
                product_id: p.id,
                code: p.code.clone(),
                name: p.name.clone(),
                stock: p.stock,
                threshold,
                shortfall: threshold - p.stock,
                urgency: if p.stock <= 0 {
                    RestockUrgency::High
                } else {
                    RestockUrgency::Medium
                },
            }
        })
        .collect();
    items.sort_by(|a, b| a.stock.cmp(&b.stock).then_with(|| a.name.cmp(&b.name)));
    items
}

/// Net stock per product implied by a movement history.
///
/// Entries add and exits subtract.
#[must_use]
pub fn stock_from_movements(movements: &[Movement]) -> BTreeMap<i64, i64> {
    let mut stock = BTreeMap::new();
    for movement in movements {
        let net = stock.entry(movement.product_id).or_insert(0_i64);
        *net = net.saturating_add(movement.stock_delta());
    }
    stock
}

/// A product whose recorded stock disagrees with its movement history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockDiscrepancy {
    /// Product id.
    pub product_id: i64,
    /// Inventory code.
    pub code: String,
    /// Product name.
    pub name: String,
    /// Stock stored on the product.
    pub recorded: i64,
    /// Stock implied by the movements.
    pub from_movements: i64,
    /// `recorded - from_movements`.
    pub difference: i64,
}

/// Compare recorded stock with the movement history.
#[must_use]
pub fn reconcile(products: &[Product], movements: &[Movement]) -> Vec<StockDiscrepancy> {
    let derived = stock_from_movements(movements);
    products
        .iter()
        .filter_map(|p| {
            let from_movements = derived.get(&p.id).copied().unwrap_or(0);
            (from_movements != p.stock).then(|| StockDiscrepancy {
                product_id: p.id,
                code: p.code.clone(),
                name: p.name.clone(),
                recorded: p.stock,
                from_movements,
                difference: p.stock - from_movements,
            })
        })
        .collect()
}
