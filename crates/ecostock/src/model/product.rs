//! Products and their lifecycle status.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Lifecycle status of a product in the inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    /// Stocked and sold normally.
    #[default]
    Active,
    /// Kept in the catalog but no longer handled.
    Inactive,
    /// Temporarily withheld from sale.
    Suspended,
}

impl ProductStatus {
    /// All statuses in display order.
    pub const ALL: [Self; 3] = [Self::Active, Self::Inactive, Self::Suspended];

    /// Stable string form used in storage and query strings.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Suspended => "suspended",
        }
    }
}

impl std::fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" | "activo" => Ok(Self::Active),
            "inactive" | "inactivo" => Ok(Self::Inactive),
            "suspended" | "suspendido" => Ok(Self::Suspended),
            other => Err(Error::validation(
                "status",
                format!("unknown product status '{other}'"),
            )),
        }
    }
}

/// A stocked product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Store-assigned identifier.
    pub id: i64,
    /// Inventory code, e.g. "PROD001". Unique ignoring case.
    pub code: String,
    /// Display name, unique ignoring case.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Lot or batch identifier.
    pub lot: Option<String>,
    /// Category the product belongs to.
    pub category_id: Option<i64>,
    /// Unit the stock is counted in.
    pub unit_id: Option<i64>,
    /// Units currently in stock.
    pub stock: i64,
    /// Minimum stock before the product is considered low.
    pub min_stock: i64,
    /// Purchase cost per unit.
    pub unit_cost: Option<Decimal>,
    /// Sale price per unit.
    pub unit_price: Option<Decimal>,
    /// Lifecycle status.
    pub status: ProductStatus,
    /// When the record or its stock last changed.
    pub updated_at: DateTime<Utc>,
}

/// Form payload for a product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    /// Inventory code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Lot or batch identifier.
    #[serde(default)]
    pub lot: Option<String>,
    /// Category the product belongs to.
    #[serde(default)]
    pub category_id: Option<i64>,
    /// Unit the stock is counted in.
    #[serde(default)]
    pub unit_id: Option<i64>,
    /// Units in stock. Absent leaves the stock as it is (zero for a new
    /// product).
    #[serde(default)]
    pub stock: Option<i64>,
    /// Minimum stock.
    #[serde(default)]
    pub min_stock: i64,
    /// Purchase cost per unit.
    #[serde(default)]
    pub unit_cost: Option<Decimal>,
    /// Sale price per unit.
    #[serde(default)]
    pub unit_price: Option<Decimal>,
    /// Lifecycle status.
    #[serde(default)]
    pub status: ProductStatus,
}

impl Product {
    /// Value of the units in stock at cost. Products without a cost are worth zero.
    #[must_use]
    pub fn stock_value(&self) -> Decimal {
        self.unit_cost
            .map_or(Decimal::ZERO, |cost| cost.saturating_mul(Decimal::from(self.stock)))
    }

    /// Whether the product takes part in stock reports and alerts.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == ProductStatus::Active
    }
}
