//! Inventory reports.
//!
//! Every report is a pure function over records and a reference date, so
//! the same numbers come out of the API, the CLI and the tests.

mod category;
mod dashboard;
mod period;
mod rotation;
mod supplier;
mod valuation;

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::model::{Category, Product};

pub use category::{stock_by_category, CategoryStock};
pub use dashboard::{dashboard, DashboardSummary};
pub use period::{
    movements_by_period, MovementReport, Period, PeriodBucket, PeriodKind, ProductActivity,
    UserActivity,
};
pub use rotation::{top_products, MonthlyRotation, TopProduct, Trend};
pub use supplier::{supplier_report, SupplierSummary};
pub use valuation::{total_value, valuation, ValuationRow};

/// Group name for products without a category.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// The reports the service can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportKind {
    /// Headline numbers.
    Dashboard,
    /// Stock grouped by category.
    StockByCategory,
    /// Entries and exits per period.
    Movements,
    /// Products ranked by rotation.
    TopProducts,
    /// Per-product stock value.
    Valuation,
    /// Products and value per supplier.
    Suppliers,
    /// Recorded stock vs. movement history.
    Reconciliation,
}

impl ReportKind {
    /// Every report, in menu order.
    pub const ALL: [Self; 7] = [
        Self::Dashboard,
        Self::StockByCategory,
        Self::Movements,
        Self::TopProducts,
        Self::Valuation,
        Self::Suppliers,
        Self::Reconciliation,
    ];

    /// Stable name used in URLs and on the command line.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::StockByCategory => "stock-by-category",
            Self::Movements => "movements",
            Self::TopProducts => "top-products",
            Self::Valuation => "valuation",
            Self::Suppliers => "suppliers",
            Self::Reconciliation => "reconciliation",
        }
    }

    /// Prefix for exported file names.
    #[must_use]
    pub fn file_prefix(self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::StockByCategory => "stock_por_categoria",
            Self::Movements => "movimientos_periodo",
            Self::TopProducts => "top_productos",
            Self::Valuation => "reporte_inventario",
            Self::Suppliers => "reporte_proveedores",
            Self::Reconciliation => "conciliacion_stock",
        }
    }
}

impl std::fmt::Display for ReportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| Error::validation("report", format!("unknown report '{wanted}'")))
    }
}

/// Category names keyed by id.
pub(crate) fn category_names(categories: &[Category]) -> BTreeMap<i64, &str> {
    categories.iter().map(|c| (c.id, c.name.as_str())).collect()
}

/// Name of a product's category, or [`UNCATEGORIZED`].
pub(crate) fn category_of<'a>(product: &Product, names: &BTreeMap<i64, &'a str>) -> &'a str {
    product
        .category_id
        .and_then(|id| names.get(&id).copied())
        .unwrap_or(UNCATEGORIZED)
}

/// Whether `product` falls in the category named `wanted`.
///
/// No filter, a blank one, or "all" keeps every product.
pub(crate) fn in_category(
    product: &Product,
    names: &BTreeMap<i64, &str>,
    wanted: Option<&str>,
) -> bool {
    match wanted.map(str::trim) {
        None | Some("") => true,
        Some(w) if w.eq_ignore_ascii_case("all") || w.eq_ignore_ascii_case("todos") => true,
        Some(w) => crate::validation::same_text(category_of(product, names), w),
    }
}

/// Round to one decimal place.
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// `numerator / denominator` rounded half up, for non-negative inputs.
pub(crate) fn rounded_div(numerator: i64, denominator: usize) -> i64 {
    let denominator = i64::try_from(denominator).unwrap_or(i64::MAX);
    if denominator == 0 {
        return 0;
    }
    (2 * numerator + denominator) / (2 * denominator)
}
