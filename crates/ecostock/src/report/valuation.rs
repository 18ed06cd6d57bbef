//! General inventory report with stock value per product.

use rust_decimal::Decimal;
use serde::Serialize;

use super::{category_names, category_of, in_category};
use crate::export::{opt_decimal, CsvRow};
use crate::model::{Category, Product};
use crate::stock::StockLevel;

/// One product line of the inventory report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationRow {
    /// Product id.
    pub product_id: i64,
    /// Inventory code.
    pub code: String,
    /// Product name.
    pub name: String,
    /// Category name.
    pub category: String,
    /// Units in stock.
    pub stock: i64,
    /// Minimum stock.
    pub min_stock: i64,
    /// Purchase cost per unit.
    pub unit_cost: Option<Decimal>,
    /// `stock * unit_cost`.
    pub value: Decimal,
    /// Stock level against the product's threshold.
    pub level: StockLevel,
}

impl CsvRow for ValuationRow {
    const HEADERS: &'static [&'static str] = &[
        "Code",
        "Product",
        "Category",
        "Stock",
        "Min stock",
        "Unit cost",
        "Value",
        "Level",
    ];

    fn fields(&self) -> Vec<String> {
        vec![
            self.code.clone(),
            self.name.clone(),
            self.category.clone(),
            self.stock.to_string(),
            self.min_stock.to_string(),
            opt_decimal(self.unit_cost),
            self.value.to_string(),
            self.level.to_string(),
        ]
    }
}

/// Value every product in stock, optionally within one category.
///
/// With `low_stock_only`, only active products at or below their threshold
/// are kept, matching the low-stock alerts.
#[must_use]
pub fn valuation(
    products: &[Product],
    categories: &[Category],
    category: Option<&str>,
    low_stock_only: bool,
    default_threshold: i64,
) -> Vec<ValuationRow> {
    let names = category_names(categories);
    products
        .iter()
        .filter(|p| in_category(p, &names, category))
        .filter(|p| {
            !low_stock_only
                || (p.is_active() && StockLevel::of(p, default_threshold) != StockLevel::Normal)
        })
        .map(|p| ValuationRow {
            product_id: p.id,
            code: p.code.clone(),
            name: p.name.clone(),
            category: category_of(p, &names).to_string(),
            stock: p.stock,
            min_stock: p.min_stock,
            unit_cost: p.unit_cost,
            value: p.stock_value(),
            level: StockLevel::of(p, default_threshold),
        })
        .collect()
}

/// Sum of the row values.
#[must_use]
pub fn total_value(rows: &[ValuationRow]) -> Decimal {
    rows.iter()
        .fold(Decimal::ZERO, |sum, row| sum.saturating_add(row.value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::tests::category;
    use crate::model::ProductStatus;
    use crate::stock::tests::product;

    #[test]
    fn test_rows_and_total() {
        let categories = vec![category(1, "Fertilizantes")];
        let mut urea = product(1, "Urea", 500, 20);
        urea.category_id = Some(1);
        urea.unit_cost = Some(Decimal::new(8550, 2));
        let mut pala = product(2, "Pala", 4, 5);
        pala.unit_cost = Some(Decimal::new(45000, 0));
        let free = product(3, "Muestra", 0, 0);

        let rows = valuation(&[urea, pala, free], &categories, None, false, 10);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].category, "Fertilizantes");
        assert_eq!(rows[0].value, Decimal::new(42750, 0));
        assert_eq!(rows[0].level, StockLevel::Normal);
        assert_eq!(rows[1].level, StockLevel::Low);
        assert_eq!(rows[2].value, Decimal::ZERO);
        assert_eq!(rows[2].level, StockLevel::OutOfStock);
        assert_eq!(total_value(&rows), Decimal::new(222_750, 0));
    }

    #[test]
    fn test_low_stock_only() {
        let mut idle = product(4, "Guadaña", 0, 5);
        idle.status = ProductStatus::Inactive;
        let products = [
            product(1, "Urea", 500, 20),
            product(2, "Pala", 4, 5),
            product(3, "Ciper", 0, 5),
            idle,
        ];

        let rows = valuation(&products, &[], None, true, 10);
        let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Pala", "Ciper"]);
    }

    #[test]
    fn test_category_filter() {
        let categories = vec![category(1, "Fertilizantes")];
        let mut urea = product(1, "Urea", 500, 20);
        urea.category_id = Some(1);

        let rows = valuation(
            &[urea, product(2, "Pala", 4, 5)],
            &categories,
            Some("fertilizantes"),
            false,
            10,
        );
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Urea");
    }

    #[test]
    fn test_csv_fields() {
        let rows = valuation(&[product(1, "Urea", 3, 0)], &[], None, false, 10);
        let fields = rows[0].fields();
        assert_eq!(fields[2], "Uncategorized");
        assert_eq!(fields[5], "");
        assert_eq!(fields[7], "Low stock");
    }
}
