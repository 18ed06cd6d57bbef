//! Products and stock value per supplier.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::export::CsvRow;
use crate::model::{Activity, Product, Supplier};

/// What one supplier provides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierSummary {
    /// Supplier id.
    pub supplier_id: i64,
    /// Company name.
    pub name: String,
    /// Whether the supplier is active.
    pub activity: Activity,
    /// Products assigned to the supplier.
    pub assigned_products: usize,
    /// Assigned products with active status.
    pub active_products: usize,
    /// Assigned products that are inactive or suspended.
    pub inactive_products: usize,
    /// Stock value of the assigned products.
    pub stock_value: Decimal,
}

impl CsvRow for SupplierSummary {
    const HEADERS: &'static [&'static str] = &[
        "Supplier",
        "Status",
        "Assigned products",
        "Active products",
        "Inactive products",
        "Stock value",
    ];

    fn fields(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.activity.to_string(),
            self.assigned_products.to_string(),
            self.active_products.to_string(),
            self.inactive_products.to_string(),
            self.stock_value.to_string(),
        ]
    }
}

/// Summarize each supplier's assigned products.
///
/// `links` holds `(product_id, supplier_id)` assignments.
#[must_use]
pub fn supplier_report(
    suppliers: &[Supplier],
    products: &[Product],
    links: &[(i64, i64)],
) -> Vec<SupplierSummary> {
    let by_id: BTreeMap<i64, &Product> = products.iter().map(|p| (p.id, p)).collect();
    let mut assigned: BTreeMap<i64, Vec<&Product>> = BTreeMap::new();
    for (product_id, supplier_id) in links {
        if let Some(product) = by_id.get(product_id) {
            assigned.entry(*supplier_id).or_default().push(product);
        }
    }

    suppliers
        .iter()
        .map(|supplier| {
            let products = assigned.get(&supplier.id).map_or(&[][..], Vec::as_slice);
            let active = products.iter().filter(|p| p.is_active()).count();
            SupplierSummary {
                supplier_id: supplier.id,
                name: supplier.name.clone(),
                activity: supplier.activity(),
                assigned_products: products.len(),
                active_products: active,
                inactive_products: products.len() - active,
                stock_value: products
                    .iter()
                    .fold(Decimal::ZERO, |sum, p| sum.saturating_add(p.stock_value())),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ProductStatus;
    use crate::stock::tests::product;

    fn supplier(id: i64, name: &str) -> Supplier {
        Supplier {
            id,
            kind: None,
            name: name.to_string(),
            phone: "3001234567".to_string(),
            email: format!("ventas{id}@example.com"),
            address: "Cartagena".to_string(),
            active: true,
        }
    }

    #[test]
    fn test_summary_per_supplier() {
        let mut urea = product(1, "Urea", 10, 0);
        urea.unit_cost = Some(Decimal::new(2, 0));
        let mut pala = product(2, "Pala", 3, 0);
        pala.unit_cost = Some(Decimal::new(10, 0));
        pala.status = ProductStatus::Suspended;

        let report = supplier_report(
            &[supplier(1, "Fertilcol"), supplier(2, "Semillas Premium")],
            &[urea, pala],
            &[(1, 1), (2, 1), (99, 2)],
        );

        assert_eq!(report.len(), 2);
        let fertilcol = &report[0];
        assert_eq!(fertilcol.assigned_products, 2);
        assert_eq!(fertilcol.active_products, 1);
        assert_eq!(fertilcol.inactive_products, 1);
        assert_eq!(fertilcol.stock_value, Decimal::new(50, 0));

        let premium = &report[1];
        assert_eq!(premium.assigned_products, 0);
        assert_eq!(premium.stock_value, Decimal::ZERO);
    }
}
