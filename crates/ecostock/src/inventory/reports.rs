//! Alerts and reports over the current inventory.

use super::Inventory;
use crate::error::Result;
use crate::notice::Notice;
use crate::report::{
    self, CategoryStock, DashboardSummary, MovementReport, Period, SupplierSummary, TopProduct,
    ValuationRow,
};
use crate::stock::{self, LowStockItem, StockDiscrepancy};

impl Inventory {
    /// Active products at or below their low-stock threshold.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn low_stock_alerts(&self) -> Result<Vec<LowStockItem>> {
        let products = self.storage.list_products()?;
        Ok(stock::low_stock(&products, self.alerts.low_stock_threshold))
    }

    /// One warning notice per low-stock product.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn low_stock_notices(&self) -> Result<Vec<Notice>> {
        Ok(self
            .low_stock_alerts()?
            .iter()
            .map(Notice::low_stock)
            .collect())
    }

    /// Products whose stored stock disagrees with their movements.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn reconcile(&self) -> Result<Vec<StockDiscrepancy>> {
        let products = self.storage.list_products()?;
        let movements = self.storage.list_movements()?;
        Ok(stock::reconcile(&products, &movements))
    }

    /// One error notice per product whose stock disagrees with its movements.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn reconciliation_notices(&self) -> Result<Vec<Notice>> {
        Ok(self.reconcile()?.iter().map(Notice::discrepancy).collect())
    }

    /// Headline figures for the dashboard.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn dashboard(&self) -> Result<DashboardSummary> {
        let products = self.storage.list_products()?;
        let categories = self.storage.list_categories()?.len();
        let suppliers = self.storage.list_suppliers()?;
        let expirations = self.expiry_alerts()?;
        Ok(report::dashboard(
            &products,
            categories,
            &suppliers,
            &expirations,
            self.alerts.low_stock_threshold,
        ))
    }

    /// Active stock grouped by category.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn stock_by_category(&self, search: Option<&str>) -> Result<Vec<CategoryStock>> {
        let products = self.storage.list_products()?;
        let categories = self.storage.list_categories()?;
        Ok(report::stock_by_category(&products, &categories, search))
    }

    /// Entries and exits bucketed over `period`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn movement_report(&self, period: Period) -> Result<MovementReport> {
        let movements = self.storage.list_movements()?;
        Ok(report::movements_by_period(&movements, period, self.today()))
    }

    /// Products with the highest rotation, optionally within one category.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn top_products(
        &self,
        category: Option<&str>,
        limit: Option<usize>,
    ) -> Result<Vec<TopProduct>> {
        let products = self.storage.list_products()?;
        let categories = self.storage.list_categories()?;
        let movements = self.storage.list_movements()?;
        Ok(report::top_products(
            &products,
            &categories,
            &movements,
            self.today(),
            &self.reports,
            category,
            limit,
        ))
    }

    /// Stock value per product, optionally within one category and limited
    /// to products running low.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn valuation(
        &self,
        category: Option<&str>,
        low_stock_only: bool,
    ) -> Result<Vec<ValuationRow>> {
        let products = self.storage.list_products()?;
        let categories = self.storage.list_categories()?;
        Ok(report::valuation(
            &products,
            &categories,
            category,
            low_stock_only,
            self.alerts.low_stock_threshold,
        ))
    }

    /// Assigned products and stock value per supplier.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn supplier_report(&self) -> Result<Vec<SupplierSummary>> {
        let suppliers = self.storage.list_suppliers()?;
        let products = self.storage.list_products()?;
        let links = self.storage.supplier_links()?;
        Ok(report::supplier_report(&suppliers, &products, &links))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Days;
    use rust_decimal::Decimal;

    use crate::inventory::tests::{category_draft, inventory, product_draft, supplier_draft, today};
    use crate::inventory::Inventory;
    use crate::model::{ExpiryDraft, MovementDraft, MovementKind};
    use crate::report::{Period, Trend};
    use crate::stock::RestockUrgency;

    fn exit(inventory: &Inventory, product_id: i64, quantity: i64, days_ago: u64) {
        inventory
            .create_movement(MovementDraft {
                date: today() - Days::new(days_ago),
                kind: MovementKind::Exit,
                product_id,
                quantity,
                recorded_by: "Ana García".to_string(),
                notes: String::new(),
            })
            .unwrap();
    }

    fn stocked() -> (Inventory, i64, i64) {
        let inventory = inventory();
        let category = inventory
            .create_category(category_draft("Fertilizantes"))
            .unwrap()
            .record;

        let mut urea = product_draft("PROD001", "Urea Granulada 46%", 500);
        urea.category_id = Some(category.id);
        urea.unit_cost = Some(Decimal::new(85_000, 0));
        let urea = inventory.create_product(urea).unwrap().record.id;

        let mut kit = product_draft("PROD005", "Kit de Análisis de Suelo", 8);
        kit.min_stock = 10;
        let kit = inventory.create_product(kit).unwrap().record.id;
        (inventory, urea, kit)
    }

    #[test]
    fn test_low_stock() {
        let (inventory, _, kit) = stocked();
        let alerts = inventory.low_stock_alerts().unwrap();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].product_id, kit);
        assert_eq!(alerts[0].shortfall, 2);

        exit(&inventory, kit, 8, 0);
        let alerts = inventory.low_stock_alerts().unwrap();
        assert_eq!(alerts[0].urgency, RestockUrgency::High);

        let notices = inventory.low_stock_notices().unwrap();
        assert_eq!(notices[0].message, "Kit de Análisis de Suelo is out of stock");
    }

    #[test]
    fn test_dashboard() {
        let (inventory, urea, _) = stocked();
        inventory
            .create_supplier(supplier_draft("Fertilcol", "ventas@fertilcol.com"))
            .unwrap();
        inventory
            .create_expiry(ExpiryDraft {
                product_id: urea,
                lot: None,
                quantity: 10,
                expires_on: today() - Days::new(1),
            })
            .unwrap();

        let summary = inventory.dashboard().unwrap();
        assert_eq!(summary.total_products, 2);
        assert_eq!(summary.low_stock, 1);
        assert_eq!(summary.categories, 1);
        assert_eq!(summary.active_suppliers, 1);
        assert_eq!(summary.expired, 1);
        assert_eq!(summary.inventory_value, Decimal::new(42_500_000, 0));
    }

    #[test]
    fn test_stock_by_category_and_valuation() {
        let (inventory, _, _) = stocked();

        let groups = inventory.stock_by_category(None).unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(
            inventory.stock_by_category(Some("fertil")).unwrap().len(),
            1
        );

        let rows = inventory.valuation(Some("fertilizantes"), false).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].value, Decimal::new(42_500_000, 0));
        assert_eq!(inventory.valuation(None, false).unwrap().len(), 2);
    }

    #[test]
    fn test_movement_report_and_top_products() {
        let (inventory, urea, kit) = stocked();
        exit(&inventory, urea, 50, 2);
        exit(&inventory, kit, 3, 1);

        let report = inventory
            .movement_report(Period::Custom {
                from: today() - Days::new(6),
                to: today(),
            })
            .unwrap();
        assert_eq!(report.buckets.len(), 7);
        assert_eq!(report.total_exits, 53);
        assert_eq!(report.total_entries, 508);

        let top = inventory.top_products(None, Some(1)).unwrap();
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].product_id, urea);
        assert_eq!(top[0].trend, Trend::Rising);
    }

    #[test]
    fn test_supplier_report() {
        let (inventory, urea, _) = stocked();
        let supplier = inventory
            .create_supplier(supplier_draft("Fertilcol", "ventas@fertilcol.com"))
            .unwrap()
            .record;
        inventory.assign_supplier(urea, supplier.id).unwrap();

        let rows = inventory.supplier_report().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].assigned_products, 1);
        assert_eq!(rows[0].stock_value, Decimal::new(42_500_000, 0));
    }

    #[test]
    fn test_reconcile_after_history() {
        let (inventory, urea, _) = stocked();
        exit(&inventory, urea, 120, 3);
        assert!(inventory.reconcile().unwrap().is_empty());
        assert!(inventory.reconciliation_notices().unwrap().is_empty());
    }
}
