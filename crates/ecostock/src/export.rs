//! CSV export of reports and record lists.
//!
//! Every exportable row type implements [`CsvRow`]. Output is a header row
//! followed by one row per record; the `csv` writer quotes values as needed.

use std::io::Write;
use std::path::Path;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::info;

use crate::error::{Error, Result};
use crate::expiry::ExpiryAlert;
use crate::model::{Category, Distributor, Movement, Product, Supplier, UnitOfMeasure};
use crate::stock::{LowStockItem, StockDiscrepancy, StockLevel};

/// A record that can be written as a CSV row.
pub trait CsvRow {
    /// Column titles, in order.
    const HEADERS: &'static [&'static str];

    /// Cell values, in the same order as [`CsvRow::HEADERS`].
    fn fields(&self) -> Vec<String>;
}

/// Write `rows` as CSV to `writer`.
///
/// # Errors
///
/// Returns an error if encoding or writing fails.
pub fn write_csv<T: CsvRow, W: Write>(rows: &[T], writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(T::HEADERS)?;
    for row in rows {
        csv.write_record(row.fields())?;
    }
    csv.flush()?;
    Ok(())
}

/// Render `rows` as a CSV string.
///
/// # Errors
///
/// Returns an error if encoding fails.
pub fn to_csv_string<T: CsvRow>(rows: &[T]) -> Result<String> {
    let mut buffer = Vec::new();
    write_csv(rows, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| Error::internal(format!("CSV output is not UTF-8: {e}")))
}

/// Write `rows` as CSV to the file at `path`, replacing it.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn write_csv_file<T: CsvRow>(rows: &[T], path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_csv(rows, std::io::BufWriter::new(file))?;
    info!("Exported {} rows to {}", rows.len(), path.display());
    Ok(())
}

/// File name for an export made on `today`: `<prefix>_<YYYY-MM-DD>.csv`.
#[must_use]
pub fn export_file_name(prefix: &str, today: NaiveDate) -> String {
    format!("{prefix}_{}.csv", today.format("%Y-%m-%d"))
}

pub(crate) fn opt_text(value: Option<&str>) -> String {
    value.unwrap_or_default().to_string()
}

pub(crate) fn opt_decimal(value: Option<Decimal>) -> String {
    value.map(|d| d.to_string()).unwrap_or_default()
}

impl CsvRow for Category {
    const HEADERS: &'static [&'static str] = &[
        "ID",
        "Name",
        "Description",
        "Kind",
        "Shelf life",
        "Presentation",
    ];

    fn fields(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.description.clone(),
            self.kind.clone(),
            self.shelf_life.clone(),
            self.presentation.clone(),
        ]
    }
}

impl CsvRow for UnitOfMeasure {
    const HEADERS: &'static [&'static str] = &["ID", "Name", "Abbreviation", "Description"];

    fn fields(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.abbreviation.clone(),
            opt_text(self.description.as_deref()),
        ]
    }
}

impl CsvRow for Product {
    const HEADERS: &'static [&'static str] = &[
        "ID",
        "Code",
        "Name",
        "Description",
        "Lot",
        "Stock",
        "Min stock",
        "Unit cost",
        "Unit price",
        "Status",
        "Updated",
    ];

    fn fields(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.code.clone(),
            self.name.clone(),
            self.description.clone(),
            opt_text(self.lot.as_deref()),
            self.stock.to_string(),
            self.min_stock.to_string(),
            opt_decimal(self.unit_cost),
            opt_decimal(self.unit_price),
            self.status.to_string(),
            self.updated_at.format("%Y-%m-%d %H:%M").to_string(),
        ]
    }
}

impl CsvRow for Supplier {
    const HEADERS: &'static [&'static str] =
        &["ID", "Kind", "Name", "Phone", "Email", "Address", "Status"];

    fn fields(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            opt_text(self.kind.as_deref()),
            self.name.clone(),
            self.phone.clone(),
            self.email.clone(),
            self.address.clone(),
            self.activity().to_string(),
        ]
    }
}

impl CsvRow for Distributor {
    const HEADERS: &'static [&'static str] = &[
        "ID",
        "Supplier ID",
        "Name",
        "Phone",
        "Email",
        "Address",
        "Delivery route",
        "Status",
    ];

    fn fields(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.supplier_id.map(|id| id.to_string()).unwrap_or_default(),
            self.name.clone(),
            self.phone.clone(),
            self.email.clone(),
            self.address.clone(),
            opt_text(self.delivery_route.as_deref()),
            self.activity().to_string(),
        ]
    }
}

impl CsvRow for Movement {
    const HEADERS: &'static [&'static str] = &[
        "ID",
        "Date",
        "Kind",
        "Product",
        "Quantity",
        "Recorded by",
        "Notes",
    ];

    fn fields(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.date.to_string(),
            self.kind.to_string(),
            self.product_name.clone(),
            self.quantity.to_string(),
            self.recorded_by.clone(),
            self.notes.clone(),
        ]
    }
}

impl CsvRow for ExpiryAlert {
    const HEADERS: &'static [&'static str] = &[
        "ID",
        "Product",
        "Lot",
        "Quantity",
        "Expires on",
        "Days remaining",
        "Status",
        "Suppliers",
    ];

    fn fields(&self) -> Vec<String> {
        vec![
            self.entry.id.to_string(),
            self.product_name.clone(),
            opt_text(self.entry.lot.as_deref()),
            self.entry.quantity.to_string(),
            self.entry.expires_on.to_string(),
            self.days_remaining.to_string(),
            self.description.clone(),
            self.suppliers.join("; "),
        ]
    }
}

impl CsvRow for LowStockItem {
    const HEADERS: &'static [&'static str] = &[
        "Code",
        "Product",
        "Stock",
        "Minimum",
        "Shortfall",
        "Level",
    ];

    fn fields(&self) -> Vec<String> {
        vec![
            self.code.clone(),
            self.name.clone(),
            self.stock.to_string(),
            self.threshold.to_string(),
            self.shortfall.to_string(),
            StockLevel::classify(self.stock, self.threshold).to_string(),
        ]
    }
}

impl CsvRow for StockDiscrepancy {
    const HEADERS: &'static [&'static str] = &[
        "Code",
        "Product",
        "Recorded stock",
        "Stock from movements",
        "Difference",
    ];

    fn fields(&self) -> Vec<String> {
        vec![
            self.code.clone(),
            self.name.clone(),
            self.recorded.to_string(),
            self.from_movements.to_string(),
            self.difference.to_string(),
        ]
    }
}
