//! Stock grouped by category.

use std::collections::BTreeMap;

use serde::Serialize;

use super::{category_names, category_of, round1, rounded_div};
use crate::export::CsvRow;
use crate::filter::{self, Searchable};
use crate::model::{Category, Product};

/// Stock held in one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStock {
    /// Category name, or "Uncategorized".
    pub category: String,
    /// Active products in the category.
    pub products: usize,
    /// Units in stock across those products.
    pub total_stock: i64,
    /// Share of all active stock, in percent.
    pub share_percent: f64,
    /// Average units per product.
    pub average_stock: i64,
}

impl Searchable for CategoryStock {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.category.as_str()]
    }
}

impl CsvRow for CategoryStock {
    const HEADERS: &'static [&'static str] = &[
        "Category",
        "Products",
        "Total stock",
        "Share (%)",
        "Average stock",
    ];

    fn fields(&self) -> Vec<String> {
        vec![
            self.category.clone(),
            self.products.to_string(),
            self.total_stock.to_string(),
            format!("{:.1}", self.share_percent),
            self.average_stock.to_string(),
        ]
    }
}

/// Group active products by category, largest stock first.
///
/// Shares are relative to all active stock, before `search` narrows the
/// groups by category name.
#[must_use]
pub fn stock_by_category(
    products: &[Product],
    categories: &[Category],
    search: Option<&str>,
) -> Vec<CategoryStock> {
    let names = category_names(categories);
    let mut groups: BTreeMap<&str, (usize, i64)> = BTreeMap::new();
    for product in products.iter().filter(|p| p.is_active()) {
        let group = groups.entry(category_of(product, &names)).or_default();
        group.0 += 1;
        group.1 = group.1.saturating_add(product.stock);
    }

    let total = groups
        .values()
        .fold(0_i64, |sum, (_, stock)| sum.saturating_add(*stock));
    let mut rows: Vec<CategoryStock> = groups
        .into_iter()
        .map(|(category, (count, stock))| CategoryStock {
            category: category.to_string(),
            products: count,
            total_stock: stock,
            share_percent: if total == 0 {
                0.0
            } else {
                round1(stock as f64 * 100.0 / total as f64)
            },
            average_stock: rounded_div(stock, count),
        })
        .filter(|row| filter::matches_search(row, search))
        .collect();

    rows.sort_by(|a, b| {
        b.total_stock
            .cmp(&a.total_stock)
            .then_with(|| a.category.cmp(&b.category))
    });
    rows
}
