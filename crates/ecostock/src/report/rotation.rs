//! Products ranked by rotation.
//!
//! Rotation is the number of units that left stock during a trailing window
//! ending on the reference date. Each product is compared with the window
//! before it to show whether demand is rising or falling.

use std::collections::BTreeMap;

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use super::{category_names, category_of, in_category, round1};
use crate::config::ReportConfig;
use crate::export::CsvRow;
use crate::model::{Category, Movement, MovementKind, Product};

/// Direction of a product's rotation compared with the previous window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    /// More units left than in the previous window.
    Rising,
    /// Fewer units left than in the previous window.
    Falling,
    /// Same volume.
    Steady,
}

impl Trend {
    fn from_change(change_percent: f64) -> Self {
        if change_percent > 0.0 {
            Self::Rising
        } else if change_percent < 0.0 {
            Self::Falling
        } else {
            Self::Steady
        }
    }
}

/// Units that left stock in one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyRotation {
    /// Month as "YYYY-MM".
    pub month: String,
    /// Units sent out.
    pub rotation: i64,
}

/// A product ranked by rotation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopProduct {
    /// Product id.
    pub product_id: i64,
    /// Product name.
    pub name: String,
    /// Category name.
    pub category: String,
    /// Units sent out in the current window.
    pub rotation: i64,
    /// Units sent out in the previous window.
    pub previous_rotation: i64,
    /// Change against the previous window, in percent.
    pub change_percent: f64,
    /// Direction of the change.
    pub trend: Trend,
    /// Units sent out per month, oldest first.
    pub evolution: Vec<MonthlyRotation>,
}

impl CsvRow for TopProduct {
    const HEADERS: &'static [&'static str] = &[
        "Product",
        "Category",
        "Rotation",
        "Previous rotation",
        "Change (%)",
        "Trend",
    ];

    fn fields(&self) -> Vec<String> {
        let trend = match self.trend {
            Trend::Rising => "rising",
            Trend::Falling => "falling",
            Trend::Steady => "steady",
        };
        vec![
            self.name.clone(),
            self.category.clone(),
            self.rotation.to_string(),
            self.previous_rotation.to_string(),
            format!("{:.1}", self.change_percent),
            trend.to_string(),
        ]
    }
}

/// Percent change from `previous` to `current`.
///
/// Growing from nothing counts as 100%.
fn change_percent(current: i64, previous: i64) -> f64 {
    match (previous, current) {
        (0, 0) => 0.0,
        (0, _) => 100.0,
        _ => round1((current - previous) as f64 * 100.0 / previous as f64),
    }
}

/// Rank products by the units that left stock in the trailing window.
///
/// Only products with some rotation in the current window are listed.
/// `category` narrows to one category by name; `limit` defaults to the
/// configured top limit.
#[must_use]
pub fn top_products(
    products: &[Product],
    categories: &[Category],
    movements: &[Movement],
    today: NaiveDate,
    settings: &ReportConfig,
    category: Option<&str>,
    limit: Option<usize>,
) -> Vec<TopProduct> {
    let window = u64::try_from(settings.rotation_window_days.max(1)).unwrap_or(1);
    let current_start = today - Days::new(window - 1);
    let previous_start = current_start - Days::new(window);
    let months = month_starts(today, settings.evolution_months);

    let mut current: BTreeMap<i64, i64> = BTreeMap::new();
    let mut previous: BTreeMap<i64, i64> = BTreeMap::new();
    let mut monthly: BTreeMap<(i64, NaiveDate), i64> = BTreeMap::new();
    for exit in movements
        .iter()
        .filter(|m| m.kind == MovementKind::Exit && m.date <= today)
    {
        if exit.date >= current_start {
            add_to(&mut current, exit.product_id, exit.quantity);
        } else if exit.date >= previous_start {
            add_to(&mut previous, exit.product_id, exit.quantity);
        }
        if let Some(month) = exit.date.with_day(1) {
            add_to(&mut monthly, (exit.product_id, month), exit.quantity);
        }
    }

    let names = category_names(categories);
    let mut ranked: Vec<TopProduct> = products
        .iter()
        .filter(|p| in_category(p, &names, category))
        .filter_map(|p| {
            let rotation = current.get(&p.id).copied().unwrap_or(0);
            if rotation == 0 {
                return None;
            }
            let previous_rotation = previous.get(&p.id).copied().unwrap_or(0);
            let change = change_percent(rotation, previous_rotation);
            Some(TopProduct {
                product_id: p.id,
                name: p.name.clone(),
                category: category_of(p, &names).to_string(),
                rotation,
                previous_rotation,
                change_percent: change,
                trend: Trend::from_change(change),
                evolution: months
                    .iter()
                    .map(|month| MonthlyRotation {
                        month: month.format("%Y-%m").to_string(),
                        rotation: monthly.get(&(p.id, *month)).copied().unwrap_or(0),
                    })
                    .collect(),
            })
        })
        .collect();

    ranked.sort_by(|a, b| b.rotation.cmp(&a.rotation).then_with(|| a.name.cmp(&b.name)));
    ranked.truncate(limit.unwrap_or(settings.top_limit));
    ranked
}

fn add_to<K: Ord>(totals: &mut BTreeMap<K, i64>, key: K, quantity: i64) {
    let total = totals.entry(key).or_default();
    *total = total.saturating_add(quantity);
}

/// First day of each of the last `count` months, oldest first.
fn month_starts(today: NaiveDate, count: u32) -> Vec<NaiveDate> {
    let current = today.with_day(1).unwrap_or(today);
    (0..count)
        .rev()
        .filter_map(|back| current.checked_sub_months(Months::new(back)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::tests::category;
    use crate::stock::tests::{movement, product};

    fn day(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    fn exit(id: i64, product_id: i64, quantity: i64, date: NaiveDate) -> Movement {
        movement(id, product_id, MovementKind::Exit, quantity, date)
    }

    #[test]
    fn test_change_percent() {
        assert!((change_percent(150, 100) - 50.0).abs() < f64::EPSILON);
        assert!((change_percent(50, 100) + 50.0).abs() < f64::EPSILON);
        assert!((change_percent(10, 0) - 100.0).abs() < f64::EPSILON);
        assert!(change_percent(0, 0).abs() < f64::EPSILON);
        assert!((change_percent(1, 3) + 66.7).abs() < 1e-9);
    }

    #[test]
    fn test_ranks_by_current_window() {
        let today = day(6, 30);
        let settings = ReportConfig::default();
        let products = vec![
            product(1, "Urea", 100, 0),
            product(2, "Glifosato", 100, 0),
            product(3, "Pala", 100, 0),
        ];
        let movements = vec![
            exit(1, 1, 40, day(6, 20)),
            exit(2, 1, 20, day(5, 15)),
            exit(3, 2, 90, day(6, 1)),
            exit(4, 2, 100, day(5, 20)),
            exit(5, 3, 70, day(5, 10)),
            movement(6, 3, MovementKind::Entry, 500, day(6, 25)),
        ];

        let ranked = top_products(&products, &[], &movements, today, &settings, None, None);
        assert_eq!(ranked.len(), 2);

        assert_eq!(ranked[0].name, "Glifosato");
        assert_eq!(ranked[0].rotation, 90);
        assert_eq!(ranked[0].previous_rotation, 100);
        assert_eq!(ranked[0].trend, Trend::Falling);

        assert_eq!(ranked[1].name, "Urea");
        assert_eq!(ranked[1].rotation, 40);
        assert!((ranked[1].change_percent - 100.0).abs() < f64::EPSILON);
        assert_eq!(ranked[1].trend, Trend::Rising);
    }

    #[test]
    fn test_evolution_covers_configured_months() {
        let today = day(6, 30);
        let settings = ReportConfig::default();
        let products = vec![product(1, "Urea", 100, 0)];
        let movements = vec![
            exit(1, 1, 40, day(6, 20)),
            exit(2, 1, 20, day(5, 15)),
            exit(3, 1, 5, day(1, 2)),
        ];

        let ranked = top_products(&products, &[], &movements, today, &settings, None, None);
        let evolution = &ranked[0].evolution;
        assert_eq!(evolution.len(), 6);
        assert_eq!(evolution[0].month, "2024-01");
        assert_eq!(evolution[0].rotation, 5);
        assert_eq!(evolution[4].rotation, 20);
        assert_eq!(evolution[5].month, "2024-06");
        assert_eq!(evolution[5].rotation, 40);
    }

    #[test]
    fn test_category_filter_and_limit() {
        let today = day(6, 30);
        let settings = ReportConfig::default();
        let categories = vec![category(1, "Fertilizantes")];
        let mut urea = product(1, "Urea", 100, 0);
        urea.category_id = Some(1);
        let products = vec![urea, product(2, "Pala", 100, 0), product(3, "Rastrillo", 100, 0)];
        let movements = vec![
            exit(1, 1, 10, day(6, 20)),
            exit(2, 2, 30, day(6, 20)),
            exit(3, 3, 20, day(6, 20)),
        ];

        let fertilizers = top_products(
            &products,
            &categories,
            &movements,
            today,
            &settings,
            Some("Fertilizantes"),
            None,
        );
        assert_eq!(fertilizers.len(), 1);
        assert_eq!(fertilizers[0].category, "Fertilizantes");

        let top_one = top_products(&products, &categories, &movements, today, &settings, None, Some(1));
        assert_eq!(top_one.len(), 1);
        assert_eq!(top_one[0].name, "Pala");
    }
}
