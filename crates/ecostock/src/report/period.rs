//! Entries and exits per period.

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use super::rounded_div;
use crate::error::{Error, Result};
use crate::export::{opt_text, CsvRow};
use crate::model::{Movement, MovementKind};

/// ISO weeks shown by the weekly report, current week included.
const WEEKS_SHOWN: u64 = 8;

/// Months shown by the monthly report, current month included.
const MONTHS_SHOWN: u32 = 12;

/// Longest custom range, in days.
const MAX_CUSTOM_DAYS: i64 = 366;

/// Products listed in the report totals.
const TOP_PRODUCTS: usize = 5;

/// Granularity requested for the movements report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodKind {
    /// One bucket per ISO week.
    #[default]
    Weekly,
    /// One bucket per calendar month.
    Monthly,
    /// One bucket per day of an explicit range.
    Custom,
}

impl FromStr for PeriodKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "weekly" | "semanal" => Ok(Self::Weekly),
            "monthly" | "mensual" => Ok(Self::Monthly),
            "custom" | "personalizado" => Ok(Self::Custom),
            other => Err(Error::validation(
                "period",
                format!("unknown period '{other}'"),
            )),
        }
    }
}

/// Time span covered by the movements report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Period {
    /// The last few ISO weeks.
    Weekly,
    /// The last few calendar months.
    Monthly,
    /// An inclusive date range.
    Custom {
        /// First day.
        from: NaiveDate,
        /// Last day.
        to: NaiveDate,
    },
}

impl Period {
    /// Build a period from its kind and optional range bounds.
    ///
    /// # Errors
    ///
    /// Returns a validation error when a custom range is missing a bound,
    /// runs backwards, or spans more than a year.
    pub fn new(kind: PeriodKind, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<Self> {
        match kind {
            PeriodKind::Weekly => Ok(Self::Weekly),
            PeriodKind::Monthly => Ok(Self::Monthly),
            PeriodKind::Custom => {
                let from = from.ok_or_else(|| Error::validation("from", "is required"))?;
                let to = to.ok_or_else(|| Error::validation("to", "is required"))?;
                if from > to {
                    return Err(Error::validation("from", "must not be after the end date"));
                }
                if (to - from).num_days() >= MAX_CUSTOM_DAYS {
                    return Err(Error::validation(
                        "to",
                        format!("range cannot exceed {MAX_CUSTOM_DAYS} days"),
                    ));
                }
                Ok(Self::Custom { from, to })
            }
        }
    }

    /// Name used in exported file names.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Custom { .. } => "custom",
        }
    }

    /// Empty buckets covering the period as of `today`.
    fn buckets(self, today: NaiveDate) -> Vec<PeriodBucket> {
        match self {
            Self::Weekly => {
                let monday = today - Days::new(u64::from(today.weekday().num_days_from_monday()));
                let first = monday - Days::new(7 * (WEEKS_SHOWN - 1));
                (0..WEEKS_SHOWN)
                    .map(|i| {
                        let start = first + Days::new(7 * i);
                        let week = start.iso_week();
                        PeriodBucket::new(
                            format!("{}-W{:02}", week.year(), week.week()),
                            start,
                            (start + Days::new(6)).min(today),
                        )
                    })
                    .collect()
            }
            Self::Monthly => {
                let current = today.with_day(1).unwrap_or(today);
                (0..MONTHS_SHOWN)
                    .rev()
                    .filter_map(|back| current.checked_sub_months(Months::new(back)))
                    .map(|start| {
                        let end = start
                            .checked_add_months(Months::new(1))
                            .and_then(|next| next.pred_opt())
                            .unwrap_or(start);
                        PeriodBucket::new(start.format("%Y-%m").to_string(), start, end.min(today))
                    })
                    .collect()
            }
            Self::Custom { from, to } => from
                .iter_days()
                .take_while(|day| *day <= to)
                .map(|day| PeriodBucket::new(day.to_string(), day, day))
                .collect(),
        }
    }
}

/// Movement totals for one bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodBucket {
    /// Week ("2024-W23"), month ("2024-06") or day.
    pub label: String,
    /// First day of the bucket.
    pub start: NaiveDate,
    /// Last day of the bucket.
    pub end: NaiveDate,
    /// Units received.
    pub entries: i64,
    /// Units sent out.
    pub exits: i64,
    /// `entries - exits`.
    pub difference: i64,
    /// Movements recorded.
    pub movements: usize,
    /// Person who recorded most movements.
    pub most_active_user: Option<String>,
    /// Products received, by name.
    pub entry_products: Vec<String>,
    /// Products sent out, by name.
    pub exit_products: Vec<String>,
}

impl PeriodBucket {
    fn new(label: String, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            label,
            start,
            end,
            entries: 0,
            exits: 0,
            difference: 0,
            movements: 0,
            most_active_user: None,
            entry_products: Vec::new(),
            exit_products: Vec::new(),
        }
    }

    fn fill(&mut self, movements: &[&Movement]) {
        for movement in movements {
            let names = match movement.kind {
                MovementKind::Entry => {
                    self.entries = self.entries.saturating_add(movement.quantity);
                    &mut self.entry_products
                }
                MovementKind::Exit => {
                    self.exits = self.exits.saturating_add(movement.quantity);
                    &mut self.exit_products
                }
            };
            if !names.contains(&movement.product_name) {
                names.push(movement.product_name.clone());
            }
        }
        self.entry_products.sort();
        self.exit_products.sort();
        self.difference = self.entries - self.exits;
        self.movements = movements.len();
        self.most_active_user = most_active(movements.iter().copied()).map(|u| u.name);
    }
}

impl CsvRow for PeriodBucket {
    const HEADERS: &'static [&'static str] = &[
        "Period",
        "Entries",
        "Exits",
        "Difference",
        "Most active user",
        "Total movements",
    ];

    fn fields(&self) -> Vec<String> {
        vec![
            self.label.clone(),
            self.entries.to_string(),
            self.exits.to_string(),
            self.difference.to_string(),
            opt_text(self.most_active_user.as_deref()),
            self.movements.to_string(),
        ]
    }
}

/// A person and how many movements they recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserActivity {
    /// Name as written on the movements.
    pub name: String,
    /// Movements recorded.
    pub movements: usize,
}

/// A product and how much of it moved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductActivity {
    /// Product id.
    pub product_id: i64,
    /// Product name.
    pub name: String,
    /// Units moved in either direction.
    pub quantity: i64,
    /// Movements recorded.
    pub movements: usize,
}

/// Movements report for a period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovementReport {
    /// Requested period.
    pub period: Period,
    /// First day covered.
    pub from: NaiveDate,
    /// Last day covered.
    pub to: NaiveDate,
    /// One entry per week, month or day, oldest first.
    pub buckets: Vec<PeriodBucket>,
    /// Units received.
    pub total_entries: i64,
    /// Units sent out.
    pub total_exits: i64,
    /// `total_entries - total_exits`.
    pub difference: i64,
    /// Movements per bucket, rounded.
    pub average_movements: i64,
    /// Person who recorded most movements over the whole period.
    pub most_active_user: Option<UserActivity>,
    /// Products with the most units moved.
    pub top_products: Vec<ProductActivity>,
}

/// Aggregate `movements` over `period` as of `today`.
#[must_use]
pub fn movements_by_period(movements: &[Movement], period: Period, today: NaiveDate) -> MovementReport {
    let mut buckets = period.buckets(today);
    let from = buckets.first().map_or(today, |b| b.start);
    let to = buckets.last().map_or(today, |b| b.end);

    let in_range: Vec<&Movement> = movements
        .iter()
        .filter(|m| m.date >= from && m.date <= to)
        .collect();

    let mut grouped: Vec<Vec<&Movement>> = vec![Vec::new(); buckets.len()];
    for movement in in_range.iter().copied() {
        let index = buckets.partition_point(|b| b.start <= movement.date);
        if let Some(slot) = index.checked_sub(1).and_then(|i| grouped.get_mut(i)) {
            slot.push(movement);
        }
    }
    for (bucket, group) in buckets.iter_mut().zip(&grouped) {
        bucket.fill(group);
    }

    let total_entries = buckets.iter().fold(0_i64, |sum, b| sum.saturating_add(b.entries));
    let total_exits = buckets.iter().fold(0_i64, |sum, b| sum.saturating_add(b.exits));
    let total_movements: usize = buckets.iter().map(|b| b.movements).sum();

    MovementReport {
        period,
        from,
        to,
        average_movements: rounded_div(
            i64::try_from(total_movements).unwrap_or(i64::MAX),
            buckets.len(),
        ),
        buckets,
        total_entries,
        total_exits,
        difference: total_entries - total_exits,
        most_active_user: most_active(in_range.iter().copied()),
        top_products: busiest_products(&in_range),
    }
}

fn most_active<'a>(movements: impl Iterator<Item = &'a Movement>) -> Option<UserActivity> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for movement in movements {
        *counts.entry(movement.recorded_by.as_str()).or_default() += 1;
    }
    // Ties go to the name that sorts first.
    counts
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(&a.0)))
        .map(|(name, movements)| UserActivity {
            name: name.to_string(),
            movements,
        })
}

fn busiest_products(movements: &[&Movement]) -> Vec<ProductActivity> {
    let mut by_product: BTreeMap<i64, ProductActivity> = BTreeMap::new();
    for movement in movements {
        let activity = by_product
            .entry(movement.product_id)
            .or_insert_with(|| ProductActivity {
                product_id: movement.product_id,
                name: movement.product_name.clone(),
                quantity: 0,
                movements: 0,
            });
        activity.quantity = activity.quantity.saturating_add(movement.quantity);
        activity.movements += 1;
    }

    let mut products: Vec<ProductActivity> = by_product.into_values().collect();
    products.sort_by(|a, b| b.quantity.cmp(&a.quantity).then_with(|| a.name.cmp(&b.name)));
    products.truncate(TOP_PRODUCTS);
    products
}
