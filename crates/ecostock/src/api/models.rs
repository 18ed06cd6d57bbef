//! Request and response bodies specific to the HTTP surface.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::report::{PeriodKind, ValuationRow};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub uptime_secs: u64,
    pub today: NaiveDate,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationResponse {
    pub rows: Vec<ValuationRow>,
    pub total_value: Decimal,
}

/// Representation requested with `?format=`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    #[default]
    Json,
    Csv,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub search: Option<String>,
    pub status: Option<String>,
    #[serde(default)]
    pub format: Format,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub search: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReportParams {
    pub search: Option<String>,
    pub category: Option<String>,
    pub limit: Option<usize>,
    #[serde(default)]
    pub period: PeriodKind,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    #[serde(default, rename = "lowStock")]
    pub low_stock: bool,
    #[serde(default)]
    pub format: Format,
}
