//! Expiration dates tracked per product lot.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// An expiration date registered for a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpiryEntry {
    /// Store-assigned identifier.
    pub id: i64,
    /// Product the lot belongs to.
    pub product_id: i64,
    /// Lot identifier, e.g. "GLIFO-2024-A15".
    pub lot: Option<String>,
    /// Units in the lot.
    pub quantity: i64,
    /// Day the lot expires.
    pub expires_on: NaiveDate,
    /// Whether an alert has already been raised for this entry.
    pub notified: bool,
}

/// Form payload for an expiry entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpiryDraft {
    /// Product the lot belongs to.
    pub product_id: i64,
    /// Lot identifier.
    #[serde(default)]
    pub lot: Option<String>,
    /// Units in the lot.
    pub quantity: i64,
    /// Day the lot expires.
    pub expires_on: NaiveDate,
}
