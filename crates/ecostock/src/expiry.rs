//! Expiration status and alerts.
//!
//! An entry's status is derived from the whole days left until it expires:
//! negative means expired, anything up to the warning window is expiring
//! soon, the rest is valid. Urgency picks the badge colour shown next to it.

use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::AlertConfig;
use crate::error::Error;
use crate::filter::{self, Searchable};
use crate::model::ExpiryEntry;

/// Where an entry stands relative to its expiration date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpiryStatus {
    /// Expires after the warning window.
    Valid,
    /// Expires within the warning window.
    ExpiringSoon,
    /// Already past its date.
    Expired,
}

impl ExpiryStatus {
    /// Classify `days_remaining` against the warning window.
    #[must_use]
    pub fn classify(days_remaining: i64, warning_days: i64) -> Self {
        if days_remaining < 0 {
            Self::Expired
        } else if days_remaining <= warning_days {
            Self::ExpiringSoon
        } else {
            Self::Valid
        }
    }

    /// Whether this status should raise an alert.
    #[must_use]
    pub fn needs_attention(self) -> bool {
        self != Self::Valid
    }
}

impl FromStr for ExpiryStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "valid" | "vigente" => Ok(Self::Valid),
            "expiring_soon" | "expiring" | "proximo" => Ok(Self::ExpiringSoon),
            "expired" | "vencido" => Ok(Self::Expired),
            other => Err(Error::validation(
                "status",
                format!("unknown expiry status '{other}'"),
            )),
        }
    }
}

/// Badge colour for an expiry alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    /// Green.
    Normal,
    /// Yellow.
    Warning,
    /// Red.
    Critical,
}

impl Urgency {
    /// Classify `days_remaining` against the critical and warning thresholds.
    #[must_use]
    pub fn classify(days_remaining: i64, alerts: &AlertConfig) -> Self {
        if days_remaining <= alerts.critical_days {
            Self::Critical
        } else if days_remaining <= alerts.warning_days {
            Self::Warning
        } else {
            Self::Normal
        }
    }
}

/// Whole days from `today` until `expires_on`. Negative once expired.
#[must_use]
pub fn days_remaining(expires_on: NaiveDate, today: NaiveDate) -> i64 {
    (expires_on - today).num_days()
}

/// Human description of the days left.
#[must_use]
pub fn describe(days_remaining: i64) -> String {
    match days_remaining {
        0 => "expires today".to_string(),
        1 => "expires in 1 day".to_string(),
        -1 => "expired 1 day ago".to_string(),
        d if d > 0 => format!("expires in {d} days"),
        d => format!("expired {} days ago", -d),
    }
}

/// An expiry entry with its derived status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpiryAlert {
    /// The stored entry.
    #[serde(flatten)]
    pub entry: ExpiryEntry,
    /// Name of the product.
    pub product_name: String,
    /// Names of the product's suppliers.
    pub suppliers: Vec<String>,
    /// Whole days until expiry.
    pub days_remaining: i64,
    /// Derived status.
    pub status: ExpiryStatus,
    /// Badge colour.
    pub urgency: Urgency,
    /// Human description of the days left.
    pub description: String,
}

impl ExpiryAlert {
    /// Derive the alert view of an entry as of `today`.
    #[must_use]
    pub fn build(
        entry: ExpiryEntry,
        product_name: String,
        suppliers: Vec<String>,
        today: NaiveDate,
        alerts: &AlertConfig,
    ) -> Self {
        let days = days_remaining(entry.expires_on, today);
        Self {
            entry,
            product_name,
            suppliers,
            days_remaining: days,
            status: ExpiryStatus::classify(days, alerts.expiry_warning_days),
            urgency: Urgency::classify(days, alerts),
            description: describe(days),
        }
    }

    /// Message shown when the alert is raised.
    #[must_use]
    pub fn message(&self) -> String {
        match &self.entry.lot {
            Some(lot) => format!("{} (lot {lot}) {}", self.product_name, self.description),
            None => format!("{} {}", self.product_name, self.description),
        }
    }
}

impl Searchable for ExpiryAlert {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.product_name.as_str()];
        fields.extend(self.entry.lot.as_deref());
        fields.extend(self.suppliers.iter().map(String::as_str));
        fields
    }
}

/// Entries that need attention, soonest first.
///
/// Only expiring and expired entries are kept; `status` narrows to one of
/// them and `term` searches product, lot and supplier names.
#[must_use]
pub fn upcoming(
    alerts: Vec<ExpiryAlert>,
    status: Option<ExpiryStatus>,
    term: Option<&str>,
) -> Vec<ExpiryAlert> {
    let mut found: Vec<ExpiryAlert> = filter::apply(alerts, term, status, |a| Some(a.status))
        .into_iter()
        .filter(|a| a.status.needs_attention())
        .collect();
    found.sort_by_key(|a| (a.days_remaining, a.entry.id));
    found
}
