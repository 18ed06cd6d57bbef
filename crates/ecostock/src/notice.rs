//! User-facing notifications.
//!
//! A [`Notice`] is the outcome message of an operation or an alert raised by
//! the inventory. Notices are returned to the caller and logged.

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::expiry::ExpiryAlert;
use crate::stock::{LowStockItem, RestockUrgency, StockDiscrepancy};

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    /// An operation completed.
    Success,
    /// Informational.
    Info,
    /// Something needs attention.
    Warning,
    /// An operation failed.
    Error,
}

/// A notification for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    /// Severity.
    pub level: NoticeLevel,
    /// Text shown to the user.
    pub message: String,
}

impl Notice {
    /// Create a notice and log it.
    #[must_use]
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        let notice = Self {
            level,
            message: message.into(),
        };
        notice.log();
        notice
    }

    /// An operation completed.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, message)
    }

    /// Something needs attention.
    #[must_use]
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, message)
    }

    /// An operation failed.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, message)
    }

    /// Alert for a product that is running out.
    #[must_use]
    pub fn low_stock(item: &LowStockItem) -> Self {
        let message = match item.urgency {
            RestockUrgency::High => format!("{} is out of stock", item.name),
            RestockUrgency::Medium => format!(
                "{} is low on stock ({} left, minimum {})",
                item.name, item.stock, item.threshold
            ),
        };
        Self::warning(message)
    }

    /// Alert for a product whose stock disagrees with its movement history.
    #[must_use]
    pub fn discrepancy(item: &StockDiscrepancy) -> Self {
        Self::error(format!(
            "{} has {} in stock but its movements add up to {}",
            item.name, item.recorded, item.from_movements
        ))
    }

    /// Alert for a lot that is expiring or has expired.
    #[must_use]
    pub fn expiry(alert: &ExpiryAlert) -> Self {
        Self::warning(alert.message())
    }

    fn log(&self) {
        match self.level {
            NoticeLevel::Success | NoticeLevel::Info => info!("{}", self.message),
            NoticeLevel::Warning => warn!("{}", self.message),
            NoticeLevel::Error => error!("{}", self.message),
        }
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self.level {
            NoticeLevel::Success => "ok",
            NoticeLevel::Info => "info",
            NoticeLevel::Warning => "warning",
            NoticeLevel::Error => "error",
        };
        write!(f, "[{tag}] {}", self.message)
    }
}
