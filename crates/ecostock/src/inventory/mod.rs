//! The inventory service.
//!
//! [`Inventory`] sits between the store and the outer surfaces. It validates
//! form drafts, checks references and uniqueness, keeps stock consistent
//! with the movement history, and reports each outcome as a [`Notice`].

mod catalog;
mod expirations;
mod movements;
mod parties;
mod products;
mod reports;
mod resource;

use chrono::{Local, NaiveDate};
use serde::Serialize;
use tracing::info;

use crate::config::{AlertConfig, Config, ReportConfig};
use crate::error::{Error, Result};
use crate::notice::Notice;
use crate::seed;
use crate::storage::{Storage, StorageStats};

pub use resource::{parse_status, NoStatus, Resource};

/// A record that was just written, with the notice describing it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Saved<T> {
    /// The record as stored.
    pub record: T,
    /// Outcome message.
    pub notice: Notice,
}

impl<T> Saved<T> {
    fn new(record: T, notice: Notice) -> Self {
        Self { record, notice }
    }
}

/// Inventory service over a [`Storage`].
#[derive(Debug)]
pub struct Inventory {
    storage: Storage,
    alerts: AlertConfig,
    reports: ReportConfig,
    today: Option<NaiveDate>,
}

impl Inventory {
    /// Wrap an opened store.
    #[must_use]
    pub fn new(storage: Storage, alerts: AlertConfig, reports: ReportConfig) -> Self {
        Self {
            storage,
            alerts,
            reports,
            today: None,
        }
    }

    /// Open the store described by `config`, loading the sample data into
    /// an empty store when enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be opened or seeded.
    pub fn open(config: &Config) -> Result<Self> {
        let storage = match &config.storage.database_path {
            Some(path) => Storage::open(path)?,
            None => Storage::open_in_memory()?,
        };
        let inventory = Self::new(storage, config.alerts, config.reports);

        if config.storage.seed_sample_data && inventory.storage.is_empty()? {
            let summary = seed::load(&inventory)?;
            info!(
                "Loaded sample data: {} products, {} movements",
                summary.products, summary.movements
            );
        }
        Ok(inventory)
    }

    /// An empty in-memory inventory with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory store cannot be created.
    pub fn in_memory() -> Result<Self> {
        Ok(Self::new(
            Storage::open_in_memory()?,
            AlertConfig::default(),
            ReportConfig::default(),
        ))
    }

    /// Pin the reference date instead of reading the clock.
    #[must_use]
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    /// The reference date for alerts, reports and movement validation.
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    /// The underlying store.
    #[must_use]
    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Alert thresholds in use.
    #[must_use]
    pub fn alert_settings(&self) -> &AlertConfig {
        &self.alerts
    }

    /// Report settings in use.
    #[must_use]
    pub fn report_settings(&self) -> &ReportConfig {
        &self.reports
    }

    /// Record counts and database size.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn stats(&self) -> Result<StorageStats> {
        self.storage.stats()
    }
}

/// Turn a missing record into a not-found error.
fn found<T>(record: Option<T>, entity: &'static str, id: i64) -> Result<T> {
    record.ok_or_else(|| Error::not_found(entity, id))
}

/// Turn a missing reference into a validation error on `field`.
fn referenced<T>(record: Option<T>, field: &'static str, entity: &str, id: i64) -> Result<T> {
    record.ok_or_else(|| Error::validation(field, format!("unknown {entity} {id}")))
}
