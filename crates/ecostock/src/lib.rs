//! `ecostock` - Inventory management for agricultural supply stores
//!
//! This library keeps the catalog (categories, units, products), the parties
//! the store deals with (suppliers, distributors), stock movements and
//! expiration dates. Stock only changes through recorded movements, so the
//! stored levels always agree with the movement history. On top of that it
//! raises low-stock and expiry alerts and produces inventory reports, served
//! over a REST API and a command-line interface.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod expiry;
pub mod export;
pub mod filter;
pub mod inventory;
pub mod logging;
pub mod model;
pub mod notice;
pub mod report;
pub mod seed;
pub mod stock;
pub mod storage;
pub mod validation;

pub use config::Config;
pub use error::{Error, Result};
pub use inventory::{Inventory, Saved};
pub use logging::init_logging;
pub use notice::{Notice, NoticeLevel};
pub use storage::{Storage, StorageStats};
