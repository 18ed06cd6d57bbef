//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::net::SocketAddr;
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Subcommand, ValueEnum};

use crate::report::{PeriodKind, ReportKind};

/// Serve command arguments.
#[derive(Debug, Args)]
pub struct ServeCommand {
    /// Address to listen on (overrides the configuration)
    #[arg(short, long, value_name = "ADDR")]
    pub listen: Option<SocketAddr>,
}

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Which records to list
    #[arg(value_enum)]
    pub resource: ResourceArg,

    /// Only show records containing this text
    #[arg(short, long)]
    pub search: Option<String>,

    /// Only show records with this status (e.g. active, exit, expired)
    #[arg(long)]
    pub status: Option<String>,

    /// Show per-status totals instead of the records
    #[arg(long)]
    pub counts: bool,

    /// Write the records to this CSV file
    #[arg(long, value_name = "FILE")]
    pub csv: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Report command arguments.
#[derive(Debug, Args)]
pub struct ReportCommand {
    /// Which report to produce
    #[arg(value_enum)]
    pub kind: ReportArg,

    /// Period for the movements report
    #[arg(long, value_enum, default_value = "weekly")]
    pub period: PeriodArg,

    /// First day of a custom period (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub from: Option<NaiveDate>,

    /// Last day of a custom period (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub to: Option<NaiveDate>,

    /// Restrict to one category by name
    #[arg(long)]
    pub category: Option<String>,

    /// Only show groups containing this text
    #[arg(short, long)]
    pub search: Option<String>,

    /// Maximum number of rows in the top products report
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// In the valuation report, only show low and empty stock
    #[arg(long)]
    pub low_stock: bool,

    /// Write the report rows to this CSV file
    #[arg(long, value_name = "FILE")]
    pub csv: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Alerts command arguments.
#[derive(Debug, Args)]
pub struct AlertsCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Record kinds that can be listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ResourceArg {
    /// Product categories
    Categories,
    /// Units of measure
    Units,
    /// Products
    Products,
    /// Suppliers
    Suppliers,
    /// Distributors
    Distributors,
    /// Stock movements
    Movements,
    /// Expiry entries
    Expirations,
}

/// Reports that can be produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportArg {
    /// Headline numbers
    Dashboard,
    /// Stock grouped by category
    StockByCategory,
    /// Entries and exits per period
    Movements,
    /// Products ranked by rotation
    TopProducts,
    /// Stock value per product
    Valuation,
    /// Products and value per supplier
    Suppliers,
    /// Recorded stock against the movement history
    Reconciliation,
}

impl From<ReportArg> for ReportKind {
    fn from(arg: ReportArg) -> Self {
        match arg {
            ReportArg::Dashboard => Self::Dashboard,
            ReportArg::StockByCategory => Self::StockByCategory,
            ReportArg::Movements => Self::Movements,
            ReportArg::TopProducts => Self::TopProducts,
            ReportArg::Valuation => Self::Valuation,
            ReportArg::Suppliers => Self::Suppliers,
            ReportArg::Reconciliation => Self::Reconciliation,
        }
    }
}

/// Period argument for the movements report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PeriodArg {
    /// One row per ISO week
    Weekly,
    /// One row per month
    Monthly,
    /// One row per day between --from and --to
    Custom,
}

impl From<PeriodArg> for PeriodKind {
    fn from(arg: PeriodArg) -> Self {
        match arg {
            PeriodArg::Weekly => Self::Weekly,
            PeriodArg::Monthly => Self::Monthly,
            PeriodArg::Custom => Self::Custom,
        }
    }
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    Plain,
    /// Formatted table
    #[default]
    Table,
    /// JSON output
    Json,
}
