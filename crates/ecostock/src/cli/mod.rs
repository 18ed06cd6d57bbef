//! Command-line interface for ecostock.
//!
//! This module provides the CLI structure for the `ecostock` binary.

mod commands;
pub mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AlertsCommand, ConfigCommand, ListCommand, OutputFormat, PeriodArg, ReportArg, ReportCommand,
    ResourceArg, ServeCommand, StatusCommand,
};

/// ecostock - Inventory for agricultural supply stores
///
/// Tracks products, suppliers, stock movements and expiration dates, raises
/// low-stock and expiry alerts, and produces inventory reports.
#[derive(Debug, Parser)]
#[command(name = "ecostock")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the REST API
    Serve(ServeCommand),

    /// List records
    List(ListCommand),

    /// Produce a report
    Report(ReportCommand),

    /// Show low-stock and expiry alerts
    Alerts(AlertsCommand),

    /// Show store status
    Status(StatusCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}
