//! `ecostock` - CLI for the ecostock inventory service
//!
//! This binary serves the REST API and gives command-line access to records,
//! alerts and reports.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::path::Path;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;

use ecostock::cli::output::render;
use ecostock::cli::{
    AlertsCommand, Cli, Command, ConfigCommand, ListCommand, OutputFormat, ReportCommand,
    ResourceArg, ServeCommand,
};
use ecostock::export::{write_csv_file, CsvRow};
use ecostock::expiry::ExpiryAlert;
use ecostock::inventory::{parse_status, Resource};
use ecostock::model::{Category, Distributor, Movement, Product, Supplier, UnitOfMeasure};
use ecostock::report::{total_value, Period, ReportKind};
use ecostock::{api, init_logging, Config, Inventory};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;

    // Execute the command
    match cli.command {
        Command::Serve(cmd) => handle_serve(&config, &cmd),
        Command::List(cmd) => handle_list(&config, &cmd),
        Command::Report(cmd) => handle_report(&config, &cmd),
        Command::Alerts(cmd) => handle_alerts(&config, &cmd),
        Command::Status(cmd) => handle_status(&config, cmd.json),
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

fn handle_serve(config: &Config, cmd: &ServeCommand) -> anyhow::Result<()> {
    let inventory = Inventory::open(config)?;
    let addr = cmd.listen.unwrap_or(config.server.listen);

    let runtime = tokio::runtime::Runtime::new().context("failed to start the async runtime")?;
    runtime.block_on(api::serve(addr, inventory, async {
        let _ = tokio::signal::ctrl_c().await;
    }))
}

fn handle_list(config: &Config, cmd: &ListCommand) -> anyhow::Result<()> {
    let inventory = Inventory::open(config)?;
    match cmd.resource {
        ResourceArg::Categories => list::<Category>(&inventory, cmd),
        ResourceArg::Units => list::<UnitOfMeasure>(&inventory, cmd),
        ResourceArg::Products => list::<Product>(&inventory, cmd),
        ResourceArg::Suppliers => list::<Supplier>(&inventory, cmd),
        ResourceArg::Distributors => list::<Distributor>(&inventory, cmd),
        ResourceArg::Movements => list::<Movement>(&inventory, cmd),
        ResourceArg::Expirations => list::<ExpiryAlert>(&inventory, cmd),
    }
}

fn list<R: Resource>(inventory: &Inventory, cmd: &ListCommand) -> anyhow::Result<()> {
    let search = cmd.search.as_deref();

    if cmd.counts {
        let counts = R::counts(inventory, search)?;
        if cmd.format == OutputFormat::Json {
            println!("{}", serde_json::to_string_pretty(&counts)?);
        } else {
            println!("{:<16}{}", "total", counts.total);
            for (status, count) in &counts.by_status {
                let name = serde_json::to_value(status)?;
                println!("{:<16}{count}", name.as_str().unwrap_or_default());
            }
        }
        return Ok(());
    }

    let status = parse_status::<R::Status>(cmd.status.as_deref())?;
    let rows = R::list(inventory, search, status)?;
    emit(&rows, cmd.csv.as_deref(), cmd.format)
}

fn handle_report(config: &Config, cmd: &ReportCommand) -> anyhow::Result<()> {
    let inventory = Inventory::open(config)?;
    let kind = ReportKind::from(cmd.kind);
    let category = cmd.category.as_deref();

    match kind {
        ReportKind::Dashboard => {
            let summary = inventory.dashboard()?;
            if cmd.format == OutputFormat::Json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("Inventory dashboard ({})", inventory.today());
                println!("--------------------------------");
                println!("Products:         {}", summary.total_products);
                println!("Active products:  {}", summary.active_products);
                println!("Low stock:        {}", summary.low_stock);
                println!("Out of stock:     {}", summary.out_of_stock);
                println!("Categories:       {}", summary.categories);
                println!("Active suppliers: {}", summary.active_suppliers);
                println!("Expiring soon:    {}", summary.expiring_soon);
                println!("Expired:          {}", summary.expired);
                println!("Inventory value:  {}", summary.inventory_value);
            }
            Ok(())
        }
        ReportKind::StockByCategory => {
            let rows = inventory.stock_by_category(cmd.search.as_deref())?;
            emit(&rows, cmd.csv.as_deref(), cmd.format)
        }
        ReportKind::Movements => {
            let period = Period::new(cmd.period.into(), cmd.from, cmd.to)?;
            let report = inventory.movement_report(period)?;
            if let Some(path) = &cmd.csv {
                write_csv_file(&report.buckets, path)?;
                println!("Wrote {} rows to {}", report.buckets.len(), path.display());
            } else if cmd.format == OutputFormat::Json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!(
                    "Movements {} ({} to {})",
                    period.as_str(),
                    report.from,
                    report.to
                );
                print!("{}", render(&report.buckets, cmd.format)?);
                println!();
                println!("Entries:     {}", report.total_entries);
                println!("Exits:       {}", report.total_exits);
                println!("Difference:  {}", report.difference);
                println!("Average:     {} movements", report.average_movements);
                if let Some(user) = &report.most_active_user {
                    println!("Most active: {} ({})", user.name, user.movements);
                }
            }
            Ok(())
        }
        ReportKind::TopProducts => {
            let rows = inventory.top_products(category, cmd.limit)?;
            emit(&rows, cmd.csv.as_deref(), cmd.format)
        }
        ReportKind::Valuation => {
            let rows = inventory.valuation(category, cmd.low_stock)?;
            emit(&rows, cmd.csv.as_deref(), cmd.format)?;
            if cmd.csv.is_none() && cmd.format != OutputFormat::Json {
                println!("Total value: {}", total_value(&rows));
            }
            Ok(())
        }
        ReportKind::Suppliers => {
            let rows = inventory.supplier_report()?;
            emit(&rows, cmd.csv.as_deref(), cmd.format)
        }
        ReportKind::Reconciliation => {
            let rows = inventory.reconcile()?;
            if rows.is_empty() && cmd.csv.is_none() && cmd.format != OutputFormat::Json {
                println!("Stock agrees with the movement history.");
                return Ok(());
            }
            emit(&rows, cmd.csv.as_deref(), cmd.format)
        }
    }
}

fn handle_alerts(config: &Config, cmd: &AlertsCommand) -> anyhow::Result<()> {
    let inventory = Inventory::open(config)?;

    if cmd.json {
        let alerts = serde_json::json!({
            "lowStock": inventory.low_stock_alerts()?,
            "expiring": inventory.expiring(None, None)?,
            "discrepancies": inventory.reconcile()?,
        });
        println!("{}", serde_json::to_string_pretty(&alerts)?);
        return Ok(());
    }

    let mut notices = inventory.low_stock_notices()?;
    notices.extend(inventory.pending_notices()?);
    notices.extend(inventory.reconciliation_notices()?);
    if notices.is_empty() {
        println!("No alerts.");
    }
    for notice in &notices {
        println!("[{:?}] {}", notice.level, notice.message);
    }
    Ok(())
}

fn handle_status(config: &Config, json: bool) -> anyhow::Result<()> {
    let inventory = Inventory::open(config)?;
    let stats = inventory.stats()?;

    if json {
        let status = serde_json::json!({
            "database": config.database_location(),
            "today": inventory.today(),
            "stats": stats,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("ecostock status");
        println!("---------------");
        println!("Database:      {}", config.database_location());
        println!("Size:          {} bytes", stats.db_size_bytes);
        println!("Categories:    {}", stats.categories);
        println!("Units:         {}", stats.units);
        println!("Products:      {}", stats.products);
        println!("Suppliers:     {}", stats.suppliers);
        println!("Distributors:  {}", stats.distributors);
        println!("Movements:     {}", stats.movements);
        println!("Expirations:   {}", stats.expirations);
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database:             {}", config.database_location());
                println!(
                    "  Seed sample data:     {}",
                    config.storage.seed_sample_data
                );
                println!();
                println!("[Server]");
                println!("  Listen:               {}", config.server.listen);
                println!();
                println!("[Alerts]");
                println!(
                    "  Low stock threshold:  {}",
                    config.alerts.low_stock_threshold
                );
                println!(
                    "  Expiry warning days:  {}",
                    config.alerts.expiry_warning_days
                );
                println!("  Critical days:        {}", config.alerts.critical_days);
                println!("  Warning days:         {}", config.alerts.warning_days);
                println!();
                println!("[Reports]");
                println!(
                    "  Rotation window days: {}",
                    config.reports.rotation_window_days
                );
                println!(
                    "  Evolution months:     {}",
                    config.reports.evolution_months
                );
                println!("  Top limit:            {}", config.reports.top_limit);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}

/// Print `rows`, or write them to `csv` when a path is given.
fn emit<T: CsvRow + Serialize>(
    rows: &[T],
    csv: Option<&Path>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    if let Some(path) = csv {
        write_csv_file(rows, path)?;
        println!("Wrote {} rows to {}", rows.len(), path.display());
    } else {
        print!("{}", render(rows, format)?);
    }
    Ok(())
}
