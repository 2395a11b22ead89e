//! inventory-gather CLI - Redfish hardware inventory collector
//!
//! Gathers hardware inventory from one BMC and posts it to the inventory API.

use clap::Parser;
use inventory_gather::config::{CliArgs, CollectorConfig, LogFormat, OutputFormat};
use inventory_gather::core::Collector;
use inventory_gather::error::{InventoryError, Result};
use tracing_subscriber::EnvFilter;

fn main() {
    // Parse CLI arguments
    let args = CliArgs::parse();

    // Initialize logging; RUST_LOG wins over -v/-q
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.log_level()));
    match args.log_format {
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init(),
    }

    // Handle result
    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        if let Some(uid) = e.dangling_uid() {
            eprintln!("Envelope {} was created without a status and needs manual cleanup", uid);
        }
        std::process::exit(1);
    }
}

fn run(args: CliArgs) -> Result<()> {
    // Build configuration
    let config = CollectorConfig::from_cli(&args).map_err(InventoryError::Config)?;

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| InventoryError::config(format!("Failed to create runtime: {}", e)))?;

    rt.block_on(execute(&args, &config))
}

async fn execute(args: &CliArgs, config: &CollectorConfig) -> Result<()> {
    let collector = Collector::new(config)?;

    if args.dry_run {
        let report = collector.discover_only().await?;
        match args.output_format {
            OutputFormat::Text => {
                if !args.quiet {
                    report.print_summary();
                }
            }
            OutputFormat::Json => print_json(&report)?,
        }
        return Ok(());
    }

    let report = collector.run().await?;
    match args.output_format {
        OutputFormat::Text => {
            if !args.quiet {
                report.print_summary();
                println!("\nInventory collection and posting completed successfully.");
            }
        }
        OutputFormat::Json => print_json(&report)?,
    }
    Ok(())
}

fn print_json<T: serde::Serialize>(report: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(report)
        .map_err(|e| InventoryError::config(format!("Failed to render report: {}", e)))?;
    println!("{}", json);
    Ok(())
}
