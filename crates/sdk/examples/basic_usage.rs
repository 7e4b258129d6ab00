//! Basic SDK usage example.
//!
//! Connects to an inventory server, resolves the latest snapshot and prints
//! a few counts and the NTP source distribution.
//!
//! Run with: IPF_URL=... IPF_TOKEN=... cargo run --example basic_usage

use netreport_core::distribution::compute_distribution;
use netreport_sdk::{Filters, InventoryClient, InventoryResult, Table, TableQuery};
use std::time::Duration;

#[tokio::main]
async fn main() -> InventoryResult<()> {
    // Initialize tracing for debug output
    tracing_subscriber::fmt::init();

    let client = InventoryClient::builder()
        .base_url(std::env::var("IPF_URL").unwrap_or_default())
        .api_token(std::env::var("IPF_TOKEN").unwrap_or_default())
        .timeout(Duration::from_secs(15))
        .build()?;

    let version = client.system().os_version().await?;
    println!("Platform version: {}", version.version);

    let snapshot = client.snapshots().resolve("$last").await?;
    println!("Snapshot: {} ({})", snapshot.display_name(), snapshot.id);

    let devices = client
        .tables()
        .count(Table::Devices, &Filters::new(), Some(&snapshot.id))
        .await?;
    let sites = client
        .tables()
        .count(Table::Sites, &Filters::new(), Some(&snapshot.id))
        .await?;
    println!("{} devices across {} sites", devices, sites);

    let ntp = client
        .tables()
        .fetch(
            Table::NtpSources,
            &TableQuery::new(["hostname", "source"]).snapshot(snapshot.id.clone()),
        )
        .await?;

    match compute_distribution(&ntp, "source") {
        Ok(ratios) => {
            println!("\nNTP sources:");
            for entry in ratios.iter() {
                println!("  {:<30} {:>6.2}%", entry.label(), entry.ratio);
            }
        }
        Err(e) => println!("\nNTP sources: {}", e),
    }

    Ok(())
}
