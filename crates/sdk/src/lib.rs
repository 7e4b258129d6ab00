//! # netreport SDK
//!
//! Async client for the network inventory API queried by netreport.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use netreport_sdk::{InventoryClient, InventoryResult, Table, TableQuery, Filters};
//!
//! #[tokio::main]
//! async fn main() -> InventoryResult<()> {
//!     let client = InventoryClient::builder()
//!         .base_url("https://ipf.example.com")
//!         .api_token("your-api-token")
//!         .build()?;
//!
//!     let snapshot = client.snapshots().resolve("$last").await?;
//!     println!("Snapshot: {}", snapshot.display_name());
//!
//!     let devices = client.tables().count(Table::Devices, &Filters::new(), None).await?;
//!     println!("{} devices", devices);
//!
//!     let ntp = client
//!         .tables()
//!         .fetch(Table::NtpSources, &TableQuery::new(["hostname", "source"]))
//!         .await?;
//!     println!("{} NTP source entries", ntp.len());
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod transport;

pub use api::{Filters, OsVersion, SnapshotInfo, Table, TableQuery};
pub use client::{InventoryClient, InventoryClientBuilder};
pub use config::{ClientConfig, RetryConfig};
pub use error::{InventoryError, InventoryResult};

// Re-export the record type rows are returned as
pub use netreport_core::Record;
