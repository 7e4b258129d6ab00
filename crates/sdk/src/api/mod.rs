//! Typed groups of inventory API endpoints.

pub mod snapshots;
pub mod system;
pub mod tables;

pub use snapshots::{SnapshotInfo, SnapshotsApi};
pub use system::{OsVersion, SystemApi};
pub use tables::{Filters, Table, TableQuery, TablesApi};
