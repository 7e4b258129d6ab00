//! System information endpoints.

use crate::client::InventoryClient;
use crate::error::InventoryResult;
use serde::{Deserialize, Serialize};

/// System API for instance-level information.
pub struct SystemApi<'a> {
    client: &'a InventoryClient,
}

impl<'a> SystemApi<'a> {
    pub(crate) fn new(client: &'a InventoryClient) -> Self {
        Self { client }
    }

    /// Get the version of the inventory platform.
    pub async fn os_version(&self) -> InventoryResult<OsVersion> {
        self.client.http.get("os/version").await
    }
}

/// Platform version response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OsVersion {
    pub version: String,
}
