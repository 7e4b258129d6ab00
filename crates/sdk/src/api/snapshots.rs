//! Snapshot endpoints.

use crate::client::InventoryClient;
use crate::error::{InventoryError, InventoryResult};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Snapshots API for listing and resolving snapshots.
pub struct SnapshotsApi<'a> {
    client: &'a InventoryClient,
}

impl<'a> SnapshotsApi<'a> {
    pub(crate) fn new(client: &'a InventoryClient) -> Self {
        Self { client }
    }

    /// List all snapshots.
    pub async fn list(&self) -> InventoryResult<Vec<SnapshotInfo>> {
        self.client.http.get("snapshots").await
    }

    /// Resolve a snapshot id or reference (`$last`, `$prev`, `$lastLocked`).
    pub async fn resolve(&self, snapshot_id: &str) -> InventoryResult<SnapshotInfo> {
        let snapshots = self.list().await?;
        let resolved = resolve_snapshot(&snapshots, snapshot_id)?;
        debug!(requested = snapshot_id, resolved = %resolved.id, "Snapshot resolved");
        Ok(resolved)
    }
}

/// Snapshot metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotInfo {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub locked: bool,
    /// Discovery end, milliseconds since the epoch
    #[serde(default)]
    pub ts_end: Option<i64>,
    #[serde(default)]
    pub total_dev_count: Option<u64>,
}

impl SnapshotInfo {
    pub fn is_loaded(&self) -> bool {
        self.state == "loaded"
    }

    /// Name for display; unnamed snapshots show their id.
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => &self.id,
        }
    }
}

/// Pick the snapshot a reference points at.
pub fn resolve_snapshot(snapshots: &[SnapshotInfo], snapshot_id: &str) -> InventoryResult<SnapshotInfo> {
    let mut loaded: Vec<&SnapshotInfo> = snapshots.iter().filter(|s| s.is_loaded()).collect();
    loaded.sort_by(|a, b| b.ts_end.unwrap_or(0).cmp(&a.ts_end.unwrap_or(0)));

    let found = match snapshot_id {
        "$last" => loaded.first().copied(),
        "$prev" => loaded.get(1).copied(),
        "$lastLocked" => loaded.iter().copied().find(|s| s.locked),
        id => snapshots.iter().find(|s| s.id == id),
    };

    found
        .cloned()
        .ok_or_else(|| InventoryError::NotFound(format!("snapshot '{}'", snapshot_id)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(id: &str, state: &str, locked: bool, ts_end: i64) -> SnapshotInfo {
        SnapshotInfo {
            id: id.to_string(),
            name: Some(format!("snap-{}", id)),
            state: state.to_string(),
            locked,
            ts_end: Some(ts_end),
            total_dev_count: None,
        }
    }

    fn sample() -> Vec<SnapshotInfo> {
        vec![
            snapshot("a", "loaded", true, 100),
            snapshot("b", "unloaded", false, 400),
            snapshot("c", "loaded", false, 300),
            snapshot("d", "loaded", false, 200),
        ]
    }

    #[test]
    fn test_resolve_last() {
        assert_eq!(resolve_snapshot(&sample(), "$last").unwrap().id, "c");
    }

    #[test]
    fn test_resolve_prev() {
        assert_eq!(resolve_snapshot(&sample(), "$prev").unwrap().id, "d");
    }

    #[test]
    fn test_resolve_last_locked() {
        assert_eq!(resolve_snapshot(&sample(), "$lastLocked").unwrap().id, "a");
    }

    #[test]
    fn test_resolve_concrete_id_even_when_unloaded() {
        assert_eq!(resolve_snapshot(&sample(), "b").unwrap().id, "b");
    }

    #[test]
    fn test_resolve_unknown() {
        assert!(matches!(
            resolve_snapshot(&sample(), "zzz"),
            Err(InventoryError::NotFound(_))
        ));
        assert!(matches!(
            resolve_snapshot(&[], "$last"),
            Err(InventoryError::NotFound(_))
        ));
    }

    #[test]
    fn test_deserialize_api_shape() {
        let json = r#"[{"id":"0f1","name":null,"state":"loaded","locked":false,"tsEnd":1700000000000,"totalDevCount":12}]"#;
        let snapshots: Vec<SnapshotInfo> = serde_json::from_str(json).unwrap();

        assert_eq!(snapshots[0].total_dev_count, Some(12));
        assert_eq!(snapshots[0].display_name(), "0f1");
        assert!(snapshots[0].is_loaded());
    }
}
