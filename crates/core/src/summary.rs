// Snapshot summary counts and deltas between two snapshots

use crate::template::escape_html;
use serde::{Deserialize, Serialize};

/// One summary count, optionally paired with the same count in an earlier snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryMetric {
    pub key: String,
    pub label: String,
    pub current: u64,
    pub previous: Option<u64>,
}

impl SummaryMetric {
    /// Signed change since the previous snapshot
    pub fn delta(&self) -> Option<i64> {
        self.previous
            .map(|previous| self.current as i64 - previous as i64)
    }

    /// Delta formatted with an explicit sign, or "n/a" without a previous count
    pub fn delta_display(&self) -> String {
        match self.delta() {
            Some(d) if d > 0 => format!("+{}", d),
            Some(d) => d.to_string(),
            None => "n/a".to_string(),
        }
    }
}

/// Ordered collection of summary metrics for one report
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnapshotSummary {
    pub metrics: Vec<SummaryMetric>,
}

impl SnapshotSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(
        &mut self,
        key: impl Into<String>,
        label: impl Into<String>,
        current: u64,
        previous: Option<u64>,
    ) {
        self.metrics.push(SummaryMetric {
            key: key.into(),
            label: label.into(),
            current,
            previous,
        });
    }

    pub fn get(&self, key: &str) -> Option<&SummaryMetric> {
        self.metrics.iter().find(|m| m.key == key)
    }

    /// Whether any metric carries a previous count
    pub fn has_comparison(&self) -> bool {
        self.metrics.iter().any(|m| m.previous.is_some())
    }

    /// Metrics whose count changed between snapshots
    pub fn changed(&self) -> impl Iterator<Item = &SummaryMetric> {
        self.metrics
            .iter()
            .filter(|m| matches!(m.delta(), Some(d) if d != 0))
    }

    /// `<tr>` rows for the given keys, in the given order
    pub fn to_html_rows(&self, keys: &[&str]) -> String {
        let comparison = self.has_comparison();
        let mut rows = String::new();

        for metric in keys.iter().filter_map(|key| self.get(key)) {
            rows.push_str("<tr><td>");
            rows.push_str(&escape_html(&metric.label));
            rows.push_str("</td><td>");
            rows.push_str(&metric.current.to_string());
            rows.push_str("</td>");
            if comparison {
                let previous = metric
                    .previous
                    .map(|p| p.to_string())
                    .unwrap_or_else(|| "n/a".to_string());
                rows.push_str(&format!(
                    "<td>{}</td><td class=\"delta\">{}</td>",
                    previous,
                    metric.delta_display()
                ));
            }
            rows.push_str("</tr>\n");
        }

        rows
    }
}
