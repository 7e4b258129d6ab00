use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One row returned by an inventory table query.
///
/// Field order follows the API response.
pub type Record = serde_json::Map<String, Value>;

/// Label used for the merged entry of small categories
pub const OTHERS_LABEL: &str = "Others";

/// Ratio below which a category is merged into "Others"
pub const DEFAULT_OTHERS_THRESHOLD: f64 = 5.0;

/// Render a scalar field value as a display label
pub fn value_label(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

/// Occurrence count of one category value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub value: Value,
    pub count: u64,
}

impl CategoryCount {
    pub fn label(&self) -> String {
        value_label(&self.value)
    }
}

/// Percentage share of one category value, rounded to 2 decimals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRatio {
    pub value: Value,
    pub ratio: f64,
}

impl CategoryRatio {
    pub fn new(value: impl Into<Value>, ratio: f64) -> Self {
        Self {
            value: value.into(),
            ratio,
        }
    }

    pub fn label(&self) -> String {
        value_label(&self.value)
    }
}

/// Category ratios sorted by ratio, largest first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RankedRatios(pub Vec<CategoryRatio>);

/// Ranked ratios with small categories merged into a trailing "Others" entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BucketedRatios(pub Vec<CategoryRatio>);

macro_rules! ratio_sequence {
    ($name:ident) => {
        impl $name {
            pub fn entries(&self) -> &[CategoryRatio] {
                &self.0
            }

            pub fn len(&self) -> usize {
                self.0.len()
            }

            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }

            pub fn iter(&self) -> std::slice::Iter<'_, CategoryRatio> {
                self.0.iter()
            }

            /// Sum of all ratios
            pub fn total(&self) -> f64 {
                self.0.iter().map(|entry| entry.ratio).sum()
            }

            /// (label, ratio) pairs in sequence order
            pub fn pairs(&self) -> Vec<(String, f64)> {
                self.0.iter().map(|e| (e.label(), e.ratio)).collect()
            }
        }

        impl<'a> IntoIterator for &'a $name {
            type Item = &'a CategoryRatio;
            type IntoIter = std::slice::Iter<'a, CategoryRatio>;

            fn into_iter(self) -> Self::IntoIter {
                self.0.iter()
            }
        }
    };
}

ratio_sequence!(RankedRatios);
ratio_sequence!(BucketedRatios);
