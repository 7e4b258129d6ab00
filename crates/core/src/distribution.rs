// Distribution ratios of field values across inventory records

use crate::types::{
    BucketedRatios, CategoryCount, CategoryRatio, RankedRatios, Record, OTHERS_LABEL,
};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum DistributionError {
    /// The ratio denominator is the record count, so zero records cannot be divided over.
    #[error("cannot compute distribution of '{field}' over zero records")]
    EmptyInput { field: String },
}

pub type Result<T> = std::result::Result<T, DistributionError>;

/// Count occurrences of each distinct value of `field_name`.
///
/// Values are compared by exact equality; the string `"1"` and the number `1`
/// are different categories. Records without the field are skipped. Counts
/// come back in first-seen order.
pub fn category_counts(records: &[Record], field_name: &str) -> Vec<CategoryCount> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<CategoryCount> = Vec::new();

    for value in records.iter().filter_map(|record| record.get(field_name)) {
        // Canonical JSON text keeps "1" and 1 apart
        let key = value.to_string();
        match index.get(&key) {
            Some(&i) => counts[i].count += 1,
            None => {
                index.insert(key, counts.len());
                counts.push(CategoryCount {
                    value: value.clone(),
                    count: 1,
                });
            }
        }
    }

    counts
}

/// Percentage share of each value of `field_name`, largest first.
///
/// The denominator is the total number of records, including records that
/// lack the field, so ratios sum to less than 100 when the field is sparse.
/// Equal ratios keep first-seen order.
pub fn compute_distribution(records: &[Record], field_name: &str) -> Result<RankedRatios> {
    if records.is_empty() {
        return Err(DistributionError::EmptyInput {
            field: field_name.to_string(),
        });
    }

    let total = records.len() as f64;
    let mut ratios: Vec<CategoryRatio> = category_counts(records, field_name)
        .into_iter()
        .map(|c| CategoryRatio {
            value: c.value,
            ratio: round2(c.count as f64 / total * 100.0),
        })
        .collect();

    // sort_by is stable
    ratios.sort_by(|a, b| b.ratio.total_cmp(&a.ratio));

    Ok(RankedRatios(ratios))
}

/// Merge every entry below `threshold` into one trailing "Others" entry.
///
/// Entries at or above the threshold keep their order; "Others" is appended
/// last regardless of its size.
pub fn bucket_small_categories(ratios: &RankedRatios, threshold: f64) -> BucketedRatios {
    let (small, large): (Vec<&CategoryRatio>, Vec<&CategoryRatio>) =
        ratios.iter().partition(|entry| entry.ratio < threshold);

    let mut bucketed: Vec<CategoryRatio> = large.into_iter().cloned().collect();

    if !small.is_empty() {
        let others: f64 = small.iter().map(|entry| entry.ratio).sum();
        bucketed.push(CategoryRatio::new(OTHERS_LABEL, round2(others)));
    }

    BucketedRatios(bucketed)
}

/// Round to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DEFAULT_OTHERS_THRESHOLD;
    use serde_json::{json, Value};

    fn record(field: &str, value: Value) -> Record {
        let mut r = Record::new();
        r.insert(field.to_string(), value);
        r
    }

    fn records_of(field: &str, values: &[(&str, usize)]) -> Vec<Record> {
        values
            .iter()
            .flat_map(|(v, n)| std::iter::repeat_with(move || record(field, json!(v))).take(*n))
            .collect()
    }

    #[test]
    fn test_simple_distribution() {
        let records = records_of("ip", &[("A", 2), ("B", 1)]);

        let ratios = compute_distribution(&records, "ip").unwrap();
        assert_eq!(
            ratios.pairs(),
            vec![("A".to_string(), 66.67), ("B".to_string(), 33.33)]
        );
    }

    #[test]
    fn test_empty_input_is_an_error() {
        let result = compute_distribution(&[], "ip");
        assert_eq!(
            result,
            Err(DistributionError::EmptyInput {
                field: "ip".to_string()
            })
        );
    }

    #[test]
    fn test_ratios_sum_to_100_when_field_everywhere() {
        let records = records_of("source", &[("a", 5), ("b", 3), ("c", 2), ("d", 10)]);

        let ratios = compute_distribution(&records, "source").unwrap();
        assert!((ratios.total() - 100.0).abs() <= 0.01);
    }

    #[test]
    fn test_missing_field_still_counts_in_denominator() {
        let mut records = records_of("host", &[("x", 3), ("y", 1)]);
        records.push(record("other", json!("z")));
        records.push(Record::new());

        // 4 of 6 records carry the field
        let ratios = compute_distribution(&records, "host").unwrap();
        assert!((ratios.total() - 100.0 * 4.0 / 6.0).abs() <= 0.01);
        assert_eq!(ratios.entries()[0].ratio, 50.0);
        assert_eq!(ratios.entries()[1].ratio, 16.67);
    }

    #[test]
    fn test_field_absent_everywhere_gives_empty_ratios() {
        let records = records_of("ip", &[("A", 3)]);

        let ratios = compute_distribution(&records, "collector").unwrap();
        assert!(ratios.is_empty());
    }

    #[test]
    fn test_sorted_descending() {
        let records = records_of("ip", &[("low", 1), ("high", 7), ("mid", 3), ("mid2", 3)]);

        let ratios = compute_distribution(&records, "ip").unwrap();
        for pair in ratios.entries().windows(2) {
            assert!(pair[0].ratio >= pair[1].ratio);
        }
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let records = records_of("ip", &[("b", 2), ("a", 2), ("c", 2)]);

        let ratios = compute_distribution(&records, "ip").unwrap();
        let labels: Vec<String> = ratios.iter().map(|e| e.label()).collect();
        assert_eq!(labels, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_values_compared_exactly() {
        let records = vec![
            record("dstHost", json!("1")),
            record("dstHost", json!(1)),
            record("dstHost", json!("Host")),
            record("dstHost", json!("host")),
        ];

        let counts = category_counts(&records, "dstHost");
        assert_eq!(counts.len(), 4);
        assert!(counts.iter().all(|c| c.count == 1));
    }

    #[test]
    fn test_category_counts_first_seen_order() {
        let records = records_of("protocol", &[("S", 2), ("C", 5), ("B", 1)]);

        let counts = category_counts(&records, "protocol");
        let summary: Vec<(String, u64)> = counts.iter().map(|c| (c.label(), c.count)).collect();
        assert_eq!(
            summary,
            vec![
                ("S".to_string(), 2),
                ("C".to_string(), 5),
                ("B".to_string(), 1)
            ]
        );
    }

    #[test]
    fn test_bucket_merges_small_categories() {
        let records = records_of("ip", &[("A", 95), ("B", 3), ("C", 2)]);
        let ratios = compute_distribution(&records, "ip").unwrap();

        let bucketed = bucket_small_categories(&ratios, DEFAULT_OTHERS_THRESHOLD);
        assert_eq!(
            bucketed.pairs(),
            vec![("A".to_string(), 95.0), ("Others".to_string(), 5.0)]
        );
    }

    #[test]
    fn test_bucket_without_small_entries_is_unchanged() {
        let ratios = RankedRatios(vec![
            CategoryRatio::new("A", 60.0),
            CategoryRatio::new("B", 40.0),
        ]);

        let bucketed = bucket_small_categories(&ratios, DEFAULT_OTHERS_THRESHOLD);
        assert_eq!(bucketed.entries(), ratios.entries());
    }

    #[test]
    fn test_bucket_is_idempotent_without_small_entries() {
        let ratios = RankedRatios(vec![
            CategoryRatio::new("A", 70.0),
            CategoryRatio::new("B", 20.0),
            CategoryRatio::new("C", 10.0),
        ]);

        let once = bucket_small_categories(&ratios, DEFAULT_OTHERS_THRESHOLD);
        let twice = bucket_small_categories(&RankedRatios(once.0.clone()), DEFAULT_OTHERS_THRESHOLD);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_others_appended_last_even_when_largest() {
        let ratios = RankedRatios(vec![
            CategoryRatio::new("A", 10.0),
            CategoryRatio::new("B", 4.0),
            CategoryRatio::new("C", 4.0),
            CategoryRatio::new("D", 4.0),
            CategoryRatio::new("E", 4.0),
        ]);

        let bucketed = bucket_small_categories(&ratios, DEFAULT_OTHERS_THRESHOLD);
        assert_eq!(
            bucketed.pairs(),
            vec![("A".to_string(), 10.0), ("Others".to_string(), 16.0)]
        );
    }

    #[test]
    fn test_all_small_entries_become_single_others() {
        let ratios = RankedRatios(vec![
            CategoryRatio::new("A", 1.1),
            CategoryRatio::new("B", 2.2),
        ]);

        let bucketed = bucket_small_categories(&ratios, DEFAULT_OTHERS_THRESHOLD);
        assert_eq!(bucketed.pairs(), vec![("Others".to_string(), 3.3)]);
    }

    #[test]
    fn test_bucket_empty_input() {
        let bucketed = bucket_small_categories(&RankedRatios::default(), DEFAULT_OTHERS_THRESHOLD);
        assert!(bucketed.is_empty());
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let ratios = RankedRatios(vec![
            CategoryRatio::new("A", 95.0),
            CategoryRatio::new("B", 5.0),
        ]);

        let bucketed = bucket_small_categories(&ratios, 5.0);
        assert_eq!(bucketed.entries(), ratios.entries());
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(66.666_666), 66.67);
        assert_eq!(round2(33.333_333), 33.33);
        assert_eq!(round2(0.1 + 0.2), 0.3);
    }
}
