use std::collections::HashMap;

use serde::Serialize;

use crate::models::UsageRecord;

pub const USAGE_WINDOW_DAYS: usize = 30;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureUsage {
    pub feature: String,
    pub daily: Vec<i64>,
    pub total: i64,
}

/// Expects `records` ordered by date. Features appear in the order they
/// are first seen; `daily` keeps the most recent [`USAGE_WINDOW_DAYS`]
/// points while `total` covers every record.
pub fn feature_usage(records: &[UsageRecord]) -> Vec<FeatureUsage> {
    let mut features: Vec<FeatureUsage> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for record in records {
        let slot = *index.entry(record.feature.as_str()).or_insert_with(|| {
            features.push(FeatureUsage {
                feature: record.feature.clone(),
                daily: Vec::new(),
                total: 0,
            });
            features.len() - 1
        });

        let feature = &mut features[slot];
        feature.daily.push(record.usage_count);
        feature.total += record.usage_count;
    }

    for feature in &mut features {
        let excess = feature.daily.len().saturating_sub(USAGE_WINDOW_DAYS);
        feature.daily.drain(..excess);
    }

    features
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use uuid::Uuid;

    fn records(feature: &str, counts: impl IntoIterator<Item = i64>) -> Vec<UsageRecord> {
        let start = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        counts
            .into_iter()
            .enumerate()
            .map(|(day, usage_count)| UsageRecord {
                id: Uuid::new_v4(),
                feature: feature.to_string(),
                date: start + Duration::days(day as i64),
                usage_count,
            })
            .collect()
    }

    #[test]
    fn groups_by_feature_in_first_seen_order() {
        let mut rows = records("reports", [10, 20]);
        rows.extend(records("api", [5]));
        rows.extend(records("reports", [30]));

        let usage = feature_usage(&rows);
        assert_eq!(usage.len(), 2);
        assert_eq!(usage[0].feature, "reports");
        assert_eq!(usage[0].daily, vec![10, 20, 30]);
        assert_eq!(usage[0].total, 60);
        assert_eq!(usage[1].feature, "api");
        assert_eq!(usage[1].total, 5);
    }

    #[test]
    fn daily_series_keeps_last_thirty_points() {
        let usage = feature_usage(&records("dashboard", 1..=40));

        assert_eq!(usage[0].daily.len(), USAGE_WINDOW_DAYS);
        assert_eq!(usage[0].daily.first(), Some(&11));
        assert_eq!(usage[0].daily.last(), Some(&40));
        assert_eq!(usage[0].total, (1..=40).sum::<i64>());
    }

    #[test]
    fn no_records_no_features() {
        assert!(feature_usage(&[]).is_empty());
    }
}
