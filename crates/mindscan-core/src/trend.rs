//! Summaries over a window of entries.
//!
//! Feeds trend displays: the sentiment series in time order and how often
//! each emotion occurred. Rendering is left to the caller.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::storage::EntryRecord;

/// Bucket for entries stored without an emotion label.
pub const UNLABELED_EMOTION: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub created_at: NaiveDateTime,
    pub sentiment: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmotionCount {
    pub emotion: String,
    pub count: usize,
}

/// Aggregate view of a window of entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendSummary {
    pub entry_count: usize,

    /// Entries with a sentiment, in the order given
    pub points: Vec<TrendPoint>,

    /// Mean of `points`, `None` when there are none
    pub average_sentiment: Option<f64>,

    /// Most frequent first; ties broken alphabetically
    pub emotions: Vec<EmotionCount>,
}

impl TrendSummary {
    pub fn from_records(records: &[EntryRecord]) -> Self {
        let points: Vec<TrendPoint> = records
            .iter()
            .filter_map(|record| {
                record.sentiment.map(|sentiment| TrendPoint {
                    created_at: record.created_at,
                    sentiment,
                })
            })
            .collect();

        let average_sentiment = if points.is_empty() {
            None
        } else {
            let total: f64 = points.iter().map(|p| p.sentiment).sum();
            Some(total / points.len() as f64)
        };

        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for record in records {
            let label = record
                .emotion
                .as_deref()
                .filter(|label| !label.is_empty())
                .unwrap_or(UNLABELED_EMOTION);
            *counts.entry(label).or_default() += 1;
        }
        let mut emotions: Vec<EmotionCount> = counts
            .into_iter()
            .map(|(emotion, count)| EmotionCount {
                emotion: emotion.to_string(),
                count,
            })
            .collect();
        // stable sort keeps the alphabetical order from the BTreeMap on ties
        emotions.sort_by(|a, b| b.count.cmp(&a.count));

        Self {
            entry_count: records.len(),
            points,
            average_sentiment,
            emotions,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entry_count == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(hour: u32, sentiment: Option<f64>, emotion: Option<&str>) -> EntryRecord {
        EntryRecord {
            created_at: NaiveDate::from_ymd_opt(2024, 6, 1)
                .unwrap()
                .and_hms_opt(hour, 0, 0)
                .unwrap(),
            sentiment,
            emotion: emotion.map(String::from),
            text: Some("entry".to_string()),
        }
    }

    #[test]
    fn test_empty_window() {
        let summary = TrendSummary::from_records(&[]);
        assert!(summary.is_empty());
        assert!(summary.points.is_empty());
        assert_eq!(summary.average_sentiment, None);
        assert!(summary.emotions.is_empty());
    }

    #[test]
    fn test_summary_counts_and_average() {
        let records = vec![
            record(8, Some(1.0), Some("joy")),
            record(9, Some(-0.5), Some("sadness")),
            record(10, None, Some("joy")),
            record(11, Some(0.0), None),
            record(12, Some(0.5), Some("anger")),
        ];
        let summary = TrendSummary::from_records(&records);

        assert_eq!(summary.entry_count, 5);
        assert_eq!(summary.points.len(), 4);
        assert_eq!(summary.points[0].sentiment, 1.0);
        assert_eq!(summary.points[3].sentiment, 0.5);
        assert!((summary.average_sentiment.unwrap() - 0.25).abs() < 1e-12);

        let labels: Vec<(&str, usize)> = summary
            .emotions
            .iter()
            .map(|e| (e.emotion.as_str(), e.count))
            .collect();
        assert_eq!(
            labels,
            vec![("joy", 2), ("anger", 1), ("sadness", 1), ("unknown", 1)]
        );
    }
}
