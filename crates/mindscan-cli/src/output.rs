//! Output formatting helpers for the CLI.

use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};

use mindscan_core::storage::EntryRecord;
use mindscan_core::trend::TrendSummary;

const TEXT_PREVIEW_CHARS: usize = 48;
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Truncate a string to max length, adding ellipsis if needed.
pub fn truncate(s: &str, max_len: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_len {
        return s.to_string();
    }
    if max_len <= 3 {
        return s.chars().take(max_len).collect();
    }
    let truncated: String = s.chars().take(max_len - 3).collect();
    format!("{}...", truncated)
}

fn format_sentiment(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:+.2}", v))
        .unwrap_or_else(|| "-".to_string())
}

/// JSON document for a trends query.
pub fn trends_json(days: u32, records: &[EntryRecord], summary: &TrendSummary) -> serde_json::Value {
    serde_json::json!({
        "days": days,
        "entries": records,
        "summary": summary,
    })
}

/// Print a trends query as tables.
///
/// Entries are listed newest first, the way a journal is read; the summary
/// keeps chronological order.
pub fn print_trends(days: u32, records: &[EntryRecord], summary: &TrendSummary, quiet: bool) {
    if summary.is_empty() {
        if !quiet {
            println!("No entries in the last {} days.", days);
        }
        return;
    }

    if !quiet {
        println!("Mood trends (last {} days)", days);
        match summary.average_sentiment {
            Some(avg) => println!("Entries: {}  Average sentiment: {:+.2}", summary.entry_count, avg),
            None => println!("Entries: {}", summary.entry_count),
        }
        println!();
    }

    let mut entries = Table::new();
    entries
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["CREATED", "SENTIMENT", "EMOTION", "TEXT"]);
    for record in records.iter().rev() {
        entries.add_row(vec![
            Cell::new(record.created_at.format(TIME_FORMAT)),
            Cell::new(format_sentiment(record.sentiment)).set_alignment(CellAlignment::Right),
            Cell::new(record.emotion.as_deref().unwrap_or("-")),
            Cell::new(truncate(
                record.text.as_deref().unwrap_or(""),
                TEXT_PREVIEW_CHARS,
            )),
        ]);
    }
    println!("{}", entries);

    if quiet {
        return;
    }

    let mut emotions = Table::new();
    emotions
        .load_preset(UTF8_FULL_CONDENSED)
        .set_header(vec!["EMOTION", "COUNT"]);
    for count in &summary.emotions {
        emotions.add_row(vec![
            Cell::new(&count.emotion),
            Cell::new(count.count).set_alignment(CellAlignment::Right),
        ]);
    }
    println!();
    println!("{}", emotions);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a longer sentence", 10), "a longe...");
        assert_eq!(truncate("ünïcödé text", 5), "ün...");
        assert_eq!(truncate("abcdef", 2), "ab");
    }

    #[test]
    fn test_format_sentiment() {
        assert_eq!(format_sentiment(Some(0.05)), "+0.05");
        assert_eq!(format_sentiment(Some(-1.0)), "-1.00");
        assert_eq!(format_sentiment(None), "-");
    }

    #[test]
    fn test_trends_json_shape() {
        let records = vec![EntryRecord {
            created_at: NaiveDate::from_ymd_opt(2024, 6, 1)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
            sentiment: Some(0.5),
            emotion: Some("joy".to_string()),
            text: Some("sunny".to_string()),
        }];
        let summary = TrendSummary::from_records(&records);
        let value = trends_json(7, &records, &summary);

        assert_eq!(value["days"], 7);
        assert_eq!(value["entries"][0]["emotion"], "joy");
        assert_eq!(value["entries"][0]["created_at"], "2024-06-01T12:00:00");
        assert_eq!(value["summary"]["entry_count"], 1);
        assert_eq!(value["summary"]["emotions"][0]["count"], 1);
    }
}
