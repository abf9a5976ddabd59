use chrono::{Duration, Local};
use rusqlite::Connection;
use tempfile::{tempdir, TempDir};

use mindscan_core::storage::{EntryStore, NewEntry, SqliteStore, StoreOptions};

fn open_store() -> (TempDir, SqliteStore) {
    let dir = tempdir().expect("tempdir");
    let store =
        SqliteStore::open(dir.path().join("entries.db"), StoreOptions::default()).expect("open");
    (dir, store)
}

#[test]
fn test_window_excludes_old_entries() {
    let (_dir, store) = open_store();
    let now = Local::now().naive_local();

    store
        .insert_entry(&NewEntry::new(1, "recent", 0.4, "joy").with_created_at(now - Duration::days(1)))
        .expect("insert recent");
    store
        .insert_entry(&NewEntry::new(1, "stale", -0.4, "sadness").with_created_at(now - Duration::days(10)))
        .expect("insert stale");

    let records = store.fetch_entries(1, 7).expect("fetch");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].text.as_deref(), Some("recent"));

    let wider = store.fetch_entries(1, 30).expect("fetch wide");
    assert_eq!(wider.len(), 2);
}

#[test]
fn test_window_is_ascending() {
    let (_dir, store) = open_store();
    let now = Local::now().naive_local();

    for (offset_hours, text) in [(5, "middle"), (30, "oldest"), (1, "newest")] {
        store
            .insert_entry(
                &NewEntry::new(2, text, 0.0, "neutral")
                    .with_created_at(now - Duration::hours(offset_hours)),
            )
            .expect("insert");
    }

    let texts: Vec<String> = store
        .fetch_recent_entries(2)
        .expect("fetch")
        .into_iter()
        .filter_map(|r| r.text)
        .collect();
    assert_eq!(texts, vec!["oldest", "middle", "newest"]);
}

#[test]
fn test_save_entry_stamps_now_and_scopes_by_user() {
    let (_dir, store) = open_store();
    let before = Local::now().naive_local();
    store.save_entry(3, "mine", 0.3, "joy").expect("save");
    store.save_entry(4, "theirs", -0.3, "anger").expect("save");
    let after = Local::now().naive_local();

    let mine = store.fetch_entries(3, 7).expect("fetch");
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].emotion.as_deref(), Some("joy"));
    assert!(mine[0].created_at >= before - Duration::seconds(1));
    assert!(mine[0].created_at <= after);

    assert!(store.fetch_entries(99, 7).expect("fetch").is_empty());
}

#[test]
fn test_zero_day_window_is_empty_not_an_error() {
    let (_dir, store) = open_store();
    let now = Local::now().naive_local();
    store
        .insert_entry(&NewEntry::new(5, "earlier", 0.0, "neutral").with_created_at(now - Duration::minutes(5)))
        .expect("insert");

    assert!(store.fetch_entries(5, 0).expect("fetch").is_empty());
}

#[test]
fn test_window_past_the_calendar_returns_whole_history() {
    let (_dir, store) = open_store();
    let now = Local::now().naive_local();
    store
        .insert_entry(&NewEntry::new(7, "years ago", -0.2, "sadness").with_created_at(now - Duration::days(3650)))
        .expect("insert old");
    store.save_entry(7, "today", 0.6, "joy").expect("save");

    let texts: Vec<String> = store
        .fetch_entries(7, u32::MAX)
        .expect("fetch")
        .into_iter()
        .filter_map(|r| r.text)
        .collect();
    assert_eq!(texts, vec!["years ago", "today"]);
}

#[test]
fn test_out_of_range_sentiment_is_stored_verbatim() {
    let (_dir, store) = open_store();
    store.save_entry(6, "off the charts", 3.5, "ecstatic").expect("save");
    store.save_entry(6, "way down", -12.0, "").expect("save");

    let records = store.fetch_entries(6, 7).expect("fetch");
    let sentiments: Vec<Option<f64>> = records.iter().map(|r| r.sentiment).collect();
    assert_eq!(sentiments, vec![Some(3.5), Some(-12.0)]);
    assert_eq!(records[1].emotion.as_deref(), Some(""));
}

#[test]
fn test_ownerless_rows_are_never_returned() {
    let (_dir, store) = open_store();
    let recent = mindscan_core::storage::types::format_timestamp(
        &(Local::now().naive_local() - Duration::hours(2)),
    );
    {
        let conn = Connection::open(store.path()).expect("open raw");
        conn.execute(
            "INSERT INTO entries (user_id, text, sentiment, emotion, created_at) VALUES (NULL, 'legacy', 0.0, 'neutral', ?)",
            [&recent],
        )
        .expect("insert ownerless");
    }
    store.save_entry(1, "owned", 0.2, "joy").expect("save");

    for user_id in [0, 1, 2, -1] {
        let records = store.fetch_entries(user_id, 7).expect("fetch");
        assert!(records.iter().all(|r| r.text.as_deref() != Some("legacy")));
    }
    assert_eq!(store.orphaned_entry_count().expect("count"), 1);
}
