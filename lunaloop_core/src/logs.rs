//! Log store: daily entries kept under a single key, one entry per date.
//!
//! Entries stay in insertion order (the order the CSV export uses). Loading
//! skips individual entries that fail to parse instead of discarding the
//! whole collection.

use crate::store::{keys, KvStore};
use crate::{LogEntry, LogPatch};
use chrono::NaiveDate;

/// All entries in store order
pub fn load_logs<S: KvStore>(store: &S) -> Vec<LogEntry> {
    let Some(raw) = store.get_raw(keys::LOGS) else {
        return Vec::new();
    };

    let values: Vec<serde_json::Value> = match serde_json::from_str(&raw) {
        Ok(values) => values,
        Err(e) => {
            tracing::warn!("Failed to parse stored logs: {}. Using empty log.", e);
            return Vec::new();
        }
    };

    let mut logs = Vec::with_capacity(values.len());
    for (index, value) in values.into_iter().enumerate() {
        match serde_json::from_value::<LogEntry>(value) {
            Ok(entry) => logs.push(entry),
            Err(e) => {
                tracing::warn!("Skipping malformed log entry {}: {}", index, e);
            }
        }
    }

    tracing::debug!("Loaded {} log entries", logs.len());
    logs
}

fn store_logs<S: KvStore>(store: &mut S, logs: &[LogEntry]) {
    store.set_value(keys::LOGS, &logs);
}

pub fn find_log<S: KvStore>(store: &S, date: NaiveDate) -> Option<LogEntry> {
    load_logs(store).into_iter().find(|l| l.date == date)
}

/// Save a full entry, replacing any existing entry for the same date
///
/// Returns `true` when the date had no entry before.
pub fn upsert_log<S: KvStore>(store: &mut S, entry: LogEntry) -> bool {
    let mut logs = load_logs(store);
    let is_new = match logs.iter_mut().find(|l| l.date == entry.date) {
        Some(existing) => {
            *existing = entry;
            false
        }
        None => {
            logs.push(entry);
            true
        }
    };
    store_logs(store, &logs);
    is_new
}

/// Merge a partial update into the entry for `date`, creating it if needed
///
/// Returns the merged entry and whether the date is new.
pub fn merge_log<S: KvStore>(store: &mut S, date: NaiveDate, patch: LogPatch) -> (LogEntry, bool) {
    let mut logs = load_logs(store);
    let (merged, is_new) = match logs.iter_mut().find(|l| l.date == date) {
        Some(existing) => {
            existing.apply(patch);
            (existing.clone(), false)
        }
        None => {
            let mut entry = LogEntry::new(date);
            entry.apply(patch);
            logs.push(entry.clone());
            (entry, true)
        }
    };
    store_logs(store, &logs);
    (merged, is_new)
}

/// Remove the entry for `date`; returns whether one existed
pub fn remove_log<S: KvStore>(store: &mut S, date: NaiveDate) -> bool {
    let mut logs = load_logs(store);
    let before = logs.len();
    logs.retain(|l| l.date != date);
    let removed = logs.len() != before;
    if removed {
        store_logs(store, &logs);
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates::parse_date;
    use crate::{FlowIntensity, MemoryStore};

    fn entry(date: &str) -> LogEntry {
        LogEntry::new(parse_date(date).unwrap())
    }

    #[test]
    fn test_empty_store_has_no_logs() {
        let store = MemoryStore::new();
        assert!(load_logs(&store).is_empty());
        assert!(find_log(&store, parse_date("2024-01-01").unwrap()).is_none());
    }

    #[test]
    fn test_upsert_replaces_same_date() {
        let mut store = MemoryStore::new();
        let mut first = entry("2024-01-01");
        first.mood = Some("Happy".into());
        assert!(upsert_log(&mut store, first));

        let mut second = entry("2024-01-01");
        second.water_intake = 3;
        assert!(!upsert_log(&mut store, second));

        let logs = load_logs(&store);
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].mood, None);
        assert_eq!(logs[0].water_intake, 3);
    }

    #[test]
    fn test_store_order_is_insertion_order() {
        let mut store = MemoryStore::new();
        upsert_log(&mut store, entry("2024-01-05"));
        upsert_log(&mut store, entry("2024-01-01"));
        upsert_log(&mut store, entry("2024-01-03"));

        let dates: Vec<String> = load_logs(&store)
            .iter()
            .map(|l| l.date.to_string())
            .collect();
        assert_eq!(dates, vec!["2024-01-05", "2024-01-01", "2024-01-03"]);
    }

    #[test]
    fn test_merge_preserves_existing_fields() {
        let mut store = MemoryStore::new();
        let mut base = entry("2024-01-01");
        base.flow = Some(FlowIntensity::Medium);
        upsert_log(&mut store, base);

        let (merged, is_new) = merge_log(
            &mut store,
            parse_date("2024-01-01").unwrap(),
            LogPatch {
                mood: Some(Some("Calm".into())),
                ..Default::default()
            },
        );
        assert!(!is_new);
        assert_eq!(merged.flow, Some(FlowIntensity::Medium));
        assert_eq!(merged.mood.as_deref(), Some("Calm"));
    }

    #[test]
    fn test_merge_creates_missing_date() {
        let mut store = MemoryStore::new();
        let (merged, is_new) = merge_log(
            &mut store,
            parse_date("2024-02-02").unwrap(),
            LogPatch {
                water_intake: Some(9),
                ..Default::default()
            },
        );
        assert!(is_new);
        assert_eq!(merged.water_intake, 9);
        assert_eq!(load_logs(&store).len(), 1);
    }

    #[test]
    fn test_remove_log() {
        let mut store = MemoryStore::new();
        upsert_log(&mut store, entry("2024-01-01"));
        assert!(remove_log(&mut store, parse_date("2024-01-01").unwrap()));
        assert!(!remove_log(&mut store, parse_date("2024-01-01").unwrap()));
        assert!(load_logs(&store).is_empty());
    }

    #[test]
    fn test_malformed_entries_are_skipped() {
        let mut store = MemoryStore::new();
        store
            .set_raw(
                keys::LOGS,
                r#"[{"date":"2024-01-01","flow":"Heavy"},{"date":"not-a-date"},{"date":"2024-01-02","flow":"Gushing"},{"date":"2024-01-03"}]"#,
            )
            .unwrap();

        let logs = load_logs(&store);
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].flow, Some(FlowIntensity::Heavy));
    }

    #[test]
    fn test_corrupted_collection_is_empty() {
        let mut store = MemoryStore::new();
        store.set_raw(keys::LOGS, "{ not an array").unwrap();
        assert!(load_logs(&store).is_empty());
    }
}
