//! In-process store

use crate::error::StoreError;
use crate::store::{Snapshot, VideoStore};
use std::sync::{Mutex, MutexGuard};
use vsense_core::VideoRecord;

/// Store kept in memory; revision checks happen under one lock
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<Snapshot>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<VideoRecord>) -> Self {
        Self {
            state: Mutex::new(Snapshot {
                revision: 0,
                records,
            }),
        }
    }

    pub fn revision(&self) -> u64 {
        self.lock().map(|s| s.revision).unwrap_or_default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Snapshot>, StoreError> {
        self.state
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }
}

impl VideoStore for MemoryStore {
    fn snapshot(&self) -> Result<Snapshot, StoreError> {
        Ok(self.lock()?.clone())
    }

    fn commit(&self, expected_revision: u64, records: Vec<VideoRecord>) -> Result<u64, StoreError> {
        let mut state = self.lock()?;
        if state.revision != expected_revision {
            return Err(StoreError::Conflict {
                expected: expected_revision,
                found: state.revision,
            });
        }

        state.revision += 1;
        state.records = records;
        Ok(state.revision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{update, RemoveOutcome, SaveOutcome};
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use vsense_core::{Metrics, Platform};

    fn record(url: &str, platform: Platform) -> VideoRecord {
        VideoRecord {
            id: vsense_core::record_id(url),
            url: url.to_string(),
            platform,
            title: "t".to_string(),
            author: "a".to_string(),
            description: String::new(),
            music: String::new(),
            thumbnail: None,
            saved_at: Utc::now(),
            watch_duration: 0,
            metrics: Metrics::default(),
        }
    }

    #[test]
    fn test_save_then_duplicate() {
        let store = MemoryStore::new();
        let url = "https://www.youtube.com/watch?v=1";

        assert_eq!(
            store.save(record(url, Platform::Youtube)).unwrap(),
            SaveOutcome::Added
        );
        assert_eq!(
            store.save(record(url, Platform::Youtube)).unwrap(),
            SaveOutcome::Exists
        );
        assert_eq!(store.get_all().unwrap().len(), 1);
        assert!(store.is_saved(url).unwrap());
        // The duplicate did not write
        assert_eq!(store.revision(), 1);
    }

    #[test]
    fn test_newest_first() {
        let store = MemoryStore::new();
        store.save(record("a", Platform::Youtube)).unwrap();
        store.save(record("b", Platform::Instagram)).unwrap();

        let urls: Vec<_> = store.get_all().unwrap().into_iter().map(|r| r.url).collect();
        assert_eq!(urls, vec!["b", "a"]);
    }

    #[test]
    fn test_remove() {
        let store = MemoryStore::with_records(vec![record("a", Platform::Linkedin)]);
        assert_eq!(store.remove("a").unwrap(), RemoveOutcome::Removed);
        assert_eq!(store.remove("a").unwrap(), RemoveOutcome::NotFound);
        assert!(!store.is_saved("a").unwrap());
    }

    #[test]
    fn test_by_platform_and_clear() {
        let store = MemoryStore::new();
        store.save(record("a", Platform::Youtube)).unwrap();
        store.save(record("b", Platform::Instagram)).unwrap();
        store.save(record("c", Platform::Youtube)).unwrap();

        assert_eq!(store.by_platform(Platform::Youtube).unwrap().len(), 2);
        assert_eq!(store.by_platform(Platform::Linkedin).unwrap().len(), 0);

        store.clear_all().unwrap();
        assert!(store.get_all().unwrap().is_empty());
    }

    #[test]
    fn test_stale_commit_conflicts() {
        let store = MemoryStore::new();
        let stale = store.snapshot().unwrap();
        store.save(record("a", Platform::Youtube)).unwrap();

        let err = store.commit(stale.revision, Vec::new()).unwrap_err();
        assert!(matches!(err, StoreError::Conflict { expected: 0, found: 1 }));
        assert_eq!(store.get_all().unwrap().len(), 1);
    }

    #[test]
    fn test_update_retries_after_concurrent_writer() {
        let store = MemoryStore::new();
        let calls = AtomicUsize::new(0);

        let outcome = update(&store, |records| {
            // Another tab sneaks a write in during the first attempt
            if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                store.save(record("other-tab", Platform::Youtube)).unwrap();
            }
            records.insert(0, record("mine", Platform::Youtube));
            ("done", true)
        })
        .unwrap();

        assert_eq!(outcome, "done");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        let urls: Vec<_> = store.get_all().unwrap().into_iter().map(|r| r.url).collect();
        assert_eq!(urls, vec!["mine", "other-tab"]);
    }

    #[test]
    fn test_export_json_is_an_array() {
        let store = MemoryStore::new();
        store.save(record("a", Platform::Youtube)).unwrap();

        let exported: serde_json::Value = serde_json::from_str(&store.export_json().unwrap()).unwrap();
        assert_eq!(exported.as_array().map(|a| a.len()), Some(1));
        assert_eq!(exported[0]["url"], "a");
    }
}
