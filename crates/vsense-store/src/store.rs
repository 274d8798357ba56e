//! Storage contract consumed by the page observer
//!
//! Every record set lives under a single key and every mutation is a full
//! read-modify-write of it. Writers carry the revision they read; a commit
//! against a moved revision fails with [`StoreError::Conflict`] and the
//! mutating helpers retry from a fresh snapshot.

use crate::error::StoreError;
use tracing::{debug, warn};
use vsense_core::{Platform, VideoRecord};

/// Attempts before a contended read-modify-write gives up
pub const MAX_COMMIT_ATTEMPTS: usize = 3;

/// Records plus the revision they were read at
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub revision: u64,
    pub records: Vec<VideoRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Added,
    Exists,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,
    NotFound,
}

/// Key-value store holding the whole saved set
pub trait VideoStore: Send + Sync {
    /// Current records and revision
    fn snapshot(&self) -> Result<Snapshot, StoreError>;

    /// Replace the record set if the stored revision still equals `expected_revision`.
    /// Returns the new revision.
    fn commit(&self, expected_revision: u64, records: Vec<VideoRecord>) -> Result<u64, StoreError>;

    fn get_all(&self) -> Result<Vec<VideoRecord>, StoreError> {
        Ok(self.snapshot()?.records)
    }

    /// Replace everything, regardless of concurrent writers
    fn set_all(&self, records: Vec<VideoRecord>) -> Result<(), StoreError> {
        update(self, |current| {
            *current = records.clone();
            ((), true)
        })
    }

    fn is_saved(&self, url: &str) -> Result<bool, StoreError> {
        Ok(self.snapshot()?.records.iter().any(|r| r.url == url))
    }

    /// Add a record at the front unless its url is already present
    fn save(&self, record: VideoRecord) -> Result<SaveOutcome, StoreError> {
        update(self, |records| {
            if records.iter().any(|r| r.url == record.url) {
                (SaveOutcome::Exists, false)
            } else {
                records.insert(0, record.clone());
                (SaveOutcome::Added, true)
            }
        })
    }

    fn remove(&self, url: &str) -> Result<RemoveOutcome, StoreError> {
        update(self, |records| {
            let before = records.len();
            records.retain(|r| r.url != url);
            if records.len() < before {
                (RemoveOutcome::Removed, true)
            } else {
                (RemoveOutcome::NotFound, false)
            }
        })
    }

    fn clear_all(&self) -> Result<(), StoreError> {
        update(self, |records| {
            let changed = !records.is_empty();
            records.clear();
            ((), changed)
        })
    }

    fn by_platform(&self, platform: Platform) -> Result<Vec<VideoRecord>, StoreError> {
        Ok(self
            .get_all()?
            .into_iter()
            .filter(|r| r.platform == platform)
            .collect())
    }

    /// Pretty JSON array of every record
    fn export_json(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string_pretty(&self.get_all()?)?)
    }
}

/// Optimistic read-modify-write. `apply` returns its result and whether it changed anything;
/// unchanged sets are not written back.
pub fn update<S, T, F>(store: &S, mut apply: F) -> Result<T, StoreError>
where
    S: VideoStore + ?Sized,
    F: FnMut(&mut Vec<VideoRecord>) -> (T, bool),
{
    let mut last_conflict = None;

    for attempt in 1..=MAX_COMMIT_ATTEMPTS {
        let Snapshot {
            revision,
            mut records,
        } = store.snapshot()?;

        let (result, changed) = apply(&mut records);
        if !changed {
            return Ok(result);
        }

        match store.commit(revision, records) {
            Ok(new_revision) => {
                debug!(revision = new_revision, "Committed video set");
                return Ok(result);
            }
            Err(err @ StoreError::Conflict { .. }) => {
                debug!(attempt, "Revision moved during write, retrying");
                last_conflict = Some(err);
            }
            Err(err) => return Err(err),
        }
    }

    warn!("Giving up after {} conflicting writes", MAX_COMMIT_ATTEMPTS);
    Err(last_conflict.unwrap_or(StoreError::Unavailable(
        "write retries exhausted".to_string(),
    )))
}
