//! JSON file store

use crate::error::StoreError;
use crate::io::atomic_write;
use crate::store::{Snapshot, VideoStore};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;
use vsense_core::VideoRecord;

/// Key the record set lives under
pub const STORAGE_KEY: &str = "virality_sense_videos";

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    revision: u64,
    #[serde(rename = "virality_sense_videos")]
    videos: &'a [VideoRecord],
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredSet {
    Envelope {
        #[serde(default)]
        revision: u64,
        #[serde(rename = "virality_sense_videos", default)]
        videos: Vec<VideoRecord>,
    },
    // Bare array as produced by an export
    Bare(Vec<VideoRecord>),
}

/// Single-file store. Writers in this process are serialized; writers in
/// other processes are caught by the revision check before the atomic rename.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Snapshot, StoreError> {
        if !self.path.exists() {
            return Ok(Snapshot::default());
        }

        let contents = std::fs::read_to_string(&self.path)?;
        if contents.trim().is_empty() {
            return Ok(Snapshot::default());
        }

        Ok(match serde_json::from_str(&contents)? {
            StoredSet::Envelope { revision, videos } => Snapshot {
                revision,
                records: videos,
            },
            StoredSet::Bare(videos) => Snapshot {
                revision: 0,
                records: videos,
            },
        })
    }
}

impl VideoStore for JsonFileStore {
    fn snapshot(&self) -> Result<Snapshot, StoreError> {
        self.read()
    }

    fn commit(&self, expected_revision: u64, records: Vec<VideoRecord>) -> Result<u64, StoreError> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| StoreError::Unavailable("file store lock poisoned".to_string()))?;

        let found = self.read()?.revision;
        if found != expected_revision {
            return Err(StoreError::Conflict {
                expected: expected_revision,
                found,
            });
        }

        let revision = expected_revision + 1;
        let json = serde_json::to_string_pretty(&EnvelopeRef {
            revision,
            videos: &records,
        })?;
        atomic_write(&self.path, json.as_bytes())?;

        debug!(path = %self.path.display(), revision, count = records.len(), "Wrote video set");
        Ok(revision)
    }
}
