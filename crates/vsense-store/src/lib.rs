//! Storage collaborator for saved video records

mod error;
mod file;
mod io;
mod memory;
mod paths;
mod store;

pub use error::StoreError;
pub use file::{JsonFileStore, STORAGE_KEY};
pub use io::{atomic_write, read_json, write_json};
pub use memory::MemoryStore;
pub use paths::{Paths, HOME_ENV};
pub use store::{update, RemoveOutcome, SaveOutcome, Snapshot, VideoStore, MAX_COMMIT_ATTEMPTS};
