use super::open_store;
use std::path::Path;
use tracing::info;
use vsense_core::VideoRecord;
use vsense_store::{read_json, update, VideoStore};

/// Merge exported records into the store; urls already present are skipped
pub fn import_records(store: &dyn VideoStore, incoming: Vec<VideoRecord>) -> anyhow::Result<usize> {
    let added = update(store, |records| {
        let mut added = 0;
        for record in &incoming {
            if !records.iter().any(|r| r.url == record.url) {
                records.push(record.clone());
                added += 1;
            }
        }
        (added, added > 0)
    })?;
    Ok(added)
}

pub fn run(file: &str) -> anyhow::Result<()> {
    let incoming: Vec<VideoRecord> = read_json(Path::new(file))?
        .ok_or_else(|| anyhow::anyhow!("no such file: {}", file))?;
    let total = incoming.len();

    let store = open_store()?;
    let added = import_records(&store, incoming)?;
    info!(added, total, "Imported videos");
    println!("Imported {} of {} videos ({} already saved)", added, total, total - added);
    Ok(())
}
