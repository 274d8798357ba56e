use super::open_store;
use tracing::warn;
use vsense_store::VideoStore;

pub fn run(yes: bool) -> anyhow::Result<()> {
    if !yes {
        println!("This deletes every saved video. Re-run with --yes to confirm.");
        return Ok(());
    }

    let store = open_store()?;
    let count = store.get_all()?.len();
    store.clear_all()?;
    warn!(count, "Cleared saved videos");
    println!("Cleared {} saved videos", count);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use vsense_core::{build_record, Platform, RecordDraft};
    use vsense_store::{JsonFileStore, Paths, HOME_ENV};

    #[test]
    #[serial]
    fn test_clear_requires_confirmation() {
        let temp = tempfile::TempDir::new().unwrap();
        std::env::set_var(HOME_ENV, temp.path());
        let store = JsonFileStore::open(Paths::at(temp.path().to_path_buf()).videos_file());
        store
            .save(build_record(RecordDraft::new(Platform::Instagram, "https://i/1")))
            .unwrap();

        run(false).unwrap();
        assert_eq!(store.get_all().unwrap().len(), 1);

        run(true).unwrap();
        assert!(store.get_all().unwrap().is_empty());

        std::env::remove_var(HOME_ENV);
    }
}
