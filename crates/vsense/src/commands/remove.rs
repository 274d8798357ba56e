use super::open_store;
use vsense_store::{RemoveOutcome, VideoStore};

pub fn run(url: &str) -> anyhow::Result<()> {
    let store = open_store()?;
    match store.remove(url)? {
        RemoveOutcome::Removed => println!("Removed {}", url),
        RemoveOutcome::NotFound => println!("Not saved: {}", url),
    }
    Ok(())
}
