pub mod clear;
pub mod export;
pub mod import;
pub mod inspect;
pub mod list;
pub mod platforms;
pub mod remove;
pub mod save;
pub mod stats;
pub mod version;

use vsense_core::Config;
use vsense_store::{JsonFileStore, Paths};

/// Store at the resolved data directory
pub fn open_store() -> anyhow::Result<JsonFileStore> {
    let paths = Paths::new()?;
    Ok(JsonFileStore::open(paths.videos_file()))
}

pub fn load_config() -> anyhow::Result<Config> {
    let paths = Paths::new()?;
    Ok(Config::load(&paths.config_file())?)
}
