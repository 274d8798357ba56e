//! Path resolution for the video store and config files

use std::path::PathBuf;

/// Environment variable that overrides the data directory
pub const HOME_ENV: &str = "VSENSE_HOME";

const APP_DIR: &str = "virality-sense";

/// Resolves standard paths for stored data
#[derive(Debug, Clone)]
pub struct Paths {
    pub data_dir: PathBuf,
}

impl Paths {
    /// Resolve from `VSENSE_HOME`, falling back to the platform data directory
    pub fn new() -> std::io::Result<Self> {
        if let Some(home) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
            return Ok(Self::at(PathBuf::from(home)));
        }

        let base = dirs::data_dir().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, "data directory not found")
        })?;

        Ok(Self::at(base.join(APP_DIR)))
    }

    pub fn at(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    /// Get videos.json path
    pub fn videos_file(&self) -> PathBuf {
        self.data_dir.join("videos.json")
    }

    /// Get config.json path
    pub fn config_file(&self) -> PathBuf {
        self.data_dir.join("config.json")
    }
}
