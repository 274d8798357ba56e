//! Configuration for page observation and record building

use crate::error::ConfigError;
use crate::types::Platform;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

/// Observer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Location poll period
    pub poll_interval_ms: u64,

    /// Quiet window that coalesces a burst of DOM mutations into one resolve
    pub mutation_debounce_ms: u64,

    /// Wait after a navigation signal before probing the DOM
    pub settle_delay_ms: u64,

    /// How long a notice stays visible
    pub notice_duration_ms: u64,

    /// Max title chars before "..." is appended
    pub title_limit: usize,

    /// Max description chars before "..." is appended
    pub description_limit: usize,

    /// Chars of caption used as the title when a platform has no title field
    pub caption_title_limit: usize,

    /// Per-platform enable switches (absent = enabled)
    pub platforms: HashMap<String, bool>,
}

impl Config {
    pub fn new() -> Self {
        Self {
            poll_interval_ms: 500,
            mutation_debounce_ms: 100,
            settle_delay_ms: 1000,
            notice_duration_ms: 2000,
            title_limit: 200,
            description_limit: 500,
            caption_title_limit: 100,
            platforms: HashMap::new(),
        }
    }

    /// Load from a JSON file; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "poll_interval_ms must be greater than zero".to_string(),
            ));
        }
        if self.title_limit == 0 || self.description_limit == 0 {
            return Err(ConfigError::Invalid(
                "text limits must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn is_platform_enabled(&self, platform: Platform) -> bool {
        self.platforms
            .get(platform.as_str())
            .copied()
            .unwrap_or(true)
    }

    pub fn set_platform_enabled(&mut self, platform: Platform, enabled: bool) {
        self.platforms.insert(platform.as_str().to_string(), enabled);
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn mutation_debounce(&self) -> Duration {
        Duration::from_millis(self.mutation_debounce_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn notice_duration(&self) -> Duration {
        Duration::from_millis(self.notice_duration_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
