//! Registry for picking the adapter that handles a page

use crate::platform::PlatformAdapter;
use crate::platforms::{InstagramAdapter, LinkedinAdapter, YoutubeAdapter};
use std::sync::Arc;
use tracing::debug;
use url::Url;
use vsense_core::{Config, Platform};

/// Enabled platform adapters, in registration order
pub struct PlatformRegistry {
    adapters: Vec<Arc<dyn PlatformAdapter>>,
    config: Config,
}

impl PlatformRegistry {
    /// Create a new empty registry
    pub fn new(config: Config) -> Self {
        Self {
            adapters: Vec::new(),
            config,
        }
    }

    /// Every built-in adapter that `config` leaves enabled
    pub fn from_config(config: &Config) -> Self {
        let mut registry = Self::new(config.clone());
        registry.register(Arc::new(YoutubeAdapter::new()));
        registry.register(Arc::new(InstagramAdapter::from_config(config)));
        registry.register(Arc::new(LinkedinAdapter::from_config(config)));
        registry
    }

    /// Register an adapter; disabled platforms are skipped
    pub fn register(&mut self, adapter: Arc<dyn PlatformAdapter>) {
        let platform = adapter.platform();
        if self.config.is_platform_enabled(platform) {
            self.adapters.push(adapter);
        } else {
            debug!(platform = platform.as_str(), "platform disabled, adapter skipped");
        }
    }

    /// Adapter for a page location; unparseable locations match nothing
    pub fn for_location(&self, location: &str) -> Option<Arc<dyn PlatformAdapter>> {
        let url = Url::parse(location).ok()?;
        self.adapters.iter().find(|a| a.matches(&url)).cloned()
    }

    pub fn get(&self, platform: Platform) -> Option<Arc<dyn PlatformAdapter>> {
        self.adapters
            .iter()
            .find(|a| a.platform() == platform)
            .cloned()
    }

    pub fn platforms(&self) -> Vec<Platform> {
        self.adapters.iter().map(|a| a.platform()).collect()
    }

    /// Get number of registered adapters
    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}

impl Default for PlatformRegistry {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}
