//! Named configs created on first access.
//!
//! ```rust
//! use std::sync::Arc;
//! use strata_config::ConfigRegistry;
//!
//! let registry = ConfigRegistry::new();
//! let first = registry.get_or_create("service");
//! let again = registry.get_or_create("service");
//! assert!(Arc::ptr_eq(&first, &again));
//! assert_eq!(first.name(), "service");
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::file::load_mapping;
use crate::{Config, StrataResult};

/// Name used when callers do not pick one.
pub const DEFAULT_NAME: &str = "default";

/// A set of named [`Config`]s. Entries are never removed and live as long
/// as the registry.
#[derive(Debug, Default)]
pub struct ConfigRegistry {
    configs: Mutex<HashMap<String, Arc<Config>>>,
}

impl ConfigRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The config called `name`, created empty if absent.
    ///
    /// Creation is atomic: concurrent callers asking for the same name all
    /// receive the same instance.
    #[must_use]
    pub fn get_or_create(&self, name: &str) -> Arc<Config> {
        let mut configs = self.configs.lock();
        if let Some(existing) = configs.get(name) {
            return Arc::clone(existing);
        }
        tracing::debug!(config = name, "creating config");
        let config = Arc::new(Config::named(name));
        configs.insert(name.to_owned(), Arc::clone(&config));
        config
    }

    /// The config called `name`, if it has been created.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<Config>> {
        self.configs.lock().get(name).cloned()
    }

    /// Names of all created configs, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.configs.lock().keys().cloned().collect();
        names.sort_unstable();
        names
    }

    /// Load `path` and replace the view of the config called `name`,
    /// creating it if needed.
    ///
    /// The file is parsed before the config is touched, so a failed load
    /// leaves any existing view in place.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`load_mapping`].
    pub fn load(&self, path: &Path, name: &str) -> StrataResult<Arc<Config>> {
        let data = load_mapping(path)?;
        let config = self.get_or_create(name);
        config.replace(data);
        tracing::info!(config = name, path = %path.display(), "configuration loaded");
        Ok(config)
    }
}
