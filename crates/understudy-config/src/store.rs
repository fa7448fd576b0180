//! Registration and lookup of integration settings.

use std::collections::HashMap;

use thiserror::Error;

use crate::integration::IntegrationSettings;

/// Errors raised while maintaining the settings store.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An integration with the same name is already registered.
    #[error("integration '{name}' is already registered")]
    DuplicateIntegration {
        /// Name of the integration being registered a second time.
        name: String,
    },

    /// The settings failed validation.
    #[error("invalid integration settings: {message}")]
    InvalidSettings {
        /// Why validation rejected the settings.
        message: String,
    },
}

/// Store of registered integration settings, keyed by integration name.
///
/// # Example
///
/// ```
/// use understudy_config::{IntegrationSettings, SettingsStore};
///
/// let mut store = SettingsStore::new();
/// let settings = IntegrationSettings::new("understudy", "understudy-ls");
/// store.register(settings).expect("registration succeeds");
/// assert!(store.lookup("understudy").is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct SettingsStore {
    entries: HashMap<String, IntegrationSettings>,
}

impl SettingsStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers settings after validation.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSettings`] when validation fails and
    /// [`ConfigError::DuplicateIntegration`] when the name is taken.
    pub fn register(&mut self, settings: IntegrationSettings) -> Result<(), ConfigError> {
        settings.validate()?;
        let name = settings.name().to_owned();
        if self.entries.contains_key(&name) {
            return Err(ConfigError::DuplicateIntegration { name });
        }
        self.entries.insert(name, settings);
        Ok(())
    }

    /// Looks up settings by integration name.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&IntegrationSettings> {
        self.entries.get(name)
    }

    /// Removes and returns settings, used by teardown paths.
    pub fn unregister(&mut self, name: &str) -> Option<IntegrationSettings> {
        self.entries.remove(name)
    }

    /// Number of registered integrations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
