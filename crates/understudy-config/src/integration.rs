//! Declarative description of one registrable integration.

use serde::{Deserialize, Serialize};

use crate::store::ConfigError;

/// Settings describing how the editor starts one integration.
///
/// The `command` is what the launch decision is keyed on: a transport start
/// whose command equals this value is intercepted, anything else reaches the
/// real transport untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrationSettings {
    name: String,
    command: String,
    #[serde(default)]
    args: Vec<String>,
    #[serde(default)]
    filetypes: Vec<String>,
}

impl IntegrationSettings {
    /// Creates settings for `name`, nominally started via `command`.
    #[must_use]
    pub fn new(name: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            command: command.into(),
            args: Vec::new(),
            filetypes: Vec::new(),
        }
    }

    /// Sets the arguments the editor would pass to the command.
    #[must_use]
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    /// Declares the filetypes the integration serves.
    #[must_use]
    pub fn with_filetypes(mut self, filetypes: Vec<String>) -> Self {
        self.filetypes = filetypes;
        self
    }

    /// Name the integration registers under.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Command the editor believes it is launching.
    #[must_use]
    pub fn command(&self) -> &str {
        self.command.as_str()
    }

    /// Declared launch arguments.
    #[must_use]
    pub fn args(&self) -> &[String] {
        self.args.as_slice()
    }

    /// Declared filetypes.
    #[must_use]
    pub fn filetypes(&self) -> &[String] {
        self.filetypes.as_slice()
    }

    /// Validates the settings before registration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSettings`] when the name or command is
    /// empty; both are required for the launch-time command match.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.is_empty() {
            return Err(ConfigError::InvalidSettings {
                message: String::from("integration name must not be empty"),
            });
        }
        if self.command.is_empty() {
            return Err(ConfigError::InvalidSettings {
                message: format!("integration '{}' declares no command", self.name),
            });
        }
        Ok(())
    }
}
