//! Integration settings for the fake language-server transport.
#![deny(missing_docs)]
//!
//! The crate owns the declarative side of transport interception: which
//! integration is registered, which command the editor believes it is
//! launching, and which filetypes the integration serves. The host crate
//! consults a [`SettingsStore`] at transport-start time to decide whether a
//! launch should be intercepted or passed through to the real transport.

mod integration;
mod store;

pub use integration::IntegrationSettings;
pub use store::{ConfigError, SettingsStore};
