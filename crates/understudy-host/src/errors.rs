//! Errors surfaced by the fake transport host.

use thiserror::Error;

use crate::handler::CapabilityKind;

/// Errors returned by connection traffic and handler registration.
#[derive(Debug, Error)]
pub enum HostError {
    /// The fake process was killed; the connection rejects further traffic.
    #[error("connection is closed; '{method}' was rejected")]
    ConnectionClosed {
        /// Method that arrived after the connection stopped.
        method: String,
    },

    /// A handler for this capability is already registered.
    #[error("a handler for capability '{kind}' is already registered")]
    DuplicateHandler {
        /// Capability whose slot is taken.
        kind: CapabilityKind,
    },
}
