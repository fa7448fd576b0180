//! In-process stand-in for a language-server transport.
#![deny(missing_docs)]
//!
//! An editor's language-client framework normally spawns an external server
//! process and speaks a wire protocol to it. This crate intercepts that
//! spawn step: when the launch command matches the registered integration,
//! the framework receives a [`FakeServerConnection`] that never starts a
//! process and instead routes requests to in-process capability handlers
//! (code actions, formatting, hover, completion) and notifications to the
//! diagnostics handler. Control-plane methods (`initialize`, `shutdown`,
//! `exit`) are answered by the connection itself.
//!
//! Responses are deferred onto a [`CallbackScheduler`] so callers always
//! observe the allocated message id before any callback fires; tests drive
//! the scheduler deterministically via
//! [`run_pending`](CallbackScheduler::run_pending).

mod client;
mod connection;
mod envelope;
mod errors;
mod handler;
mod launcher;
pub mod methods;
mod process;
mod scheduler;

#[cfg(test)]
mod tests;

pub use client::{ClientResolver, DetachedClients, EditorClient};
pub use connection::{
    DispatcherCallbacks, FakeServerConnection, MessageId, Responder, ResponseCallback,
    ServerConnection,
};
pub use envelope::{is_handled, mark_handled};
pub use errors::HostError;
pub use handler::{CapabilityHandler, CapabilityKind, HandlerSet};
pub use launcher::{
    INTEGRATION_NAME, InterceptingLauncher, LaunchRequest, LauncherTable, TransportStart,
};
pub use process::FakeProcessHandle;
pub use scheduler::CallbackScheduler;
