//! Shared fixtures and doubles for host tests.

mod recording;

use std::rc::Rc;

pub use recording::{
    CallLog, ExitLog, ObservedCall, RecordingHandler, RecordingTransport, ResponseLog,
    ScriptedClients,
};
pub use world::TestWorld;

use crate::handler::{CapabilityKind, HandlerSet};

/// Every capability kind, in dispatch-rank order.
pub const ALL_KINDS: [CapabilityKind; 5] = [
    CapabilityKind::Diagnostics,
    CapabilityKind::CodeActions,
    CapabilityKind::Formatting,
    CapabilityKind::Hover,
    CapabilityKind::Completion,
];

/// Builds a handler set with one recording handler per capability.
///
/// With `claiming` set, every request-path handler marks requests handled.
pub fn recording_handler_set(log: &CallLog, claiming: bool) -> HandlerSet {
    let mut handlers = HandlerSet::new();
    for kind in ALL_KINDS {
        let handler = if claiming && kind.handles_requests() {
            RecordingHandler::claiming(kind, log.clone())
        } else {
            RecordingHandler::new(kind, log.clone())
        };
        handlers
            .register(Rc::new(handler))
            .unwrap_or_else(|error| panic!("fixture registration failed: {error}"));
    }
    handlers
}
