//! Capability handler contract and the ordered dispatch set.

use std::fmt;
use std::rc::Rc;

use serde_json::Value;

use crate::connection::Responder;
use crate::errors::HostError;

/// Language-tooling feature implemented by an external source collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CapabilityKind {
    /// Pushes diagnostics; notify-only, never on the request path.
    Diagnostics,
    /// `textDocument/codeAction`.
    CodeActions,
    /// `textDocument/formatting`.
    Formatting,
    /// `textDocument/hover`.
    Hover,
    /// `textDocument/completion`.
    Completion,
}

impl CapabilityKind {
    /// Canonical kebab-case identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Diagnostics => "diagnostics",
            Self::CodeActions => "code-actions",
            Self::Formatting => "formatting",
            Self::Hover => "hover",
            Self::Completion => "completion",
        }
    }

    /// Whether the capability participates in the request path.
    #[must_use]
    pub const fn handles_requests(self) -> bool {
        !matches!(self, Self::Diagnostics)
    }

    /// Position in the fixed request dispatch order; diagnostics sorts
    /// first but is filtered off the request path.
    const fn dispatch_rank(self) -> u8 {
        match self {
            Self::Diagnostics => 0,
            Self::CodeActions => 1,
            Self::Formatting => 2,
            Self::Hover => 3,
            Self::Completion => 4,
        }
    }
}

impl fmt::Display for CapabilityKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Contract implemented by each capability source.
///
/// On the request path every handler sees the same method and normalised
/// params and independently decides whether to act. A handler that takes
/// ownership calls [`mark_handled`](crate::mark_handled) on the params and
/// may answer through the [`Responder`]; the connection then withholds its
/// fallback empty response.
pub trait CapabilityHandler {
    /// Capability this handler implements.
    fn kind(&self) -> CapabilityKind;

    /// Handles a capability request. The default implementation declines.
    fn handle_request(&self, method: &str, params: &mut Value, responder: &Responder) {
        let _ = (method, params, responder);
    }

    /// Handles a notification. The default implementation ignores it.
    fn handle_notification(&self, method: &str, params: &mut Value) {
        let _ = (method, params);
    }
}

impl fmt::Debug for dyn CapabilityHandler {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "CapabilityHandler({})", self.kind())
    }
}

/// Ordered set of capability handlers consulted by a fake connection.
///
/// At most one handler per capability. Request dispatch order is fixed
/// regardless of registration order: code actions, formatting, hover,
/// completion. Diagnostics receives notifications only.
#[derive(Clone, Default)]
pub struct HandlerSet {
    handlers: Vec<Rc<dyn CapabilityHandler>>,
}

impl HandlerSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::DuplicateHandler`] when a handler for the same
    /// capability is already present.
    pub fn register(&mut self, handler: Rc<dyn CapabilityHandler>) -> Result<(), HostError> {
        let kind = handler.kind();
        if self.handlers.iter().any(|existing| existing.kind() == kind) {
            return Err(HostError::DuplicateHandler { kind });
        }
        self.handlers.push(handler);
        self.handlers
            .sort_by_key(|handler| handler.kind().dispatch_rank());
        Ok(())
    }

    /// Handlers consulted for requests, in fixed dispatch order.
    pub(crate) fn request_handlers(&self) -> impl Iterator<Item = &Rc<dyn CapabilityHandler>> {
        self.handlers
            .iter()
            .filter(|handler| handler.kind().handles_requests())
    }

    /// The diagnostics handler, if registered.
    pub(crate) fn diagnostics(&self) -> Option<&Rc<dyn CapabilityHandler>> {
        self.handlers
            .iter()
            .find(|handler| handler.kind() == CapabilityKind::Diagnostics)
    }

    /// Looks up the handler for a capability.
    #[must_use]
    pub fn get(&self, kind: CapabilityKind) -> Option<&Rc<dyn CapabilityHandler>> {
        self.handlers.iter().find(|handler| handler.kind() == kind)
    }

    /// Number of registered handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns `true` when no handlers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl fmt::Debug for HandlerSet {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kinds: Vec<&str> = self
            .handlers
            .iter()
            .map(|handler| handler.kind().as_str())
            .collect();
        formatter.debug_tuple("HandlerSet").field(&kinds).finish()
    }
}
