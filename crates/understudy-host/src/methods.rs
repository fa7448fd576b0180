//! Canonical protocol method names and control-plane classification.

use lsp_types::notification::{DidChangeTextDocument, Exit, Notification};
use lsp_types::request::{
    CodeActionRequest, Completion, Formatting, HoverRequest, Initialize, Request, Shutdown,
};

/// `initialize` request.
pub const INITIALIZE: &str = Initialize::METHOD;
/// `shutdown` request.
pub const SHUTDOWN: &str = Shutdown::METHOD;
/// `exit` notification, accepted on the request path as a one-way method.
pub const EXIT: &str = Exit::METHOD;
/// `textDocument/codeAction` request.
pub const CODE_ACTION: &str = CodeActionRequest::METHOD;
/// `textDocument/formatting` request.
pub const FORMATTING: &str = Formatting::METHOD;
/// `textDocument/hover` request.
pub const HOVER: &str = HoverRequest::METHOD;
/// `textDocument/completion` request.
pub const COMPLETION: &str = Completion::METHOD;
/// `textDocument/didChange` notification.
pub const DID_CHANGE: &str = DidChangeTextDocument::METHOD;

/// Methods the fake connection answers itself, without consulting any
/// capability handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlMethod {
    /// Capability negotiation; answered with the static capability table.
    Initialize,
    /// Moves the connection to its terminal stopped state.
    Shutdown,
    /// One-way teardown; reported through the exit dispatcher callback.
    Exit,
}

impl ControlMethod {
    /// Classifies a method name, returning `None` for capability methods.
    #[must_use]
    pub fn classify(method: &str) -> Option<Self> {
        match method {
            INITIALIZE => Some(Self::Initialize),
            SHUTDOWN => Some(Self::Shutdown),
            EXIT => Some(Self::Exit),
            _ => None,
        }
    }

    /// Canonical method name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Initialize => INITIALIZE,
            Self::Shutdown => SHUTDOWN,
            Self::Exit => EXIT,
        }
    }
}
