//! The fake server connection: message ids, routing, and the response
//! contract.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use lsp_types::{
    CodeActionProviderCapability, CompletionOptions, HoverProviderCapability, OneOf,
    ServerCapabilities, TextDocumentSyncCapability, TextDocumentSyncKind,
};
use serde_json::{Map, Value, json};
use tracing::{debug, warn};

use crate::client::ClientResolver;
use crate::envelope;
use crate::errors::HostError;
use crate::handler::HandlerSet;
use crate::methods::ControlMethod;
use crate::process::FakeProcessHandle;
use crate::scheduler::CallbackScheduler;

/// Log target for connection operations.
pub(crate) const CONNECTION_TARGET: &str = "understudy_host::connection";

/// Identifier allocated to each request on a connection.
pub type MessageId = i64;

/// Id reserved for the framework's own handshake; user-visible request ids
/// start above it.
const RESERVED_MESSAGE_ID: MessageId = 1;

/// Response delivered to the framework as `(error, result)`.
///
/// The reference behaviour never constructs a non-`None` error; the slot
/// exists because the framework's callback signature carries it.
pub type ResponseCallback = Box<dyn FnOnce(Option<Value>, Option<Value>)>;

/// Lifecycle callbacks the framework supplies at transport start,
/// mirroring what a real transport would report about its process.
pub struct DispatcherCallbacks {
    on_exit: Box<dyn Fn(i32, i32)>,
    on_error: Option<Box<dyn Fn(Value)>>,
}

impl DispatcherCallbacks {
    /// Creates callbacks with the mandatory exit handler.
    #[must_use]
    pub fn new(on_exit: impl Fn(i32, i32) + 'static) -> Self {
        Self {
            on_exit: Box::new(on_exit),
            on_error: None,
        }
    }

    /// Attaches an error handler for transport-level failures.
    #[must_use]
    pub fn with_on_error(mut self, on_error: impl Fn(Value) + 'static) -> Self {
        self.on_error = Some(Box::new(on_error));
        self
    }

    /// Reports process exit with the given `(code, signal)` pair.
    pub fn exit(&self, code: i32, signal: i32) {
        (self.on_exit)(code, signal);
    }

    /// Reports a transport-level error, if a handler was attached.
    pub fn error(&self, payload: Value) {
        if let Some(on_error) = &self.on_error {
            on_error(payload);
        }
    }
}

impl fmt::Debug for DispatcherCallbacks {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("DispatcherCallbacks")
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}

/// Hands a request's callback to handlers while guaranteeing it fires at
/// most once.
///
/// Handlers and the connection's fallback path share one responder per
/// request; whichever responds first wins and later attempts are dropped
/// with a warning.
#[derive(Clone)]
pub struct Responder {
    message_id: MessageId,
    callback: Rc<RefCell<Option<ResponseCallback>>>,
}

impl Responder {
    pub(crate) fn new(message_id: MessageId, callback: ResponseCallback) -> Self {
        Self {
            message_id,
            callback: Rc::new(RefCell::new(Some(callback))),
        }
    }

    /// Message id of the request this responder answers.
    #[must_use]
    pub fn message_id(&self) -> MessageId {
        self.message_id
    }

    /// Delivers `(error, result)`; returns `false` when a response has
    /// already fired.
    pub fn respond(&self, error: Option<Value>, result: Option<Value>) -> bool {
        let callback = self.callback.borrow_mut().take();
        match callback {
            Some(callback) => {
                callback(error, result);
                true
            }
            None => {
                warn!(
                    target: CONNECTION_TARGET,
                    message_id = self.message_id,
                    "duplicate response suppressed"
                );
                false
            }
        }
    }

    /// Whether a response has already been delivered.
    #[must_use]
    pub fn has_responded(&self) -> bool {
        self.callback.borrow().is_none()
    }
}

impl fmt::Debug for Responder {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Responder")
            .field("message_id", &self.message_id)
            .field("responded", &self.has_responded())
            .finish()
    }
}

/// Connection surface the client framework drives after transport start.
///
/// Real transports wrap a spawned process; [`FakeServerConnection`]
/// implements the same surface without one.
pub trait ServerConnection {
    /// Sends a request and returns the allocated message id. The response
    /// arrives later through `callback`, never within this call.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::ConnectionClosed`] once the process handle has
    /// been killed.
    fn request(
        &self,
        method: &str,
        params: Value,
        callback: ResponseCallback,
    ) -> Result<MessageId, HostError>;

    /// Sends a notification; no id is allocated and no response exists.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::ConnectionClosed`] once the process handle has
    /// been killed.
    fn notify(&self, method: &str, params: Value) -> Result<(), HostError>;

    /// Whether the underlying process has been terminated.
    fn is_closing(&self) -> bool;

    /// Terminates the underlying process.
    fn kill(&self);

    /// Pid of the underlying process.
    fn pid(&self) -> u32;
}

impl fmt::Debug for dyn ServerConnection {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ServerConnection")
            .field("pid", &self.pid())
            .field("closing", &self.is_closing())
            .finish()
    }
}

/// In-process substitute for a real server connection.
///
/// Owns the message-id counter and the control-plane handling; capability
/// requests fan out to the injected [`HandlerSet`] and fall back to an
/// empty response unless a handler claims them.
pub struct FakeServerConnection {
    dispatchers: DispatcherCallbacks,
    handlers: HandlerSet,
    clients: Rc<dyn ClientResolver>,
    scheduler: Rc<CallbackScheduler>,
    handle: FakeProcessHandle,
    last_message_id: Cell<MessageId>,
}

impl FakeServerConnection {
    /// Opens a fake connection. No process is spawned; the returned
    /// connection is immediately ready for traffic.
    #[must_use]
    pub fn start(
        dispatchers: DispatcherCallbacks,
        handlers: HandlerSet,
        clients: Rc<dyn ClientResolver>,
        scheduler: Rc<CallbackScheduler>,
    ) -> Self {
        let handle = FakeProcessHandle::new();
        debug!(
            target: CONNECTION_TARGET,
            pid = handle.pid(),
            handlers = handlers.len(),
            "fake server connection started"
        );
        Self {
            dispatchers,
            handlers,
            clients,
            scheduler,
            handle,
            last_message_id: Cell::new(RESERVED_MESSAGE_ID),
        }
    }

    /// Handle shared with the framework; killing it stops the connection.
    #[must_use]
    pub fn process_handle(&self) -> FakeProcessHandle {
        self.handle.clone()
    }

    fn next_message_id(&self) -> MessageId {
        let id = self.last_message_id.get() + 1;
        self.last_message_id.set(id);
        id
    }

    /// Normalises params and, when a client resolves, runs client setup and
    /// swaps the method field for the client id.
    fn prepared_params(&self, method: &str, params: Value) -> Value {
        let mut params = envelope::normalize(params, method);
        if let Some(client) = self.clients.get_client() {
            self.clients.setup_client(&client);
            envelope::attach_client(&mut params, client.id());
        }
        params
    }

    fn ensure_open(&self, method: &str) -> Result<(), HostError> {
        if self.handle.is_closing() {
            warn!(
                target: CONNECTION_TARGET,
                method,
                pid = self.handle.pid(),
                "traffic on a closed connection rejected"
            );
            return Err(HostError::ConnectionClosed {
                method: method.to_owned(),
            });
        }
        Ok(())
    }

    fn dispatch_control(&self, control: ControlMethod, responder: Responder) {
        match control {
            ControlMethod::Initialize => {
                self.scheduler.defer(move || {
                    responder.respond(None, Some(initialize_result()));
                });
            }
            ControlMethod::Shutdown => {
                self.handle.kill();
                self.scheduler.defer(move || {
                    responder.respond(None, None);
                });
            }
            ControlMethod::Exit => {
                // One-way: the exit dispatcher fires instead of the callback.
                self.dispatchers.exit(0, 0);
            }
        }
    }

    fn dispatch_capability(&self, method: &str, mut params: Value, responder: Responder) {
        for handler in self.handlers.request_handlers() {
            handler.handle_request(method, &mut params, &responder);
        }
        if !envelope::is_handled(&params) {
            self.scheduler.defer(move || {
                responder.respond(None, None);
            });
        }
    }
}

impl ServerConnection for FakeServerConnection {
    fn request(
        &self,
        method: &str,
        params: Value,
        callback: ResponseCallback,
    ) -> Result<MessageId, HostError> {
        self.ensure_open(method)?;
        let message_id = self.next_message_id();
        debug!(
            target: CONNECTION_TARGET,
            method,
            id = message_id,
            "dispatching request"
        );

        let params = self.prepared_params(method, params);
        let responder = Responder::new(message_id, callback);
        match ControlMethod::classify(method) {
            Some(control) => self.dispatch_control(control, responder),
            None => self.dispatch_capability(method, params, responder),
        }
        Ok(message_id)
    }

    fn notify(&self, method: &str, params: Value) -> Result<(), HostError> {
        self.ensure_open(method)?;
        debug!(
            target: CONNECTION_TARGET,
            method,
            "dispatching notification"
        );

        let mut params = envelope::normalize(params, method);
        match self.handlers.diagnostics() {
            Some(handler) => handler.handle_notification(method, &mut params),
            None => debug!(
                target: CONNECTION_TARGET,
                method,
                "no diagnostics handler registered; notification dropped"
            ),
        }
        Ok(())
    }

    fn is_closing(&self) -> bool {
        self.handle.is_closing()
    }

    fn kill(&self) {
        self.handle.kill();
    }

    fn pid(&self) -> u32 {
        self.handle.pid()
    }
}

impl fmt::Debug for FakeServerConnection {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("FakeServerConnection")
            .field("pid", &self.handle.pid())
            .field("closing", &self.handle.is_closing())
            .field("last_message_id", &self.last_message_id.get())
            .field("handlers", &self.handlers)
            .finish()
    }
}

/// Static `initialize` result advertising the capabilities the handler set
/// can serve.
fn initialize_result() -> Value {
    let capabilities = ServerCapabilities {
        text_document_sync: Some(TextDocumentSyncCapability::Kind(TextDocumentSyncKind::FULL)),
        code_action_provider: Some(CodeActionProviderCapability::Simple(true)),
        document_formatting_provider: Some(OneOf::Left(true)),
        hover_provider: Some(HoverProviderCapability::Simple(true)),
        completion_provider: Some(CompletionOptions::default()),
        ..ServerCapabilities::default()
    };
    let capabilities =
        serde_json::to_value(capabilities).unwrap_or_else(|_| Value::Object(Map::new()));
    json!({ "capabilities": capabilities })
}
