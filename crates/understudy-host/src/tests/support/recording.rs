//! Recording doubles standing in for the external collaborators.

use std::cell::{Cell, Ref, RefCell};
use std::rc::Rc;

use serde_json::Value;

use crate::client::{ClientResolver, EditorClient};
use crate::connection::{
    DispatcherCallbacks, MessageId, Responder, ResponseCallback, ServerConnection,
};
use crate::envelope;
use crate::errors::HostError;
use crate::handler::{CapabilityHandler, CapabilityKind};
use crate::launcher::{LaunchRequest, TransportStart};

/// One request or notification observed by a recording handler.
#[derive(Debug, Clone)]
pub struct ObservedCall {
    /// Capability of the handler that observed the call.
    pub kind: CapabilityKind,
    /// Method passed on the dispatch argument.
    pub method: String,
    /// Params snapshot at observation time.
    pub params: Value,
    /// Whether the call arrived on the notification path.
    pub notification: bool,
}

/// Shared, ordered log of handler activity across all handlers.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    calls: Rc<RefCell<Vec<ObservedCall>>>,
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, call: ObservedCall) {
        self.calls.borrow_mut().push(call);
    }

    /// Snapshot of every observed call, in order.
    pub fn calls(&self) -> Vec<ObservedCall> {
        self.calls.borrow().clone()
    }

    /// Capability kinds in observation order.
    pub fn kinds(&self) -> Vec<CapabilityKind> {
        self.calls.borrow().iter().map(|call| call.kind).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.borrow().is_empty()
    }
}

/// Capability handler double that records calls and optionally claims them.
pub struct RecordingHandler {
    kind: CapabilityKind,
    log: CallLog,
    claim: bool,
    response: Option<Value>,
}

impl RecordingHandler {
    /// Handler that observes but never claims.
    pub fn new(kind: CapabilityKind, log: CallLog) -> Self {
        Self {
            kind,
            log,
            claim: false,
            response: None,
        }
    }

    /// Handler that claims every request without answering.
    pub fn claiming(kind: CapabilityKind, log: CallLog) -> Self {
        Self {
            claim: true,
            ..Self::new(kind, log)
        }
    }

    /// Handler that claims every request and answers with `response`.
    pub fn answering(kind: CapabilityKind, log: CallLog, response: Value) -> Self {
        Self {
            claim: true,
            response: Some(response),
            ..Self::new(kind, log)
        }
    }
}

impl CapabilityHandler for RecordingHandler {
    fn kind(&self) -> CapabilityKind {
        self.kind
    }

    fn handle_request(&self, method: &str, params: &mut Value, responder: &Responder) {
        self.log.record(ObservedCall {
            kind: self.kind,
            method: method.to_owned(),
            params: params.clone(),
            notification: false,
        });
        if self.claim {
            envelope::mark_handled(params);
        }
        if let Some(response) = &self.response {
            responder.respond(None, Some(response.clone()));
        }
    }

    fn handle_notification(&self, method: &str, params: &mut Value) {
        self.log.record(ObservedCall {
            kind: self.kind,
            method: method.to_owned(),
            params: params.clone(),
            notification: true,
        });
    }
}

/// Client resolver double with a scripted client and a setup counter.
#[derive(Debug, Default)]
pub struct ScriptedClients {
    client: Option<EditorClient>,
    setups: Cell<usize>,
}

impl ScriptedClients {
    /// Resolver with no live client.
    pub fn detached() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Resolver with a live client carrying `id`.
    pub fn attached(id: u32) -> Rc<Self> {
        Rc::new(Self {
            client: Some(EditorClient::new(id)),
            setups: Cell::new(0),
        })
    }

    /// How many times `setup_client` ran.
    pub fn setup_calls(&self) -> usize {
        self.setups.get()
    }
}

impl ClientResolver for ScriptedClients {
    fn get_client(&self) -> Option<EditorClient> {
        self.client
    }

    fn setup_client(&self, _client: &EditorClient) {
        self.setups.set(self.setups.get() + 1);
    }
}

/// Collects `(error, result)` pairs delivered to response callbacks.
#[derive(Debug, Clone, Default)]
pub struct ResponseLog {
    responses: Rc<RefCell<Vec<(Option<Value>, Option<Value>)>>>,
}

impl ResponseLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A callback that appends its delivery to this log.
    pub fn callback(&self) -> ResponseCallback {
        let responses = Rc::clone(&self.responses);
        Box::new(move |error, result| responses.borrow_mut().push((error, result)))
    }

    /// Snapshot of every delivered response, in order.
    pub fn responses(&self) -> Vec<(Option<Value>, Option<Value>)> {
        self.responses.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.responses.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.responses.borrow().is_empty()
    }
}

/// Records exit reports delivered through the dispatcher callbacks.
#[derive(Debug, Clone, Default)]
pub struct ExitLog {
    exits: Rc<RefCell<Vec<(i32, i32)>>>,
}

impl ExitLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dispatcher callbacks wired to this log.
    pub fn dispatchers(&self) -> DispatcherCallbacks {
        let exits = Rc::clone(&self.exits);
        DispatcherCallbacks::new(move |code, signal| exits.borrow_mut().push((code, signal)))
    }

    /// Snapshot of every `(code, signal)` report, in order.
    pub fn exits(&self) -> Vec<(i32, i32)> {
        self.exits.borrow().clone()
    }
}

/// Transport double recording every launch delegated to it.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    launches: RefCell<Vec<LaunchRequest>>,
}

impl RecordingTransport {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Launches that reached the original transport.
    pub fn launches(&self) -> Ref<'_, Vec<LaunchRequest>> {
        self.launches.borrow()
    }
}

impl TransportStart for RecordingTransport {
    fn start(&self, launch: LaunchRequest) -> Rc<dyn ServerConnection> {
        self.launches.borrow_mut().push(launch);
        Rc::new(InertConnection::default())
    }
}

/// Connection returned for pass-through launches; accepts nothing.
#[derive(Debug, Default)]
struct InertConnection {
    killed: Cell<bool>,
}

impl ServerConnection for InertConnection {
    fn request(
        &self,
        method: &str,
        _params: Value,
        _callback: ResponseCallback,
    ) -> Result<MessageId, HostError> {
        Err(HostError::ConnectionClosed {
            method: method.to_owned(),
        })
    }

    fn notify(&self, method: &str, _params: Value) -> Result<(), HostError> {
        Err(HostError::ConnectionClosed {
            method: method.to_owned(),
        })
    }

    fn is_closing(&self) -> bool {
        self.killed.get()
    }

    fn kill(&self) {
        self.killed.set(true);
    }

    fn pid(&self) -> u32 {
        0
    }
}
