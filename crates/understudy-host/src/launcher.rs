//! Interception of the framework's transport-start entry point.
//!
//! Instead of patching a global function, the framework is pointed at a
//! [`LauncherTable`]: a process-wide slot holding the active
//! [`TransportStart`] strategy. [`LauncherTable::setup`] installs an
//! [`InterceptingLauncher`] in front of the original strategy;
//! [`LauncherTable::restore`] reinstates the original (test teardown).

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde_json::Value;
use tracing::debug;
use understudy_config::SettingsStore;

use crate::client::ClientResolver;
use crate::connection::{DispatcherCallbacks, FakeServerConnection, ServerConnection};
use crate::handler::HandlerSet;
use crate::scheduler::CallbackScheduler;

/// Log target for launcher operations.
const LAUNCHER_TARGET: &str = "understudy_host::launcher";

/// Integration name under which the fake transport registers itself.
pub const INTEGRATION_NAME: &str = "understudy";

/// Arguments the framework passes when starting a server transport.
#[derive(Debug)]
pub struct LaunchRequest {
    /// Executable the framework believes it is starting.
    pub command: String,
    /// Arguments for the executable; unused on the intercepted path.
    pub args: Vec<String>,
    /// Lifecycle callbacks supplied by the framework.
    pub dispatchers: DispatcherCallbacks,
    /// Framework-specific start options, forwarded untouched to a real
    /// transport and unused on the intercepted path.
    pub extra: Value,
}

/// Strategy establishing a server connection for a launch request.
///
/// The framework's real entry point spawns a process; the fake strategy
/// returns an in-process connection instead.
pub trait TransportStart {
    /// Establishes a connection for the launch request.
    fn start(&self, launch: LaunchRequest) -> Rc<dyn ServerConnection>;
}

impl fmt::Debug for dyn TransportStart {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("TransportStart")
    }
}

/// Decorator over the original transport strategy.
///
/// Consults the settings store for [`INTEGRATION_NAME`]; when the declared
/// command equals the launch command, a [`FakeServerConnection`] is built
/// from the launch's dispatcher callbacks alone — `command`, `args`, and
/// `extra` have no process to configure. Any other launch is delegated to
/// the original strategy with all four members intact.
pub struct InterceptingLauncher {
    original: Rc<dyn TransportStart>,
    settings: Rc<SettingsStore>,
    handlers: HandlerSet,
    clients: Rc<dyn ClientResolver>,
    scheduler: Rc<CallbackScheduler>,
}

impl InterceptingLauncher {
    /// Builds the decorator around the original strategy.
    #[must_use]
    pub fn new(
        original: Rc<dyn TransportStart>,
        settings: Rc<SettingsStore>,
        handlers: HandlerSet,
        clients: Rc<dyn ClientResolver>,
        scheduler: Rc<CallbackScheduler>,
    ) -> Self {
        Self {
            original,
            settings,
            handlers,
            clients,
            scheduler,
        }
    }

    fn matches(&self, command: &str) -> bool {
        self.settings
            .lookup(INTEGRATION_NAME)
            .is_some_and(|integration| integration.command() == command)
    }
}

impl TransportStart for InterceptingLauncher {
    fn start(&self, launch: LaunchRequest) -> Rc<dyn ServerConnection> {
        if self.matches(&launch.command) {
            debug!(
                target: LAUNCHER_TARGET,
                command = %launch.command,
                "intercepting transport start"
            );
            return Rc::new(FakeServerConnection::start(
                launch.dispatchers,
                self.handlers.clone(),
                Rc::clone(&self.clients),
                Rc::clone(&self.scheduler),
            ));
        }
        self.original.start(launch)
    }
}

impl fmt::Debug for InterceptingLauncher {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("InterceptingLauncher")
            .field("handlers", &self.handlers)
            .finish()
    }
}

/// Process-wide slot holding the active transport strategy.
///
/// The framework resolves its transport-start through
/// [`current`](Self::current) on every launch, so swapping the slot changes
/// behaviour without touching the framework itself.
#[derive(Debug)]
pub struct LauncherTable {
    original: Rc<dyn TransportStart>,
    active: RefCell<Rc<dyn TransportStart>>,
}

impl LauncherTable {
    /// Creates a table that initially delegates every launch unchanged.
    #[must_use]
    pub fn new(original: Rc<dyn TransportStart>) -> Self {
        let active = RefCell::new(Rc::clone(&original));
        Self { original, active }
    }

    /// Installs the intercepting strategy in front of the original.
    pub fn setup(
        &self,
        settings: Rc<SettingsStore>,
        handlers: HandlerSet,
        clients: Rc<dyn ClientResolver>,
        scheduler: Rc<CallbackScheduler>,
    ) {
        let interceptor = InterceptingLauncher::new(
            Rc::clone(&self.original),
            settings,
            handlers,
            clients,
            scheduler,
        );
        *self.active.borrow_mut() = Rc::new(interceptor);
        debug!(target: LAUNCHER_TARGET, "transport interception installed");
    }

    /// Reinstates the original strategy.
    pub fn restore(&self) {
        *self.active.borrow_mut() = Rc::clone(&self.original);
        debug!(target: LAUNCHER_TARGET, "transport interception removed");
    }

    /// Strategy the framework should currently call.
    #[must_use]
    pub fn current(&self) -> Rc<dyn TransportStart> {
        Rc::clone(&self.active.borrow())
    }

    /// Whether the active strategy differs from the original.
    #[must_use]
    pub fn is_intercepting(&self) -> bool {
        !Rc::ptr_eq(&self.original, &self.active.borrow())
    }
}
