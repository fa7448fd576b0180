//! Synthetic process handle backing the fake connection's lifecycle.

use std::cell::Cell;
use std::rc::Rc;
use std::sync::atomic::{AtomicU32, Ordering};

use tracing::debug;

use crate::connection::CONNECTION_TARGET;

/// Pids start well above typical real pids so they read as synthetic in logs.
const FAKE_PID_BASE: u32 = 50_000;

static NEXT_PID: AtomicU32 = AtomicU32::new(FAKE_PID_BASE);

fn next_fake_pid() -> u32 {
    NEXT_PID.fetch_add(1, Ordering::SeqCst)
}

/// Process-lifecycle facade for a connection that never spawned a process.
///
/// Clones share the stop flag, so the handle returned to the framework and
/// the one held by the connection observe the same state. The pid is fixed
/// at construction; the stopped flag transitions `false → true` only.
#[derive(Debug, Clone)]
pub struct FakeProcessHandle {
    pid: u32,
    stopped: Rc<Cell<bool>>,
}

impl FakeProcessHandle {
    pub(crate) fn new() -> Self {
        Self {
            pid: next_fake_pid(),
            stopped: Rc::new(Cell::new(false)),
        }
    }

    /// Pid reported to the client framework.
    #[must_use]
    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// Whether the fake process has been terminated.
    #[must_use]
    pub fn is_closing(&self) -> bool {
        self.stopped.get()
    }

    /// Marks the fake process terminated. Idempotent; the flag never resets.
    pub fn kill(&self) {
        if !self.stopped.replace(true) {
            debug!(
                target: CONNECTION_TARGET,
                pid = self.pid,
                "fake server process killed"
            );
        }
    }
}
