//! Deferred callback execution on the host's single cooperative thread.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;

type Task = Box<dyn FnOnce()>;

/// FIFO queue of callbacks awaiting the next scheduler tick.
///
/// The editor host runs one cooperative event thread; response callbacks are
/// queued here rather than invoked inside `request`/`notify`, so a caller
/// always observes the allocated message id before any response fires.
/// Tests drain the queue deterministically with [`run_pending`].
///
/// [`run_pending`]: CallbackScheduler::run_pending
#[derive(Default)]
pub struct CallbackScheduler {
    queue: RefCell<VecDeque<Task>>,
}

impl CallbackScheduler {
    /// Creates an empty scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a callback for the next tick.
    pub fn defer(&self, task: impl FnOnce() + 'static) {
        self.queue.borrow_mut().push_back(Box::new(task));
    }

    /// Runs every callback queued before this tick, in order, and returns
    /// how many ran. Callbacks deferred while draining wait for the
    /// following tick.
    pub fn run_pending(&self) -> usize {
        let mut due: VecDeque<Task> = std::mem::take(&mut *self.queue.borrow_mut());
        let count = due.len();
        for task in due.drain(..) {
            task();
        }
        count
    }

    /// Number of callbacks currently waiting.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }
}

impl fmt::Debug for CallbackScheduler {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("CallbackScheduler")
            .field("pending", &self.pending())
            .finish()
    }
}
