//! The task queue that delivers settlements.
//!
//! Listeners never run inline with `settle` or `done`: both only enqueue work
//! here, and the work runs when the owning thread drives the queue with
//! [`run`] or [`Scheduler::run_until_idle`].
use parking_lot::Mutex;
use std::{cell::RefCell, collections::VecDeque, fmt, sync::Arc};

type Task = Box<dyn FnOnce() + Send>;

thread_local! {
    static CURRENT: RefCell<Scheduler> = RefCell::new(Scheduler::new());
}

/// A FIFO queue of deferred callbacks. Cloning shares the queue.
#[derive(Clone, Default)]
pub struct Scheduler {
    queue: Arc<Mutex<VecDeque<Task>>>,
}

impl fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheduler")
            .field("pending", &self.pending())
            .finish()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// The scheduler new cells on this thread attach to.
    pub fn current() -> Self {
        CURRENT.with(|current| current.borrow().clone())
    }

    /// Make `self` the current scheduler until the guard is dropped.
    ///
    /// Only cells created from scratch pick up the current scheduler.
    /// Combinators and transforms deliver through the scheduler of their
    /// (first present) input, wherever they are called.
    pub fn enter(&self) -> EnterGuard {
        let previous = CURRENT.with(|current| current.replace(self.clone()));
        EnterGuard {
            previous: Some(previous),
        }
    }

    pub fn schedule<F>(&self, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.queue.lock().push_back(Box::new(task));
    }

    pub fn pending(&self) -> usize {
        self.queue.lock().len()
    }

    pub fn same_queue(&self, other: &Scheduler) -> bool {
        Arc::ptr_eq(&self.queue, &other.queue)
    }

    /// Run a single task. Returns `false` if the queue was empty.
    pub fn turn(&self) -> bool {
        // The lock must be released before the task runs: tasks enqueue more work.
        let task = self.queue.lock().pop_front();
        match task {
            Some(task) => {
                task();
                true
            }
            None => false,
        }
    }

    /// Run tasks, including any they enqueue, until the queue is empty.
    pub fn run_until_idle(&self) -> usize {
        let mut ran = 0;
        while self.turn() {
            ran += 1;
        }
        tracing::trace!(ran, "scheduler idle");
        ran
    }
}

/// Restores the previously current scheduler on drop.
#[must_use = "the scheduler is only current while the guard is alive"]
pub struct EnterGuard {
    previous: Option<Scheduler>,
}

impl Drop for EnterGuard {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            CURRENT.with(|current| current.replace(previous));
        }
    }
}

/// Drive this thread's current scheduler until it is idle.
pub fn run() -> usize {
    Scheduler::current().run_until_idle()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn tasks_run_in_fifo_order() {
        crate::test_utils::init_test_logging();
        let scheduler = Scheduler::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        for i in 0..3 {
            let log = log.clone();
            scheduler.schedule(move || log.lock().push(i));
        }
        assert_eq!(scheduler.pending(), 3);
        assert_eq!(scheduler.run_until_idle(), 3);
        assert_eq!(*log.lock(), vec![0, 1, 2]);
    }

    #[test]
    fn tasks_scheduled_during_a_turn_run_later() {
        let scheduler = Scheduler::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let inner = scheduler.clone();
        let counter = hits.clone();
        scheduler.schedule(move || {
            let counter = counter.clone();
            inner.schedule(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        });
        assert!(scheduler.turn());
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert!(scheduler.turn());
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert!(!scheduler.turn());
    }

    #[test]
    fn enter_swaps_current_and_restores() {
        let outer = Scheduler::current();
        let other = Scheduler::new();
        {
            let _guard = other.enter();
            assert!(Scheduler::current().same_queue(&other));
        }
        assert!(Scheduler::current().same_queue(&outer));
    }
}
