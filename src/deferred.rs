//! The settlement cell and the producer side of it.
//!
//! A [`Deferred`] is written exactly once. Only a [`Resolver`] can write it;
//! the [`Future`] handed to consumers can only subscribe.
//!
//! # Examples
//!
//! ```
//! use wate::{run, Resolver};
//! use std::sync::{Arc, Mutex};
//!
//! let (resolver, future) = Resolver::<String, i32>::new();
//! let seen = Arc::new(Mutex::new(None));
//! let sink = seen.clone();
//! future.done(move |error, value| *sink.lock().unwrap() = Some((error, value)));
//!
//! resolver.fulfill(7);
//! // Nothing is delivered until the scheduler turns.
//! assert!(seen.lock().unwrap().is_none());
//! run();
//! assert_eq!(*seen.lock().unwrap(), Some((None, Some(7))));
//! ```
use crate::{Channel, Error, Future, Outcome, Scheduler};
use parking_lot::Mutex;
use std::{fmt, sync::Arc};

pub(crate) type Listener<E, V> = Box<dyn FnOnce(Option<E>, Option<V>) + Send>;

/// The write-once settlement state of a [`Future`].
pub struct Deferred<E, V> {
    scheduler: Scheduler,
    inner: Mutex<Inner<E, V>>,
}

struct Inner<E, V> {
    outcome: Option<Outcome<E, V>>,
    listeners: Vec<Listener<E, V>>,
}

impl<E, V> fmt::Debug for Deferred<E, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("Deferred")
            .field("settled", &inner.outcome.is_some())
            .field("listeners", &inner.listeners.len())
            .finish()
    }
}

impl<E: Channel, V: Channel> Deferred<E, V> {
    pub(crate) fn new(scheduler: Scheduler) -> Arc<Self> {
        Arc::new(Self {
            scheduler,
            inner: Mutex::new(Inner {
                outcome: None,
                listeners: Vec::new(),
            }),
        })
    }

    pub(crate) fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub(crate) fn is_settled(&self) -> bool {
        self.inner.lock().outcome.is_some()
    }

    pub(crate) fn settle(
        self: &Arc<Self>,
        error: Option<E>,
        value: Option<V>,
    ) -> Result<(), Error> {
        let mut inner = self.inner.lock();
        if inner.outcome.is_some() {
            return Err(Error::DoubleSettlement);
        }
        inner.outcome = Some(Outcome::new(error, value));
        let waiting = inner.listeners.len();
        // Queue while still locked so late subscribers line up behind the flush.
        if waiting > 0 {
            let cell = Arc::clone(self);
            self.scheduler.schedule(move || cell.flush());
        }
        drop(inner);

        tracing::trace!(waiting, "cell settled");
        Ok(())
    }

    /// Deliver to every listener registered before the settlement.
    fn flush(&self) {
        let (listeners, outcome) = {
            let mut inner = self.inner.lock();
            let listeners = std::mem::take(&mut inner.listeners);
            (listeners, inner.outcome.clone())
        };
        let Some(outcome) = outcome else {
            return;
        };
        tracing::trace!(listeners = listeners.len(), "flushing settlement");
        for listener in listeners {
            listener(outcome.error.clone(), outcome.value.clone());
        }
    }

    pub(crate) fn subscribe(&self, listener: Listener<E, V>) {
        let mut inner = self.inner.lock();
        let settled = inner.outcome.clone();
        match settled {
            Some(outcome) => self
                .scheduler
                .schedule(move || listener(outcome.error, outcome.value)),
            None => inner.listeners.push(listener),
        }
    }
}

/// The settlement capability for one cell. Clones share the cell, so the
/// second of any two settlements through any clone is rejected.
pub struct Resolver<E, V> {
    cell: Arc<Deferred<E, V>>,
}

impl<E, V> Clone for Resolver<E, V> {
    fn clone(&self) -> Self {
        Self {
            cell: Arc::clone(&self.cell),
        }
    }
}

impl<E, V> fmt::Debug for Resolver<E, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Resolver").field(&self.cell).finish()
    }
}

impl<E: Channel, V: Channel> Resolver<E, V> {
    /// A fresh unsettled cell on the current thread's scheduler.
    pub fn new() -> (Self, Future<E, V>) {
        Self::with_scheduler(Scheduler::current())
    }

    pub fn with_scheduler(scheduler: Scheduler) -> (Self, Future<E, V>) {
        let cell = Deferred::new(scheduler);
        let future = Future::from_cell(Arc::clone(&cell));
        (Self { cell }, future)
    }

    /// Settle with an error-first pair, reporting a repeated settlement
    /// instead of panicking.
    pub fn try_settle(&self, error: Option<E>, value: Option<V>) -> Result<(), Error> {
        self.cell.settle(error, value)
    }

    /// Settle with an error-first pair.
    ///
    /// # Panics
    ///
    /// Panics if the cell was already settled.
    pub fn settle(&self, error: Option<E>, value: Option<V>) {
        if let Err(err) = self.try_settle(error, value) {
            tracing::error!(%err, "settlement callback invoked twice");
            panic!("{err}");
        }
    }

    /// # Panics
    ///
    /// Panics if the cell was already settled.
    pub fn fulfill(&self, value: V) {
        self.settle(None, Some(value));
    }

    /// # Panics
    ///
    /// Panics if the cell was already settled.
    pub fn reject(&self, error: E) {
        self.settle(Some(error), None);
    }

    pub fn is_settled(&self) -> bool {
        self.cell.is_settled()
    }
}
