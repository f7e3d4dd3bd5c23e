use crate::{deferred::Deferred, wait::Waiter, Channel, Scheduler};
use std::{fmt, future::IntoFuture, sync::Arc};

/// A read-only handle on a settlement cell.
///
/// A `Future` can subscribe to its cell's settlement but never settle it.
/// Clones share the cell.
pub struct Future<E, V> {
    cell: Arc<Deferred<E, V>>,
}

impl<E, V> Clone for Future<E, V> {
    fn clone(&self) -> Self {
        Self {
            cell: Arc::clone(&self.cell),
        }
    }
}

impl<E, V> fmt::Debug for Future<E, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Future").field(&self.cell).finish()
    }
}

impl<E: Channel, V: Channel> Future<E, V> {
    pub(crate) fn from_cell(cell: Arc<Deferred<E, V>>) -> Self {
        Self { cell }
    }

    /// Register `listener` for the settlement. It runs exactly once, on a
    /// later scheduler turn, even if the cell has already settled.
    pub fn done<F>(&self, listener: F) -> &Self
    where
        F: FnOnce(Option<E>, Option<V>) + Send + 'static,
    {
        self.cell.subscribe(Box::new(listener));
        self
    }

    /// Register a listener for the error channel only.
    pub fn catch<F>(&self, on_error: F) -> &Self
    where
        F: FnOnce(E) + Send + 'static,
    {
        self.done(move |error, _| {
            if let Some(error) = error {
                on_error(error);
            }
        })
    }

    pub fn is_settled(&self) -> bool {
        self.cell.is_settled()
    }

    /// The scheduler that delivers this future's settlement.
    pub fn scheduler(&self) -> &Scheduler {
        self.cell.scheduler()
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.cell, &other.cell)
    }
}

impl<E: Channel, V: Channel> IntoFuture for Future<E, V> {
    type Output = crate::Outcome<E, V>;
    type IntoFuture = Waiter<E, V>;

    fn into_future(self) -> Self::IntoFuture {
        Waiter::subscribe(&self)
    }
}

#[cfg(test)]
mod tests {
    use crate::{error, run, value};
    use std::sync::{Arc, Mutex};

    #[test]
    fn done_chains_and_shares_the_cell() {
        let future = value::<String, i32>(3);
        let copy = future.clone();
        assert!(future.ptr_eq(&copy));

        let hits = Arc::new(Mutex::new(Vec::new()));
        let (a, b) = (hits.clone(), hits.clone());
        future
            .done(move |_, v| a.lock().unwrap().push(v))
            .done(move |_, v| b.lock().unwrap().push(v.map(|v| v * 10)));
        run();
        assert_eq!(*hits.lock().unwrap(), vec![Some(3), Some(30)]);
    }

    #[test]
    fn catch_sees_only_errors() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let (a, b) = (seen.clone(), seen.clone());
        error::<String, i32>("oops".into()).catch(move |e| a.lock().unwrap().push(e));
        value::<String, i32>(1).catch(move |e| b.lock().unwrap().push(e));
        run();
        assert_eq!(*seen.lock().unwrap(), vec!["oops".to_string()]);
    }

    #[test]
    fn factories_settle_synchronously_but_deliver_later() {
        let future = value::<String, i32>(1);
        assert!(future.is_settled());
        assert_eq!(future.scheduler().pending(), 0);
        future.done(|_, _| {});
        assert_eq!(future.scheduler().pending(), 1);
        run();
    }
}
