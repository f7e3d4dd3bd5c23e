//! Settle-once futures that carry an error or a value, and a library of
//! combinators for composing them.
//!
//! A [`Future`] is a read-only handle on a cell that a [`Resolver`] settles
//! exactly once with an `(error, value)` pair. Listeners registered with
//! [`Future::done`] are delivered on a later turn of the thread's
//! [`Scheduler`], never inline with the settlement, so drive it with [`run`].
//!
//! # Examples
//!
//! ```
//! use wate::{all, bind_value, create, run, value};
//! use std::sync::{Arc, Mutex};
//!
//! let slow = create::<String, i32, _>(|fulfill, _reject| fulfill(3));
//! let total = bind_value(all(vec![value(1), value(2), slow]), |values| {
//!     values.into_iter().flatten().sum::<i32>()
//! });
//!
//! let seen = Arc::new(Mutex::new(None));
//! let sink = seen.clone();
//! total.done(move |error, value| *sink.lock().unwrap() = Some((error, value)));
//! run();
//! assert_eq!(*seen.lock().unwrap(), Some((None, Some(6))));
//! ```
use thiserror::Error;

mod collect;
pub mod deferred;
mod factory;
mod future;
mod outcome;
pub mod promise;
pub mod scheduler;
mod spread;
mod transform;
pub mod wait;

#[cfg(test)]
mod test_utils;

pub use collect::{
    all, concat_errors, concat_values, first_error, first_value, last_error, last_value, none,
    settled,
};
pub use deferred::{Deferred, Resolver};
pub use factory::{create, error, make, value, Fulfill, Reject};
pub use future::Future;
pub use outcome::Outcome;
pub use promise::{
    from_event_source, from_promise, to_promise, EventHandler, EventSource, Promise, Thenable,
};
pub use scheduler::{run, Scheduler};
pub use spread::{spread_all, spread_errors, spread_none, spread_values, Spread};
pub use transform::{
    bind, bind_error, bind_errors, bind_value, bind_values, flat_bind, flatten, invert, then,
    unwrap_error, unwrap_value, Bind, FlatBind, IntoNested, Many, Nested, One,
};

pub use collect::{concat_values as concat, first_value as first, last_value as last};
pub use spread::{
    spread_all as splat, spread_all as splat_all, spread_errors as splat_errors,
    spread_values as splat_values,
};
pub use transform::{
    bind as transform, bind_error as transform_error, bind_value as transform_value,
    flat_bind as flat_transform, unwrap_value as unwrap,
};

/// Types that can travel through a settlement channel. A settlement is
/// delivered to every listener, so each gets its own clone.
pub trait Channel: Clone + Send + 'static {}

impl<T: Clone + Send + 'static> Channel for T {}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("deferred cell settled twice")]
    DoubleSettlement,
    #[error("arrival bookkeeping overflow: more settlements than the {capacity} futures registered")]
    ArrivalOverflow { capacity: usize },
}
