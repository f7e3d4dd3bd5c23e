//! Ways to bring a [`Future`] into existence.
use crate::{Channel, Future, Resolver, Scheduler};

/// Success entry point handed to [`create`] builders.
pub type Fulfill<V> = Box<dyn FnOnce(V) + Send>;
/// Failure entry point handed to [`create`] builders.
pub type Reject<E> = Box<dyn FnOnce(E) + Send>;

/// Build a future from an error-first settlement callback.
///
/// The builder runs synchronously, before `make` returns; it may settle right
/// away or keep the resolver around and settle later.
///
/// # Examples
///
/// ```
/// use wate::{make, run};
///
/// let future = make::<String, i32, _>(|resolver| resolver.settle(None, Some(10)));
/// future.done(|error, value| assert_eq!((error, value), (None, Some(10))));
/// run();
/// ```
pub fn make<E, V, B>(builder: B) -> Future<E, V>
where
    E: Channel,
    V: Channel,
    B: FnOnce(Resolver<E, V>),
{
    make_on(Scheduler::current(), builder)
}

/// [`make`] with the cell attached to `scheduler` instead of the current one.
pub(crate) fn make_on<E, V, B>(scheduler: Scheduler, builder: B) -> Future<E, V>
where
    E: Channel,
    V: Channel,
    B: FnOnce(Resolver<E, V>),
{
    let (resolver, future) = Resolver::with_scheduler(scheduler);
    builder(resolver);
    future
}

/// Build a future from separate `fulfill` and `reject` callbacks.
///
/// Calling both, or either twice through clones of the underlying resolver,
/// is a double settlement and panics.
pub fn create<E, V, B>(builder: B) -> Future<E, V>
where
    E: Channel,
    V: Channel,
    B: FnOnce(Fulfill<V>, Reject<E>),
{
    make(|resolver: Resolver<E, V>| {
        let on_error = resolver.clone();
        builder(
            Box::new(move |value| resolver.fulfill(value)),
            Box::new(move |error| on_error.reject(error)),
        );
    })
}

/// A future already settled with `value`.
pub fn value<E: Channel, V: Channel>(value: V) -> Future<E, V> {
    create(|fulfill, _| fulfill(value))
}

/// A future already settled with `error`.
pub fn error<E: Channel, V: Channel>(error: E) -> Future<E, V> {
    make(|resolver| resolver.settle(Some(error), None))
}
