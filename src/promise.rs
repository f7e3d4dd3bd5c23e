//! Bridges to two-callback interfaces: Promises/A style thenables and
//! load/error event sources.
use crate::{make, then, Channel, Future};

/// Anything with a Promises/A style `then(on_value, on_error)`.
pub trait Thenable<E, V> {
    fn then<F, G>(self, on_value: F, on_error: G)
    where
        F: FnOnce(Option<V>) + Send + 'static,
        G: FnOnce(E) + Send + 'static;
}

/// A [`Future`] seen through the [`Thenable`] interface.
///
/// # Examples
///
/// ```
/// use wate::{from_promise, run, to_promise, value};
///
/// let round_trip = from_promise(to_promise(value::<String, i32>(10)));
/// round_trip.done(|error, value| assert_eq!((error, value), (None, Some(10))));
/// run();
/// ```
#[derive(Debug, Clone)]
pub struct Promise<E, V> {
    future: Future<E, V>,
}

impl<E: Channel, V: Channel> Promise<E, V> {
    pub fn into_inner(self) -> Future<E, V> {
        self.future
    }
}

impl<E: Channel, V: Channel> Thenable<E, V> for Promise<E, V> {
    fn then<F, G>(self, on_value: F, on_error: G)
    where
        F: FnOnce(Option<V>) + Send + 'static,
        G: FnOnce(E) + Send + 'static,
    {
        then(&self.future, on_value, on_error);
    }
}

pub fn to_promise<E: Channel, V: Channel>(future: Future<E, V>) -> Promise<E, V> {
    Promise { future }
}

pub fn from_promise<E, V, P>(promise: P) -> Future<E, V>
where
    E: Channel,
    V: Channel,
    P: Thenable<E, V>,
{
    make(|resolver| {
        let on_error = resolver.clone();
        promise.then(
            move |value| resolver.settle(None, value),
            move |error| on_error.reject(error),
        );
    })
}

/// A callback registered on an [`EventSource`].
///
/// Error handlers always take a payload, so an error event cannot arrive
/// without something to fail with. Sources that carry no detail use `()`.
pub enum EventHandler<E> {
    Load(Box<dyn FnMut() + Send>),
    Error(Box<dyn FnMut(E) + Send>),
}

impl<E> EventHandler<E> {
    /// The event name this handler listens for.
    pub fn event(&self) -> &'static str {
        match self {
            EventHandler::Load(_) => LOAD_EVENT,
            EventHandler::Error(_) => ERROR_EVENT,
        }
    }
}

/// Something that emits a `"load"` event on success and an `"error"` event on
/// failure.
pub trait EventSource {
    type Error;

    fn add_event_listener(&self, event: &str, handler: EventHandler<Self::Error>);
}

pub const LOAD_EVENT: &str = "load";
pub const ERROR_EVENT: &str = "error";

/// Settle with the source itself once it loads, or with the error it
/// reports. A second event from the source is a double settlement.
pub fn from_event_source<S>(source: S) -> Future<S::Error, S>
where
    S: EventSource + Channel,
    S::Error: Channel,
{
    make(|resolver| {
        let loaded = source.clone();
        let on_load = resolver.clone();
        source.add_event_listener(
            LOAD_EVENT,
            EventHandler::Load(Box::new(move || on_load.fulfill(loaded.clone()))),
        );
        source.add_event_listener(
            ERROR_EVENT,
            EventHandler::Error(Box::new(move |error| {
                tracing::debug!(event = ERROR_EVENT, "event source failed");
                resolver.reject(error);
            })),
        );
    })
}
