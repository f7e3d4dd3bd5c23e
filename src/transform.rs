//! Single-future transformations: mapping one channel, collapsing nested
//! futures, and swapping channels.
//!
//! Transform closures are not guarded. A panic inside one unwinds out of the
//! scheduler turn that invoked it.
use crate::{all, factory::make_on, none, Channel, Future, Spread};
use std::marker::PhantomData;

/// Promises/A style `then`: `on_value` on success, `on_error` on failure.
pub fn then<E, V, F, G>(future: &Future<E, V>, on_value: F, on_error: G) -> &Future<E, V>
where
    E: Channel,
    V: Channel,
    F: FnOnce(Option<V>) + Send + 'static,
    G: FnOnce(E) + Send + 'static,
{
    future.done(move |error, value| match error {
        Some(error) => on_error(error),
        None => on_value(value),
    })
}

/// Map the value channel. Errors pass through and `transform` is not called.
///
/// A success without a value also passes through untouched.
///
/// # Examples
///
/// ```
/// use wate::{bind_value, run, value};
///
/// let doubled = bind_value(value::<String, i32>(10), |v| v * 2);
/// doubled.done(|error, value| assert_eq!((error, value), (None, Some(20))));
/// run();
/// ```
pub fn bind_value<E, V, U, F>(future: Future<E, V>, transform: F) -> Future<E, U>
where
    E: Channel,
    V: Channel,
    U: Channel,
    F: FnOnce(V) -> U + Send + 'static,
{
    make_on(future.scheduler().clone(), move |resolver| {
        future.done(move |error, value| match (error, value) {
            (Some(error), _) => resolver.reject(error),
            (None, Some(value)) => resolver.fulfill(transform(value)),
            (None, None) => resolver.settle(None, None),
        });
    })
}

/// Map the error channel. Successes pass through and `transform` is not called.
pub fn bind_error<E, V, O, F>(future: Future<E, V>, transform: F) -> Future<O, V>
where
    E: Channel,
    V: Channel,
    O: Channel,
    F: FnOnce(E) -> O + Send + 'static,
{
    make_on(future.scheduler().clone(), move |resolver| {
        future.done(move |error, value| match error {
            Some(error) => resolver.reject(transform(error)),
            None => resolver.settle(None, value),
        });
    })
}

/// [`all`] the futures, then spread the values into an n-ary transform.
pub fn bind_values<E, V, I, Args, F>(futures: I, transform: F) -> Future<E, F::Output>
where
    E: Channel,
    V: Channel,
    I: IntoIterator,
    I::Item: Into<Option<Future<E, V>>>,
    F: Spread<V, Args> + Send + 'static,
    F::Output: Channel,
{
    let combined = all(futures);
    make_on(combined.scheduler().clone(), move |resolver| {
        combined.done(move |error, values| match error {
            Some(error) => resolver.reject(error),
            None => resolver.fulfill(transform.spread(values.unwrap_or_default())),
        });
    })
}

/// [`none`] the futures, then spread the errors into an n-ary transform if
/// every one failed.
pub fn bind_errors<E, V, I, Args, F>(futures: I, transform: F) -> Future<F::Output, V>
where
    E: Channel,
    V: Channel,
    I: IntoIterator,
    I::Item: Into<Option<Future<E, V>>>,
    F: Spread<E, Args> + Send + 'static,
    F::Output: Channel,
{
    let combined = none(futures);
    make_on(combined.scheduler().clone(), move |resolver| {
        combined.done(move |errors, value| match errors {
            Some(errors) => resolver.reject(transform.spread(errors)),
            None => resolver.settle(None, value),
        });
    })
}

/// Shape marker for binding a single future.
#[derive(Debug)]
pub struct One;

/// Shape marker for binding a list of futures with an n-ary transform.
#[derive(Debug)]
pub struct Many<Args>(PhantomData<Args>);

/// Dispatch for [`bind`] over the shape of the input.
pub trait Bind<F, Shape> {
    type Error: Channel;
    type Value: Channel;

    fn bind(self, transform: F) -> Future<Self::Error, Self::Value>;
}

impl<E, V, U, F> Bind<F, One> for Future<E, V>
where
    E: Channel,
    V: Channel,
    U: Channel,
    F: FnOnce(V) -> U + Send + 'static,
{
    type Error = E;
    type Value = U;

    fn bind(self, transform: F) -> Future<E, U> {
        bind_value(self, transform)
    }
}

impl<E, V, Args, F> Bind<F, Many<Args>> for Vec<Future<E, V>>
where
    E: Channel,
    V: Channel,
    F: Spread<V, Args> + Send + 'static,
    F::Output: Channel,
{
    type Error = E;
    type Value = F::Output;

    fn bind(self, transform: F) -> Future<E, F::Output> {
        bind_values(self, transform)
    }
}

/// Map a single future's value, or spread the values of a list of futures
/// into an n-ary transform.
///
/// # Examples
///
/// ```
/// use wate::{bind, run, value};
///
/// let sum = bind(
///     vec![value::<String, i32>(1), value(2)],
///     |a: Option<i32>, b: Option<i32>| a.unwrap_or(0) + b.unwrap_or(0),
/// );
/// let label = bind(sum, |total: i32| format!("total {total}"));
/// label.done(|_, value| assert_eq!(value.as_deref(), Some("total 3")));
/// run();
/// ```
pub fn bind<S, F, Shape>(source: S, transform: F) -> Future<S::Error, S::Value>
where
    S: Bind<F, Shape>,
{
    source.bind(transform)
}

/// Collapse one level of nesting on the value channel.
pub fn unwrap_value<E, V>(future: Future<E, Future<E, V>>) -> Future<E, V>
where
    E: Channel,
    V: Channel,
{
    make_on(future.scheduler().clone(), move |resolver| {
        future.done(move |error, inner| match (error, inner) {
            (Some(error), _) => resolver.reject(error),
            (None, Some(inner)) => {
                inner.done(move |error, value| resolver.settle(error, value));
            }
            (None, None) => resolver.settle(None, None),
        });
    })
}

/// Collapse one level of nesting on the error channel.
pub fn unwrap_error<E, V>(future: Future<Future<E, V>, V>) -> Future<E, V>
where
    E: Channel,
    V: Channel,
{
    make_on(future.scheduler().clone(), move |resolver| {
        future.done(move |inner, value| match inner {
            None => resolver.settle(None, value),
            Some(inner) => {
                inner.done(move |error, value| resolver.settle(error, value));
            }
        });
    })
}

/// A value that may still be behind any number of futures.
#[derive(Debug)]
pub enum Nested<E, V> {
    Value(V),
    Future(Future<E, Nested<E, V>>),
}

impl<E: Clone, V: Clone> Clone for Nested<E, V> {
    fn clone(&self) -> Self {
        match self {
            Nested::Value(value) => Nested::Value(value.clone()),
            Nested::Future(future) => Nested::Future(future.clone()),
        }
    }
}

impl<E: Channel, V: Channel> From<Future<E, V>> for Nested<E, V> {
    fn from(future: Future<E, V>) -> Self {
        Nested::Future(bind_value(future, Nested::Value))
    }
}

/// Follow the value channel through every level of nesting. An error at any
/// level settles the result immediately.
pub fn flatten<E, V>(future: Future<E, Nested<E, V>>) -> Future<E, V>
where
    E: Channel,
    V: Channel,
{
    make_on(future.scheduler().clone(), move |resolver| {
        fn descend<E: Channel, V: Channel>(
            future: Future<E, Nested<E, V>>,
            resolver: crate::Resolver<E, V>,
        ) {
            future.done(move |error, value| match (error, value) {
                (Some(error), _) => resolver.reject(error),
                (None, Some(Nested::Future(inner))) => descend(inner, resolver),
                (None, Some(Nested::Value(value))) => resolver.fulfill(value),
                (None, None) => resolver.settle(None, None),
            });
        }
        descend(future, resolver);
    })
}

/// Anything a flat-bound transform may return: a plain future or a
/// [`Nested`] chain.
pub trait IntoNested<E> {
    type Value: Channel;

    fn into_nested(self) -> Nested<E, Self::Value>;
}

impl<E: Channel, V: Channel> IntoNested<E> for Future<E, V> {
    type Value = V;

    fn into_nested(self) -> Nested<E, V> {
        self.into()
    }
}

impl<E: Channel, V: Channel> IntoNested<E> for Nested<E, V> {
    type Value = V;

    fn into_nested(self) -> Nested<E, V> {
        self
    }
}

/// Dispatch for [`flat_bind`] over the shape of the input.
pub trait FlatBind<F, Shape> {
    type Error: Channel;
    type Value: Channel;

    fn flat_bind(self, transform: F) -> Future<Self::Error, Self::Value>;
}

impl<E, V, R, F> FlatBind<F, One> for Future<E, V>
where
    E: Channel,
    V: Channel,
    R: IntoNested<E>,
    F: FnOnce(V) -> R + Send + 'static,
{
    type Error = E;
    type Value = R::Value;

    fn flat_bind(self, transform: F) -> Future<E, R::Value> {
        flatten(bind_value(self, move |value| transform(value).into_nested()))
    }
}

impl<E, V, Args, F> FlatBind<F, Many<Args>> for Vec<Future<E, V>>
where
    E: Channel,
    V: Channel,
    F: Spread<V, Args> + Send + 'static,
    F::Output: IntoNested<E>,
{
    type Error = E;
    type Value = <F::Output as IntoNested<E>>::Value;

    fn flat_bind(self, transform: F) -> Future<E, Self::Value> {
        let combined = all(self);
        flatten(make_on(combined.scheduler().clone(), move |resolver| {
            combined.done(move |error, values| match error {
                Some(error) => resolver.reject(error),
                None => {
                    let spread = transform.spread(values.unwrap_or_default());
                    resolver.fulfill(spread.into_nested());
                }
            });
        }))
    }
}

/// Bind, then [`flatten`] whatever the transform returned.
///
/// # Examples
///
/// ```
/// use wate::{flat_bind, run, value, Future};
///
/// let looked_up = flat_bind(value::<String, i32>(4), |key: i32| -> Future<String, String> {
///     value(format!("row {key}"))
/// });
/// looked_up.done(|_, row| assert_eq!(row.as_deref(), Some("row 4")));
/// run();
/// ```
pub fn flat_bind<S, F, Shape>(source: S, transform: F) -> Future<S::Error, S::Value>
where
    S: FlatBind<F, Shape>,
{
    source.flat_bind(transform)
}

/// Swap the channels: a success becomes a failure carrying the value, and a
/// failure becomes a success carrying the error.
pub fn invert<E, V>(future: Future<E, V>) -> Future<V, E>
where
    E: Channel,
    V: Channel,
{
    make_on(future.scheduler().clone(), move |resolver| {
        future.done(move |error, value| resolver.settle(value, error));
    })
}
