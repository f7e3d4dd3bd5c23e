//! Calling a closure with the elements of an array as positional arguments.
//!
//! Every position is an `Option<T>`: positions past the end of the array are
//! `None`, and elements past the closure's arity are dropped.
//!
//! # Examples
//!
//! ```
//! use wate::{run, spread_all, value};
//!
//! spread_all(
//!     vec![value::<String, i32>(1), value(2)],
//!     |a: Option<i32>, b: Option<i32>, c: Option<i32>| {
//!         assert_eq!((a, b, c), (Some(1), Some(2), None));
//!     },
//! );
//! run();
//! ```
use crate::{all, none, Channel, Future};

/// A closure that accepts up to eight positional `Option<T>` arguments.
///
/// `Args` is the tuple of argument types; it only disambiguates arities.
pub trait Spread<T, Args> {
    type Output;

    fn spread(self, items: Vec<Option<T>>) -> Self::Output;
}

macro_rules! spread_arity {
    (@slot $arg:ident $t:ident) => { Option<$t> };
    ($($arg:ident),*) => {
        impl<T, R, Func> Spread<T, ($(spread_arity!(@slot $arg T),)*)> for Func
        where
            Func: FnOnce($(spread_arity!(@slot $arg T)),*) -> R,
        {
            type Output = R;

            #[allow(unused_mut, unused_variables)]
            fn spread(self, items: Vec<Option<T>>) -> R {
                let mut items = items.into_iter();
                $(let $arg = items.next().flatten();)*
                (self)($($arg),*)
            }
        }
    };
}

spread_arity!();
spread_arity!(a);
spread_arity!(a, b);
spread_arity!(a, b, c);
spread_arity!(a, b, c, d);
spread_arity!(a, b, c, d, e);
spread_arity!(a, b, c, d, e, f);
spread_arity!(a, b, c, d, e, f, g);
spread_arity!(a, b, c, d, e, f, g, h);

/// On success, call `cb` with the elements of the value array.
pub fn spread_values<E, T, Args, F>(future: &Future<E, Vec<T>>, cb: F) -> &Future<E, Vec<T>>
where
    E: Channel,
    T: Channel,
    F: Spread<T, Args> + Send + 'static,
{
    future.done(move |error, values| {
        if error.is_none() {
            cb.spread(values.unwrap_or_default().into_iter().map(Some).collect());
        }
    })
}

/// On failure, call `cb` with the elements of the error array.
pub fn spread_errors<T, V, Args, F>(future: &Future<Vec<T>, V>, cb: F) -> &Future<Vec<T>, V>
where
    T: Channel,
    V: Channel,
    F: Spread<T, Args> + Send + 'static,
{
    future.done(move |errors, _| {
        if let Some(errors) = errors {
            cb.spread(errors.into_iter().map(Some).collect());
        }
    })
}

/// [`all`] the futures, then spread the values on success.
pub fn spread_all<E, V, I, Args, F>(futures: I, cb: F) -> Future<E, Vec<Option<V>>>
where
    E: Channel,
    V: Channel,
    I: IntoIterator,
    I::Item: Into<Option<Future<E, V>>>,
    F: Spread<V, Args> + Send + 'static,
{
    let combined = all(futures);
    combined.done(move |error, values| {
        if error.is_none() {
            cb.spread(values.unwrap_or_default());
        }
    });
    combined
}

/// [`none`] the futures, then spread the errors if every one failed.
pub fn spread_none<E, V, I, Args, F>(futures: I, cb: F) -> Future<Vec<Option<E>>, V>
where
    E: Channel,
    V: Channel,
    I: IntoIterator,
    I::Item: Into<Option<Future<E, V>>>,
    F: Spread<E, Args> + Send + 'static,
{
    let combined = none(futures);
    combined.done(move |errors, _| {
        if let Some(errors) = errors {
            cb.spread(errors);
        }
    });
    combined
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error, run, value};
    use std::sync::{Arc, Mutex};

    #[test]
    fn arity_pads_and_truncates() {
        let sum = |a: Option<i32>, b: Option<i32>| a.unwrap_or(0) + b.unwrap_or(0);
        assert_eq!(sum.spread(vec![Some(1), Some(2), Some(3)]), 3);
        assert_eq!(sum.spread(vec![Some(1)]), 1);
        assert_eq!(Spread::<i32, ()>::spread(|| 7, Vec::new()), 7);
    }

    #[test]
    fn spread_values_only_on_success() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let (a, b) = (calls.clone(), calls.clone());
        let pairs = value::<String, Vec<i32>>(vec![10, 20]);
        spread_values(&pairs, move |x: Option<i32>, y: Option<i32>| {
            a.lock().unwrap().push((x, y));
        });
        let failed = error::<String, Vec<i32>>("no".into());
        spread_values(&failed, move |x: Option<i32>, y: Option<i32>| {
            b.lock().unwrap().push((x, y));
        });
        run();
        assert_eq!(*calls.lock().unwrap(), vec![(Some(10), Some(20))]);
    }

    #[test]
    fn spread_errors_only_on_failure() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let sink = calls.clone();
        let failed = error::<Vec<&'static str>, i32>(vec!["a", "b"]);
        spread_errors(&failed, move |x: Option<&'static str>, y: Option<&'static str>| {
            sink.lock().unwrap().push((x, y));
        });
        spread_errors(&value::<Vec<&'static str>, i32>(1), |_: Option<&'static str>| {
            panic!("spread on success")
        });
        run();
        assert_eq!(*calls.lock().unwrap(), vec![(Some("a"), Some("b"))]);
    }

    #[test]
    fn spread_none_receives_errors_in_input_order() {
        let calls = Arc::new(Mutex::new(None));
        let sink = calls.clone();
        spread_none(
            vec![error::<&'static str, i32>("x"), error("y")],
            move |a: Option<&'static str>, b: Option<&'static str>| {
                *sink.lock().unwrap() = Some((a, b));
            },
        );
        run();
        assert_eq!(*calls.lock().unwrap(), Some((Some("x"), Some("y"))));
    }
}
