//! Combinators over lists of futures.
//!
//! Absent entries (`None`) are skipped: they never count toward completion and
//! leave a `None` hole at their index in array results. Array results follow
//! input order unless a combinator says otherwise.
use crate::{factory::make_on, invert, Channel, Error, Future, Outcome, Resolver, Scheduler};
use parking_lot::Mutex;
use std::{convert::Infallible, sync::Arc};

/// What a collector makes of one member's settlement.
enum Step<A, S> {
    /// Record `A` for this member and keep waiting.
    Keep(A),
    /// Settle the combined future with the error `S` right away.
    Halt(S),
}

/// Where kept entries land in the accumulator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Placement {
    /// At the member's input index.
    ByIndex,
    /// In the first free slot, i.e. arrival order.
    ByArrival,
}

struct Tally<A, F> {
    slots: Vec<Option<A>>,
    pending: usize,
    halted: bool,
    finish: Option<F>,
}

impl<A, F> Tally<A, F> {
    fn place(&mut self, index: usize, placement: Placement, entry: A) {
        let slot = match placement {
            Placement::ByIndex => index,
            Placement::ByArrival => match self.slots.iter().position(Option::is_none) {
                Some(free) => free,
                None => {
                    let err = Error::ArrivalOverflow {
                        capacity: self.slots.len(),
                    };
                    tracing::error!(%err, "arrival bookkeeping overflow");
                    panic!("{err}");
                }
            },
        };
        self.slots[slot] = Some(entry);
    }
}

fn members<E, V, I>(futures: I) -> Vec<Option<Future<E, V>>>
where
    I: IntoIterator,
    I::Item: Into<Option<Future<E, V>>>,
{
    futures.into_iter().map(Into::into).collect()
}

/// Wire every present member to a shared tally and settle the returned
/// future once all have been kept, or as soon as one halts. The result is
/// delivered by the first present member's scheduler.
fn gather<E, V, A, S, R, F>(
    futures: Vec<Option<Future<E, V>>>,
    placement: Placement,
    collect: fn(Option<E>, Option<V>) -> Step<A, S>,
    finish: F,
) -> Future<S, R>
where
    E: Channel,
    V: Channel,
    A: Send + 'static,
    S: Channel,
    R: Channel,
    F: FnOnce(Vec<Option<A>>) -> R + Send + 'static,
{
    let scheduler = futures
        .iter()
        .flatten()
        .next()
        .map_or_else(Scheduler::current, |first| first.scheduler().clone());
    make_on(scheduler, move |resolver: Resolver<S, R>| {
        let pending = futures.iter().flatten().count();
        tracing::trace!(members = futures.len(), pending, ?placement, "gathering");
        if pending == 0 {
            let slots = futures.iter().map(|_| None).collect();
            resolver.fulfill(finish(slots));
            return;
        }

        let tally = Arc::new(Mutex::new(Tally {
            slots: futures.iter().map(|_| None).collect(),
            pending,
            halted: false,
            finish: Some(finish),
        }));

        for (index, future) in futures.into_iter().enumerate() {
            let Some(future) = future else { continue };
            let tally = tally.clone();
            let resolver = resolver.clone();
            future.done(move |error, value| {
                let mut tally = tally.lock();
                if tally.halted {
                    return;
                }
                match collect(error, value) {
                    Step::Halt(error) => {
                        tally.halted = true;
                        drop(tally);
                        tracing::debug!(index, "member short-circuited");
                        resolver.reject(error);
                    }
                    Step::Keep(entry) => {
                        tally.place(index, placement, entry);
                        tally.pending -= 1;
                        if tally.pending > 0 {
                            return;
                        }
                        let slots = std::mem::take(&mut tally.slots);
                        let finish = tally.finish.take();
                        drop(tally);
                        if let Some(finish) = finish {
                            resolver.fulfill(finish(slots));
                        }
                    }
                }
            });
        }
    })
}

fn collect_values<E, V>(error: Option<E>, value: Option<V>) -> Step<Option<V>, E> {
    match error {
        Some(error) => Step::Halt(error),
        None => Step::Keep(value),
    }
}

fn collect_errors<E, V>(error: Option<E>, value: Option<V>) -> Step<E, Option<V>> {
    match error {
        Some(error) => Step::Keep(error),
        None => Step::Halt(value),
    }
}

fn collect_outcomes<E, V>(error: Option<E>, value: Option<V>) -> Step<Outcome<E, V>, Infallible> {
    Step::Keep(Outcome::new(error, value))
}

/// Succeed with every value, in input order, once all members succeed; fail
/// with the first error to arrive.
///
/// # Examples
///
/// ```
/// use wate::{all, run, value};
///
/// all(vec![value::<String, i32>(10), value(20), value(30)])
///     .done(|error, values| {
///         assert_eq!(error, None);
///         assert_eq!(values, Some(vec![Some(10), Some(20), Some(30)]));
///     });
/// run();
/// ```
pub fn all<E, V, I>(futures: I) -> Future<E, Vec<Option<V>>>
where
    E: Channel,
    V: Channel,
    I: IntoIterator,
    I::Item: Into<Option<Future<E, V>>>,
{
    gather(members(futures), Placement::ByIndex, collect_values, |slots| {
        slots.into_iter().map(Option::flatten).collect()
    })
}

/// Succeed with the first value to arrive; fail with every error, in input
/// order, only if all members fail.
pub fn none<E, V, I>(futures: I) -> Future<Vec<Option<E>>, V>
where
    E: Channel,
    V: Channel,
    I: IntoIterator,
    I::Item: Into<Option<Future<E, V>>>,
{
    // The halt carries the winner's value slot, which may itself be empty.
    let inverted: Future<Option<V>, Vec<Option<E>>> =
        gather(members(futures), Placement::ByIndex, collect_errors, |slots| slots);
    make_on(inverted.scheduler().clone(), move |resolver| {
        invert(inverted).done(move |errors, winner| match winner {
            Some(value) => resolver.settle(None, value),
            None => resolver.settle(errors, None),
        });
    })
}

/// Always succeed with every member's [`Outcome`], in input order.
pub fn settled<E, V, I>(futures: I) -> Future<Infallible, Vec<Option<Outcome<E, V>>>>
where
    E: Channel,
    V: Channel,
    I: IntoIterator,
    I::Item: Into<Option<Future<E, V>>>,
{
    gather(members(futures), Placement::ByIndex, collect_outcomes, |slots| slots)
}

/// Wait for every member, then scan the outcomes in arrival order. `pick`
/// returns `Ok` for a hit and `Err` for a miss; the last hit wins, otherwise
/// every miss is reported.
fn find_last<E, V, H, M, I>(
    futures: I,
    pick: fn(Outcome<E, V>) -> Result<Option<H>, M>,
) -> Future<Vec<M>, H>
where
    E: Channel,
    V: Channel,
    H: Channel,
    M: Channel,
    I: IntoIterator,
    I::Item: Into<Option<Future<E, V>>>,
{
    let by_time = gather(members(futures), Placement::ByArrival, collect_outcomes, |slots| slots);
    make_on(by_time.scheduler().clone(), move |resolver| {
        by_time.done(move |_, outcomes| {
            let mut misses = Vec::new();
            let mut last = None;
            for outcome in outcomes.unwrap_or_default().into_iter().flatten() {
                match pick(outcome) {
                    Ok(hit) => last = Some(hit),
                    Err(miss) => misses.push(miss),
                }
            }
            match last {
                Some(hit) => resolver.settle(None, hit),
                None => resolver.reject(misses),
            }
        });
    })
}

fn pick_value<E, V>(outcome: Outcome<E, V>) -> Result<Option<V>, E> {
    match outcome.error {
        Some(error) => Err(error),
        None => Ok(outcome.value),
    }
}

fn pick_error<E, V>(outcome: Outcome<E, V>) -> Result<Option<E>, Option<V>> {
    match outcome.error {
        Some(error) => Ok(Some(error)),
        None => Err(outcome.value),
    }
}

/// Wait for every member. Succeed with the value of the last member to
/// succeed, by arrival; if none succeeded, fail with every error in arrival
/// order.
pub fn last_value<E, V, I>(futures: I) -> Future<Vec<E>, V>
where
    E: Channel,
    V: Channel,
    I: IntoIterator,
    I::Item: Into<Option<Future<E, V>>>,
{
    find_last(futures, pick_value)
}

/// Wait for every member. Fail with the error of the last member to fail, by
/// arrival; if none failed, succeed with every value in arrival order.
pub fn last_error<E, V, I>(futures: I) -> Future<E, Vec<Option<V>>>
where
    E: Channel,
    V: Channel,
    I: IntoIterator,
    I::Item: Into<Option<Future<E, V>>>,
{
    invert(find_last(futures, pick_error))
}

/// The first value to arrive wins. Same as [`none`].
pub fn first_value<E, V, I>(futures: I) -> Future<Vec<Option<E>>, V>
where
    E: Channel,
    V: Channel,
    I: IntoIterator,
    I::Item: Into<Option<Future<E, V>>>,
{
    none(futures)
}

/// The first error to arrive wins. Same as [`all`].
pub fn first_error<E, V, I>(futures: I) -> Future<E, Vec<Option<V>>>
where
    E: Channel,
    V: Channel,
    I: IntoIterator,
    I::Item: Into<Option<Future<E, V>>>,
{
    all(futures)
}

fn flatten_raw<T>(arrays: Vec<Option<Vec<T>>>) -> Vec<T> {
    arrays.into_iter().flatten().flatten().collect()
}

/// [`all`] over futures of arrays, concatenated one level deep.
///
/// # Examples
///
/// ```
/// use wate::{concat_values, run, value};
///
/// concat_values(vec![value::<String, _>(vec![10, 20]), value(vec![30])])
///     .done(|_, values| assert_eq!(values, Some(vec![10, 20, 30])));
/// run();
/// ```
pub fn concat_values<E, T, I>(futures: I) -> Future<E, Vec<T>>
where
    E: Channel,
    T: Channel,
    I: IntoIterator,
    I::Item: Into<Option<Future<E, Vec<T>>>>,
{
    crate::bind_value(all(futures), flatten_raw)
}

/// [`none`] over futures failing with arrays, concatenated one level deep.
pub fn concat_errors<T, V, I>(futures: I) -> Future<Vec<T>, V>
where
    T: Channel,
    V: Channel,
    I: IntoIterator,
    I::Item: Into<Option<Future<Vec<T>, V>>>,
{
    crate::bind_error(none(futures), flatten_raw)
}
