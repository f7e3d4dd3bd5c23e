//! Awaiting a [`Future`](crate::Future) from async Rust.
//!
//! The waiter subscribes as soon as it is created, so the settlement lands in
//! its slot whenever the owning scheduler turns, whether or not it is being
//! polled at that moment.
//!
//! # Examples
//!
//! ```
//! use wate::{run, value, Outcome};
//! use futures::executor::block_on;
//! use std::future::IntoFuture;
//!
//! let waiter = value::<String, i32>(10).into_future();
//! run();
//! assert_eq!(block_on(waiter), Outcome::success(10));
//! ```
use crate::{Channel, Future, Outcome};
use parking_lot::Mutex;
use std::{
    future::Future as StdFuture,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll, Waker},
};

#[derive(Debug)]
pub struct Waiter<E, V> {
    slot: Arc<Mutex<Slot<E, V>>>,
}

#[derive(Debug)]
struct Slot<E, V> {
    outcome: Option<Outcome<E, V>>,
    waker: Option<Waker>,
}

impl<E: Channel, V: Channel> Waiter<E, V> {
    pub(crate) fn subscribe(future: &Future<E, V>) -> Self {
        let slot = Arc::new(Mutex::new(Slot {
            outcome: None,
            waker: None,
        }));
        let sink = slot.clone();
        future.done(move |error, value| {
            let mut slot = sink.lock();
            slot.outcome = Some(Outcome::new(error, value));
            if let Some(waker) = slot.waker.take() {
                waker.wake()
            }
        });
        Self { slot }
    }
}

impl<E, V> StdFuture for Waiter<E, V> {
    type Output = Outcome<E, V>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut slot = self.slot.lock();
        match slot.outcome.take() {
            Some(outcome) => Poll::Ready(outcome),
            None => {
                slot.waker = Some(cx.waker().clone());
                Poll::Pending
            }
        }
    }
}
