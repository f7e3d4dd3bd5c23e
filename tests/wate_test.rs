#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use std::{
        future::IntoFuture,
        sync::{Arc, Mutex},
        thread,
    };
    use wate::{
        all, concat_values, create, error, first, from_promise, last_value, none, run,
        to_promise, unwrap_error, unwrap_value, value, Future, Outcome, Resolver, Scheduler,
    };

    type Seen<E, V> = Arc<Mutex<Vec<Outcome<E, V>>>>;

    fn watch<E, V>(future: &Future<E, V>) -> Seen<E, V>
    where
        E: Clone + Send + 'static,
        V: Clone + Send + 'static,
    {
        let seen: Seen<E, V> = Arc::default();
        let sink = seen.clone();
        future.done(move |error, value| sink.lock().unwrap().push(Outcome::new(error, value)));
        seen
    }

    #[test]
    fn value_and_error_settle_one_channel() {
        let v = watch(&value::<&str, i32>(10));
        let e = watch(&error::<&str, i32>("x"));
        run();
        assert_eq!(*v.lock().unwrap(), vec![Outcome::new(None, Some(10))]);
        assert_eq!(*e.lock().unwrap(), vec![Outcome::new(Some("x"), None)]);
    }

    #[test]
    fn all_collects_or_fails() {
        let ok = watch(&all(vec![value::<&str, i32>(10), value(20), value(30)]));
        let bad = watch(&all(vec![value::<&str, i32>(10), error("x"), value(20)]));
        run();
        assert_eq!(
            *ok.lock().unwrap(),
            vec![Outcome::success(vec![Some(10), Some(20), Some(30)])]
        );
        assert_eq!(*bad.lock().unwrap(), vec![Outcome::failure("x")]);
    }

    #[test]
    fn none_collects_errors_or_takes_first_value() {
        let failed = watch(&none(vec![error::<&str, i32>("a"), error("b"), error("c")]));
        let rescued = watch(&first(vec![error::<&str, i32>("a"), value(10), error("c")]));
        run();
        assert_eq!(
            *failed.lock().unwrap(),
            vec![Outcome::failure(vec![Some("a"), Some("b"), Some("c")])]
        );
        assert_eq!(*rescued.lock().unwrap(), vec![Outcome::success(10)]);
    }

    #[test]
    fn concat_values_flattens_one_level() {
        let seen = watch(&concat_values(vec![
            value::<&str, Vec<i32>>(vec![10, 20]),
            value(vec![30]),
        ]));
        run();
        assert_eq!(*seen.lock().unwrap(), vec![Outcome::success(vec![10, 20, 30])]);
    }

    #[test]
    fn last_value_waits_for_a_later_turn() {
        let scheduler = Scheduler::current();
        let (resolver, c) = Resolver::<&str, i32>::new();
        // Settle the third member from a task, i.e. on a later turn.
        scheduler.schedule(move || resolver.fulfill(30));
        let seen = watch(&last_value(vec![value(10), value(20), c]));
        run();
        assert_eq!(*seen.lock().unwrap(), vec![Outcome::success(30)]);
    }

    #[test]
    fn last_value_without_success_returns_all_errors() {
        let seen = watch(&last_value(vec![error::<&str, i32>("ha"), error("ha"), error("ha")]));
        run();
        assert_eq!(*seen.lock().unwrap(), vec![Outcome::failure(vec!["ha", "ha", "ha"])]);
    }

    #[test]
    fn promise_round_trip() {
        let ok = watch(&from_promise(to_promise(value::<&str, i32>(10))));
        let bad = watch(&from_promise(to_promise(error::<&str, i32>("error"))));
        run();
        assert_eq!(*ok.lock().unwrap(), vec![Outcome::success(10)]);
        assert_eq!(*bad.lock().unwrap(), vec![Outcome::failure("error")]);
    }

    #[test]
    fn late_listener_fires_once_and_never_inline() {
        let future = value::<&str, i32>(1);
        run();
        let seen = watch(&future);
        assert!(seen.lock().unwrap().is_empty());
        run();
        run();
        assert_eq!(*seen.lock().unwrap(), vec![Outcome::success(1)]);
    }

    #[test]
    fn unwrap_both_channels() {
        let by_value = watch(&unwrap_value(value::<&str, Future<&str, i32>>(value(10))));
        let by_error = watch(&unwrap_error(error::<Future<&str, i32>, i32>(value(10))));
        run();
        assert_eq!(*by_value.lock().unwrap(), vec![Outcome::success(10)]);
        assert_eq!(*by_error.lock().unwrap(), vec![Outcome::new(None, Some(10))]);
    }

    #[test]
    fn settle_twice_always_fails() {
        let (resolver, _future) = Resolver::<&str, i32>::new();
        resolver.fulfill(1);
        assert_eq!(resolver.try_settle(None, Some(1)), Err(wate::Error::DoubleSettlement));
        let again = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| resolver.fulfill(1)));
        assert!(again.is_err());
    }

    #[test]
    fn resolve_from_another_thread() {
        let scheduler = Scheduler::new();
        let (op, op_a) = Resolver::<String, String>::with_scheduler(scheduler.clone());
        let waiter = create::<String, String, _>(|fulfill, reject| {
            op_a.done(move |error, value| match (error, value) {
                (Some(error), _) => reject(error),
                (None, value) => fulfill(value.unwrap_or_default()),
            });
        })
        .into_future();

        let task = thread::spawn(move || op.fulfill(String::from("🍓")));
        task.join().expect("The task thread has panicked");
        scheduler.run_until_idle();
        run();
        assert_eq!(block_on(waiter), Outcome::success(String::from("🍓")));
    }
}
