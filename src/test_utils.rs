use crate::{Channel, Future, Outcome};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing_subscriber::{fmt, EnvFilter};

/// Route `tracing` output through the test harness's captured stdout.
/// Safe to call from every test; only the first call installs anything.
pub(crate) fn init_test_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trace"));
    let _ = fmt().with_env_filter(filter).with_test_writer().try_init();
}

pub(crate) type Seen<E, V> = Arc<Mutex<Option<Outcome<E, V>>>>;

/// Capture the settlement of `future` once the scheduler delivers it.
pub(crate) fn outcome_of<E: Channel, V: Channel>(future: &Future<E, V>) -> Seen<E, V> {
    let slot = Arc::new(Mutex::new(None));
    let sink = slot.clone();
    future.done(move |error, value| *sink.lock() = Some(Outcome::new(error, value)));
    slot
}
