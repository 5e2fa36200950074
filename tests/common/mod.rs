//! Shared helpers for integration tests.

use std::{cell::RefCell, rc::Rc, sync::Once};

use coro::{Coroutine, Step};

static INIT_LOGGING: Once = Once::new();

/// Route `tracing` output through the test harness.
///
/// The first call wins; later calls are no-ops.
pub fn init_test_logging() {
    INIT_LOGGING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_test_writer()
            .with_target(true)
            .try_init();
    });
}

/// Markers pushed by test coroutines, in the order they ran.
pub type Log = Rc<RefCell<Vec<String>>>;

pub fn entries(log: &Log) -> Vec<String> {
    log.borrow().clone()
}

/// Resume `coroutine` exactly `suspensions` times expecting it to suspend,
/// then once more expecting it to complete.
#[track_caller]
pub fn run_expecting<C>(mut coroutine: C, suspensions: usize) -> C::Output
where
    C: Coroutine,
{
    for i in 0..suspensions {
        match coroutine.resume() {
            Step::Suspended => {}
            Step::Complete(_) => panic!(
                "coroutine completed after {i} suspensions, expected {suspensions}"
            ),
            Step::Failed(e) => panic!("coroutine failed after {i} suspensions: {e}"),
        }
    }
    match coroutine.resume() {
        Step::Complete(value) => value,
        Step::Suspended => panic!("coroutine did not complete after {suspensions} suspensions"),
        Step::Failed(e) => panic!("coroutine failed: {e}"),
    }
}
