use crate::{error::Error, Coroutine, Step};

/// Runs a cleanup function when the wrapped stage is closed early.
///
/// Created via [`on_close`] or [`Coroutine::on_close`]. The cleanup runs at
/// most once, and only if the stage is closed before it terminates on its own.
pub struct OnClose<S, F> {
    stage: S,
    cleanup: Option<F>,
}

/// Install `cleanup` to run when `stage` is closed before it terminates.
///
/// The wrapped stage is closed first, then `cleanup` runs, the way nested
/// cleanup blocks unwind from the inside out. Both run even if the inner close
/// fails; the first failure is reported as [`Error::Cleanup`].
///
/// ```
/// use coro::prelude::*;
/// use std::cell::Cell;
///
/// let closed = Cell::new(false);
/// let mut stage = on_close(sleep(), || {
///     closed.set(true);
///     Ok(())
/// });
///
/// assert!(stage.resume().is_suspended());
/// stage.close().unwrap();
/// assert!(closed.get());
/// ```
pub fn on_close<S, F>(stage: S, cleanup: F) -> OnClose<S, F>
where
    S: Coroutine,
    F: FnOnce() -> Result<(), Error>,
{
    OnClose {
        stage,
        cleanup: Some(cleanup),
    }
}

impl<S, F> Coroutine for OnClose<S, F>
where
    S: Coroutine,
    F: FnOnce() -> Result<(), Error>,
{
    type Output = S::Output;

    fn resume(&mut self) -> Step<Self::Output> {
        let step = self.stage.resume();
        if step.is_terminal() {
            // finished on its own, nothing left to clean up
            self.cleanup = None;
        }
        step
    }

    fn close(&mut self) -> Result<(), Error> {
        let inner = self.stage.close();
        let outer = match self.cleanup.take() {
            Some(cleanup) => cleanup().map_err(Error::cleanup),
            None => Ok(()),
        };
        inner.map_err(Error::cleanup).and(outer)
    }
}
