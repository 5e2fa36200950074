//! Transforming coroutine results and errors.
//!
//! This module provides [`Map`] and [`MapErr`] for adapting a coroutine's final
//! value or failure without touching its suspension points.

use crate::{error::Error, Coroutine, Step};

/// Transforms the final value of the wrapped stage.
///
/// Applied only when the computation completes; suspensions pass through.
pub struct Map<S, F> {
    stage: S,
    f: Option<F>,
}

/// Create a coroutine that transforms the final value of the wrapped stage.
///
/// # Examples
///
/// ```
/// use coro::prelude::*;
///
/// let mut mapped = map(awaitable(20), |r: i32| r * 10);
///
/// assert!(mapped.resume().is_suspended());
/// assert_eq!(mapped.resume().unwrap_complete(), 200);
/// ```
pub fn map<S, F>(stage: S, f: F) -> Map<S, F> {
    Map { stage, f: Some(f) }
}

impl<T, S, F> Coroutine for Map<S, F>
where
    S: Coroutine,
    F: FnOnce(S::Output) -> T,
{
    type Output = T;

    fn resume(&mut self) -> Step<Self::Output> {
        match self.stage.resume() {
            Step::Suspended => Step::Suspended,
            Step::Complete(value) => match self.f.take() {
                Some(f) => Step::Complete(f(value)),
                None => Step::Failed(Error::Terminated),
            },
            Step::Failed(e) => {
                self.f = None;
                Step::Failed(e)
            }
        }
    }

    fn close(&mut self) -> Result<(), Error> {
        self.f = None;
        self.stage.close()
    }
}

/// Transforms the error of the wrapped stage.
pub struct MapErr<S, F> {
    stage: S,
    f: F,
}

/// Create a coroutine that transforms the error of the wrapped stage.
///
/// Cleanup failures reported by `close` are not transformed.
pub fn map_err<S, F>(stage: S, f: F) -> MapErr<S, F> {
    MapErr { stage, f }
}

impl<S, F> Coroutine for MapErr<S, F>
where
    S: Coroutine,
    F: FnMut(Error) -> Error,
{
    type Output = S::Output;

    fn resume(&mut self) -> Step<Self::Output> {
        self.stage.resume().map_failed(&mut self.f)
    }

    fn close(&mut self) -> Result<(), Error> {
        self.stage.close()
    }
}
