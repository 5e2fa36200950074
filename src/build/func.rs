use crate::{error::Error, Coroutine, Step};

/// A coroutine driven by a closure.
///
/// Created via [`from_fn`].
pub struct FromFn<F>(F);

impl<T, F> Coroutine for FromFn<F>
where
    F: FnMut() -> Step<T>,
{
    type Output = T;

    fn resume(&mut self) -> Step<Self::Output> {
        (self.0)()
    }
}

/// Create a coroutine from a closure.
///
/// Each resume calls the closure once. The closure owns whatever state the
/// computation needs between suspensions.
///
/// ```rust
/// use coro::prelude::*;
///
/// let mut left = 2;
/// let mut countdown = from_fn(move || {
///     if left == 0 {
///         return Step::Complete("liftoff");
///     }
///     left -= 1;
///     Step::Suspended
/// });
///
/// assert!(countdown.resume().is_suspended());
/// assert!(countdown.resume().is_suspended());
/// assert_eq!(countdown.resume().unwrap_complete(), "liftoff");
/// ```
pub fn from_fn<T, F>(f: F) -> FromFn<F>
where
    F: FnMut() -> Step<T>,
{
    FromFn(f)
}

/// Completes with a value on the first resume without suspending.
pub struct Ready<T>(Option<T>);

/// Create a coroutine that completes immediately with `value`.
pub fn ready<T>(value: T) -> Ready<T> {
    Ready(Some(value))
}

impl<T> Coroutine for Ready<T> {
    type Output = T;

    fn resume(&mut self) -> Step<Self::Output> {
        match self.0.take() {
            Some(value) => Step::Complete(value),
            None => Step::Failed(Error::Terminated),
        }
    }

    fn close(&mut self) -> Result<(), Error> {
        self.0 = None;
        Ok(())
    }
}

/// Fails with an error on the first resume without suspending.
pub struct Fail<T> {
    error: Option<Error>,
    _output: std::marker::PhantomData<fn() -> T>,
}

/// Create a coroutine that fails immediately with `error`.
pub fn fail<T>(error: Error) -> Fail<T> {
    Fail {
        error: Some(error),
        _output: std::marker::PhantomData,
    }
}

impl<T> Coroutine for Fail<T> {
    type Output = T;

    fn resume(&mut self) -> Step<Self::Output> {
        Step::Failed(self.error.take().unwrap_or(Error::Terminated))
    }

    fn close(&mut self) -> Result<(), Error> {
        self.error = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_fn_keeps_state_between_resumes() {
        let mut seen = Vec::new();
        let mut n = 0;
        let mut stage = from_fn(|| {
            n += 1;
            seen.push(n);
            if n < 3 {
                Step::Suspended
            } else {
                Step::Complete(n * 10)
            }
        });

        assert!(stage.resume().is_suspended());
        assert!(stage.resume().is_suspended());
        assert_eq!(stage.resume().unwrap_complete(), 30);
        drop(stage);
        assert_eq!(seen, vec![1, 2, 3]);
    }

    #[test]
    fn test_ready_completes_once() {
        let mut stage = ready("value");
        assert_eq!(stage.resume().unwrap_complete(), "value");
        assert!(matches!(stage.resume(), Step::Failed(Error::Terminated)));
    }

    #[test]
    fn test_fail_reports_error_then_terminated() {
        let mut stage = fail::<()>(Error::msg("nope"));
        assert_eq!(stage.resume().unwrap_failed().to_string(), "nope");
        assert!(matches!(stage.resume(), Step::Failed(Error::Terminated)));
    }

    #[test]
    fn test_closed_ready_never_completes() {
        let mut stage = ready(5);
        stage.close().unwrap();
        assert!(matches!(stage.resume(), Step::Failed(Error::Terminated)));
    }
}
