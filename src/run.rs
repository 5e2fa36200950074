//! Driving coroutines to completion.

use tracing::{debug, trace};

use crate::{error::Error, Coroutine, Step};

/// Drive a coroutine to completion in a busy loop.
///
/// Resumes `coroutine` until it terminates and converts the final step into a
/// `Result`. Never yields to anything outside the loop, so a coroutine that
/// suspends forever makes `run` spin forever.
///
/// ```rust
/// use coro::prelude::*;
///
/// let both = gather(vec![awaitable(1), awaitable(2)]);
/// assert_eq!(run(both).unwrap(), vec![1, 2]);
/// ```
pub fn run<C>(mut coroutine: C) -> Result<C::Output, Error>
where
    C: Coroutine,
{
    let mut suspensions = 0usize;
    loop {
        match coroutine.resume() {
            Step::Suspended => {
                suspensions += 1;
                trace!(suspensions, "coroutine suspended");
            }
            Step::Complete(value) => {
                debug!(suspensions, "coroutine completed");
                return Ok(value);
            }
            Step::Failed(error) => {
                debug!(suspensions, %error, "coroutine failed");
                return Err(error);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::{awaitable, fail, from_fn, ready};

    #[test]
    fn test_run_steps_until_complete() {
        let mut responses = Vec::new();
        let mut n = 0;
        let result = run(from_fn(|| {
            n += 1;
            responses.push(n);
            if n < 4 {
                Step::Suspended
            } else {
                Step::Complete(n * 2)
            }
        }))
        .unwrap();

        assert_eq!(result, 8);
        assert_eq!(responses, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_run_immediate_completion() {
        assert_eq!(run(ready(5)).unwrap(), 5);
    }

    #[test]
    fn test_run_awaitable() {
        assert_eq!(run(awaitable("x")).unwrap(), "x");
    }

    #[test]
    fn test_run_propagates_failure() {
        let err = run(fail::<i32>(Error::msg("nope"))).unwrap_err();
        assert_eq!(err.to_string(), "nope");
        assert!(!err.is_usage());
    }
}
