use crate::{error::Error, Coroutine, Step};

/// Runs one coroutine to completion, then continues with a coroutine built
/// from its final value.
///
/// Created via [`and_then`] or [`Coroutine::and_then`]. The first stage is
/// dropped once it completes.
pub struct AndThen<S1, S2, F> {
    state: AndThenState<S1, S2, F>,
}

enum AndThenState<S1, S2, F> {
    OnFirst(S1, Option<F>),
    OnSecond(S2),
    Terminated,
}

/// Run `first` to completion, then feed its value to `f` and run the result.
///
/// The second coroutine is started in the same resume that completes the
/// first, so no extra suspension is introduced between the two.
pub fn and_then<S1, S2, F>(first: S1, f: F) -> AndThen<S1, S2, F>
where
    S1: Coroutine,
    S2: Coroutine,
    F: FnOnce(S1::Output) -> S2,
{
    AndThen {
        state: AndThenState::OnFirst(first, Some(f)),
    }
}

impl<S1, S2, F> Coroutine for AndThen<S1, S2, F>
where
    S1: Coroutine,
    S2: Coroutine,
    F: FnOnce(S1::Output) -> S2,
{
    type Output = S2::Output;

    fn resume(&mut self) -> Step<Self::Output> {
        let step = match &mut self.state {
            AndThenState::OnFirst(first, f) => match first.resume() {
                Step::Suspended => return Step::Suspended,
                Step::Failed(e) => Step::Failed(e),
                Step::Complete(value) => match f.take() {
                    Some(f) => {
                        // the first stage is dropped here
                        self.state = AndThenState::OnSecond(f(value));
                        return self.resume();
                    }
                    None => Step::Failed(Error::Terminated),
                },
            },
            AndThenState::OnSecond(second) => second.resume(),
            AndThenState::Terminated => Step::Failed(Error::Terminated),
        };
        if step.is_terminal() {
            self.state = AndThenState::Terminated;
        }
        step
    }

    fn close(&mut self) -> Result<(), Error> {
        let result = match &mut self.state {
            AndThenState::OnFirst(first, _) => first.close(),
            AndThenState::OnSecond(second) => second.close(),
            AndThenState::Terminated => Ok(()),
        };
        self.state = AndThenState::Terminated;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::{awaitable, fail, ready, sleep};
    use std::{cell::Cell, rc::Rc};

    #[test]
    fn test_and_then_switches_without_extra_suspension() {
        let mut stage = and_then(ready(3), |x| ready(x * 2));
        assert_eq!(stage.resume().unwrap_complete(), 6);
        assert!(matches!(stage.resume(), Step::Failed(Error::Terminated)));
    }

    #[test]
    fn test_and_then_propagates_failure_from_first_stage() {
        let called = Rc::new(Cell::new(false));
        let mut stage = and_then(fail::<i32>(Error::msg("first")), {
            let called = Rc::clone(&called);
            move |x| {
                called.set(true);
                ready(x)
            }
        });

        assert_eq!(stage.resume().unwrap_failed().to_string(), "first");
        assert!(!called.get());
    }

    #[test]
    fn test_close_reaches_current_stage() {
        let closed = Rc::new(Cell::new(false));
        let mut stage = and_then(sleep(), {
            let closed = Rc::clone(&closed);
            move |()| {
                awaitable(1).on_close(move || {
                    closed.set(true);
                    Ok(())
                })
            }
        });

        // finishes the sleep and suspends inside awaitable
        assert!(stage.resume().is_suspended());
        assert!(stage.resume().is_suspended());
        stage.close().unwrap();
        assert!(closed.get());
        assert!(matches!(stage.resume(), Step::Failed(Error::Terminated)));
    }
}
