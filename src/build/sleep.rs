//! The canonical suspension point.
//!
//! [`Sleep`] is the only way a computation voluntarily gives up control: it
//! suspends exactly once and completes on the next resume. There is no way to
//! sleep for a duration, only until the driver comes back.

use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use crate::{error::Error, future::poll_step, Coroutine, Step};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SleepState {
    Start,
    Slept,
    Done,
}

/// Suspends once, then completes with `()`.
///
/// Created via [`sleep`]. Also implements [`Future`] so `async` logic bridged
/// with [`from_future`](crate::from_future) can `.await` it.
#[derive(Debug)]
pub struct Sleep {
    state: SleepState,
}

/// Suspend the current chain of coroutines once.
///
/// ```rust
/// use coro::prelude::*;
///
/// let mut nap = sleep();
/// assert!(nap.resume().is_suspended());
/// assert!(nap.resume().is_complete());
/// assert!(nap.resume().unwrap_failed().is_usage());
/// ```
pub fn sleep() -> Sleep {
    Sleep {
        state: SleepState::Start,
    }
}

impl Coroutine for Sleep {
    type Output = ();

    fn resume(&mut self) -> Step<Self::Output> {
        match self.state {
            SleepState::Start => {
                self.state = SleepState::Slept;
                Step::Suspended
            }
            SleepState::Slept => {
                self.state = SleepState::Done;
                Step::Complete(())
            }
            SleepState::Done => Step::Failed(Error::Terminated),
        }
    }

    fn close(&mut self) -> Result<(), Error> {
        self.state = SleepState::Done;
        Ok(())
    }
}

impl Future for Sleep {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        poll_step(self.get_mut(), cx, "`Sleep` polled after completion")
    }
}

/// Suspends once, then completes with a stored value.
///
/// Created via [`awaitable`].
#[derive(Debug)]
pub struct Awaitable<T> {
    sleep: Sleep,
    value: Option<T>,
}

/// Return `value` after suspending the current chain of coroutines once.
///
/// ```rust
/// use coro::prelude::*;
///
/// assert_eq!(run(awaitable("x")).unwrap(), "x");
/// ```
pub fn awaitable<T>(value: T) -> Awaitable<T> {
    Awaitable {
        sleep: sleep(),
        value: Some(value),
    }
}

impl<T> Coroutine for Awaitable<T> {
    type Output = T;

    fn resume(&mut self) -> Step<Self::Output> {
        match self.sleep.resume() {
            Step::Suspended => Step::Suspended,
            Step::Complete(()) => match self.value.take() {
                Some(value) => Step::Complete(value),
                None => Step::Failed(Error::Terminated),
            },
            Step::Failed(e) => Step::Failed(e),
        }
    }

    fn close(&mut self) -> Result<(), Error> {
        self.value = None;
        self.sleep.close()
    }
}

impl<T> Unpin for Awaitable<T> {}

impl<T> Future for Awaitable<T> {
    type Output = T;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        poll_step(self.get_mut(), cx, "`Awaitable` polled after completion")
    }
}
