//! Core trait for suspendable computations.
//!
//! A [`Coroutine`] is a state machine that is advanced one unit of progress at a
//! time by [`resume`](Coroutine::resume). Every resume reports exactly one
//! [`Step`]: still running, finished with a value, or failed. A coroutine can
//! also be [`close`](Coroutine::close)d before it finishes, which runs its
//! cleanup and leaves it terminal.
//!
//! # Examples
//!
//! ```rust
//! use coro::prelude::*;
//!
//! // Suspend once, then finish with 3
//! let mut stage = sleep().map(|()| 3);
//! assert!(stage.resume().is_suspended());
//! assert_eq!(stage.resume().unwrap_complete(), 3);
//! ```

use std::{cell::RefCell, rc::Rc};

use crate::{
    compose::{and_then, map, map_err, on_close, AndThen, Map, MapErr, OnClose},
    error::Error,
    future::CoroutineFuture,
    step::Step,
};

/// A resumable computation that is driven forward one step at a time.
///
/// Implementations must never be resumed again once they reported
/// [`Step::Complete`] or [`Step::Failed`], or after they were closed. The
/// coroutines in this crate report such a resume as [`Error::Terminated`];
/// wrap arbitrary coroutines in a [`Task`](crate::Task) to get the same check.
pub trait Coroutine {
    /// Type of the final value when the computation completes.
    type Output;

    /// Run the computation until its next suspension point or until it
    /// terminates.
    fn resume(&mut self) -> Step<Self::Output>;

    /// Cancel the computation, running its cleanup and leaving it terminal.
    ///
    /// Closing an already terminal coroutine does nothing. The only error a
    /// close may report is one raised by the cleanup code itself, tagged as
    /// [`Error::Cleanup`].
    fn close(&mut self) -> Result<(), Error> {
        Ok(())
    }

    /// Transform the final value when completing.
    fn map<T, F>(self, f: F) -> Map<Self, F>
    where
        Self: Sized,
        F: FnOnce(Self::Output) -> T,
    {
        map(self, f)
    }

    /// Transform the error when failing.
    fn map_err<F>(self, f: F) -> MapErr<Self, F>
    where
        Self: Sized,
        F: FnMut(Error) -> Error,
    {
        map_err(self, f)
    }

    /// Continue with a coroutine built from this one's final value.
    ///
    /// ```rust
    /// use coro::prelude::*;
    ///
    /// let stage = awaitable(2).and_then(|x| awaitable(x * 10));
    /// assert_eq!(run(stage).unwrap(), 20);
    /// ```
    fn and_then<C, F>(self, f: F) -> AndThen<Self, C, F>
    where
        Self: Sized,
        C: Coroutine,
        F: FnOnce(Self::Output) -> C,
    {
        and_then(self, f)
    }

    /// Run `cleanup` when this coroutine is closed before it terminates.
    ///
    /// A failing cleanup surfaces from [`close`](Coroutine::close) as
    /// [`Error::Cleanup`].
    fn on_close<F>(self, cleanup: F) -> OnClose<Self, F>
    where
        Self: Sized,
        F: FnOnce() -> Result<(), Error>,
    {
        on_close(self, cleanup)
    }

    /// Await this coroutine from `async` code.
    fn into_async(self) -> CoroutineFuture<Self>
    where
        Self: Sized + Unpin,
    {
        CoroutineFuture::new(self)
    }

    /// Erase the concrete type, so coroutines of different types can share a
    /// [`Gather`](crate::Gather).
    fn boxed<'a>(self) -> Box<dyn Coroutine<Output = Self::Output> + 'a>
    where
        Self: Sized + 'a,
    {
        Box::new(self)
    }
}

impl<C> Coroutine for Rc<RefCell<C>>
where
    C: Coroutine,
{
    type Output = C::Output;

    fn resume(&mut self) -> Step<Self::Output> {
        self.borrow_mut().resume()
    }

    fn close(&mut self) -> Result<(), Error> {
        self.borrow_mut().close()
    }
}

impl<L, R> Coroutine for either::Either<L, R>
where
    L: Coroutine,
    R: Coroutine<Output = L::Output>,
{
    type Output = L::Output;

    fn resume(&mut self) -> Step<Self::Output> {
        match self {
            either::Either::Left(l) => l.resume(),
            either::Either::Right(r) => r.resume(),
        }
    }

    fn close(&mut self) -> Result<(), Error> {
        match self {
            either::Either::Left(l) => l.close(),
            either::Either::Right(r) => r.close(),
        }
    }
}

impl<T> Coroutine for Box<dyn Coroutine<Output = T> + '_> {
    type Output = T;

    fn resume(&mut self) -> Step<Self::Output> {
        (**self).resume()
    }

    fn close(&mut self) -> Result<(), Error> {
        (**self).close()
    }
}

impl<C> Coroutine for &'_ mut C
where
    C: Coroutine + ?Sized,
{
    type Output = C::Output;

    fn resume(&mut self) -> Step<Self::Output> {
        (**self).resume()
    }

    fn close(&mut self) -> Result<(), Error> {
        (**self).close()
    }
}
