//! Async sequences that suspend once per element.
//!
//! [`aiterable`] wraps any iterator into an [`AIter`]. Each element is handed
//! out by [`AIter::next`], a coroutine that suspends once before completing
//! with the element, so a consumer yields to the driver between elements.
//! [`arange`] and friends do the same over an integer range.
//!
//! # Examples
//!
//! Collecting a whole sequence:
//! ```rust
//! use coro::prelude::*;
//!
//! let mut items = aiterable(["a", "b"]).collect::<Vec<_>>();
//! assert!(items.resume().is_suspended());
//! assert!(items.resume().is_suspended());
//! assert_eq!(items.resume().unwrap_complete(), vec!["a", "b"]);
//! ```
//!
//! Consuming it from `async` logic:
//! ```rust
//! use coro::prelude::*;
//! use coro::Error;
//!
//! let total = from_future(async {
//!     let mut numbers = arange_by(4, 0, -1)?;
//!     let mut total = 0;
//!     while let Some(n) = numbers.next().await {
//!         total += n;
//!     }
//!     Ok::<_, Error>(total)
//! });
//! assert_eq!(run(total).unwrap(), 10);
//! ```

use std::{
    future::Future,
    iter::Fuse,
    pin::Pin,
    task::{Context, Poll},
};

use crate::{error::Error, future::poll_step, Coroutine, Step};

/// A lazy sequence that suspends once before each element.
///
/// Created via [`aiterable`] or the `arange` family. Finite as long as the
/// wrapped iterator is, and not restartable once exhausted.
#[derive(Debug, Clone)]
pub struct AIter<I> {
    items: Fuse<I>,
}

/// Turn any iterable into an async sequence.
pub fn aiterable<I>(items: I) -> AIter<I::IntoIter>
where
    I: IntoIterator,
{
    AIter {
        items: items.into_iter().fuse(),
    }
}

impl<I> AIter<I>
where
    I: Iterator,
{
    /// A coroutine for the next element.
    ///
    /// Suspends once and completes with `Some(element)`, or completes with
    /// `None` straight away once the sequence is exhausted.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Next<'_, I> {
        Next {
            items: &mut self.items,
            state: NextState::Start,
        }
    }

    /// A coroutine that drains the sequence into a collection.
    pub fn collect<B>(self) -> Collect<I, B>
    where
        B: Default + Extend<I::Item>,
    {
        Collect {
            items: self.items,
            held: None,
            out: Some(B::default()),
        }
    }

    /// A coroutine that calls `f` on every element.
    pub fn for_each<F>(self, f: F) -> ForEach<I, F>
    where
        F: FnMut(I::Item),
    {
        ForEach {
            items: self.items,
            held: None,
            f,
            done: false,
        }
    }
}

enum NextState<T> {
    Start,
    Holding(T),
    Done,
}

/// Produces one element of an [`AIter`].
///
/// Created via [`AIter::next`]. Also a [`Future`], so `async` logic can
/// `.await` it.
pub struct Next<'a, I>
where
    I: Iterator,
{
    items: &'a mut Fuse<I>,
    state: NextState<I::Item>,
}

impl<I> Coroutine for Next<'_, I>
where
    I: Iterator,
{
    type Output = Option<I::Item>;

    fn resume(&mut self) -> Step<Self::Output> {
        match std::mem::replace(&mut self.state, NextState::Done) {
            NextState::Start => match self.items.next() {
                Some(item) => {
                    self.state = NextState::Holding(item);
                    Step::Suspended
                }
                None => Step::Complete(None),
            },
            NextState::Holding(item) => Step::Complete(Some(item)),
            NextState::Done => Step::Failed(Error::Terminated),
        }
    }

    fn close(&mut self) -> Result<(), Error> {
        // the pulled element is dropped, not put back
        self.state = NextState::Done;
        Ok(())
    }
}

// never pinned structurally
impl<I> Unpin for Next<'_, I> where I: Iterator {}

impl<I> Future for Next<'_, I>
where
    I: Iterator,
{
    type Output = Option<I::Item>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        poll_step(self.get_mut(), cx, "`Next` polled after completion")
    }
}

/// Drains an [`AIter`] into a collection.
///
/// Created via [`AIter::collect`].
pub struct Collect<I, B>
where
    I: Iterator,
{
    items: Fuse<I>,
    held: Option<I::Item>,
    out: Option<B>,
}

impl<I, B> Coroutine for Collect<I, B>
where
    I: Iterator,
    B: Extend<I::Item>,
{
    type Output = B;

    fn resume(&mut self) -> Step<Self::Output> {
        let Some(mut out) = self.out.take() else {
            return Step::Failed(Error::Terminated);
        };
        if let Some(item) = self.held.take() {
            out.extend(Some(item));
        }
        match self.items.next() {
            Some(item) => {
                self.held = Some(item);
                self.out = Some(out);
                Step::Suspended
            }
            None => Step::Complete(out),
        }
    }

    fn close(&mut self) -> Result<(), Error> {
        self.held = None;
        self.out = None;
        Ok(())
    }
}

/// Calls a closure on every element of an [`AIter`].
///
/// Created via [`AIter::for_each`].
pub struct ForEach<I, F>
where
    I: Iterator,
{
    items: Fuse<I>,
    held: Option<I::Item>,
    f: F,
    done: bool,
}

impl<I, F> Coroutine for ForEach<I, F>
where
    I: Iterator,
    F: FnMut(I::Item),
{
    type Output = ();

    fn resume(&mut self) -> Step<Self::Output> {
        if self.done {
            return Step::Failed(Error::Terminated);
        }
        if let Some(item) = self.held.take() {
            (self.f)(item);
        }
        match self.items.next() {
            Some(item) => {
                self.held = Some(item);
                Step::Suspended
            }
            None => {
                self.done = true;
                Step::Complete(())
            }
        }
    }

    fn close(&mut self) -> Result<(), Error> {
        self.held = None;
        self.done = true;
        Ok(())
    }
}

/// An integer range with a signed step.
///
/// Counts from `start` towards `stop` (exclusive) in increments of `step`,
/// stopping early rather than overflowing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntRange {
    next: i64,
    stop: i64,
    step: i64,
}

impl Iterator for IntRange {
    type Item = i64;

    fn next(&mut self) -> Option<i64> {
        let in_range = if self.step > 0 {
            self.next < self.stop
        } else {
            self.next > self.stop
        };
        if !in_range {
            return None;
        }
        let current = self.next;
        self.next = current.checked_add(self.step).unwrap_or(self.stop);
        Some(current)
    }
}

/// Async sequence over `0..stop`.
pub fn arange(stop: i64) -> AIter<IntRange> {
    aiterable(IntRange {
        next: 0,
        stop,
        step: 1,
    })
}

/// Async sequence over `start..stop`.
pub fn arange_from(start: i64, stop: i64) -> AIter<IntRange> {
    aiterable(IntRange {
        next: start,
        stop,
        step: 1,
    })
}

/// Async sequence from `start` towards `stop` (exclusive) in increments of
/// `step`, which may be negative.
///
/// Returns [`Error::ZeroStep`] if `step` is zero.
pub fn arange_by(start: i64, stop: i64, step: i64) -> Result<AIter<IntRange>, Error> {
    if step == 0 {
        return Err(Error::ZeroStep);
    }
    Ok(aiterable(IntRange {
        next: start,
        stop,
        step,
    }))
}
