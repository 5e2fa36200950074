//! The checked stepper.
//!
//! [`Task`] owns a coroutine and enforces the stepping contract around it:
//! once the coroutine has completed, failed or been closed, it is dropped and
//! any further step reports the usage error [`Error::Terminated`] instead of
//! reaching the coroutine again.

use tracing::{debug, trace};

use crate::{error::Error, Coroutine, Step};

/// Where a [`Task`] is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// The coroutine has not terminated yet.
    Pending,
    /// The coroutine completed with a value.
    Complete,
    /// The coroutine failed.
    Failed,
    /// The coroutine was closed before it terminated.
    Closed,
}

impl Status {
    /// Returns `true` unless the task is still pending.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Status::Pending)
    }
}

/// A coroutine wrapper that rejects steps after termination.
///
/// `Task` is itself a [`Coroutine`], so it can be handed to a
/// [`Gather`](crate::Gather) or to [`run`](crate::run).
///
/// # Examples
///
/// ```
/// use coro::prelude::*;
/// use coro::{Error, Status, Task};
///
/// let mut task = Task::new(from_fn(|| Step::Complete(1)));
/// assert_eq!(task.step().unwrap_complete(), 1);
/// assert_eq!(task.status(), Status::Complete);
/// assert!(matches!(task.step(), Step::Failed(Error::Terminated)));
/// ```
pub struct Task<C> {
    coroutine: Option<C>,
    status: Status,
}

impl<C> Task<C>
where
    C: Coroutine,
{
    /// Wrap a coroutine that has not been stepped yet.
    pub fn new(coroutine: C) -> Self {
        Task {
            coroutine: Some(coroutine),
            status: Status::Pending,
        }
    }

    /// Advance the coroutine by one step.
    ///
    /// Reports [`Error::Terminated`] if the task already terminated.
    pub fn step(&mut self) -> Step<C::Output> {
        let Some(coroutine) = self.coroutine.as_mut() else {
            trace!(status = ?self.status, "task stepped after it terminated");
            return Step::Failed(Error::Terminated);
        };
        let step = coroutine.resume();
        self.status = match step {
            Step::Suspended => return step,
            Step::Complete(_) => Status::Complete,
            Step::Failed(_) => Status::Failed,
        };
        self.coroutine = None;
        step
    }

    /// Close the coroutine, running its cleanup.
    ///
    /// Does nothing if the task already terminated. The task is terminal
    /// afterwards even if cleanup failed.
    pub fn close(&mut self) -> Result<(), Error> {
        let Some(mut coroutine) = self.coroutine.take() else {
            return Ok(());
        };
        self.status = Status::Closed;
        debug!("closing task");
        coroutine.close()
    }

    /// Where the task is in its lifecycle.
    pub fn status(&self) -> Status {
        self.status
    }

    /// Returns `true` once the task completed, failed or was closed.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Borrow the coroutine while it is still pending.
    pub fn get_mut(&mut self) -> Option<&mut C> {
        self.coroutine.as_mut()
    }
}

impl<C> Coroutine for Task<C>
where
    C: Coroutine,
{
    type Output = C::Output;

    fn resume(&mut self) -> Step<Self::Output> {
        self.step()
    }

    fn close(&mut self) -> Result<(), Error> {
        Task::close(self)
    }
}

impl<C> From<C> for Task<C>
where
    C: Coroutine,
{
    fn from(coroutine: C) -> Self {
        Task::new(coroutine)
    }
}
