//! Bridging coroutines and `async` code.
//!
//! [`from_future`] turns an `async` block into a [`Coroutine`]: each resume
//! polls the future once with a no-op waker, and every `Pending` is reported as
//! one [`Step::Suspended`]. Inside the block, [`Sleep`](crate::Sleep),
//! [`Awaitable`](crate::Awaitable), [`AIter::next`](crate::AIter::next) and any
//! coroutine wrapped with [`Coroutine::into_async`] can be awaited.
//!
//! ```rust
//! use coro::prelude::*;
//!
//! let task = from_future(async {
//!     sleep().await;
//!     Ok("finished")
//! });
//! assert_eq!(run(task).unwrap(), "finished");
//! ```
//!
//! Closing a bridged future drops it, which runs the destructors of everything
//! it holds across its current `.await`.

use std::{
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll, Wake, Waker},
};

use tracing::{debug, warn};

use crate::{error::Error, Coroutine, Step};

struct Noop;

impl Wake for Noop {
    fn wake(self: Arc<Self>) {}
}

fn noop_waker() -> Waker {
    Waker::from(Arc::new(Noop))
}

/// Poll a coroutine whose only possible failure is a resume after completion.
pub(crate) fn poll_step<C>(coroutine: &mut C, cx: &mut Context<'_>, misuse: &str) -> Poll<C::Output>
where
    C: Coroutine,
{
    match coroutine.resume() {
        Step::Suspended => {
            cx.waker().wake_by_ref();
            Poll::Pending
        }
        Step::Complete(value) => Poll::Ready(value),
        Step::Failed(_) => panic!("{}", misuse),
    }
}

/// A coroutine that drives a future.
///
/// Created via [`from_future`].
pub struct FromFuture<F> {
    future: Option<Pin<Box<F>>>,
    waker: Waker,
}

/// Create a coroutine from a future that resolves to a `Result`.
///
/// `Ok(value)` completes the coroutine and `Err(error)` fails it.
pub fn from_future<T, F>(future: F) -> FromFuture<F>
where
    F: Future<Output = Result<T, Error>>,
{
    FromFuture {
        future: Some(Box::pin(future)),
        waker: noop_waker(),
    }
}

impl<T, F> Coroutine for FromFuture<F>
where
    F: Future<Output = Result<T, Error>>,
{
    type Output = T;

    fn resume(&mut self) -> Step<Self::Output> {
        let Some(future) = self.future.as_mut() else {
            return Step::Failed(Error::Terminated);
        };
        let mut cx = Context::from_waker(&self.waker);
        match future.as_mut().poll(&mut cx) {
            Poll::Pending => Step::Suspended,
            Poll::Ready(result) => {
                self.future = None;
                result.into()
            }
        }
    }

    fn close(&mut self) -> Result<(), Error> {
        // dropping the future unwinds it
        self.future = None;
        Ok(())
    }
}

/// A future that drives a coroutine.
///
/// Created via [`Coroutine::into_async`]. Resolves to the coroutine's result.
/// Dropping the future before it resolves closes the coroutine, so cancelling
/// the enclosing `async` logic still runs the coroutine's cleanup.
pub struct CoroutineFuture<C>
where
    C: Coroutine,
{
    coroutine: C,
    done: bool,
}

impl<C> CoroutineFuture<C>
where
    C: Coroutine,
{
    pub(crate) fn new(coroutine: C) -> Self {
        CoroutineFuture {
            coroutine,
            done: false,
        }
    }
}

impl<C> Future for CoroutineFuture<C>
where
    C: Coroutine + Unpin,
{
    type Output = Result<C::Output, Error>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        match this.coroutine.resume() {
            Step::Suspended => {
                cx.waker().wake_by_ref();
                Poll::Pending
            }
            Step::Complete(value) => {
                this.done = true;
                Poll::Ready(Ok(value))
            }
            Step::Failed(e) => {
                this.done = true;
                Poll::Ready(Err(e))
            }
        }
    }
}

impl<C> Drop for CoroutineFuture<C>
where
    C: Coroutine,
{
    fn drop(&mut self) {
        if self.done {
            return;
        }
        debug!("closing coroutine dropped before it resolved");
        if let Err(error) = self.coroutine.close() {
            warn!(%error, "cleanup failed while dropping awaited coroutine");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        build::{awaitable, sleep},
        compose::on_close,
    };
    use std::{cell::RefCell, rc::Rc};

    struct Guard(Rc<RefCell<Vec<&'static str>>>);

    impl Drop for Guard {
        fn drop(&mut self) {
            self.0.borrow_mut().push("dropped");
        }
    }

    #[test]
    fn test_each_pending_is_one_suspension() {
        let mut task = from_future(async {
            sleep().await;
            let x = awaitable(2).await;
            sleep().await;
            Ok(x + 1)
        });

        assert!(task.resume().is_suspended());
        assert!(task.resume().is_suspended());
        assert!(task.resume().is_suspended());
        assert_eq!(task.resume().unwrap_complete(), 3);
        assert!(task.resume().unwrap_failed().is_usage());
    }

    #[test]
    fn test_error_result_fails_coroutine() {
        let mut task = from_future(async {
            sleep().await;
            Err::<(), _>(Error::msg("bad input"))
        });

        assert!(task.resume().is_suspended());
        assert_eq!(task.resume().unwrap_failed().to_string(), "bad input");
    }

    #[test]
    fn test_close_drops_live_locals() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut task = from_future({
            let log = Rc::clone(&log);
            async move {
                let _guard = Guard(Rc::clone(&log));
                sleep().await;
                log.borrow_mut().push("resumed");
                Ok(())
            }
        });

        assert!(task.resume().is_suspended());
        task.close().unwrap();
        assert_eq!(*log.borrow(), vec!["dropped"]);
        assert!(task.resume().unwrap_failed().is_usage());
    }

    #[test]
    fn test_into_async_awaits_coroutine_result() {
        let closed = Rc::new(RefCell::new(false));
        let inner = on_close(awaitable(7), {
            let closed = Rc::clone(&closed);
            move || {
                *closed.borrow_mut() = true;
                Ok(())
            }
        });
        let mut task = from_future(async move {
            let x = inner.into_async().await?;
            Ok::<_, Error>(x * 2)
        });

        assert!(task.resume().is_suspended());
        assert_eq!(task.resume().unwrap_complete(), 14);
        assert!(!*closed.borrow());
    }

    #[test]
    fn test_close_reaches_coroutine_awaited_with_into_async() {
        let closed = Rc::new(RefCell::new(false));
        let inner = on_close(sleep(), {
            let closed = Rc::clone(&closed);
            move || {
                *closed.borrow_mut() = true;
                Ok(())
            }
        });
        let mut task = from_future(async move {
            inner.into_async().await?;
            Ok::<_, Error>(1)
        });

        assert!(task.resume().is_suspended());
        task.close().unwrap();
        assert!(*closed.borrow());
    }

    #[test]
    fn test_dropping_unpolled_coroutine_future_closes_it() {
        let closed = Rc::new(RefCell::new(false));
        let inner = on_close(sleep(), {
            let closed = Rc::clone(&closed);
            move || {
                *closed.borrow_mut() = true;
                Ok(())
            }
        });

        drop(inner.into_async());
        assert!(*closed.borrow());
    }
}
