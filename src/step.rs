use crate::error::Error;

/// Outcome of resuming a coroutine once.
///
/// `Step` is to a coroutine what `Poll` is to a future, except that failure is a
/// first-class outcome rather than something folded into the completed value.
///
/// # Examples
///
/// ```rust
/// use coro::Step;
///
/// let running: Step<i32, &str> = Step::Suspended;
/// let finished: Step<i32, &str> = Step::Complete(42);
///
/// assert!(running.is_suspended());
/// assert_eq!(finished.map_complete(|x| x * 2), Step::Complete(84));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step<T, E = Error> {
    /// Made partial progress and wants to be resumed again.
    Suspended,
    /// Finished with a final value.
    Complete(T),
    /// Terminated abnormally.
    Failed(E),
}

impl<T, E> Step<T, E> {
    /// Returns `true` if the step is `Suspended`.
    #[inline]
    pub const fn is_suspended(&self) -> bool {
        matches!(self, Step::Suspended)
    }

    /// Returns `true` if the step is `Complete`.
    #[inline]
    pub const fn is_complete(&self) -> bool {
        matches!(self, Step::Complete(_))
    }

    /// Returns `true` if the step is `Failed`.
    #[inline]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Step::Failed(_))
    }

    /// Returns `true` if the computation that produced this step is finished.
    #[inline]
    pub const fn is_terminal(&self) -> bool {
        !self.is_suspended()
    }

    /// Converts from `Step<T, E>` to `Option<T>`, discarding any error.
    ///
    /// ```rust
    /// use coro::Step;
    ///
    /// let x: Step<i32, &str> = Step::Complete(7);
    /// assert_eq!(x.complete_value(), Some(7));
    ///
    /// let y: Step<i32, &str> = Step::Failed("boom");
    /// assert_eq!(y.complete_value(), None);
    /// ```
    #[inline]
    pub fn complete_value(self) -> Option<T> {
        match self {
            Step::Complete(t) => Some(t),
            Step::Suspended | Step::Failed(_) => None,
        }
    }

    /// Converts from `Step<T, E>` to `Option<E>`, discarding any value.
    #[inline]
    pub fn failed_value(self) -> Option<E> {
        match self {
            Step::Failed(e) => Some(e),
            Step::Suspended | Step::Complete(_) => None,
        }
    }

    /// Maps the completed value, leaving the other outcomes untouched.
    #[inline]
    pub fn map_complete<T2, F>(self, f: F) -> Step<T2, E>
    where
        F: FnOnce(T) -> T2,
    {
        match self {
            Step::Suspended => Step::Suspended,
            Step::Complete(t) => Step::Complete(f(t)),
            Step::Failed(e) => Step::Failed(e),
        }
    }

    /// Maps the error, leaving the other outcomes untouched.
    ///
    /// ```rust
    /// use coro::Step;
    ///
    /// let x: Step<i32, &str> = Step::Failed("boom");
    /// assert_eq!(x.map_failed(str::len), Step::Failed(4));
    /// ```
    #[inline]
    pub fn map_failed<E2, F>(self, f: F) -> Step<T, E2>
    where
        F: FnOnce(E) -> E2,
    {
        match self {
            Step::Suspended => Step::Suspended,
            Step::Complete(t) => Step::Complete(t),
            Step::Failed(e) => Step::Failed(f(e)),
        }
    }

    /// Converts a terminal step into a `Result`.
    ///
    /// Returns `None` for `Suspended`.
    #[inline]
    pub fn into_result(self) -> Option<Result<T, E>> {
        match self {
            Step::Suspended => None,
            Step::Complete(t) => Some(Ok(t)),
            Step::Failed(e) => Some(Err(e)),
        }
    }

    /// Converts from `&Step<T, E>` to `Step<&T, &E>`.
    #[inline]
    pub const fn as_ref(&self) -> Step<&T, &E> {
        match self {
            Step::Suspended => Step::Suspended,
            Step::Complete(t) => Step::Complete(t),
            Step::Failed(e) => Step::Failed(e),
        }
    }

    /// Converts from `&mut Step<T, E>` to `Step<&mut T, &mut E>`.
    #[inline]
    pub fn as_mut(&mut self) -> Step<&mut T, &mut E> {
        match self {
            Step::Suspended => Step::Suspended,
            Step::Complete(t) => Step::Complete(t),
            Step::Failed(e) => Step::Failed(e),
        }
    }

    /// Returns the contained `Complete` value.
    ///
    /// # Panics
    ///
    /// Panics with `msg` if the step is not `Complete`.
    #[inline]
    pub fn expect_complete(self, msg: &str) -> T {
        match self {
            Step::Complete(t) => t,
            Step::Suspended | Step::Failed(_) => panic!("{}", msg),
        }
    }

    /// Returns the contained `Complete` value.
    ///
    /// # Panics
    ///
    /// Panics if the step is not `Complete`.
    ///
    /// ```should_panic
    /// use coro::Step;
    ///
    /// let x: Step<i32> = Step::Suspended;
    /// x.unwrap_complete(); // panics
    /// ```
    #[inline]
    pub fn unwrap_complete(self) -> T {
        match self {
            Step::Complete(t) => t,
            Step::Suspended => panic!("called `Step::unwrap_complete()` on a `Suspended` value"),
            Step::Failed(_) => panic!("called `Step::unwrap_complete()` on a `Failed` value"),
        }
    }

    /// Returns the contained `Failed` error.
    ///
    /// # Panics
    ///
    /// Panics if the step is not `Failed`.
    #[inline]
    pub fn unwrap_failed(self) -> E {
        match self {
            Step::Failed(e) => e,
            Step::Suspended => panic!("called `Step::unwrap_failed()` on a `Suspended` value"),
            Step::Complete(_) => panic!("called `Step::unwrap_failed()` on a `Complete` value"),
        }
    }
}

impl<T, E> From<Result<T, E>> for Step<T, E> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(t) => Step::Complete(t),
            Err(e) => Step::Failed(e),
        }
    }
}
