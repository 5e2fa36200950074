//! Errors reported by coroutines and their drivers.

use thiserror::Error;

/// A boxed error raised by user logic inside a coroutine.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The opaque error carried by [`Step::Failed`](crate::Step::Failed).
///
/// Errors fall into three groups:
///
/// - computation errors raised by user logic ([`Error::Failed`]),
/// - usage errors where a caller broke the stepping contract
///   ([`Error::Terminated`], [`Error::ZeroStep`]),
/// - aggregate errors reported by [`Gather`](crate::Gather) ([`Error::Gather`]).
///
/// Failures raised by cleanup code while closing are kept apart as
/// [`Error::Cleanup`].
#[derive(Debug, Error)]
pub enum Error {
    /// User logic inside a coroutine failed.
    #[error("{0}")]
    Failed(BoxError),

    /// A coroutine was resumed after it completed, failed or was closed.
    #[error("coroutine resumed after it terminated")]
    Terminated,

    /// A range was built with a step of zero.
    #[error("range step must not be zero")]
    ZeroStep,

    /// A child of a gather failed.
    #[error("coroutine {index} failed: {source}")]
    Gather {
        /// Position of the failing child, in construction order.
        index: usize,
        /// The child's own error.
        #[source]
        source: Box<Error>,
        /// Cleanup failures raised while closing the remaining children.
        suppressed: Vec<CleanupFailure>,
    },

    /// Cleanup code run by `close` failed.
    #[error("cleanup failed: {0}")]
    Cleanup(#[source] Box<Error>),
}

/// A cleanup failure raised while a gather closed one of its children.
#[derive(Debug, Error)]
#[error("closing coroutine {index} failed: {error}")]
pub struct CleanupFailure {
    /// Position of the child being closed.
    pub index: usize,
    /// The cleanup error, always an [`Error::Cleanup`].
    pub error: Error,
}

impl Error {
    /// Wrap an error raised by user logic.
    pub fn new<E>(error: E) -> Self
    where
        E: Into<BoxError>,
    {
        Error::Failed(error.into())
    }

    /// Build a computation error from a message.
    ///
    /// ```rust
    /// use coro::Error;
    ///
    /// let err = Error::msg("disk on fire");
    /// assert_eq!(err.to_string(), "disk on fire");
    /// ```
    pub fn msg<M>(message: M) -> Self
    where
        M: Into<String>,
    {
        let message: String = message.into();
        Error::Failed(message.into())
    }

    /// Tag an error as originating from cleanup code.
    ///
    /// Errors that already are cleanup failures are returned unchanged.
    pub fn cleanup<E>(error: E) -> Self
    where
        E: Into<Error>,
    {
        match error.into() {
            err @ Error::Cleanup(_) => err,
            err => Error::Cleanup(Box::new(err)),
        }
    }

    /// Returns `true` if the caller broke the stepping contract.
    pub fn is_usage(&self) -> bool {
        matches!(self, Error::Terminated | Error::ZeroStep)
    }

    /// Returns `true` if this error came from cleanup code.
    pub fn is_cleanup(&self) -> bool {
        matches!(self, Error::Cleanup(_))
    }

    /// Follow [`Error::Gather`] and [`Error::Cleanup`] wrappers down to the
    /// error that started the failure.
    pub fn root(&self) -> &Error {
        let mut current = self;
        loop {
            match current {
                Error::Gather { source, .. } | Error::Cleanup(source) => current = &**source,
                _ => return current,
            }
        }
    }

    /// Position of the failing child if this is an aggregate error.
    pub fn child_index(&self) -> Option<usize> {
        match self {
            Error::Gather { index, .. } => Some(*index),
            _ => None,
        }
    }

    /// Downcast the root computation error to a concrete type.
    pub fn downcast_ref<E>(&self) -> Option<&E>
    where
        E: std::error::Error + 'static,
    {
        match self.root() {
            Error::Failed(inner) => inner.downcast_ref::<E>(),
            _ => None,
        }
    }
}

impl From<BoxError> for Error {
    fn from(error: BoxError) -> Self {
        Error::Failed(error)
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::new(error)
    }
}
