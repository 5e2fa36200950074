//! Commonly used imports
//!
//! Use `use coro::prelude::*;` for quick access to the most common types and functions.

// Core types
pub use crate::{Coroutine, Step};

// Most common constructors
pub use crate::build::{awaitable, fail, from_fn, ready, sleep};
pub use crate::future::from_future;
pub use crate::iter::{aiterable, arange, arange_by, arange_from};

// Composition
pub use crate::compose::{and_then, map, map_err, on_close};

// Execution
pub use crate::concurrent::gather;
pub use crate::run::run;
