//! Building coroutines from scratch
//!
//! This module provides functions and types for creating new leaf coroutines.

mod func;
mod sleep;

// Re-export building blocks
pub use func::{fail, from_fn, ready, Fail, FromFn, Ready};
pub use sleep::{awaitable, sleep, Awaitable, Sleep};
