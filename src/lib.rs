//! # Coro: Cooperative Coroutines on a Single Thread
//!
//! Build suspendable computations and drive them step by step, interleaving
//! several of them on one thread without an event loop.
//!
//! ## Core Types
//!
//! - **[`Coroutine`]**: a state machine advanced one step at a time by `resume`
//! - **[`Step`]**: the outcome of one resume: suspended, complete or failed
//! - **[`Task`]**: a coroutine wrapper that rejects steps after termination
//! - **[`Gather`]**: runs children round-robin and collects their results
//!
//! ## Example
//!
//! ```
//! use coro::prelude::*;
//!
//! fn countdown(n: u32) -> impl Coroutine<Output = u32> {
//!     from_future(async move {
//!         for _ in 0..n {
//!             sleep().await;
//!         }
//!         Ok(n)
//!     })
//! }
//!
//! // Both countdowns advance one step per pass
//! let results = run(gather(vec![countdown(2), countdown(3)]));
//! assert_eq!(results.unwrap(), vec![2, 3]);
//! ```
//!
//! ## Common Functions
//!
//! **Building Coroutines:**
//! - [`sleep`] - Suspend once, then complete
//! - [`awaitable`] - Suspend once, then complete with a value
//! - [`from_fn`] - Call a closure on every resume
//! - [`from_future`] - Drive an `async` block
//! - [`aiterable`] - Hand out items with one suspension each
//!
//! **Execution:**
//! - [`gather`] - Interleave several coroutines
//! - [`run`] - Drive a coroutine to completion

pub mod build;
pub mod compose;
pub mod concurrent;
mod coroutine;
mod error;
mod future;
mod iter;
pub mod prelude;
mod run;
mod step;
mod task;

pub use build::{awaitable, fail, from_fn, ready, sleep, Awaitable, Sleep};
pub use compose::{map, on_close};
pub use concurrent::{gather, Gather, Slot};
pub use coroutine::*;
pub use error::*;
pub use future::{from_future, CoroutineFuture, FromFuture};
pub use iter::*;
pub use run::*;
pub use step::*;
pub use task::*;
