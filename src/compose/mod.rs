//! Combining and adapting coroutines
//!
//! This module provides functions for sequencing coroutines and transforming
//! their results or their close behavior.

mod chain;
mod cleanup;
mod map;

// Re-export composition operations
pub use chain::{and_then, AndThen};
pub use cleanup::{on_close, OnClose};
pub use map::{map, map_err, Map, MapErr};
