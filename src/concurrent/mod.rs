mod gather;

pub use gather::{gather, Gather, Slot};
