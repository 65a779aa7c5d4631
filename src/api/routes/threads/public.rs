//! Public types for the threads API
pub use crate::store::Thread;
