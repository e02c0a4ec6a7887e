//! Shared primitives: pixel buffers, UV boxes, errors and byte math.

pub mod core;
pub mod error;
pub(crate) mod math;
