//! Helpers layered on top of an image
//!
//! Table traversal and, with the `persist` feature, stream and file I/O.

pub mod iter;

#[cfg(feature = "persist")]
pub mod persist;
