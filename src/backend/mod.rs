//! Image backend
//!
//! The on-image formats and the allocator that maintains them.

pub mod descriptor;
pub mod header;
pub mod master;
pub mod width;

#[cfg(test)]
mod naive;
