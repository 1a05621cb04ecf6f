//! Error types for image and allocator operations.
//!
//! Capacity failures (`OutOfMemory`, `Unmergeable`, `Unshrinkable`) are
//! reported before anything is written, so the image is always left in the
//! state it had before the call.

use thiserror::Error;

/// Errors returned by [`Master`](crate::prelude::Master) and the codecs.
#[derive(Error, Debug)]
pub enum EatError {
    /// The header or one of the structural invariants does not hold.
    #[error("invalid image: {reason}")]
    InvalidImage {
        /// Which check failed.
        reason: &'static str,
    },

    /// A zero-byte block was requested.
    #[error("cannot allocate a zero-sized block")]
    ZeroSize,

    /// The free area cannot hold the block plus its descriptor.
    #[error("out of memory: requested {requested} bytes, {available} bytes free")]
    OutOfMemory {
        /// Payload bytes requested.
        requested: usize,
        /// Free area size at the time of the request.
        available: usize,
    },

    /// No live block starts at the given offset.
    #[error("no live block at offset {offset}")]
    UnknownAddress {
        /// Offset carried by the handle.
        offset: u64,
    },

    /// The other image does not fit into this image's free area.
    #[error("cannot merge: {required} bytes required, {available} bytes free")]
    Unmergeable {
        /// Data area plus table size of the source image.
        required: usize,
        /// Free area of the destination image.
        available: usize,
    },

    /// Shrinking would cut into the data area or the table.
    #[error("cannot shrink by {requested} bytes, only {available} bytes free")]
    Unshrinkable {
        /// Number of bytes the image would lose.
        requested: usize,
        /// Free area size.
        available: usize,
    },

    /// The backing buffer is smaller than the requested image.
    #[error("buffer of {capacity} bytes cannot hold an image of {required} bytes")]
    BufferTooSmall {
        /// Image size that was asked for.
        required: usize,
        /// Length of the backing buffer.
        capacity: usize,
    },

    /// A size does not fit the image's offset width.
    #[error("{value} does not fit in a {width}-byte offset")]
    SizeOverflow {
        /// The value that overflowed.
        value: usize,
        /// Offset width in bytes.
        width: usize,
    },

    /// Reading or writing a persisted image failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result alias used throughout the crate.
pub type Result<T, E = EatError> = std::result::Result<T, E>;

impl EatError {
    pub(crate) const fn invalid(reason: &'static str) -> Self {
        Self::InvalidImage { reason }
    }
}
