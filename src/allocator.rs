//! # EatAlloc - A Relocatable Offset-Addressed Suballocator
//!
//! EatAlloc manages one contiguous byte buffer (an *image*) as a private heap.
//! Blocks are addressed by their offset from the start of the image, never by
//! pointer, so an image can be copied, written to disk, memory-mapped or moved
//! to another address and every handle still resolves.
//!
//! - **Self-describing images** - Header, data and descriptor table live in the buffer
//! - **Bump allocation** - New blocks are carved from the end of the data area
//! - **Lazy reclamation** - Freeing the newest block unwinds the stack, other frees wait for compaction
//! - **Merge and resize** - Images can be appended to each other and grown or shrunk in place
//! - **Persistence** - Save and load images through any `Read`/`Write`
//!
//! ## Quick Start
//!
//! ```rust
//! use eatalloc::prelude::*;
//!
//! // A 1 KiB image with 32-bit offsets
//! let mut heap = Master::<u32>::with_capacity(1024).unwrap();
//!
//! let greeting = heap.duplicate_str("Hello, image!").unwrap();
//! assert_eq!(heap.get_cstr(greeting).unwrap().to_str().unwrap(), "Hello, image!");
//!
//! // The image is plain bytes; reopen it somewhere else
//! let copy = Master::<u32>::open(heap.image().to_vec()).unwrap();
//! assert_eq!(copy.get(greeting), heap.get(greeting));
//! ```
//!
//! ## Features
//!
//! - `persist` (default) - Save and load images through streams and files
//! - `presets` (default) - Predefined image sizes ([`config::ImagePreset`])
//!
//! ## Image Layout
//!
//! ```text
//! [Header][Data Area][Free Area][Descriptor Table]
//!         ^          ^          ^                 ^
//!     head_size  boundary_1  boundary_2       total_size
//! ```
//!
//! The data area grows up from the header and the descriptor table grows down
//! from the end of the image. Descriptor 0 always describes the newest block.
//!
//! ## Handles
//!
//! A [`Handle`] is an offset, nothing more. It only means something to the
//! master that produced it and it goes stale after
//! [`Master::compact`](prelude::Master::compact), which reports every move:
//!
//! ```rust
//! # use eatalloc::prelude::*;
//! # let mut heap = Master::<u32>::with_capacity(256).unwrap();
//! let a = heap.duplicate(b"first").unwrap();
//! let b = heap.duplicate(b"second").unwrap();
//! heap.free(a).unwrap();
//!
//! let report = heap.compact();
//! let b = report.relocated(b).unwrap();
//! assert_eq!(heap.get(b).unwrap(), b"second");
//! ```
//!
//! ## Performance Characteristics
//!
//! | Operation | Cost | Notes |
//! |-----------|------|-------|
//! | allocate() | O(1) | Bump at `boundary_1` |
//! | free() / size_of() / get() | O(n) | Linear table scan |
//! | compact() | O(n + bytes) | One pass, oldest first |
//! | merge() | O(n + bytes) | Verbatim copy plus offset shift |
//! | Memory | 3 offsets/block | Descriptor per block |
//!
//! ## Offset Widths
//!
//! | Width | Header | Descriptor | Max image |
//! |-------|--------|------------|-----------|
//! | `u16` | 16 bytes | 6 bytes | 64 KiB |
//! | `u32` | 20 bytes | 12 bytes | 4 GiB |
//! | `u64` | 32 bytes | 24 bytes | address space |

#![warn(missing_docs)]
#![doc(html_root_url = "https://docs.rs/eatalloc/0.1.0")]

// Internal modules - use prelude for public API
mod backend;
mod utils;

pub mod config;
pub mod error;

/// Convenient re-exports for common use
///
/// ```
/// use eatalloc::prelude::*;
/// ```
pub mod prelude;

use crate::error::Result;

/// Returns the version string of the eatalloc crate
///
/// # Examples
///
/// ```
/// use eatalloc::version;
/// assert_eq!(version(), "0.1.0");
/// ```
pub fn version() -> &'static str {
    "0.1.0"
}

/// Opaque address of a block inside an image
///
/// The value is the byte offset of the payload from the image start. It is
/// only meaningful to the allocator that returned it.
///
/// # Examples
///
/// ```
/// use eatalloc::Handle;
///
/// let handle = Handle::new(20);
/// assert_eq!(handle.offset(), 20);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle {
    offset: u64,
}

impl Handle {
    /// Creates a handle from a raw offset
    pub const fn new(offset: u64) -> Self {
        Self { offset }
    }

    /// Returns the raw offset
    pub const fn offset(self) -> u64 {
        self.offset
    }
}

impl core::fmt::Display for Handle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "@{:#x}", self.offset)
    }
}

/// Core allocator trait: malloc, free, realloc and msize over handles
///
/// # Examples
///
/// ```
/// use eatalloc::prelude::*;
///
/// fn store<A: Allocator>(alloc: &mut A) -> Handle {
///     let (handle, buf) = alloc.allocate_uninit(4).unwrap();
///     buf.copy_from_slice(b"data");
///     handle
/// }
///
/// let mut heap = Master::<u16>::with_capacity(128).unwrap();
/// let h = store(&mut heap);
/// assert_eq!(Allocator::size_of(&heap, h).unwrap(), 4);
///
/// Allocator::free(&mut heap, h).unwrap();
/// assert!(Allocator::get(&heap, h).is_none());
/// ```
pub trait Allocator {
    /// Allocates `len` bytes and returns the handle with the writable payload
    ///
    /// The payload holds whatever bytes were there before.
    ///
    /// # Errors
    ///
    /// - `ZeroSize` if `len` is 0
    /// - `OutOfMemory` if the block does not fit
    fn allocate_uninit(&mut self, len: usize) -> Result<(Handle, &mut [u8])>;

    /// Gets the payload of a live block
    fn get(&self, handle: Handle) -> Option<&[u8]>;

    /// Gets the payload of a live block mutably
    fn get_mut(&mut self, handle: Handle) -> Option<&mut [u8]>;

    /// Frees a live block
    ///
    /// # Errors
    ///
    /// `UnknownAddress` if no live block has this handle.
    fn free(&mut self, handle: Handle) -> Result<()>;

    /// Resizes a block, possibly moving it
    ///
    /// `None` allocates a new block. A zero `len` frees the block and returns
    /// `None`.
    fn reallocate(&mut self, handle: Option<Handle>, len: usize) -> Result<Option<Handle>>;

    /// Returns the payload size of a live block
    fn size_of(&self, handle: Handle) -> Result<usize>;

    /// Returns the number of live blocks
    fn len(&self) -> usize;

    /// Returns true if no blocks are live
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of bytes under management
    ///
    /// For an image this is its total size, not the length of the buffer
    /// behind it.
    fn capacity(&self) -> usize;

    /// Allocates a block and copies `data` into it
    fn alloc(&mut self, data: &[u8]) -> Result<Handle> {
        let (h, buf) = self.allocate_uninit(data.len())?;
        buf.copy_from_slice(data);
        Ok(h)
    }

    /// Frees every block
    fn clear(&mut self);
}
