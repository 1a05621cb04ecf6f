//! Building masters from a configuration
//!
//! [`MasterConfig`] collects the few knobs an image has: its size, how much
//! spare buffer to reserve for growing it later, the classification tags it
//! starts with and whether released memory is scrubbed.
//!
//! ```rust
//! use eatalloc::config::MasterConfig;
//! use eatalloc::prelude::*;
//!
//! let heap = MasterConfig::new(512)
//!     .capacity(4096)
//!     .classification(Classification::INTERNAL)
//!     .scrub(true)
//!     .build::<u32>()
//!     .unwrap();
//!
//! assert_eq!(heap.total_size(), 512);
//! assert_eq!(heap.buffer_len(), 4096);
//! ```
//!
//! With the `presets` feature, [`ImagePreset`] names a handful of common
//! sizes:
//!
//! ```rust
//! use eatalloc::config::ImagePreset;
//!
//! let heap = ImagePreset::Page4K.build::<u16>().unwrap();
//! assert_eq!(heap.total_size(), 4096);
//! ```

use crate::backend::header::Classification;
use crate::backend::master::Master;
use crate::backend::width::SizeType;
use crate::error::Result;

/// Builder for an owned [`Master`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MasterConfig {
    total_size: usize,
    capacity: Option<usize>,
    classification: Classification,
    scrub: bool,
}

impl MasterConfig {
    /// An image of `total_size` bytes in a buffer of the same size
    pub const fn new(total_size: usize) -> Self {
        Self {
            total_size,
            capacity: None,
            classification: Classification::empty(),
            scrub: false,
        }
    }

    /// Reserve a larger buffer so [`Master::resize`] can grow in place
    ///
    /// Values below the image size are ignored.
    pub const fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Initial classification tags
    pub const fn classification(mut self, classification: Classification) -> Self {
        self.classification = classification;
        self
    }

    /// Zero-fill memory as it is released
    pub const fn scrub(mut self, scrub: bool) -> Self {
        self.scrub = scrub;
        self
    }

    /// Image size in bytes
    pub const fn total_size(&self) -> usize {
        self.total_size
    }

    /// Length of the buffer that [`MasterConfig::build`] allocates
    pub fn buffer_len(&self) -> usize {
        self.capacity.map_or(self.total_size, |c| c.max(self.total_size))
    }

    /// Allocates the buffer and writes an empty image into it
    ///
    /// Fails with `InvalidImage` if the tags include `INVALID`.
    pub fn build<S: SizeType>(&self) -> Result<Master<S>> {
        let buf = vec![0u8; self.buffer_len()];
        let mut master = Master::<S>::init_with_size(buf, self.total_size)?.with_scrub(self.scrub);
        if !self.classification.is_empty() {
            master.modify_flags(self.classification, Classification::empty())?;
        }
        Ok(master)
    }
}

impl Default for MasterConfig {
    fn default() -> Self {
        Self::new(1024)
    }
}

/// Predefined image sizes
#[cfg(feature = "presets")]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImagePreset {
    /// 300 bytes, enough for a handful of small strings
    Tiny300,
    /// 1 KiB
    Small1K,
    /// 4 KiB, one page
    Page4K,
    /// 64 KiB less one byte, the largest image `u16` offsets can describe
    Block64K,
    /// 1 MiB
    Large1M,
}

#[cfg(feature = "presets")]
impl ImagePreset {
    /// Image size in bytes
    pub const fn total_size(self) -> usize {
        match self {
            ImagePreset::Tiny300 => 300,
            ImagePreset::Small1K => 1024,
            ImagePreset::Page4K => 4096,
            ImagePreset::Block64K => 65_535,
            ImagePreset::Large1M => 1 << 20,
        }
    }

    /// A [`MasterConfig`] for this size
    pub const fn config(self) -> MasterConfig {
        MasterConfig::new(self.total_size())
    }

    /// Builds an empty master of this size
    ///
    /// Fails with `SizeOverflow` when the size does not fit `S`, as
    /// `Large1M` does for `u16`.
    pub fn build<S: SizeType>(self) -> Result<Master<S>> {
        self.config().build::<S>()
    }
}
