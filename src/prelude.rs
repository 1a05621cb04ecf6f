//! Prelude module for convenient imports
//!
//! Everything needed to create, use and persist images:
//! ```
//! use eatalloc::prelude::*;
//! ```

pub use crate::Allocator;
pub use crate::Handle;
pub use crate::error::{EatError, Result};

pub use crate::backend::descriptor::{Descriptor, EntryFlags};
pub use crate::backend::header::{Classification, Header, MAGIC};
pub use crate::backend::master::{CompactionReport, Master, Relocation};
pub use crate::backend::width::SizeType;

pub use crate::config::MasterConfig;
#[cfg(feature = "presets")]
pub use crate::config::ImagePreset;

pub use crate::utils::iter::{Blocks, Descriptors};
#[cfg(feature = "persist")]
pub use crate::utils::persist::LoadOutcome;
