//! The master allocator: one image, one heap.
//!
//! ```text
//!   0 +---------------------------+
//!     | header                    |
//!     +---------------------------+ head_size
//!     | data #0 (oldest)          |
//!     | data #1                   |   grows up
//!     | ...                       |      |
//!     +---------------------------+ boundary_1
//!     |        free area          |
//!     +---------------------------+ boundary_2
//!     | entry #0 (newest)         |      ^
//!     | entry #1                  |   grows down
//!     | ...                       |
//!     +---------------------------+ total_size
//! ```
//!
//! Allocation bumps `boundary_1` and pushes a descriptor at `boundary_2`.
//! Freeing the newest block pops it together with any run of already freed
//! blocks under it; any other free only marks the descriptor and leaves a
//! hole until [`Master::compact`] runs.

use super::descriptor::Descriptor;
use super::header::{Classification, Header};
use super::width::SizeType;
use crate::error::{EatError, Result};
use crate::{Allocator, Handle};
use core::ffi::CStr;
use core::marker::PhantomData;
use tracing::{debug, trace, warn};

/// A moved block, reported by [`Master::compact`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relocation {
    /// Handle before compaction. No longer valid.
    pub from: Handle,
    /// Handle after compaction.
    pub to: Handle,
}

/// Result of a compaction pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompactionReport {
    /// Blocks whose offset changed, oldest first.
    pub relocations: Vec<Relocation>,
    /// Freed descriptors dropped from the table.
    pub dropped: usize,
    /// Bytes returned to the free area, data and table together.
    pub bytes_reclaimed: usize,
}

impl CompactionReport {
    /// New handle for `old`, if the block moved.
    pub fn relocated(&self, old: Handle) -> Option<Handle> {
        self.relocations
            .iter()
            .find(|r| r.from == old)
            .map(|r| r.to)
    }
}

/// Suballocator over a single image buffer.
///
/// `S` is the offset width (`u16`, `u32` or `u64`). `B` is the backing
/// buffer: an owned `Vec<u8>`, a borrowed `&mut [u8]`, or anything else that
/// derefs to bytes. Only the first `total_size` bytes belong to the image; the
/// rest of the buffer is spare capacity for [`Master::resize`].
///
/// # Examples
///
/// ```
/// use eatalloc::prelude::*;
///
/// let mut heap = Master::<u32>::with_capacity(1024).unwrap();
/// let a = heap.duplicate(b"hello").unwrap();
/// assert_eq!(heap.get(a), Some(&b"hello"[..]));
///
/// heap.free(a).unwrap();
/// assert!(heap.is_empty());
/// ```
pub struct Master<S: SizeType, B = Vec<u8>> {
    pub(crate) buf: B,
    pub(crate) header: Header,
    scrub: bool,
    _width: PhantomData<S>,
}

impl<S: SizeType, B: AsRef<[u8]>> Master<S, B> {
    /// Adopts an existing image after checking every invariant.
    pub fn open(buf: B) -> Result<Self> {
        let header = Header::decode::<S>(buf.as_ref())?;
        let master = Self {
            buf,
            header,
            scrub: false,
            _width: PhantomData,
        };
        master.check()?;
        Ok(master)
    }

    /// Decoded header as of the last mutation.
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Classification tags stored in the header.
    pub fn classification(&self) -> Classification {
        self.header.classification()
    }

    /// Header length for this offset width.
    pub const fn head_size(&self) -> usize {
        S::HEAD_SIZE
    }

    /// Descriptor length for this offset width.
    pub const fn entry_size(&self) -> usize {
        S::ENTRY_SIZE
    }

    /// Length of the image in bytes.
    pub fn total_size(&self) -> usize {
        self.header.total_size
    }

    /// Length of the backing buffer, the ceiling for [`Master::resize`].
    ///
    /// This differs from [`Allocator::capacity`], which reports the image
    /// size.
    pub fn buffer_len(&self) -> usize {
        self.buf.as_ref().len()
    }

    /// End of the data area.
    pub fn boundary_1(&self) -> usize {
        self.header.boundary_1
    }

    /// Start of the descriptor table.
    pub fn boundary_2(&self) -> usize {
        self.header.boundary_2
    }

    /// Bytes between the data area and the table.
    pub fn free_area_size(&self) -> usize {
        self.header.boundary_2 - self.header.boundary_1
    }

    /// Header, data area and table together.
    pub fn used_area_size(&self) -> usize {
        self.header.boundary_1 + self.table_size()
    }

    /// Payload bytes of every descriptor, freed ones included.
    pub fn data_area_size(&self) -> usize {
        self.header.boundary_1 - S::HEAD_SIZE
    }

    /// Bytes taken by the descriptor table.
    pub fn table_size(&self) -> usize {
        self.header.total_size - self.header.boundary_2
    }

    /// Number of descriptors, live or freed.
    pub fn num_entries(&self) -> usize {
        self.table_size() / S::ENTRY_SIZE
    }

    /// Number of live blocks.
    pub fn len(&self) -> usize {
        self.descriptors().filter(Descriptor::is_valid).count()
    }

    /// True when the table holds no descriptors at all.
    pub fn is_empty(&self) -> bool {
        self.header.boundary_2 == self.header.total_size
    }

    /// Payload bytes held by live blocks.
    pub fn valid_data_size(&self) -> usize {
        self.descriptors()
            .filter(Descriptor::is_valid)
            .map(|d| d.data_size)
            .sum()
    }

    /// Payload bytes held by freed blocks not yet reclaimed.
    pub fn invalid_data_size(&self) -> usize {
        self.descriptors()
            .filter(|d| !d.is_valid())
            .map(|d| d.data_size)
            .sum()
    }

    /// The whole image, header through table.
    pub fn image(&self) -> &[u8] {
        &self.buf.as_ref()[..self.header.total_size]
    }

    /// Bytes between the header and `boundary_1`, freed holes included.
    pub fn data_area(&self) -> &[u8] {
        &self.buf.as_ref()[S::HEAD_SIZE..self.header.boundary_1]
    }

    /// Descriptor at table `index`; 0 is the newest.
    pub fn descriptor(&self, index: usize) -> Option<Descriptor> {
        (index < self.num_entries()).then(|| self.read_entry(index))
    }

    /// Looks up the live block addressed by `handle`.
    ///
    /// This is a linear scan of the table, O(n) in the number of
    /// descriptors.
    pub fn find(&self, handle: Handle) -> Option<(usize, Descriptor)> {
        let offset = usize::try_from(handle.offset()).ok()?;
        self.descriptors()
            .enumerate()
            .find(|(_, d)| d.is_valid() && d.offset == offset)
    }

    /// Payload size of a live block.
    pub fn size_of(&self, handle: Handle) -> Result<usize> {
        self.find(handle)
            .map(|(_, d)| d.data_size)
            .ok_or(EatError::UnknownAddress {
                offset: handle.offset(),
            })
    }

    /// Payload of a live block.
    pub fn get(&self, handle: Handle) -> Option<&[u8]> {
        let (_, d) = self.find(handle)?;
        Some(&self.buf.as_ref()[d.offset..d.end()])
    }

    /// Reads a block written by [`Master::duplicate_str`].
    pub fn get_cstr(&self, handle: Handle) -> Option<&CStr> {
        CStr::from_bytes_until_nul(self.get(handle)?).ok()
    }

    /// Verifies the header and every table invariant.
    pub fn check(&self) -> Result<()> {
        let h = &self.header;
        h.validate::<S>()?;

        if h.total_size > self.buffer_len() {
            return Err(EatError::invalid("image is larger than its buffer"));
        }
        if h.total_size != self.free_area_size() + self.used_area_size() {
            return Err(EatError::invalid("free and used areas do not add up"));
        }
        if self.used_area_size() != S::HEAD_SIZE + self.data_area_size() + self.table_size() {
            return Err(EatError::invalid("used area does not match its parts"));
        }
        if self.table_size() % S::ENTRY_SIZE != 0 {
            return Err(EatError::invalid("table is not a whole number of entries"));
        }

        let mut previous: Option<usize> = None;
        let mut total = 0usize;
        for d in self.descriptors() {
            if d.data_size == 0 {
                return Err(EatError::invalid("descriptor with zero size"));
            }
            if d.offset < S::HEAD_SIZE || d.offset.saturating_add(d.data_size) > h.boundary_1 {
                return Err(EatError::invalid("descriptor points outside the data area"));
            }
            if previous.is_some_and(|p| p < d.offset) {
                return Err(EatError::invalid("descriptor offsets are out of order"));
            }
            previous = Some(d.offset);
            total = total.saturating_add(d.data_size);
        }
        if total != self.data_area_size() {
            return Err(EatError::invalid("data area size differs from block sizes"));
        }
        Ok(())
    }

    /// Shorthand for `check().is_ok()`.
    pub fn is_valid(&self) -> bool {
        self.check().is_ok()
    }

    pub(crate) fn entry_pos(&self, index: usize) -> usize {
        self.header.boundary_2 + index * S::ENTRY_SIZE
    }

    pub(crate) fn read_entry(&self, index: usize) -> Descriptor {
        let pos = self.entry_pos(index);
        Descriptor::read::<S>(&self.buf.as_ref()[pos..pos + S::ENTRY_SIZE])
    }

    #[inline]
    fn debug_check(&self) {
        debug_assert!(
            self.is_valid(),
            "image invariants broken: {:?}",
            self.check().err()
        );
    }
}

impl<S: SizeType, B: AsRef<[u8]> + AsMut<[u8]>> Master<S, B> {
    /// Writes a fresh, empty image over the whole buffer.
    pub fn init(buf: B) -> Result<Self> {
        let total_size = buf.as_ref().len();
        Self::init_with_size(buf, total_size)
    }

    /// Writes a fresh, empty image of `total_size` bytes at the start of `buf`.
    pub fn init_with_size(mut buf: B, total_size: usize) -> Result<Self> {
        let capacity = buf.as_ref().len();
        if total_size > capacity {
            return Err(EatError::BufferTooSmall {
                required: total_size,
                capacity,
            });
        }
        if total_size < S::HEAD_SIZE {
            return Err(EatError::BufferTooSmall {
                required: S::HEAD_SIZE,
                capacity: total_size,
            });
        }
        if !S::fits(total_size) {
            return Err(EatError::SizeOverflow {
                value: total_size,
                width: S::WIDTH,
            });
        }

        let header = Header::new::<S>(total_size);
        header.encode::<S>(buf.as_mut());
        let master = Self {
            buf,
            header,
            scrub: false,
            _width: PhantomData,
        };
        master.debug_check();
        Ok(master)
    }

    /// Zero-fill every region an operation gives back to the free area.
    pub fn set_scrub(&mut self, scrub: bool) {
        self.scrub = scrub;
    }

    /// Builder form of [`Master::set_scrub`].
    pub fn with_scrub(mut self, scrub: bool) -> Self {
        self.scrub = scrub;
        self
    }

    /// Gives the backing buffer back.
    pub fn into_inner(self) -> B {
        self.buf
    }

    /// Removes `remove`, then adds `add` to the classification tags.
    ///
    /// `INVALID` marks an image as untrusted and cannot be added to a live
    /// master; asking for it fails with `InvalidImage` and changes nothing.
    /// Removing it is allowed.
    pub fn modify_flags(&mut self, add: Classification, remove: Classification) -> Result<()> {
        if add.contains(Classification::INVALID) {
            return Err(EatError::invalid("cannot tag a live image invalid"));
        }
        self.header.modify_flags(add, remove);
        self.store_header();
        self.debug_check();
        Ok(())
    }

    /// Payload of a live block, mutably.
    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut [u8]> {
        let (_, d) = self.find(handle)?;
        Some(&mut self.buf.as_mut()[d.offset..d.end()])
    }

    /// Bump-allocates `size` bytes and returns the handle with the
    /// uninitialized payload.
    pub fn allocate_uninit(&mut self, size: usize) -> Result<(Handle, &mut [u8])> {
        if size == 0 {
            return Err(EatError::ZeroSize);
        }
        let available = self.free_area_size();
        if size
            .checked_add(S::ENTRY_SIZE)
            .is_none_or(|required| required > available)
        {
            warn!(requested = size, available, "image out of memory");
            return Err(EatError::OutOfMemory {
                requested: size,
                available,
            });
        }

        let offset = self.header.boundary_1;
        self.header.boundary_1 += size;
        self.header.boundary_2 -= S::ENTRY_SIZE;
        self.write_entry(0, &Descriptor::live(size, offset));
        self.store_header();
        self.debug_check();
        trace!(offset, size, "allocated block");

        Ok((
            Handle::new(offset as u64),
            &mut self.buf.as_mut()[offset..offset + size],
        ))
    }

    /// Like [`Master::allocate_uninit`], returning only the handle.
    pub fn allocate(&mut self, size: usize) -> Result<Handle> {
        self.allocate_uninit(size).map(|(handle, _)| handle)
    }

    /// Allocates `count * size` zeroed bytes.
    pub fn allocate_zeroed(&mut self, count: usize, size: usize) -> Result<Handle> {
        let bytes = count.checked_mul(size).ok_or(EatError::OutOfMemory {
            requested: usize::MAX,
            available: self.free_area_size(),
        })?;
        let (handle, buf) = self.allocate_uninit(bytes)?;
        buf.fill(0);
        Ok(handle)
    }

    /// Copies `bytes` into a new block of exactly that size.
    pub fn duplicate(&mut self, bytes: &[u8]) -> Result<Handle> {
        let (handle, buf) = self.allocate_uninit(bytes.len())?;
        buf.copy_from_slice(bytes);
        Ok(handle)
    }

    /// Copies `text` plus a NUL terminator into a new block.
    pub fn duplicate_str(&mut self, text: &str) -> Result<Handle> {
        let len = text.len();
        let (handle, buf) = self.allocate_uninit(len + 1)?;
        buf[..len].copy_from_slice(text.as_bytes());
        buf[len] = 0;
        Ok(handle)
    }

    /// Frees a live block.
    pub fn free(&mut self, handle: Handle) -> Result<()> {
        let (index, _) = self.find(handle).ok_or(EatError::UnknownAddress {
            offset: handle.offset(),
        })?;
        self.release(index);
        Ok(())
    }

    /// Resizes a block by moving it.
    ///
    /// `None` allocates and a zero size frees. Otherwise a new block is
    /// always allocated, `min(old, new)` bytes are copied and the old block
    /// is freed, leaving a hole until the next compaction.
    pub fn reallocate(&mut self, handle: Option<Handle>, new_size: usize) -> Result<Option<Handle>> {
        let Some(handle) = handle else {
            return self.allocate(new_size).map(Some);
        };
        if new_size == 0 {
            self.free(handle)?;
            return Ok(None);
        }

        let (_, old) = self.find(handle).ok_or(EatError::UnknownAddress {
            offset: handle.offset(),
        })?;
        let new = self.allocate(new_size)?;
        let new_offset = new.offset() as usize;
        let copied = new_size.min(old.data_size);
        self.buf
            .as_mut()
            .copy_within(old.offset..old.offset + copied, new_offset);

        // The new block took slot 0, pushing the old one down by one.
        let (index, _) = self.find(handle).ok_or(EatError::UnknownAddress {
            offset: handle.offset(),
        })?;
        self.release(index);
        Ok(Some(new))
    }

    /// Repacks all live blocks at the start of the data area and drops
    /// freed descriptors.
    ///
    /// Every live handle may change; use the returned report to map old
    /// handles to new ones.
    pub fn compact(&mut self) -> CompactionReport {
        let mut report = CompactionReport::default();
        let num = self.num_entries();
        if num == 0 {
            return report;
        }

        let used_before = self.used_area_size();
        let total = self.header.total_size;
        let mut cursor = S::HEAD_SIZE;
        let mut slot = total;

        // Oldest first: each block moves down, each entry moves toward the
        // end, so neither overwrites anything not yet visited.
        for index in (0..num).rev() {
            let mut entry = self.read_entry(index);
            if !entry.is_valid() {
                report.dropped += 1;
                continue;
            }
            if entry.offset != cursor {
                self.buf
                    .as_mut()
                    .copy_within(entry.offset..entry.end(), cursor);
                report.relocations.push(Relocation {
                    from: entry.handle(),
                    to: Handle::new(cursor as u64),
                });
                entry.offset = cursor;
            }
            slot -= S::ENTRY_SIZE;
            entry.write::<S>(&mut self.buf.as_mut()[slot..slot + S::ENTRY_SIZE]);
            cursor += entry.data_size;
        }

        if self.scrub {
            self.buf.as_mut()[cursor..slot].fill(0);
        }
        self.header.boundary_1 = cursor;
        self.header.boundary_2 = slot;
        self.store_header();
        self.debug_check();

        report.bytes_reclaimed = used_before - self.used_area_size();
        debug!(
            moved = report.relocations.len(),
            dropped = report.dropped,
            reclaimed = report.bytes_reclaimed,
            "compacted image"
        );
        report
    }

    /// Appends another image's blocks to this one.
    ///
    /// The other data area is copied verbatim after `boundary_1` and its
    /// descriptors are shifted by the same distance, so they become the
    /// newest entries here. `other` is left as it was.
    pub fn merge<B2: AsRef<[u8]>>(&mut self, other: &Master<S, B2>) -> Result<()> {
        let required = other.used_area_size() - other.head_size();
        let available = self.free_area_size();
        if required > available {
            return Err(EatError::Unmergeable {
                required,
                available,
            });
        }

        let base = self.header.boundary_1;
        let delta = base - S::HEAD_SIZE;
        let data = other.data_area();
        self.buf.as_mut()[base..base + data.len()].copy_from_slice(data);
        self.header.boundary_1 += data.len();

        let num = other.num_entries();
        self.header.boundary_2 -= num * S::ENTRY_SIZE;
        for index in 0..num {
            let mut entry = other.read_entry(index);
            entry.offset += delta;
            self.write_entry(index, &entry);
        }
        self.store_header();
        self.debug_check();

        debug!(blocks = num, bytes = data.len(), "merged image");
        Ok(())
    }

    /// Replaces this image's contents with a copy of `other`.
    ///
    /// Images of the same total size are copied byte for byte. Otherwise
    /// this image is emptied and `other` is merged in; that path keeps this
    /// image's classification tags.
    pub fn assign<B2: AsRef<[u8]>>(&mut self, other: &Master<S, B2>) -> Result<()> {
        if other.total_size() == self.total_size() {
            let total = self.total_size();
            self.buf.as_mut()[..total].copy_from_slice(other.image());
            self.header = other.header;
            self.debug_check();
            return Ok(());
        }

        let required = other.used_area_size() - other.head_size();
        let available = self.total_size() - S::HEAD_SIZE;
        if required > available {
            return Err(EatError::Unmergeable {
                required,
                available,
            });
        }
        self.reset(self.scrub);
        self.merge(other)
    }

    /// Changes `total_size`, moving the table to the new end of the image.
    ///
    /// The buffer must already be large enough. Shrinking only succeeds
    /// when the free area can absorb the whole reduction.
    pub fn resize(&mut self, new_total: usize) -> Result<()> {
        let old_total = self.header.total_size;
        let b2 = self.header.boundary_2;

        if new_total > old_total {
            let capacity = self.buffer_len();
            if new_total > capacity {
                return Err(EatError::BufferTooSmall {
                    required: new_total,
                    capacity,
                });
            }
            if !S::fits(new_total) {
                return Err(EatError::SizeOverflow {
                    value: new_total,
                    width: S::WIDTH,
                });
            }
            let diff = new_total - old_total;
            let buf = self.buf.as_mut();
            buf.copy_within(b2..old_total, b2 + diff);
            if self.scrub {
                buf[b2..b2 + diff].fill(0);
            }
            self.header.boundary_2 += diff;
        } else if new_total < old_total {
            let diff = old_total - new_total;
            let available = self.free_area_size();
            if diff > available {
                return Err(EatError::Unshrinkable {
                    requested: diff,
                    available,
                });
            }
            self.buf.as_mut().copy_within(b2..old_total, b2 - diff);
            self.header.boundary_2 -= diff;
        } else {
            return Ok(());
        }

        self.header.total_size = new_total;
        self.store_header();
        self.debug_check();
        debug!(old_total, new_total, "resized image");
        Ok(())
    }

    /// Drops every block.
    pub fn reset(&mut self, zero_fill: bool) {
        let total = self.header.total_size;
        self.header.boundary_1 = S::HEAD_SIZE;
        self.header.boundary_2 = total;
        if zero_fill {
            self.buf.as_mut()[S::HEAD_SIZE..total].fill(0);
        }
        self.store_header();
        self.debug_check();
        debug!(total, "reset image");
    }

    /// Replaces the image with a fresh one spanning the whole buffer.
    pub(crate) fn reinitialize(&mut self) -> Result<()> {
        let total = self.buffer_len();
        if total < S::HEAD_SIZE {
            return Err(EatError::BufferTooSmall {
                required: S::HEAD_SIZE,
                capacity: total,
            });
        }
        let total = if S::fits(total) { total } else { S::MAX as usize };
        self.header = Header::new::<S>(total);
        self.reset(self.scrub);
        Ok(())
    }

    /// Marks the entry at `index` freed and pops the top of the stack if it
    /// was the newest one.
    fn release(&mut self, index: usize) {
        let mut entry = self.read_entry(index);
        entry.invalidate();
        self.write_entry(index, &entry);
        trace!(offset = entry.offset, size = entry.data_size, index, "freed block");
        if index != 0 {
            return;
        }

        let num = self.num_entries();
        let mut popped = 0;
        let mut bytes = 0;
        while popped < num {
            let e = self.read_entry(popped);
            if e.is_valid() {
                break;
            }
            bytes += e.data_size;
            popped += 1;
        }

        if popped == num {
            self.reset(self.scrub);
            return;
        }

        let b1 = self.header.boundary_1 - bytes;
        let b2 = self.header.boundary_2 + popped * S::ENTRY_SIZE;
        if self.scrub {
            self.buf.as_mut()[b1..b2].fill(0);
        }
        self.header.boundary_1 = b1;
        self.header.boundary_2 = b2;
        self.store_header();
        self.debug_check();
    }

    fn write_entry(&mut self, index: usize, entry: &Descriptor) {
        let pos = self.entry_pos(index);
        entry.write::<S>(&mut self.buf.as_mut()[pos..pos + S::ENTRY_SIZE]);
    }

    pub(crate) fn store_header(&mut self) {
        self.header.encode::<S>(self.buf.as_mut());
    }
}

impl<S: SizeType> Master<S, Vec<u8>> {
    /// Allocates an owned buffer of `total_size` bytes and initializes it.
    pub fn with_capacity(total_size: usize) -> Result<Self> {
        Self::init(vec![0u8; total_size])
    }

    /// Resizes the owned buffer and the image together.
    ///
    /// On failure both keep their previous size.
    pub fn resize_buffer(&mut self, new_total: usize) -> Result<()> {
        let capacity = self.buf.len();
        if new_total > capacity {
            self.buf.resize(new_total, 0);
            if let Err(e) = self.resize(new_total) {
                self.buf.truncate(capacity);
                return Err(e);
            }
        } else {
            self.resize(new_total)?;
            self.buf.truncate(new_total);
        }
        Ok(())
    }
}

impl<S: SizeType, B: AsRef<[u8]> + AsMut<[u8]>> Allocator for Master<S, B> {
    fn allocate_uninit(&mut self, len: usize) -> Result<(Handle, &mut [u8])> {
        Master::allocate_uninit(self, len)
    }

    fn get(&self, handle: Handle) -> Option<&[u8]> {
        Master::get(self, handle)
    }

    fn get_mut(&mut self, handle: Handle) -> Option<&mut [u8]> {
        Master::get_mut(self, handle)
    }

    fn free(&mut self, handle: Handle) -> Result<()> {
        Master::free(self, handle)
    }

    fn reallocate(&mut self, handle: Option<Handle>, len: usize) -> Result<Option<Handle>> {
        Master::reallocate(self, handle, len)
    }

    fn size_of(&self, handle: Handle) -> Result<usize> {
        Master::size_of(self, handle)
    }

    fn len(&self) -> usize {
        Master::len(self)
    }

    fn is_empty(&self) -> bool {
        Master::is_empty(self)
    }

    fn capacity(&self) -> usize {
        self.total_size()
    }

    fn clear(&mut self) {
        self.reset(self.scrub);
    }
}

impl<S: SizeType, B: AsRef<[u8]>> core::fmt::Debug for Master<S, B> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Master")
            .field("width", &S::WIDTH)
            .field("total_size", &self.header.total_size)
            .field("boundary_1", &self.header.boundary_1)
            .field("boundary_2", &self.header.boundary_2)
            .field("entries", &self.num_entries())
            .finish()
    }
}
