//! Block descriptors.
//!
//! The descriptor table sits at the end of the image and grows toward the
//! data area. Slot 0 is at `boundary_2` and describes the newest block. Each
//! slot holds three fields of the image's offset width:
//! `data_size`, `offset` and `flags`.

use super::width::{SizeType, to_usize};
use crate::Handle;
use bitflags::bitflags;

bitflags! {
    /// Per-block flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct EntryFlags: u64 {
        /// The block is live.
        const VALID = 1;
        /// Reserved. No operation reads or sets it.
        const LOCKED = 2;
    }
}

/// One decoded table slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Descriptor {
    /// Payload length in bytes, always positive.
    pub data_size: usize,
    /// Absolute offset of the payload from the image start.
    pub offset: usize,
    /// Validity and lock bits.
    pub flags: EntryFlags,
}

impl Descriptor {
    /// A live descriptor for a freshly allocated block.
    pub const fn live(data_size: usize, offset: usize) -> Self {
        Self {
            data_size,
            offset,
            flags: EntryFlags::VALID,
        }
    }

    /// True while the block is live.
    pub fn is_valid(&self) -> bool {
        self.flags.contains(EntryFlags::VALID)
    }

    /// Reserved lock bit.
    pub fn is_locked(&self) -> bool {
        self.flags.contains(EntryFlags::LOCKED)
    }

    /// Clears VALID, leaving other bits alone.
    pub fn invalidate(&mut self) {
        self.flags.remove(EntryFlags::VALID);
    }

    /// One past the last payload byte.
    pub fn end(&self) -> usize {
        self.offset + self.data_size
    }

    /// Handle addressing this block's payload.
    pub fn handle(&self) -> Handle {
        Handle::new(self.offset as u64)
    }

    /// Reads a descriptor from the first `S::ENTRY_SIZE` bytes of `slot`.
    pub(crate) fn read<S: SizeType>(slot: &[u8]) -> Self {
        let w = S::WIDTH;
        Self {
            data_size: to_usize(S::read(slot)),
            offset: to_usize(S::read(&slot[w..])),
            flags: EntryFlags::from_bits_retain(S::read(&slot[2 * w..])),
        }
    }

    /// Writes this descriptor into the first `S::ENTRY_SIZE` bytes of `slot`.
    pub(crate) fn write<S: SizeType>(&self, slot: &mut [u8]) {
        let w = S::WIDTH;
        S::write(slot, self.data_size as u64);
        S::write(&mut slot[w..], self.offset as u64);
        S::write(&mut slot[2 * w..], self.flags.bits());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_roundtrip() {
        let mut slot = [0u8; 12];
        let d = Descriptor::live(100, 20);
        d.write::<u32>(&mut slot);
        assert_eq!(&slot[..4], &[100, 0, 0, 0]);
        assert_eq!(&slot[4..8], &[20, 0, 0, 0]);
        assert_eq!(&slot[8..], &[1, 0, 0, 0]);
        assert_eq!(Descriptor::read::<u32>(&slot), d);
    }

    #[test]
    fn invalidate_keeps_other_bits() {
        let mut d = Descriptor {
            data_size: 8,
            offset: 16,
            flags: EntryFlags::VALID | EntryFlags::LOCKED,
        };
        d.invalidate();
        assert!(!d.is_valid());
        assert!(d.is_locked());
        assert_eq!(d.end(), 24);
        assert_eq!(d.handle().offset(), 16);
    }

    #[test]
    fn unknown_flag_bits_survive() {
        let mut slot = [0u8; 6];
        u16::write(&mut slot[4..], 0x81);
        let d = Descriptor::read::<u16>(&slot);
        assert!(d.is_valid());
        assert_eq!(d.flags.bits(), 0x81);
    }
}
