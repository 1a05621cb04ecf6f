#![cfg(test)]

//! Reference allocator for trait-level tests.
//!
//! Every block is its own `Vec`, so results can be compared against the image
//! allocator without any layout in the way.

use super::master::Master;
use crate::error::{EatError, Result};
use crate::{Allocator, Handle};

const MAX_BYTES: usize = 4096;

pub struct NaiveAllocator {
    blocks: Vec<Option<Vec<u8>>>,
    used: usize,
}

impl NaiveAllocator {
    pub fn new() -> Self {
        Self {
            blocks: Vec::new(),
            used: 0,
        }
    }

    // Index 0 is never handed out so handles look like image offsets.
    fn index(handle: Handle) -> Option<usize> {
        usize::try_from(handle.offset()).ok()?.checked_sub(1)
    }

    fn live(&self, handle: Handle) -> Result<usize> {
        Self::index(handle)
            .filter(|&i| self.blocks.get(i).is_some_and(Option::is_some))
            .ok_or(EatError::UnknownAddress {
                offset: handle.offset(),
            })
    }
}

impl Allocator for NaiveAllocator {
    fn allocate_uninit(&mut self, len: usize) -> Result<(Handle, &mut [u8])> {
        if len == 0 {
            return Err(EatError::ZeroSize);
        }
        if self.used + len > MAX_BYTES {
            return Err(EatError::OutOfMemory {
                requested: len,
                available: MAX_BYTES - self.used,
            });
        }
        self.used += len;
        self.blocks.push(Some(vec![0; len]));
        let index = self.blocks.len() - 1;
        let handle = Handle::new(index as u64 + 1);
        let block = self.blocks[index].as_mut().unwrap();
        Ok((handle, block.as_mut_slice()))
    }

    fn get(&self, handle: Handle) -> Option<&[u8]> {
        self.blocks.get(Self::index(handle)?)?.as_deref()
    }

    fn get_mut(&mut self, handle: Handle) -> Option<&mut [u8]> {
        self.blocks.get_mut(Self::index(handle)?)?.as_deref_mut()
    }

    fn free(&mut self, handle: Handle) -> Result<()> {
        let index = self.live(handle)?;
        if let Some(block) = self.blocks[index].take() {
            self.used -= block.len();
        }
        Ok(())
    }

    fn reallocate(&mut self, handle: Option<Handle>, len: usize) -> Result<Option<Handle>> {
        let Some(handle) = handle else {
            return self.allocate_uninit(len).map(|(h, _)| Some(h));
        };
        if len == 0 {
            self.free(handle)?;
            return Ok(None);
        }
        let index = self.live(handle)?;
        let old = self.blocks[index].clone().unwrap_or_default();
        let (new, buf) = self.allocate_uninit(len)?;
        let copied = len.min(old.len());
        buf[..copied].copy_from_slice(&old[..copied]);
        self.free(handle)?;
        Ok(Some(new))
    }

    fn size_of(&self, handle: Handle) -> Result<usize> {
        let index = self.live(handle)?;
        Ok(self.blocks[index].as_ref().map_or(0, Vec::len))
    }

    fn len(&self) -> usize {
        self.blocks.iter().filter(|b| b.is_some()).count()
    }

    fn capacity(&self) -> usize {
        MAX_BYTES
    }

    fn clear(&mut self) {
        self.blocks.clear();
        self.used = 0;
    }
}

/// Runs one scripted workload and returns the live payloads in allocation
/// order.
fn workload<A: Allocator>(alloc: &mut A) -> Vec<Vec<u8>> {
    let a = alloc.alloc(b"alpha").unwrap();
    let b = alloc.alloc(b"bravo!").unwrap();
    let c = alloc.alloc(b"charlie").unwrap();

    alloc.get_mut(a).unwrap()[0] = b'A';
    alloc.free(b).unwrap();
    assert!(alloc.free(b).is_err());

    let c = alloc.reallocate(Some(c), 3).unwrap().unwrap();
    let d = alloc.reallocate(None, 2).unwrap().unwrap();
    alloc.get_mut(d).unwrap().copy_from_slice(b"dd");

    assert_eq!(alloc.size_of(c).unwrap(), 3);
    assert_eq!(alloc.len(), 3);

    [a, c, d]
        .iter()
        .map(|&h| alloc.get(h).unwrap().to_vec())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_naive_allocator_basic() {
        let mut alloc = NaiveAllocator::new();

        let (h1, buf) = alloc.allocate_uninit(10).unwrap();
        buf[0] = 42;
        assert_eq!(alloc.len(), 1);
        assert_eq!(alloc.get(h1).unwrap()[0], 42);

        alloc.free(h1).unwrap();
        assert!(alloc.is_empty());
        assert!(alloc.get(h1).is_none());
        assert!(matches!(alloc.allocate_uninit(0), Err(EatError::ZeroSize)));
    }

    #[test]
    fn test_image_matches_naive() {
        let mut naive = NaiveAllocator::new();
        let mut image = Master::<u32>::with_capacity(512).unwrap();

        let expected = workload(&mut naive);
        let actual = workload(&mut image);
        assert_eq!(actual, expected);
        assert_eq!(
            expected,
            vec![b"Alpha".to_vec(), b"cha".to_vec(), b"dd".to_vec()]
        );
        assert!(image.check().is_ok());
    }

    #[test]
    fn test_clear_through_trait() {
        fn drain<A: Allocator>(alloc: &mut A) {
            alloc.alloc(b"x").unwrap();
            alloc.alloc(b"yy").unwrap();
            alloc.clear();
            assert!(alloc.is_empty());
            assert!(alloc.capacity() > 0);
        }
        drain(&mut NaiveAllocator::new());
        drain(&mut Master::<u16>::with_capacity(64).unwrap());
    }
}
