//! Walking the descriptor table.
//!
//! Index 0 is the newest block, so the plain iterators run newest to oldest
//! and `.rev()` (or the `rfor_each_*` forms) runs oldest to newest. Callbacks
//! return [`ControlFlow`] and stop the walk on `Break`, handing the break
//! value back to the caller.
//!
//! ```
//! use core::ops::ControlFlow;
//! use eatalloc::prelude::*;
//!
//! let mut heap = Master::<u32>::with_capacity(256).unwrap();
//! heap.duplicate(b"needle").unwrap();
//! heap.duplicate(b"hay").unwrap();
//!
//! let found = heap.for_each_block(|handle, bytes| {
//!     if bytes == b"needle" {
//!         ControlFlow::Break(handle)
//!     } else {
//!         ControlFlow::Continue(())
//!     }
//! });
//! assert!(found.is_some());
//! ```

use crate::Handle;
use crate::backend::descriptor::Descriptor;
use crate::backend::master::Master;
use crate::backend::width::SizeType;
use core::iter::FusedIterator;
use core::ops::{ControlFlow, Range};

/// Iterator over every descriptor, live or freed.
pub struct Descriptors<'a, S: SizeType, B> {
    master: &'a Master<S, B>,
    range: Range<usize>,
}

impl<S: SizeType, B: AsRef<[u8]>> Iterator for Descriptors<'_, S, B> {
    type Item = Descriptor;

    fn next(&mut self) -> Option<Descriptor> {
        self.range.next().map(|i| self.master.read_entry(i))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.range.size_hint()
    }
}

impl<S: SizeType, B: AsRef<[u8]>> DoubleEndedIterator for Descriptors<'_, S, B> {
    fn next_back(&mut self) -> Option<Descriptor> {
        self.range.next_back().map(|i| self.master.read_entry(i))
    }
}

impl<S: SizeType, B: AsRef<[u8]>> ExactSizeIterator for Descriptors<'_, S, B> {}
impl<S: SizeType, B: AsRef<[u8]>> FusedIterator for Descriptors<'_, S, B> {}

/// Iterator over live blocks as `(handle, payload)`.
pub struct Blocks<'a, S: SizeType, B> {
    inner: Descriptors<'a, S, B>,
}

impl<'a, S: SizeType, B: AsRef<[u8]>> Blocks<'a, S, B> {
    fn payload(&self, d: Descriptor) -> (Handle, &'a [u8]) {
        let master: &'a Master<S, B> = self.inner.master;
        (d.handle(), &master.buf.as_ref()[d.offset..d.end()])
    }
}

impl<'a, S: SizeType, B: AsRef<[u8]>> Iterator for Blocks<'a, S, B> {
    type Item = (Handle, &'a [u8]);

    fn next(&mut self) -> Option<Self::Item> {
        let d = self.inner.by_ref().find(Descriptor::is_valid)?;
        Some(self.payload(d))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.inner.size_hint().1)
    }
}

impl<S: SizeType, B: AsRef<[u8]>> DoubleEndedIterator for Blocks<'_, S, B> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let d = self.inner.by_ref().rfind(Descriptor::is_valid)?;
        Some(self.payload(d))
    }
}

impl<S: SizeType, B: AsRef<[u8]>> FusedIterator for Blocks<'_, S, B> {}

impl<S: SizeType, B: AsRef<[u8]>> Master<S, B> {
    /// Every descriptor, newest first.
    pub fn descriptors(&self) -> Descriptors<'_, S, B> {
        Descriptors {
            master: self,
            range: 0..self.num_entries(),
        }
    }

    /// Live blocks, newest first.
    pub fn blocks(&self) -> Blocks<'_, S, B> {
        Blocks {
            inner: self.descriptors(),
        }
    }

    /// Calls `f` with each table index and descriptor, newest first.
    pub fn for_each_entry<T>(
        &self,
        mut f: impl FnMut(usize, &Descriptor) -> ControlFlow<T>,
    ) -> Option<T> {
        visit(self.descriptors().enumerate(), |(i, d)| f(i, &d))
    }

    /// Like [`Master::for_each_entry`], oldest first.
    pub fn rfor_each_entry<T>(
        &self,
        mut f: impl FnMut(usize, &Descriptor) -> ControlFlow<T>,
    ) -> Option<T> {
        visit(self.descriptors().enumerate().rev(), |(i, d)| f(i, &d))
    }

    /// Calls `f` with each live descriptor, newest first.
    pub fn for_each_valid_entry<T>(
        &self,
        mut f: impl FnMut(usize, &Descriptor) -> ControlFlow<T>,
    ) -> Option<T> {
        self.for_each_entry(|i, d| {
            if d.is_valid() {
                f(i, d)
            } else {
                ControlFlow::Continue(())
            }
        })
    }

    /// Like [`Master::for_each_valid_entry`], oldest first.
    pub fn rfor_each_valid_entry<T>(
        &self,
        mut f: impl FnMut(usize, &Descriptor) -> ControlFlow<T>,
    ) -> Option<T> {
        self.rfor_each_entry(|i, d| {
            if d.is_valid() {
                f(i, d)
            } else {
                ControlFlow::Continue(())
            }
        })
    }

    /// Calls `f` with each live block's handle and payload, newest first.
    pub fn for_each_block<T>(
        &self,
        mut f: impl FnMut(Handle, &[u8]) -> ControlFlow<T>,
    ) -> Option<T> {
        visit(self.blocks(), |(h, bytes)| f(h, bytes))
    }

    /// Like [`Master::for_each_block`], oldest first.
    pub fn rfor_each_block<T>(
        &self,
        mut f: impl FnMut(Handle, &[u8]) -> ControlFlow<T>,
    ) -> Option<T> {
        visit(self.blocks().rev(), |(h, bytes)| f(h, bytes))
    }
}

impl<S: SizeType, B: AsRef<[u8]> + AsMut<[u8]>> Master<S, B> {
    /// Calls `f` with each live block's payload mutably, newest first.
    ///
    /// Only payload bytes are reachable; the table cannot change during the
    /// walk.
    pub fn for_each_block_mut<T>(
        &mut self,
        mut f: impl FnMut(Handle, &mut [u8]) -> ControlFlow<T>,
    ) -> Option<T> {
        for index in 0..self.num_entries() {
            let d = self.read_entry(index);
            if !d.is_valid() {
                continue;
            }
            let payload = &mut self.buf.as_mut()[d.offset..d.end()];
            if let ControlFlow::Break(value) = f(d.handle(), payload) {
                return Some(value);
            }
        }
        None
    }
}

fn visit<I: Iterator, T>(mut iter: I, f: impl FnMut(I::Item) -> ControlFlow<T>) -> Option<T> {
    match iter.try_for_each(f) {
        ControlFlow::Break(value) => Some(value),
        ControlFlow::Continue(()) => None,
    }
}
