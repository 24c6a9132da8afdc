//! Scratch storage for unescaped string contents.
//!
//! Decoding starts in the decoder's inline region. When a string decode needs
//! more room the scratch doubles, moving to memory from the
//! [`ScratchAllocator`] on the first growth; heap buffers go back to the
//! allocator in [`Scratch::release`].

use alloc::vec::Vec;

use crate::builder::ScratchAllocator;

/// Size of the inline scratch region owned by each decoder.
pub const INLINE_SCRATCH_CAPACITY: usize = 64 * 1024;

#[derive(Debug)]
pub(crate) struct Scratch<'buf> {
    inline: &'buf mut [u8],
    heap: Option<Vec<u8>>,
}

impl<'buf> Scratch<'buf> {
    pub fn new(inline: &'buf mut [u8]) -> Self {
        Self { inline, heap: None }
    }

    pub fn capacity(&self) -> usize {
        self.heap.as_ref().map_or(self.inline.len(), Vec::len)
    }

    pub fn is_heap(&self) -> bool {
        self.heap.is_some()
    }

    /// Grows the scratch by doubling until it holds at least `needed` bytes.
    /// Contents written so far are preserved.
    pub fn reserve<A: ScratchAllocator + ?Sized>(&mut self, needed: usize, allocator: &mut A) {
        let capacity = self.capacity();
        if needed <= capacity {
            return;
        }

        let mut new_capacity = capacity.max(1);
        while new_capacity < needed {
            new_capacity = new_capacity.saturating_mul(2);
        }

        let mut grown = allocator.allocate(new_capacity);
        if grown.len() < new_capacity {
            grown.resize(new_capacity, 0);
        }
        grown[..capacity].copy_from_slice(self.as_slice());

        tracing::trace!(
            from = capacity,
            to = new_capacity,
            promoted = !self.is_heap(),
            "growing string scratch"
        );

        if let Some(old) = self.heap.replace(grown) {
            allocator.release(old);
        }
    }

    pub fn as_slice(&self) -> &[u8] {
        match &self.heap {
            Some(heap) => heap,
            None => self.inline,
        }
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        match &mut self.heap {
            Some(heap) => heap,
            None => self.inline,
        }
    }

    /// Hands a promoted buffer back to the allocator.
    pub fn release<A: ScratchAllocator + ?Sized>(self, allocator: &mut A) {
        if let Some(heap) = self.heap {
            allocator.release(heap);
        }
    }
}
