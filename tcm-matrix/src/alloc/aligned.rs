/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

use std::{alloc::Layout, ptr::NonNull};

use super::AllocatorError;
use crate::num::PowerOfTwo;

/// An allocator that hands out zero-initialized memory aligned to at least a specified
/// alignment.
///
/// This type does not support allocations of size 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignedAllocator {
    /// This represents a power of 2.
    alignment: u8,
}

impl AlignedAllocator {
    /// Construct a new allocator that uses the given alignment.
    #[inline]
    pub const fn new(alignment: PowerOfTwo) -> Self {
        Self {
            // CAST: `trailing_zeros` returns as most 63 (because we've removed 0), so
            // the conversion is always lossless.
            alignment: alignment.raw().trailing_zeros() as u8,
        }
    }

    #[inline]
    pub const fn alignment(&self) -> usize {
        1usize << (self.alignment as usize)
    }

    /// Return the layout actually requested from the global allocator for `layout`.
    #[inline]
    pub fn effective_layout(&self, layout: Layout) -> Result<Layout, AllocatorError> {
        layout
            .align_to(self.alignment())
            .map_err(|_| AllocatorError)
    }

    /// Allocate zeroed space for `layout.size()` bytes aligned to at least
    /// `max(layout.align(), self.alignment())`.
    ///
    /// Returns an error if `layout` has size 0 or the global allocator fails.
    pub fn allocate_zeroed(&self, layout: Layout) -> Result<NonNull<u8>, AllocatorError> {
        let layout = self.effective_layout(layout)?;
        if layout.size() == 0 {
            return Err(AllocatorError);
        }

        // SAFETY: `layout` has a non-zero size.
        let ptr = unsafe { std::alloc::alloc_zeroed(layout) };
        NonNull::new(ptr).ok_or(AllocatorError)
    }

    /// Deallocation companion to `allocate_zeroed`.
    ///
    /// # Safety
    ///
    /// The caller must ensure that
    ///
    /// 1. `ptr` was returned by [`Self::allocate_zeroed`] on an allocator with the same
    ///    alignment and has not yet been deallocated.
    /// 2. `layout` is the same layout that was passed to [`Self::allocate_zeroed`].
    pub unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        // The layout was accepted by `allocate_zeroed`, so re-aligning cannot fail.
        if let Ok(layout) = self.effective_layout(layout) {
            // SAFETY: Inherited from the caller.
            unsafe { std::alloc::dealloc(ptr.as_ptr(), layout) }
        }
    }
}

///////////
// Tests //
///////////
