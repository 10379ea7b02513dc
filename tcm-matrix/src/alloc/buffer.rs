/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

use std::{
    alloc::Layout,
    fmt,
    marker::PhantomData,
    ops::{Deref, DerefMut},
    ptr::NonNull,
};

use super::{AlignedAllocator, AllocatorError, DEFAULT_ALIGNMENT};
use crate::num::PowerOfTwo;

/// Fixed-capacity heap storage for `len` elements of a trivially copyable `T`, starting
/// at an address that is a multiple of a chosen power-of-two alignment.
///
/// The buffer never grows or shrinks. It is move-only: duplicating the storage requires
/// an explicit call to [`AlignedBuffer::try_clone`].
///
/// Requesting zero elements performs no allocation.
pub struct AlignedBuffer<T: Copy> {
    ptr: NonNull<T>,
    len: usize,
    allocator: AlignedAllocator,
    _marker: PhantomData<T>,
}

// SAFETY: `AlignedBuffer` uniquely owns its allocation, just like `Box<[T]>`.
unsafe impl<T: Copy + Send> Send for AlignedBuffer<T> {}

// SAFETY: Shared access only hands out `&[T]`.
unsafe impl<T: Copy + Sync> Sync for AlignedBuffer<T> {}

impl<T: Copy> AlignedBuffer<T> {
    /// Return an empty buffer. This does not allocate.
    pub const fn empty() -> Self {
        Self {
            ptr: NonNull::dangling(),
            len: 0,
            allocator: AlignedAllocator::new(DEFAULT_ALIGNMENT),
            _marker: PhantomData,
        }
    }

    /// Allocate zeroed, uninterpreted storage for `len` elements.
    ///
    /// The effective alignment is the larger of `alignment` and the natural alignment
    /// of `T`.
    fn allocate(len: usize, alignment: PowerOfTwo) -> Result<Self, AllocatorError> {
        let allocator = AlignedAllocator::new(alignment.max(PowerOfTwo::alignment_of::<T>()));
        let layout = Self::layout(len)?;
        if layout.size() == 0 {
            return Ok(Self {
                ptr: NonNull::dangling(),
                len,
                allocator,
                _marker: PhantomData,
            });
        }

        let ptr = allocator.allocate_zeroed(layout)?.cast::<T>();
        Ok(Self {
            ptr,
            len,
            allocator,
            _marker: PhantomData,
        })
    }

    fn layout(len: usize) -> Result<Layout, AllocatorError> {
        Layout::array::<T>(len).map_err(|_| AllocatorError)
    }

    /// Return the number of elements in the buffer.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Return `true` if the buffer holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Return the alignment (in bytes) that the base pointer satisfies when the buffer
    /// is non-empty.
    #[inline]
    pub fn alignment(&self) -> usize {
        self.allocator.alignment()
    }

    /// Return a pointer to the first element.
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.ptr.as_ptr()
    }

    /// Return a mutable pointer to the first element.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.ptr.as_ptr()
    }
}

impl<T> AlignedBuffer<T>
where
    T: Copy + bytemuck::Zeroable,
{
    /// Allocate a buffer of `len` elements using [`DEFAULT_ALIGNMENT`].
    ///
    /// The contents are all-bits-zero, which is a valid value for every `Zeroable` type.
    pub fn new(len: usize) -> Result<Self, AllocatorError> {
        Self::with_alignment(len, DEFAULT_ALIGNMENT)
    }

    /// Allocate a buffer of `len` elements whose base address is a multiple of
    /// `alignment`.
    pub fn with_alignment(len: usize, alignment: PowerOfTwo) -> Result<Self, AllocatorError> {
        Self::allocate(len, alignment)
    }

    /// Create a deep copy of the buffer with the same length and alignment.
    pub fn try_clone(&self) -> Result<Self, AllocatorError> {
        let alignment = PowerOfTwo::new(self.alignment()).unwrap_or(DEFAULT_ALIGNMENT);
        let mut other = Self::allocate(self.len, alignment)?;
        other.copy_from_slice(self);
        Ok(other)
    }
}

impl<T: Copy> Drop for AlignedBuffer<T> {
    fn drop(&mut self) {
        let Ok(layout) = Self::layout(self.len) else {
            return;
        };
        if layout.size() != 0 {
            // SAFETY: Non-zero sized buffers are only created by `allocate`, which
            // obtained `ptr` from `self.allocator` using this same layout.
            unsafe { self.allocator.deallocate(self.ptr.cast::<u8>(), layout) }
        }
    }
}

impl<T: Copy> Deref for AlignedBuffer<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        // SAFETY: `ptr` is either dangling with `len * size_of::<T>() == 0`, or points to
        // a live allocation of `len` initialized (zeroed or copied) elements.
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }
}

impl<T: Copy> DerefMut for AlignedBuffer<T> {
    fn deref_mut(&mut self) -> &mut [T] {
        // SAFETY: See `deref`. We have exclusive access through `&mut self`.
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }
}

impl<T: Copy> Default for AlignedBuffer<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: Copy + fmt::Debug> fmt::Debug for AlignedBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlignedBuffer")
            .field("len", &self.len)
            .field("alignment", &self.alignment())
            .finish()
    }
}

///////////
// Tests //
///////////
