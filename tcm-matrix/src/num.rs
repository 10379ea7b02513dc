/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

//! Integer helpers for alignment arithmetic.

use std::num::NonZeroUsize;

use thiserror::Error;

/// A `usize` that is guaranteed to be a non-zero power of two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct PowerOfTwo(NonZeroUsize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("value {0} must be a power of two")]
#[non_exhaustive]
pub struct NotPowerOfTwo(pub usize);

impl PowerOfTwo {
    /// Create a new `PowerOfTwo` if `value` is a power of two.
    pub const fn new(value: usize) -> Result<Self, NotPowerOfTwo> {
        match NonZeroUsize::new(value) {
            Some(v) if v.is_power_of_two() => Ok(Self(v)),
            _ => Err(NotPowerOfTwo(value)),
        }
    }

    /// Return the alignment of `T` as a power of two.
    pub const fn alignment_of<T>() -> Self {
        match Self::new(std::mem::align_of::<T>()) {
            Ok(v) => v,
            // Alignments reported by the compiler are always powers of two.
            Err(_) => Self(NonZeroUsize::MIN),
        }
    }

    /// Return the inner value as a `usize`.
    pub const fn raw(self) -> usize {
        self.0.get()
    }

    /// Return the larger of `self` and `other`.
    pub const fn max(self, other: Self) -> Self {
        if self.raw() >= other.raw() {
            self
        } else {
            other
        }
    }

    /// Compute `lhs % self`.
    pub const fn arg_mod(self, lhs: usize) -> usize {
        lhs & (self.raw() - 1)
    }

    /// Calculate the smallest value greater than or equal to `lhs` that is a multiple of
    /// `self`. Return `None` if the operation would overflow.
    pub const fn arg_checked_next_multiple_of(self, lhs: usize) -> Option<usize> {
        let m = self.arg_mod(lhs);
        if m == 0 {
            Some(lhs)
        } else {
            lhs.checked_add(self.raw() - m)
        }
    }

    /// Divide `self` by `rhs`, saturating at one.
    ///
    /// This is used to turn a byte alignment into an element count: a 64-byte boundary
    /// holds 8 `f64`s but only 4 `Complex<f64>`s.
    pub const fn saturating_div(self, rhs: usize) -> Self {
        if rhs == 0 || rhs >= self.raw() {
            return Self(NonZeroUsize::MIN);
        }
        match Self::new(self.raw() / rhs) {
            Ok(v) => v,
            Err(_) => Self(NonZeroUsize::MIN),
        }
    }
}

impl From<PowerOfTwo> for usize {
    #[inline(always)]
    fn from(value: PowerOfTwo) -> Self {
        value.raw()
    }
}
