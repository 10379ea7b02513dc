/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

//! Strided iterators over the rows and columns of a column-major matrix.
//!
//! ```text
//!            |<------------- width * ldim ------------->|
//!            +------+------+------+------+------+------+
//!            | a00  | a01  | a02  | ...                 |
//!            | a10  | a11  | a12  |                     |   column j: step 1
//!            | ...  |      |      |                     |   row i:    step ldim
//!            | pad  | pad  | pad  |                     |
//!            +------+------+------+------+------+------+
//! ```
//!
//! Rows are traversed with a step of `ldim`, columns with a step of one. Both iterators
//! are double-ended and exact-size, and `nth` jumps directly to the requested element.

use std::iter::{FusedIterator, StepBy, Take};

/// Return the number of contiguous elements spanned by `count` elements separated by
/// `stride`.
pub fn linear_length(count: usize, stride: usize) -> usize {
    (count.max(1) - 1) * stride + count.min(1)
}

macro_rules! strided_iterator {
    ($name:ident, $item:ty, $method:ident, $($mut:tt)?) => {
        impl<'a, T> $name<'a, T> {
            /// Construct an iterator over `count` elements of `data` spaced `stride`
            /// elements apart.
            ///
            /// # Panics
            ///
            /// Panics if `stride == 0` or if `data` is shorter than
            /// [`linear_length(count, stride)`](linear_length).
            pub fn new(data: &'a $($mut)? [T], count: usize, stride: usize) -> Self {
                assert_ne!(stride, 0, "stride must be non-zero");
                assert!(
                    data.len() >= linear_length(count, stride),
                    "a slice of length {} cannot hold {} elements with stride {}",
                    data.len(),
                    count,
                    stride,
                );
                Self {
                    inner: data.$method().step_by(stride).take(count),
                    stride,
                }
            }

            /// Return the distance (in elements) between consecutive items.
            pub fn stride(&self) -> usize {
                self.stride
            }
        }

        impl<'a, T> Iterator for $name<'a, T> {
            type Item = $item;

            #[inline]
            fn next(&mut self) -> Option<Self::Item> {
                self.inner.next()
            }

            #[inline]
            fn nth(&mut self, n: usize) -> Option<Self::Item> {
                self.inner.nth(n)
            }

            #[inline]
            fn size_hint(&self) -> (usize, Option<usize>) {
                self.inner.size_hint()
            }
        }

        impl<T> DoubleEndedIterator for $name<'_, T> {
            #[inline]
            fn next_back(&mut self) -> Option<Self::Item> {
                self.inner.next_back()
            }

            #[inline]
            fn nth_back(&mut self, n: usize) -> Option<Self::Item> {
                self.inner.nth_back(n)
            }
        }

        impl<T> ExactSizeIterator for $name<'_, T> {}
        impl<T> FusedIterator for $name<'_, T> {}
    };
}

/// An immutable strided iterator. See the [module level documentation](self).
#[derive(Debug, Clone)]
pub struct Strided<'a, T> {
    inner: Take<StepBy<std::slice::Iter<'a, T>>>,
    stride: usize,
}

/// A mutable strided iterator. See the [module level documentation](self).
#[derive(Debug)]
pub struct StridedMut<'a, T> {
    inner: Take<StepBy<std::slice::IterMut<'a, T>>>,
    stride: usize,
}

strided_iterator!(Strided, &'a T, iter,);
strided_iterator!(StridedMut, &'a mut T, iter_mut, mut);

///////////
// Tests //
///////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_length() {
        assert_eq!(linear_length(0, 5), 0);
        assert_eq!(linear_length(1, 5), 1);
        assert_eq!(linear_length(2, 5), 6);
        assert_eq!(linear_length(3, 1), 3);
    }

    #[test]
    fn test_strided() {
        let data: Vec<usize> = (0..12).collect();
        let it = Strided::new(&data, 3, 4);
        assert_eq!(it.stride(), 4);
        assert_eq!(it.len(), 3);
        assert_eq!(it.copied().collect::<Vec<_>>(), vec![0, 4, 8]);

        let it = Strided::new(&data[1..], 3, 4);
        assert_eq!(it.rev().copied().collect::<Vec<_>>(), vec![9, 5, 1]);

        // Random access.
        let mut it = Strided::new(&data, 4, 3);
        assert_eq!(it.nth(2), Some(&6));
        assert_eq!(it.len(), 1);
        assert_eq!(it.next(), Some(&9));
        assert_eq!(it.next(), None);

        // Only `linear_length` elements are required.
        let it = Strided::new(&data[..9], 3, 4);
        assert_eq!(it.count(), 3);
    }

    #[test]
    fn test_strided_mut() {
        let mut data = vec![0; 10];
        StridedMut::new(&mut data, 4, 3).for_each(|x| *x = 1);
        assert_eq!(data, vec![1, 0, 0, 1, 0, 0, 1, 0, 0, 1]);
    }

    #[test]
    fn test_empty() {
        let data: [f32; 0] = [];
        assert_eq!(Strided::new(&data, 0, 7).count(), 0);
    }

    #[test]
    #[should_panic(expected = "cannot hold")]
    fn test_too_short() {
        let data = [0u8; 8];
        let _ = Strided::new(&data, 3, 4);
    }

    #[test]
    #[should_panic(expected = "stride must be non-zero")]
    fn test_zero_stride() {
        let data = [0u8; 8];
        let _ = Strided::new(&data, 3, 0);
    }
}
