/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

use std::{
    fmt,
    ops::{Index, IndexMut},
};

use thiserror::Error;

use crate::{
    alloc::{AlignedBuffer, AllocatorError, DEFAULT_ALIGNMENT},
    num::PowerOfTwo,
    strided::{Strided, StridedMut},
};

/// A dense `height x width` matrix stored in column-major order.
///
/// ```text
///            |<---- width ---->|
///          +-------------------+   ^
///          | a00  a01  ... a0w |   |
///          | a10  a11  ... a1w | height
///          | ...               |   |
///          | ah0  ah1  ... ahw |   v
///          | pad  pad  ... pad |
///          +-------------------+
///            ^
///            ldim (distance between the start of consecutive columns)
/// ```
///
/// Element `(i, j)` lives at offset `i + ldim * j` of the owned [`AlignedBuffer`]. When
/// constructed with [`DenseMatrix::new`], `ldim` is `height` rounded up so that every
/// column starts on a [`DEFAULT_ALIGNMENT`] boundary.
///
/// The matrix is move-only. Use [`DenseMatrix::try_clone`] to make a copy.
pub struct DenseMatrix<T: Copy> {
    buffer: AlignedBuffer<T>,
    height: usize,
    width: usize,
    ldim: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum MatrixError {
    #[error("the leading dimension must be non-zero")]
    ZeroLeadingDimension,
    #[error("leading dimension {ldim} is smaller than the height {height}")]
    LeadingDimensionTooSmall { height: usize, ldim: usize },
    #[error(
        "storage for a {height}x{width} matrix with leading dimension {ldim} overflows usize"
    )]
    Overflow {
        height: usize,
        width: usize,
        ldim: usize,
    },
    #[error("failed to allocate a {height}x{width} matrix")]
    Allocation {
        height: usize,
        width: usize,
        #[source]
        source: AllocatorError,
    },
}

/// Return the number of elements `T` that fit in `alignment` bytes, clamped to at least 1.
fn alignment_multiple<T>(alignment: PowerOfTwo) -> PowerOfTwo {
    alignment.saturating_div(std::mem::size_of::<T>())
}

impl<T: Copy> DenseMatrix<T> {
    /// Construct an empty `0 x 0` matrix. This does not allocate.
    pub const fn empty() -> Self {
        Self {
            buffer: AlignedBuffer::empty(),
            height: 0,
            width: 0,
            ldim: 0,
        }
    }

    /// Return the number of rows.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Return the number of columns.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Return the distance between the start of consecutive columns.
    #[inline]
    pub fn ldim(&self) -> usize {
        self.ldim
    }

    /// Return the shape as `(height, width)`.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    /// Return `true` if `height == width`.
    pub fn is_square(&self) -> bool {
        self.height == self.width
    }

    /// Return `true` if the matrix is a row vector (`height == 1`).
    pub fn is_row(&self) -> bool {
        self.height == 1
    }

    /// Return `true` if the matrix is a column vector (`width == 1`).
    pub fn is_column(&self) -> bool {
        self.width == 1
    }

    /// Return the whole underlying storage, padding included.
    ///
    /// The length is at least `ldim * width`.
    pub fn as_slice(&self) -> &[T] {
        &self.buffer
    }

    /// Return the whole underlying storage mutably, padding included.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.buffer
    }

    /// Return a pointer to element `(0, 0)`.
    pub fn as_ptr(&self) -> *const T {
        self.buffer.as_ptr()
    }

    /// Return a mutable pointer to element `(0, 0)`.
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.buffer.as_mut_ptr()
    }

    #[inline(always)]
    fn offset(&self, i: usize, j: usize) -> usize {
        i + self.ldim * j
    }

    /// Return a reference to element `(i, j)`.
    ///
    /// Bounds are only checked in debug builds. In release builds, an out-of-range `(i, j)`
    /// that still lands inside the allocation silently reads the wrong element.
    #[inline]
    pub fn at(&self, i: usize, j: usize) -> &T {
        debug_assert!(
            i < self.height,
            "row {i} is out of bounds (height: {})",
            self.height
        );
        debug_assert!(
            j < self.width,
            "column {j} is out of bounds (width: {})",
            self.width
        );
        &self.buffer[self.offset(i, j)]
    }

    /// Return a mutable reference to element `(i, j)`. See [`Self::at`].
    #[inline]
    pub fn at_mut(&mut self, i: usize, j: usize) -> &mut T {
        debug_assert!(
            i < self.height,
            "row {i} is out of bounds (height: {})",
            self.height
        );
        debug_assert!(
            j < self.width,
            "column {j} is out of bounds (width: {})",
            self.width
        );
        let offset = self.offset(i, j);
        &mut self.buffer[offset]
    }

    /// Return column `j` as a contiguous slice of `height` elements.
    ///
    /// # Panics
    ///
    /// Panics if `j >= self.width()`.
    pub fn column_slice(&self, j: usize) -> &[T] {
        assert!(
            j < self.width,
            "tried to access column {j} of a matrix with {} columns",
            self.width
        );
        let start = self.offset(0, j);
        &self.buffer[start..start + self.height]
    }

    /// Return column `j` as a contiguous mutable slice of `height` elements.
    ///
    /// # Panics
    ///
    /// Panics if `j >= self.width()`.
    pub fn column_slice_mut(&mut self, j: usize) -> &mut [T] {
        assert!(
            j < self.width,
            "tried to access column {j} of a matrix with {} columns",
            self.width
        );
        let start = self.offset(0, j);
        let height = self.height;
        &mut self.buffer[start..start + height]
    }

    /// Return an iterator over the `width` elements of row `i`, stepping by `ldim`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= self.height()`.
    pub fn row(&self, i: usize) -> Strided<'_, T> {
        assert!(
            i < self.height,
            "tried to access row {i} of a matrix with {} rows",
            self.height
        );
        let data = self.buffer.get(i..).unwrap_or(&[]);
        Strided::new(data, self.width, self.ldim)
    }

    /// Return a mutable iterator over the `width` elements of row `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= self.height()`.
    pub fn row_mut(&mut self, i: usize) -> StridedMut<'_, T> {
        assert!(
            i < self.height,
            "tried to access row {i} of a matrix with {} rows",
            self.height
        );
        let (width, ldim) = (self.width, self.ldim);
        let data = self.buffer.get_mut(i..).unwrap_or(&mut []);
        StridedMut::new(data, width, ldim)
    }

    /// Return an iterator over the `height` elements of column `j`.
    ///
    /// # Panics
    ///
    /// Panics if `j >= self.width()`.
    pub fn column(&self, j: usize) -> Strided<'_, T> {
        let height = self.height;
        Strided::new(self.column_slice(j), height, 1)
    }

    /// Return a mutable iterator over the `height` elements of column `j`.
    ///
    /// # Panics
    ///
    /// Panics if `j >= self.width()`.
    pub fn column_mut(&mut self, j: usize) -> StridedMut<'_, T> {
        let height = self.height;
        StridedMut::new(self.column_slice_mut(j), height, 1)
    }

    /// Return an iterator over the columns as contiguous slices.
    pub fn column_iter(&self) -> impl ExactSizeIterator<Item = &[T]> {
        (0..self.width).map(move |j| self.column_slice(j))
    }

    /// Visit every logical element in column-major order.
    pub fn for_each_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(usize, usize, &mut T),
    {
        let (height, width, ldim) = (self.height, self.width, self.ldim);
        if height == 0 {
            return;
        }
        self.buffer
            .chunks_mut(ldim)
            .take(width)
            .enumerate()
            .for_each(|(j, column)| {
                column[..height]
                    .iter_mut()
                    .enumerate()
                    .for_each(|(i, x)| f(i, j, x))
            });
    }

    /// Set every logical element to `value`. Padding is left untouched.
    pub fn fill(&mut self, value: T) {
        self.for_each_mut(|_, _, x| *x = value);
    }
}

impl<T> DenseMatrix<T>
where
    T: Copy + bytemuck::Zeroable,
{
    /// Construct a `height x width` matrix whose leading dimension is `height` rounded up
    /// to the number of `T`s that fit in [`DEFAULT_ALIGNMENT`] bytes.
    ///
    /// Callers should not rely on the initial contents.
    pub fn new(height: usize, width: usize) -> Result<Self, MatrixError> {
        let multiple = alignment_multiple::<T>(DEFAULT_ALIGNMENT);
        let ldim = multiple
            .arg_checked_next_multiple_of(height)
            .ok_or(MatrixError::Overflow {
                height,
                width,
                ldim: height,
            })?;
        Self::allocate(height, width, ldim)
    }

    /// Construct a `height x width` matrix with an explicit leading dimension.
    ///
    /// Returns an error if `ldim == 0` or `ldim < height`.
    pub fn with_ldim(height: usize, width: usize, ldim: usize) -> Result<Self, MatrixError> {
        if ldim == 0 {
            return Err(MatrixError::ZeroLeadingDimension);
        }
        if ldim < height {
            return Err(MatrixError::LeadingDimensionTooSmall { height, ldim });
        }
        Self::allocate(height, width, ldim)
    }

    /// Construct a `height x width` matrix with every element set to zero.
    pub fn zeros(height: usize, width: usize) -> Result<Self, MatrixError> {
        // The allocator hands out zeroed memory.
        Self::new(height, width)
    }

    fn allocate(height: usize, width: usize, ldim: usize) -> Result<Self, MatrixError> {
        let len = ldim
            .checked_mul(width)
            .ok_or(MatrixError::Overflow {
                height,
                width,
                ldim,
            })?;
        let buffer = AlignedBuffer::new(len).map_err(|source| MatrixError::Allocation {
            height,
            width,
            source,
        })?;
        Ok(Self {
            buffer,
            height,
            width,
            ldim,
        })
    }

    /// Create a deep copy with the same shape and leading dimension.
    pub fn try_clone(&self) -> Result<Self, MatrixError> {
        let buffer = self
            .buffer
            .try_clone()
            .map_err(|source| MatrixError::Allocation {
                height: self.height,
                width: self.width,
                source,
            })?;
        Ok(Self {
            buffer,
            height: self.height,
            width: self.width,
            ldim: self.ldim,
        })
    }
}

/// Construct a `height x width` matrix by evaluating `f(i, j)` for every element.
///
/// Elements are generated in column-major order.
pub fn build_matrix<T, F>(
    height: usize,
    width: usize,
    mut f: F,
) -> Result<DenseMatrix<T>, MatrixError>
where
    T: Copy + bytemuck::Zeroable,
    F: FnMut(usize, usize) -> T,
{
    let mut matrix = DenseMatrix::new(height, width)?;
    matrix.for_each_mut(|i, j, x| *x = f(i, j));
    Ok(matrix)
}

impl<T: Copy> Default for DenseMatrix<T> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Return a reference to the element at `(i, j)`. See [`DenseMatrix::at`].
impl<T: Copy> Index<(usize, usize)> for DenseMatrix<T> {
    type Output = T;

    #[inline]
    fn index(&self, (i, j): (usize, usize)) -> &Self::Output {
        self.at(i, j)
    }
}

/// Return a mutable reference to the element at `(i, j)`. See [`DenseMatrix::at_mut`].
impl<T: Copy> IndexMut<(usize, usize)> for DenseMatrix<T> {
    #[inline]
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut Self::Output {
        self.at_mut(i, j)
    }
}

/// Two matrices compare equal if they have the same shape and the same logical elements.
/// The leading dimension and padding are ignored.
impl<T: Copy + PartialEq> PartialEq for DenseMatrix<T> {
    fn eq(&self, other: &Self) -> bool {
        self.shape() == other.shape()
            && std::iter::zip(self.column_iter(), other.column_iter()).all(|(a, b)| a == b)
    }
}

impl<T: Copy + fmt::Debug> fmt::Debug for DenseMatrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows: Vec<Vec<T>> = (0..self.height)
            .map(|i| self.row(i).copied().collect())
            .collect();
        f.debug_struct("DenseMatrix")
            .field("height", &self.height)
            .field("width", &self.width)
            .field("ldim", &self.ldim)
            .field("rows", &rows)
            .finish()
    }
}

///////////
// Tests //
///////////

#[cfg(test)]
mod tests {
    use num_complex::{Complex32, Complex64};
    use rstest::rstest;

    use super::*;

    fn counting(height: usize, width: usize) -> DenseMatrix<f64> {
        build_matrix(height, width, |i, j| (10 * i + j) as f64).unwrap()
    }

    #[test]
    fn test_empty() {
        let m = DenseMatrix::<f64>::default();
        assert_eq!(m.shape(), (0, 0));
        assert_eq!(m.ldim(), 0);
        assert!(m.is_square());
        assert!(m.as_slice().is_empty());
        assert_eq!(m.column_iter().len(), 0);
    }

    #[rstest]
    #[case::f32(4, 16)]
    #[case::f64(8, 8)]
    #[case::c32(8, 8)]
    #[case::c64(16, 4)]
    fn test_alignment_multiple(#[case] size: usize, #[case] expected: usize) {
        assert_eq!(DEFAULT_ALIGNMENT.saturating_div(size).raw(), expected);
    }

    #[test]
    fn test_leading_dimension_is_rounded() {
        let m = DenseMatrix::<f64>::new(3, 5).unwrap();
        assert_eq!(m.ldim(), 8);
        assert!(m.as_slice().len() >= m.ldim() * m.width());

        let m = DenseMatrix::<f32>::new(17, 2).unwrap();
        assert_eq!(m.ldim(), 32);

        let m = DenseMatrix::<Complex64>::new(5, 5).unwrap();
        assert_eq!(m.ldim(), 8);

        let m = DenseMatrix::<Complex32>::new(8, 1).unwrap();
        assert_eq!(m.ldim(), 8);
    }

    #[test]
    fn test_columns_are_aligned() {
        for height in [1, 2, 3, 5, 7, 9, 31, 33] {
            let m = DenseMatrix::<f64>::new(height, 3).unwrap();
            let base = m.as_ptr() as usize;
            assert_eq!(base % 64, 0, "height = {height}");
            let second = m.column_slice(1).as_ptr() as usize;
            assert_eq!(second % 64, 0, "height = {height}");

            let m = DenseMatrix::<Complex64>::new(height, 2).unwrap();
            assert_eq!(m.at(0, 0) as *const _ as usize % 64, 0);
            assert_eq!(m.at(0, 1) as *const _ as usize % 64, 0);
        }
    }

    #[test]
    fn test_with_ldim() {
        let m = DenseMatrix::<f32>::with_ldim(3, 4, 5).unwrap();
        assert_eq!(m.ldim(), 5);
        assert_eq!(m.as_slice().len(), 20);

        assert_eq!(
            DenseMatrix::<f32>::with_ldim(3, 4, 0).unwrap_err(),
            MatrixError::ZeroLeadingDimension
        );
        assert_eq!(
            DenseMatrix::<f32>::with_ldim(3, 4, 2).unwrap_err(),
            MatrixError::LeadingDimensionTooSmall { height: 3, ldim: 2 }
        );
    }

    #[test]
    fn test_overflow() {
        let err = DenseMatrix::<f64>::new(usize::MAX, 2).unwrap_err();
        assert!(matches!(err, MatrixError::Overflow { .. }), "{err:?}");

        let err = DenseMatrix::<f64>::with_ldim(1 << 40, 1 << 40, 1 << 40).unwrap_err();
        assert!(matches!(err, MatrixError::Overflow { .. }), "{err:?}");

        let err = DenseMatrix::<f64>::with_ldim(1, usize::MAX / 16, 1).unwrap_err();
        assert!(matches!(err, MatrixError::Allocation { .. }), "{err:?}");
    }

    #[test]
    fn test_layout() {
        let m = counting(3, 4);
        let ldim = m.ldim();
        for i in 0..3 {
            for j in 0..4 {
                assert_eq!(m[(i, j)], (10 * i + j) as f64);
                assert_eq!(m.as_slice()[i + ldim * j], m[(i, j)]);
            }
        }
        assert!(!m.is_square());
        assert!(!m.is_row());
        assert!(!m.is_column());
        assert!(counting(1, 4).is_row());
        assert!(counting(4, 1).is_column());
        assert!(counting(4, 4).is_square());
    }

    #[test]
    fn test_row_and_column_iterators() {
        let mut m = counting(3, 4);
        assert_eq!(m.row(1).stride(), m.ldim());
        assert_eq!(
            m.row(1).copied().collect::<Vec<_>>(),
            vec![10.0, 11.0, 12.0, 13.0]
        );
        assert_eq!(m.row(2).len(), 4);
        assert_eq!(
            m.column(2).copied().collect::<Vec<_>>(),
            vec![2.0, 12.0, 22.0]
        );
        assert_eq!(m.column(2).stride(), 1);
        assert_eq!(m.row(0).nth(3), Some(&3.0));
        assert_eq!(m.row(0).next_back(), Some(&3.0));

        m.row_mut(0).for_each(|x| *x = -1.0);
        m.column_mut(3).for_each(|x| *x *= 2.0);
        assert_eq!(
            m.row(0).copied().collect::<Vec<_>>(),
            vec![-1.0, -1.0, -1.0, -2.0]
        );
        assert_eq!(
            m.column(3).copied().collect::<Vec<_>>(),
            vec![-2.0, 26.0, 46.0]
        );

        // Hadamard product of two rows.
        let m = counting(2, 3);
        let product: Vec<f64> = std::iter::zip(m.row(0), m.row(1))
            .map(|(a, b)| a * b)
            .collect();
        assert_eq!(product, vec![0.0, 11.0, 24.0]);
    }

    #[test]
    fn test_zero_width_rows() {
        let m = DenseMatrix::<f32>::new(3, 0).unwrap();
        assert_eq!(m.row(2).count(), 0);
    }

    #[test]
    #[should_panic(expected = "tried to access row 3")]
    fn test_row_out_of_bounds() {
        let m = counting(3, 4);
        let _ = m.row(3);
    }

    #[test]
    #[should_panic(expected = "tried to access column 4")]
    fn test_column_out_of_bounds() {
        let m = counting(3, 4);
        let _ = m.column(4);
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "row 3 is out of bounds")]
    fn test_at_out_of_bounds() {
        let m = counting(3, 4);
        let _ = m.at(3, 0);
    }

    #[test]
    fn test_fill_leaves_padding() {
        let mut m = DenseMatrix::<f32>::with_ldim(2, 2, 3).unwrap();
        m.fill(7.0);
        assert_eq!(m.as_slice(), &[7.0, 7.0, 0.0, 7.0, 7.0, 0.0]);
    }

    #[test]
    fn test_try_clone_and_eq() {
        let m = counting(5, 3);
        let c = m.try_clone().unwrap();
        assert_eq!(m, c);
        assert_ne!(m.as_ptr(), c.as_ptr());

        // Equality ignores the leading dimension.
        let mut other = DenseMatrix::<f64>::with_ldim(5, 3, 11).unwrap();
        other.for_each_mut(|i, j, x| *x = m[(i, j)]);
        assert_eq!(m, other);

        other[(4, 2)] = 0.5;
        assert_ne!(m, other);
        assert_ne!(counting(3, 5), counting(5, 3));
    }

    #[test]
    fn test_debug() {
        let m = counting(2, 2);
        let s = format!("{:?}", m);
        assert!(s.contains("[[0.0, 1.0], [10.0, 11.0]]"), "{s}");
    }
}
