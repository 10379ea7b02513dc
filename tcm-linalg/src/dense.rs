/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

//! BLAS and LAPACK on [`DenseMatrix`] operands.
//!
//! These wrappers assert that the operand shapes are compatible and forward the
//! matrices' storage and leading dimensions to [`crate::blas`] and [`crate::lapack`].

use num_complex::Complex;
use num_traits::Zero;
use tcm_matrix::DenseMatrix;

use crate::{blas, common::Operator, field::Field, lapack, lapack::LapackError};

/// Leading dimension to report to the native routines. Empty matrices may carry
/// `ldim == 0`, which the native interface rejects even when nothing is read.
#[inline]
fn ld<T: Copy>(m: &DenseMatrix<T>) -> usize {
    m.ldim().max(1)
}

/// Return `(length, stride)` of a row or column vector.
fn vector_view<T: Copy>(name: &str, v: &DenseMatrix<T>) -> (usize, usize) {
    if v.is_column() {
        (v.height(), 1)
    } else {
        assert!(
            v.is_row(),
            "`{name}` must be a row or column vector, got a {}x{} matrix",
            v.height(),
            v.width()
        );
        (v.width(), ld(v))
    }
}

/// Inner product of two row or column vectors of equal length. The first argument is
/// conjugated for complex fields.
///
/// # Panics
///
/// Panics if either argument is not a vector or if the lengths differ.
pub fn dot<T: Field>(x: &DenseMatrix<T>, y: &DenseMatrix<T>) -> T {
    let (n, incx) = vector_view("x", x);
    let (m, incy) = vector_view("y", y);
    assert_eq!(n, m, "vectors of length {n} and {m} have no inner product");
    blas::dot(n, x.as_slice(), incx, y.as_slice(), incy)
}

/// `y <- alpha * x + y` for row or column vectors of equal length.
///
/// # Panics
///
/// Panics if either argument is not a vector or if the lengths differ.
pub fn axpy<T: Field>(alpha: T, x: &DenseMatrix<T>, y: &mut DenseMatrix<T>) {
    let (n, incx) = vector_view("x", x);
    let (m, incy) = vector_view("y", y);
    assert_eq!(n, m, "vectors of length {n} and {m} differ in length");
    blas::axpy(n, alpha, x.as_slice(), incx, y.as_mut_slice(), incy)
}

/// `y <- alpha * op(a) * x + beta * y` for column vectors `x` and `y`.
///
/// # Panics
///
/// Panics if `x` or `y` is not a column or if the shapes are incompatible.
pub fn gemv<T: Field>(
    op: Operator,
    alpha: T,
    a: &DenseMatrix<T>,
    x: &DenseMatrix<T>,
    beta: T,
    y: &mut DenseMatrix<T>,
) {
    assert!(x.is_column() && y.is_column(), "`x` and `y` must be columns");
    let (rows, cols) = op.forward(a.shape(), (a.width(), a.height()));
    assert!(
        rows == y.height() && cols == x.height(),
        "cannot multiply op({}x{}) by a vector of length {} into one of length {}",
        a.height(),
        a.width(),
        x.height(),
        y.height()
    );
    blas::gemv(
        op,
        a.height(),
        a.width(),
        alpha,
        a.as_slice(),
        ld(a),
        x.as_slice(),
        1,
        beta,
        y.as_mut_slice(),
        1,
    )
}

/// `c <- alpha * op_a(a) * op_b(b) + beta * c`.
///
/// # Panics
///
/// Panics if the shapes are incompatible.
pub fn gemm<T: Field>(
    op_a: Operator,
    op_b: Operator,
    alpha: T,
    a: &DenseMatrix<T>,
    b: &DenseMatrix<T>,
    beta: T,
    c: &mut DenseMatrix<T>,
) {
    let (a_rows, a_cols) = op_a.forward(a.shape(), (a.width(), a.height()));
    let (b_rows, b_cols) = op_b.forward(b.shape(), (b.width(), b.height()));
    assert!(
        c.height() == a_rows && c.width() == b_cols && a_cols == b_rows,
        "cannot multiply {a_rows}x{a_cols} by {b_rows}x{b_cols} into {}x{}",
        c.height(),
        c.width()
    );
    let (m, n) = c.shape();
    let ldc = ld(c);
    blas::gemm(
        op_a,
        op_b,
        m,
        n,
        a_cols,
        alpha,
        a.as_slice(),
        ld(a),
        b.as_slice(),
        ld(b),
        beta,
        c.as_mut_slice(),
        ldc,
    )
}

fn check_eigen_shapes<T: Copy, W: Copy>(a: &DenseMatrix<T>, w: &DenseMatrix<W>) -> usize {
    assert!(a.is_square(), "expected a square matrix, got {}x{}", a.height(), a.width());
    assert!(
        w.is_column() && w.height() == a.height(),
        "expected a column of {} eigenvalues, got a {}x{} matrix",
        a.height(),
        w.height(),
        w.width()
    );
    a.height()
}

fn check_square<T: Copy>(name: &str, z: &DenseMatrix<T>, n: usize) {
    assert!(
        z.shape() == (n, n),
        "expected `{name}` to be {n}x{n}, got {}x{}",
        z.height(),
        z.width()
    );
}

/// Compute all eigenvalues of the symmetric or Hermitian matrix `a` into the column `w`
/// and, if `z` is given, the eigenvectors into its columns.
///
/// Only the upper triangle of `a` is read and `a` is destroyed. See
/// [`lapack::symmetric_eigen_all`].
///
/// # Panics
///
/// Panics if `a` is not square, `w` is not a column of matching height, or `z` is not
/// of the same shape as `a`.
pub fn heevr<T: Field>(
    a: &mut DenseMatrix<T>,
    w: &mut DenseMatrix<T::Real>,
    z: Option<&mut DenseMatrix<T>>,
) -> Result<(), LapackError> {
    let n = check_eigen_shapes(a, w);
    if n == 0 {
        return Ok(());
    }
    let lda = a.ldim();
    let w = w.column_slice_mut(0);
    match z {
        Some(z) => {
            check_square("z", z, n);
            let ldz = z.ldim();
            let z = Some(z.as_mut_slice());
            lapack::symmetric_eigen_all(n, a.as_mut_slice(), lda, w, z, ldz)
        }
        None => lapack::symmetric_eigen_all(n, a.as_mut_slice(), lda, w, None, 1),
    }
}

/// Compute the eigenvalues of the symmetric or Hermitian matrix `a` into the column `w`,
/// overwriting `a` with the eigenvectors if `compute_vectors` is set.
///
/// See [`lapack::symmetric_eigen_simple`].
pub fn heev<T: Field>(
    a: &mut DenseMatrix<T>,
    w: &mut DenseMatrix<T::Real>,
    compute_vectors: bool,
) -> Result<(), LapackError> {
    let n = check_eigen_shapes(a, w);
    if n == 0 {
        return Ok(());
    }
    let lda = a.ldim();
    lapack::symmetric_eigen_simple(
        n,
        a.as_mut_slice(),
        lda,
        w.column_slice_mut(0),
        compute_vectors,
    )
}

/// Compute the eigenvalues of the general matrix `a` into the column `w` and, if `z` is
/// given, the right eigenvectors into its columns.
///
/// Eigenvectors are always returned as complex columns, also for real fields: column `j`
/// of `z` is the eigenvector belonging to `w[j]`. The eigenvalues come in no particular
/// order. `a` is destroyed. See [`lapack::general_eigen`].
///
/// # Panics
///
/// Panics if `a` is not square, `w` is not a column of matching height, or `z` is not
/// of the same shape as `a`.
pub fn geev<T: Field>(
    a: &mut DenseMatrix<T>,
    w: &mut DenseMatrix<Complex<T::Real>>,
    z: Option<&mut DenseMatrix<Complex<T::Real>>>,
) -> Result<(), LapackError> {
    let n = check_eigen_shapes(a, w);
    if n == 0 {
        return Ok(());
    }
    let lda = a.ldim();
    let w = w.column_slice_mut(0);
    let Some(z) = z else {
        return lapack::general_eigen(n, a.as_mut_slice(), lda, w, None, 1, None, 1);
    };
    check_square("z", z, n);

    let mut vr = DenseMatrix::<T>::new(n, n)
        .map_err(|_| LapackError::AllocationFailure { routine: T::GEEV })?;
    let ldvr = vr.ldim();
    lapack::general_eigen(
        n,
        a.as_mut_slice(),
        lda,
        w,
        None,
        1,
        Some(vr.as_mut_slice()),
        ldvr,
    )?;
    unpack_eigenvectors(w, &vr, z);
    Ok(())
}

/// Expand the native eigenvector layout of ?GEEV into one complex column per eigenvalue.
///
/// For real fields, a conjugate pair `w[j], w[j + 1]` is stored as `v[:, j] ± i v[:, j + 1]`.
fn unpack_eigenvectors<T: Field>(
    w: &[Complex<T::Real>],
    v: &DenseMatrix<T>,
    z: &mut DenseMatrix<Complex<T::Real>>,
) {
    let n = v.width();
    let mut j = 0;
    while j < n {
        let vj = v.column_slice(j);
        if T::IS_COMPLEX || w[j].im.is_zero() || j + 1 == n {
            std::iter::zip(z.column_slice_mut(j), vj).for_each(|(z, x)| *z = x.to_complex());
            j += 1;
        } else {
            let vk = v.column_slice(j + 1);
            for (i, (x, y)) in std::iter::zip(vj, vk).enumerate() {
                let (re, im) = (x.real(), y.real());
                z[(i, j)] = Complex::new(re, im);
                z[(i, j + 1)] = Complex::new(re, -im);
            }
            j += 2;
        }
    }
}

///////////
// Tests //
///////////
