/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

//! Safe entry points for the BLAS routines on column-major slices.
//!
//! Shape and stride preconditions (`lda >= m`, non-zero increments, ...) are checked with
//! `debug_assert!` only. Slice lengths are always checked, since they are what keeps the
//! native call in bounds.
//!
//! None of these functions return errors.

use tcm_matrix::strided::linear_length;

use crate::{common::Operator, field::Field};

/// Convert a dimension to the native integer type.
///
/// # Panics
///
/// Panics if `x` does not fit in an `i32`.
#[inline]
pub(crate) fn blas_int(x: usize) -> i32 {
    assert!(
        x <= i32::MAX as usize,
        "{x} is not representable as a 32-bit BLAS integer"
    );
    x as i32
}

/// Return the number of elements spanned by a column-major `rows x cols` matrix with
/// leading dimension `ld`.
#[inline]
pub(crate) fn matrix_length(rows: usize, cols: usize, ld: usize) -> usize {
    if rows == 0 || cols == 0 {
        0
    } else {
        (cols - 1) * ld + rows
    }
}

/// Compute the inner product of two strided vectors of length `n`.
///
/// For complex fields the first argument is conjugated: `Σ conj(x_i) y_i`. For real
/// fields this is `Σ x_i y_i`.
///
/// Returns zero without touching either slice if `n == 0`.
///
/// # Panics
///
/// Panics if either slice is too short to hold `n` elements at its stride. In debug
/// builds, also panics if an increment is zero or if the result is not finite.
pub fn dot<T: Field>(n: usize, x: &[T], incx: usize, y: &[T], incy: usize) -> T {
    debug_assert!(incx != 0 && incy != 0, "increments must be non-zero");
    if n == 0 {
        return T::zero();
    }
    check_vector("x", x, n, incx);
    check_vector("y", y, n, incy);

    // SAFETY: Both slices hold `n` elements at their respective strides.
    let result = unsafe { T::xdot(blas_int(n), x, blas_int(incx), y, blas_int(incy)) };
    debug_assert!(
        result.is_finite_value(),
        "dot product of {n} elements is not finite: {result}"
    );
    result
}

/// Compute `y <- alpha * x + y` for strided vectors of length `n`.
///
/// # Panics
///
/// Panics if either slice is too short to hold `n` elements at its stride.
pub fn axpy<T: Field>(n: usize, alpha: T, x: &[T], incx: usize, y: &mut [T], incy: usize) {
    debug_assert!(incx != 0 && incy != 0, "increments must be non-zero");
    if n == 0 {
        return;
    }
    check_vector("x", x, n, incx);
    check_vector("y", y, n, incy);

    // SAFETY: Both slices hold `n` elements at their respective strides.
    unsafe { T::xaxpy(blas_int(n), alpha, x, blas_int(incx), y, blas_int(incy)) }
}

/// Compute `y <- alpha * op(A) * x + beta * y` where `A` is an `m x n` column-major matrix
/// with leading dimension `lda`.
///
/// * If `op == Operator::None`, `x` has `n` elements and `y` has `m`.
/// * Otherwise `x` has `m` elements and `y` has `n`.
///
/// Returns immediately without writing to `y` if `m == 0` or `n == 0`.
///
/// # Panics
///
/// Panics if a slice is too short for the described operands. In debug builds, also
/// panics if `lda < m` or an increment is zero.
#[allow(clippy::too_many_arguments)]
pub fn gemv<T: Field>(
    op: Operator,
    m: usize,
    n: usize,
    alpha: T,
    a: &[T],
    lda: usize,
    x: &[T],
    incx: usize,
    beta: T,
    y: &mut [T],
    incy: usize,
) {
    debug_assert!(lda >= m.max(1), "expected lda >= {m}, got {lda}");
    debug_assert!(incx != 0 && incy != 0, "increments must be non-zero");
    if m == 0 || n == 0 {
        return;
    }

    let (xlen, ylen) = op.forward((n, m), (m, n));
    check_matrix("a", a, m, n, lda);
    check_vector("x", x, xlen, incx);
    check_vector("y", y, ylen, incy);

    // SAFETY: We have checked that every operand spans enough elements for the call.
    unsafe {
        T::xgemv(
            op.to_cblas(),
            blas_int(m),
            blas_int(n),
            alpha,
            a,
            blas_int(lda),
            x,
            blas_int(incx),
            beta,
            y,
            blas_int(incy),
        )
    }
}

/// Matrix-matrix multiplication for column-major matrices.
///
/// Computes `c <- alpha * op(a) * op(b) + beta * c` where
///
/// * `op(a)` is `m x k`. It is stored as `m x k` if `op_a == Operator::None` and as
///   `k x m` otherwise, with leading dimension `lda`.
/// * `op(b)` is `k x n`. It is stored as `k x n` if `op_b == Operator::None` and as
///   `n x k` otherwise, with leading dimension `ldb`.
/// * `c` is `m x n` with leading dimension `ldc`.
///
/// Returns immediately without writing to `c` if any of `m`, `n` or `k` is zero.
///
/// # Panics
///
/// Panics if a slice is too short for the described matrix. In debug builds, also panics
/// if a leading dimension is smaller than the number of rows it describes.
#[allow(clippy::too_many_arguments)]
pub fn gemm<T: Field>(
    op_a: Operator,
    op_b: Operator,
    m: usize,
    n: usize,
    k: usize,
    alpha: T,
    a: &[T],
    lda: usize,
    b: &[T],
    ldb: usize,
    beta: T,
    c: &mut [T],
    ldc: usize,
) {
    let (a_rows, a_cols) = op_a.forward((m, k), (k, m));
    let (b_rows, b_cols) = op_b.forward((k, n), (n, k));
    debug_assert!(
        lda >= a_rows.max(1),
        "expected lda >= {a_rows}, got {lda}"
    );
    debug_assert!(
        ldb >= b_rows.max(1),
        "expected ldb >= {b_rows}, got {ldb}"
    );
    debug_assert!(ldc >= m.max(1), "expected ldc >= {m}, got {ldc}");
    if m == 0 || n == 0 || k == 0 {
        return;
    }

    check_matrix("a", a, a_rows, a_cols, lda);
    check_matrix("b", b, b_rows, b_cols, ldb);
    check_matrix("c", c, m, n, ldc);

    // SAFETY: We have checked that every operand spans enough elements for the call.
    unsafe {
        T::xgemm(
            op_a.to_cblas(),
            op_b.to_cblas(),
            blas_int(m),
            blas_int(n),
            blas_int(k),
            alpha,
            a,
            blas_int(lda),
            b,
            blas_int(ldb),
            beta,
            c,
            blas_int(ldc),
        )
    }
}

#[inline]
fn check_vector<T>(name: &str, v: &[T], n: usize, inc: usize) {
    let required = linear_length(n, inc);
    assert!(
        v.len() >= required,
        "vector `{name}` has length {} but {n} elements at stride {inc} require {required}",
        v.len()
    );
}

#[inline]
fn check_matrix<T>(name: &str, a: &[T], rows: usize, cols: usize, ld: usize) {
    let required = matrix_length(rows, cols, ld);
    assert!(
        a.len() >= required,
        "matrix `{name}` has length {} but a {rows}x{cols} matrix with leading dimension \
         {ld} requires {required}",
        a.len()
    );
}

///////////
// Tests //
///////////
